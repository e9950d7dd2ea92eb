//! Account entity - One economy account per user per guild.
//!
//! Discord snowflakes are stored as text. `items` and `badges` hold JSON arrays.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Economy account database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Discord guild ID
    pub guild_id: String,
    /// Discord user ID
    pub user_id: String,
    /// Spendable coins
    pub wallet: i64,
    /// Coins earning interest
    pub bank: i64,
    /// Assigned job identifier, if any
    pub job: Option<String>,
    /// Current level (starts at 1)
    pub level: i64,
    /// Experience towards the next level
    pub xp: i64,
    /// JSON array of owned item identifiers (duplicates allowed)
    pub items: String,
    /// JSON array of badge names
    pub badges: String,
    /// Profile bio
    pub bio: String,
    /// Last successful `beg`
    pub last_beg: Option<DateTimeUtc>,
    /// Last successful `work`
    pub last_work: Option<DateTimeUtc>,
    /// Last robbery attempt
    pub last_rob: Option<DateTimeUtc>,
    /// Last `daily` claim
    pub last_daily: Option<DateTimeUtc>,
    /// Last `weekly` claim
    pub last_weekly: Option<DateTimeUtc>,
    /// Last `monthly` claim
    pub last_monthly: Option<DateTimeUtc>,
    /// Last time bank interest was credited
    pub bank_interest_at: Option<DateTimeUtc>,
    /// One-shot double earnings for the next `work`
    pub double_earnings: bool,
    /// One-shot improved odds for the next robbery
    pub rob_boost: bool,
    /// Gambling boost active until this time
    pub lucky_until: Option<DateTimeUtc>,
    /// Robbery protection active until this time
    pub shield_until: Option<DateTimeUtc>,
}

/// `Account` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
