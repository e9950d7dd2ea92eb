//! Lottery entity - One pot per guild.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lottery database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "lotteries")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Discord guild ID
    #[sea_orm(unique)]
    pub guild_id: String,
    /// Coins paid in since the last draw
    pub pot: i64,
    /// JSON array of participant user IDs, one entry per ticket
    pub participants: String,
    /// When the scheduler should next draw
    pub next_draw: DateTimeUtc,
}

/// `Lottery` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
