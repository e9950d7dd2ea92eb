//! Jail entity - Members currently jailed, with the roles to restore on release.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Jail record database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "jailed_users")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Discord guild ID
    pub guild_id: String,
    /// Jailed user
    pub user_id: String,
    /// Moderator who jailed the user
    pub moderator_id: String,
    /// Reason given by the moderator
    pub reason: String,
    /// JSON array of role IDs removed when jailing
    pub roles: String,
    /// When the user was jailed
    pub jailed_at: DateTimeUtc,
}

/// `Jail` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
