//! Warning entity - Append-only moderation warnings.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Warning database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "warnings")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Discord guild ID
    pub guild_id: String,
    /// Warned user
    pub user_id: String,
    /// Moderator who issued the warning
    pub moderator_id: String,
    /// Reason given by the moderator
    pub reason: String,
    /// When the warning was issued
    pub created_at: DateTimeUtc,
}

/// `Warning` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
