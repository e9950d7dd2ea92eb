//! Guild settings entity - Per-guild configuration edited by administrators.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Guild settings database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "guild_settings")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Discord guild ID
    #[sea_orm(unique)]
    pub guild_id: String,
    /// JSON array of role IDs granting premium access
    pub premium_roles: String,
    /// Warnings before an automatic kick
    pub warn_limit: i32,
    /// Role assigned to jailed members
    pub jail_role_id: Option<String>,
    /// Role assigned to muted members
    pub muted_role_id: Option<String>,
    /// Category new ticket channels are created under
    pub ticket_category_id: Option<String>,
    /// Channel role applications are posted to
    pub application_channel_id: Option<String>,
    /// Role granted on an approved application
    pub application_role_id: Option<String>,
}

/// `GuildSettings` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
