//! Persistence layer.
//!
//! Core logic talks to storage only through the [`Store`] trait, so the same
//! ledger, lottery and moderation code runs against `SQLite` in production and
//! against [`MemoryStore`] in tests. Atomic read-modify-write per record is
//! provided by [`KeyLocks`], not by the backend.

/// Per-key async locks
pub mod locks;
/// In-memory store
pub mod memory;
/// `SeaORM`-backed store
pub mod sql;

pub use locks::{KeyLocks, LockKey};
pub use memory::MemoryStore;
pub use sql::SeaOrmStore;

use crate::errors::Result;
use crate::models::{AccountKey, EconomyAccount, GuildSettings, JailRecord, LotteryState, Warning};
use async_trait::async_trait;

/// Key-based CRUD over every persisted record kind.
#[async_trait]
pub trait Store: Send + Sync {
    /// Loads an account, `None` if it was never created.
    async fn load_account(&self, key: AccountKey) -> Result<Option<EconomyAccount>>;

    /// Inserts or replaces an account.
    async fn save_account(&self, account: &EconomyAccount) -> Result<()>;

    /// All accounts in a guild, in no particular order.
    async fn guild_accounts(&self, guild_id: u64) -> Result<Vec<EconomyAccount>>;

    /// Loads a guild's lottery, `None` if it was never created.
    async fn load_lottery(&self, guild_id: u64) -> Result<Option<LotteryState>>;

    /// Inserts or replaces a lottery.
    async fn save_lottery(&self, lottery: &LotteryState) -> Result<()>;

    /// Every lottery across all guilds.
    async fn lotteries(&self) -> Result<Vec<LotteryState>>;

    /// Appends a warning.
    async fn append_warning(&self, warning: &Warning) -> Result<()>;

    /// Warnings for a user in a guild, oldest first.
    async fn warnings(&self, guild_id: u64, user_id: u64) -> Result<Vec<Warning>>;

    /// Loads a guild's settings, `None` if never saved.
    async fn load_settings(&self, guild_id: u64) -> Result<Option<GuildSettings>>;

    /// Inserts or replaces a guild's settings.
    async fn save_settings(&self, settings: &GuildSettings) -> Result<()>;

    /// Loads the jail record for a user, if jailed.
    async fn load_jail(&self, guild_id: u64, user_id: u64) -> Result<Option<JailRecord>>;

    /// Stores a jail record.
    async fn save_jail(&self, record: &JailRecord) -> Result<()>;

    /// Deletes and returns the jail record for a user.
    async fn remove_jail(&self, guild_id: u64, user_id: u64) -> Result<Option<JailRecord>>;

    /// Every jail record in a guild, oldest first.
    async fn jailed(&self, guild_id: u64) -> Result<Vec<JailRecord>>;
}
