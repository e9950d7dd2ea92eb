//! In-memory [`Store`], used by unit tests.

use super::Store;
use crate::errors::Result;
use crate::models::{AccountKey, EconomyAccount, GuildSettings, JailRecord, LotteryState, Warning};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Process-local maps behind async read/write locks.
#[derive(Debug, Default)]
pub struct MemoryStore {
    accounts: RwLock<HashMap<AccountKey, EconomyAccount>>,
    lotteries: RwLock<HashMap<u64, LotteryState>>,
    warnings: RwLock<Vec<Warning>>,
    settings: RwLock<HashMap<u64, GuildSettings>>,
    jail: RwLock<Vec<JailRecord>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn load_account(&self, key: AccountKey) -> Result<Option<EconomyAccount>> {
        Ok(self.accounts.read().await.get(&key).cloned())
    }

    async fn save_account(&self, account: &EconomyAccount) -> Result<()> {
        self.accounts
            .write()
            .await
            .insert(account.key, account.clone());
        Ok(())
    }

    async fn guild_accounts(&self, guild_id: u64) -> Result<Vec<EconomyAccount>> {
        Ok(self
            .accounts
            .read()
            .await
            .values()
            .filter(|acc| acc.key.guild_id == guild_id)
            .cloned()
            .collect())
    }

    async fn load_lottery(&self, guild_id: u64) -> Result<Option<LotteryState>> {
        Ok(self.lotteries.read().await.get(&guild_id).cloned())
    }

    async fn save_lottery(&self, lottery: &LotteryState) -> Result<()> {
        self.lotteries
            .write()
            .await
            .insert(lottery.guild_id, lottery.clone());
        Ok(())
    }

    async fn lotteries(&self) -> Result<Vec<LotteryState>> {
        Ok(self.lotteries.read().await.values().cloned().collect())
    }

    async fn append_warning(&self, warning: &Warning) -> Result<()> {
        self.warnings.write().await.push(warning.clone());
        Ok(())
    }

    async fn warnings(&self, guild_id: u64, user_id: u64) -> Result<Vec<Warning>> {
        Ok(self
            .warnings
            .read()
            .await
            .iter()
            .filter(|w| w.guild_id == guild_id && w.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn load_settings(&self, guild_id: u64) -> Result<Option<GuildSettings>> {
        Ok(self.settings.read().await.get(&guild_id).cloned())
    }

    async fn save_settings(&self, settings: &GuildSettings) -> Result<()> {
        self.settings
            .write()
            .await
            .insert(settings.guild_id, settings.clone());
        Ok(())
    }

    async fn load_jail(&self, guild_id: u64, user_id: u64) -> Result<Option<JailRecord>> {
        Ok(self
            .jail
            .read()
            .await
            .iter()
            .find(|r| r.guild_id == guild_id && r.user_id == user_id)
            .cloned())
    }

    async fn save_jail(&self, record: &JailRecord) -> Result<()> {
        let mut jail = self.jail.write().await;
        jail.retain(|r| !(r.guild_id == record.guild_id && r.user_id == record.user_id));
        jail.push(record.clone());
        Ok(())
    }

    async fn remove_jail(&self, guild_id: u64, user_id: u64) -> Result<Option<JailRecord>> {
        let mut jail = self.jail.write().await;
        let position = jail
            .iter()
            .position(|r| r.guild_id == guild_id && r.user_id == user_id);
        Ok(position.map(|index| jail.remove(index)))
    }

    async fn jailed(&self, guild_id: u64) -> Result<Vec<JailRecord>> {
        Ok(self
            .jail
            .read()
            .await
            .iter()
            .filter(|r| r.guild_id == guild_id)
            .cloned()
            .collect())
    }
}
