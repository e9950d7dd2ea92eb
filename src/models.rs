//! Domain records shared by the core logic and the store layer.
//!
//! These are plain data with small invariant-preserving helpers; the store
//! converts them to and from the `SeaORM` entities.

use crate::core::{items::Item, jobs::Job};
use crate::errors::{Error, Result};
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Wallet of a freshly created account.
pub const STARTING_WALLET: i64 = 100;

/// Maximum bio length in characters.
pub const MAX_BIO_CHARS: usize = 200;

/// Identifies one account: a user inside a guild.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccountKey {
    /// Discord guild ID
    pub guild_id: u64,
    /// Discord user ID
    pub user_id: u64,
}

impl AccountKey {
    /// Key for `user_id` in `guild_id`.
    #[must_use]
    pub const fn new(guild_id: u64, user_id: u64) -> Self {
        Self { guild_id, user_id }
    }
}

/// Timestamps of the last use of each time-gated action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cooldowns {
    pub last_beg: Option<DateTime<Utc>>,
    pub last_work: Option<DateTime<Utc>>,
    pub last_rob: Option<DateTime<Utc>>,
    pub last_daily: Option<DateTime<Utc>>,
    pub last_weekly: Option<DateTime<Utc>>,
    pub last_monthly: Option<DateTime<Utc>>,
    pub bank_interest_at: Option<DateTime<Utc>>,
}

/// Effects armed by used items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Boosts {
    /// Next `work` pays double
    pub double_earnings: bool,
    /// Next robbery uses improved odds
    pub rob_boost: bool,
    /// Gambling boost window end
    pub lucky_until: Option<DateTime<Utc>>,
    /// Robbery protection window end
    pub shield_until: Option<DateTime<Utc>>,
}

/// A member's economy record in one guild.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EconomyAccount {
    pub key: AccountKey,
    pub wallet: i64,
    pub bank: i64,
    pub job: Option<Job>,
    pub level: i64,
    pub xp: i64,
    pub items: Vec<Item>,
    pub badges: BTreeSet<String>,
    pub bio: String,
    pub cooldowns: Cooldowns,
    pub boosts: Boosts,
}

impl EconomyAccount {
    /// A fresh account with the default starting balance.
    #[must_use]
    pub fn new(key: AccountKey) -> Self {
        Self {
            key,
            wallet: STARTING_WALLET,
            bank: 0,
            job: None,
            level: 1,
            xp: 0,
            items: Vec::new(),
            badges: BTreeSet::new(),
            bio: String::new(),
            cooldowns: Cooldowns::default(),
            boosts: Boosts::default(),
        }
    }

    /// Wallet plus bank.
    #[must_use]
    pub const fn net_worth(&self) -> i64 {
        self.wallet + self.bank
    }

    /// Removes `amount` from the wallet, refusing if that would go negative.
    pub fn debit_wallet(&mut self, amount: i64) -> Result<()> {
        if amount > self.wallet {
            return Err(Error::InsufficientFunds {
                available: self.wallet,
                required: amount,
            });
        }
        self.wallet -= amount;
        Ok(())
    }

    /// Adds `amount` to the wallet.
    pub const fn credit_wallet(&mut self, amount: i64) {
        self.wallet += amount;
    }

    /// Adds experience; returns `true` when the account levelled up.
    ///
    /// Reaching `level * 100` xp resets xp to zero and raises the level by one.
    pub const fn add_xp(&mut self, amount: i64) -> bool {
        self.xp += amount;
        if self.xp >= self.level * 100 {
            self.xp = 0;
            self.level += 1;
            true
        } else {
            false
        }
    }

    /// Number of copies of `item` owned.
    #[must_use]
    pub fn item_count(&self, item: Item) -> usize {
        self.items.iter().filter(|owned| **owned == item).count()
    }

    /// Whether at least one `item` is owned.
    #[must_use]
    pub fn owns(&self, item: Item) -> bool {
        self.items.contains(&item)
    }

    /// Removes one copy of `item`; returns `false` when none is owned.
    pub fn take_item(&mut self, item: Item) -> bool {
        match self.items.iter().position(|owned| *owned == item) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    /// Whether the lucky-charm gambling boost is active at `now`.
    #[must_use]
    pub fn is_lucky(&self, now: DateTime<Utc>) -> bool {
        self.boosts.lucky_until.is_some_and(|until| now < until)
    }

    /// Whether robbery protection is active at `now`.
    #[must_use]
    pub fn is_shielded(&self, now: DateTime<Utc>) -> bool {
        self.boosts.shield_until.is_some_and(|until| now < until)
    }

    /// Inventory grouped as `(item, count)` in catalog order.
    #[must_use]
    pub fn inventory(&self) -> Vec<(Item, usize)> {
        Item::ALL
            .into_iter()
            .map(|item| (item, self.item_count(item)))
            .filter(|(_, count)| *count > 0)
            .collect()
    }
}

/// A guild's lottery pot and ticket list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotteryState {
    pub guild_id: u64,
    pub pot: i64,
    /// One entry per ticket
    pub participants: Vec<u64>,
    pub next_draw: DateTime<Utc>,
}

impl LotteryState {
    /// Time between scheduled draws.
    #[must_use]
    pub const fn draw_interval() -> TimeDelta {
        TimeDelta::hours(24)
    }

    /// An empty lottery whose first draw is one interval from `now`.
    #[must_use]
    pub fn new(guild_id: u64, now: DateTime<Utc>) -> Self {
        Self {
            guild_id,
            pot: 0,
            participants: Vec::new(),
            next_draw: now + Self::draw_interval(),
        }
    }

    /// Tickets held by `user_id`.
    #[must_use]
    pub fn tickets_of(&self, user_id: u64) -> usize {
        self.participants.iter().filter(|id| **id == user_id).count()
    }

    /// Empties the pot and schedules the next draw from `now`.
    pub fn reset(&mut self, now: DateTime<Utc>) {
        self.pot = 0;
        self.participants.clear();
        self.next_draw = now + Self::draw_interval();
    }
}

/// A moderation warning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    pub guild_id: u64,
    pub user_id: u64,
    pub moderator_id: u64,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

/// Per-guild configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildSettings {
    pub guild_id: u64,
    pub premium_roles: Vec<u64>,
    pub warn_limit: u32,
    pub jail_role: Option<u64>,
    pub muted_role: Option<u64>,
    pub ticket_category: Option<u64>,
    pub application_channel: Option<u64>,
    pub application_role: Option<u64>,
}

impl GuildSettings {
    /// Settings for a guild that never configured anything.
    #[must_use]
    pub const fn new(guild_id: u64, warn_limit: u32) -> Self {
        Self {
            guild_id,
            premium_roles: Vec::new(),
            warn_limit,
            jail_role: None,
            muted_role: None,
            ticket_category: None,
            application_channel: None,
            application_role: None,
        }
    }
}

/// A jailed member and the roles taken away from them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JailRecord {
    pub guild_id: u64,
    pub user_id: u64,
    pub moderator_id: u64,
    pub reason: String,
    pub roles: Vec<u64>,
    pub jailed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> EconomyAccount {
        EconomyAccount::new(AccountKey::new(1, 2))
    }

    #[test]
    fn test_new_account_defaults() {
        let acc = account();
        assert_eq!(acc.wallet, 100);
        assert_eq!(acc.bank, 0);
        assert_eq!(acc.level, 1);
        assert_eq!(acc.xp, 0);
        assert!(acc.items.is_empty());
    }

    #[test]
    fn test_debit_rejects_overdraft_without_mutation() {
        let mut acc = account();
        let err = acc.debit_wallet(101);
        assert!(matches!(
            err,
            Err(Error::InsufficientFunds {
                available: 100,
                required: 101
            })
        ));
        assert_eq!(acc.wallet, 100);
        assert!(acc.debit_wallet(100).is_ok());
        assert_eq!(acc.wallet, 0);
    }

    #[test]
    fn test_level_up_resets_xp() {
        let mut acc = account();
        assert!(!acc.add_xp(90));
        assert!(acc.add_xp(10));
        assert_eq!((acc.level, acc.xp), (2, 0));
        // Level 2 needs 200 xp.
        assert!(!acc.add_xp(199));
        assert!(acc.add_xp(1));
        assert_eq!(acc.level, 3);
    }

    #[test]
    fn test_take_item_removes_single_copy() {
        let mut acc = account();
        acc.items = vec![Item::Potion, Item::Sword, Item::Potion];
        assert!(acc.take_item(Item::Potion));
        assert_eq!(acc.item_count(Item::Potion), 1);
        assert!(!acc.take_item(Item::Shield));
        assert_eq!(acc.inventory(), vec![(Item::Potion, 1), (Item::Sword, 1)]);
    }

    #[test]
    fn test_lottery_reset() {
        let now = Utc::now();
        let mut lottery = LotteryState::new(1, now);
        lottery.pot = 300;
        lottery.participants = vec![5, 5, 6];
        assert_eq!(lottery.tickets_of(5), 2);
        lottery.reset(now);
        assert_eq!(lottery.pot, 0);
        assert!(lottery.participants.is_empty());
        assert_eq!(lottery.next_draw, now + TimeDelta::hours(24));
    }
}
