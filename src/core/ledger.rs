//! Economy ledger - Every wallet and bank mutation goes through here.
//!
//! Each operation loads (or lazily creates) the actor's account under its key
//! lock, validates every precondition, mutates, and persists. A failed check
//! returns before anything is saved, so balances never go negative.
//! Transfers between two accounts (`pay`, `rob`) are two single-account
//! updates; a crash between them is the only way the legs can disagree.

use crate::{
    core::{
        gambling::{self, CoinSide, Symbol},
        gate,
        items::{Item, ItemUse},
        jobs::Job,
    },
    errors::{Error, Result},
    models::{AccountKey, EconomyAccount, MAX_BIO_CHARS},
    store::{KeyLocks, LockKey, Store},
};
use chrono::{DateTime, TimeDelta, Utc};
use rand::Rng;
use std::{str::FromStr, sync::Arc};
use tracing::{debug, info, instrument};

/// Cooldown between shifts.
pub const WORK_COOLDOWN: TimeDelta = TimeDelta::minutes(5);
/// Cooldown between begs.
pub const BEG_COOLDOWN: TimeDelta = TimeDelta::seconds(60);
/// Cooldown between robbery attempts.
pub const ROB_COOLDOWN: TimeDelta = TimeDelta::minutes(30);
/// Minimum interval between interest payments.
pub const INTEREST_WINDOW: TimeDelta = TimeDelta::hours(24);
/// A robbery target needs at least this much in their wallet.
pub const MIN_ROB_TARGET_WALLET: i64 = 50;
/// How long a shield protects its owner.
pub const SHIELD_DURATION: TimeDelta = TimeDelta::hours(24);
/// How long a lucky charm lasts.
pub const LUCKY_DURATION: TimeDelta = TimeDelta::hours(1);
/// Experience granted by an xp scroll.
pub const XP_SCROLL_AMOUNT: i64 = 100;
/// Most copies of one item bought in a single purchase.
pub const MAX_PURCHASE_QUANTITY: i64 = 100;
/// Longest badge name.
pub const MAX_BADGE_CHARS: usize = 32;

/// Periodic rewards with fixed payouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reward {
    /// Every 24 hours
    Daily,
    /// Every 7 days
    Weekly,
    /// Every 30 days
    Monthly,
}

impl Reward {
    /// Command name, also used in cooldown messages.
    #[must_use]
    pub const fn action(self) -> &'static str {
        match self {
            Self::Daily => "claim your daily reward",
            Self::Weekly => "claim your weekly reward",
            Self::Monthly => "claim your monthly reward",
        }
    }

    /// Coins paid out.
    #[must_use]
    pub const fn payout(self) -> i64 {
        match self {
            Self::Daily => 100,
            Self::Weekly => 1_000,
            Self::Monthly => 5_000,
        }
    }

    /// Base cooldown.
    #[must_use]
    pub const fn window(self) -> TimeDelta {
        match self {
            Self::Daily => TimeDelta::hours(24),
            Self::Weekly => TimeDelta::days(7),
            Self::Monthly => TimeDelta::days(30),
        }
    }

    /// Booster that shortens this reward's cooldown, and by how much.
    #[must_use]
    pub const fn booster(self) -> (Item, TimeDelta) {
        match self {
            Self::Daily => (Item::DailyBooster, TimeDelta::hours(6)),
            Self::Weekly => (Item::WeeklyBooster, TimeDelta::days(1)),
            Self::Monthly => (Item::MonthlyBooster, TimeDelta::days(3)),
        }
    }

    /// Cooldown for `account`, shortened while the matching booster is owned.
    #[must_use]
    pub fn window_for(self, account: &EconomyAccount) -> TimeDelta {
        let (booster, reduction) = self.booster();
        if account.owns(booster) {
            self.window() - reduction
        } else {
            self.window()
        }
    }

    const fn last_claim(self, account: &EconomyAccount) -> Option<DateTime<Utc>> {
        match self {
            Self::Daily => account.cooldowns.last_daily,
            Self::Weekly => account.cooldowns.last_weekly,
            Self::Monthly => account.cooldowns.last_monthly,
        }
    }

    const fn record_claim(self, account: &mut EconomyAccount, now: DateTime<Utc>) {
        match self {
            Self::Daily => account.cooldowns.last_daily = Some(now),
            Self::Weekly => account.cooldowns.last_weekly = Some(now),
            Self::Monthly => account.cooldowns.last_monthly = Some(now),
        }
    }
}

/// An amount argument: a number of coins or everything available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Amount {
    /// The whole source balance
    All,
    /// A fixed number of coins
    Exact(i64),
}

impl Amount {
    /// Concrete coin count given the source balance.
    #[must_use]
    pub const fn resolve(self, available: i64) -> i64 {
        match self {
            Self::All => available,
            Self::Exact(amount) => amount,
        }
    }
}

impl FromStr for Amount {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("all") || trimmed.eq_ignore_ascii_case("max") {
            return Ok(Self::All);
        }
        trimmed
            .replace(',', "")
            .parse::<i64>()
            .map(Self::Exact)
            .map_err(|_| Error::validation(format!("`{trimmed}` is not a valid amount")))
    }
}

/// Balances after a `balance`/`profile` view, including any interest just credited.
#[derive(Debug, Clone)]
pub struct BalanceView {
    /// The account after interest
    pub account: EconomyAccount,
    /// Interest credited by this view, zero if not due
    pub interest: i64,
}

/// Result of a shift.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkOutcome {
    /// Job worked
    pub job: Job,
    /// Coins earned
    pub payout: i64,
    /// Whether a potion doubled the payout
    pub doubled: bool,
    /// Whether the shift's xp caused a level-up
    pub leveled_up: bool,
    /// Level afterwards
    pub level: i64,
    /// Wallet afterwards
    pub wallet: i64,
}

/// Result of a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayOutcome {
    /// Sender's wallet afterwards
    pub sender_wallet: i64,
    /// Recipient's wallet afterwards
    pub recipient_wallet: i64,
}

/// Balances after a deposit or withdrawal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BankOutcome {
    /// Coins moved
    pub moved: i64,
    /// Wallet afterwards
    pub wallet: i64,
    /// Bank afterwards
    pub bank: i64,
}

/// Result of a robbery attempt that reached the roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RobOutcome {
    /// Coins taken from the target
    Success {
        /// Amount moved from target to robber
        stolen: i64,
        /// Robber's wallet afterwards
        wallet: i64,
        /// Whether a sword improved the odds
        boosted: bool,
    },
    /// The robber was caught and fined
    Caught {
        /// Fine paid by the robber
        penalty: i64,
        /// Robber's wallet afterwards
        wallet: i64,
        /// Whether a sword improved the odds
        boosted: bool,
    },
}

/// Result of a gamble.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GambleOutcome<T> {
    /// What was drawn
    pub draw: T,
    /// Net wallet change
    pub delta: i64,
    /// Whether a lucky charm was active
    pub lucky: bool,
    /// Wallet afterwards
    pub wallet: i64,
}

/// What using an item did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UseOutcome {
    /// Next `work` pays double
    DoubleEarningsArmed,
    /// Next robbery has improved odds
    RobBoostArmed,
    /// Robbery protection until the given time
    Shielded(DateTime<Utc>),
    /// Gambling boost until the given time
    Lucky(DateTime<Utc>),
    /// Experience granted
    Experience {
        /// Level afterwards
        level: i64,
        /// Whether the scroll caused a level-up
        leveled_up: bool,
    },
}

/// Credits interest if none was credited in the last [`INTEREST_WINDOW`].
///
/// Returns the amount credited (possibly zero).
pub fn accrue_interest(account: &mut EconomyAccount, now: DateTime<Utc>) -> i64 {
    if !gate::cooldown_elapsed(account.cooldowns.bank_interest_at, INTEREST_WINDOW, now) {
        return 0;
    }
    let interest = account.bank * 5 / 100;
    account.bank += interest;
    account.cooldowns.bank_interest_at = Some(now);
    interest
}

/// Handle over the store for all economy operations. Cloning shares state.
#[derive(Clone)]
pub struct Ledger {
    store: Arc<dyn Store>,
    locks: KeyLocks,
}

impl std::fmt::Debug for Ledger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ledger")
            .field("locked_keys", &self.locks.len())
            .finish_non_exhaustive()
    }
}

impl Ledger {
    /// Creates a ledger over `store`, sharing `locks` with other components.
    #[must_use]
    pub fn new(store: Arc<dyn Store>, locks: KeyLocks) -> Self {
        Self { store, locks }
    }

    /// The backing store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    /// The shared lock table.
    #[must_use]
    pub const fn locks(&self) -> &KeyLocks {
        &self.locks
    }

    /// Reads an account without creating it; missing accounts read as defaults.
    pub async fn account(&self, key: AccountKey) -> Result<EconomyAccount> {
        Ok(self
            .store
            .load_account(key)
            .await?
            .unwrap_or_else(|| EconomyAccount::new(key)))
    }

    /// Atomic read-modify-write of one account.
    ///
    /// `f` runs while the account's lock is held. The account is saved only
    /// when `f` succeeds, so an error leaves the stored record untouched.
    pub async fn with_account<R, F>(&self, key: AccountKey, f: F) -> Result<R>
    where
        R: Send,
        F: FnOnce(&mut EconomyAccount) -> Result<R> + Send,
    {
        let _guard = self.locks.lock(LockKey::Account(key)).await;
        let mut account = self
            .store
            .load_account(key)
            .await?
            .unwrap_or_else(|| EconomyAccount::new(key));
        let out = f(&mut account)?;
        self.store.save_account(&account).await?;
        Ok(out)
    }

    /// Balance view; credits bank interest when due.
    pub async fn balance(&self, key: AccountKey, now: DateTime<Utc>) -> Result<BalanceView> {
        self.with_account(key, |acc| {
            let interest = accrue_interest(acc, now);
            Ok(BalanceView {
                account: acc.clone(),
                interest,
            })
        })
        .await
    }

    /// Credits bank interest when due; returns the amount credited.
    pub async fn apply_bank_interest(&self, key: AccountKey, now: DateTime<Utc>) -> Result<i64> {
        self.with_account(key, |acc| Ok(accrue_interest(acc, now)))
            .await
    }

    /// Works a shift: needs a job, pays `uniform(0, base) + base` with
    /// `base = 50 + level * 10`, doubled once by an armed potion.
    #[instrument(skip(self, rng))]
    pub async fn work<R: Rng + Send>(
        &self,
        key: AccountKey,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<WorkOutcome> {
        self.with_account(key, |acc| {
            let job = acc.job.ok_or_else(|| {
                Error::validation("You need a job first. See `jobs` and `apply`.")
            })?;
            gate::ensure_cooldown("work", acc.cooldowns.last_work, WORK_COOLDOWN, now)?;

            let base = 50 + acc.level * 10;
            let mut payout = rng.gen_range(0..base) + base;
            let doubled = std::mem::take(&mut acc.boosts.double_earnings);
            if doubled {
                payout *= 2;
            }
            acc.credit_wallet(payout);
            acc.cooldowns.last_work = Some(now);
            let leveled_up = acc.add_xp(10);
            debug!(payout, doubled, leveled_up, "shift paid");

            Ok(WorkOutcome {
                job,
                payout,
                doubled,
                leveled_up,
                level: acc.level,
                wallet: acc.wallet,
            })
        })
        .await
    }

    /// Begs for `uniform(1, 50)` coins once a minute.
    pub async fn beg<R: Rng + Send>(
        &self,
        key: AccountKey,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<(i64, i64)> {
        self.with_account(key, |acc| {
            gate::ensure_cooldown("beg", acc.cooldowns.last_beg, BEG_COOLDOWN, now)?;
            let amount = rng.gen_range(1..=50);
            acc.credit_wallet(amount);
            acc.cooldowns.last_beg = Some(now);
            Ok((amount, acc.wallet))
        })
        .await
    }

    /// Claims a periodic reward; returns `(payout, wallet)`.
    pub async fn claim(
        &self,
        key: AccountKey,
        reward: Reward,
        now: DateTime<Utc>,
    ) -> Result<(i64, i64)> {
        self.with_account(key, |acc| {
            let window = reward.window_for(acc);
            gate::ensure_cooldown(reward.action(), reward.last_claim(acc), window, now)?;
            acc.credit_wallet(reward.payout());
            reward.record_claim(acc, now);
            Ok((reward.payout(), acc.wallet))
        })
        .await
    }

    /// Moves `amount` coins from `from` to `to_user` in the same guild.
    #[instrument(skip(self))]
    pub async fn pay(&self, from: AccountKey, to_user: u64, amount: i64) -> Result<PayOutcome> {
        if from.user_id == to_user {
            return Err(Error::validation("You can't pay yourself."));
        }
        gate::ensure_positive(amount, "Amount")?;

        let sender_wallet = self
            .with_account(from, |acc| {
                acc.debit_wallet(amount)?;
                Ok(acc.wallet)
            })
            .await?;
        let recipient_wallet = self
            .with_account(AccountKey::new(from.guild_id, to_user), |acc| {
                acc.credit_wallet(amount);
                Ok(acc.wallet)
            })
            .await?;

        info!(amount, to_user, "payment completed");
        Ok(PayOutcome {
            sender_wallet,
            recipient_wallet,
        })
    }

    /// Moves coins from the wallet into the bank.
    pub async fn deposit(&self, key: AccountKey, amount: Amount) -> Result<BankOutcome> {
        self.with_account(key, |acc| {
            let moved = amount.resolve(acc.wallet);
            gate::ensure_positive(moved, "Deposit amount")?;
            acc.debit_wallet(moved)?;
            acc.bank += moved;
            Ok(BankOutcome {
                moved,
                wallet: acc.wallet,
                bank: acc.bank,
            })
        })
        .await
    }

    /// Moves coins from the bank into the wallet.
    pub async fn withdraw(&self, key: AccountKey, amount: Amount) -> Result<BankOutcome> {
        self.with_account(key, |acc| {
            let moved = amount.resolve(acc.bank);
            gate::ensure_positive(moved, "Withdrawal amount")?;
            gate::ensure_funds(acc.bank, moved)?;
            acc.bank -= moved;
            acc.credit_wallet(moved);
            Ok(BankOutcome {
                moved,
                wallet: acc.wallet,
                bank: acc.bank,
            })
        })
        .await
    }

    /// Attempts to rob `target_user`.
    ///
    /// Checks run in order: self-target, the robber's cooldown, the target's
    /// wallet floor, the target's shield. Only then is the cooldown recorded,
    /// an armed sword consumed, and the odds rolled.
    #[instrument(skip(self, rng))]
    pub async fn rob<R: Rng + Send>(
        &self,
        robber: AccountKey,
        target_user: u64,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<RobOutcome> {
        if robber.user_id == target_user {
            return Err(Error::validation("You can't rob yourself."));
        }
        let target = AccountKey::new(robber.guild_id, target_user);

        let snapshot = self.account(robber).await?;
        gate::ensure_cooldown("rob", snapshot.cooldowns.last_rob, ROB_COOLDOWN, now)?;

        let victim = self.account(target).await?;
        if victim.wallet < MIN_ROB_TARGET_WALLET {
            return Err(Error::validation(format!(
                "<@{target_user}> needs at least {MIN_ROB_TARGET_WALLET} coins in their wallet to be worth robbing."
            )));
        }
        if victim.is_shielded(now) {
            return Err(Error::denied(format!(
                "<@{target_user}> is protected by a shield."
            )));
        }

        let boosted = self
            .with_account(robber, |acc| {
                gate::ensure_cooldown("rob", acc.cooldowns.last_rob, ROB_COOLDOWN, now)?;
                acc.cooldowns.last_rob = Some(now);
                Ok(std::mem::take(&mut acc.boosts.rob_boost))
            })
            .await?;

        let chance = if boosted { 0.6 } else { 0.5 };
        if rng.gen_bool(chance) {
            let stolen = self
                .with_account(target, |acc| {
                    let stolen = acc.wallet / 5;
                    acc.debit_wallet(stolen)?;
                    Ok(stolen)
                })
                .await?;
            let wallet = self
                .with_account(robber, |acc| {
                    acc.credit_wallet(stolen);
                    Ok(acc.wallet)
                })
                .await?;
            info!(stolen, target_user, "robbery succeeded");
            Ok(RobOutcome::Success {
                stolen,
                wallet,
                boosted,
            })
        } else {
            let (penalty, wallet) = self
                .with_account(robber, |acc| {
                    let penalty = acc.wallet / 10;
                    acc.debit_wallet(penalty)?;
                    Ok((penalty, acc.wallet))
                })
                .await?;
            info!(penalty, target_user, "robbery failed");
            Ok(RobOutcome::Caught {
                penalty,
                wallet,
                boosted,
            })
        }
    }

    /// Runs one gamble: validates the bet, draws, applies the net change.
    async fn gamble<T, D, P>(
        &self,
        key: AccountKey,
        bet: i64,
        now: DateTime<Utc>,
        draw: D,
        payout: P,
    ) -> Result<GambleOutcome<T>>
    where
        T: Send,
        D: FnOnce() -> T + Send,
        P: FnOnce(&T, bool) -> i64 + Send,
    {
        gate::ensure_positive(bet, "Bet")?;
        self.with_account(key, |acc| {
            gate::ensure_funds(acc.wallet, bet)?;
            let lucky = acc.is_lucky(now);
            let drawn = draw();
            let delta = payout(&drawn, lucky);
            acc.wallet += delta;
            debug!(bet, delta, lucky, "gamble settled");
            Ok(GambleOutcome {
                draw: drawn,
                delta,
                lucky,
                wallet: acc.wallet,
            })
        })
        .await
    }

    /// Bets on a coin side.
    pub async fn coinflip<R: Rng + Send>(
        &self,
        key: AccountKey,
        bet: i64,
        call: CoinSide,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<GambleOutcome<CoinSide>> {
        self.gamble(
            key,
            bet,
            now,
            || gambling::flip_coin(rng),
            |side, lucky| gambling::coinflip_delta(*side == call, bet, lucky),
        )
        .await
    }

    /// Bets on the face of a die.
    pub async fn dice<R: Rng + Send>(
        &self,
        key: AccountKey,
        bet: i64,
        guess: u8,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<GambleOutcome<u8>> {
        if !(1..=6).contains(&guess) {
            return Err(Error::validation("Pick a number from 1 to 6."));
        }
        self.gamble(
            key,
            bet,
            now,
            || gambling::roll_die(rng),
            |roll, lucky| gambling::dice_delta(guess, *roll, bet, lucky),
        )
        .await
    }

    /// Spins the slot machine.
    pub async fn slots<R: Rng + Send>(
        &self,
        key: AccountKey,
        bet: i64,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<GambleOutcome<[Symbol; 3]>> {
        self.gamble(
            key,
            bet,
            now,
            || gambling::spin_reels(rng),
            |reels, lucky| gambling::slots_delta(*reels, bet, lucky),
        )
        .await
    }

    /// Buys `quantity` copies of `item`; returns the wallet afterwards.
    pub async fn buy(&self, key: AccountKey, item: Item, quantity: i64) -> Result<i64> {
        if !(1..=MAX_PURCHASE_QUANTITY).contains(&quantity) {
            return Err(Error::validation(format!(
                "Quantity must be between 1 and {MAX_PURCHASE_QUANTITY}."
            )));
        }
        let cost = item.price() * quantity;
        self.with_account(key, |acc| {
            acc.debit_wallet(cost)?;
            for _ in 0..quantity {
                acc.items.push(item);
            }
            Ok(acc.wallet)
        })
        .await
    }

    /// Uses one copy of `item`.
    pub async fn use_item(
        &self,
        key: AccountKey,
        item: Item,
        now: DateTime<Utc>,
    ) -> Result<UseOutcome> {
        match item.usage() {
            ItemUse::Consumable => {}
            ItemUse::Command(command) => {
                return Err(Error::validation(format!(
                    "A {item} is used with `{command}`."
                )));
            }
            ItemUse::Passive => {
                return Err(Error::validation(format!(
                    "A {item} works automatically while it's in your inventory."
                )));
            }
        }

        self.with_account(key, |acc| {
            if !acc.owns(item) {
                return Err(Error::validation(format!("You don't have a {item}.")));
            }
            let outcome = match item {
                Item::Potion if acc.boosts.double_earnings => {
                    return Err(Error::conflict("A potion is already active."));
                }
                Item::Potion => {
                    acc.boosts.double_earnings = true;
                    UseOutcome::DoubleEarningsArmed
                }
                Item::Sword if acc.boosts.rob_boost => {
                    return Err(Error::conflict("Your sword is already drawn."));
                }
                Item::Sword => {
                    acc.boosts.rob_boost = true;
                    UseOutcome::RobBoostArmed
                }
                Item::Shield => {
                    let until = now + SHIELD_DURATION;
                    acc.boosts.shield_until = Some(until);
                    UseOutcome::Shielded(until)
                }
                Item::LuckyCharm => {
                    let until = now + LUCKY_DURATION;
                    acc.boosts.lucky_until = Some(until);
                    UseOutcome::Lucky(until)
                }
                Item::XpScroll => {
                    let leveled_up = acc.add_xp(XP_SCROLL_AMOUNT);
                    UseOutcome::Experience {
                        level: acc.level,
                        leveled_up,
                    }
                }
                Item::GoldenTicket
                | Item::DailyBooster
                | Item::WeeklyBooster
                | Item::MonthlyBooster => {
                    return Err(Error::validation(format!("A {item} can't be used.")));
                }
            };
            acc.take_item(item);
            Ok(outcome)
        })
        .await
    }

    /// Takes a job; returns the previous one.
    pub async fn apply_job(&self, key: AccountKey, job: Job) -> Result<Option<Job>> {
        self.with_account(key, |acc| {
            if acc.job == Some(job) {
                return Err(Error::conflict(format!("You already work as a {job}.")));
            }
            Ok(acc.job.replace(job))
        })
        .await
    }

    /// Replaces the profile bio.
    pub async fn set_bio(&self, key: AccountKey, bio: &str) -> Result<()> {
        let bio = bio.trim();
        if bio.chars().count() > MAX_BIO_CHARS {
            return Err(Error::validation(format!(
                "Bios are limited to {MAX_BIO_CHARS} characters."
            )));
        }
        let bio = bio.to_string();
        self.with_account(key, |acc| {
            acc.bio = bio;
            Ok(())
        })
        .await
    }

    /// Awards a badge; returns `false` if it was already held.
    pub async fn grant_badge(&self, key: AccountKey, badge: &str) -> Result<bool> {
        let badge = badge.trim();
        if badge.is_empty() || badge.chars().count() > MAX_BADGE_CHARS {
            return Err(Error::validation(format!(
                "Badge names must be 1 to {MAX_BADGE_CHARS} characters."
            )));
        }
        let badge = badge.to_string();
        self.with_account(key, |acc| Ok(acc.badges.insert(badge)))
            .await
    }

    /// Reinitialises an account to defaults. The caller checks elevated access.
    pub async fn reset(&self, key: AccountKey) -> Result<EconomyAccount> {
        self.with_account(key, |acc| {
            *acc = EconomyAccount::new(key);
            Ok(acc.clone())
        })
        .await
    }

    /// Richest `limit` accounts in the guild by wallet + bank.
    pub async fn leaderboard(&self, guild_id: u64, limit: usize) -> Result<Vec<EconomyAccount>> {
        let mut accounts = self.store.guild_accounts(guild_id).await?;
        accounts.sort_by(|a, b| {
            b.net_worth()
                .cmp(&a.net_worth())
                .then(a.key.user_id.cmp(&b.key.user_id))
        });
        accounts.truncate(limit);
        Ok(accounts)
    }
}
