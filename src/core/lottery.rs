//! Guild lotteries: ticket sales, manual draws and the periodic scheduler.
//!
//! Every lottery mutation holds the guild's lottery lock. Crediting the winner
//! takes the winner's account lock inside it; account operations never take a
//! lottery lock, so the order is always lottery then account.

use crate::{
    core::{items::Item, ledger::Ledger},
    errors::{Error, Result},
    models::{AccountKey, EconomyAccount, LotteryState},
    store::LockKey,
};
use chrono::{DateTime, Utc};
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::time::Duration;
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, error, info};

/// Price of one lottery ticket.
pub const TICKET_PRICE: i64 = 100;
/// Most tickets bought in one go.
pub const MAX_TICKETS_PER_JOIN: i64 = 100;

/// Snapshot of a guild's lottery from one member's point of view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LotteryInfo {
    /// Coins in the pot
    pub pot: i64,
    /// Tickets sold in total
    pub tickets: usize,
    /// Tickets held by the asking member
    pub own_tickets: usize,
    /// When the scheduler will next draw
    pub next_draw: DateTime<Utc>,
}

impl LotteryInfo {
    fn of(state: &LotteryState, user_id: u64) -> Self {
        Self {
            pot: state.pot,
            tickets: state.participants.len(),
            own_tickets: state.tickets_of(user_id),
            next_draw: state.next_draw,
        }
    }
}

/// A completed draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawResult {
    /// Guild the lottery belongs to
    pub guild_id: u64,
    /// Winning member
    pub winner: u64,
    /// Coins credited to the winner
    pub pot: i64,
    /// Tickets that were in the draw
    pub tickets: usize,
}

/// Lottery operations over the ledger's store and locks.
#[derive(Debug, Clone)]
pub struct LotteryDesk {
    ledger: Ledger,
}

impl LotteryDesk {
    /// Creates a desk sharing `ledger`'s store and lock table.
    #[must_use]
    pub const fn new(ledger: Ledger) -> Self {
        Self { ledger }
    }

    async fn load(&self, guild_id: u64, now: DateTime<Utc>) -> Result<LotteryState> {
        Ok(self
            .ledger
            .store()
            .load_lottery(guild_id)
            .await?
            .unwrap_or_else(|| LotteryState::new(guild_id, now)))
    }

    /// Current pot, ticket counts and next draw time.
    pub async fn info(&self, key: AccountKey, now: DateTime<Utc>) -> Result<LotteryInfo> {
        let state = self.load(key.guild_id, now).await?;
        Ok(LotteryInfo::of(&state, key.user_id))
    }

    /// Buys `count` tickets at [`TICKET_PRICE`] each.
    pub async fn join(
        &self,
        key: AccountKey,
        count: i64,
        now: DateTime<Utc>,
    ) -> Result<LotteryInfo> {
        if !(1..=MAX_TICKETS_PER_JOIN).contains(&count) {
            return Err(Error::validation(format!(
                "You can buy between 1 and {MAX_TICKETS_PER_JOIN} tickets at once."
            )));
        }
        let cost = count * TICKET_PRICE;

        let _guard = self.ledger.locks().lock(LockKey::Lottery(key.guild_id)).await;
        let mut state = self.load(key.guild_id, now).await?;
        self.ledger
            .with_account(key, |acc| acc.debit_wallet(cost))
            .await?;

        for _ in 0..count {
            state.participants.push(key.user_id);
        }
        state.pot += cost;
        if let Err(e) = self.ledger.store().save_lottery(&state).await {
            self.refund(key, |acc| acc.credit_wallet(cost)).await;
            return Err(e);
        }
        debug!(guild_id = key.guild_id, count, pot = state.pot, "lottery tickets sold");
        Ok(LotteryInfo::of(&state, key.user_id))
    }

    /// Enters once by spending a golden ticket. The pot does not grow.
    pub async fn join_free(&self, key: AccountKey, now: DateTime<Utc>) -> Result<LotteryInfo> {
        let _guard = self.ledger.locks().lock(LockKey::Lottery(key.guild_id)).await;
        let mut state = self.load(key.guild_id, now).await?;
        self.ledger
            .with_account(key, |acc| {
                if acc.take_item(Item::GoldenTicket) {
                    Ok(())
                } else {
                    Err(Error::validation(format!(
                        "You don't have a {}.",
                        Item::GoldenTicket
                    )))
                }
            })
            .await?;

        state.participants.push(key.user_id);
        if let Err(e) = self.ledger.store().save_lottery(&state).await {
            self.refund(key, |acc| acc.items.push(Item::GoldenTicket)).await;
            return Err(e);
        }
        Ok(LotteryInfo::of(&state, key.user_id))
    }

    /// Gives back what an entry cost after the lottery itself failed to save.
    async fn refund<F>(&self, key: AccountKey, give_back: F)
    where
        F: FnOnce(&mut EconomyAccount) + Send,
    {
        let refunded = self
            .ledger
            .with_account(key, |acc| {
                give_back(acc);
                Ok(())
            })
            .await;
        if let Err(e) = refunded {
            error!(
                guild_id = key.guild_id,
                user_id = key.user_id,
                "Failed to refund a lottery entry: {e}"
            );
        }
    }

    /// Draws now. With no tickets sold this returns `None` and leaves the
    /// lottery untouched, including its scheduled draw time.
    pub async fn draw_manual<R: Rng + Send>(
        &self,
        guild_id: u64,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<Option<DrawResult>> {
        let _guard = self.ledger.locks().lock(LockKey::Lottery(guild_id)).await;
        let mut state = self.load(guild_id, now).await?;
        if state.participants.is_empty() {
            return Ok(None);
        }
        self.settle(&mut state, now, rng).await
    }

    /// Draws every lottery whose time has come. Due lotteries are reset even
    /// when nobody bought a ticket.
    pub async fn run_due_draws<R: Rng + Send>(
        &self,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<Vec<DrawResult>> {
        let mut results = Vec::new();
        for candidate in self.ledger.store().lotteries().await? {
            if now < candidate.next_draw {
                continue;
            }
            let _guard = self
                .ledger
                .locks()
                .lock(LockKey::Lottery(candidate.guild_id))
                .await;
            // A manual draw may have run while we waited for the lock.
            let mut state = self.load(candidate.guild_id, now).await?;
            if now < state.next_draw {
                continue;
            }
            if let Some(result) = self.settle(&mut state, now, rng).await? {
                results.push(result);
            }
        }
        Ok(results)
    }

    /// Picks a winner if there are tickets, pays out, and resets. Caller holds the lottery lock.
    async fn settle<R: Rng + Send>(
        &self,
        state: &mut LotteryState,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<Option<DrawResult>> {
        let result = if state.participants.is_empty() {
            None
        } else {
            let winner = state.participants[rng.gen_range(0..state.participants.len())];
            let pot = state.pot;
            self.ledger
                .with_account(AccountKey::new(state.guild_id, winner), |acc| {
                    acc.credit_wallet(pot);
                    Ok(())
                })
                .await?;
            info!(guild_id = state.guild_id, winner, pot, "lottery drawn");
            Some(DrawResult {
                guild_id: state.guild_id,
                winner,
                pot,
                tickets: state.participants.len(),
            })
        };
        state.reset(now);
        self.ledger.store().save_lottery(state).await?;
        Ok(result)
    }
}

/// Spawns the periodic draw task. The first check runs immediately.
///
/// Every completed draw is sent on `results`; the task stops once the
/// receiver is dropped.
pub fn spawn_lottery_scheduler(
    desk: LotteryDesk,
    period: Duration,
    results: mpsc::UnboundedSender<DrawResult>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut rng = StdRng::from_entropy();
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            match desk.run_due_draws(Utc::now(), &mut rng).await {
                Ok(draws) => {
                    for draw in draws {
                        if results.send(draw).is_err() {
                            info!("lottery result receiver dropped, stopping scheduler");
                            return;
                        }
                    }
                }
                Err(e) => error!("Scheduled lottery draw failed: {e}"),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{GuildSettings, JailRecord, Warning},
        store::{KeyLocks, MemoryStore, Store},
        test_utils::{fixed_now, memory_ledger, seeded_rng},
    };
    use async_trait::async_trait;
    use chrono::TimeDelta;
    use sea_orm::DbErr;
    use std::sync::Arc;

    const GUILD: u64 = 77;

    fn key(user: u64) -> AccountKey {
        AccountKey::new(GUILD, user)
    }

    async fn seed_lottery(desk: &LotteryDesk, participants: Vec<u64>, next_draw: DateTime<Utc>) -> Result<()> {
        let state = LotteryState {
            guild_id: GUILD,
            pot: TICKET_PRICE * i64::try_from(participants.len()).unwrap_or_default(),
            participants,
            next_draw,
        };
        desk.ledger.store().save_lottery(&state).await
    }

    #[tokio::test]
    async fn test_join_charges_and_grows_pot() -> Result<()> {
        let ledger = memory_ledger();
        let desk = LotteryDesk::new(ledger.clone());
        let now = fixed_now();

        assert!(matches!(
            desk.join(key(1), 2, now).await,
            Err(Error::InsufficientFunds { .. })
        ));
        assert!(ledger.store().load_lottery(GUILD).await?.is_none());

        let info = desk.join(key(1), 1, now).await?;
        assert_eq!((info.pot, info.tickets, info.own_tickets), (100, 1, 1));
        assert_eq!(ledger.account(key(1)).await?.wallet, 0);

        assert!(desk.join(key(2), 0, now).await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn test_golden_ticket_entry_leaves_pot() -> Result<()> {
        let ledger = memory_ledger();
        let desk = LotteryDesk::new(ledger.clone());
        let now = fixed_now();

        assert!(matches!(
            desk.join_free(key(1), now).await,
            Err(Error::Validation { .. })
        ));
        ledger
            .with_account(key(1), |acc| {
                acc.items.push(Item::GoldenTicket);
                Ok(())
            })
            .await?;
        desk.join(key(2), 1, now).await?;
        let info = desk.join_free(key(1), now).await?;
        assert_eq!((info.pot, info.tickets, info.own_tickets), (100, 2, 1));
        Ok(())
    }

    /// Memory store whose lottery writes always fail.
    struct LotteryWritesFail(MemoryStore);

    #[async_trait]
    impl Store for LotteryWritesFail {
        async fn load_account(&self, key: AccountKey) -> Result<Option<EconomyAccount>> {
            self.0.load_account(key).await
        }
        async fn save_account(&self, account: &EconomyAccount) -> Result<()> {
            self.0.save_account(account).await
        }
        async fn guild_accounts(&self, guild_id: u64) -> Result<Vec<EconomyAccount>> {
            self.0.guild_accounts(guild_id).await
        }
        async fn load_lottery(&self, guild_id: u64) -> Result<Option<LotteryState>> {
            self.0.load_lottery(guild_id).await
        }
        async fn save_lottery(&self, _lottery: &LotteryState) -> Result<()> {
            Err(Error::Database(DbErr::Custom("disk full".to_string())))
        }
        async fn lotteries(&self) -> Result<Vec<LotteryState>> {
            self.0.lotteries().await
        }
        async fn append_warning(&self, warning: &Warning) -> Result<()> {
            self.0.append_warning(warning).await
        }
        async fn warnings(&self, guild_id: u64, user_id: u64) -> Result<Vec<Warning>> {
            self.0.warnings(guild_id, user_id).await
        }
        async fn load_settings(&self, guild_id: u64) -> Result<Option<GuildSettings>> {
            self.0.load_settings(guild_id).await
        }
        async fn save_settings(&self, settings: &GuildSettings) -> Result<()> {
            self.0.save_settings(settings).await
        }
        async fn load_jail(&self, guild_id: u64, user_id: u64) -> Result<Option<JailRecord>> {
            self.0.load_jail(guild_id, user_id).await
        }
        async fn save_jail(&self, record: &JailRecord) -> Result<()> {
            self.0.save_jail(record).await
        }
        async fn remove_jail(&self, guild_id: u64, user_id: u64) -> Result<Option<JailRecord>> {
            self.0.remove_jail(guild_id, user_id).await
        }
        async fn jailed(&self, guild_id: u64) -> Result<Vec<JailRecord>> {
            self.0.jailed(guild_id).await
        }
    }

    #[tokio::test]
    async fn test_failed_lottery_save_refunds_entry() -> Result<()> {
        let ledger = Ledger::new(
            Arc::new(LotteryWritesFail(MemoryStore::new())),
            KeyLocks::new(),
        );
        let desk = LotteryDesk::new(ledger.clone());
        let now = fixed_now();
        ledger
            .with_account(key(1), |acc| {
                acc.items.push(Item::GoldenTicket);
                Ok(())
            })
            .await?;

        assert!(matches!(desk.join(key(1), 1, now).await, Err(Error::Database(_))));
        assert!(matches!(desk.join_free(key(1), now).await, Err(Error::Database(_))));

        let account = ledger.account(key(1)).await?;
        assert_eq!(account.wallet, 100);
        assert_eq!(account.items, vec![Item::GoldenTicket]);
        Ok(())
    }

    #[tokio::test]
    async fn test_manual_draw_pays_winner_and_resets() -> Result<()> {
        let ledger = memory_ledger();
        let desk = LotteryDesk::new(ledger.clone());
        let now = fixed_now();
        seed_lottery(&desk, vec![1, 1, 2], now + TimeDelta::hours(3)).await?;

        let result = desk
            .draw_manual(GUILD, now, &mut seeded_rng(8))
            .await?
            .ok_or_else(|| Error::not_found("draw result"))?;
        assert_eq!(result.pot, 300);
        assert_eq!(result.tickets, 3);
        assert_eq!(ledger.account(key(result.winner)).await?.wallet, 400);

        let state = ledger.store().load_lottery(GUILD).await?;
        let state = state.unwrap_or_else(|| LotteryState::new(0, now));
        assert_eq!(state.pot, 0);
        assert!(state.participants.is_empty());
        assert_eq!(state.next_draw, now + LotteryState::draw_interval());
        Ok(())
    }

    #[tokio::test]
    async fn test_winner_odds_follow_ticket_counts() -> Result<()> {
        let now = fixed_now();
        let runs = 600;
        let mut wins_for_one = 0;
        for seed in 0..runs {
            let desk = LotteryDesk::new(memory_ledger());
            seed_lottery(&desk, vec![1, 1, 2], now).await?;
            if let Some(result) = desk.draw_manual(GUILD, now, &mut seeded_rng(seed)).await? {
                if result.winner == 1 {
                    wins_for_one += 1;
                }
            }
        }
        // Expect about two thirds.
        assert!((340..=460).contains(&wins_for_one), "wins = {wins_for_one}");
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_manual_draw_changes_nothing() -> Result<()> {
        let ledger = memory_ledger();
        let desk = LotteryDesk::new(ledger.clone());
        let now = fixed_now();
        let scheduled = now - TimeDelta::hours(1);
        seed_lottery(&desk, Vec::new(), scheduled).await?;

        assert!(desk.draw_manual(GUILD, now, &mut seeded_rng(1)).await?.is_none());
        let state = ledger.store().load_lottery(GUILD).await?;
        assert_eq!(state.map(|s| s.next_draw), Some(scheduled));
        Ok(())
    }

    #[tokio::test]
    async fn test_scheduled_draw_resets_empty_due_lottery() -> Result<()> {
        let ledger = memory_ledger();
        let desk = LotteryDesk::new(ledger.clone());
        let now = fixed_now();
        seed_lottery(&desk, Vec::new(), now - TimeDelta::minutes(1)).await?;

        let results = desk.run_due_draws(now, &mut seeded_rng(2)).await?;
        assert!(results.is_empty());
        let state = ledger.store().load_lottery(GUILD).await?;
        assert_eq!(
            state.map(|s| s.next_draw),
            Some(now + LotteryState::draw_interval())
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_scheduled_draw_skips_lotteries_not_due() -> Result<()> {
        let ledger = memory_ledger();
        let desk = LotteryDesk::new(ledger.clone());
        let now = fixed_now();
        seed_lottery(&desk, vec![4], now + TimeDelta::minutes(5)).await?;

        assert!(desk.run_due_draws(now, &mut seeded_rng(3)).await?.is_empty());
        let results = desk
            .run_due_draws(now + TimeDelta::minutes(5), &mut seeded_rng(3))
            .await?;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].winner, 4);
        assert_eq!(ledger.account(key(4)).await?.wallet, 200);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_scheduler_reports_draws() -> Result<()> {
        let ledger = memory_ledger();
        let desk = LotteryDesk::new(ledger.clone());
        seed_lottery(&desk, vec![9], Utc::now() - TimeDelta::minutes(1)).await?;

        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = spawn_lottery_scheduler(desk, Duration::from_secs(300), tx);
        let result = rx.recv().await;
        assert_eq!(result.map(|r| r.winner), Some(9));
        handle.abort();
        Ok(())
    }
}
