//! In-memory registry of live game sessions.
//!
//! Each entry carries a generation id. The expiry timer spawned on creation
//! holds only the key and that id, and removes the entry only if both still
//! match, so a timer outliving its game (finished early, or replaced by a new
//! game under the same key) does nothing.

use super::{GameKey, GameKind, GamePayload};
use crate::errors::{Error, Result};
use chrono::{DateTime, Utc};
use dashmap::{
    DashMap,
    mapref::entry::{Entry, OccupiedEntry},
};
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// A live session.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveGame {
    /// Generation id, unique per registry
    pub id: u64,
    /// Channel the game is played in
    pub channel_id: u64,
    /// Kind-specific state
    pub payload: GamePayload,
    /// When the game started
    pub created_at: DateTime<Utc>,
    /// When the game times out
    pub expires_at: DateTime<Utc>,
}

/// Notice for a game that timed out.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpiredGame {
    /// Key the game was registered under
    pub key: GameKey,
    /// Channel to announce in
    pub channel_id: u64,
    /// Final state, for revealing answers
    pub payload: GamePayload,
}

/// What a state-machine step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step<T> {
    /// Game continues
    Continue(T),
    /// Game is over and leaves the registry
    Finished(T),
}

impl<T> Step<T> {
    fn into_parts(self) -> (T, bool) {
        match self {
            Self::Continue(value) => (value, false),
            Self::Finished(value) => (value, true),
        }
    }
}

/// Shared handle; clones see the same games.
#[derive(Debug, Clone)]
pub struct GameRegistry {
    games: Arc<DashMap<GameKey, ActiveGame>>,
    next_id: Arc<AtomicU64>,
    expired: mpsc::UnboundedSender<ExpiredGame>,
}

impl GameRegistry {
    /// Creates a registry and the receiver for expiry notices.
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ExpiredGame>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let registry = Self {
            games: Arc::new(DashMap::new()),
            next_id: Arc::new(AtomicU64::new(1)),
            expired: tx,
        };
        (registry, rx)
    }

    /// Registers a game with its kind's TTL. Fails with [`Error::Conflict`]
    /// while a game with the same key is live.
    pub fn create(&self, key: GameKey, channel_id: u64, payload: GamePayload) -> Result<u64> {
        let ttl = key.kind.ttl();
        self.create_with_ttl(key, channel_id, payload, ttl)
    }

    /// Registers a game that times out after `ttl`.
    pub fn create_with_ttl(
        &self,
        key: GameKey,
        channel_id: u64,
        payload: GamePayload,
        ttl: Duration,
    ) -> Result<u64> {
        let id = match self.games.entry(key.clone()) {
            Entry::Occupied(_) => {
                return Err(Error::conflict(format!(
                    "A {} game is already running for these players.",
                    key.kind
                )));
            }
            Entry::Vacant(slot) => {
                let id = self.next_id.fetch_add(1, Ordering::Relaxed);
                let created_at = Utc::now();
                let expires_at = chrono::TimeDelta::from_std(ttl)
                    .map_or(created_at, |ttl| created_at + ttl);
                slot.insert(ActiveGame {
                    id,
                    channel_id,
                    payload,
                    created_at,
                    expires_at,
                });
                id
            }
        };
        debug!(?key, id, "game created");
        self.spawn_expiry(key, id, ttl);
        Ok(id)
    }

    fn spawn_expiry(&self, key: GameKey, id: u64, ttl: Duration) {
        let games = Arc::clone(&self.games);
        let expired = self.expired.clone();
        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            let Some((key, game)) = games.remove_if(&key, |_, game| game.id == id) else {
                return;
            };
            debug!(?key, id, "game expired");
            let notice = ExpiredGame {
                key,
                channel_id: game.channel_id,
                payload: game.payload,
            };
            if expired.send(notice).is_err() {
                warn!("Game expiry receiver is gone; dropping notice");
            }
        });
    }

    /// Snapshot of a live game.
    #[must_use]
    pub fn get(&self, key: &GameKey) -> Option<ActiveGame> {
        self.games.get(key).map(|game| game.value().clone())
    }

    /// Finds the live `kind` game `user` plays in `channel_id`.
    #[must_use]
    pub fn find_by_participant(&self, user: u64, kind: GameKind, channel_id: u64) -> Option<GameKey> {
        self.games
            .iter()
            .find(|entry| {
                entry.key().kind == kind
                    && entry.key().involves(user)
                    && entry.value().channel_id == channel_id
            })
            .map(|entry| entry.key().clone())
    }

    /// Runs one state-machine step under the entry lock.
    ///
    /// An error leaves the game as it was; [`Step::Finished`] removes it in
    /// the same critical section.
    pub fn update<T, F>(&self, key: &GameKey, step: F) -> Result<T>
    where
        F: FnOnce(&mut GamePayload) -> Result<Step<T>>,
    {
        match self.games.entry(key.clone()) {
            Entry::Vacant(_) => Err(Error::not_found(format!("a running {} game", key.kind))),
            Entry::Occupied(entry) => Self::commit(entry, |_, payload| step(payload)),
        }
    }

    /// Like [`update`](Self::update), but addresses the game by its
    /// generation id, as carried in the custom ids of its buttons. The step
    /// also sees the key, to check who is playing.
    pub fn update_session<T, F>(&self, id: u64, step: F) -> Result<T>
    where
        F: FnOnce(&GameKey, &mut GamePayload) -> Result<Step<T>>,
    {
        let gone = || Error::conflict("That game has already ended.");
        let key = self
            .games
            .iter()
            .find(|entry| entry.value().id == id)
            .map(|entry| entry.key().clone())
            .ok_or_else(gone)?;
        match self.games.entry(key) {
            Entry::Occupied(entry) if entry.get().id == id => Self::commit(entry, step),
            _ => Err(gone()),
        }
    }

    fn commit<T, F>(mut entry: OccupiedEntry<'_, GameKey, ActiveGame>, step: F) -> Result<T>
    where
        F: FnOnce(&GameKey, &mut GamePayload) -> Result<Step<T>>,
    {
        let mut draft = entry.get().payload.clone();
        let (value, finished) = step(entry.key(), &mut draft)?.into_parts();
        if finished {
            let (key, game) = entry.remove_entry();
            debug!(?key, id = game.id, "game finished");
        } else {
            entry.get_mut().payload = draft;
        }
        Ok(value)
    }

    /// Removes a game without notice.
    pub fn remove(&self, key: &GameKey) -> Option<ActiveGame> {
        self.games.remove(key).map(|(_, game)| game)
    }

    /// Number of live games.
    #[must_use]
    pub fn len(&self) -> usize {
        self.games.len()
    }

    /// Whether no game is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::{
        guess::GuessGame,
        rps::{RpsChoice, RpsGame},
        tictactoe::{Mark, TicTacToe},
    };

    fn guess_payload(secret: i64) -> GamePayload {
        GamePayload::Guess(GuessGame::with_secret(secret))
    }

    async fn settle() {
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_duplicate_key_conflicts_until_resolved() -> Result<()> {
        let (registry, _rx) = GameRegistry::new();
        let key = GameKey::duel(GameKind::Rps, 1, 2);
        registry.create(key.clone(), 9, GamePayload::Rps(RpsGame::new(1, 2)?))?;

        assert!(matches!(
            registry.create(key.clone(), 9, GamePayload::Rps(RpsGame::new(1, 2)?)),
            Err(Error::Conflict { .. })
        ));

        for (user, choice) in [(1, RpsChoice::Rock), (2, RpsChoice::Paper)] {
            registry.update(&key, |payload| {
                let GamePayload::Rps(game) = payload else {
                    return Err(Error::not_found("rps game"));
                };
                Ok(match game.choose(user, choice)? {
                    Some(outcome) => Step::Finished(Some(outcome)),
                    None => Step::Continue(None),
                })
            })?;
        }
        assert!(registry.get(&key).is_none());
        assert!(registry.create(key, 9, GamePayload::Rps(RpsGame::new(1, 2)?)).is_ok());
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_expiry_notifies_once() -> Result<()> {
        let (registry, mut rx) = GameRegistry::new();
        let key = GameKey::solo(GameKind::Guess, 1);
        registry.create(key.clone(), 9, guess_payload(40))?;

        let notice = rx.recv().await;
        assert_eq!(notice.as_ref().map(|n| n.key.clone()), Some(key.clone()));
        assert_eq!(notice.map(|n| n.payload), Some(guess_payload(40)));
        assert!(registry.is_empty());

        tokio::time::sleep(GameKind::Guess.ttl()).await;
        settle().await;
        assert!(rx.try_recv().is_err());
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_timer_after_completion_is_silent() -> Result<()> {
        let (registry, mut rx) = GameRegistry::new();
        let key = GameKey::solo(GameKind::Guess, 1);
        registry.create(key.clone(), 9, guess_payload(40))?;

        registry.update(&key, |_| Ok(Step::Finished(())))?;
        tokio::time::sleep(GameKind::Guess.ttl() + Duration::from_secs(1)).await;
        settle().await;
        assert!(rx.try_recv().is_err());
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_timer_spares_replacement_game() -> Result<()> {
        let (registry, mut rx) = GameRegistry::new();
        let key = GameKey::solo(GameKind::Guess, 1);
        let ttl = GameKind::Guess.ttl();
        let first = registry.create(key.clone(), 9, guess_payload(10))?;

        tokio::time::sleep(ttl / 2).await;
        registry.remove(&key);
        let second = registry.create(key.clone(), 9, guess_payload(20))?;
        assert_ne!(first, second);

        // The first timer fires here and must leave the new game alone.
        tokio::time::sleep(ttl / 2 + Duration::from_secs(1)).await;
        settle().await;
        assert!(rx.try_recv().is_err());
        assert_eq!(registry.get(&key).map(|g| g.id), Some(second));

        let notice = rx.recv().await;
        assert_eq!(notice.map(|n| n.payload), Some(guess_payload(20)));
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_step_keeps_state() -> Result<()> {
        let (registry, _rx) = GameRegistry::new();
        let key = GameKey::duel(GameKind::Rps, 1, 2);
        registry.create(key.clone(), 9, GamePayload::Rps(RpsGame::new(1, 2)?))?;

        let result = registry.update(&key, |payload| {
            if let GamePayload::Rps(game) = payload {
                game.choose(1, RpsChoice::Rock)?;
            }
            Err::<Step<()>, _>(Error::validation("abort"))
        });
        assert!(result.is_err());
        let Some(ActiveGame {
            payload: GamePayload::Rps(game),
            ..
        }) = registry.get(&key)
        else {
            return Err(Error::not_found("rps game"));
        };
        assert!(!game.has_chosen(1));
        Ok(())
    }

    fn ttt_payload(x: u64, o: u64) -> Result<GamePayload> {
        Ok(GamePayload::TicTacToe(TicTacToe::new(x, o)?))
    }

    fn board_of(registry: &GameRegistry, key: &GameKey) -> Option<TicTacToe> {
        match registry.get(key)?.payload {
            GamePayload::TicTacToe(board) => Some(board),
            _ => None,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_reversed_duel_conflicts() -> Result<()> {
        let (registry, _rx) = GameRegistry::new();
        registry.create(GameKey::duel(GameKind::TicTacToe, 1, 2), 9, ttt_payload(1, 2)?)?;

        assert!(matches!(
            registry.create(GameKey::duel(GameKind::TicTacToe, 2, 1), 9, ttt_payload(2, 1)?),
            Err(Error::Conflict { .. })
        ));
        assert_eq!(registry.len(), 1);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_update_reaches_the_clicked_game() -> Result<()> {
        let (registry, _rx) = GameRegistry::new();
        let vs_two = GameKey::duel(GameKind::TicTacToe, 1, 2);
        let vs_three = GameKey::duel(GameKind::TicTacToe, 1, 3);
        let first = registry.create(vs_two.clone(), 9, ttt_payload(1, 2)?)?;
        let second = registry.create(vs_three.clone(), 9, ttt_payload(1, 3)?)?;

        for (id, cell) in [(first, 0), (second, 8)] {
            registry.update_session(id, |key, payload| {
                assert!(key.involves(1));
                let GamePayload::TicTacToe(board) = payload else {
                    return Err(Error::not_found("board"));
                };
                board.play(1, cell)?;
                Ok(Step::Continue(()))
            })?;
        }

        let two = board_of(&registry, &vs_two).ok_or_else(|| Error::not_found("1v2 board"))?;
        let three = board_of(&registry, &vs_three).ok_or_else(|| Error::not_found("1v3 board"))?;
        assert_eq!(two.board()[0], Some(Mark::X));
        assert_eq!(two.board()[8], None);
        assert_eq!(three.board()[8], Some(Mark::X));
        assert_eq!(three.board()[0], None);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_update_rejects_replaced_game() -> Result<()> {
        let (registry, _rx) = GameRegistry::new();
        let key = GameKey::duel(GameKind::TicTacToe, 1, 2);
        let old = registry.create(key.clone(), 9, ttt_payload(1, 2)?)?;
        registry.remove(&key);
        registry.create(key.clone(), 9, ttt_payload(2, 1)?)?;

        let result = registry.update_session(old, |_, _| Ok(Step::Finished(())));
        assert!(matches!(result, Err(Error::Conflict { .. })));
        assert!(registry.get(&key).is_some());
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_find_by_participant() -> Result<()> {
        let (registry, _rx) = GameRegistry::new();
        let key = GameKey::duel(GameKind::TicTacToe, 1, 2);
        registry.create(
            key.clone(),
            9,
            GamePayload::TicTacToe(TicTacToe::new(1, 2)?),
        )?;

        assert_eq!(registry.find_by_participant(2, GameKind::TicTacToe, 9), Some(key));
        assert_eq!(registry.find_by_participant(2, GameKind::TicTacToe, 8), None);
        assert_eq!(registry.find_by_participant(3, GameKind::TicTacToe, 9), None);
        assert_eq!(registry.find_by_participant(1, GameKind::Rps, 9), None);
        Ok(())
    }
}
