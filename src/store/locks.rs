//! Per-key async mutexes.
//!
//! Every read-modify-write against one record holds that record's lock for the
//! whole load, mutate, save sequence, so two events touching the same account
//! or lottery never interleave.

use crate::models::AccountKey;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Records that can be locked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockKey {
    /// One economy account
    Account(AccountKey),
    /// One guild's lottery
    Lottery(u64),
    /// One guild's settings
    Settings(u64),
    /// One member's moderation records
    Member(AccountKey),
}

/// Table of lazily created per-key mutexes. Cloning shares the table.
#[derive(Debug, Clone, Default)]
pub struct KeyLocks {
    locks: Arc<DashMap<LockKey, Arc<Mutex<()>>>>,
}

impl KeyLocks {
    /// Creates an empty lock table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `key`.
    pub async fn lock(&self, key: LockKey) -> OwnedMutexGuard<()> {
        // Clone the Arc out so the shard lock is released before awaiting.
        let mutex = Arc::clone(self.locks.entry(key).or_default().value());
        mutex.lock_owned().await
    }

    /// Number of keys that have ever been locked.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    /// Whether no key has been locked yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_key_is_exclusive() {
        let locks = KeyLocks::new();
        let key = LockKey::Lottery(7);
        let guard = locks.lock(key).await;

        let contender = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _guard = locks.lock(key).await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());

        drop(guard);
        assert!(contender.await.is_ok());
    }

    #[tokio::test]
    async fn test_different_keys_do_not_block() {
        let locks = KeyLocks::new();
        let _a = locks.lock(LockKey::Lottery(1)).await;
        let _b = locks.lock(LockKey::Account(AccountKey::new(1, 2))).await;
        assert_eq!(locks.len(), 2);
    }
}
