//! Shared test utilities.
//!
//! Helpers for building in-memory stores and databases, deterministic RNGs
//! and a fixed clock.

use crate::{
    core::ledger::Ledger,
    errors::Result,
    store::{KeyLocks, MemoryStore},
};
use chrono::{DateTime, TimeZone, Utc};
use rand::{SeedableRng, rngs::StdRng};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Creates an in-memory `SQLite` database with all tables initialized.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// A ledger over a fresh [`MemoryStore`].
#[must_use]
pub fn memory_ledger() -> Ledger {
    Ledger::new(Arc::new(MemoryStore::new()), KeyLocks::new())
}

/// Deterministic RNG for reproducible draws.
#[must_use]
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// A fixed instant, so cooldown arithmetic in tests is exact.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Routes `tracing` output through the test harness. Safe to call repeatedly.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
