//! Core business logic, independent of Discord.
//!
//! Everything here works on plain IDs, a [`Store`](crate::store::Store), the
//! current time and an RNG, so it can be tested without a gateway connection.

/// Role applications awaiting review
pub mod applications;
/// Gambling draws and payouts
pub mod gambling;
/// Pre-mutation checks
pub mod gate;
/// Shop catalog
pub mod items;
/// Job catalog
pub mod jobs;
/// Wallet, bank, shop and reward operations
pub mod ledger;
/// Guild lotteries and the draw scheduler
pub mod lottery;
/// Warnings, jail, mutes and guild settings
pub mod moderation;
/// Support tickets
pub mod tickets;
