//! Gates evaluated before a mutating operation.
//!
//! All functions here are pure: they inspect state and either allow the
//! operation or return the specific denial. None of them mutate anything.

use crate::errors::{Error, Result};
use chrono::{DateTime, TimeDelta, Utc};

/// Whether the actor may use premium-gated commands.
///
/// Administrators always pass; everyone else needs one of the guild's
/// configured premium roles.
#[must_use]
pub fn has_elevated_access(is_admin: bool, member_roles: &[u64], premium_roles: &[u64]) -> bool {
    is_admin || member_roles.iter().any(|role| premium_roles.contains(role))
}

/// Fails with [`Error::PermissionDenied`] unless the actor has elevated access.
pub fn ensure_elevated(is_admin: bool, member_roles: &[u64], premium_roles: &[u64]) -> Result<()> {
    if has_elevated_access(is_admin, member_roles, premium_roles) {
        Ok(())
    } else {
        Err(Error::denied(
            "this command needs administrator rights or a premium role",
        ))
    }
}

/// Whether at least `window` has passed since `last`. Never-used actions are available.
#[must_use]
pub fn cooldown_elapsed(last: Option<DateTime<Utc>>, window: TimeDelta, now: DateTime<Utc>) -> bool {
    cooldown_remaining(last, window, now).is_none()
}

/// Time left before the action is available again, `None` if it already is.
#[must_use]
pub fn cooldown_remaining(
    last: Option<DateTime<Utc>>,
    window: TimeDelta,
    now: DateTime<Utc>,
) -> Option<TimeDelta> {
    let last = last?;
    let elapsed = now - last;
    (elapsed < window).then(|| window - elapsed)
}

/// Fails with [`Error::CooldownActive`] while `action` is still cooling down.
pub fn ensure_cooldown(
    action: &'static str,
    last: Option<DateTime<Utc>>,
    window: TimeDelta,
    now: DateTime<Utc>,
) -> Result<()> {
    match cooldown_remaining(last, window, now) {
        Some(remaining) => Err(Error::CooldownActive { action, remaining }),
        None => Ok(()),
    }
}

/// Whether `balance` covers `amount`.
#[must_use]
pub const fn sufficient_funds(balance: i64, amount: i64) -> bool {
    balance >= amount
}

/// Fails with [`Error::InsufficientFunds`] unless `balance` covers `amount`.
pub fn ensure_funds(balance: i64, amount: i64) -> Result<()> {
    if sufficient_funds(balance, amount) {
        Ok(())
    } else {
        Err(Error::InsufficientFunds {
            available: balance,
            required: amount,
        })
    }
}

/// Fails with [`Error::Validation`] unless `amount` is strictly positive.
pub fn ensure_positive(amount: i64, what: &str) -> Result<()> {
    if amount > 0 {
        Ok(())
    } else {
        Err(Error::validation(format!("{what} must be greater than zero")))
    }
}
