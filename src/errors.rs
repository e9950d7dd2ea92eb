//! Unified error type for the bot.
//!
//! Domain failures (validation, permission, cooldown, funds, missing records,
//! conflicts) each carry enough detail to render a distinct denial message.
//! Infrastructure failures (database, serialization, Discord) wrap the
//! underlying library error.

use chrono::TimeDelta;
use thiserror::Error;

/// All errors produced by the bot.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be loaded or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// A command argument was missing or malformed
    #[error("{message}")]
    Validation {
        /// Why the argument was rejected
        message: String,
    },

    /// The actor is not allowed to perform this action
    #[error("Permission denied: {reason}")]
    PermissionDenied {
        /// Why access was refused
        reason: String,
    },

    /// A time-gated action was invoked before its window elapsed
    #[error("You can {action} again in {}", format_remaining(.remaining))]
    CooldownActive {
        /// Name of the gated action
        action: &'static str,
        /// Time left until the action is available
        remaining: TimeDelta,
    },

    /// The relevant balance does not cover the requested amount
    #[error("Insufficient funds: you have {available} coins but need {required}")]
    InsufficientFunds {
        /// Balance at the time of the check
        available: i64,
        /// Amount the operation needed
        required: i64,
    },

    /// A referenced record does not exist
    #[error("{what} not found")]
    NotFound {
        /// Description of the missing record
        what: String,
    },

    /// A record with the same key is already live
    #[error("{message}")]
    Conflict {
        /// What collided
        message: String,
    },

    /// A downstream notification could not be delivered
    #[error("Could not deliver notification: {message}")]
    ExternalDelivery {
        /// Delivery failure detail
        message: String,
    },

    /// Database error from `SeaORM`
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// A stored JSON column could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Writing into a reply buffer failed
    #[error("Formatting error: {0}")]
    Format(#[from] std::fmt::Error),

    /// A required environment variable is missing
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Serenity/Poise framework error
    #[error("Discord error: {0}")]
    Framework(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Framework(Box::new(value))
    }
}

impl Error {
    /// Shorthand for a [`Error::Validation`] with the given message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Shorthand for a [`Error::PermissionDenied`] with the given reason.
    pub fn denied(reason: impl Into<String>) -> Self {
        Self::PermissionDenied {
            reason: reason.into(),
        }
    }

    /// Shorthand for a [`Error::NotFound`] describing the missing record.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Shorthand for a [`Error::Conflict`] with the given message.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Whether this error is a user-facing denial rather than an internal fault.
    #[must_use]
    pub const fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. }
                | Self::PermissionDenied { .. }
                | Self::CooldownActive { .. }
                | Self::InsufficientFunds { .. }
                | Self::NotFound { .. }
                | Self::Conflict { .. }
        )
    }
}

/// Renders a remaining cooldown as `1h 5m 3s`, dropping leading zero units.
#[must_use]
pub fn format_remaining(remaining: &TimeDelta) -> String {
    let total = remaining.num_seconds().max(1);
    let (days, hours, minutes, seconds) = (
        total / 86_400,
        (total % 86_400) / 3_600,
        (total % 3_600) / 60,
        total % 60,
    );
    if days > 0 {
        format!("{days}d {hours}h {minutes}m")
    } else if hours > 0 {
        format!("{hours}h {minutes}m {seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else {
        format!("{seconds}s")
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_remaining_units() {
        assert_eq!(format_remaining(&TimeDelta::seconds(42)), "42s");
        assert_eq!(format_remaining(&TimeDelta::seconds(125)), "2m 5s");
        assert_eq!(format_remaining(&TimeDelta::seconds(3_725)), "1h 2m 5s");
        assert_eq!(format_remaining(&(TimeDelta::days(2) + TimeDelta::hours(3))), "2d 3h 0m");
        // Sub-second remainders still read as a wait.
        assert_eq!(format_remaining(&TimeDelta::milliseconds(300)), "1s");
    }

    #[test]
    fn test_cooldown_message_names_action() {
        let err = Error::CooldownActive {
            action: "work",
            remaining: TimeDelta::minutes(3),
        };
        assert_eq!(err.to_string(), "You can work again in 3m 0s");
        assert!(err.is_user_facing());
    }

    #[test]
    fn test_infrastructure_errors_are_not_user_facing() {
        let err = Error::Config {
            message: "bad".to_string(),
        };
        assert!(!err.is_user_facing());
    }
}
