//! Job catalog for `jobs` and `apply`.
//!
//! A job only gates `work`; the payout depends on the worker's level.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Jobs a member can apply for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Job {
    /// Cashier
    Cashier,
    /// Chef
    Chef,
    /// Mechanic
    Mechanic,
    /// Programmer
    Programmer,
    /// Doctor
    Doctor,
}

impl Job {
    /// Every job in listing order.
    pub const ALL: [Self; 5] = [
        Self::Cashier,
        Self::Chef,
        Self::Mechanic,
        Self::Programmer,
        Self::Doctor,
    ];

    /// Identifier used in commands and storage.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Cashier => "cashier",
            Self::Chef => "chef",
            Self::Mechanic => "mechanic",
            Self::Programmer => "programmer",
            Self::Doctor => "doctor",
        }
    }

    /// Flavour line shown after a shift.
    #[must_use]
    pub const fn shift_line(self) -> &'static str {
        match self {
            Self::Cashier => "You scanned groceries all shift",
            Self::Chef => "You cooked through the dinner rush",
            Self::Mechanic => "You fixed a stubborn gearbox",
            Self::Programmer => "You closed three tickets and opened five",
            Self::Doctor => "You saw a waiting room full of patients",
        }
    }
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Job {
    type Err = crate::errors::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|job| job.id() == normalized)
            .ok_or_else(|| crate::errors::Error::not_found(format!("Job `{}`", s.trim())))
    }
}
