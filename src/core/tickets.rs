//! Support ticket kinds and channel naming.

use crate::errors::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Custom id of the ticket panel's select menu.
pub const OPEN_TICKET_ID: &str = "ticket:open";
/// Custom id of the close button inside a ticket channel.
pub const CLOSE_TICKET_ID: &str = "ticket:close";

/// Discord caps channel names at 100 characters.
const MAX_CHANNEL_NAME: usize = 100;

/// What a ticket is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketKind {
    /// General help
    Support,
    /// Reporting another member
    Report,
    /// Appealing a moderation action
    Appeal,
}

impl TicketKind {
    /// Every kind, in panel order.
    pub const ALL: [Self; 3] = [Self::Support, Self::Report, Self::Appeal];

    /// Value used in the select menu and channel names.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Support => "support",
            Self::Report => "report",
            Self::Appeal => "appeal",
        }
    }

    /// Select menu label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Support => "Support",
            Self::Report => "Report a member",
            Self::Appeal => "Appeal",
        }
    }

    /// Select menu description.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Support => "Get help from the staff team",
            Self::Report => "Report rule-breaking behaviour",
            Self::Appeal => "Appeal a warning, mute or jail",
        }
    }
}

impl fmt::Display for TicketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TicketKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::not_found(format!("ticket type `{s}`")))
    }
}

/// Channel name for a new ticket: `<kind>-<username>`, lowercased, with
/// anything other than ASCII letters and digits collapsed into single dashes.
#[must_use]
pub fn channel_name(kind: TicketKind, username: &str) -> String {
    let mut slug = String::with_capacity(username.len());
    for c in username.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    let slug = if slug.is_empty() { "user" } else { slug };

    let mut name = format!("{}-{slug}", kind.id());
    name.truncate(MAX_CHANNEL_NAME);
    name
}
