//! Role applications.
//!
//! A member submits one application at a time. It waits in the desk until a
//! reviewer approves or denies it from the buttons on the review message.
//! Pending applications live in memory only.

use crate::{
    errors::{Error, Result},
    models::{AccountKey, GuildSettings},
};
use chrono::{DateTime, Utc};
use dashmap::{DashMap, mapref::entry::Entry};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

/// Prefix of the review buttons' custom ids.
pub const APPLICATION_PREFIX: &str = "application";
/// Longest application text accepted.
pub const MAX_ANSWER_LEN: usize = 1000;

/// A reviewer's verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Grant the application role
    Approve,
    /// Turn the application down
    Deny,
}

impl Decision {
    /// Both verdicts, in button order.
    pub const ALL: [Self; 2] = [Self::Approve, Self::Deny];

    /// Value used in custom ids.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Deny => "deny",
        }
    }

    /// Custom id of this verdict's button for `applicant`.
    #[must_use]
    pub fn custom_id(self, applicant: u64) -> String {
        format!("{APPLICATION_PREFIX}:{}:{applicant}", self.id())
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Approve => "Approve",
            Self::Deny => "Deny",
        })
    }
}

impl FromStr for Decision {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|decision| decision.id() == s)
            .ok_or_else(|| Error::validation(format!("`{s}` is not a review decision.")))
    }
}

/// Parses the `<decision>:<applicant>` part of a review button's custom id.
pub fn parse_review(value: &str) -> Result<(Decision, u64)> {
    let (decision, applicant) = value
        .split_once(':')
        .ok_or_else(|| Error::validation("That review button is malformed."))?;
    let applicant = applicant
        .parse()
        .map_err(|_| Error::validation("That review button is malformed."))?;
    Ok((decision.parse()?, applicant))
}

/// A submitted application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Application {
    /// Guild and applicant
    pub key: AccountKey,
    /// What the applicant wrote
    pub answer: String,
    /// When it was submitted
    pub submitted_at: DateTime<Utc>,
}

/// Where a guild reviews applications and what approval grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplicationSetup {
    /// Review channel
    pub channel_id: u64,
    /// Role granted on approval
    pub role_id: u64,
}

impl ApplicationSetup {
    /// The guild's setup, or a denial naming the command that configures it.
    pub fn of(settings: &GuildSettings) -> Result<Self> {
        match (settings.application_channel, settings.application_role) {
            (Some(channel_id), Some(role_id)) => Ok(Self { channel_id, role_id }),
            _ => Err(Error::validation(
                "Applications are not set up here. Ask an admin to run `application setup`.",
            )),
        }
    }
}

/// Pending applications, one per member per guild.
#[derive(Debug, Clone, Default)]
pub struct ApplicationDesk {
    pending: Arc<DashMap<AccountKey, Application>>,
}

impl ApplicationDesk {
    /// Creates an empty desk.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Files an application. Fails while the member already has one pending.
    pub fn submit(&self, key: AccountKey, answer: &str, now: DateTime<Utc>) -> Result<Application> {
        let answer = answer.trim();
        if answer.is_empty() {
            return Err(Error::validation("Tell the staff why you're applying."));
        }
        if answer.chars().count() > MAX_ANSWER_LEN {
            return Err(Error::validation(format!(
                "Applications are limited to {MAX_ANSWER_LEN} characters."
            )));
        }
        match self.pending.entry(key) {
            Entry::Occupied(_) => Err(Error::conflict(
                "You already have an application waiting for review.",
            )),
            Entry::Vacant(slot) => {
                let application = Application {
                    key,
                    answer: answer.to_string(),
                    submitted_at: now,
                };
                slot.insert(application.clone());
                info!(guild_id = key.guild_id, user_id = key.user_id, "application submitted");
                Ok(application)
            }
        }
    }

    /// Takes the member's pending application off the desk.
    pub fn review(&self, key: AccountKey, decision: Decision) -> Result<Application> {
        let (_, application) = self.pending.remove(&key).ok_or_else(|| {
            Error::not_found(format!("A pending application from <@{}>", key.user_id))
        })?;
        info!(
            guild_id = key.guild_id,
            user_id = key.user_id,
            ?decision,
            "application reviewed"
        );
        Ok(application)
    }

    /// Puts an application back after its review or posting could not be completed.
    pub fn reopen(&self, application: Application) {
        self.pending.entry(application.key).or_insert(application);
    }

    /// Drops a pending application without review.
    pub fn withdraw(&self, key: AccountKey) -> Option<Application> {
        self.pending.remove(&key).map(|(_, application)| application)
    }

    /// Whether the member has an application waiting.
    #[must_use]
    pub fn is_pending(&self, key: AccountKey) -> bool {
        self.pending.contains_key(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixed_now;

    const GUILD: u64 = 3;

    #[test]
    fn test_submit_then_review() -> Result<()> {
        let desk = ApplicationDesk::new();
        let member = AccountKey::new(GUILD, 1);

        let application = desk.submit(member, "  I help out in #support every day. ", fixed_now())?;
        assert_eq!(application.answer, "I help out in #support every day.");
        assert!(matches!(
            desk.submit(member, "again", fixed_now()),
            Err(Error::Conflict { .. })
        ));
        // Other members and other guilds are independent.
        desk.submit(AccountKey::new(GUILD, 2), "me too", fixed_now())?;
        desk.submit(AccountKey::new(GUILD + 1, 1), "elsewhere", fixed_now())?;

        assert_eq!(desk.review(member, Decision::Approve)?, application);
        assert!(!desk.is_pending(member));
        assert!(matches!(
            desk.review(member, Decision::Deny),
            Err(Error::NotFound { .. })
        ));
        // A reviewed member may apply again.
        desk.submit(member, "second try", fixed_now())?;
        Ok(())
    }

    #[test]
    fn test_rejects_empty_and_oversized_answers() {
        let desk = ApplicationDesk::new();
        let member = AccountKey::new(GUILD, 1);
        assert!(matches!(
            desk.submit(member, "   ", fixed_now()),
            Err(Error::Validation { .. })
        ));
        let long = "a".repeat(MAX_ANSWER_LEN + 1);
        assert!(matches!(
            desk.submit(member, &long, fixed_now()),
            Err(Error::Validation { .. })
        ));
        assert!(!desk.is_pending(member));
    }

    #[test]
    fn test_reopen_restores_failed_review() -> Result<()> {
        let desk = ApplicationDesk::new();
        let member = AccountKey::new(GUILD, 1);
        desk.submit(member, "pick me", fixed_now())?;

        let application = desk.review(member, Decision::Approve)?;
        desk.reopen(application.clone());
        assert!(desk.is_pending(member));
        assert_eq!(desk.withdraw(member), Some(application));
        assert_eq!(desk.withdraw(member), None);
        Ok(())
    }

    #[test]
    fn test_review_buttons() -> Result<()> {
        let custom_id = Decision::Deny.custom_id(42);
        assert_eq!(custom_id, "application:deny:42");
        let value = custom_id
            .strip_prefix("application:")
            .ok_or_else(|| Error::not_found("prefix"))?;
        assert_eq!(parse_review(value)?, (Decision::Deny, 42));
        assert!(parse_review("maybe:42").is_err());
        assert!(parse_review("approve:someone").is_err());
        Ok(())
    }

    #[test]
    fn test_setup_requires_channel_and_role() {
        let mut settings = GuildSettings::new(GUILD, 3);
        settings.application_channel = Some(10);
        assert!(ApplicationSetup::of(&settings).is_err());
        settings.application_role = Some(20);
        assert_eq!(
            ApplicationSetup::of(&settings).ok(),
            Some(ApplicationSetup {
                channel_id: 10,
                role_id: 20
            })
        );
    }
}
