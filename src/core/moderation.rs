//! Warnings, jail, mutes and per-guild moderation settings.
//!
//! Discord-side effects (kicking, swapping roles, DMs) happen in the command
//! layer; this module decides what should happen and keeps the records.

use crate::{
    errors::{Error, Result},
    models::{AccountKey, GuildSettings, JailRecord, Warning},
    store::{KeyLocks, LockKey, Store},
};
use chrono::{DateTime, TimeDelta, Utc};
use dashmap::DashMap;
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};
use tracing::info;

/// Longest mute Discord-side timers are allowed to run.
pub const MAX_MUTE: TimeDelta = TimeDelta::days(28);

/// Result of recording a warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WarnOutcome {
    /// Warnings the member now has
    pub count: usize,
    /// The guild's limit
    pub limit: u32,
    /// Whether the member should be kicked
    pub auto_kick: bool,
}

/// Moderation records for every guild.
#[derive(Clone)]
pub struct Moderation {
    store: Arc<dyn Store>,
    locks: KeyLocks,
    default_warn_limit: u32,
}

impl std::fmt::Debug for Moderation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Moderation")
            .field("default_warn_limit", &self.default_warn_limit)
            .finish_non_exhaustive()
    }
}

impl Moderation {
    /// Creates the moderation service. Guilds without settings use `default_warn_limit`.
    #[must_use]
    pub fn new(store: Arc<dyn Store>, locks: KeyLocks, default_warn_limit: u32) -> Self {
        Self {
            store,
            locks,
            default_warn_limit,
        }
    }

    /// The guild's settings, or defaults if it never configured anything.
    pub async fn settings(&self, guild_id: u64) -> Result<GuildSettings> {
        Ok(self
            .store
            .load_settings(guild_id)
            .await?
            .unwrap_or_else(|| GuildSettings::new(guild_id, self.default_warn_limit)))
    }

    /// Atomic read-modify-write of a guild's settings; saved only if `f` succeeds.
    pub async fn update_settings<R, F>(&self, guild_id: u64, f: F) -> Result<R>
    where
        F: FnOnce(&mut GuildSettings) -> Result<R> + Send,
        R: Send,
    {
        let _guard = self.locks.lock(LockKey::Settings(guild_id)).await;
        let mut settings = self.settings(guild_id).await?;
        let out = f(&mut settings)?;
        self.store.save_settings(&settings).await?;
        Ok(out)
    }

    /// Records a warning and reports whether the limit has been reached.
    pub async fn warn(
        &self,
        key: AccountKey,
        moderator_id: u64,
        reason: &str,
        now: DateTime<Utc>,
    ) -> Result<WarnOutcome> {
        let limit = self.settings(key.guild_id).await?.warn_limit;
        let _guard = self.locks.lock(LockKey::Member(key)).await;
        self.store
            .append_warning(&Warning {
                guild_id: key.guild_id,
                user_id: key.user_id,
                moderator_id,
                reason: reason.to_string(),
                created_at: now,
            })
            .await?;
        let count = self.store.warnings(key.guild_id, key.user_id).await?.len();
        let auto_kick = count >= limit as usize;
        info!(
            guild_id = key.guild_id,
            user_id = key.user_id,
            count,
            limit,
            "member warned"
        );
        Ok(WarnOutcome {
            count,
            limit,
            auto_kick,
        })
    }

    /// All warnings for a member, oldest first.
    pub async fn warnings(&self, key: AccountKey) -> Result<Vec<Warning>> {
        self.store.warnings(key.guild_id, key.user_id).await
    }

    /// Sets how many warnings trigger a kick.
    pub async fn set_warn_limit(&self, guild_id: u64, limit: u32) -> Result<()> {
        if limit == 0 {
            return Err(Error::validation("The warn limit must be at least 1."));
        }
        self.update_settings(guild_id, |s| {
            s.warn_limit = limit;
            Ok(())
        })
        .await
    }

    /// Adds a premium role.
    pub async fn add_premium_role(&self, guild_id: u64, role_id: u64) -> Result<()> {
        self.update_settings(guild_id, |s| {
            if s.premium_roles.contains(&role_id) {
                return Err(Error::conflict(format!("<@&{role_id}> is already a premium role.")));
            }
            s.premium_roles.push(role_id);
            Ok(())
        })
        .await
    }

    /// Removes a premium role.
    pub async fn remove_premium_role(&self, guild_id: u64, role_id: u64) -> Result<()> {
        self.update_settings(guild_id, |s| {
            let before = s.premium_roles.len();
            s.premium_roles.retain(|r| *r != role_id);
            if s.premium_roles.len() == before {
                return Err(Error::not_found(format!("premium role <@&{role_id}>")));
            }
            Ok(())
        })
        .await
    }

    /// Records the role given to jailed members.
    pub async fn set_jail_role(&self, guild_id: u64, role_id: u64) -> Result<()> {
        self.update_settings(guild_id, |s| {
            s.jail_role = Some(role_id);
            Ok(())
        })
        .await
    }

    /// Records the role given to muted members.
    pub async fn set_muted_role(&self, guild_id: u64, role_id: u64) -> Result<()> {
        self.update_settings(guild_id, |s| {
            s.muted_role = Some(role_id);
            Ok(())
        })
        .await
    }

    /// Records the category new ticket channels are created under.
    pub async fn set_ticket_category(&self, guild_id: u64, category_id: u64) -> Result<()> {
        self.update_settings(guild_id, |s| {
            s.ticket_category = Some(category_id);
            Ok(())
        })
        .await
    }

    /// Records where role applications are reviewed and the role they grant.
    pub async fn set_applications(&self, guild_id: u64, channel_id: u64, role_id: u64) -> Result<()> {
        self.update_settings(guild_id, |s| {
            s.application_channel = Some(channel_id);
            s.application_role = Some(role_id);
            Ok(())
        })
        .await
    }

    /// The configured muted role.
    pub async fn muted_role(&self, guild_id: u64) -> Result<u64> {
        self.settings(guild_id).await?.muted_role.ok_or_else(|| {
            Error::validation("No muted role is configured. Set one with `setmuterole`.")
        })
    }

    /// Jails a member, remembering `roles` so they can be restored.
    ///
    /// Returns the record and the jail role to apply.
    pub async fn jail(
        &self,
        key: AccountKey,
        moderator_id: u64,
        reason: &str,
        roles: Vec<u64>,
        now: DateTime<Utc>,
    ) -> Result<(JailRecord, u64)> {
        let jail_role = self.settings(key.guild_id).await?.jail_role.ok_or_else(|| {
            Error::validation("No jail role is configured. Set one with `setjailrole`.")
        })?;

        let _guard = self.locks.lock(LockKey::Member(key)).await;
        if self.store.load_jail(key.guild_id, key.user_id).await?.is_some() {
            return Err(Error::conflict(format!("<@{}> is already jailed.", key.user_id)));
        }
        let record = JailRecord {
            guild_id: key.guild_id,
            user_id: key.user_id,
            moderator_id,
            reason: reason.to_string(),
            roles: roles.into_iter().filter(|r| *r != jail_role).collect(),
            jailed_at: now,
        };
        self.store.save_jail(&record).await?;
        info!(guild_id = key.guild_id, user_id = key.user_id, "member jailed");
        Ok((record, jail_role))
    }

    /// Releases a member; returns the record holding the roles to restore.
    pub async fn free(&self, key: AccountKey) -> Result<JailRecord> {
        let _guard = self.locks.lock(LockKey::Member(key)).await;
        self.store
            .remove_jail(key.guild_id, key.user_id)
            .await?
            .ok_or_else(|| Error::not_found(format!("a jail record for <@{}>", key.user_id)))
    }

    /// Everyone currently jailed in the guild.
    pub async fn jailed(&self, guild_id: u64) -> Result<Vec<JailRecord>> {
        self.store.jailed(guild_id).await
    }
}

/// Identifies one mute so a deferred unmute can tell whether it was superseded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MuteTicket(u64);

/// The current mute ticket per member.
#[derive(Debug, Clone, Default)]
pub struct MuteBook {
    current: Arc<DashMap<AccountKey, MuteTicket>>,
    next: Arc<AtomicU64>,
}

impl MuteBook {
    /// Creates an empty book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a mute, superseding any earlier one for the same member.
    #[must_use]
    pub fn issue(&self, key: AccountKey) -> MuteTicket {
        let ticket = MuteTicket(self.next.fetch_add(1, Ordering::Relaxed));
        self.current.insert(key, ticket);
        ticket
    }

    /// Whether `ticket` is still the member's active mute.
    #[must_use]
    pub fn is_current(&self, key: AccountKey, ticket: MuteTicket) -> bool {
        self.current.get(&key).is_some_and(|t| *t == ticket)
    }

    /// Ends the mute if `ticket` is still current; returns whether it was.
    pub fn release(&self, key: AccountKey, ticket: MuteTicket) -> bool {
        self.current.remove_if(&key, |_, t| *t == ticket).is_some()
    }

    /// Ends whatever mute the member has. Pending deferred unmutes become no-ops.
    pub fn clear(&self, key: AccountKey) -> bool {
        self.current.remove(&key).is_some()
    }
}

/// Parses `<n>{s,m,h,d}` into a duration of at most [`MAX_MUTE`].
pub fn parse_duration(input: &str) -> Result<TimeDelta> {
    let input = input.trim().to_ascii_lowercase();
    let invalid = || {
        Error::validation(format!(
            "`{input}` is not a duration. Use a number followed by s, m, h or d, like `10m`."
        ))
    };

    let unit = input.chars().last().ok_or_else(invalid)?;
    let amount: i64 = input[..input.len() - unit.len_utf8()]
        .parse()
        .map_err(|_| invalid())?;
    if amount <= 0 {
        return Err(invalid());
    }
    let seconds_per_unit = match unit {
        's' => 1,
        'm' => 60,
        'h' => 3_600,
        'd' => 86_400,
        _ => return Err(invalid()),
    };
    let duration = amount
        .checked_mul(seconds_per_unit)
        .and_then(TimeDelta::try_seconds)
        .filter(|d| *d <= MAX_MUTE)
        .ok_or_else(|| Error::validation("Durations are limited to 28 days."))?;
    Ok(duration)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::test_utils::fixed_now;

    const GUILD: u64 = 5;

    fn moderation() -> Moderation {
        Moderation::new(Arc::new(MemoryStore::new()), KeyLocks::new(), 3)
    }

    #[tokio::test]
    async fn test_warn_reaches_limit() -> Result<()> {
        let moderation = moderation();
        let member = AccountKey::new(GUILD, 1);
        let now = fixed_now();

        let first = moderation.warn(member, 99, "spam", now).await?;
        assert_eq!((first.count, first.limit, first.auto_kick), (1, 3, false));
        moderation.warn(member, 99, "spam", now).await?;
        let third = moderation.warn(member, 99, "spam", now).await?;
        assert!(third.auto_kick);

        let warnings = moderation.warnings(member).await?;
        assert_eq!(warnings.len(), 3);
        assert!(moderation.warnings(AccountKey::new(GUILD, 2)).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_custom_warn_limit() -> Result<()> {
        let moderation = moderation();
        assert!(moderation.set_warn_limit(GUILD, 0).await.is_err());
        moderation.set_warn_limit(GUILD, 1).await?;
        let outcome = moderation
            .warn(AccountKey::new(GUILD, 1), 2, "rude", fixed_now())
            .await?;
        assert!(outcome.auto_kick);
        Ok(())
    }

    #[tokio::test]
    async fn test_premium_roles() -> Result<()> {
        let moderation = moderation();
        moderation.add_premium_role(GUILD, 10).await?;
        assert!(matches!(
            moderation.add_premium_role(GUILD, 10).await,
            Err(Error::Conflict { .. })
        ));
        assert_eq!(moderation.settings(GUILD).await?.premium_roles, vec![10]);
        moderation.remove_premium_role(GUILD, 10).await?;
        assert!(matches!(
            moderation.remove_premium_role(GUILD, 10).await,
            Err(Error::NotFound { .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_application_settings() -> Result<()> {
        let moderation = moderation();
        assert_eq!(moderation.settings(GUILD).await?.application_role, None);
        moderation.set_applications(GUILD, 30, 40).await?;
        let settings = moderation.settings(GUILD).await?;
        assert_eq!(
            (settings.application_channel, settings.application_role),
            (Some(30), Some(40))
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_jail_and_free() -> Result<()> {
        let moderation = moderation();
        let member = AccountKey::new(GUILD, 1);
        let now = fixed_now();

        assert!(matches!(
            moderation.jail(member, 2, "timeout", vec![7], now).await,
            Err(Error::Validation { .. })
        ));
        moderation.set_jail_role(GUILD, 50).await?;

        let (record, jail_role) = moderation.jail(member, 2, "timeout", vec![7, 8], now).await?;
        assert_eq!(jail_role, 50);
        assert_eq!(record.roles, vec![7, 8]);
        assert!(matches!(
            moderation.jail(member, 2, "again", vec![], now).await,
            Err(Error::Conflict { .. })
        ));
        assert_eq!(moderation.jailed(GUILD).await?.len(), 1);

        let freed = moderation.free(member).await?;
        assert_eq!(freed.roles, vec![7, 8]);
        assert!(matches!(
            moderation.free(member).await,
            Err(Error::NotFound { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_mute_supersession() {
        let book = MuteBook::new();
        let member = AccountKey::new(GUILD, 1);

        let first = book.issue(member);
        let second = book.issue(member);
        assert!(!book.is_current(member, first));
        // The first mute's timer must not lift the second mute.
        assert!(!book.release(member, first));
        assert!(book.is_current(member, second));

        assert!(book.clear(member));
        assert!(!book.release(member, second));
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("30s").ok(), Some(TimeDelta::seconds(30)));
        assert_eq!(parse_duration("10m").ok(), Some(TimeDelta::minutes(10)));
        assert_eq!(parse_duration("2H").ok(), Some(TimeDelta::hours(2)));
        assert_eq!(parse_duration("28d").ok(), Some(TimeDelta::days(28)));
        for bad in ["", "m", "0m", "-5m", "29d", "10w", "1.5h", "9999999999999999d"] {
            assert!(parse_duration(bad).is_err(), "{bad} should be rejected");
        }
    }
}
