//! `SeaORM`-backed [`Store`].
//!
//! Snowflakes are stored as text and list fields as JSON text, matching the
//! entity definitions. Upserts look the row up by its natural key first.

use super::Store;
use crate::entities::{
    AccountColumn, AccountModel, Accounts, JailColumn, JailModel, Jails, Lotteries, LotteryColumn,
    LotteryModel, Settings, SettingsColumn, SettingsModel, WarningColumn, WarningModel, Warnings,
    account, jail, lottery, settings, warning,
};
use crate::errors::{Error, Result};
use crate::models::{
    AccountKey, Boosts, Cooldowns, EconomyAccount, GuildSettings, JailRecord, LotteryState, Warning,
};
use async_trait::async_trait;
use sea_orm::{ActiveValue::NotSet, DatabaseConnection, QueryOrder, Set, prelude::*};

/// Store backed by a `SeaORM` connection.
#[derive(Debug, Clone)]
pub struct SeaOrmStore {
    db: DatabaseConnection,
}

impl SeaOrmStore {
    /// Wraps an open connection whose tables already exist.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// The underlying connection.
    #[must_use]
    pub const fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

fn parse_snowflake(raw: &str) -> Result<u64> {
    raw.parse()
        .map_err(|_| Error::Database(DbErr::Custom(format!("Corrupt snowflake `{raw}`"))))
}

fn parse_optional_snowflake(raw: Option<&str>) -> Result<Option<u64>> {
    raw.map(parse_snowflake).transpose()
}

fn account_from_model(model: AccountModel) -> Result<EconomyAccount> {
    Ok(EconomyAccount {
        key: AccountKey::new(
            parse_snowflake(&model.guild_id)?,
            parse_snowflake(&model.user_id)?,
        ),
        wallet: model.wallet,
        bank: model.bank,
        job: model.job.as_deref().map(str::parse).transpose()?,
        level: model.level,
        xp: model.xp,
        items: serde_json::from_str(&model.items)?,
        badges: serde_json::from_str(&model.badges)?,
        bio: model.bio,
        cooldowns: Cooldowns {
            last_beg: model.last_beg,
            last_work: model.last_work,
            last_rob: model.last_rob,
            last_daily: model.last_daily,
            last_weekly: model.last_weekly,
            last_monthly: model.last_monthly,
            bank_interest_at: model.bank_interest_at,
        },
        boosts: Boosts {
            double_earnings: model.double_earnings,
            rob_boost: model.rob_boost,
            lucky_until: model.lucky_until,
            shield_until: model.shield_until,
        },
    })
}

fn account_to_active(acc: &EconomyAccount, id: Option<i64>) -> Result<account::ActiveModel> {
    Ok(account::ActiveModel {
        id: id.map_or(NotSet, Set),
        guild_id: Set(acc.key.guild_id.to_string()),
        user_id: Set(acc.key.user_id.to_string()),
        wallet: Set(acc.wallet),
        bank: Set(acc.bank),
        job: Set(acc.job.map(|job| job.id().to_string())),
        level: Set(acc.level),
        xp: Set(acc.xp),
        items: Set(serde_json::to_string(&acc.items)?),
        badges: Set(serde_json::to_string(&acc.badges)?),
        bio: Set(acc.bio.clone()),
        last_beg: Set(acc.cooldowns.last_beg),
        last_work: Set(acc.cooldowns.last_work),
        last_rob: Set(acc.cooldowns.last_rob),
        last_daily: Set(acc.cooldowns.last_daily),
        last_weekly: Set(acc.cooldowns.last_weekly),
        last_monthly: Set(acc.cooldowns.last_monthly),
        bank_interest_at: Set(acc.cooldowns.bank_interest_at),
        double_earnings: Set(acc.boosts.double_earnings),
        rob_boost: Set(acc.boosts.rob_boost),
        lucky_until: Set(acc.boosts.lucky_until),
        shield_until: Set(acc.boosts.shield_until),
    })
}

fn lottery_from_model(model: LotteryModel) -> Result<LotteryState> {
    Ok(LotteryState {
        guild_id: parse_snowflake(&model.guild_id)?,
        pot: model.pot,
        participants: serde_json::from_str(&model.participants)?,
        next_draw: model.next_draw,
    })
}

fn warning_from_model(model: WarningModel) -> Result<Warning> {
    Ok(Warning {
        guild_id: parse_snowflake(&model.guild_id)?,
        user_id: parse_snowflake(&model.user_id)?,
        moderator_id: parse_snowflake(&model.moderator_id)?,
        reason: model.reason,
        created_at: model.created_at,
    })
}

fn settings_from_model(model: SettingsModel) -> Result<GuildSettings> {
    Ok(GuildSettings {
        guild_id: parse_snowflake(&model.guild_id)?,
        premium_roles: serde_json::from_str(&model.premium_roles)?,
        warn_limit: u32::try_from(model.warn_limit).unwrap_or(1).max(1),
        jail_role: parse_optional_snowflake(model.jail_role_id.as_deref())?,
        muted_role: parse_optional_snowflake(model.muted_role_id.as_deref())?,
        ticket_category: parse_optional_snowflake(model.ticket_category_id.as_deref())?,
        application_channel: parse_optional_snowflake(model.application_channel_id.as_deref())?,
        application_role: parse_optional_snowflake(model.application_role_id.as_deref())?,
    })
}

fn jail_from_model(model: JailModel) -> Result<JailRecord> {
    Ok(JailRecord {
        guild_id: parse_snowflake(&model.guild_id)?,
        user_id: parse_snowflake(&model.user_id)?,
        moderator_id: parse_snowflake(&model.moderator_id)?,
        reason: model.reason,
        roles: serde_json::from_str(&model.roles)?,
        jailed_at: model.jailed_at,
    })
}

impl SeaOrmStore {
    async fn find_account_row(&self, key: AccountKey) -> Result<Option<AccountModel>> {
        Accounts::find()
            .filter(AccountColumn::GuildId.eq(key.guild_id.to_string()))
            .filter(AccountColumn::UserId.eq(key.user_id.to_string()))
            .one(&self.db)
            .await
            .map_err(Into::into)
    }

    async fn find_lottery_row(&self, guild_id: u64) -> Result<Option<LotteryModel>> {
        Lotteries::find()
            .filter(LotteryColumn::GuildId.eq(guild_id.to_string()))
            .one(&self.db)
            .await
            .map_err(Into::into)
    }

    async fn find_settings_row(&self, guild_id: u64) -> Result<Option<SettingsModel>> {
        Settings::find()
            .filter(SettingsColumn::GuildId.eq(guild_id.to_string()))
            .one(&self.db)
            .await
            .map_err(Into::into)
    }

    async fn find_jail_row(&self, guild_id: u64, user_id: u64) -> Result<Option<JailModel>> {
        Jails::find()
            .filter(JailColumn::GuildId.eq(guild_id.to_string()))
            .filter(JailColumn::UserId.eq(user_id.to_string()))
            .one(&self.db)
            .await
            .map_err(Into::into)
    }
}

#[async_trait]
impl Store for SeaOrmStore {
    async fn load_account(&self, key: AccountKey) -> Result<Option<EconomyAccount>> {
        self.find_account_row(key)
            .await?
            .map(account_from_model)
            .transpose()
    }

    async fn save_account(&self, account: &EconomyAccount) -> Result<()> {
        let existing = self.find_account_row(account.key).await?;
        match existing {
            Some(row) => {
                account_to_active(account, Some(row.id))?
                    .update(&self.db)
                    .await?;
            }
            None => {
                account_to_active(account, None)?.insert(&self.db).await?;
            }
        }
        Ok(())
    }

    async fn guild_accounts(&self, guild_id: u64) -> Result<Vec<EconomyAccount>> {
        Accounts::find()
            .filter(AccountColumn::GuildId.eq(guild_id.to_string()))
            .all(&self.db)
            .await?
            .into_iter()
            .map(account_from_model)
            .collect()
    }

    async fn load_lottery(&self, guild_id: u64) -> Result<Option<LotteryState>> {
        self.find_lottery_row(guild_id)
            .await?
            .map(lottery_from_model)
            .transpose()
    }

    async fn save_lottery(&self, state: &LotteryState) -> Result<()> {
        let existing = self.find_lottery_row(state.guild_id).await?;
        let active = lottery::ActiveModel {
            id: existing.as_ref().map_or(NotSet, |row| Set(row.id)),
            guild_id: Set(state.guild_id.to_string()),
            pot: Set(state.pot),
            participants: Set(serde_json::to_string(&state.participants)?),
            next_draw: Set(state.next_draw),
        };
        if existing.is_some() {
            active.update(&self.db).await?;
        } else {
            active.insert(&self.db).await?;
        }
        Ok(())
    }

    async fn lotteries(&self) -> Result<Vec<LotteryState>> {
        Lotteries::find()
            .all(&self.db)
            .await?
            .into_iter()
            .map(lottery_from_model)
            .collect()
    }

    async fn append_warning(&self, entry: &Warning) -> Result<()> {
        warning::ActiveModel {
            guild_id: Set(entry.guild_id.to_string()),
            user_id: Set(entry.user_id.to_string()),
            moderator_id: Set(entry.moderator_id.to_string()),
            reason: Set(entry.reason.clone()),
            created_at: Set(entry.created_at),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;
        Ok(())
    }

    async fn warnings(&self, guild_id: u64, user_id: u64) -> Result<Vec<Warning>> {
        Warnings::find()
            .filter(WarningColumn::GuildId.eq(guild_id.to_string()))
            .filter(WarningColumn::UserId.eq(user_id.to_string()))
            .order_by_asc(WarningColumn::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(warning_from_model)
            .collect()
    }

    async fn load_settings(&self, guild_id: u64) -> Result<Option<GuildSettings>> {
        self.find_settings_row(guild_id)
            .await?
            .map(settings_from_model)
            .transpose()
    }

    async fn save_settings(&self, config: &GuildSettings) -> Result<()> {
        let existing = self.find_settings_row(config.guild_id).await?;
        let active = settings::ActiveModel {
            id: existing.as_ref().map_or(NotSet, |row| Set(row.id)),
            guild_id: Set(config.guild_id.to_string()),
            premium_roles: Set(serde_json::to_string(&config.premium_roles)?),
            warn_limit: Set(i32::try_from(config.warn_limit).unwrap_or(i32::MAX)),
            jail_role_id: Set(config.jail_role.map(|id| id.to_string())),
            muted_role_id: Set(config.muted_role.map(|id| id.to_string())),
            ticket_category_id: Set(config.ticket_category.map(|id| id.to_string())),
            application_channel_id: Set(config.application_channel.map(|id| id.to_string())),
            application_role_id: Set(config.application_role.map(|id| id.to_string())),
        };
        if existing.is_some() {
            active.update(&self.db).await?;
        } else {
            active.insert(&self.db).await?;
        }
        Ok(())
    }

    async fn load_jail(&self, guild_id: u64, user_id: u64) -> Result<Option<JailRecord>> {
        self.find_jail_row(guild_id, user_id)
            .await?
            .map(jail_from_model)
            .transpose()
    }

    async fn save_jail(&self, record: &JailRecord) -> Result<()> {
        let existing = self.find_jail_row(record.guild_id, record.user_id).await?;
        let active = jail::ActiveModel {
            id: existing.as_ref().map_or(NotSet, |row| Set(row.id)),
            guild_id: Set(record.guild_id.to_string()),
            user_id: Set(record.user_id.to_string()),
            moderator_id: Set(record.moderator_id.to_string()),
            reason: Set(record.reason.clone()),
            roles: Set(serde_json::to_string(&record.roles)?),
            jailed_at: Set(record.jailed_at),
        };
        if existing.is_some() {
            active.update(&self.db).await?;
        } else {
            active.insert(&self.db).await?;
        }
        Ok(())
    }

    async fn remove_jail(&self, guild_id: u64, user_id: u64) -> Result<Option<JailRecord>> {
        let Some(row) = self.find_jail_row(guild_id, user_id).await? else {
            return Ok(None);
        };
        let record = jail_from_model(row.clone())?;
        row.delete(&self.db).await?;
        Ok(Some(record))
    }

    async fn jailed(&self, guild_id: u64) -> Result<Vec<JailRecord>> {
        Jails::find()
            .filter(JailColumn::GuildId.eq(guild_id.to_string()))
            .order_by_asc(JailColumn::JailedAt)
            .all(&self.db)
            .await?
            .into_iter()
            .map(jail_from_model)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::items::Item;
    use crate::core::jobs::Job;
    use crate::test_utils::{init_test_tracing, setup_test_db};
    use chrono::{TimeDelta, Utc};

    #[tokio::test]
    async fn test_account_round_trip() -> Result<()> {
        init_test_tracing();
        let store = SeaOrmStore::new(setup_test_db().await?);
        let key = AccountKey::new(111, 222);
        assert!(store.load_account(key).await?.is_none());

        let mut acc = EconomyAccount::new(key);
        acc.wallet = 450;
        acc.job = Some(Job::Chef);
        acc.items = vec![Item::Potion, Item::Potion, Item::Shield];
        acc.badges.insert("founder".to_string());
        acc.boosts.shield_until = Some(Utc::now() + TimeDelta::hours(1));
        store.save_account(&acc).await?;

        // Second save updates in place rather than inserting a duplicate.
        acc.bank = 25;
        store.save_account(&acc).await?;

        let loaded = store.load_account(key).await?;
        assert_eq!(loaded.as_ref().map(|a| a.bank), Some(25));
        assert_eq!(loaded.map(|a| a.items.len()), Some(3));
        assert_eq!(store.guild_accounts(111).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_lottery_upsert_and_listing() -> Result<()> {
        let store = SeaOrmStore::new(setup_test_db().await?);
        let mut state = LotteryState::new(9, Utc::now());
        store.save_lottery(&state).await?;
        state.participants = vec![1, 1, 2];
        state.pot = 300;
        store.save_lottery(&state).await?;

        let all = store.lotteries().await?;
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].participants, vec![1, 1, 2]);
        Ok(())
    }

    #[tokio::test]
    async fn test_warnings_are_scoped_and_ordered() -> Result<()> {
        let store = SeaOrmStore::new(setup_test_db().await?);
        for (user, reason) in [(5, "spam"), (6, "other user"), (5, "caps")] {
            store
                .append_warning(&Warning {
                    guild_id: 1,
                    user_id: user,
                    moderator_id: 99,
                    reason: reason.to_string(),
                    created_at: Utc::now(),
                })
                .await?;
        }
        let reasons: Vec<String> = store
            .warnings(1, 5)
            .await?
            .into_iter()
            .map(|w| w.reason)
            .collect();
        assert_eq!(reasons, vec!["spam", "caps"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_jail_save_and_remove() -> Result<()> {
        let store = SeaOrmStore::new(setup_test_db().await?);
        let record = JailRecord {
            guild_id: 1,
            user_id: 2,
            moderator_id: 3,
            reason: "raid".to_string(),
            roles: vec![10, 11],
            jailed_at: Utc::now(),
        };
        store.save_jail(&record).await?;
        assert_eq!(store.jailed(1).await?.len(), 1);
        assert_eq!(store.remove_jail(1, 2).await?, Some(record));
        assert!(store.remove_jail(1, 2).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_settings_round_trip() -> Result<()> {
        let store = SeaOrmStore::new(setup_test_db().await?);
        let mut config = GuildSettings::new(4, 3);
        config.premium_roles = vec![77];
        config.jail_role = Some(88);
        config.application_channel = Some(90);
        config.application_role = Some(91);
        store.save_settings(&config).await?;
        assert_eq!(store.load_settings(4).await?, Some(config));
        Ok(())
    }
}
