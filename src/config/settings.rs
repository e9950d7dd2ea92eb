//! Bot settings loaded from `config.toml`.
//!
//! Every field has a default, so a missing file or a partial file is fine.
//! Secrets (the bot token, the database URL) stay in the environment.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Top-level structure of `config.toml`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Chat command settings
    pub bot: CommandConfig,
    /// Lottery scheduler settings
    pub lottery: LotteryConfig,
    /// Moderation defaults
    pub moderation: ModerationConfig,
}

/// Chat command settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CommandConfig {
    /// Prefix for chat commands
    pub prefix: String,
    /// Guild to register slash commands in during development (instant updates)
    pub dev_guild_id: Option<u64>,
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            prefix: "!".to_string(),
            dev_guild_id: None,
        }
    }
}

/// Lottery scheduler settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LotteryConfig {
    /// Seconds between scheduled draw checks
    pub poll_interval_secs: u64,
}

impl Default for LotteryConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 300,
        }
    }
}

/// Moderation defaults
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModerationConfig {
    /// Warnings before an automatic kick, for guilds that never set their own limit
    pub default_warn_limit: u32,
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            default_warn_limit: 3,
        }
    }
}

/// Loads bot settings from a TOML file.
///
/// # Errors
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<BotConfig> {
    let path = path.as_ref();
    if !path.exists() {
        info!("No config file at {}; using defaults.", path.display());
        return Ok(BotConfig::default());
    }
    debug!("Loading configuration from {}", path.display());
    let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    let config: BotConfig = toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;

    if config.moderation.default_warn_limit == 0 {
        return Err(Error::Config {
            message: "moderation.default_warn_limit must be at least 1".to_string(),
        });
    }
    if config.lottery.poll_interval_secs == 0 {
        return Err(Error::Config {
            message: "lottery.poll_interval_secs must be at least 1".to_string(),
        });
    }
    Ok(config)
}

/// Loads bot settings from the default location (./config.toml)
pub fn load_default_config() -> Result<BotConfig> {
    load_config("config.toml")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
            [bot]
            prefix = "?"
            dev_guild_id = 1234

            [lottery]
            poll_interval_secs = 60

            [moderation]
            default_warn_limit = 5
        "#;

        let config: BotConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.bot.prefix, "?");
        assert_eq!(config.bot.dev_guild_id, Some(1234));
        assert_eq!(config.lottery.poll_interval_secs, 60);
        assert_eq!(config.moderation.default_warn_limit, 5);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: BotConfig = toml::from_str("[bot]\nprefix = \"$\"\n").unwrap();
        assert_eq!(config.bot.prefix, "$");
        assert_eq!(config.lottery.poll_interval_secs, 300);
        assert_eq!(config.moderation.default_warn_limit, 3);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = load_config("definitely/not/here.toml").unwrap();
        assert_eq!(config.bot.prefix, "!");
    }
}
