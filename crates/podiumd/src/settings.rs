//! Environment-driven daemon configuration.

use std::env;
use std::time::Duration;

use anyhow::{bail, Context, Result};

const DEFAULT_ANNOUNCE_CHANNEL: &str = "discord-bot-test";
const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 600;
const DEFAULT_LOG_LEVEL: &str = "info";

/// Runtime configuration, loaded from the process environment. A `.env`
/// file in the working directory is honored when present.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Discord bot token.
    pub discord_bot_token: String,

    /// Guild the announcement channel lives in.
    pub guild_id: u64,

    /// URL of the remote competition configuration document.
    pub competition_config_url: String,

    /// Base URL of the tracking backend.
    pub tracking_base_url: String,

    /// Tracking namespace entity; combined with the competition id into
    /// `"{entity}/{competition_id}"` per query.
    pub tracking_entity: String,

    /// Name of the text channel announcements are posted to.
    pub announce_channel: String,

    /// Interval between refresh cycles.
    pub refresh_interval: Duration,

    /// Log level used when `RUST_LOG` is not set.
    pub log_level: String,
}

impl Settings {
    /// Load and validate settings. A missing required variable is a
    /// startup failure, the only error class that terminates the daemon.
    pub fn from_env() -> Result<Self> {
        let guild_id_raw = required("GUILD_ID")?;
        let guild_id = guild_id_raw
            .parse::<u64>()
            .with_context(|| format!("GUILD_ID {guild_id_raw:?} is not a numeric guild id"))?;

        let refresh_interval = match env::var("REFRESH_INTERVAL_SECS") {
            Ok(raw) => {
                let secs = raw.parse::<u64>().with_context(|| {
                    format!("REFRESH_INTERVAL_SECS {raw:?} is not a number of seconds")
                })?;
                Duration::from_secs(secs)
            }
            Err(_) => Duration::from_secs(DEFAULT_REFRESH_INTERVAL_SECS),
        };

        Ok(Settings {
            discord_bot_token: required("DISCORD_BOT_TOKEN")?,
            guild_id,
            competition_config_url: required("COMPETITION_CONFIG_URL")?,
            tracking_base_url: required("TRACKING_BASE_URL")?,
            tracking_entity: required("TRACKING_ENTITY")?,
            announce_channel: env::var("ANNOUNCE_CHANNEL")
                .unwrap_or_else(|_| DEFAULT_ANNOUNCE_CHANNEL.to_string()),
            refresh_interval,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string()),
        })
    }
}

fn required(name: &str) -> Result<String> {
    match env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => bail!("environment variable {name} is not set"),
    }
}
