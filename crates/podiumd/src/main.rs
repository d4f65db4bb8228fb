//! Podium daemon.
//!
//! Boots the gateways, waits for the chat platform to be ready, then runs
//! the announcement cycle on a fixed interval until interrupted. Shutdown
//! performs one final cycle so a pending announcement is not lost.

mod settings;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use podium_core::service::Announcer;
use podium_core::ChannelClient;
use podium_gateways::{DiscordRestClient, HttpConfigSource, HttpRunQuery};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::settings::Settings;

/// Upper bound on any single outbound HTTP call.
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> Result<()> {
    // A .env file is optional; deployments use the process environment.
    dotenvy::dotenv().ok();
    let settings = Settings::from_env()?;
    init_tracing(&settings.log_level)?;

    info!(
        interval_secs = settings.refresh_interval.as_secs(),
        channel = %settings.announce_channel,
        "podiumd starting"
    );

    let http = reqwest::Client::builder()
        .user_agent(concat!("podiumd/", env!("CARGO_PKG_VERSION")))
        .timeout(HTTP_TIMEOUT)
        .build()
        .context("failed to build HTTP client")?;

    let config_source = Arc::new(HttpConfigSource::new(
        &settings.competition_config_url,
        http.clone(),
    ));
    let run_query = Arc::new(HttpRunQuery::new(&settings.tracking_base_url, http.clone()));
    let channel_client = Arc::new(DiscordRestClient::new(&settings.discord_bot_token, http));

    channel_client
        .wait_until_ready()
        .await
        .context("chat platform startup failed")?;

    let announcer = Announcer::new(
        config_source,
        run_query,
        channel_client,
        settings.tracking_entity,
        settings.guild_id,
        settings.announce_channel,
    );

    run_loop(&announcer, settings.refresh_interval).await;

    // Flush any announcement that became due since the last tick.
    info!("shutdown requested, flushing pending announcements");
    announcer.run_cycle().await;
    info!("podiumd stopped");
    Ok(())
}

/// Tick the announcement cycle until a ctrl-c arrives. The first tick
/// fires immediately, so a freshly started daemon announces without
/// waiting a full interval.
async fn run_loop(announcer: &Announcer, refresh_interval: Duration) {
    let mut ticker = tokio::time::interval(refresh_interval);
    loop {
        tokio::select! {
            _ = ticker.tick() => announcer.run_cycle().await,
            signal = tokio::signal::ctrl_c() => {
                if let Err(err) = signal {
                    warn!(error = %err, "ctrl-c handler failed, shutting down");
                }
                return;
            }
        }
    }
}

fn init_tracing(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
    Ok(())
}
