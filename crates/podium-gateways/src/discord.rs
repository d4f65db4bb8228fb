//! Discord REST delivery.

use async_trait::async_trait;
use podium_core::error::DeliveryError;
use podium_core::gateway::ChannelClient;
use serde::Deserialize;
use tracing::info;

const DISCORD_API_BASE: &str = "https://discord.com/api/v10";

/// Channel type id for guild text channels in the Discord API.
const GUILD_TEXT_CHANNEL: u8 = 0;

/// Delivers announcements through the Discord REST API with a bot token.
///
/// Channels are addressed by name inside a guild: every send resolves the
/// guild's channel list first, so renamed channels are picked up without a
/// restart.
pub struct DiscordRestClient {
    base_url: String,
    token: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct GuildChannel {
    id: String,
    name: String,
    #[serde(rename = "type")]
    kind: u8,
}

#[derive(Debug, Deserialize)]
struct BotUser {
    username: String,
}

#[derive(Debug, Deserialize)]
struct GuildSummary {
    name: String,
}

impl DiscordRestClient {
    pub fn new(token: impl Into<String>, client: reqwest::Client) -> Self {
        DiscordRestClient {
            base_url: DISCORD_API_BASE.to_string(),
            token: token.into(),
            client,
        }
    }

    /// Point the client at a different API root (tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn auth_header(&self) -> String {
        format!("Bot {}", self.token)
    }

    async fn guild_channels(&self, guild_id: u64) -> Result<Vec<GuildChannel>, DeliveryError> {
        let url = format!("{}/guilds/{}/channels", self.base_url, guild_id);
        let response = self
            .client
            .get(&url)
            .header("Authorization", self.auth_header())
            .send()
            .await
            .map_err(|err| DeliveryError::Transport(err.to_string()))?;

        match response.status().as_u16() {
            200 => response
                .json()
                .await
                .map_err(|err| DeliveryError::Transport(err.to_string())),
            404 => Err(DeliveryError::GuildNotFound { guild_id }),
            status @ (401 | 403) => Err(DeliveryError::Auth { status }),
            status => Err(DeliveryError::Status { status }),
        }
    }
}

#[async_trait]
impl ChannelClient for DiscordRestClient {
    async fn wait_until_ready(&self) -> Result<(), DeliveryError> {
        let url = format!("{}/users/@me", self.base_url);
        let response = self
            .client
            .get(&url)
            .header("Authorization", self.auth_header())
            .send()
            .await
            .map_err(|err| DeliveryError::Transport(err.to_string()))?;

        let status = response.status().as_u16();
        if status != 200 {
            return Err(DeliveryError::Auth { status });
        }
        let me: BotUser = response
            .json()
            .await
            .map_err(|err| DeliveryError::Transport(err.to_string()))?;
        info!(user = %me.username, "bot authenticated");

        // Best-effort guild listing, mirrors what operators expect to see
        // in the startup log.
        let url = format!("{}/users/@me/guilds", self.base_url);
        if let Ok(response) = self
            .client
            .get(&url)
            .header("Authorization", self.auth_header())
            .send()
            .await
        {
            if let Ok(guilds) = response.json::<Vec<GuildSummary>>().await {
                for guild in guilds {
                    info!(guild = %guild.name, "connected to guild");
                }
            }
        }
        Ok(())
    }

    async fn send_message(
        &self,
        guild_id: u64,
        channel_name: &str,
        text: &str,
    ) -> Result<(), DeliveryError> {
        let channels = self.guild_channels(guild_id).await?;
        let channel = find_text_channel(&channels, channel_name).ok_or_else(|| {
            DeliveryError::ChannelNotFound {
                guild_id,
                channel_name: channel_name.to_string(),
            }
        })?;

        let url = format!("{}/channels/{}/messages", self.base_url, channel.id);
        let response = self
            .client
            .post(&url)
            .header("Authorization", self.auth_header())
            .json(&serde_json::json!({ "content": text }))
            .send()
            .await
            .map_err(|err| DeliveryError::Transport(err.to_string()))?;

        match response.status().as_u16() {
            200 => Ok(()),
            status @ (401 | 403) => Err(DeliveryError::Auth { status }),
            status => Err(DeliveryError::Status { status }),
        }
    }
}

/// First text channel with the given name, skipping voice and category
/// entries that may share it.
fn find_text_channel<'a>(channels: &'a [GuildChannel], name: &str) -> Option<&'a GuildChannel> {
    channels
        .iter()
        .find(|channel| channel.kind == GUILD_TEXT_CHANNEL && channel.name == name)
}
