//! External collaborator interfaces.
//!
//! The refresh loop talks to three collaborators, each behind an async
//! trait so the daemon injects real gateways and tests inject in-memory
//! fakes:
//! - `ConfigSource`: the remote competition configuration document
//! - `RunQuery`: the experiment-tracking backend
//! - `ChannelClient`: the chat platform

use async_trait::async_trait;

use crate::error::{ConfigFetchError, DeliveryError, QueryError};
use crate::model::{CompetitionDefinition, QueryWindow, ResultRecord};

/// Remote competition configuration document.
#[async_trait]
pub trait ConfigSource: Send + Sync {
    /// Fetch and validate the full competition set. The returned set
    /// replaces the registry wholesale; there is no partial update.
    async fn fetch_competitions(&self) -> Result<Vec<CompetitionDefinition>, ConfigFetchError>;
}

/// Experiment-tracking backend holding validator result records.
#[async_trait]
pub trait RunQuery: Send + Sync {
    /// Return the records created inside the half-open `window` for
    /// `namespace` (`"{entity}/{competition_id}"`). An empty match is
    /// `Ok(vec![])`, not an error.
    async fn query_runs(
        &self,
        namespace: &str,
        window: &QueryWindow,
    ) -> Result<Vec<ResultRecord>, QueryError>;
}

/// Chat platform delivery endpoint.
#[async_trait]
pub trait ChannelClient: Send + Sync {
    /// Block until the platform connection is established and usable.
    async fn wait_until_ready(&self) -> Result<(), DeliveryError>;

    /// Post `text` to the named text channel inside `guild_id`.
    async fn send_message(
        &self,
        guild_id: u64,
        channel_name: &str,
        text: &str,
    ) -> Result<(), DeliveryError>;
}
