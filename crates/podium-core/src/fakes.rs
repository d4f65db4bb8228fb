//! In-memory fakes for the collaborator traits (testing only)
//!
//! Provides `StaticConfigSource`, `StaticRunQuery` and
//! `RecordingChannelClient` that satisfy the trait contracts without any
//! network dependency.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{ConfigFetchError, DeliveryError, QueryError};
use crate::gateway::{ChannelClient, ConfigSource, RunQuery};
use crate::model::{CompetitionDefinition, QueryWindow, ResultRecord};

// ---------------------------------------------------------------------------
// StaticConfigSource
// ---------------------------------------------------------------------------

/// Config source serving a fixed competition set; can be switched into a
/// failing state to exercise the stale-registry policy.
#[derive(Debug, Default)]
pub struct StaticConfigSource {
    competitions: Vec<CompetitionDefinition>,
    failing: Mutex<bool>,
}

impl StaticConfigSource {
    pub fn new(competitions: Vec<CompetitionDefinition>) -> Self {
        StaticConfigSource {
            competitions,
            failing: Mutex::new(false),
        }
    }

    /// Make subsequent fetches fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }
}

#[async_trait]
impl ConfigSource for StaticConfigSource {
    async fn fetch_competitions(&self) -> Result<Vec<CompetitionDefinition>, ConfigFetchError> {
        if *self.failing.lock().unwrap() {
            return Err(ConfigFetchError::Status { status: 500 });
        }
        Ok(self.competitions.clone())
    }
}

// ---------------------------------------------------------------------------
// StaticRunQuery
// ---------------------------------------------------------------------------

/// Run query serving the same records for every namespace and recording
/// each query it receives.
#[derive(Debug, Default)]
pub struct StaticRunQuery {
    records: Mutex<Vec<ResultRecord>>,
    queries: Mutex<Vec<(String, QueryWindow)>>,
}

impl StaticRunQuery {
    pub fn new(records: Vec<ResultRecord>) -> Self {
        StaticRunQuery {
            records: Mutex::new(records),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Replace the served records.
    pub fn set_records(&self, records: Vec<ResultRecord>) {
        *self.records.lock().unwrap() = records;
    }

    /// Every `(namespace, window)` pair queried so far, in order.
    pub fn queries(&self) -> Vec<(String, QueryWindow)> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl RunQuery for StaticRunQuery {
    async fn query_runs(
        &self,
        namespace: &str,
        window: &QueryWindow,
    ) -> Result<Vec<ResultRecord>, QueryError> {
        self.queries
            .lock()
            .unwrap()
            .push((namespace.to_string(), *window));
        Ok(self.records.lock().unwrap().clone())
    }
}

// ---------------------------------------------------------------------------
// RecordingChannelClient
// ---------------------------------------------------------------------------

/// A message captured by `RecordingChannelClient`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub guild_id: u64,
    pub channel_name: String,
    pub text: String,
}

/// Channel client capturing every delivered message. Counts attempts
/// separately from successes so tests can observe retries after a
/// delivery failure.
#[derive(Debug, Default)]
pub struct RecordingChannelClient {
    sent: Mutex<Vec<SentMessage>>,
    attempts: Mutex<usize>,
    channel_missing: Mutex<bool>,
}

impl RecordingChannelClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent sends fail with a channel-not-found condition.
    pub fn set_channel_missing(&self, missing: bool) {
        *self.channel_missing.lock().unwrap() = missing;
    }

    /// Messages successfully delivered so far, in order.
    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }

    /// Number of delivery attempts, including failed ones.
    pub fn attempt_count(&self) -> usize {
        *self.attempts.lock().unwrap()
    }
}

#[async_trait]
impl ChannelClient for RecordingChannelClient {
    async fn wait_until_ready(&self) -> Result<(), DeliveryError> {
        Ok(())
    }

    async fn send_message(
        &self,
        guild_id: u64,
        channel_name: &str,
        text: &str,
    ) -> Result<(), DeliveryError> {
        *self.attempts.lock().unwrap() += 1;
        if *self.channel_missing.lock().unwrap() {
            return Err(DeliveryError::ChannelNotFound {
                guild_id,
                channel_name: channel_name.to_string(),
            });
        }
        self.sent.lock().unwrap().push(SentMessage {
            guild_id,
            channel_name: channel_name.to_string(),
            text: text.to_string(),
        });
        Ok(())
    }
}
