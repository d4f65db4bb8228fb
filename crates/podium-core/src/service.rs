//! Two-phase refresh cycle: registry refresh, then announcement sweep.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, error, info, warn};

use crate::aggregate::aggregate_results;
use crate::compose::compose_announcement;
use crate::error::{AggregationError, DeliveryError, QueryError, ScheduleError};
use crate::gateway::{ChannelClient, ConfigSource, RunQuery};
use crate::ledger::AnnouncementLedger;
use crate::model::{CompetitionDefinition, QueryWindow};
use crate::registry::CompetitionRegistry;
use crate::schedule::resolve_occurrence;

/// Grace period excluded from the top of every aggregation window, in
/// minutes. Records close to "now" may still be arriving; announcing on
/// them would risk a partial data set.
const DEFAULT_ANNOUNCEMENT_DELAY_MINS: i64 = 15;

/// Per-competition sweep failure, contained to that iteration.
#[derive(Debug, thiserror::Error)]
pub enum SweepError {
    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Aggregation(#[from] AggregationError),

    #[error(transparent)]
    Delivery(#[from] DeliveryError),
}

/// Orchestrates one refresh cycle over injected collaborators.
///
/// Phase A replaces the competition registry from the remote source;
/// Phase B evaluates every configured competition and announces at most
/// one new occurrence each. The two phases are fault-isolated: a failure
/// in either is logged and never aborts the other, the cycle, or the
/// process.
pub struct Announcer {
    config_source: Arc<dyn ConfigSource>,
    run_query: Arc<dyn RunQuery>,
    channel_client: Arc<dyn ChannelClient>,
    registry: CompetitionRegistry,
    ledger: AnnouncementLedger,
    entity: String,
    guild_id: u64,
    channel_name: String,
    announcement_delay: Duration,
}

impl Announcer {
    pub fn new(
        config_source: Arc<dyn ConfigSource>,
        run_query: Arc<dyn RunQuery>,
        channel_client: Arc<dyn ChannelClient>,
        entity: impl Into<String>,
        guild_id: u64,
        channel_name: impl Into<String>,
    ) -> Self {
        Announcer {
            config_source,
            run_query,
            channel_client,
            registry: CompetitionRegistry::new(),
            ledger: AnnouncementLedger::new(),
            entity: entity.into(),
            guild_id,
            channel_name: channel_name.into(),
            announcement_delay: Duration::minutes(DEFAULT_ANNOUNCEMENT_DELAY_MINS),
        }
    }

    /// Override the default 15 minute grace period.
    pub fn with_announcement_delay(mut self, delay: Duration) -> Self {
        self.announcement_delay = delay;
        self
    }

    /// The current competition registry.
    pub fn registry(&self) -> &CompetitionRegistry {
        &self.registry
    }

    /// The announcement deduplication ledger.
    pub fn ledger(&self) -> &AnnouncementLedger {
        &self.ledger
    }

    /// Run both phases once against the wall clock.
    pub async fn run_cycle(&self) {
        self.run_cycle_at(Utc::now()).await;
    }

    /// Run both phases once with an explicit clock, for deterministic
    /// tests and replays.
    pub async fn run_cycle_at(&self, now: DateTime<Utc>) {
        self.refresh_registry().await;
        self.sweep_announcements(now).await;
    }

    /// Phase A: replace the registry from the remote source. A failed
    /// fetch keeps the previous contents (stale-but-available).
    pub async fn refresh_registry(&self) {
        info!("refreshing competition config");
        match self.config_source.fetch_competitions().await {
            Ok(competitions) => {
                info!(count = competitions.len(), "competition config refreshed");
                self.registry.replace(competitions);
            }
            Err(err) => {
                warn!(error = %err, "config refresh failed, keeping previous competitions");
            }
        }
    }

    /// Phase B: evaluate every competition in the current registry
    /// snapshot. Iteration errors are contained per competition.
    pub async fn sweep_announcements(&self, now: DateTime<Utc>) {
        for competition in self.registry.snapshot() {
            if let Err(err) = self.announce_competition(&competition, now).await {
                error!(
                    competition_id = %competition.competition_id,
                    error = %err,
                    "announcement sweep iteration failed"
                );
            }
        }
    }

    /// Evaluate one competition: resolve its occurrence, skip when already
    /// announced, otherwise aggregate the window and deliver. The ledger is
    /// updated only after delivery succeeded, so a failed delivery leaves
    /// the occurrence new and it is retried on the next sweep.
    async fn announce_competition(
        &self,
        competition: &CompetitionDefinition,
        now: DateTime<Utc>,
    ) -> Result<(), SweepError> {
        let competition_id = competition.competition_id.as_str();
        let occurrence = resolve_occurrence(&competition.evaluation_times, now)?;

        if !self.ledger.is_new_occurrence(competition_id, occurrence) {
            debug!(competition_id, "occurrence already announced");
            return Ok(());
        }

        let window = QueryWindow {
            created_after: occurrence,
            created_before: now - self.announcement_delay,
        };
        let namespace = format!("{}/{}", self.entity, competition_id);
        let records = self.run_query.query_runs(&namespace, &window).await?;

        let outcome = match aggregate_results(competition_id, occurrence, &records) {
            Ok(outcome) => outcome,
            Err(AggregationError::NoRecords) => {
                info!(competition_id, "no runs in the aggregation window yet");
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };

        let message = compose_announcement(&outcome);
        self.channel_client
            .send_message(self.guild_id, &self.channel_name, &message)
            .await?;
        self.ledger.record_announced(competition_id, occurrence);
        info!(
            competition_id,
            occurrence = %occurrence,
            winning_hotkey = %outcome.winning_hotkey,
            "competition results announced"
        );
        Ok(())
    }
}
