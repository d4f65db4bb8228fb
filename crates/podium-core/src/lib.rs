//! Podium core
//!
//! Occurrence scheduling, majority-vote result aggregation and
//! announcement deduplication for scheduled competitions. The daemon
//! (`podiumd`) drives [`service::Announcer`] on a timer; the
//! `podium-gateways` crate provides HTTP implementations of the
//! collaborator traits in [`gateway`].

pub mod aggregate;
pub mod compose;
pub mod error;
pub mod fakes;
pub mod gateway;
pub mod ledger;
pub mod model;
pub mod registry;
pub mod schedule;
pub mod service;

// Re-export key types
pub use aggregate::aggregate_results;
pub use compose::compose_announcement;
pub use error::{
    AggregationError, ConfigFetchError, DeliveryError, QueryError, ScheduleError, ValidationError,
};
pub use gateway::{ChannelClient, ConfigSource, RunQuery};
pub use ledger::AnnouncementLedger;
pub use model::{AggregatedOutcome, CompetitionDefinition, QueryWindow, ResultRecord};
pub use registry::CompetitionRegistry;
pub use schedule::resolve_occurrence;
pub use service::{Announcer, SweepError};
