//! Error taxonomy for the announcement path.
//!
//! Every variant here is contained to the smallest enclosing scope: a
//! schedule or aggregation failure kills one competition's sweep iteration,
//! a config fetch failure kills one refresh phase. Nothing in this module
//! is fatal to the process.

use thiserror::Error;

/// Errors from resolving a competition's current occurrence.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("evaluation schedule is empty")]
    EmptySchedule,

    #[error("invalid time slot {slot:?}: expected HH:MM")]
    InvalidTimeSlot { slot: String },
}

/// Errors from aggregating a window of result records.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AggregationError {
    /// The window held no records at all. Informational: the occurrence
    /// stays unannounced and is retried on the next sweep.
    #[error("no result records in the aggregation window")]
    NoRecords,

    /// Records were present but none carried a winning-hotkey vote.
    #[error("records carry no winning-hotkey votes")]
    NoVotes,

    /// The elected winner never appears as a miner hotkey on any record,
    /// so the outcome has no traceable source.
    #[error("no record found for elected winner {winning_hotkey}")]
    WinnerRecordNotFound { winning_hotkey: String },

    /// The winner's record lacks a field the outcome requires.
    #[error("winner record is missing required field {field:?}")]
    MissingField { field: &'static str },
}

/// Competition definition constraint violations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("competition {competition_id:?}: field {field:?} must be non-empty")]
    EmptyField {
        competition_id: String,
        field: &'static str,
    },
}

/// Errors from refreshing the competition registry.
#[derive(Debug, Error)]
pub enum ConfigFetchError {
    #[error("config fetch transport error: {0}")]
    Transport(String),

    #[error("config fetch returned status {status}")]
    Status { status: u16 },

    #[error("config document is not valid JSON: {0}")]
    Parse(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Errors from querying the tracking backend.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("run query transport error: {0}")]
    Transport(String),

    #[error("run query returned status {status}")]
    Status { status: u16 },

    #[error("run query response is not valid JSON: {0}")]
    Parse(String),
}

/// Errors from delivering an announcement to the chat platform.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("guild {guild_id} not found")]
    GuildNotFound { guild_id: u64 },

    #[error("channel {channel_name:?} not found in guild {guild_id}")]
    ChannelNotFound { guild_id: u64, channel_name: String },

    #[error("chat platform rejected credentials (status {status})")]
    Auth { status: u16 },

    #[error("chat platform returned status {status}")]
    Status { status: u16 },

    #[error("delivery transport error: {0}")]
    Transport(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_error_display() {
        let err = ScheduleError::InvalidTimeSlot {
            slot: "25:99".to_string(),
        };
        assert!(err.to_string().contains("25:99"));
        assert!(err.to_string().contains("HH:MM"));
    }

    #[test]
    fn test_aggregation_error_display() {
        let err = AggregationError::WinnerRecordNotFound {
            winning_hotkey: "hk-a".to_string(),
        };
        assert!(err.to_string().contains("hk-a"));

        let err = AggregationError::MissingField { field: "score" };
        assert!(err.to_string().contains("score"));
    }

    #[test]
    fn test_delivery_error_display() {
        let err = DeliveryError::ChannelNotFound {
            guild_id: 42,
            channel_name: "results".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("results"));
        assert!(msg.contains("42"));
    }

    #[test]
    fn test_config_fetch_wraps_validation() {
        let err: ConfigFetchError = ValidationError::EmptyField {
            competition_id: "melanoma-1".to_string(),
            field: "category",
        }
        .into();
        assert!(err.to_string().contains("category"));
    }
}
