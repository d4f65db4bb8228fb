//! Domain models for Podium.
//!
//! Canonical definitions for the core entities:
//! - `CompetitionDefinition`: one configured competition and its schedule
//! - `ResultRecord`: one reported outcome from the tracking backend
//! - `AggregatedOutcome`: the resolved winner for one occurrence
//! - `QueryWindow`: the time range of records eligible for an occurrence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Summary field carrying a validator's score for the tested model.
pub const FIELD_SCORE: &str = "score";

/// Summary field naming the hotkey a validator voted for.
pub const FIELD_WINNING_HOTKEY: &str = "winning_hotkey";

/// Summary field identifying the miner a record belongs to.
pub const FIELD_MINER_HOTKEY: &str = "miner_hotkey";

/// Summary field with the number of dataset entries evaluated.
pub const FIELD_TESTED_ENTRIES: &str = "tested_entries";

/// One configured competition, parsed from the remote configuration
/// document. Immutable once parsed; the registry replaces the full set on
/// every refresh, never individual entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitionDefinition {
    /// Unique competition identifier, also the tracking backend project.
    pub competition_id: String,

    /// Competition category label.
    pub category: String,

    /// Daily evaluation slots as `"HH:MM"` UTC times, in document order.
    pub evaluation_times: Vec<String>,

    /// Dataset repository id (opaque).
    pub dataset_hf_repo: String,

    /// Dataset filename inside the repository (opaque).
    pub dataset_hf_filename: String,

    /// Dataset repository kind (opaque).
    pub dataset_hf_repo_type: String,
}

impl CompetitionDefinition {
    /// Enforce the non-empty constraints the remote document must satisfy.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let constraints: [(&'static str, bool); 6] = [
            ("competition_id", self.competition_id.is_empty()),
            ("category", self.category.is_empty()),
            ("evaluation_times", self.evaluation_times.is_empty()),
            ("dataset_hf_repo", self.dataset_hf_repo.is_empty()),
            ("dataset_hf_filename", self.dataset_hf_filename.is_empty()),
            ("dataset_hf_repo_type", self.dataset_hf_repo_type.is_empty()),
        ];
        for (field, empty) in constraints {
            if empty {
                return Err(ValidationError::EmptyField {
                    competition_id: self.competition_id.clone(),
                    field,
                });
            }
        }
        Ok(())
    }
}

/// One reported outcome from the tracking backend: the run's summary
/// fields as loosely-typed JSON.
///
/// Records are consumed read-only. Accessors return `None` when a field is
/// absent or has an unexpected type; callers decide whether that is an
/// error (see the aggregator's required-field extraction).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultRecord(serde_json::Map<String, serde_json::Value>);

impl ResultRecord {
    pub fn new(summary: serde_json::Map<String, serde_json::Value>) -> Self {
        ResultRecord(summary)
    }

    /// Whether the record carries `field` at all.
    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// String value of `field`, if present and a string.
    pub fn str_field(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(|value| value.as_str())
    }

    /// Non-negative integer value of `field`, if present and integral.
    pub fn u64_field(&self, field: &str) -> Option<u64> {
        self.0.get(field).and_then(|value| value.as_u64())
    }

    /// Numeric value of `field` as a float, if present and numeric.
    pub fn f64_field(&self, field: &str) -> Option<f64> {
        self.0.get(field).and_then(|value| value.as_f64())
    }
}

/// The resolved winner of one competition occurrence.
///
/// Constructed fresh per successful aggregation and never mutated. Either
/// every field is populated or aggregation fails and no outcome exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedOutcome {
    /// Competition this outcome belongs to.
    pub competition_id: String,

    /// The occurrence instant the outcome was computed for.
    pub occurrence: DateTime<Utc>,

    /// Number of dataset entries the winner was evaluated on.
    pub dataset_size: u64,

    /// Count of distinct records that contributed a score.
    pub tested_models: u32,

    /// The hotkey elected by majority vote.
    pub winning_hotkey: String,

    /// The winner's reported score.
    pub score: f64,
}

/// Half-open time range `[created_after, created_before)` of result
/// records eligible for one occurrence's outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryWindow {
    pub created_after: DateTime<Utc>,
    pub created_before: DateTime<Utc>,
}
