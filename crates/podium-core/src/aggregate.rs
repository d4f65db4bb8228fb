//! Majority-vote aggregation over a window of result records.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::error::AggregationError;
use crate::model::{
    AggregatedOutcome, ResultRecord, FIELD_MINER_HOTKEY, FIELD_SCORE, FIELD_TESTED_ENTRIES,
    FIELD_WINNING_HOTKEY,
};

/// Aggregate one occurrence's result records into a single outcome.
///
/// Validators report independently and may disagree; the winner is the
/// hotkey with the most `winning_hotkey` votes, ties broken by whichever
/// value was encountered first in record order. The first record reporting
/// the winner's own `miner_hotkey` is the authoritative source for the
/// dataset size and score; those fields are required, never defaulted.
pub fn aggregate_results(
    competition_id: &str,
    occurrence: DateTime<Utc>,
    records: &[ResultRecord],
) -> Result<AggregatedOutcome, AggregationError> {
    if records.is_empty() {
        return Err(AggregationError::NoRecords);
    }

    let mut tested_models = 0u32;
    let mut votes: Vec<&str> = Vec::new();
    for record in records {
        if record.has(FIELD_SCORE) {
            tested_models += 1;
        }
        if let Some(choice) = record.str_field(FIELD_WINNING_HOTKEY) {
            votes.push(choice);
        }
    }

    let winning_hotkey = elect_winner(&votes).ok_or(AggregationError::NoVotes)?;

    let winner_record = records
        .iter()
        .find(|record| record.str_field(FIELD_MINER_HOTKEY) == Some(winning_hotkey))
        .ok_or_else(|| AggregationError::WinnerRecordNotFound {
            winning_hotkey: winning_hotkey.to_string(),
        })?;

    let dataset_size = winner_record
        .u64_field(FIELD_TESTED_ENTRIES)
        .ok_or(AggregationError::MissingField {
            field: FIELD_TESTED_ENTRIES,
        })?;
    let score = winner_record
        .f64_field(FIELD_SCORE)
        .ok_or(AggregationError::MissingField { field: FIELD_SCORE })?;

    Ok(AggregatedOutcome {
        competition_id: competition_id.to_string(),
        occurrence,
        dataset_size,
        tested_models,
        winning_hotkey: winning_hotkey.to_string(),
        score,
    })
}

/// Mode of the votes; ties broken by first encounter, so the result is
/// stable over the input order.
fn elect_winner<'a>(votes: &[&'a str]) -> Option<&'a str> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for &vote in votes {
        *counts.entry(vote).or_insert(0) += 1;
    }

    let mut winner: Option<(&'a str, usize)> = None;
    for &vote in votes {
        let count = counts[vote];
        if winner.map_or(true, |(_, best)| count > best) {
            winner = Some((vote, count));
        }
    }
    winner.map(|(hotkey, _)| hotkey)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn record(fields: serde_json::Value) -> ResultRecord {
        serde_json::from_value(fields).expect("record fixture must be a JSON object")
    }

    fn occurrence() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 15, 0, 0).unwrap()
    }

    #[test]
    fn test_majority_wins() {
        let records = vec![
            record(json!({"winning_hotkey": "A", "miner_hotkey": "C"})),
            record(json!({"winning_hotkey": "B", "miner_hotkey": "B", "tested_entries": 100, "score": 0.5})),
            record(json!({"winning_hotkey": "A", "miner_hotkey": "A", "tested_entries": 500, "score": 0.87})),
        ];

        let outcome = aggregate_results("melanoma-1", occurrence(), &records)
            .expect("aggregation failed");
        assert_eq!(outcome.winning_hotkey, "A");
        assert_eq!(outcome.dataset_size, 500);
        assert_eq!(outcome.score, 0.87);
        assert_eq!(outcome.tested_models, 2);
        assert_eq!(outcome.competition_id, "melanoma-1");
        assert_eq!(outcome.occurrence, occurrence());
    }

    #[test]
    fn test_tie_broken_by_first_encountered() {
        let records = vec![
            record(json!({"winning_hotkey": "A", "miner_hotkey": "A", "tested_entries": 10, "score": 0.4})),
            record(json!({"winning_hotkey": "B", "miner_hotkey": "B", "tested_entries": 20, "score": 0.9})),
        ];

        let outcome = aggregate_results("melanoma-1", occurrence(), &records)
            .expect("aggregation failed");
        assert_eq!(outcome.winning_hotkey, "A");
    }

    #[test]
    fn test_first_matching_winner_record_is_authoritative() {
        let records = vec![
            record(json!({"winning_hotkey": "A", "miner_hotkey": "A", "tested_entries": 500, "score": 0.87})),
            record(json!({"winning_hotkey": "A", "miner_hotkey": "A", "tested_entries": 900, "score": 0.10})),
        ];

        let outcome = aggregate_results("melanoma-1", occurrence(), &records)
            .expect("aggregation failed");
        assert_eq!(outcome.dataset_size, 500);
        assert_eq!(outcome.score, 0.87);
    }

    #[test]
    fn test_empty_window_yields_no_outcome() {
        let err =
            aggregate_results("melanoma-1", occurrence(), &[]).expect_err("must fail");
        assert_eq!(err, AggregationError::NoRecords);
    }

    #[test]
    fn test_records_without_votes_yield_no_outcome() {
        let records = vec![
            record(json!({"miner_hotkey": "A", "score": 0.8})),
            record(json!({"miner_hotkey": "B"})),
        ];
        let err = aggregate_results("melanoma-1", occurrence(), &records)
            .expect_err("must fail");
        assert_eq!(err, AggregationError::NoVotes);
    }

    #[test]
    fn test_untraceable_winner_fails() {
        let records = vec![
            record(json!({"winning_hotkey": "A", "miner_hotkey": "B"})),
            record(json!({"winning_hotkey": "A", "miner_hotkey": "C"})),
        ];
        let err = aggregate_results("melanoma-1", occurrence(), &records)
            .expect_err("must fail");
        assert_eq!(
            err,
            AggregationError::WinnerRecordNotFound {
                winning_hotkey: "A".to_string()
            }
        );
    }

    #[test]
    fn test_missing_dataset_size_fails() {
        let records = vec![record(
            json!({"winning_hotkey": "A", "miner_hotkey": "A", "score": 0.87}),
        )];
        let err = aggregate_results("melanoma-1", occurrence(), &records)
            .expect_err("must fail");
        assert_eq!(
            err,
            AggregationError::MissingField {
                field: FIELD_TESTED_ENTRIES
            }
        );
    }

    #[test]
    fn test_missing_score_fails() {
        let records = vec![record(
            json!({"winning_hotkey": "A", "miner_hotkey": "A", "tested_entries": 500}),
        )];
        let err = aggregate_results("melanoma-1", occurrence(), &records)
            .expect_err("must fail");
        assert_eq!(err, AggregationError::MissingField { field: FIELD_SCORE });
    }

    #[test]
    fn test_elect_winner_empty() {
        assert_eq!(elect_winner(&[]), None);
    }

    #[test]
    fn test_elect_winner_mode() {
        assert_eq!(elect_winner(&["B", "A", "A", "B", "A"]), Some("A"));
    }

    #[test]
    fn test_elect_winner_tie_is_stable() {
        assert_eq!(elect_winner(&["B", "A", "A", "B"]), Some("B"));
    }
}
