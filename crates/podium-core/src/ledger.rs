//! Announcement deduplication ledger.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};

/// In-memory map from competition id to the last announced occurrence.
///
/// The ledger is the sole enforcement point of the once-per-occurrence
/// invariant: an occurrence equal to the stored entry is skipped,
/// anything else is new. Entries live for the process lifetime only; a
/// restart forgets history and the next sweep may announce the current
/// occurrence again.
#[derive(Debug, Default)]
pub struct AnnouncementLedger {
    entries: Mutex<HashMap<String, DateTime<Utc>>>,
}

impl AnnouncementLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `occurrence` has not yet been announced for `competition_id`.
    pub fn is_new_occurrence(&self, competition_id: &str, occurrence: DateTime<Utc>) -> bool {
        let entries = self.entries.lock().unwrap();
        entries.get(competition_id) != Some(&occurrence)
    }

    /// Record `occurrence` as announced, overwriting any previous entry.
    /// Overwriting with the same value is harmless, so overlapping sweeps
    /// may both record the same occurrence.
    pub fn record_announced(&self, competition_id: &str, occurrence: DateTime<Utc>) {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(competition_id.to_string(), occurrence);
    }
}
