//! Configured competition set, refreshed from the remote source.

use std::sync::Mutex;

use crate::model::CompetitionDefinition;

/// Holds the currently configured competitions.
///
/// Contents are replaced wholesale on every successful refresh; a failed
/// refresh keeps the previous contents (stale-but-available). Sweeps take
/// a snapshot so iteration is decoupled from concurrent replacement.
#[derive(Debug, Default)]
pub struct CompetitionRegistry {
    competitions: Mutex<Vec<CompetitionDefinition>>,
}

impl CompetitionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the registry contents atomically.
    pub fn replace(&self, competitions: Vec<CompetitionDefinition>) {
        let mut current = self.competitions.lock().unwrap();
        *current = competitions;
    }

    /// Clone the current contents for one sweep.
    pub fn snapshot(&self) -> Vec<CompetitionDefinition> {
        self.competitions.lock().unwrap().clone()
    }

    /// Number of configured competitions.
    pub fn len(&self) -> usize {
        self.competitions.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
