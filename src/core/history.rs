// File: src/core/history.rs
use crate::core::types::TranslationRecord;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

pub const HISTORY_CAPACITY: usize = 100;

/// Bounded translation history, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<TranslationRecord>", into = "Vec<TranslationRecord>")]
pub struct History {
    records: VecDeque<TranslationRecord>,
}

impl History {
    pub fn new() -> Self {
        Self { records: VecDeque::with_capacity(HISTORY_CAPACITY) }
    }

    /// Builds a history from newest-first records, keeping at most
    /// `HISTORY_CAPACITY` of them.
    pub fn from_records(records: impl IntoIterator<Item = TranslationRecord>) -> Self {
        Self { records: records.into_iter().take(HISTORY_CAPACITY).collect() }
    }

    /// Adds a record at the front. O(1); evicts the oldest record when full.
    pub fn push(&mut self, record: TranslationRecord) {
        if self.records.len() == HISTORY_CAPACITY {
            self.records.pop_back();
        }
        self.records.push_front(record);
    }

    pub fn newest(&self) -> Option<&TranslationRecord> {
        self.records.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TranslationRecord> + '_ {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Next record id: `now_ms`, or one past the newest id if the clock has
    /// not moved forward. Saturates at `u64::MAX`.
    pub fn next_id(&self, now_ms: u64) -> u64 {
        match self.newest() {
            Some(last) if last.id >= now_ms => last.id.saturating_add(1),
            _ => now_ms,
        }
    }
}

impl From<Vec<TranslationRecord>> for History {
    fn from(records: Vec<TranslationRecord>) -> Self {
        Self::from_records(records)
    }
}

impl From<History> for Vec<TranslationRecord> {
    fn from(history: History) -> Self {
        history.records.into()
    }
}
