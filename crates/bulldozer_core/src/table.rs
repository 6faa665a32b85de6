use std::collections::HashMap;

use crate::LogKey;

/// Occurrence counts per [`LogKey`] for one harvest run.
///
/// Entries remember the order in which keys were first seen so that ties in
/// [`FrequencyTable::sorted_by_frequency`] come out deterministically.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FrequencyTable {
    index: HashMap<LogKey, usize>,
    entries: Vec<(LogKey, u64)>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one more occurrence of `key`.
    pub fn record(&mut self, key: LogKey) {
        if let Some(&slot) = self.index.get(&key) {
            self.entries[slot].1 += 1;
            return;
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, 1));
    }

    pub fn count(&self, key: &LogKey) -> u64 {
        self.index
            .get(key)
            .map(|&slot| self.entries[slot].1)
            .unwrap_or(0)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts, i.e. the number of records ingested.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    /// Entries in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&LogKey, u64)> {
        self.entries.iter().map(|(key, count)| (key, *count))
    }

    /// Entries by descending count; equal counts keep first-seen order.
    pub fn sorted_by_frequency(&self) -> Vec<(&LogKey, u64)> {
        let mut sorted: Vec<_> = self.iter().collect();
        sorted.sort_by(|a, b| b.1.cmp(&a.1));
        sorted
    }
}
