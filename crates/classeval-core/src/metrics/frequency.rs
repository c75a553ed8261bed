//! Label frequency collection
//!
//! Counts occurrences of each distinct label in one column of a record stream
//! and selects the most frequent labels under a size bound.

use std::collections::HashMap;

use crate::error::EvalResult;
use crate::record::{LabelColumn, LabeledRecord};

/// Occurrence count per distinct label
///
/// Only observed labels have entries, so no count is ever zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelFrequencies {
    counts: HashMap<String, u64>,
    total: u64,
}

impl LabelFrequencies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of `label`
    pub fn observe(&mut self, label: &str) {
        match self.counts.get_mut(label) {
            Some(count) => *count += 1,
            None => {
                self.counts.insert(label.to_string(), 1);
            }
        }
        self.total += 1;
    }

    /// Occurrences of `label`, zero if never observed
    pub fn count(&self, label: &str) -> u64 {
        self.counts.get(label).copied().unwrap_or(0)
    }

    /// Number of distinct labels
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    /// Sum of all counts
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(label, count)| (label.as_str(), *count))
    }

    pub fn into_map(self) -> HashMap<String, u64> {
        self.counts
    }

    /// The `size` most frequent labels, returned in ascending label order
    ///
    /// Labels with equal counts are ranked by ascending label, so the bound
    /// keeps the lexicographically smallest of a tied group.
    pub fn top(&self, size: usize) -> Vec<String> {
        let mut ranked: Vec<(&str, u64)> = self.iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(size);

        let mut selected: Vec<String> = ranked.into_iter().map(|(label, _)| label.to_string()).collect();
        selected.sort();
        selected
    }
}

/// Scan `records` once and count the labels in `column`
///
/// The first error from the stream is returned unchanged.
pub fn collect<I>(records: I, column: LabelColumn) -> EvalResult<HashMap<String, u64>>
where
    I: IntoIterator<Item = EvalResult<LabeledRecord>>,
{
    let mut frequencies = LabelFrequencies::new();
    for record in records {
        frequencies.observe(record?.label(column));
    }
    Ok(frequencies.into_map())
}
