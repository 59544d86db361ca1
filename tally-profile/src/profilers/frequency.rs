//! Frequency counting over observed category values.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::profilers::{ProfilerResult, ProfilerState};

/// A category key. `None` is the missing-value bucket.
pub type Category = Option<String>;

/// Frequency distribution over the values observed in one column.
///
/// Counts are tracked per distinct value, with missing values accumulated in
/// a dedicated bucket so they participate in cardinality and homogeneity
/// computations without colliding with any real value. Counts never decrease
/// and keys are never removed; the only mutations are increments.
///
/// The empty counter is the identity element of [`merge`](Self::merge), and
/// `merge` is commutative and associative, so counters built on independent
/// partitions combine into the same distribution regardless of partitioning
/// or merge order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyCounter {
    /// Count of occurrences for each distinct non-null value.
    value_counts: HashMap<String, u64>,
    /// Count of missing (null) observations.
    null_count: u64,
}

impl FrequencyCounter {
    /// Creates an empty counter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one observation of the given category.
    pub fn increment(&mut self, category: Option<&str>) {
        self.add(category, 1);
    }

    /// Records `count` observations of the given category. Adding a zero
    /// count is a no-op; a zero-count category is never stored as a key.
    pub fn add(&mut self, category: Option<&str>, count: u64) {
        if count == 0 {
            return;
        }
        match category {
            Some(value) => match self.value_counts.get_mut(value) {
                Some(existing) => *existing += count,
                None => {
                    self.value_counts.insert(value.to_string(), count);
                }
            },
            None => self.null_count += count,
        }
    }

    /// Folds a batch of observations into the counter.
    pub fn update<'a>(&mut self, values: impl IntoIterator<Item = Option<&'a str>>) {
        for value in values {
            self.increment(value);
        }
    }

    /// Returns the count recorded for a category, zero if it was never seen.
    pub fn get(&self, category: Option<&str>) -> u64 {
        match category {
            Some(value) => self.value_counts.get(value).copied().unwrap_or(0),
            None => self.null_count,
        }
    }

    /// Number of distinct keys, counting the missing bucket as one key when
    /// it is non-empty.
    pub fn distinct_count(&self) -> usize {
        self.value_counts.len() + usize::from(self.null_count > 0)
    }

    /// Returns true if nothing has been observed.
    pub fn is_empty(&self) -> bool {
        self.value_counts.is_empty() && self.null_count == 0
    }

    /// Total number of observations, missing included.
    pub fn total(&self) -> u64 {
        self.non_null_total() + self.null_count
    }

    /// Total number of non-null observations.
    pub fn non_null_total(&self) -> u64 {
        self.value_counts.values().sum()
    }

    /// Number of missing observations.
    pub fn null_count(&self) -> u64 {
        self.null_count
    }

    /// Iterates over every key and its count. The missing bucket comes last
    /// and only appears when non-empty; value order is unspecified.
    pub fn iter(&self) -> impl Iterator<Item = (Option<&str>, u64)> {
        self.value_counts
            .iter()
            .map(|(value, &count)| (Some(value.as_str()), count))
            .chain((self.null_count > 0).then_some((None, self.null_count)))
    }

    /// Iterates over the non-null values and their counts.
    pub fn values(&self) -> impl Iterator<Item = (&str, u64)> {
        self.value_counts
            .iter()
            .map(|(value, &count)| (value.as_str(), count))
    }

    /// Snapshot of every key and its count, ordered by descending count with
    /// ties broken by key (missing bucket first). The ordering is total, so
    /// the snapshot is deterministic for a given distribution.
    pub fn sorted_counts(&self) -> Vec<(Category, u64)> {
        let mut entries: Vec<(Category, u64)> = self
            .iter()
            .map(|(category, count)| (category.map(str::to_string), count))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        entries
    }

    /// Combines two counters into a new one holding every key of either
    /// side, with counts added. Neither input is modified.
    pub fn merge(&self, other: &Self) -> Self {
        let mut merged = self.clone();
        for (value, &count) in &other.value_counts {
            merged.add(Some(value), count);
        }
        merged.null_count += other.null_count;
        merged
    }
}

impl ProfilerState for FrequencyCounter {
    fn merge(states: Vec<Self>) -> ProfilerResult<Self> {
        let mut merged_counts = HashMap::new();
        let mut null_count = 0;

        for state in states {
            null_count += state.null_count;
            for (value, count) in state.value_counts {
                *merged_counts.entry(value).or_insert(0) += count;
            }
        }

        Ok(FrequencyCounter {
            value_counts: merged_counts,
            null_count,
        })
    }

    fn is_empty(&self) -> bool {
        FrequencyCounter::is_empty(self)
    }
}
