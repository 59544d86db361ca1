//! Bookkeeping shared by every column profile kind.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Instant;

use crate::profilers::{ProfilerError, ProfilerResult, ProfilerState};

/// Per-column bookkeeping common to all profile kinds: which column the
/// profile describes, how many non-null values it has folded in, and the
/// cumulative wall-clock seconds each named calculation has spent.
///
/// Merging requires both sides to describe the same column; sample sizes add
/// and timings add per calculation name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseColumnState {
    column_name: String,
    sample_size: u64,
    times: HashMap<String, f64>,
}

impl BaseColumnState {
    /// Creates an empty state for the named column.
    pub fn new(column_name: impl Into<String>) -> Self {
        Self {
            column_name: column_name.into(),
            sample_size: 0,
            times: HashMap::new(),
        }
    }

    /// Name of the profiled column.
    pub fn column_name(&self) -> &str {
        &self.column_name
    }

    /// Number of non-null values folded in so far.
    pub fn sample_size(&self) -> u64 {
        self.sample_size
    }

    /// Cumulative seconds spent per named calculation.
    pub fn times(&self) -> &HashMap<String, f64> {
        &self.times
    }

    /// Adds newly observed non-null values to the running sample size.
    pub fn add_samples(&mut self, count: u64) {
        self.sample_size += count;
    }

    /// Runs `f` and folds its wall-clock duration into the named timer.
    pub fn timed<T>(&mut self, calculation: &str, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let result = f();
        let elapsed = start.elapsed().as_secs_f64();
        *self.times.entry(calculation.to_string()).or_insert(0.0) += elapsed;
        result
    }

    /// Runs a fallible `f`, folding its duration into the named timer only
    /// when it succeeds. An error propagates with the timers untouched.
    pub fn try_timed<T>(
        &mut self,
        calculation: &str,
        f: impl FnOnce() -> ProfilerResult<T>,
    ) -> ProfilerResult<T> {
        let start = Instant::now();
        let result = f()?;
        let elapsed = start.elapsed().as_secs_f64();
        *self.times.entry(calculation.to_string()).or_insert(0.0) += elapsed;
        Ok(result)
    }

    /// Combines two base states into a new one. Fails if the column names
    /// differ; neither input is modified.
    pub fn merge_with(&self, other: &Self) -> ProfilerResult<Self> {
        if self.column_name != other.column_name {
            return Err(ProfilerError::profile_merge(format!(
                "column names do not match: '{}' vs '{}'",
                self.column_name, other.column_name
            )));
        }

        let mut times = self.times.clone();
        for (calculation, seconds) in &other.times {
            *times.entry(calculation.clone()).or_insert(0.0) += seconds;
        }

        Ok(Self {
            column_name: self.column_name.clone(),
            sample_size: self.sample_size + other.sample_size,
            times,
        })
    }
}

impl ProfilerState for BaseColumnState {
    fn merge(states: Vec<Self>) -> ProfilerResult<Self> {
        let mut states = states.into_iter();
        let first = states
            .next()
            .ok_or_else(|| ProfilerError::profile_merge("no states to merge"))?;
        states.try_fold(first, |merged, state| merged.merge_with(&state))
    }

    fn is_empty(&self) -> bool {
        self.sample_size == 0 && self.times.is_empty()
    }
}
