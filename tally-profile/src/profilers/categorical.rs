//! Categorical column profiler.
//!
//! Tracks exact value frequencies for a column, decides whether the column
//! looks categorical, and derives diversity statistics from the counts.
//! Profiles over disjoint batches merge into the profile a single pass over
//! the combined data would have produced.

use arrow::array::{
    Array, BooleanArray, Float64Array, Int64Array, LargeStringArray, StringArray, StringViewArray,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, instrument};

use crate::profilers::diff::{diff_profiles, CategoricalDiff, DiffSide};
use crate::profilers::diversity::{gini_impurity, unalikeability};
use crate::profilers::{
    BaseColumnState, CategoricalOptions, Category, ColumnProfile, FrequencyCounter,
    HomogeneityTest, ProfilerError, ProfilerResult, ProfilerState,
};

/// A column with at most this many distinct values is categorical outright.
const SMALL_UNIQUE_CEILING: usize = 10;
/// Above the ceiling, the distinct-to-sample ratio must stay at or below
/// this threshold for the column to count as categorical.
const UNIQUE_RATIO_THRESHOLD: f64 = 0.2;
/// Timing key for the frequency-counting pass.
const CATEGORIES_TIMER: &str = "categories";
/// Profile kind tag used for reports and mismatch errors.
const PROFILE_TYPE: &str = "category";

/// One category and its observed count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    /// The category key, `None` for the missing-value bucket.
    pub category: Category,
    pub count: u64,
}

/// Statistics reported only when the column looks categorical.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalStatistics {
    /// Every observed category, ordered by count descending.
    pub categories: Vec<Category>,
    pub gini_impurity: Option<f64>,
    pub unalikeability: Option<f64>,
    /// Per-category counts ordered by count descending, truncated to the
    /// configured top-k when one is set.
    pub categorical_count: Vec<CategoryCount>,
}

/// Statistics section of a profile report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportStatistics {
    pub unique_count: u64,
    pub unique_ratio: f64,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub categorical_stats: Option<CategoricalStatistics>,
}

/// Point-in-time report of a categorical profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalReport {
    pub categorical: bool,
    pub statistics: ReportStatistics,
    /// Seconds spent per named calculation, accumulated across updates.
    pub times: HashMap<String, f64>,
}

/// Decides whether a frequency distribution looks categorical.
///
/// A small distinct count is categorical regardless of sample size; larger
/// ones qualify only when the distinct-to-sample ratio is at or below the
/// threshold. With no samples only the small-count rule can apply.
pub fn is_categorical(counts: &FrequencyCounter, sample_size: u64) -> bool {
    let unique = counts.distinct_count();
    if unique <= SMALL_UNIQUE_CEILING {
        return true;
    }
    sample_size > 0 && unique as f64 / sample_size as f64 <= UNIQUE_RATIO_THRESHOLD
}

/// Exact-frequency profile of a single column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoricalProfile {
    base: BaseColumnState,
    counts: FrequencyCounter,
    options: CategoricalOptions,
}

impl CategoricalProfile {
    /// Creates an empty profile with default options.
    pub fn new(column_name: impl Into<String>) -> Self {
        Self {
            base: BaseColumnState::new(column_name),
            counts: FrequencyCounter::new(),
            options: CategoricalOptions::default(),
        }
    }

    /// Creates an empty profile with the given options.
    pub fn with_options(
        column_name: impl Into<String>,
        options: CategoricalOptions,
    ) -> ProfilerResult<Self> {
        options.validate()?;
        Ok(Self {
            base: BaseColumnState::new(column_name),
            counts: FrequencyCounter::new(),
            options,
        })
    }

    /// The profiled column's name.
    pub fn column_name(&self) -> &str {
        self.base.column_name()
    }

    /// Total non-null values observed.
    pub fn sample_size(&self) -> u64 {
        self.base.sample_size()
    }

    /// Seconds spent per named calculation.
    pub fn times(&self) -> &HashMap<String, f64> {
        self.base.times()
    }

    /// The underlying frequency counter.
    pub fn counts(&self) -> &FrequencyCounter {
        &self.counts
    }

    pub fn options(&self) -> &CategoricalOptions {
        &self.options
    }

    /// Number of distinct categories, the missing-value bucket included.
    pub fn unique_count(&self) -> usize {
        self.counts.distinct_count()
    }

    /// Distinct categories over sample size, defaulting to 1.0 with no
    /// samples so an empty column never reads as repetitive. The distinct
    /// count includes the missing-value bucket while the sample size does
    /// not, so a sparse column with nulls can exceed 1.0.
    pub fn unique_ratio(&self) -> f64 {
        if self.sample_size() == 0 {
            return 1.0;
        }
        self.unique_count() as f64 / self.sample_size() as f64
    }

    /// Whether the column looks categorical under the current counts.
    pub fn is_categorical(&self) -> bool {
        is_categorical(&self.counts, self.sample_size())
    }

    /// Observed categories ordered by count descending, ties broken by key
    /// with the missing-value bucket first.
    pub fn categories(&self) -> Vec<Category> {
        self.counts
            .sorted_counts()
            .into_iter()
            .map(|(category, _)| category)
            .collect()
    }

    /// Gini impurity of the non-missing value distribution.
    pub fn gini_impurity(&self) -> Option<f64> {
        gini_impurity(&self.counts, self.sample_size())
    }

    /// Coefficient of unalikeability of the non-missing value distribution.
    pub fn unalikeability(&self) -> Option<f64> {
        unalikeability(&self.counts, self.sample_size())
    }

    /// Folds an arrow array into the profile.
    ///
    /// Null slots land in the missing-value bucket without counting toward
    /// the sample size. An empty array changes nothing. An unsupported
    /// array type is rejected before any state changes.
    #[instrument(skip(self, values), fields(column = %self.base.column_name(), rows = values.len()))]
    pub fn update_from_array(&mut self, values: &dyn Array) -> ProfilerResult<()> {
        if values.is_empty() {
            debug!("empty batch, nothing to update");
            return Ok(());
        }

        let non_null = (values.len() - values.null_count()) as u64;
        let base = &mut self.base;
        let counts = &mut self.counts;
        base.try_timed(CATEGORIES_TIMER, || fold_array(counts, values))?;
        base.add_samples(non_null);

        debug!(
            sample_size = self.base.sample_size(),
            unique = self.counts.distinct_count(),
            "profile updated"
        );
        Ok(())
    }

    /// Folds an iterator of optional string values into the profile.
    pub fn update<'a, I>(&mut self, values: I)
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        let mut values = values.into_iter().peekable();
        if values.peek().is_none() {
            debug!(column = %self.base.column_name(), "empty batch, nothing to update");
            return;
        }

        let base = &mut self.base;
        let counts = &mut self.counts;
        let mut non_null = 0u64;
        base.timed(CATEGORIES_TIMER, || {
            for value in values {
                if value.is_some() {
                    non_null += 1;
                }
                counts.increment(value);
            }
        });
        base.add_samples(non_null);
    }

    /// Merges two profiles of the same column into a new one.
    ///
    /// Counts and timings add, sample sizes add, and neither input changes.
    /// The merged profile starts from default options. Profiles of
    /// different columns do not merge.
    pub fn merge(&self, other: &Self) -> ProfilerResult<Self> {
        let base = self.base.merge_with(&other.base)?;
        Ok(Self {
            base,
            counts: self.counts.merge(&other.counts),
            options: CategoricalOptions::default(),
        })
    }

    /// Builds a point-in-time report.
    ///
    /// The category-level statistics are present only when the column looks
    /// categorical. Counts are ordered descending and truncated to the
    /// configured top-k; the category list is never truncated.
    pub fn report(&self) -> CategoricalReport {
        let categorical = self.is_categorical();
        let categorical_stats = categorical.then(|| {
            let sorted = self.counts.sorted_counts();
            let categories = sorted.iter().map(|(category, _)| category.clone()).collect();
            let top_k = self.options.top_k_categories.unwrap_or(sorted.len());
            let categorical_count = sorted
                .into_iter()
                .take(top_k)
                .map(|(category, count)| CategoryCount { category, count })
                .collect();
            CategoricalStatistics {
                categories,
                gini_impurity: self.gini_impurity(),
                unalikeability: self.unalikeability(),
                categorical_count,
            }
        });

        CategoricalReport {
            categorical,
            statistics: ReportStatistics {
                unique_count: self.unique_count() as u64,
                unique_ratio: self.unique_ratio(),
                categorical_stats,
            },
            times: self.base.times().clone(),
        }
    }

    /// Compares this profile against another with the default homogeneity
    /// test backend.
    pub fn diff(&self, other: &Self) -> CategoricalDiff {
        self.diff_with(other, &HomogeneityTest::new())
    }

    /// Compares this profile against another, running the homogeneity test
    /// over the two count distributions when both look categorical.
    pub fn diff_with(&self, other: &Self, test: &HomogeneityTest) -> CategoricalDiff {
        diff_profiles(&self.diff_side(), &other.diff_side(), test)
    }

    fn diff_side(&self) -> DiffSide<'_> {
        DiffSide {
            counts: &self.counts,
            is_categorical: self.is_categorical(),
            unique_ratio: self.unique_ratio(),
            gini_impurity: self.gini_impurity(),
            unalikeability: self.unalikeability(),
        }
    }
}

impl ProfilerState for CategoricalProfile {
    fn merge(states: Vec<Self>) -> ProfilerResult<Self> {
        let mut states = states.into_iter();
        let first = states
            .next()
            .ok_or_else(|| ProfilerError::profile_merge("no states to merge"))?;
        states.try_fold(first, |merged, state| merged.merge(&state))
    }

    fn is_empty(&self) -> bool {
        self.counts.is_empty() && self.base.sample_size() == 0
    }
}

impl ColumnProfile for CategoricalProfile {
    fn profile_type(&self) -> &'static str {
        PROFILE_TYPE
    }

    fn column_name(&self) -> &str {
        self.base.column_name()
    }

    fn sample_size(&self) -> u64 {
        self.base.sample_size()
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn merge_dyn(&self, other: &dyn ColumnProfile) -> ProfilerResult<Box<dyn ColumnProfile>> {
        let other = other
            .as_any()
            .downcast_ref::<Self>()
            .ok_or_else(|| ProfilerError::kind_mismatch(PROFILE_TYPE, other.profile_type()))?;
        Ok(Box::new(self.merge(other)?))
    }

    fn diff_dyn(&self, other: &dyn ColumnProfile) -> ProfilerResult<serde_json::Value> {
        let other = other
            .as_any()
            .downcast_ref::<Self>()
            .ok_or_else(|| ProfilerError::kind_mismatch(PROFILE_TYPE, other.profile_type()))?;
        Ok(serde_json::to_value(self.diff(other))?)
    }

    fn report_json(&self) -> ProfilerResult<serde_json::Value> {
        Ok(serde_json::to_value(self.report())?)
    }
}

/// Folds every slot of an arrow array into the counter, nulls landing in
/// the missing-value bucket. Numeric and boolean arrays are counted by
/// their canonical string rendering.
fn fold_array(counts: &mut FrequencyCounter, values: &dyn Array) -> ProfilerResult<()> {
    if let Some(array) = values.as_any().downcast_ref::<StringArray>() {
        for value in array {
            counts.increment(value);
        }
    } else if let Some(array) = values.as_any().downcast_ref::<LargeStringArray>() {
        for value in array {
            counts.increment(value);
        }
    } else if let Some(array) = values.as_any().downcast_ref::<StringViewArray>() {
        for value in array {
            counts.increment(value);
        }
    } else if let Some(array) = values.as_any().downcast_ref::<Int64Array>() {
        for value in array {
            counts.increment(value.map(|v| v.to_string()).as_deref());
        }
    } else if let Some(array) = values.as_any().downcast_ref::<Float64Array>() {
        for value in array {
            counts.increment(value.map(|v| v.to_string()).as_deref());
        }
    } else if let Some(array) = values.as_any().downcast_ref::<BooleanArray>() {
        for value in array {
            counts.increment(value.map(|v| v.to_string()).as_deref());
        }
    } else {
        return Err(ProfilerError::invalid_data(format!(
            "unsupported array type for categorical profiling: {:?}",
            values.data_type()
        )));
    }
    Ok(())
}
