//! Difference reports between two categorical profiles.
//!
//! A diff is read as `self` compared against `other`: numeric deltas are
//! `self - other`, added categories are the ones only `self` has, removed
//! categories are the ones only `other` has.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::profilers::{Category, ChiSquareResult, FrequencyCounter, HomogeneityTest};

/// Difference between two optional numeric values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum NumericDiff {
    /// Both sides agree, including both being absent.
    Unchanged,
    /// Both sides are present; the value is `self - other`.
    Delta(f64),
    /// Exactly one side is present, so no delta exists.
    Undefined,
}

impl NumericDiff {
    /// Compares two optional values.
    pub fn of(ours: Option<f64>, theirs: Option<f64>) -> Self {
        match (ours, theirs) {
            (None, None) => NumericDiff::Unchanged,
            (Some(a), Some(b)) if a == b => NumericDiff::Unchanged,
            (Some(a), Some(b)) => NumericDiff::Delta(a - b),
            _ => NumericDiff::Undefined,
        }
    }

    /// Compares two counts.
    pub fn of_counts(ours: u64, theirs: u64) -> Self {
        Self::of(Some(ours as f64), Some(theirs as f64))
    }
}

/// Difference between two flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoolDiff {
    /// Both sides agree.
    Unchanged,
    /// Only the left-hand profile has the flag set.
    SelfOnly,
    /// Only the right-hand profile has the flag set.
    OtherOnly,
}

impl BoolDiff {
    /// Compares two flags.
    pub fn of(ours: bool, theirs: bool) -> Self {
        match (ours, theirs) {
            (true, false) => BoolDiff::SelfOnly,
            (false, true) => BoolDiff::OtherOnly,
            _ => BoolDiff::Unchanged,
        }
    }
}

/// Set difference between two category key sets, each part sorted with the
/// missing-value bucket first.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SetDiff {
    /// Categories only the left-hand profile observed.
    pub added: Vec<Category>,
    /// Categories only the right-hand profile observed.
    pub removed: Vec<Category>,
    /// Categories both profiles observed.
    pub common: Vec<Category>,
}

impl SetDiff {
    /// Splits two counters' key sets into added, removed and common parts.
    pub fn of(ours: &FrequencyCounter, theirs: &FrequencyCounter) -> Self {
        let our_keys: BTreeSet<Category> = ours
            .iter()
            .map(|(category, _)| category.map(str::to_string))
            .collect();
        let their_keys: BTreeSet<Category> = theirs
            .iter()
            .map(|(category, _)| category.map(str::to_string))
            .collect();

        SetDiff {
            added: our_keys.difference(&their_keys).cloned().collect(),
            removed: their_keys.difference(&our_keys).cloned().collect(),
            common: our_keys.intersection(&their_keys).cloned().collect(),
        }
    }
}

/// Per-category count delta.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCountDiff {
    /// The category key, `None` for the missing-value bucket.
    pub category: Category,
    /// Count delta for the category, absent keys counting as zero.
    pub diff: NumericDiff,
}

/// Statistics compared for every pair of profiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffStatistics {
    pub unique_count: NumericDiff,
    pub unique_ratio: NumericDiff,
    /// Present only when both profiles look categorical.
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub categorical_stats: Option<CategoricalDiffStatistics>,
}

/// Statistics compared only between two categorical profiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalDiffStatistics {
    pub categories: SetDiff,
    pub gini_impurity: NumericDiff,
    pub unalikeability: NumericDiff,
    pub categorical_count: Vec<CategoryCountDiff>,
}

/// Full difference report between two categorical profiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalDiff {
    /// Whether the two profiles agree on looking categorical.
    pub categorical: BoolDiff,
    pub statistics: DiffStatistics,
    /// Homogeneity test over the two count distributions, run only when both
    /// profiles look categorical.
    #[serde(rename = "chi2-test", skip_serializing_if = "Option::is_none")]
    pub chi2_test: Option<ChiSquareResult>,
}

/// Per-category count deltas, ordered by the left-hand profile's counts
/// descending with right-hand-only categories appended in their own
/// descending order. Absent keys count as zero on either side.
pub(crate) fn count_diff(
    ours: &FrequencyCounter,
    theirs: &FrequencyCounter,
) -> Vec<CategoryCountDiff> {
    let mut diffs: Vec<CategoryCountDiff> = ours
        .sorted_counts()
        .into_iter()
        .map(|(category, count)| {
            let their_count = theirs.get(category.as_deref());
            CategoryCountDiff {
                category,
                diff: NumericDiff::of_counts(count, their_count),
            }
        })
        .collect();

    for (category, count) in theirs.sorted_counts() {
        if ours.get(category.as_deref()) == 0 {
            diffs.push(CategoryCountDiff {
                category,
                diff: NumericDiff::of_counts(0, count),
            });
        }
    }

    diffs
}

/// Profile inputs the diff needs, decoupled from the profile struct so the
/// comparison logic stays a pure function over counters and derived metrics.
pub(crate) struct DiffSide<'a> {
    pub counts: &'a FrequencyCounter,
    pub is_categorical: bool,
    pub unique_ratio: f64,
    pub gini_impurity: Option<f64>,
    pub unalikeability: Option<f64>,
}

/// Compares two profiles' statistics.
///
/// The flag, unique count and unique ratio are always compared. The
/// category-level statistics and the homogeneity test only make sense when
/// both sides look categorical and are omitted entirely otherwise.
pub(crate) fn diff_profiles(
    ours: &DiffSide<'_>,
    theirs: &DiffSide<'_>,
    test: &HomogeneityTest,
) -> CategoricalDiff {
    let both_categorical = ours.is_categorical && theirs.is_categorical;

    let categorical_stats = both_categorical.then(|| CategoricalDiffStatistics {
        categories: SetDiff::of(ours.counts, theirs.counts),
        gini_impurity: NumericDiff::of(ours.gini_impurity, theirs.gini_impurity),
        unalikeability: NumericDiff::of(ours.unalikeability, theirs.unalikeability),
        categorical_count: count_diff(ours.counts, theirs.counts),
    });

    CategoricalDiff {
        categorical: BoolDiff::of(ours.is_categorical, theirs.is_categorical),
        statistics: DiffStatistics {
            unique_count: NumericDiff::of_counts(
                ours.counts.distinct_count() as u64,
                theirs.counts.distinct_count() as u64,
            ),
            unique_ratio: NumericDiff::of(Some(ours.unique_ratio), Some(theirs.unique_ratio)),
            categorical_stats,
        },
        chi2_test: both_categorical.then(|| test.run(ours.counts, theirs.counts)),
    }
}
