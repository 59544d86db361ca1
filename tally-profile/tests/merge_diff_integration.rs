//! Integration tests for the profile merge and diff operations.
//!
//! Merge is exercised as the parallel pipeline would use it: partial
//! profiles over partitions combined pairwise and in bulk, checked against
//! the profile a single pass produces. Diff is exercised through its
//! serialized shape, since that is what report consumers see.

use std::any::Any;

use tally_profile::profilers::{BoolDiff, NumericDiff};
use tally_profile::{
    CategoricalOptions, CategoricalProfile, ColumnProfile, ProfilerError, ProfilerResult,
    ProfilerState,
};

fn profile_of(name: &str, values: &[Option<&str>]) -> CategoricalProfile {
    let mut profile = CategoricalProfile::new(name);
    profile.update(values.iter().copied());
    profile
}

// ============================================================================
// Merge
// ============================================================================

#[test]
fn test_merge_equals_single_pass() {
    let left = profile_of("status", &[Some("a"), Some("b"), None, Some("a")]);
    let right = profile_of("status", &[Some("b"), Some("c"), None]);

    let merged = left.merge(&right).unwrap();
    let single = profile_of(
        "status",
        &[Some("a"), Some("b"), None, Some("a"), Some("b"), Some("c"), None],
    );

    assert_eq!(merged.sample_size(), single.sample_size());
    assert_eq!(merged.counts(), single.counts());
    assert_eq!(merged.unique_ratio(), single.unique_ratio());
    let gini_delta = merged.gini_impurity().unwrap() - single.gini_impurity().unwrap();
    assert!(gini_delta.abs() < 1e-12);

    // Inputs survive the merge unchanged.
    assert_eq!(left.sample_size(), 3);
    assert_eq!(right.sample_size(), 2);
}

#[test]
fn test_merge_rejects_mismatched_columns() {
    let left = profile_of("status", &[Some("a")]);
    let right = profile_of("state", &[Some("a")]);

    let err = left.merge(&right).unwrap_err();
    assert!(matches!(err, ProfilerError::ProfileMerge(_)));
    assert!(err.to_string().contains("status"));
    assert!(err.to_string().contains("state"));
}

#[test]
fn test_merge_resets_options_to_default() {
    let options = CategoricalOptions::new().with_top_k_categories(1);
    let mut left = CategoricalProfile::with_options("col", options).unwrap();
    left.update([Some("a"), Some("b")]);
    let right = profile_of("col", &[Some("c")]);

    let merged = left.merge(&right).unwrap();
    assert_eq!(merged.options(), &CategoricalOptions::default());

    // With default options the merged report lists every category.
    let report = merged.report();
    let stats = report.statistics.categorical_stats.unwrap();
    assert_eq!(stats.categorical_count.len(), 3);
}

#[test]
fn test_bulk_merge_over_partitions() {
    let partitions = vec![
        profile_of("region", &[Some("east"), Some("east")]),
        profile_of("region", &[Some("west"), None]),
        profile_of("region", &[]),
        profile_of("region", &[Some("east"), Some("north")]),
    ];

    let merged = ProfilerState::merge(partitions).unwrap();
    let single = profile_of(
        "region",
        &[
            Some("east"),
            Some("east"),
            Some("west"),
            None,
            Some("east"),
            Some("north"),
        ],
    );

    assert_eq!(merged.counts(), single.counts());
    assert_eq!(merged.sample_size(), single.sample_size());
}

#[test]
fn test_merge_tree_shape_does_not_matter() {
    let a = profile_of("col", &[Some("x"), Some("y")]);
    let b = profile_of("col", &[Some("y"), None]);
    let c = profile_of("col", &[Some("z")]);
    let d = profile_of("col", &[None, None]);

    let balanced = a
        .merge(&b)
        .unwrap()
        .merge(&c.merge(&d).unwrap())
        .unwrap();
    let skewed = a
        .merge(&b)
        .unwrap()
        .merge(&c)
        .unwrap()
        .merge(&d)
        .unwrap();

    assert_eq!(balanced.counts(), skewed.counts());
    assert_eq!(balanced.sample_size(), skewed.sample_size());
}

// ============================================================================
// Kind-checked dynamic operations
// ============================================================================

/// Stand-in for a sibling profiler of a different kind.
#[derive(Debug)]
struct NumericProfileStub;

impl ColumnProfile for NumericProfileStub {
    fn profile_type(&self) -> &'static str {
        "numeric"
    }

    fn column_name(&self) -> &str {
        "col"
    }

    fn sample_size(&self) -> u64 {
        0
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn merge_dyn(&self, _other: &dyn ColumnProfile) -> ProfilerResult<Box<dyn ColumnProfile>> {
        unimplemented!("stub")
    }

    fn diff_dyn(&self, _other: &dyn ColumnProfile) -> ProfilerResult<serde_json::Value> {
        unimplemented!("stub")
    }

    fn report_json(&self) -> ProfilerResult<serde_json::Value> {
        Ok(serde_json::Value::Null)
    }
}

#[test]
fn test_merge_dyn_rejects_other_kinds() {
    let profile = profile_of("col", &[Some("a")]);

    let err = profile.merge_dyn(&NumericProfileStub).unwrap_err();
    assert!(matches!(err, ProfilerError::ProfileKindMismatch { .. }));
    assert_eq!(
        err.to_string(),
        "Profile kind mismatch: expected 'category', got 'numeric'"
    );
}

#[test]
fn test_diff_dyn_rejects_other_kinds() {
    let profile = profile_of("col", &[Some("a")]);
    assert!(matches!(
        profile.diff_dyn(&NumericProfileStub),
        Err(ProfilerError::ProfileKindMismatch { .. })
    ));
}

#[test]
fn test_merge_dyn_of_same_kind_succeeds() {
    let left = profile_of("col", &[Some("a"), Some("b")]);
    let right = profile_of("col", &[Some("b")]);

    let merged = left.merge_dyn(&right).unwrap();
    assert_eq!(merged.profile_type(), "category");
    assert_eq!(merged.sample_size(), 3);

    let report = merged.report_json().unwrap();
    assert_eq!(report["statistics"]["unique_count"], serde_json::json!(2));
}

// ============================================================================
// Diff
// ============================================================================

#[test]
fn test_diff_of_identical_profiles_is_unchanged() {
    let profile = profile_of("status", &[Some("x"), Some("x"), Some("y")]);
    let diff = profile.diff(&profile);

    assert_eq!(diff.categorical, BoolDiff::Unchanged);
    assert_eq!(diff.statistics.unique_count, NumericDiff::Unchanged);
    assert_eq!(diff.statistics.unique_ratio, NumericDiff::Unchanged);

    let stats = diff.statistics.categorical_stats.as_ref().unwrap();
    assert_eq!(stats.gini_impurity, NumericDiff::Unchanged);
    assert_eq!(stats.unalikeability, NumericDiff::Unchanged);
    assert!(stats.categories.added.is_empty());
    assert!(stats.categories.removed.is_empty());
    assert!(stats
        .categorical_count
        .iter()
        .all(|d| d.diff == NumericDiff::Unchanged));

    let chi2 = diff.chi2_test.as_ref().unwrap();
    assert!(chi2.statistic.unwrap().abs() < 1e-12);
    assert_eq!(chi2.degrees_of_freedom, Some(1));
    #[cfg(feature = "chi2")]
    assert!((chi2.p_value.unwrap() - 1.0).abs() < 1e-9);
}

#[test]
fn test_diff_delta_signs_follow_self_minus_other() {
    let left = profile_of("col", &[Some("a"), Some("a"), Some("a"), Some("b")]);
    let right = profile_of("col", &[Some("a"), Some("b"), Some("b")]);

    let diff = left.diff(&right);
    assert_eq!(diff.statistics.unique_count, NumericDiff::Unchanged);
    match diff.statistics.unique_ratio {
        NumericDiff::Delta(delta) => assert!((delta - (0.5 - 2.0 / 3.0)).abs() < 1e-12),
        ref other => panic!("expected delta, got {other:?}"),
    }

    let stats = diff.statistics.categorical_stats.unwrap();
    let a_diff = &stats.categorical_count[0];
    assert_eq!(a_diff.category, Some("a".to_string()));
    assert_eq!(a_diff.diff, NumericDiff::Delta(2.0));
    let b_diff = &stats.categorical_count[1];
    assert_eq!(b_diff.category, Some("b".to_string()));
    assert_eq!(b_diff.diff, NumericDiff::Delta(-1.0));
}

#[test]
fn test_diff_category_sets() {
    let left = profile_of("col", &[Some("x"), Some("y"), None]);
    let right = profile_of("col", &[Some("y"), Some("z")]);

    let diff = left.diff(&right);
    let stats = diff.statistics.categorical_stats.unwrap();
    assert_eq!(stats.categories.added, vec![None, Some("x".to_string())]);
    assert_eq!(stats.categories.removed, vec![Some("z".to_string())]);
    assert_eq!(stats.categories.common, vec![Some("y".to_string())]);
}

#[test]
fn test_diff_skips_categorical_sections_when_one_side_is_not() {
    let left = profile_of("col", &[Some("a"), Some("a"), Some("b")]);
    let values: Vec<Option<String>> = (0..90).map(|i| Some(format!("id_{}", i % 30))).collect();
    let mut right = CategoricalProfile::new("col");
    right.update(values.iter().map(|v| v.as_deref()));

    let diff = left.diff(&right);
    assert_eq!(diff.categorical, BoolDiff::SelfOnly);
    assert!(diff.statistics.categorical_stats.is_none());
    assert!(diff.chi2_test.is_none());
    // The flag-level statistics still compare.
    assert_eq!(diff.statistics.unique_count, NumericDiff::Delta(-28.0));

    // Omitted means absent from the serialized form, not null.
    let json = serde_json::to_value(&diff).unwrap();
    assert!(json.get("chi2-test").is_none());
    assert!(json["statistics"].get("categories").is_none());
    assert!(json["statistics"].get("categorical_count").is_none());
    assert!(json["statistics"].get("unique_count").is_some());
}

#[test]
fn test_diff_runs_homogeneity_test_between_categorical_profiles() {
    let left = profile_of("col", &(0..20).map(|_| Some("x")).collect::<Vec<_>>());
    let right = profile_of("col", &(0..20).map(|_| Some("y")).collect::<Vec<_>>());

    let diff = left.diff(&right);
    let chi2 = diff.chi2_test.unwrap();
    assert_eq!(chi2.degrees_of_freedom, Some(1));
    assert!((chi2.statistic.unwrap() - 40.0).abs() < 1e-9);
    #[cfg(feature = "chi2")]
    assert!(chi2.p_value.unwrap() < 1e-6);
}

#[test]
fn test_diff_serialized_shape() {
    let left = profile_of("col", &[Some("a"), Some("b")]);
    let right = profile_of("col", &[Some("a"), Some("a")]);

    let json = serde_json::to_value(left.diff(&right)).unwrap();
    assert_eq!(json["categorical"], serde_json::json!("unchanged"));
    assert_eq!(
        json["statistics"]["unique_count"],
        serde_json::json!({"type": "delta", "value": 1.0})
    );
    assert!(json["chi2-test"]["statistic"].is_number());
}
