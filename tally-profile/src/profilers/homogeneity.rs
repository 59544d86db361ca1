//! Chi-squared test of homogeneity between two category distributions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::Debug;
use tracing::warn;

use crate::profilers::{Category, FrequencyCounter};

/// Result of a chi-squared homogeneity test.
///
/// Every field is optional: the test degrades instead of failing. With no
/// categories at all nothing is populated; with a degenerate contingency
/// table the statistic saturates at infinity with a p-value of exactly zero;
/// without a statistics backend the statistic and degrees of freedom are
/// reported but the p-value stays `None`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChiSquareResult {
    /// The chi-squared statistic, `+inf` for a degenerate table.
    pub statistic: Option<f64>,
    /// `k - 1` for `k` combined categories.
    pub degrees_of_freedom: Option<u64>,
    /// Upper-tail probability of the statistic under homogeneity.
    pub p_value: Option<f64>,
}

/// Upper-tail probability source for the chi-squared distribution.
///
/// Injected into [`HomogeneityTest`] so the test can still compute and
/// report the statistic when no distribution implementation is available.
pub trait StatsBackend: Debug + Send + Sync {
    /// Returns `P(X > statistic)` for `X ~ χ²(degrees_of_freedom)`, or
    /// `None` when the probability cannot be evaluated.
    fn chi2_survival(&self, degrees_of_freedom: u64, statistic: f64) -> Option<f64>;
}

/// Backend that evaluates the chi-squared survival function with `statrs`.
#[cfg(feature = "chi2")]
#[derive(Debug, Clone, Copy, Default)]
pub struct StatrsBackend;

#[cfg(feature = "chi2")]
impl StatsBackend for StatrsBackend {
    fn chi2_survival(&self, degrees_of_freedom: u64, statistic: f64) -> Option<f64> {
        use statrs::distribution::{ChiSquared, ContinuousCDF};

        match ChiSquared::new(degrees_of_freedom as f64) {
            Ok(chi_sq) => Some(1.0 - chi_sq.cdf(statistic)),
            Err(_) => {
                // A single shared category gives zero degrees of freedom,
                // for which the distribution is not constructible.
                warn!(
                    degrees_of_freedom,
                    "chi-squared distribution undefined; p-value unavailable"
                );
                None
            }
        }
    }
}

/// Backend used when no distribution implementation is compiled in. Always
/// reports the p-value as unavailable, with a warning.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullStatsBackend;

impl StatsBackend for NullStatsBackend {
    fn chi2_survival(&self, _degrees_of_freedom: u64, _statistic: f64) -> Option<f64> {
        warn!("no statistics backend available; chi-squared test results will be incomplete");
        None
    }
}

/// Chi-squared test of homogeneity between two frequency counters.
///
/// Answers whether two groups of category counts look drawn from the same
/// underlying distribution. The observed table has one row per group and one
/// column per category of the combined key set, the missing-value bucket
/// included.
#[derive(Debug)]
pub struct HomogeneityTest {
    backend: Box<dyn StatsBackend>,
}

impl Default for HomogeneityTest {
    fn default() -> Self {
        Self::new()
    }
}

impl HomogeneityTest {
    /// Creates a test with the default backend for the enabled features.
    #[cfg(feature = "chi2")]
    pub fn new() -> Self {
        Self {
            backend: Box::new(StatrsBackend),
        }
    }

    /// Creates a test with the default backend for the enabled features.
    #[cfg(not(feature = "chi2"))]
    pub fn new() -> Self {
        Self {
            backend: Box::new(NullStatsBackend),
        }
    }

    /// Creates a test with an explicit backend.
    pub fn with_backend(backend: Box<dyn StatsBackend>) -> Self {
        Self { backend }
    }

    /// Runs the test over two groups' category counts.
    ///
    /// With an empty combined key set the test is skipped with a warning and
    /// every field of the result is `None`. A zero row or column sum makes
    /// the table degenerate: the statistic is `+inf` and the p-value exactly
    /// zero, with no backend involved. Otherwise the statistic is
    /// `Σ (observed - expected)² / expected` and the p-value comes from the
    /// backend's survival function at `k - 1` degrees of freedom.
    pub fn run(&self, group_a: &FrequencyCounter, group_b: &FrequencyCounter) -> ChiSquareResult {
        let combined: BTreeSet<Category> = group_a
            .iter()
            .chain(group_b.iter())
            .map(|(category, _)| category.map(str::to_string))
            .collect();

        if combined.is_empty() {
            warn!("insufficient categories; chi-squared test skipped");
            return ChiSquareResult::default();
        }

        let degrees_of_freedom = combined.len() as u64 - 1;
        let observed_a: Vec<u64> = combined
            .iter()
            .map(|category| group_a.get(category.as_deref()))
            .collect();
        let observed_b: Vec<u64> = combined
            .iter()
            .map(|category| group_b.get(category.as_deref()))
            .collect();

        let (statistic, exact_p) = statistic_from_observed(&observed_a, &observed_b);
        let p_value =
            exact_p.or_else(|| self.backend.chi2_survival(degrees_of_freedom, statistic));

        ChiSquareResult {
            statistic: Some(statistic),
            degrees_of_freedom: Some(degrees_of_freedom),
            p_value,
        }
    }
}

/// Computes the statistic from a 2 x k observed table.
///
/// Returns `(statistic, Some(p_value))` when the table is degenerate and the
/// result is exact without a distribution, or `(statistic, None)` when the
/// caller still needs a tail probability.
fn statistic_from_observed(observed_a: &[u64], observed_b: &[u64]) -> (f64, Option<f64>) {
    let row_sums: [u64; 2] = [observed_a.iter().sum(), observed_b.iter().sum()];
    let col_sums: Vec<u64> = observed_a
        .iter()
        .zip(observed_b)
        .map(|(a, b)| a + b)
        .collect();

    // A zero row or column sum makes some expected count zero; the statistic
    // saturates and the tail probability is exactly zero.
    if row_sums.contains(&0) || col_sums.contains(&0) {
        return (f64::INFINITY, Some(0.0));
    }

    let total = (row_sums[0] + row_sums[1]) as f64;
    let mut statistic = 0.0;
    for (row_sum, row) in [(row_sums[0], observed_a), (row_sums[1], observed_b)] {
        for (&observed, &col_sum) in row.iter().zip(&col_sums) {
            let expected = row_sum as f64 * col_sum as f64 / total;
            let delta = observed as f64 - expected;
            statistic += delta * delta / expected;
        }
    }

    (statistic, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter_of(entries: &[(Option<&str>, u64)]) -> FrequencyCounter {
        let mut counter = FrequencyCounter::new();
        for &(category, count) in entries {
            counter.add(category, count);
        }
        counter
    }

    #[test]
    fn test_no_categories_skips_test() {
        let result = HomogeneityTest::new().run(&FrequencyCounter::new(), &FrequencyCounter::new());
        assert_eq!(result, ChiSquareResult::default());
    }

    #[test]
    fn test_identical_distributions() {
        let a = counter_of(&[(Some("x"), 10), (Some("y"), 10)]);
        let b = counter_of(&[(Some("x"), 10), (Some("y"), 10)]);

        let result = HomogeneityTest::new().run(&a, &b);
        assert_eq!(result.degrees_of_freedom, Some(1));
        assert!(result.statistic.unwrap().abs() < 1e-12);
        #[cfg(feature = "chi2")]
        assert!((result.p_value.unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_count_add_does_not_perturb_the_test() {
        // A zero add stores no key, so the combined key set and the result
        // match the plain identical-distribution case instead of picking up
        // a ghost column with a zero sum.
        let mut a = counter_of(&[(Some("x"), 10), (Some("y"), 10)]);
        a.add(Some("ghost"), 0);
        let b = counter_of(&[(Some("x"), 10), (Some("y"), 10)]);

        let result = HomogeneityTest::new().run(&a, &b);
        assert_eq!(result.degrees_of_freedom, Some(1));
        assert!(result.statistic.unwrap().abs() < 1e-12);
        #[cfg(feature = "chi2")]
        assert!((result.p_value.unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_disjoint_support() {
        let a = counter_of(&[(Some("x"), 20)]);
        let b = counter_of(&[(Some("y"), 20)]);

        let result = HomogeneityTest::new().run(&a, &b);
        // Table [[20, 0], [0, 20]]: expected 10 everywhere, statistic 40.
        assert_eq!(result.degrees_of_freedom, Some(1));
        assert!((result.statistic.unwrap() - 40.0).abs() < 1e-9);
        #[cfg(feature = "chi2")]
        assert!(result.p_value.unwrap() < 1e-6);
    }

    #[test]
    fn test_known_two_by_two_table() {
        let a = counter_of(&[(Some("x"), 16), (Some("y"), 4)]);
        let b = counter_of(&[(Some("x"), 4), (Some("y"), 16)]);

        let result = HomogeneityTest::new().run(&a, &b);
        // Expected counts are all 10, so the statistic is 4 * 6²/10 = 14.4.
        assert!((result.statistic.unwrap() - 14.4).abs() < 1e-9);
        #[cfg(feature = "chi2")]
        {
            let p = result.p_value.unwrap();
            assert!(p > 0.0 && p < 1e-3, "p = {p}");
        }
    }

    #[test]
    fn test_empty_group_saturates() {
        let a = FrequencyCounter::new();
        let b = counter_of(&[(Some("x"), 5), (Some("y"), 5), (None, 2)]);

        let result = HomogeneityTest::new().run(&a, &b);
        assert_eq!(result.degrees_of_freedom, Some(2));
        assert_eq!(result.statistic, Some(f64::INFINITY));
        assert_eq!(result.p_value, Some(0.0));
    }

    #[test]
    fn test_missing_bucket_is_a_category() {
        let a = counter_of(&[(Some("x"), 10), (None, 10)]);
        let b = counter_of(&[(Some("x"), 10), (None, 10)]);

        let result = HomogeneityTest::new().run(&a, &b);
        // Two combined categories: "x" and the missing bucket.
        assert_eq!(result.degrees_of_freedom, Some(1));
        assert!(result.statistic.unwrap().abs() < 1e-12);
    }

    #[cfg(feature = "chi2")]
    #[test]
    fn test_zero_degrees_of_freedom_has_no_p_value() {
        let a = counter_of(&[(Some("only"), 5)]);
        let b = counter_of(&[(Some("only"), 9)]);

        let result = HomogeneityTest::new().run(&a, &b);
        assert_eq!(result.degrees_of_freedom, Some(0));
        assert!(result.statistic.unwrap().abs() < 1e-12);
        assert_eq!(result.p_value, None);
    }

    #[test]
    fn test_null_backend_reports_incomplete_result() {
        let a = counter_of(&[(Some("x"), 16), (Some("y"), 4)]);
        let b = counter_of(&[(Some("x"), 4), (Some("y"), 16)]);

        let test = HomogeneityTest::with_backend(Box::new(NullStatsBackend));
        let result = test.run(&a, &b);
        assert!((result.statistic.unwrap() - 14.4).abs() < 1e-9);
        assert_eq!(result.degrees_of_freedom, Some(1));
        assert_eq!(result.p_value, None);
    }

    #[test]
    fn test_zero_column_sum_saturates() {
        // Not reachable through counters (zero-count categories are never
        // keys), but the table computation must still guard it.
        let (statistic, exact_p) = statistic_from_observed(&[0, 20], &[0, 30]);
        assert_eq!(statistic, f64::INFINITY);
        assert_eq!(exact_p, Some(0.0));
    }

    #[test]
    fn test_nonzero_sums_compute_statistic() {
        let (statistic, exact_p) = statistic_from_observed(&[20, 0], &[0, 20]);
        assert_eq!(exact_p, None);
        assert!((statistic - 40.0).abs() < 1e-9);
    }
}
