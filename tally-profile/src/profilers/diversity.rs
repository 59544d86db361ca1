//! Diversity metrics derived from a frequency distribution.
//!
//! Both metrics are pure functions of (counter, sample size) so they can be
//! recomputed on demand and never go stale after further updates. They run
//! over the non-null buckets only: `sample_size` counts non-null rows, and
//! keeping the two consistent is what makes the probabilities sum to one and
//! the documented ranges hold even when missing values were observed.

use crate::profilers::FrequencyCounter;

/// Gini impurity of the distribution: the probability that two independent
/// draws fall into different categories.
///
/// `G = Σ p_i * (1 - p_i)` with `p_i = count_i / sample_size`. Returns `None`
/// when nothing non-null was observed. Range `[0, 1)`: zero for a single
/// category, approaching one as the distribution flattens over many.
pub fn gini_impurity(counter: &FrequencyCounter, sample_size: u64) -> Option<f64> {
    if sample_size == 0 {
        return None;
    }

    let total = sample_size as f64;
    let gini_sum = counter
        .values()
        .map(|(_, count)| {
            let p = count as f64 / total;
            p * (1.0 - p)
        })
        .sum();
    Some(gini_sum)
}

/// Unalikeability of the distribution: the fraction of ordered observation
/// pairs that disagree (Perry and Kader, "Variation as Unalikeability",
/// Teaching Statistics 27(2), 2005).
///
/// `U = Σ (n - c_i) * c_i / (n² - n)` with `n = sample_size`. Returns `None`
/// when nothing non-null was observed and `0` for a single observation,
/// where no pair exists. Range `[0, 1]`.
pub fn unalikeability(counter: &FrequencyCounter, sample_size: u64) -> Option<f64> {
    if sample_size == 0 {
        return None;
    }
    if sample_size == 1 {
        return Some(0.0);
    }

    let n = sample_size as f64;
    let unalike_sum: f64 = counter
        .values()
        .map(|(_, count)| {
            let count = count as f64;
            (n - count) * count
        })
        .sum();
    Some(unalike_sum / (n * n - n))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform_counter(categories: usize, count_each: u64) -> FrequencyCounter {
        let mut counter = FrequencyCounter::new();
        for i in 0..categories {
            counter.add(Some(format!("cat_{i}").as_str()), count_each);
        }
        counter
    }

    #[test]
    fn test_gini_empty_is_none() {
        assert_eq!(gini_impurity(&FrequencyCounter::new(), 0), None);
    }

    #[test]
    fn test_gini_single_category_is_zero() {
        let counter = uniform_counter(1, 42);
        assert_eq!(gini_impurity(&counter, 42), Some(0.0));
    }

    #[test]
    fn test_gini_uniform_distribution() {
        // Uniform over k categories: G = (k - 1) / k.
        for k in [2u64, 4, 10] {
            let counter = uniform_counter(k as usize, 25);
            let gini = gini_impurity(&counter, k * 25).unwrap();
            let expected = (k as f64 - 1.0) / k as f64;
            assert!((gini - expected).abs() < 1e-12, "k={k}: {gini} vs {expected}");
        }
    }

    #[test]
    fn test_gini_ignores_missing_bucket() {
        let mut counter = uniform_counter(2, 10);
        let without_nulls = gini_impurity(&counter, 20).unwrap();

        counter.add(None, 100);
        let with_nulls = gini_impurity(&counter, 20).unwrap();

        assert_eq!(with_nulls, without_nulls);
        assert!((0.0..1.0).contains(&with_nulls));
    }

    #[test]
    fn test_unalikeability_empty_and_single() {
        assert_eq!(unalikeability(&FrequencyCounter::new(), 0), None);

        let counter = uniform_counter(1, 1);
        assert_eq!(unalikeability(&counter, 1), Some(0.0));
    }

    #[test]
    fn test_unalikeability_even_split_closed_form() {
        // Two categories at n/2 each: U = 2 * (n²/4) / (n² - n) = n / (2(n - 1)).
        for n in [2u64, 10, 1000] {
            let counter = uniform_counter(2, n / 2);
            let unalike = unalikeability(&counter, n).unwrap();
            let expected = n as f64 / (2.0 * (n as f64 - 1.0));
            assert!(
                (unalike - expected).abs() < 1e-12,
                "n={n}: {unalike} vs {expected}"
            );
        }
    }

    #[test]
    fn test_unalikeability_all_distinct_is_one() {
        let counter = uniform_counter(5, 1);
        assert_eq!(unalikeability(&counter, 5), Some(1.0));
    }

    #[test]
    fn test_unalikeability_ignores_missing_bucket() {
        let mut counter = uniform_counter(3, 4);
        let without_nulls = unalikeability(&counter, 12).unwrap();

        counter.add(None, 7);
        assert_eq!(unalikeability(&counter, 12), Some(without_nulls));
    }
}
