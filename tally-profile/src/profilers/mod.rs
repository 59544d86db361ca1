//! Column profiler framework for categorical data.
//!
//! This module provides the building blocks for profiling one column of
//! tabular data as a categorical variable: exact frequency counting, a
//! categorical classification heuristic, diversity statistics derived from
//! the counts, and a chi-squared homogeneity test for comparing two
//! profiles. Profiles accumulate incrementally per batch and merge across
//! partitions, so a partitioned pipeline ends up with the same profile a
//! single pass would have produced.
//!
//! ## Available Components
//!
//! - **Frequency counting** (`frequency`): exact per-value counts with a
//!   dedicated missing-value bucket and a pure, order-independent merge
//! - **Classification** (`categorical`): the [`CategoricalProfile`] itself,
//!   the `is_categorical` heuristic, reporting and diffing
//! - **Diversity metrics** (`diversity`): Gini impurity and the coefficient
//!   of unalikeability as pure functions of the counts
//! - **Homogeneity test** (`homogeneity`): chi-squared test of whether two
//!   count distributions look drawn from the same population
//! - **Shared state** (`base`, `traits`, `options`, `errors`): per-column
//!   bookkeeping, the profile and state traits, configuration, error types
//!
//! ## Example Usage
//!
//! ```rust
//! use tally_profile::profilers::CategoricalProfile;
//!
//! let mut profile = CategoricalProfile::new("color");
//! profile.update([Some("red"), Some("blue"), Some("red"), None]);
//!
//! assert!(profile.is_categorical());
//! assert_eq!(profile.unique_count(), 3);
//!
//! let report = profile.report();
//! assert_eq!(report.statistics.unique_count, 3);
//! ```

pub mod base;
pub mod categorical;
pub mod diff;
pub mod diversity;
pub mod errors;
pub mod frequency;
pub mod homogeneity;
pub mod options;
pub mod traits;

pub use base::BaseColumnState;
pub use categorical::{
    is_categorical, CategoricalProfile, CategoricalReport, CategoricalStatistics, CategoryCount,
    ReportStatistics,
};
pub use diff::{
    BoolDiff, CategoricalDiff, CategoricalDiffStatistics, CategoryCountDiff, DiffStatistics,
    NumericDiff, SetDiff,
};
pub use diversity::{gini_impurity, unalikeability};
pub use errors::{ProfilerError, ProfilerResult};
pub use frequency::{Category, FrequencyCounter};
#[cfg(feature = "chi2")]
pub use homogeneity::StatrsBackend;
pub use homogeneity::{ChiSquareResult, HomogeneityTest, NullStatsBackend, StatsBackend};
pub use options::CategoricalOptions;
pub use traits::{ColumnProfile, ProfilerState};
