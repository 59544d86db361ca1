//! # Tally - Categorical Column Profiling for Rust
//!
//! Tally is a data profiling library that determines whether a column of
//! tabular data behaves as a categorical variable. It maintains an exact
//! frequency distribution over the observed values (missing values included
//! as their own bucket), classifies the column with a fixed cardinality
//! heuristic, and derives diversity and homogeneity statistics from the
//! counts.
//!
//! ## Overview
//!
//! Profiles are built for batch and parallel pipelines: a profile updates
//! incrementally from Arrow arrays or plain iterators, two profiles of the
//! same column merge into one, and two finished profiles compare into a
//! structured diff that includes a chi-squared test of whether their
//! category distributions differ. Merging is associative and commutative,
//! so a pipeline may partition its input freely and still end up with the
//! profile a single sequential pass would have produced.
//!
//! ## Quick Start
//!
//! ```rust
//! use arrow::array::StringArray;
//! use tally_profile::CategoricalProfile;
//!
//! # fn example() -> tally_profile::ProfilerResult<()> {
//! let mut profile = CategoricalProfile::new("status");
//!
//! let batch = StringArray::from(vec![Some("active"), Some("inactive"), None, Some("active")]);
//! profile.update_from_array(&batch)?;
//!
//! assert!(profile.is_categorical());
//! assert_eq!(profile.sample_size(), 3);
//! assert_eq!(profile.counts().get(Some("active")), 2);
//!
//! let report = profile.report();
//! println!("{}", serde_json::to_string_pretty(&report)?);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Merging Partial Profiles
//!
//! Profiles computed over disjoint partitions of the same column combine
//! without touching the inputs:
//!
//! ```rust
//! use tally_profile::CategoricalProfile;
//!
//! # fn example() -> tally_profile::ProfilerResult<()> {
//! let mut east = CategoricalProfile::new("color");
//! east.update([Some("red"), Some("blue")]);
//!
//! let mut west = CategoricalProfile::new("color");
//! west.update([Some("red"), None]);
//!
//! let combined = east.merge(&west)?;
//! assert_eq!(combined.counts().get(Some("red")), 2);
//! assert_eq!(combined.counts().get(None), 1);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Key Features
//!
//! - **Exact frequency counting** with a dedicated missing-value bucket, so
//!   null density is visible instead of silently dropped
//! - **Categorical classification** with fixed thresholds: at most 10
//!   distinct values is categorical outright, beyond that the
//!   distinct-to-sample ratio must stay at or below 0.2
//! - **Diversity statistics**: Gini impurity and the coefficient of
//!   unalikeability, recomputed on demand so they never go stale
//! - **Chi-squared homogeneity test** between two profiles, with a
//!   pluggable statistics backend (`statrs` behind the default `chi2`
//!   feature) that degrades to a warning instead of a hard dependency
//! - **Structured diffing** of two profiles into serializable delta types
//!
//! ## Architecture
//!
//! - **`profilers`**: the profiling framework itself
//!   - `frequency`: the mergeable frequency counter
//!   - `categorical`: the column profile, classification, report and diff
//!   - `diversity` / `homogeneity`: statistics derived from the counts
//!   - `base`, `traits`, `options`, `errors`: shared bookkeeping, the
//!     profile and state traits, configuration and error types
//! - **`logging`**: `tracing` subscriber setup for embedding applications
//!
//! ## Examples
//!
//! See the `demos` directory for complete examples:
//!
//! - `profile_report.rs`: profiling a batch and printing the JSON report
//! - `parallel_merge.rs`: profiling partitions on worker threads and
//!   merging the partial profiles

pub mod logging;
pub mod profilers;

pub use profilers::{
    is_categorical, CategoricalDiff, CategoricalOptions, CategoricalProfile, CategoricalReport,
    Category, ChiSquareResult, ColumnProfile, FrequencyCounter, HomogeneityTest, ProfilerError,
    ProfilerResult, ProfilerState,
};
