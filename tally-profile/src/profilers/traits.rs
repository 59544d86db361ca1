//! Core traits for column profiles and their mergeable state.

use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt::Debug;

use crate::profilers::ProfilerResult;

/// State that can be accumulated per partition and merged across partitions.
///
/// Implementations must make `merge` order-independent so that a partitioned
/// pipeline produces the same result for any partitioning and any merge-tree
/// shape. States are serializable so partial results can be persisted between
/// pipeline stages.
pub trait ProfilerState:
    Clone + Send + Sync + Debug + Serialize + for<'de> Deserialize<'de>
{
    /// Merges multiple states into one.
    ///
    /// Whether an empty input is an error depends on the state: states with
    /// an identity element (such as a bare frequency counter) return it,
    /// states tied to a named column have nothing to return and fail.
    fn merge(states: Vec<Self>) -> ProfilerResult<Self>
    where
        Self: Sized;

    /// Returns true if this state represents no observed data.
    fn is_empty(&self) -> bool {
        false
    }
}

/// Object-safe interface over a column profile of any kind.
///
/// A profiling pipeline holds profiles of mixed kinds behind this trait.
/// Kind-checked operations (`merge_dyn`, `diff_dyn`) downcast their operand
/// and fail with [`ProfilerError::ProfileKindMismatch`] when handed a profile
/// of a different kind, without touching either side's state.
///
/// [`ProfilerError::ProfileKindMismatch`]: crate::profilers::ProfilerError::ProfileKindMismatch
pub trait ColumnProfile: Debug + Send + Sync {
    /// Stable tag identifying the profile kind, for example `"category"`.
    fn profile_type(&self) -> &'static str;

    /// Name of the profiled column.
    fn column_name(&self) -> &str;

    /// Number of non-null values folded in so far.
    fn sample_size(&self) -> u64;

    /// Upcast used by kind-checked operations to recover the concrete type.
    fn as_any(&self) -> &dyn Any;

    /// Merges with another profile of the same kind into a new boxed profile.
    fn merge_dyn(&self, other: &dyn ColumnProfile) -> ProfilerResult<Box<dyn ColumnProfile>>;

    /// Structured difference against another profile of the same kind,
    /// serialized to a JSON value.
    fn diff_dyn(&self, other: &dyn ColumnProfile) -> ProfilerResult<serde_json::Value>;

    /// The profile's report serialized to a JSON value.
    fn report_json(&self) -> ProfilerResult<serde_json::Value>;
}
