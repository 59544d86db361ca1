//! Configuration for the categorical profiler.

use serde::{Deserialize, Serialize};

use crate::profilers::{ProfilerError, ProfilerResult};

/// Options accepted by a categorical profile at construction time.
///
/// Validation happens before any profile state is created, so a profile
/// never exists with an invalid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoricalOptions {
    /// Whether this profiler should run at all. Consulted by pipelines that
    /// schedule profilers per column; the profile itself does not check it.
    pub is_enabled: bool,
    /// Maximum number of entries in the report's category-count listing,
    /// largest counts first. `None` reports every category.
    pub top_k_categories: Option<usize>,
}

impl Default for CategoricalOptions {
    fn default() -> Self {
        Self {
            is_enabled: true,
            top_k_categories: None,
        }
    }
}

impl CategoricalOptions {
    /// Creates the default options: enabled, unlimited category listing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the report's category-count limit.
    pub fn with_top_k_categories(mut self, top_k: usize) -> Self {
        self.top_k_categories = Some(top_k);
        self
    }

    /// Sets whether the profiler is scheduled by the surrounding pipeline.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.is_enabled = enabled;
        self
    }

    /// Checks the options for internal consistency.
    pub fn validate(&self) -> ProfilerResult<()> {
        if self.top_k_categories == Some(0) {
            return Err(ProfilerError::invalid_config(
                "top_k_categories must be at least 1",
            ));
        }
        Ok(())
    }
}
