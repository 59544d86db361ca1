//! Error types for the profiler framework.

use thiserror::Error;

/// Result type for profiler operations.
pub type ProfilerResult<T> = Result<T, ProfilerError>;

/// Errors that can occur during profiler operations.
#[derive(Error, Debug)]
pub enum ProfilerError {
    /// Invalid configuration or parameters.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Data type mismatch or invalid data.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Error occurred while merging profiles or states.
    #[error("Failed to merge profiles: {0}")]
    ProfileMerge(String),

    /// Attempted a kind-checked operation across different profile kinds.
    #[error("Profile kind mismatch: expected '{expected}', got '{actual}'")]
    ProfileKindMismatch {
        /// The kind of the profile the operation started from.
        expected: String,
        /// The kind of the operand profile.
        actual: String,
    },

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl ProfilerError {
    /// Creates an invalid configuration error with the given message.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    /// Creates an invalid data error with the given message.
    pub fn invalid_data(msg: impl Into<String>) -> Self {
        Self::InvalidData(msg.into())
    }

    /// Creates a merge error with the given message.
    pub fn profile_merge(msg: impl Into<String>) -> Self {
        Self::ProfileMerge(msg.into())
    }

    /// Creates a kind-mismatch error for an operation between profile kinds.
    pub fn kind_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::ProfileKindMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

/// Converts serde_json errors to ProfilerError.
impl From<serde_json::Error> for ProfilerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
