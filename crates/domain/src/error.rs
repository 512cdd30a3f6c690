//! Unified error types for the character sheet domain
//!
//! Most sheet edits are silent no-ops when the input is empty; the variants here
//! cover the cases where a caller addressed something that does not exist.

use thiserror::Error;

/// Unified error type for sheet operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SheetError {
    /// Ability position outside the current list
    #[error("Ability index {index} out of range (len {len})")]
    AbilityIndexOutOfRange { index: usize, len: usize },

    /// Stat name not present on the sheet
    #[error("Unknown stat: {0}")]
    UnknownStat(String),

    /// Avatar reference is not a `data:` URI
    #[error("Invalid data URL: {0}")]
    InvalidDataUrl(String),
}

impl SheetError {
    /// Create an unknown stat error
    pub fn unknown_stat(name: impl Into<String>) -> Self {
        Self::UnknownStat(name.into())
    }

    /// Create an invalid data URL error.
    ///
    /// Only a short prefix of the offending value is kept, since avatar
    /// references can be several megabytes long.
    pub fn invalid_data_url(value: &str) -> Self {
        Self::InvalidDataUrl(value.chars().take(32).collect())
    }
}
