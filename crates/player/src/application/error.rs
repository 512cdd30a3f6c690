//! Application error types

use thiserror::Error;

/// Failure to turn a slot into its stored form
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("Failed to serialize slot {key}: {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}
