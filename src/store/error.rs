//! Error types for configuration store queries.

use thiserror::Error;

/// Error type for [`ConfigStore`](super::ConfigStore) queries.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The query helper could not be started.
    #[error("Failed to run '{command}': {source}")]
    Spawn {
        /// Command line
        command: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The query helper produced unusable output.
    #[error("Configuration query '{command}' failed: {reason}")]
    Query {
        /// Command line
        command: String,
        /// What went wrong
        reason: String,
    },
}
