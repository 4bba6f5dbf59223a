//! Error types for daemon control.

use std::process::ExitStatus;
use std::time::Duration;

use thiserror::Error;

use crate::vici::ViciError;

/// Error type for [`IpsecDaemon`](super::IpsecDaemon) operations.
#[derive(Debug, Error)]
pub enum DaemonError {
    /// The control socket exchange failed.
    #[error(transparent)]
    Vici(#[from] ViciError),

    /// A helper command could not be started.
    #[error("Failed to run '{command}': {source}")]
    Spawn {
        /// Command line
        command: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A helper command exited unsuccessfully.
    #[error("'{command}' failed with {status}")]
    Command {
        /// Command line
        command: String,
        /// Exit status
        status: ExitStatus,
    },

    /// The daemon did not answer in time.
    #[error("{operation} timed out after {timeout:?}")]
    Timeout {
        /// Operation description
        operation: String,
        /// Time waited
        timeout: Duration,
    },
}
