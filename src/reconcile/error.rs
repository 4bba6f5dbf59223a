//! Error types for connection resolution and reconciliation.

use std::fmt;

use thiserror::Error;

use crate::daemon::DaemonError;
use crate::store::StoreError;

/// Error computing the active connection set.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The configuration store query failed.
    #[error("Configuration store query failed: {0}")]
    Store(#[from] StoreError),

    /// The daemon could not list its SAs.
    #[error("Failed to list IKE SAs: {0}")]
    Daemon(#[from] DaemonError),
}

/// Which snapshot of the active connections was being taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotStage {
    /// Before terminating and reloading.
    Before,
    /// After the settle window.
    After,
}

impl fmt::Display for SnapshotStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Before => f.write_str("before reload"),
            Self::After => f.write_str("after reload"),
        }
    }
}

/// Error aborting a reconciliation run.
///
/// Per-connection termination and initiation failures are not errors; they
/// are reported in [`ReconcileReport`](super::ReconcileReport).
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// A connection snapshot could not be taken.
    #[error("Failed to snapshot active connections ({stage}): {source}")]
    Snapshot {
        /// Which snapshot failed
        stage: SnapshotStage,
        /// Underlying failure
        #[source]
        source: ResolveError,
    },
}
