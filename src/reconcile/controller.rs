//! The terminate, reload, settle, re-initiate sequence.

use std::time::Duration;

use super::{
    ActiveConnectionResolver, ActiveConnectionSet, ReconcileError, SnapshotStage,
};
use crate::daemon::{DaemonError, IpsecDaemon};
use crate::store::ConfigStore;
use crate::time::{Sleeper, TokioSleeper};

/// What a reconciliation run did.
#[derive(Debug)]
pub struct ReconcileReport {
    /// Active connections before the reload.
    pub before: ActiveConnectionSet,
    /// Active connections after the settle window.
    pub after: ActiveConnectionSet,
    /// Connections whose termination the daemon confirmed.
    pub terminated: Vec<String>,
    /// Connections successfully initiated after the reload.
    pub reinitiated: Vec<String>,
    /// Why the reload failed, if it did.
    pub reload_failure: Option<DaemonError>,
    /// Connections whose initiation failed.
    pub failed_initiations: Vec<(String, DaemonError)>,
}

impl ReconcileReport {
    /// Returns `true` if the reload and every initiation succeeded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.reload_failure.is_none() && self.failed_initiations.is_empty()
    }
}

/// Drives the daemon back to the set of connections it had before the
/// address change.
///
/// Every active connection is torn down so the daemon drops SAs bound to the
/// old address, the configuration is reloaded, and after a settle window any
/// connection that did not come back on its own is initiated explicitly.
/// Connections that re-established during the window are left alone.
#[derive(Debug)]
pub struct Reconciler<D, C, S = TokioSleeper> {
    resolver: ActiveConnectionResolver<D, C>,
    sleeper: S,
    settle: Duration,
    initiate_timeout: Duration,
}

impl<D: IpsecDaemon, C: ConfigStore> Reconciler<D, C, TokioSleeper> {
    /// Creates a reconciler that sleeps on the tokio timer.
    pub const fn new(
        resolver: ActiveConnectionResolver<D, C>,
        settle: Duration,
        initiate_timeout: Duration,
    ) -> Self {
        Self {
            resolver,
            sleeper: TokioSleeper,
            settle,
            initiate_timeout,
        }
    }
}

impl<D: IpsecDaemon, C: ConfigStore, S: Sleeper> Reconciler<D, C, S> {
    /// Replaces the sleeper used for the settle window.
    pub fn with_sleeper<S2: Sleeper>(self, sleeper: S2) -> Reconciler<D, C, S2> {
        Reconciler {
            resolver: self.resolver,
            sleeper,
            settle: self.settle,
            initiate_timeout: self.initiate_timeout,
        }
    }

    /// Runs one reconciliation.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::Snapshot`] if either connection snapshot
    /// fails. Termination, reload and initiation failures do not abort the
    /// run.
    pub async fn reconcile(&self) -> Result<ReconcileReport, ReconcileError> {
        let daemon = self.resolver.daemon();

        let before = self.snapshot(SnapshotStage::Before).await?;
        tracing::info!("Active connections: {before}");

        let mut terminated = Vec::new();
        for name in &before {
            match daemon.terminate(name).await {
                Ok(()) => terminated.push(name.to_string()),
                // Already down is fine
                Err(e) => tracing::debug!("Terminating {name} failed: {e}"),
            }
        }

        let reload_failure = daemon.reload().await.err();
        if let Some(e) = &reload_failure {
            tracing::warn!("Reloading IPsec configuration failed: {e}");
        }

        tracing::debug!("Waiting {:?} for connections to settle", self.settle);
        self.sleeper.sleep(self.settle).await;

        let after = self.snapshot(SnapshotStage::After).await?;
        tracing::info!("Connections up after reload: {after}");

        let mut reinitiated = Vec::new();
        let mut failed_initiations = Vec::new();
        for name in before.missing_from(&after) {
            tracing::info!("Initiating {name}");
            match daemon.initiate(name, self.initiate_timeout).await {
                Ok(()) => reinitiated.push(name.to_string()),
                Err(e) => {
                    tracing::warn!("Initiating {name} failed: {e}");
                    failed_initiations.push((name.to_string(), e));
                }
            }
        }

        Ok(ReconcileReport {
            before,
            after,
            terminated,
            reinitiated,
            reload_failure,
            failed_initiations,
        })
    }

    async fn snapshot(&self, stage: SnapshotStage) -> Result<ActiveConnectionSet, ReconcileError> {
        self.resolver
            .list()
            .await
            .map_err(|source| ReconcileError::Snapshot { stage, source })
    }
}
