//! Scripted [`IpsecDaemon`] for tests.

use std::collections::{BTreeSet, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::{DaemonError, IpsecDaemon};
use crate::vici::ViciError;

/// A call observed by [`MockDaemon`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DaemonCall {
    ListSas,
    Terminate(String),
    Reload,
    Initiate(String, Duration),
}

/// Daemon double returning queued SA listings and recording every call.
///
/// Uses `Mutex<VecDeque>` to avoid requiring `Clone` on `DaemonError`.
#[derive(Debug, Default)]
pub struct MockDaemon {
    listings: Mutex<VecDeque<Result<Vec<String>, DaemonError>>>,
    calls: Mutex<Vec<DaemonCall>>,
    reload_fails: bool,
    failing_terminations: BTreeSet<String>,
    failing_initiations: BTreeSet<String>,
}

fn refused(command: &str) -> DaemonError {
    DaemonError::Vici(ViciError::CommandFailed {
        command: command.to_string(),
        message: "refused by mock".to_string(),
    })
}

impl MockDaemon {
    /// Returns each listing in turn; an exhausted queue yields an empty list.
    pub fn with_listings<I, S>(listings: impl IntoIterator<Item = I>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let listings = listings
            .into_iter()
            .map(|names| Ok(names.into_iter().map(Into::into).collect()))
            .collect();
        Self {
            listings: Mutex::new(listings),
            ..Self::default()
        }
    }

    /// Returns the given results in turn.
    pub fn with_results(results: Vec<Result<Vec<String>, DaemonError>>) -> Self {
        Self {
            listings: Mutex::new(results.into()),
            ..Self::default()
        }
    }

    pub fn failing_reload(mut self) -> Self {
        self.reload_fails = true;
        self
    }

    pub fn failing_terminate(mut self, ike: &str) -> Self {
        self.failing_terminations.insert(ike.to_string());
        self
    }

    pub fn failing_initiate(mut self, child: &str) -> Self {
        self.failing_initiations.insert(child.to_string());
        self
    }

    /// Returns all calls in order.
    pub fn calls(&self) -> Vec<DaemonCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Returns the names passed to `initiate`, in order.
    pub fn initiated(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                DaemonCall::Initiate(name, _) => Some(name),
                _ => None,
            })
            .collect()
    }

    /// Returns the names passed to `terminate`, in order.
    pub fn terminated(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                DaemonCall::Terminate(name) => Some(name),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: DaemonCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl IpsecDaemon for MockDaemon {
    async fn list_sas(&self) -> Result<Vec<String>, DaemonError> {
        self.record(DaemonCall::ListSas);
        self.listings
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn terminate(&self, ike: &str) -> Result<(), DaemonError> {
        self.record(DaemonCall::Terminate(ike.to_string()));
        if self.failing_terminations.contains(ike) {
            return Err(refused("terminate"));
        }
        Ok(())
    }

    async fn reload(&self) -> Result<(), DaemonError> {
        self.record(DaemonCall::Reload);
        if self.reload_fails {
            return Err(refused("reload"));
        }
        Ok(())
    }

    async fn initiate(&self, child: &str, timeout: Duration) -> Result<(), DaemonError> {
        self.record(DaemonCall::Initiate(child.to_string(), timeout));
        if self.failing_initiations.contains(child) {
            return Err(refused("initiate"));
        }
        Ok(())
    }
}

impl IpsecDaemon for Arc<MockDaemon> {
    async fn list_sas(&self) -> Result<Vec<String>, DaemonError> {
        (**self).list_sas().await
    }

    async fn terminate(&self, ike: &str) -> Result<(), DaemonError> {
        (**self).terminate(ike).await
    }

    async fn reload(&self) -> Result<(), DaemonError> {
        (**self).reload().await
    }

    async fn initiate(&self, child: &str, timeout: Duration) -> Result<(), DaemonError> {
        (**self).initiate(child, timeout).await
    }
}
