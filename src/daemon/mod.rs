//! Control of the IPsec daemon.
//!
//! The hook needs four things from the daemon: the names of the currently
//! established IKE SAs, forced termination of one of them, a reload of the
//! on-disk configuration, and initiation of a child SA. [`IpsecDaemon`]
//! abstracts these so the reconciliation logic can be tested without a
//! running charon.

mod error;
mod strongswan;

#[cfg(test)]
pub mod mock;

use std::time::Duration;

pub use error::DaemonError;
pub use strongswan::StrongswanDaemon;

/// Operations the hook performs on the IPsec daemon.
pub trait IpsecDaemon: Send + Sync {
    /// Returns the names of all IKE SAs the daemon currently knows about.
    ///
    /// # Errors
    ///
    /// Returns [`DaemonError`] if the daemon cannot be queried.
    fn list_sas(&self) -> impl std::future::Future<Output = Result<Vec<String>, DaemonError>> + Send;

    /// Forcefully terminates the IKE SA named `ike`.
    ///
    /// # Errors
    ///
    /// Returns [`DaemonError`] if the daemon refuses or cannot be reached.
    fn terminate(
        &self,
        ike: &str,
    ) -> impl std::future::Future<Output = Result<(), DaemonError>> + Send;

    /// Makes the daemon re-read its configuration and secrets.
    ///
    /// # Errors
    ///
    /// Returns [`DaemonError`] if a reload step fails.
    fn reload(&self) -> impl std::future::Future<Output = Result<(), DaemonError>> + Send;

    /// Initiates the child SA named `child`, waiting at most `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`DaemonError`] if initiation fails or times out.
    fn initiate(
        &self,
        child: &str,
        timeout: Duration,
    ) -> impl std::future::Future<Output = Result<(), DaemonError>> + Send;
}
