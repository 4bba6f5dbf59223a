//! Handling of a single DHCP event.
//!
//! The flow is linear: filter the event, patch both IPsec files for the
//! interface, and (only if the interface still has an address) reconcile the
//! daemon's connections.

use thiserror::Error;

use crate::daemon::IpsecDaemon;
use crate::event::DhcpEvent;
use crate::ipsec::{ConfigDocument, IpsecFiles, RewriteError, SecretsFile};
use crate::reconcile::{ReconcileError, ReconcileReport, Reconciler};
use crate::store::ConfigStore;
use crate::time::Sleeper;

#[cfg(test)]
#[path = "hook_tests.rs"]
mod tests;

/// Error aborting event handling.
#[derive(Debug, Error)]
pub enum HookError {
    /// One of the IPsec files could not be rewritten.
    #[error(transparent)]
    Rewrite(#[from] RewriteError),

    /// The daemon's connections could not be reconciled.
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),
}

/// Result of handling an event.
#[derive(Debug)]
pub enum HookOutcome {
    /// The event needed no IPsec work.
    Skipped,
    /// The files were patched.
    Updated {
        /// `ipsec.conf` blocks retargeted.
        blocks_updated: usize,
        /// `ipsec.secrets` entries retargeted.
        secrets_updated: usize,
        /// Reconciliation result; `None` when the interface lost its address.
        reconcile: Option<ReconcileReport>,
    },
}

/// Processes one DHCP event.
///
/// # Errors
///
/// Returns [`HookError::Rewrite`] if either file cannot be read or replaced
/// (the secrets file is not touched if `ipsec.conf` fails), or
/// [`HookError::Reconcile`] if the daemon's connections cannot be listed.
pub async fn process_event<D, C, S>(
    event: &DhcpEvent,
    files: &IpsecFiles,
    reconciler: &Reconciler<D, C, S>,
) -> Result<HookOutcome, HookError>
where
    D: IpsecDaemon,
    C: ConfigStore,
    S: Sleeper,
{
    let new_address = event.new_address_text();
    let old_address = event.old_address.map(|a| a.to_string());
    let new_text = new_address.as_deref().unwrap_or_default();
    let old_text = old_address.as_deref().unwrap_or_default();

    tracing::info!(
        "Receive DHCP address updated to {new_text} from {old_text}, reason: {}.",
        event.reason
    );

    if !event.requires_update() {
        tracing::info!("No ipsec update needed.");
        return Ok(HookOutcome::Skipped);
    }

    tracing::info!(
        "DHCP address updated to {new_text} from {old_text}: Updating ipsec configuration, reason: {}.",
        event.reason
    );

    let mut document = ConfigDocument::read(&files.conf)?;
    let blocks_updated = document.write(&files.conf, &event.interface, new_address.as_deref())?;
    tracing::debug!(
        "Updated {blocks_updated} connection(s) in {}",
        files.conf.display()
    );

    let secrets = SecretsFile::read(&files.secrets)?;
    let secrets_updated = secrets.write(&files.secrets, &event.interface, new_address.as_deref())?;
    tracing::debug!(
        "Updated {secrets_updated} secret(s) in {}",
        files.secrets.display()
    );

    let reconcile = if new_address.is_some() {
        Some(reconciler.reconcile().await?)
    } else {
        tracing::info!("{} has no address; not reconnecting tunnels", event.interface);
        None
    };

    Ok(HookOutcome::Updated {
        blocks_updated,
        secrets_updated,
        reconcile,
    })
}
