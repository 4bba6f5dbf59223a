//! Application execution logic.
//!
//! Wires the production daemon and configuration store into the event
//! handler and reports what happened.

use std::fmt::Write as _;

use thiserror::Error;

use ipsec_dhcp_hook::config::ValidatedConfig;
use ipsec_dhcp_hook::daemon::StrongswanDaemon;
use ipsec_dhcp_hook::hook::{HookError, HookOutcome, process_event};
use ipsec_dhcp_hook::reconcile::{ActiveConnectionResolver, Reconciler};
use ipsec_dhcp_hook::store::ShellApiStore;

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// Handling the DHCP event failed.
    #[error("Failed to update IPsec tunnels: {0}")]
    Hook(#[from] HookError),
}

/// Handles the configured DHCP event.
///
/// # Errors
///
/// Returns an error if a file cannot be rewritten or the daemon's
/// connections cannot be listed.
///
/// # Coverage Note
///
/// This function is excluded from coverage because it requires a running
/// IPsec daemon and configuration store.
#[cfg(not(tarpaulin_include))]
pub async fn execute(config: ValidatedConfig) -> Result<(), RunError> {
    let daemon = StrongswanDaemon::new(&config.vici_socket, &config.ipsec_command);
    tracing::debug!("Using VICI socket {}", daemon.socket().display());

    let store = ShellApiStore::new(&config.shell_api);
    let resolver = ActiveConnectionResolver::new(daemon, store, config.peer_path.as_str());
    let reconciler = Reconciler::new(resolver, config.settle, config.initiate_timeout);

    let outcome = process_event(&config.event, &config.files, &reconciler).await?;
    tracing::info!("{}", summarize(&outcome));
    Ok(())
}

/// Describes an outcome in one line.
fn summarize(outcome: &HookOutcome) -> String {
    match outcome {
        HookOutcome::Skipped => "Nothing to do".to_string(),
        HookOutcome::Updated {
            blocks_updated,
            secrets_updated,
            reconcile: None,
        } => format!(
            "Updated {blocks_updated} connection(s) and {secrets_updated} secret(s); tunnels left down"
        ),
        HookOutcome::Updated {
            blocks_updated,
            secrets_updated,
            reconcile: Some(report),
        } => {
            let mut summary = format!(
                "Updated {blocks_updated} connection(s) and {secrets_updated} secret(s); \
                 restarted {} tunnel(s), initiated {}",
                report.before.len(),
                report.reinitiated.len()
            );
            if !report.is_clean() {
                let failures =
                    report.failed_initiations.len() + usize::from(report.reload_failure.is_some());
                let _ = write!(summary, ", {failures} failure(s)");
            }
            summary
        }
    }
}
