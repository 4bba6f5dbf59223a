//! strongSwan implementation of [`IpsecDaemon`].

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;

use super::{DaemonError, IpsecDaemon};
use crate::vici::{Message, Session, check_success};

/// Extra time granted on top of the daemon-side initiate timeout.
const INITIATE_GRACE: Duration = Duration::from_secs(2);

/// Talks to charon over VICI and reloads it through the `ipsec` script.
///
/// Every operation opens its own session: the reload may restart the
/// daemon's configuration backend, so a session is never reused across
/// calls.
#[derive(Debug, Clone)]
pub struct StrongswanDaemon {
    socket: PathBuf,
    ipsec_command: PathBuf,
}

impl StrongswanDaemon {
    /// Creates a daemon handle for the given control socket and `ipsec` script.
    #[must_use]
    pub fn new(socket: impl Into<PathBuf>, ipsec_command: impl Into<PathBuf>) -> Self {
        Self {
            socket: socket.into(),
            ipsec_command: ipsec_command.into(),
        }
    }

    /// Returns the control socket path.
    #[must_use]
    pub fn socket(&self) -> &Path {
        &self.socket
    }

    async fn session(&self) -> Result<Session, DaemonError> {
        Ok(Session::connect(&self.socket).await?)
    }

    async fn run_ipsec(&self, action: &str) -> Result<(), DaemonError> {
        let command = format!("{} {action}", self.ipsec_command.display());
        tracing::debug!("Running {command}");

        let status = Command::new(&self.ipsec_command)
            .arg(action)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|source| DaemonError::Spawn {
                command: command.clone(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(DaemonError::Command { command, status })
        }
    }
}

impl IpsecDaemon for StrongswanDaemon {
    async fn list_sas(&self) -> Result<Vec<String>, DaemonError> {
        let mut session = self.session().await?;
        let (events, response) = session
            .streamed_request("list-sas", "list-sa", Message::new())
            .await?;
        check_success("list-sas", &response)?;

        Ok(events
            .iter()
            .flat_map(|event| event.keys().map(str::to_string))
            .collect())
    }

    async fn terminate(&self, ike: &str) -> Result<(), DaemonError> {
        let mut session = self.session().await?;
        let request = Message::new().with_str("ike", ike).with_str("force", "yes");
        let response = session.request("terminate", request).await?;
        check_success("terminate", &response)?;
        Ok(())
    }

    async fn reload(&self) -> Result<(), DaemonError> {
        // Both steps are attempted even if the first one fails
        let reread = self.run_ipsec("rereadall").await;
        let update = self.run_ipsec("update").await;
        reread.and(update)
    }

    async fn initiate(&self, child: &str, timeout: Duration) -> Result<(), DaemonError> {
        let exchange = async {
            let mut session = self.session().await?;
            let request = Message::new()
                .with_str("child", child)
                .with_str("timeout", timeout.as_millis().to_string());
            let response = session.request("initiate", request).await?;
            check_success("initiate", &response)?;
            Ok::<(), DaemonError>(())
        };

        let limit = timeout + INITIATE_GRACE;
        tokio::time::timeout(limit, exchange)
            .await
            .map_err(|_| DaemonError::Timeout {
                operation: format!("initiate {child}"),
                timeout: limit,
            })?
    }
}
