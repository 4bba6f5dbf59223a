//! [`ConfigStore`] backed by the `cli-shell-api` helper.

use std::path::PathBuf;
use std::process::{Output, Stdio};
use std::sync::LazyLock;

use regex::Regex;
use tokio::process::Command;

use super::{ConfigStore, StoreError};

/// Node names are printed single-quoted and space-separated.
static QUOTED_NODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"'([^']*)'").expect("node pattern is valid"));

/// Runs `cli-shell-api` for every query.
#[derive(Debug, Clone)]
pub struct ShellApiStore {
    command: PathBuf,
}

impl ShellApiStore {
    /// Creates a store that invokes the helper at `command`.
    #[must_use]
    pub fn new(command: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
        }
    }

    async fn query(&self, operation: &str, path: &str) -> Result<(String, Output), StoreError> {
        let command_line = format!("{} {operation} {path}", self.command.display());
        tracing::debug!("Querying configuration: {command_line}");

        let output = Command::new(&self.command)
            .arg(operation)
            .args(path.split_whitespace())
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .await
            .map_err(|source| StoreError::Spawn {
                command: command_line.clone(),
                source,
            })?;

        if output.status.code().is_none() {
            return Err(StoreError::Query {
                command: command_line,
                reason: format!("terminated by {}", output.status),
            });
        }
        Ok((command_line, output))
    }
}

fn stdout_text(command: String, output: Output) -> Result<String, StoreError> {
    String::from_utf8(output.stdout).map_err(|_| StoreError::Query {
        command,
        reason: "output is not valid UTF-8".to_string(),
    })
}

/// Extracts the node names from `listEffectiveNodes` output.
pub(crate) fn parse_node_list(output: &str) -> Vec<String> {
    QUOTED_NODE
        .captures_iter(output)
        .map(|caps| caps[1].to_string())
        .collect()
}

impl ConfigStore for ShellApiStore {
    async fn list_effective_nodes(&self, path: &str) -> Result<Vec<String>, StoreError> {
        let (command, output) = self.query("listEffectiveNodes", path).await?;
        if !output.status.success() {
            tracing::debug!("No configuration nodes under '{path}'");
            return Ok(Vec::new());
        }
        Ok(parse_node_list(&stdout_text(command, output)?))
    }

    async fn return_effective_value(&self, path: &str) -> Result<Option<String>, StoreError> {
        let (command, output) = self.query("returnEffectiveValue", path).await?;
        if !output.status.success() {
            return Ok(None);
        }
        let value = stdout_text(command, output)?;
        Ok(Some(value.trim_end_matches(['\r', '\n']).to_string()))
    }
}
