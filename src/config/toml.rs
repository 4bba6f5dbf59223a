//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional to allow partial configuration
/// that can be merged with CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// IPsec file locations
    #[serde(default)]
    pub files: FilesSection,

    /// IPsec daemon access and timing
    #[serde(default)]
    pub daemon: DaemonSection,

    /// Configuration store access
    #[serde(default)]
    pub store: StoreSection,
}

/// IPsec file locations.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilesSection {
    /// Path to ipsec.conf
    pub conf: Option<PathBuf>,

    /// Path to ipsec.secrets
    pub secrets: Option<PathBuf>,
}

/// IPsec daemon section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DaemonSection {
    /// Path to the charon VICI socket
    pub vici_socket: Option<PathBuf>,

    /// Path to the `ipsec` control script
    pub ipsec_command: Option<PathBuf>,

    /// Seconds to wait after reloading
    pub settle_secs: Option<u64>,

    /// Seconds to wait for a tunnel initiation
    pub initiate_timeout_secs: Option<u64>,
}

/// Configuration store section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreSection {
    /// Path to `cli-shell-api`
    pub shell_api: Option<PathBuf>,

    /// Configuration path of the site-to-site peers
    pub peer_path: Option<String>,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}
