//! Error types for configuration parsing and validation.

use std::net::AddrParseError;
use std::path::PathBuf;

use thiserror::Error;

/// Error type for configuration operations.
///
/// Covers errors from parsing, validation, and file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("Failed to read config file '{}': {source}", path.display())]
    FileRead {
        /// Path to the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("Failed to parse TOML config: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Missing required field that must be provided by CLI or config file.
    #[error("Missing required field: {field}. {hint}")]
    MissingRequired {
        /// Name of the missing field
        field: &'static str,
        /// Hint for how to provide the value
        hint: &'static str,
    },

    /// An address argument is not an IP address.
    #[error("Invalid address for {field}: '{value}': {source}")]
    InvalidAddress {
        /// Name of the field
        field: &'static str,
        /// The rejected value
        value: String,
        /// Parse error
        #[source]
        source: AddrParseError,
    },

    /// Invalid duration value (zero or too large).
    #[error("Invalid duration for {field}: {reason}")]
    InvalidDuration {
        /// Name of the field
        field: &'static str,
        /// Reason for invalidity
        reason: String,
    },
}

/// Well-known field names used in errors.
///
/// Use these constants for compile-time safety when matching field names.
pub mod field {
    /// The interface argument.
    pub const INTERFACE: &str = "interface";
    /// The new address argument.
    pub const NEW_IP: &str = "new_ip";
    /// The previous address argument.
    pub const OLD_IP: &str = "old_ip";
    /// The settle window.
    pub const SETTLE_SECS: &str = "daemon.settle_secs";
    /// The initiate timeout.
    pub const INITIATE_TIMEOUT_SECS: &str = "daemon.initiate_timeout_secs";
}

impl ConfigError {
    /// Creates a `MissingRequired` error for a required field.
    #[must_use]
    pub const fn missing(field: &'static str, hint: &'static str) -> Self {
        Self::MissingRequired { field, hint }
    }
}
