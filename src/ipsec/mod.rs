//! Rewriters for the IPsec daemon's configuration files.
//!
//! This module provides:
//! - The `ipsec.conf` block model ([`ConfigDocument`], [`ConnectionBlock`])
//! - The `ipsec.secrets` patcher ([`SecretsFile`])
//! - The line classifier both are built on ([`line`])
//!
//! Both files are read fully, patched in memory and replaced atomically.
//! There is no locking between concurrent invocations.

mod conf;
mod error;
mod file;
pub mod line;
mod secrets;

#[cfg(test)]
mod secrets_tests;

use std::path::PathBuf;

pub use conf::{ConfigDocument, ConnectionBlock};
pub use error::RewriteError;
pub use secrets::{MalformedEntry, NO_ADDRESS, SecretsFile};

/// Locations of the two files the hook rewrites.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpsecFiles {
    /// Connection definitions (`ipsec.conf`)
    pub conf: PathBuf,
    /// Pre-shared keys (`ipsec.secrets`)
    pub secrets: PathBuf,
}

impl IpsecFiles {
    /// Creates a new pair of file locations.
    #[must_use]
    pub fn new(conf: impl Into<PathBuf>, secrets: impl Into<PathBuf>) -> Self {
        Self {
            conf: conf.into(),
            secrets: secrets.into(),
        }
    }
}
