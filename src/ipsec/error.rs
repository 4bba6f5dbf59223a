//! Error types for the IPsec file rewriters.

use std::path::PathBuf;

use thiserror::Error;

/// Error type for reading or rewriting `ipsec.conf` / `ipsec.secrets`.
///
/// Every variant names the file involved. No rollback is attempted; a file
/// that was already replaced stays replaced.
#[derive(Debug, Error)]
pub enum RewriteError {
    /// The file could not be opened or read.
    #[error("Can't open {} for reading: {source}", path.display())]
    Read {
        /// Path of the file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The file could not be written or replaced.
    #[error("Can't open {} for writing: {source}", path.display())]
    Write {
        /// Path of the file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A secrets line carries the interface tag but not the
    /// `<address> <id> : PSK <secret>` shape.
    ///
    /// Only the line number is reported; the line itself holds a key.
    #[error("Malformed PSK entry at {}:{line}", path.display())]
    MalformedSecret {
        /// Path of the secrets file
        path: PathBuf,
        /// 1-based line number
        line: usize,
    },
}
