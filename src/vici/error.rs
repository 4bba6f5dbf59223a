//! Error types for the VICI protocol layer.

use std::path::PathBuf;

use thiserror::Error;

use super::PacketType;

/// Error type for VICI encoding, decoding and session I/O.
#[derive(Debug, Error)]
pub enum ViciError {
    /// Failed to connect to the daemon's control socket.
    #[error("Failed to connect to VICI socket '{}': {source}", path.display())]
    Connect {
        /// Socket path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Socket read or write failed.
    #[error("VICI socket I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Input ended in the middle of a packet or element.
    #[error("Truncated VICI data")]
    Truncated,

    /// Unknown message element type.
    #[error("Unknown VICI element type {0}")]
    UnknownElement(u8),

    /// Unknown packet type.
    #[error("Unknown VICI packet type {0}")]
    UnknownPacketType(u8),

    /// Sections or lists are not properly nested.
    #[error("Unbalanced VICI message structure")]
    Unbalanced,

    /// A key or section name exceeds 255 bytes.
    #[error("VICI name too long ({0} bytes)")]
    NameTooLong(usize),

    /// A value exceeds 65535 bytes.
    #[error("VICI value too long ({0} bytes)")]
    ValueTooLong(usize),

    /// A packet exceeds the protocol's size limit.
    #[error("VICI packet too large ({0} bytes)")]
    PacketTooLarge(usize),

    /// The daemon sent a packet that does not fit the exchange.
    #[error("Unexpected VICI packet: {0:?}")]
    UnexpectedPacket(PacketType),

    /// The daemon does not know the command.
    #[error("Unknown VICI command '{0}'")]
    UnknownCommand(String),

    /// The daemon does not know the event.
    #[error("Unknown VICI event '{0}'")]
    UnknownEvent(String),

    /// The daemon reported `success = no`.
    #[error("VICI command '{command}' failed: {message}")]
    CommandFailed {
        /// Command name
        command: String,
        /// Daemon-provided `errmsg`
        message: String,
    },
}
