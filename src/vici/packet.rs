//! VICI packet framing.
//!
//! On the socket every packet is prefixed with its big-endian `u32` length.
//! The packet itself starts with a type byte; named packets then carry a
//! `u8`-length-prefixed name, and packets with a payload end with a message.

use super::wire::{Message, Reader, put_name};
use super::ViciError;

/// Maximum packet size accepted by the daemon.
pub const MAX_PACKET_SIZE: usize = 512 * 1024;

/// Packet types defined by the protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketType {
    /// Named request with a message.
    CmdRequest,
    /// Unnamed response with a message.
    CmdResponse,
    /// The requested command is unknown.
    CmdUnknown,
    /// Named event registration.
    EventRegister,
    /// Named event deregistration.
    EventUnregister,
    /// (De)registration acknowledged.
    EventConfirm,
    /// The requested event is unknown.
    EventUnknown,
    /// Named event with a message.
    Event,
}

impl PacketType {
    /// Returns the type code.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::CmdRequest => 0,
            Self::CmdResponse => 1,
            Self::CmdUnknown => 2,
            Self::EventRegister => 3,
            Self::EventUnregister => 4,
            Self::EventConfirm => 5,
            Self::EventUnknown => 6,
            Self::Event => 7,
        }
    }

    /// Parses a type code.
    ///
    /// # Errors
    ///
    /// Returns [`ViciError::UnknownPacketType`] for codes above 7.
    pub const fn from_code(code: u8) -> Result<Self, ViciError> {
        Ok(match code {
            0 => Self::CmdRequest,
            1 => Self::CmdResponse,
            2 => Self::CmdUnknown,
            3 => Self::EventRegister,
            4 => Self::EventUnregister,
            5 => Self::EventConfirm,
            6 => Self::EventUnknown,
            7 => Self::Event,
            other => return Err(ViciError::UnknownPacketType(other)),
        })
    }

    const fn is_named(self) -> bool {
        matches!(
            self,
            Self::CmdRequest | Self::EventRegister | Self::EventUnregister | Self::Event
        )
    }

    const fn has_message(self) -> bool {
        matches!(self, Self::CmdRequest | Self::CmdResponse | Self::Event)
    }
}

/// A single protocol packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    /// Packet type.
    pub kind: PacketType,
    /// Command or event name for named packet types.
    pub name: Option<String>,
    /// Payload; empty for packet types without one.
    pub message: Message,
}

impl Packet {
    /// Creates a packet of the given type.
    #[must_use]
    pub const fn new(kind: PacketType, name: Option<String>, message: Message) -> Self {
        Self {
            kind,
            name,
            message,
        }
    }

    /// Creates a command request.
    #[must_use]
    pub fn request(command: impl Into<String>, message: Message) -> Self {
        Self::new(PacketType::CmdRequest, Some(command.into()), message)
    }

    /// Creates an event registration.
    #[must_use]
    pub fn register(event: impl Into<String>) -> Self {
        Self::new(PacketType::EventRegister, Some(event.into()), Message::new())
    }

    /// Creates an event deregistration.
    #[must_use]
    pub fn unregister(event: impl Into<String>) -> Self {
        Self::new(PacketType::EventUnregister, Some(event.into()), Message::new())
    }

    /// Encodes the packet body (without the length prefix).
    ///
    /// # Errors
    ///
    /// Returns an error if the name or message cannot be encoded.
    pub fn encode(&self) -> Result<Vec<u8>, ViciError> {
        let mut buf = vec![self.kind.code()];
        if self.kind.is_named() {
            put_name(&mut buf, self.name.as_deref().unwrap_or_default())?;
        }
        if self.kind.has_message() {
            self.message.encode_into(&mut buf)?;
        }
        if buf.len() > MAX_PACKET_SIZE {
            return Err(ViciError::PacketTooLarge(buf.len()));
        }
        Ok(buf)
    }

    /// Decodes a packet body (without the length prefix).
    ///
    /// # Errors
    ///
    /// Returns an error on truncated input, an unknown packet type or a
    /// malformed message.
    pub fn decode(bytes: &[u8]) -> Result<Self, ViciError> {
        let mut reader = Reader::new(bytes);
        let kind = PacketType::from_code(reader.u8()?)?;
        let name = if kind.is_named() {
            Some(reader.name()?)
        } else {
            None
        };
        let message = if kind.has_message() {
            Message::decode(reader.rest())?
        } else {
            Message::new()
        };
        Ok(Self::new(kind, name, message))
    }
}
