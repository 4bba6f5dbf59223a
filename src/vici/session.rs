//! Request/response session over the daemon's control socket.

use std::path::Path;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixStream;

use super::packet::MAX_PACKET_SIZE;
use super::{Message, Packet, PacketType, ViciError};

/// An open VICI connection.
///
/// Sessions are cheap; callers open one per operation instead of keeping
/// one alive across the daemon reload.
#[derive(Debug)]
pub struct Session {
    stream: UnixStream,
}

impl Session {
    /// Connects to the socket at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ViciError::Connect`] if the socket cannot be reached.
    pub async fn connect(path: &Path) -> Result<Self, ViciError> {
        let stream = UnixStream::connect(path)
            .await
            .map_err(|source| ViciError::Connect {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self::from_stream(stream))
    }

    /// Wraps an already connected stream.
    #[must_use]
    pub const fn from_stream(stream: UnixStream) -> Self {
        Self { stream }
    }

    /// Sends a command and waits for its response.
    ///
    /// # Errors
    ///
    /// Returns [`ViciError::UnknownCommand`] if the daemon rejects the command
    /// name, or an I/O or decoding error.
    pub async fn request(&mut self, command: &str, message: Message) -> Result<Message, ViciError> {
        self.send(&Packet::request(command, message)).await?;
        loop {
            let packet = self.recv().await?;
            match packet.kind {
                PacketType::CmdResponse => return Ok(packet.message),
                PacketType::CmdUnknown => return Err(ViciError::UnknownCommand(command.into())),
                // Events for registrations of an earlier exchange may still arrive
                PacketType::Event => {}
                other => return Err(ViciError::UnexpectedPacket(other)),
            }
        }
    }

    /// Sends a command whose results are streamed as `event` packets.
    ///
    /// Registers for `event`, issues the command, collects every event until
    /// the response arrives, then unregisters. Returns the events and the
    /// final response.
    ///
    /// # Errors
    ///
    /// Returns an error if registration fails or the command is unknown.
    pub async fn streamed_request(
        &mut self,
        command: &str,
        event: &str,
        message: Message,
    ) -> Result<(Vec<Message>, Message), ViciError> {
        self.register(event).await?;
        self.send(&Packet::request(command, message)).await?;

        let mut events = Vec::new();
        let response = loop {
            let packet = self.recv().await?;
            match packet.kind {
                PacketType::Event if packet.name.as_deref() == Some(event) => {
                    events.push(packet.message);
                }
                PacketType::Event => {}
                PacketType::CmdResponse => break packet.message,
                PacketType::CmdUnknown => return Err(ViciError::UnknownCommand(command.into())),
                other => return Err(ViciError::UnexpectedPacket(other)),
            }
        };

        self.unregister(event).await?;
        Ok((events, response))
    }

    async fn register(&mut self, event: &str) -> Result<(), ViciError> {
        self.send(&Packet::register(event)).await?;
        self.await_confirm(event).await
    }

    async fn unregister(&mut self, event: &str) -> Result<(), ViciError> {
        self.send(&Packet::unregister(event)).await?;
        self.await_confirm(event).await
    }

    async fn await_confirm(&mut self, event: &str) -> Result<(), ViciError> {
        loop {
            let packet = self.recv().await?;
            match packet.kind {
                PacketType::EventConfirm => return Ok(()),
                PacketType::EventUnknown => return Err(ViciError::UnknownEvent(event.into())),
                PacketType::Event => {}
                other => return Err(ViciError::UnexpectedPacket(other)),
            }
        }
    }

    /// Writes one length-prefixed packet.
    pub(super) async fn send(&mut self, packet: &Packet) -> Result<(), ViciError> {
        let body = packet.encode()?;
        let len = u32::try_from(body.len()).map_err(|_| ViciError::PacketTooLarge(body.len()))?;
        let mut frame = Vec::with_capacity(body.len() + 4);
        frame.extend_from_slice(&len.to_be_bytes());
        frame.extend_from_slice(&body);
        self.stream.write_all(&frame).await?;
        Ok(())
    }

    /// Reads one length-prefixed packet.
    pub(super) async fn recv(&mut self) -> Result<Packet, ViciError> {
        let mut len = [0u8; 4];
        self.stream.read_exact(&mut len).await?;
        let len = u32::from_be_bytes(len) as usize;
        if len > MAX_PACKET_SIZE {
            return Err(ViciError::PacketTooLarge(len));
        }
        let mut body = vec![0u8; len];
        self.stream.read_exact(&mut body).await?;
        Packet::decode(&body)
    }
}

/// Converts a `success = no` response into [`ViciError::CommandFailed`].
///
/// # Errors
///
/// Returns [`ViciError::CommandFailed`] carrying the daemon's `errmsg`.
pub fn check_success(command: &str, response: &Message) -> Result<(), ViciError> {
    if response.get_str("success") == Some("no") {
        return Err(ViciError::CommandFailed {
            command: command.to_string(),
            message: response
                .get_str("errmsg")
                .unwrap_or("no error message")
                .to_string(),
        });
    }
    Ok(())
}
