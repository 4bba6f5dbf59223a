//! Client side of the strongSwan VICI protocol.
//!
//! This module provides:
//! - Message trees and their encoding ([`Message`], [`Value`])
//! - Packet framing ([`Packet`], [`PacketType`])
//! - A request/response session over a UNIX socket ([`Session`])
//!
//! Only what the hook needs is implemented: plain commands and commands
//! whose results are streamed as events (`list-sas`).

mod error;
mod packet;
mod session;
mod wire;


pub use error::ViciError;
pub use packet::{MAX_PACKET_SIZE, Packet, PacketType};
pub use session::{Session, check_success};
pub use wire::{Message, Value};
