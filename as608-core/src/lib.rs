//! # as608-core
//!
//! Core protocol implementation for AS608-family fingerprint modules.
//!
//! This crate provides the low-level protocol primitives:
//! - Big-endian field codec
//! - Additive checksum
//! - Instruction table and typed command encoding
//! - Frame encoding/decoding
//! - Confirmation code taxonomy
//! - Session state

pub mod checksum;
pub mod codec;
pub mod command;
pub mod confirm;
pub mod constants;
pub mod encoder;
pub mod error;
pub mod packet;
pub mod session;

pub use command::Instruction;
pub use confirm::{ConfirmCode, LocalCode};
pub use encoder::{CommandSpec, Param};
pub use error::{Error, Result};
pub use packet::{Packet, PacketKind};
pub use session::{Session, SessionState};
