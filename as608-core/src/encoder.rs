//! Command packet construction
//!
//! A command is an opcode followed by positional, fixed-width parameters.
//! Parameters are typed up front, so a malformed frame can never be built:
//! an invalid width is reported as an error before any byte is produced.

use bytes::{BufMut, Bytes, BytesMut};
use tracing::trace;

use crate::{
    codec,
    command::Instruction,
    error::{Error, Result},
    packet::{Packet, PacketKind},
};

/// One encodable command parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param {
    /// Single byte
    Byte(u8),

    /// Unsigned integer written big-endian over `width` bytes (1..=4)
    Uint { value: u32, width: usize },

    /// Fixed-length buffer copied verbatim
    Buffer(Bytes),
}

impl Param {
    pub fn byte(value: u8) -> Self {
        Self::Byte(value)
    }

    pub fn u16(value: u16) -> Self {
        Self::Uint {
            value: u32::from(value),
            width: 2,
        }
    }

    pub fn u32(value: u32) -> Self {
        Self::Uint { value, width: 4 }
    }

    /// Integer of arbitrary declared width; validated when encoded
    pub fn uint(value: u32, width: usize) -> Self {
        Self::Uint { value, width }
    }

    pub fn buffer(data: impl Into<Bytes>) -> Self {
        Self::Buffer(data.into())
    }

    /// Bytes this parameter occupies on the wire
    pub fn width(&self) -> usize {
        match self {
            Self::Byte(_) => 1,
            Self::Uint { width, .. } => *width,
            Self::Buffer(data) => data.len(),
        }
    }

    fn write(&self, out: &mut BytesMut) -> Result<()> {
        match self {
            Self::Byte(value) => out.put_u8(*value),
            Self::Uint { value, width } => {
                let mut field = [0u8; codec::MAX_WIDTH];
                let field = field
                    .get_mut(..*width)
                    .ok_or(Error::InvalidParamWidth { width: *width })?;
                codec::split_into(*value, field)?;
                out.put_slice(field);
            }
            Self::Buffer(data) => out.put_slice(data),
        }
        Ok(())
    }
}

/// An instruction with its ordered parameter list
///
/// # Examples
///
/// ```
/// use as608_core::{CommandSpec, Instruction, Param};
///
/// let frame = CommandSpec::new(Instruction::Search)
///     .param(Param::byte(1))
///     .param(Param::u16(0))
///     .param(Param::u16(300))
///     .encode(0xFFFF_FFFF)
///     .unwrap();
///
/// assert_eq!(&frame[9..15], &[0x04, 0x01, 0x00, 0x00, 0x01, 0x2C]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub instruction: Instruction,
    pub params: Vec<Param>,
}

impl CommandSpec {
    pub fn new(instruction: Instruction) -> Self {
        Self {
            instruction,
            params: Vec::new(),
        }
    }

    /// Append a parameter
    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    /// Opcode plus all parameter bytes
    pub fn payload_len(&self) -> usize {
        1 + self.params.iter().map(Param::width).sum::<usize>()
    }

    /// Serialize opcode and parameters
    pub fn payload(&self) -> Result<Bytes> {
        let mut buf = BytesMut::with_capacity(self.payload_len());
        buf.put_u8(self.instruction.into());

        for param in &self.params {
            param.write(&mut buf)?;
        }

        Ok(buf.freeze())
    }

    /// Build the command packet addressed to `address`
    pub fn to_packet(&self, address: u32) -> Result<Packet> {
        Packet::new(PacketKind::Command, address, self.payload()?)
    }

    /// Build and encode the full frame
    pub fn encode(&self, address: u32) -> Result<BytesMut> {
        let frame = self.to_packet(address)?.encode();

        trace!(
            instruction = %self.instruction,
            frame = %hex::encode(&frame),
            "Encoded command"
        );

        Ok(frame)
    }
}
