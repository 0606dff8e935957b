//! AS608 frame structure and encoding/decoding

use bytes::{BufMut, Bytes, BytesMut};
use std::fmt;

use crate::{
    checksum,
    constants::{START_CODE, frame},
    error::{Error, Result},
};

/// Packet identifier byte
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PacketKind {
    /// Host to module instruction
    Command = 0x01,

    /// Data packet with more to follow
    DataMore = 0x02,

    /// Module acknowledgement
    Ack = 0x07,

    /// Last data packet of a transfer
    DataEnd = 0x08,
}

impl PacketKind {
    pub fn is_data(self) -> bool {
        matches!(self, Self::DataMore | Self::DataEnd)
    }
}

impl From<PacketKind> for u8 {
    fn from(kind: PacketKind) -> u8 {
        kind as u8
    }
}

impl TryFrom<u8> for PacketKind {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0x01 => Ok(Self::Command),
            0x02 => Ok(Self::DataMore),
            0x07 => Ok(Self::Ack),
            0x08 => Ok(Self::DataEnd),
            _ => Err(Error::UnknownPacketKind(value)),
        }
    }
}

/// AS608 protocol frame
///
/// # Frame Structure
///
/// ```text
/// ┌──────────┬──────────┬──────┬──────────┬───────────┬──────────┐
/// │  Marker  │ Address  │ Kind │  Length  │  Payload  │ Checksum │
/// │ 2 bytes  │ 4 bytes  │  1   │ 2 bytes  │  N bytes  │ 2 bytes  │
/// │ (0xEF01) │  (BE)    │      │ (BE N+2) │           │   (BE)   │
/// └──────────┴──────────┴──────┴──────────┴───────────┴──────────┘
/// ```
///
/// # Examples
///
/// ```
/// use as608_core::{Packet, PacketKind};
///
/// let packet = Packet::new(PacketKind::Command, 0xFFFF_FFFF, vec![0x01]).unwrap();
/// let encoded = packet.encode();
/// assert_eq!(encoded.len(), 12);
///
/// let decoded = Packet::decode(&encoded).unwrap();
/// assert_eq!(decoded, packet);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Packet {
    pub kind: PacketKind,

    /// Module address the frame is scoped to
    pub address: u32,

    /// Opcode and parameters, confirmation code and fields, or raw data
    pub payload: Bytes,
}

impl Packet {
    /// Create a packet, rejecting payloads the module cannot accept
    pub fn new(kind: PacketKind, address: u32, payload: impl Into<Bytes>) -> Result<Self> {
        let payload = payload.into();

        if payload.len() > frame::MAX_PAYLOAD_SIZE {
            return Err(Error::PayloadTooLarge {
                size: payload.len(),
                max: frame::MAX_PAYLOAD_SIZE,
            });
        }

        Ok(Self {
            kind,
            address,
            payload,
        })
    }

    /// Value of the length field: payload plus checksum
    pub fn length_field(&self) -> u16 {
        (self.payload.len() + frame::CHECKSUM_SIZE) as u16
    }

    pub fn checksum(&self) -> u16 {
        checksum::calculate(self.kind.into(), self.length_field(), &self.payload)
    }

    /// Total size on the wire
    pub fn size(&self) -> usize {
        frame::OVERHEAD + self.payload.len()
    }

    /// Encode packet to bytes
    pub fn encode(&self) -> BytesMut {
        let mut buf = BytesMut::with_capacity(self.size());

        buf.put_u16(START_CODE);
        buf.put_u32(self.address);
        buf.put_u8(self.kind.into());
        buf.put_u16(self.length_field());
        buf.put_slice(&self.payload);
        buf.put_u16(self.checksum());

        buf
    }

    /// Decode a complete frame
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The buffer is shorter than an empty frame
    /// - The marker is all zero (nothing real arrived) or not `0xEF01`
    /// - Checksum verification fails
    /// - The packet kind is unknown
    /// - The length field disagrees with the buffer size
    pub fn decode(buf: &[u8]) -> Result<Self> {
        if buf.len() < frame::OVERHEAD {
            return Err(Error::PacketTooShort {
                expected: frame::OVERHEAD,
                actual: buf.len(),
            });
        }

        if buf[0] == 0x00 {
            return Err(Error::EmptyFrame);
        }

        let marker = u16::from_be_bytes([buf[0], buf[1]]);
        if marker != START_CODE {
            return Err(Error::InvalidStartCode(marker));
        }

        checksum::verify_frame(buf)?;

        let kind = PacketKind::try_from(buf[frame::KIND_OFFSET])?;
        let address = u32::from_be_bytes([buf[2], buf[3], buf[4], buf[5]]);

        let declared = u16::from_be_bytes([
            buf[frame::LENGTH_OFFSET],
            buf[frame::LENGTH_OFFSET + 1],
        ]) as usize;
        let actual = buf.len() - frame::HEADER_SIZE;
        if declared != actual {
            return Err(Error::LengthMismatch { declared, actual });
        }

        let payload = Bytes::copy_from_slice(
            &buf[frame::PAYLOAD_OFFSET..buf.len() - frame::CHECKSUM_SIZE],
        );

        Ok(Self {
            kind,
            address,
            payload,
        })
    }
}

impl fmt::Debug for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Packet")
            .field("kind", &self.kind)
            .field("address", &format!("0x{:08X}", self.address))
            .field("checksum", &format!("0x{:04X}", self.checksum()))
            .field("payload_len", &self.payload.len())
            .finish()
    }
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Packet[{:?}](address=0x{:08X}, len={})",
            self.kind,
            self.address,
            self.payload.len()
        )
    }
}
