//! Error types for as608-core

/// Result type alias for as608-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core protocol errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Frame is too short to be valid
    #[error("Packet too short: expected at least {expected} bytes, got {actual} bytes")]
    PacketTooShort {
        expected: usize,
        actual: usize,
    },

    /// Checksum verification failed
    #[error("Checksum mismatch: expected 0x{expected:04X}, received 0x{received:04X}")]
    ChecksumMismatch {
        expected: u16,
        received: u16,
    },

    /// Marker byte is zero: no real data arrived
    #[error("Empty frame: start marker is zero")]
    EmptyFrame,

    #[error("Invalid start code: 0x{0:04X}")]
    InvalidStartCode(u16),

    #[error("Unknown packet kind: 0x{0:02X}")]
    UnknownPacketKind(u8),

    #[error("Unknown instruction code: 0x{0:02X}")]
    UnknownInstruction(u8),

    /// Integer field width outside 1..=4
    #[error("Invalid parameter width: {width} bytes (must be 1 to 4)")]
    InvalidParamWidth {
        width: usize,
    },

    #[error("Payload too large: {size} bytes (max: {max} bytes)")]
    PayloadTooLarge {
        size: usize,
        max: usize,
    },

    /// Length field disagrees with the bytes received
    #[error("Length field mismatch: declared {declared}, actual {actual}")]
    LengthMismatch {
        declared: usize,
        actual: usize,
    },

    #[error("Type error: {0}")]
    Types(#[from] as608_types::Error),
}

impl Error {
    /// Check if the error came from corrupted or missing bytes on the link
    pub fn is_framing(&self) -> bool {
        matches!(
            self,
            Self::PacketTooShort { .. }
                | Self::ChecksumMismatch { .. }
                | Self::EmptyFrame
                | Self::InvalidStartCode(_)
                | Self::UnknownPacketKind(_)
                | Self::LengthMismatch { .. }
        )
    }
}
