//! High-level error types
//!
//! Every operation ends in exactly one condition. Device failures carry the
//! module's confirmation code untouched; host-side failures map onto the
//! local code range so callers can report both the same way.

use std::io;
use std::path::PathBuf;

use as608_core::{ConfirmCode, LocalCode};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Module answered with a non-success confirmation code
    #[error("Device error {0}")]
    Device(ConfirmCode),

    /// Not enough bytes arrived before the deadline
    #[error("Timed out: received {received} of {expected} bytes")]
    Timeout {
        expected: usize,
        received: usize,
    },

    #[error("Checksum mismatch: expected 0x{expected:04X}, received 0x{received:04X}")]
    ChecksumMismatch {
        expected: u16,
        received: u16,
    },

    /// Bulk receive consumed the expected bytes without a final packet
    #[error("No end packet received, flush the module buffer")]
    EndPacketMissing,

    #[error("Data size {size} is not a multiple of the {chunk}-byte packet size")]
    SizeMismatch {
        size: usize,
        chunk: usize,
    },

    #[error("Output buffer too small: need {needed}, capacity {capacity}")]
    BufferTooSmall {
        needed: usize,
        capacity: usize,
    },

    #[error("Input buffer too large: {size} bytes (max: {max})")]
    BufferTooLarge {
        size: usize,
        max: usize,
    },

    #[error("Invalid packet size: {0} (must be 32, 64, 128 or 256)")]
    InvalidPacketSize(u16),

    #[error("Invalid register: {0} (must be 4, 5 or 6)")]
    InvalidRegister(u8),

    #[error("Setup failed: {0}")]
    SetupFailed(String),

    /// No finger showed up on the detector in time
    #[error("No finger on the sensor")]
    NoFinger,

    #[error("Finger was not lifted between captures")]
    FingerNotLifted,

    #[error("Template file has {actual} bytes, expected 768")]
    TemplateFileSize {
        actual: usize,
    },

    #[error("File error on {}: {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Core protocol error: {0}")]
    Core(#[source] as608_core::Error),

    #[error("Transport error: {0}")]
    Transport(#[from] as608_transport::Error),

    #[error("Type error: {0}")]
    Types(#[from] as608_types::Error),
}

impl Error {
    /// Numeric condition: the device's own code or a local one
    pub fn code(&self) -> u8 {
        match self {
            Self::Device(code) => code.code(),
            Self::InvalidRegister(_) => ConfirmCode::InvalidRegister.code(),
            Self::NoFinger => ConfirmCode::NoFinger.code(),
            _ => self.local_code().map_or(0xFF, LocalCode::code),
        }
    }

    /// Human-readable meaning of [`Error::code`]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Device(code) => code.description(),
            Self::InvalidRegister(_) => ConfirmCode::InvalidRegister.description(),
            Self::NoFinger => ConfirmCode::NoFinger.description(),
            _ => self
                .local_code()
                .map_or("Undefined error", LocalCode::description),
        }
    }

    /// Host-side code, `None` for conditions reported with a device code
    pub fn local_code(&self) -> Option<LocalCode> {
        let code = match self {
            Self::Device(_) | Self::InvalidRegister(_) | Self::NoFinger => return None,
            Self::Timeout { .. } => LocalCode::Timeout,
            Self::ChecksumMismatch { .. } => LocalCode::ChecksumMismatch,
            Self::EndPacketMissing => LocalCode::EndPacketMissing,
            Self::SizeMismatch { .. } => LocalCode::SizeMismatch,
            Self::BufferTooSmall { .. } => LocalCode::BufferTooSmall,
            Self::BufferTooLarge { .. } => LocalCode::BufferTooLarge,
            Self::InvalidPacketSize(_) => LocalCode::InvalidPacketSize,
            Self::SetupFailed(_) => LocalCode::SetupFailed,
            Self::FingerNotLifted => LocalCode::FingerNotLifted,
            Self::TemplateFileSize { .. } => LocalCode::TemplateFileSize,
            Self::File { .. } => LocalCode::File,
            Self::Core(e) if e.is_framing() => LocalCode::ChecksumMismatch,
            Self::Core(_) | Self::Types(_) => LocalCode::Contract,
            Self::Transport(_) => LocalCode::Transport,
        };
        Some(code)
    }

    /// Check if retrying the same operation may succeed
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. }
                | Self::ChecksumMismatch { .. }
                | Self::EndPacketMissing
                | Self::NoFinger
                | Self::Transport(as608_transport::Error::Io(_))
        ) || matches!(self, Self::Core(e) if e.is_framing())
    }

    /// Check if the module may still hold unsent bytes and needs a flush
    pub fn requires_flush(&self) -> bool {
        match self {
            Self::EndPacketMissing | Self::ChecksumMismatch { .. } => true,
            Self::Timeout { received, .. } => *received > 0,
            _ => false,
        }
    }

    pub(crate) fn file(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::File {
            path: path.into(),
            source,
        }
    }
}

impl From<ConfirmCode> for Error {
    fn from(code: ConfirmCode) -> Self {
        Self::Device(code)
    }
}

impl From<as608_core::Error> for Error {
    fn from(e: as608_core::Error) -> Self {
        match e {
            as608_core::Error::ChecksumMismatch { expected, received } => {
                Self::ChecksumMismatch { expected, received }
            }
            other => Self::Core(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_device_code_passthrough() {
        let e = Error::Device(ConfirmCode::from(0x09));
        assert_eq!(e.code(), 0x09);
        assert_eq!(e.description(), "Not found in fingerprint library");
        assert!(e.local_code().is_none());
    }

    #[test]
    fn test_local_codes() {
        assert_eq!(Error::Timeout { expected: 12, received: 0 }.code(), 0xC3);
        assert_eq!(Error::EndPacketMissing.code(), 0xC4);
        assert_eq!(Error::InvalidPacketSize(100).code(), 0xC5);
        assert_eq!(Error::SetupFailed("x".into()).code(), 0xC7);
        assert_eq!(Error::SizeMismatch { size: 100, chunk: 128 }.code(), 0xC8);
        assert_eq!(Error::BufferTooSmall { needed: 3, capacity: 2 }.code(), 0xC1);
        assert_eq!(Error::InvalidRegister(7).code(), 0x1A);
    }

    #[test]
    fn test_core_checksum_is_lifted() {
        let e: Error = as608_core::Error::ChecksumMismatch {
            expected: 1,
            received: 2,
        }
        .into();
        assert!(matches!(e, Error::ChecksumMismatch { expected: 1, received: 2 }));
        assert!(e.requires_flush());
    }

    #[test]
    fn test_contract_errors() {
        let e: Error = as608_core::Error::InvalidParamWidth { width: 5 }.into();
        assert_eq!(e.local_code(), Some(LocalCode::Contract));
        assert!(!e.is_recoverable());
    }

    #[test]
    fn test_flush_after_partial_timeout_only() {
        assert!(!Error::Timeout { expected: 12, received: 0 }.requires_flush());
        assert!(Error::Timeout { expected: 12, received: 5 }.requires_flush());
    }
}
