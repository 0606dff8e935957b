//! Confirmation codes
//!
//! Every acknowledgement carries a one-byte confirmation code; `0x00` means
//! success. The driver reports its own host-side conditions in a separate
//! range (`0xC1..`) that the module never produces.

use std::fmt;

/// Confirmation code reported by the module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfirmCode {
    Ok,
    PacketError,
    NoFinger,
    CaptureFailed,
    TooDry,
    TooWet,
    TooMessy,
    TooFewFeatures,
    Mismatch,
    NotFound,
    MergeFailed,
    PageOutOfRange,
    TemplateReadError,
    UploadFeatureFailed,
    CannotReceiveData,
    UploadImageFailed,
    DeleteFailed,
    ClearFailed,
    LowPowerFailed,
    WrongPassword,
    ResetFailed,
    NoValidImage,
    UpgradeFailed,
    FingerNotMoved,
    FlashError,
    Undefined,
    InvalidRegister,
    RegisterConfigError,
    WrongNotepadPage,
    PortOperationFailed,
    AutoEnrollFailed,
    AddressOrPassword,
    DataAck,
    CommandAck,
    FlashChecksumError,
    FlashPacketFlagError,
    FlashPacketLengthError,
    FlashCodeTooLong,
    FlashBurnFailed,
    LibraryFull,
    /// Any code outside the documented table, passed through untouched
    Other(u8),
}

impl ConfirmCode {
    pub fn is_success(self) -> bool {
        self == Self::Ok
    }

    pub fn code(self) -> u8 {
        match self {
            Self::Ok => 0x00,
            Self::PacketError => 0x01,
            Self::NoFinger => 0x02,
            Self::CaptureFailed => 0x03,
            Self::TooDry => 0x04,
            Self::TooWet => 0x05,
            Self::TooMessy => 0x06,
            Self::TooFewFeatures => 0x07,
            Self::Mismatch => 0x08,
            Self::NotFound => 0x09,
            Self::MergeFailed => 0x0A,
            Self::PageOutOfRange => 0x0B,
            Self::TemplateReadError => 0x0C,
            Self::UploadFeatureFailed => 0x0D,
            Self::CannotReceiveData => 0x0E,
            Self::UploadImageFailed => 0x0F,
            Self::DeleteFailed => 0x10,
            Self::ClearFailed => 0x11,
            Self::LowPowerFailed => 0x12,
            Self::WrongPassword => 0x13,
            Self::ResetFailed => 0x14,
            Self::NoValidImage => 0x15,
            Self::UpgradeFailed => 0x16,
            Self::FingerNotMoved => 0x17,
            Self::FlashError => 0x18,
            Self::Undefined => 0x19,
            Self::InvalidRegister => 0x1A,
            Self::RegisterConfigError => 0x1B,
            Self::WrongNotepadPage => 0x1C,
            Self::PortOperationFailed => 0x1D,
            Self::AutoEnrollFailed => 0x1E,
            Self::AddressOrPassword => 0x20,
            Self::DataAck => 0xF0,
            Self::CommandAck => 0xF1,
            Self::FlashChecksumError => 0xF2,
            Self::FlashPacketFlagError => 0xF3,
            Self::FlashPacketLengthError => 0xF4,
            Self::FlashCodeTooLong => 0xF5,
            Self::FlashBurnFailed => 0xF6,
            Self::LibraryFull => 0xFF,
            Self::Other(code) => code,
        }
    }

    /// Human-readable meaning of the code
    pub fn description(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::PacketError => "Error receiving packet",
            Self::NoFinger => "No finger on the sensor",
            Self::CaptureFailed => "Failed to input fingerprint image",
            Self::TooDry => "Fingerprint image too dry and faint to produce features",
            Self::TooWet => "Fingerprint image too wet and mushy to produce features",
            Self::TooMessy => "Fingerprint image too messy to produce features",
            Self::TooFewFeatures => {
                "Fingerprint image is normal but has too few feature points (or too small an area)"
            }
            Self::Mismatch => "Fingerprint mismatch",
            Self::NotFound => "Not found in fingerprint library",
            Self::MergeFailed => "Feature merge failed",
            Self::PageOutOfRange => "Page number is out of the range of the fingerprint library",
            Self::TemplateReadError => "Error reading template from library or template invalid",
            Self::UploadFeatureFailed => "Upload feature failed",
            Self::CannotReceiveData => "The module cannot accept subsequent packets",
            Self::UploadImageFailed => "Failed to upload image",
            Self::DeleteFailed => "Failed to delete template",
            Self::ClearFailed => "Failed to clear the fingerprint library",
            Self::LowPowerFailed => "Cannot enter low power consumption state",
            Self::WrongPassword => "Incorrect password",
            Self::ResetFailed => "System reset failure",
            Self::NoValidImage => "No valid original image in the buffer to generate an image",
            Self::UpgradeFailed => "Online upgrade failed",
            Self::FingerNotMoved => "Finger did not move between the two captures",
            Self::FlashError => "FLASH read or write error",
            Self::Undefined => "Undefined error",
            Self::InvalidRegister => "Invalid register number",
            Self::RegisterConfigError => "Register setting error",
            Self::WrongNotepadPage => "Notepad page number specified incorrectly",
            Self::PortOperationFailed => "Port operation failed",
            Self::AutoEnrollFailed => "Automatic enrollment failed",
            Self::AddressOrPassword => "Wrong address or wrong password",
            Self::DataAck => "Subsequent data packets follow; acknowledged with 0xF0",
            Self::CommandAck => "Subsequent data packets follow; command acknowledged with 0xF1",
            Self::FlashChecksumError => "Checksum error while burning internal FLASH",
            Self::FlashPacketFlagError => "Packet identifier error while burning internal FLASH",
            Self::FlashPacketLengthError => "Packet length error while burning internal FLASH",
            Self::FlashCodeTooLong => "Code too long to burn internal FLASH",
            Self::FlashBurnFailed => "Burning internal FLASH failed",
            Self::LibraryFull => "Fingerprint library is full",
            Self::Other(_) => "Undefined error",
        }
    }
}

impl From<u8> for ConfirmCode {
    fn from(code: u8) -> Self {
        match code {
            0x00 => Self::Ok,
            0x01 => Self::PacketError,
            0x02 => Self::NoFinger,
            0x03 => Self::CaptureFailed,
            0x04 => Self::TooDry,
            0x05 => Self::TooWet,
            0x06 => Self::TooMessy,
            0x07 => Self::TooFewFeatures,
            0x08 => Self::Mismatch,
            0x09 => Self::NotFound,
            0x0A => Self::MergeFailed,
            0x0B => Self::PageOutOfRange,
            0x0C => Self::TemplateReadError,
            0x0D => Self::UploadFeatureFailed,
            0x0E => Self::CannotReceiveData,
            0x0F => Self::UploadImageFailed,
            0x10 => Self::DeleteFailed,
            0x11 => Self::ClearFailed,
            0x12 => Self::LowPowerFailed,
            0x13 => Self::WrongPassword,
            0x14 => Self::ResetFailed,
            0x15 => Self::NoValidImage,
            0x16 => Self::UpgradeFailed,
            0x17 => Self::FingerNotMoved,
            0x18 => Self::FlashError,
            0x19 => Self::Undefined,
            0x1A => Self::InvalidRegister,
            0x1B => Self::RegisterConfigError,
            0x1C => Self::WrongNotepadPage,
            0x1D => Self::PortOperationFailed,
            0x1E => Self::AutoEnrollFailed,
            0x20 => Self::AddressOrPassword,
            0xF0 => Self::DataAck,
            0xF1 => Self::CommandAck,
            0xF2 => Self::FlashChecksumError,
            0xF3 => Self::FlashPacketFlagError,
            0xF4 => Self::FlashPacketLengthError,
            0xF5 => Self::FlashCodeTooLong,
            0xF6 => Self::FlashBurnFailed,
            0xFF => Self::LibraryFull,
            other => Self::Other(other),
        }
    }
}

impl From<ConfirmCode> for u8 {
    fn from(code: ConfirmCode) -> u8 {
        code.code()
    }
}

impl fmt::Display for ConfirmCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02X}: {}", self.code(), self.description())
    }
}

/// Host-side condition codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum LocalCode {
    BufferTooSmall = 0xC1,
    File = 0xC2,
    Timeout = 0xC3,
    EndPacketMissing = 0xC4,
    InvalidPacketSize = 0xC5,
    BufferTooLarge = 0xC6,
    SetupFailed = 0xC7,
    SizeMismatch = 0xC8,
    TemplateFileSize = 0xC9,
    ChecksumMismatch = 0xCB,
    Contract = 0xCC,
    Transport = 0xCD,
    FingerNotLifted = 0xCE,
}

impl LocalCode {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::BufferTooSmall => "Output buffer is too small to store all the data",
            Self::File => "Local file operation failed",
            Self::Timeout => "Timed out waiting for data (packet loss)",
            Self::EndPacketMissing => "No end packet received, flush the module buffer",
            Self::InvalidPacketSize => "Packet size not in 32, 64, 128 or 256",
            Self::BufferTooLarge => "Input buffer is too large",
            Self::SetupFailed => "Setup failed, retry later",
            Self::SizeMismatch => "Data size must be a multiple of the negotiated packet size",
            Self::TemplateFileSize => "Template file must be exactly 768 bytes",
            Self::ChecksumMismatch => "Checksum mismatch in received packet",
            Self::Contract => "Invalid request rejected before sending",
            Self::Transport => "Serial transport failure",
            Self::FingerNotLifted => "Finger was not lifted between captures",
        }
    }
}

impl fmt::Display for LocalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02X}: {}", self.code(), self.description())
    }
}
