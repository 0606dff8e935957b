//! AS608 instruction set

use std::fmt;

use crate::error::{Error, Result};

/// Instruction codes understood by the module
///
/// The discriminant is the opcode carried as the first payload byte of a
/// command packet.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Instruction {
    // Image capture and features
    GetImage = 0x01,
    GenChar = 0x02,
    Match = 0x03,
    Search = 0x04,
    RegModel = 0x05,

    // Template library
    StoreChar = 0x06,
    LoadChar = 0x07,
    UpChar = 0x08,
    DownChar = 0x09,
    UpImage = 0x0A,
    DownImage = 0x0B,
    DeleteChar = 0x0C,
    Empty = 0x0D,

    // System
    WriteReg = 0x0E,
    ReadSysPara = 0x0F,
    Enroll = 0x10,
    Identify = 0x11,
    SetPwd = 0x12,
    VfyPwd = 0x13,
    GetRandomCode = 0x14,
    SetChipAddr = 0x15,
    ReadInfPage = 0x16,

    // Notepad
    WriteNotepad = 0x18,
    ReadNotepad = 0x19,

    HighSpeedSearch = 0x1B,
    ValidTemplateNum = 0x1D,
    ReadIndexTable = 0x1F,
}

impl Instruction {
    /// Total size of the acknowledgement frame, checksum included
    ///
    /// Every reply carries the 9-byte header, the confirmation code and the
    /// checksum; instructions returning fields add their widths on top.
    pub fn reply_len(self) -> usize {
        match self {
            Self::Match | Self::Enroll | Self::ValidTemplateNum => 14,
            Self::Search
            | Self::HighSpeedSearch
            | Self::Identify
            | Self::GetRandomCode => 16,
            Self::ReadSysPara => 28,
            Self::ReadNotepad | Self::ReadIndexTable => 44,
            _ => 12,
        }
    }

    /// Whether the acknowledgement is followed by data packets from the module
    pub fn has_upload(self) -> bool {
        matches!(self, Self::UpChar | Self::UpImage | Self::ReadInfPage)
    }

    /// Whether the host sends data packets after the acknowledgement
    pub fn has_download(self) -> bool {
        matches!(self, Self::DownChar | Self::DownImage)
    }

    /// Get instruction name
    pub fn name(self) -> &'static str {
        match self {
            Self::GetImage => "PS_GetImage",
            Self::GenChar => "PS_GenChar",
            Self::Match => "PS_Match",
            Self::Search => "PS_Search",
            Self::RegModel => "PS_RegModel",
            Self::StoreChar => "PS_StoreChar",
            Self::LoadChar => "PS_LoadChar",
            Self::UpChar => "PS_UpChar",
            Self::DownChar => "PS_DownChar",
            Self::UpImage => "PS_UpImage",
            Self::DownImage => "PS_DownImage",
            Self::DeleteChar => "PS_DeleteChar",
            Self::Empty => "PS_Empty",
            Self::WriteReg => "PS_WriteReg",
            Self::ReadSysPara => "PS_ReadSysPara",
            Self::Enroll => "PS_Enroll",
            Self::Identify => "PS_Identify",
            Self::SetPwd => "PS_SetPwd",
            Self::VfyPwd => "PS_VfyPwd",
            Self::GetRandomCode => "PS_GetRandomCode",
            Self::SetChipAddr => "PS_SetChipAddr",
            Self::ReadInfPage => "PS_ReadINFpage",
            Self::WriteNotepad => "PS_WriteNotepad",
            Self::ReadNotepad => "PS_ReadNotepad",
            Self::HighSpeedSearch => "PS_HighSpeedSearch",
            Self::ValidTemplateNum => "PS_ValidTempleteNum",
            Self::ReadIndexTable => "PS_ReadIndexTable",
        }
    }
}

impl From<Instruction> for u8 {
    fn from(ins: Instruction) -> u8 {
        ins as u8
    }
}

impl TryFrom<u8> for Instruction {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0x01 => Ok(Self::GetImage),
            0x02 => Ok(Self::GenChar),
            0x03 => Ok(Self::Match),
            0x04 => Ok(Self::Search),
            0x05 => Ok(Self::RegModel),
            0x06 => Ok(Self::StoreChar),
            0x07 => Ok(Self::LoadChar),
            0x08 => Ok(Self::UpChar),
            0x09 => Ok(Self::DownChar),
            0x0A => Ok(Self::UpImage),
            0x0B => Ok(Self::DownImage),
            0x0C => Ok(Self::DeleteChar),
            0x0D => Ok(Self::Empty),
            0x0E => Ok(Self::WriteReg),
            0x0F => Ok(Self::ReadSysPara),
            0x10 => Ok(Self::Enroll),
            0x11 => Ok(Self::Identify),
            0x12 => Ok(Self::SetPwd),
            0x13 => Ok(Self::VfyPwd),
            0x14 => Ok(Self::GetRandomCode),
            0x15 => Ok(Self::SetChipAddr),
            0x16 => Ok(Self::ReadInfPage),
            0x18 => Ok(Self::WriteNotepad),
            0x19 => Ok(Self::ReadNotepad),
            0x1B => Ok(Self::HighSpeedSearch),
            0x1D => Ok(Self::ValidTemplateNum),
            0x1F => Ok(Self::ReadIndexTable),
            _ => Err(Error::UnknownInstruction(value)),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(0x{:02X})", self.name(), *self as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instruction_conversion() {
        assert_eq!(u8::from(Instruction::Search), 0x04);
        assert_eq!(Instruction::try_from(0x1F).unwrap(), Instruction::ReadIndexTable);
    }

    #[test]
    fn test_unknown_instruction() {
        assert!(matches!(
            Instruction::try_from(0x17),
            Err(Error::UnknownInstruction(0x17))
        ));
    }

    #[test]
    fn test_reply_lengths() {
        assert_eq!(Instruction::GetImage.reply_len(), 12);
        assert_eq!(Instruction::Match.reply_len(), 14);
        assert_eq!(Instruction::Search.reply_len(), 16);
        assert_eq!(Instruction::ReadSysPara.reply_len(), 28);
        assert_eq!(Instruction::ReadNotepad.reply_len(), 44);
    }

    #[test]
    fn test_transfer_direction() {
        assert!(Instruction::UpChar.has_upload());
        assert!(Instruction::DownImage.has_download());
        assert!(!Instruction::Match.has_upload());
        assert!(!Instruction::Match.has_download());
    }

    #[test]
    fn test_display() {
        assert_eq!(Instruction::Search.to_string(), "PS_Search(0x04)");
    }
}
