//! Module parameters: packet size, baud rate, security level and registers

use std::fmt;

use crate::error::{Error, Result};

/// Bulk-transfer chunk size negotiated with the module
///
/// On the wire the size is encoded as a power: `bytes = 32 << code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PacketSize {
    Bytes32,
    Bytes64,
    #[default]
    Bytes128,
    Bytes256,
}

impl PacketSize {
    /// Chunk payload length in bytes
    pub const fn bytes(self) -> usize {
        match self {
            Self::Bytes32 => 32,
            Self::Bytes64 => 64,
            Self::Bytes128 => 128,
            Self::Bytes256 => 256,
        }
    }

    /// Register / system-parameter encoding (0..=3)
    pub const fn code(self) -> u8 {
        match self {
            Self::Bytes32 => 0,
            Self::Bytes64 => 1,
            Self::Bytes128 => 2,
            Self::Bytes256 => 3,
        }
    }

    /// Decode the power-of-two code reported by `ReadSysPara`
    pub fn from_code(code: u16) -> Result<Self> {
        match code {
            0 => Ok(Self::Bytes32),
            1 => Ok(Self::Bytes64),
            2 => Ok(Self::Bytes128),
            3 => Ok(Self::Bytes256),
            _ => Err(Error::Validation(format!("packet size code {} not in 0..=3", code))),
        }
    }

    /// Build from a byte count; only 32, 64, 128 and 256 are accepted
    ///
    /// # Examples
    ///
    /// ```
    /// use as608_types::PacketSize;
    ///
    /// assert_eq!(PacketSize::from_bytes(64).unwrap(), PacketSize::Bytes64);
    /// assert!(PacketSize::from_bytes(100).is_err());
    /// ```
    pub fn from_bytes(bytes: u16) -> Result<Self> {
        match bytes {
            32 => Ok(Self::Bytes32),
            64 => Ok(Self::Bytes64),
            128 => Ok(Self::Bytes128),
            256 => Ok(Self::Bytes256),
            _ => Err(Error::Validation(format!(
                "packet size {} not in 32, 64, 128 or 256",
                bytes
            ))),
        }
    }
}

impl TryFrom<u16> for PacketSize {
    type Error = Error;

    fn try_from(bytes: u16) -> Result<Self> {
        Self::from_bytes(bytes)
    }
}

impl fmt::Display for PacketSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} bytes", self.bytes())
    }
}

/// Serial baud rate, stored as a multiplier of 9600
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BaudRate(u8);

impl BaudRate {
    /// Baud unit used by the module
    pub const UNIT: u32 = 9600;

    /// Largest multiplier the module accepts (115200 baud)
    pub const MAX_MULTIPLIER: u8 = 12;

    pub fn from_multiplier(multiplier: u16) -> Result<Self> {
        if multiplier == 0 || multiplier > Self::MAX_MULTIPLIER as u16 {
            return Err(Error::Validation(format!(
                "baud multiplier {} not in 1..={}",
                multiplier,
                Self::MAX_MULTIPLIER
            )));
        }
        Ok(Self(multiplier as u8))
    }

    /// Build from bits per second; must be an exact multiple of 9600
    pub fn from_bps(bps: u32) -> Result<Self> {
        if bps % Self::UNIT != 0 {
            return Err(Error::Validation(format!(
                "baud rate {} is not a multiple of {}",
                bps,
                Self::UNIT
            )));
        }
        let multiplier = u16::try_from(bps / Self::UNIT)
            .map_err(|_| Error::Validation(format!("baud rate {} too high", bps)))?;
        Self::from_multiplier(multiplier)
    }

    pub const fn multiplier(self) -> u8 {
        self.0
    }

    pub const fn bps(self) -> u32 {
        self.0 as u32 * Self::UNIT
    }
}

impl Default for BaudRate {
    fn default() -> Self {
        // 57600 baud, factory setting
        Self(6)
    }
}

impl fmt::Display for BaudRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} baud", self.bps())
    }
}

/// Matching threshold level (1 = most permissive, 5 = strictest)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SecurityLevel(u8);

impl SecurityLevel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(level: u16) -> Result<Self> {
        if !(Self::MIN as u16..=Self::MAX as u16).contains(&level) {
            return Err(Error::Validation(format!(
                "security level {} not in {}..={}",
                level,
                Self::MIN,
                Self::MAX
            )));
        }
        Ok(Self(level as u8))
    }

    pub const fn value(self) -> u8 {
        self.0
    }
}

impl Default for SecurityLevel {
    fn default() -> Self {
        Self(3)
    }
}

impl fmt::Display for SecurityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Character (feature) buffer on the module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BufferId {
    One = 1,
    Two = 2,
}

impl From<BufferId> for u8 {
    fn from(id: BufferId) -> u8 {
        id as u8
    }
}

impl TryFrom<u8> for BufferId {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            _ => Err(Error::Validation(format!("buffer id {} not 1 or 2", value))),
        }
    }
}

impl fmt::Display for BufferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CharBuffer{}", *self as u8)
    }
}

/// Writable system registers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Register {
    BaudRate = 4,
    SecurityLevel = 5,
    PacketSize = 6,
}

impl From<Register> for u8 {
    fn from(reg: Register) -> u8 {
        reg as u8
    }
}

impl TryFrom<u8> for Register {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            4 => Ok(Self::BaudRate),
            5 => Ok(Self::SecurityLevel),
            6 => Ok(Self::PacketSize),
            _ => Err(Error::Validation(format!("register {} not in 4, 5 or 6", value))),
        }
    }
}

/// System parameters reported by `ReadSysPara`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemParameters {
    /// Status register
    pub status: u16,

    /// Sensor type (0-15)
    pub model: u16,

    /// Template library capacity
    pub capacity: u16,

    pub security_level: SecurityLevel,

    /// Device address
    pub address: u32,

    pub packet_size: PacketSize,

    pub baud_rate: BaudRate,
}

impl fmt::Display for SystemParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "address=0x{:08X} capacity={} level={} packet={} baud={}",
            self.address, self.capacity, self.security_level, self.packet_size, self.baud_rate
        )
    }
}
