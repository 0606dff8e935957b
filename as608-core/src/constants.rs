//! Protocol constants

use std::time::Duration;

/// Frame start marker, transmitted high byte first
pub const START_CODE: u16 = 0xEF01;

/// Broadcast address used until the module fixes its own
pub const DEFAULT_ADDRESS: u32 = 0xFFFF_FFFF;

/// Frame layout
pub mod frame {
    /// Offset of the packet-kind byte
    pub const KIND_OFFSET: usize = 6;

    /// Offset of the two-byte length field
    pub const LENGTH_OFFSET: usize = 7;

    /// Offset of the first payload byte (opcode, confirmation code or data)
    pub const PAYLOAD_OFFSET: usize = 9;

    /// Marker + address + kind + length
    pub const HEADER_SIZE: usize = PAYLOAD_OFFSET;

    pub const CHECKSUM_SIZE: usize = 2;

    /// Bytes a frame adds around its payload
    pub const OVERHEAD: usize = HEADER_SIZE + CHECKSUM_SIZE;

    /// Largest payload the module accepts in one frame
    pub const MAX_PAYLOAD_SIZE: usize = 256;
}

/// Timing defaults
pub mod timing {
    use super::Duration;

    /// Absolute deadline for a complete reply frame
    pub const REPLY_TIMEOUT: Duration = Duration::from_secs(3);

    /// Bulk receive gives up after this long without new bytes
    pub const BULK_IDLE_TIMEOUT: Duration = Duration::from_secs(3);

    /// Sleep between availability checks
    pub const POLL_INTERVAL: Duration = Duration::from_micros(10);

    /// Maximum bytes pulled from the stream per bulk read
    pub const BULK_BURST: usize = 8;

    /// How long to wait for a finger before capturing
    pub const FINGER_TIMEOUT: Duration = Duration::from_secs(10);

    pub const FINGER_POLL_INTERVAL: Duration = Duration::from_micros(100);

    /// How long one lift-detection attempt lasts during enrollment
    pub const LIFT_TIMEOUT: Duration = Duration::from_secs(2);

    pub const LIFT_ATTEMPTS: usize = 3;

    pub const LIFT_POLL_INTERVAL: Duration = Duration::from_millis(1);

    pub const FLUSH_ATTEMPTS: usize = 3;

    pub const FLUSH_DELAY: Duration = Duration::from_secs(1);
}

/// Payload sizes of bulk transfers and fixed buffers
pub mod sizes {
    /// One character file / template
    pub const TEMPLATE: usize = 768;

    /// Raw image: 256 x 288 pixels, 4 bits each
    pub const IMAGE: usize = 36_864;

    /// FLASH information page
    pub const INFO_PAGE: usize = 512;

    /// One notepad page
    pub const NOTEPAD_PAGE: usize = 32;

    pub const NOTEPAD_PAGES: u8 = 16;

    /// Index table pages queried to cover the library
    pub const INDEX_PAGES: u8 = 2;

    /// Slots described by one index table page
    pub const INDEX_PAGE_SLOTS: usize = 256;

    /// Bitmap bytes in one index table reply
    pub const INDEX_BITMAP: usize = INDEX_PAGE_SLOTS / 8;
}
