//! Product identification read from the module's information page

use std::fmt;

use crate::error::{Error, Result};

/// Width of every identification field in the information page
pub const FIELD_LEN: usize = 8;

/// Identification strings stored in the FLASH information page
///
/// The page is 512 bytes long; the four 8-byte fields live at offsets
/// 28, 36, 44 and 52.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductInfo {
    /// Product serial number
    pub serial_number: [u8; FIELD_LEN],

    /// Firmware version
    pub firmware_version: [u8; FIELD_LEN],

    /// Manufacturer name
    pub manufacturer: [u8; FIELD_LEN],

    /// Sensor name
    pub sensor_name: [u8; FIELD_LEN],
}

impl ProductInfo {
    /// Offset of the serial number inside the information page
    pub const SERIAL_OFFSET: usize = 28;

    /// Minimum page length needed to extract every field
    pub const MIN_PAGE_LEN: usize = Self::SERIAL_OFFSET + 4 * FIELD_LEN;

    /// Extract the identification fields from a raw information page
    ///
    /// # Examples
    ///
    /// ```
    /// use as608_types::ProductInfo;
    ///
    /// let mut page = vec![0u8; 512];
    /// page[28..36].copy_from_slice(b"AS608-01");
    /// let info = ProductInfo::from_info_page(&page).unwrap();
    /// assert_eq!(info.serial_number(), "AS608-01");
    /// ```
    pub fn from_info_page(page: &[u8]) -> Result<Self> {
        if page.len() < Self::MIN_PAGE_LEN {
            return Err(Error::Parse(format!(
                "information page too short: {} bytes (need {})",
                page.len(),
                Self::MIN_PAGE_LEN
            )));
        }

        let field = |index: usize| {
            let start = Self::SERIAL_OFFSET + index * FIELD_LEN;
            let mut out = [0u8; FIELD_LEN];
            out.copy_from_slice(&page[start..start + FIELD_LEN]);
            out
        };

        Ok(Self {
            serial_number: field(0),
            firmware_version: field(1),
            manufacturer: field(2),
            sensor_name: field(3),
        })
    }

    pub fn serial_number(&self) -> String {
        text(&self.serial_number)
    }

    pub fn firmware_version(&self) -> String {
        text(&self.firmware_version)
    }

    pub fn manufacturer(&self) -> String {
        text(&self.manufacturer)
    }

    pub fn sensor_name(&self) -> String {
        text(&self.sensor_name)
    }
}

// Fields are NUL padded and not guaranteed to be UTF-8.
fn text(raw: &[u8]) -> String {
    let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
    String::from_utf8_lossy(&raw[..end]).trim_end().to_string()
}

impl fmt::Display for ProductInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Sensor[SN: {}, FW: {}, Vendor: {}, Name: {}]",
            self.serial_number(),
            self.firmware_version(),
            self.manufacturer(),
            self.sensor_name()
        )
    }
}
