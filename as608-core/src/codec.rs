//! Big-endian integer <-> byte conversion
//!
//! Every multi-byte field on the wire is big-endian and between one and
//! four bytes wide.

use byteorder::{BigEndian, ByteOrder};

use crate::error::{Error, Result};

/// Widest integer field the protocol carries
pub const MAX_WIDTH: usize = 4;

/// Split `value` into exactly `width` big-endian bytes
///
/// Bits above `8 * width` are discarded. Callers must make sure the value
/// fits; an oversized value is truncated silently.
///
/// # Examples
///
/// ```
/// use as608_core::codec;
///
/// assert_eq!(codec::split(0x012C, 2).unwrap(), vec![0x01, 0x2C]);
/// assert_eq!(codec::split(0xA0B1C2D3, 2).unwrap(), vec![0xC2, 0xD3]);
/// ```
pub fn split(value: u32, width: usize) -> Result<Vec<u8>> {
    let mut out = vec![0u8; width];
    split_into(value, &mut out)?;
    Ok(out)
}

/// Split `value` into `out`, using `out.len()` as the width
pub fn split_into(value: u32, out: &mut [u8]) -> Result<()> {
    let width = out.len();
    check_width(width)?;

    let mask = (1u64 << (8 * width)) - 1;
    BigEndian::write_uint(out, u64::from(value) & mask, width);

    Ok(())
}

/// Merge up to four big-endian bytes into an unsigned integer
///
/// # Examples
///
/// ```
/// use as608_core::codec;
///
/// assert_eq!(codec::merge(&[0xA0, 0xB1, 0xC2, 0xD3]).unwrap(), 0xA0B1C2D3);
/// ```
pub fn merge(bytes: &[u8]) -> Result<u32> {
    check_width(bytes.len())?;
    Ok(BigEndian::read_uint(bytes, bytes.len()) as u32)
}

/// Merge a two-byte field
pub fn merge_u16(bytes: &[u8]) -> Result<u16> {
    if bytes.len() != 2 {
        return Err(Error::InvalidParamWidth { width: bytes.len() });
    }
    Ok(BigEndian::read_u16(bytes))
}

fn check_width(width: usize) -> Result<()> {
    if width == 0 || width > MAX_WIDTH {
        return Err(Error::InvalidParamWidth { width });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_split_widths() {
        assert_eq!(split(0x2C, 1).unwrap(), vec![0x2C]);
        assert_eq!(split(0x0001_0203, 3).unwrap(), vec![0x01, 0x02, 0x03]);
        assert_eq!(split(0xFFFF_FFFF, 4).unwrap(), vec![0xFF; 4]);
    }

    #[test]
    fn test_split_truncates_high_bits() {
        assert_eq!(split(0x1234, 1).unwrap(), vec![0x34]);
    }

    #[test]
    fn test_invalid_width() {
        assert!(matches!(split(1, 0), Err(Error::InvalidParamWidth { width: 0 })));
        assert!(matches!(split(1, 5), Err(Error::InvalidParamWidth { width: 5 })));
        assert!(merge(&[0; 5]).is_err());
        assert!(merge(&[]).is_err());
    }

    #[test]
    fn test_merge_u16() {
        assert_eq!(merge_u16(&[0x01, 0x2C]).unwrap(), 300);
        assert!(merge_u16(&[0x01]).is_err());
    }

    proptest! {
        #[test]
        fn prop_split_merge_roundtrip(value in any::<u32>(), width in 1usize..=4) {
            let fitted = if width == 4 { value } else { value % (1u32 << (8 * width)) };
            let bytes = split(fitted, width).unwrap();
            prop_assert_eq!(bytes.len(), width);
            prop_assert_eq!(merge(&bytes).unwrap(), fitted);
        }
    }
}
