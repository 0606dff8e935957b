//! Additive frame checksum
//!
//! The checksum is the 16-bit wrapping sum of every byte from the packet
//! kind through the last payload byte:
//!
//! ```text
//! sum(kind, length_hi, length_lo, payload...) mod 65536
//! ```
//!
//! The marker and address are not covered.

use tracing::trace;

use crate::{
    constants::frame,
    error::{Error, Result},
};

/// Sum a byte slice into the low 16 bits
pub fn sum(bytes: &[u8]) -> u16 {
    bytes
        .iter()
        .fold(0u16, |acc, &b| acc.wrapping_add(u16::from(b)))
}

/// Calculate the checksum from the covered fields
///
/// # Examples
///
/// ```
/// use as608_core::checksum;
///
/// // GetImage command: kind=0x01, length=0x0003, opcode=0x01
/// assert_eq!(checksum::calculate(0x01, 0x0003, &[0x01]), 0x0005);
/// ```
pub fn calculate(kind: u8, length: u16, payload: &[u8]) -> u16 {
    let [hi, lo] = length.to_be_bytes();
    let checksum = sum(&[kind, hi, lo]).wrapping_add(sum(payload));

    trace!(
        kind = kind,
        length = length,
        payload_len = payload.len(),
        checksum = format!("0x{:04X}", checksum),
        "Calculated checksum"
    );

    checksum
}

/// Calculate the checksum of a complete frame (trailing checksum slot included)
pub fn of_frame(frame: &[u8]) -> Result<u16> {
    if frame.len() < frame::OVERHEAD {
        return Err(Error::PacketTooShort {
            expected: frame::OVERHEAD,
            actual: frame.len(),
        });
    }

    Ok(sum(&frame[frame::KIND_OFFSET..frame.len() - frame::CHECKSUM_SIZE]))
}

/// Checksum carried in the last two bytes of a frame
pub fn received(frame: &[u8]) -> Result<u16> {
    if frame.len() < frame::OVERHEAD {
        return Err(Error::PacketTooShort {
            expected: frame::OVERHEAD,
            actual: frame.len(),
        });
    }

    let tail = &frame[frame.len() - frame::CHECKSUM_SIZE..];
    Ok(u16::from_be_bytes([tail[0], tail[1]]))
}

/// Verify a complete frame's trailing checksum
pub fn verify_frame(frame: &[u8]) -> Result<()> {
    let expected = of_frame(frame)?;
    let received = received(frame)?;

    if expected != received {
        return Err(Error::ChecksumMismatch { expected, received });
    }

    Ok(())
}
