//! ECMA-335 compressed integer encoding (II.23.2).
//!
//! Blob lengths, user string lengths and most signature components are stored as
//! compressed unsigned integers of 1, 2 or 4 bytes:
//!
//! | Range | Encoding |
//! |-------|----------|
//! | `0x00..=0x7F` | `0xxxxxxx` |
//! | `0x80..=0x3FFF` | `10xxxxxx xxxxxxxx` |
//! | `0x4000..=0x1FFF_FFFF` | `110xxxxx xxxxxxxx xxxxxxxx xxxxxxxx` |
//!
//! Signed values (array lower bounds) rotate the sign into bit 0 within the chosen width.

use crate::{Error, Result};

/// Largest value a compressed unsigned integer can carry.
pub const MAX_COMPRESSED_UINT: u32 = 0x1FFF_FFFF;

/// Appends `value` as a compressed unsigned integer.
///
/// # Errors
/// Returns [`crate::Error::Malformed`] if `value` exceeds [`MAX_COMPRESSED_UINT`].
pub fn write_compressed_uint(value: u32, buffer: &mut Vec<u8>) -> Result<()> {
    #[allow(clippy::cast_possible_truncation)]
    if value < 0x80 {
        buffer.push(value as u8);
    } else if value < 0x4000 {
        buffer.push(((value >> 8) | 0x80) as u8);
        buffer.push(value as u8);
    } else if value <= MAX_COMPRESSED_UINT {
        buffer.extend_from_slice(&(value | 0xC000_0000).to_be_bytes());
    } else {
        return Err(malformed_error!(
            "Value 0x{:X} is too large for a compressed integer",
            value
        ));
    }

    Ok(())
}

/// Appends `value` as a compressed signed integer.
///
/// The width is chosen from the signed range of `value`; the two's complement bits of that
/// width are rotated left by one so the sign lands in bit 0.
///
/// # Errors
/// Returns [`crate::Error::Malformed`] if `value` is outside `-2^28..2^28`.
#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
pub fn write_compressed_int(value: i32, buffer: &mut Vec<u8>) -> Result<()> {
    let (bits, width) = if (-0x40..0x40).contains(&value) {
        (6, 1)
    } else if (-0x2000..0x2000).contains(&value) {
        (13, 2)
    } else if (-0x1000_0000..0x1000_0000).contains(&value) {
        (28, 4)
    } else {
        return Err(malformed_error!(
            "Value {} is out of range for a compressed signed integer",
            value
        ));
    };

    let mask = (1u32 << bits) - 1;
    let rotated = ((value as u32 & mask) << 1) | u32::from(value < 0);

    match width {
        1 => buffer.push(rotated as u8),
        2 => {
            buffer.push(((rotated >> 8) | 0x80) as u8);
            buffer.push(rotated as u8);
        }
        _ => buffer.extend_from_slice(&(rotated | 0xC000_0000).to_be_bytes()),
    }

    Ok(())
}

/// Reads a compressed unsigned integer at `offset` and advances the offset.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] on truncated input or
/// [`crate::Error::Malformed`] on an invalid lead byte.
pub fn read_compressed_uint(data: &[u8], offset: &mut usize) -> Result<u32> {
    let first = u32::from(*data.get(*offset).ok_or(Error::OutOfBounds)?);

    let (value, len) = if first & 0x80 == 0 {
        (first, 1)
    } else if first & 0xC0 == 0x80 {
        let second = u32::from(*data.get(*offset + 1).ok_or(Error::OutOfBounds)?);
        (((first & 0x3F) << 8) | second, 2)
    } else if first & 0xE0 == 0xC0 {
        let bytes = data.get(*offset..*offset + 4).ok_or(Error::OutOfBounds)?;
        let value = ((first & 0x1F) << 24)
            | (u32::from(bytes[1]) << 16)
            | (u32::from(bytes[2]) << 8)
            | u32::from(bytes[3]);
        (value, 4)
    } else {
        return Err(malformed_error!("Invalid compressed uint - {}", first));
    };

    *offset += len;
    Ok(value)
}
