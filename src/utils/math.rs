//! Mathematical utility functions.

use crate::Result;

/// Converts a `usize` to `u32` for metadata serialization, returning an error if the value
/// exceeds `u32::MAX`. All ECMA-335 metadata structures are bounded well below this limit.
///
/// # Errors
///
/// Returns an error if `value` exceeds `u32::MAX`.
pub fn to_u32(value: usize) -> Result<u32> {
    u32::try_from(value)
        .map_err(|_| malformed_error!("Metadata value {value} exceeds u32::MAX"))
}

/// Number of bits needed to tell `count` alternatives apart.
///
/// This is the tag width of a coded index with `count` candidate tables
/// (`ceil(log2(count))`, with a single candidate still needing zero bits).
#[must_use]
pub fn tag_bits(count: usize) -> u8 {
    if count <= 1 {
        return 0;
    }

    #[allow(clippy::cast_possible_truncation)] // at most usize::BITS, fits in u8
    let bits = (usize::BITS - (count - 1).leading_zeros()) as u8;
    bits
}
