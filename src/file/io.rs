//! Little-endian primitives for serializing metadata rows.
//!
//! Metadata table rows are stored as packed little-endian fields whose width depends on
//! the table sizes of the image being produced. This module provides the bounds-checked
//! helpers used by every [`crate::metadata::tables::RowWritable`] implementation, plus the
//! matching read helpers that tests use to inspect serialized rows.
//!
//! # Key Components
//!
//! - [`CilIO`] - conversion trait implemented for the fixed-width integer types
//! - [`write_le_at`] / [`read_le_at`] - fixed-width access with offset advancement
//! - [`write_le_at_dyn`] / [`read_le_at_dyn`] - 2-or-4 byte index fields

use crate::{Error::OutOfBounds, Result};

/// Conversion between an integer type and its little-endian byte representation.
///
/// Implemented for every integer width that appears in an ECMA-335 table row.
pub trait CilIO: Sized {
    /// Fixed-size byte array backing this type.
    type Bytes: Sized + AsRef<[u8]> + for<'a> TryFrom<&'a [u8]>;

    /// Read T from a byte buffer in little-endian
    fn from_le_bytes(bytes: Self::Bytes) -> Self;

    /// Write T to a byte buffer in little-endian
    fn to_le_bytes(self) -> Self::Bytes;
}

macro_rules! impl_cil_io {
    ($($ty:ty => $len:expr),* $(,)?) => {
        $(
            impl CilIO for $ty {
                type Bytes = [u8; $len];

                fn from_le_bytes(bytes: Self::Bytes) -> Self {
                    <$ty>::from_le_bytes(bytes)
                }

                fn to_le_bytes(self) -> Self::Bytes {
                    <$ty>::to_le_bytes(self)
                }
            }
        )*
    };
}

impl_cil_io! {
    u8 => 1,
    u16 => 2,
    u32 => 4,
    u64 => 8,
    i32 => 4,
}

/// Reads a value of type `T` at `offset` and advances the offset past it.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if the buffer is too short.
pub fn read_le_at<T: CilIO>(data: &[u8], offset: &mut usize) -> Result<T> {
    let type_len = std::mem::size_of::<T>();
    let end = offset.checked_add(type_len).ok_or(OutOfBounds)?;
    if end > data.len() {
        return Err(OutOfBounds);
    }

    let Ok(bytes) = T::Bytes::try_from(&data[*offset..end]) else {
        return Err(OutOfBounds);
    };

    *offset = end;
    Ok(T::from_le_bytes(bytes))
}

/// Reads either a 2-byte or a 4-byte index field.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if the buffer is too short.
pub fn read_le_at_dyn(data: &[u8], offset: &mut usize, is_large: bool) -> Result<u32> {
    let res = if is_large {
        read_le_at::<u32>(data, offset)?
    } else {
        u32::from(read_le_at::<u16>(data, offset)?)
    };

    Ok(res)
}

/// Writes `value` at `offset` in little-endian order and advances the offset.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if the value does not fit into the buffer.
pub fn write_le_at<T: CilIO>(data: &mut [u8], offset: &mut usize, value: T) -> Result<()> {
    let bytes = value.to_le_bytes();
    let bytes = bytes.as_ref();
    let end = offset.checked_add(bytes.len()).ok_or(OutOfBounds)?;
    if end > data.len() {
        return Err(OutOfBounds);
    }

    data[*offset..end].copy_from_slice(bytes);
    *offset = end;

    Ok(())
}

/// Writes a heap or table index as either 2 or 4 bytes.
///
/// A small index that does not fit into 16 bits is a layout error: the caller computed
/// the index widths from stale table sizes.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if the buffer is too short, or
/// [`crate::Error::Malformed`] if `value` does not fit a 2-byte field.
pub fn write_le_at_dyn(
    data: &mut [u8],
    offset: &mut usize,
    value: u32,
    is_large: bool,
) -> Result<()> {
    if is_large {
        write_le_at::<u32>(data, offset, value)?;
    } else {
        let Ok(small) = u16::try_from(value) else {
            return Err(malformed_error!(
                "Index value 0x{:X} does not fit into a 2-byte column",
                value
            ));
        };
        write_le_at::<u16>(data, offset, small)?;
    }

    Ok(())
}
