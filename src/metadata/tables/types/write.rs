//! Binary serialization of table rows.

use crate::{metadata::tables::types::TableInfoRef, Result};

/// Serialization of one row of a metadata table.
///
/// Implementors write their columns in ECMA-335 II.22 order. Index columns are 2 or 4
/// bytes wide depending on `sizes`, so the same row serializes differently for small and
/// large images.
pub trait RowWritable: Sized + Send {
    /// Size of one serialized row in bytes for the given index widths.
    fn row_size(sizes: &TableInfoRef) -> u32;

    /// Writes this row at `offset` and advances the offset by [`RowWritable::row_size`].
    ///
    /// # Arguments
    /// * `data` - output buffer
    /// * `offset` - write position, advanced past the row
    /// * `rid` - row id the row is written as
    /// * `sizes` - index widths of the image
    ///
    /// # Errors
    /// Returns an error if the buffer is too small or a reference cannot be encoded.
    fn row_write(
        &self,
        data: &mut [u8],
        offset: &mut usize,
        rid: u32,
        sizes: &TableInfoRef,
    ) -> Result<()>;
}
