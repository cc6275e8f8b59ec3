//! The finished output of a build.

use std::sync::Arc;

use crate::{
    builder::{
        heaps::{BlobHeap, GuidHeap, StringHeap, UserStringHeap},
        tables::TableSet,
    },
    metadata::tables::{TableId, TableInfo, TableInfoRef},
    Result,
};

/// Finalized tables and heaps of one module.
///
/// Every cross-reference in the tables is a final RID, coded index or heap offset. Index
/// widths are fixed by the [`TableInfo`] computed from the final row counts and heap sizes,
/// so [`MetadataImage::table_bytes`] yields exactly the rows a `#~` stream would contain.
#[derive(Debug, Clone)]
pub struct MetadataImage {
    tables: TableSet,
    strings: StringHeap,
    blobs: BlobHeap,
    user_strings: UserStringHeap,
    guids: GuidHeap,
    table_info: TableInfoRef,
}

impl MetadataImage {
    pub(crate) fn new(
        tables: TableSet,
        strings: StringHeap,
        blobs: BlobHeap,
        user_strings: UserStringHeap,
        guids: GuidHeap,
        table_info: TableInfo,
    ) -> Self {
        MetadataImage {
            tables,
            strings,
            blobs,
            user_strings,
            guids,
            table_info: Arc::new(table_info),
        }
    }

    /// The row stores.
    #[must_use]
    pub fn tables(&self) -> &TableSet {
        &self.tables
    }

    /// Number of rows in `table`.
    #[must_use]
    pub fn row_count(&self, table: TableId) -> u32 {
        self.tables.row_count(table)
    }

    /// Row counts and index widths of the image.
    #[must_use]
    pub fn table_info(&self) -> &TableInfoRef {
        &self.table_info
    }

    /// Serializes all rows of `table` with the image's index widths.
    ///
    /// # Errors
    /// Returns an error if a row references a table outside its coded index scheme.
    pub fn table_bytes(&self, table: TableId) -> Result<Vec<u8>> {
        self.tables.table_bytes(table, &self.table_info)
    }

    /// The `#Strings` heap.
    #[must_use]
    pub fn strings(&self) -> &StringHeap {
        &self.strings
    }

    /// The `#Blob` heap.
    #[must_use]
    pub fn blobs(&self) -> &BlobHeap {
        &self.blobs
    }

    /// The `#US` heap.
    #[must_use]
    pub fn user_strings(&self) -> &UserStringHeap {
        &self.user_strings
    }

    /// The `#GUID` heap.
    #[must_use]
    pub fn guids(&self) -> &GuidHeap {
        &self.guids
    }
}
