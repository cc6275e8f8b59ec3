use rustc_hash::FxHashMap;

use crate::{
    builder::heaps::{next_offset, Heap},
    utils::{write_compressed_uint, MAX_COMPRESSED_UINT},
    Error, Result,
};

/// The `#Blob` heap: byte sequences prefixed with their compressed length.
#[derive(Debug, Clone)]
pub struct BlobHeap {
    data: Vec<u8>,
    offsets: FxHashMap<Vec<u8>, u32>,
}

impl Default for BlobHeap {
    fn default() -> Self {
        Self::new()
    }
}

impl BlobHeap {
    /// Creates a heap holding only the empty blob at offset 0.
    #[must_use]
    pub fn new() -> Self {
        BlobHeap {
            data: vec![0],
            offsets: FxHashMap::default(),
        }
    }

    /// Returns the offset of `blob`, appending it if the exact byte sequence is not present.
    ///
    /// # Errors
    /// Returns [`crate::Error::HeapOverflow`] if the blob is too long for a compressed length
    /// or the heap outgrew 32-bit offsets.
    pub fn add(&mut self, blob: &[u8]) -> Result<u32> {
        if blob.is_empty() {
            return Ok(0);
        }
        if let Some(offset) = self.offsets.get(blob) {
            return Ok(*offset);
        }

        let overflow = |size| Error::HeapOverflow {
            heap: "#Blob",
            size,
        };
        let length = u32::try_from(blob.len())
            .ok()
            .filter(|len| *len <= MAX_COMPRESSED_UINT)
            .ok_or_else(|| overflow(blob.len()))?;

        let offset = next_offset(self.name(), self.data.len())?;
        let start = self.data.len();
        write_compressed_uint(length, &mut self.data)?;
        self.data.extend_from_slice(blob);
        if u32::try_from(self.data.len()).is_err() {
            let size = self.data.len();
            self.data.truncate(start);
            return Err(overflow(size));
        }

        self.offsets.insert(blob.to_vec(), offset);
        Ok(offset)
    }

    /// Returns the offset of `blob` if it was added.
    #[must_use]
    pub fn get(&self, blob: &[u8]) -> Option<u32> {
        if blob.is_empty() {
            return Some(0);
        }
        self.offsets.get(blob).copied()
    }

    /// Number of distinct non-empty blobs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// Returns true if only the empty blob is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}

impl Heap for BlobHeap {
    fn name(&self) -> &'static str {
        "#Blob"
    }

    fn data(&self) -> &[u8] {
        &self.data
    }
}
