//! Deduplicating metadata heaps.
//!
//! .NET modules contain four metadata heaps as defined in ECMA-335 §II.24.2:
//!
//! - **#Strings**: null-terminated UTF-8 identifiers, see [`StringHeap`]
//! - **#Blob**: length-prefixed binary data such as signatures, see [`BlobHeap`]
//! - **#US**: length-prefixed UTF-16 literals loaded by `ldstr`, see [`UserStringHeap`]
//! - **#GUID**: an array of 16-byte GUIDs, see [`GuidHeap`]
//!
//! Every heap is append-only and content addressed: adding content that is already present
//! returns the existing offset, so equal content always shares one entry. The empty value sits
//! at offset (or index) 0 and is never entered into the dedup map.

mod blob;
mod guid;
mod strings;
mod userstrings;

pub use blob::BlobHeap;
pub use guid::GuidHeap;
pub use strings::StringHeap;
pub use userstrings::UserStringHeap;

/// Read access to a finished heap stream.
pub trait Heap {
    /// Stream name, e.g. `#Blob`.
    fn name(&self) -> &'static str;

    /// The heap bytes as built.
    fn data(&self) -> &[u8];

    /// Size of the heap in bytes, which decides the width of indices into it.
    fn size(&self) -> usize {
        self.data().len()
    }

    /// The heap bytes zero-padded to a 4-byte boundary, as streams are laid out.
    fn padded_data(&self) -> Vec<u8> {
        let data = self.data();
        let mut padded = Vec::with_capacity(data.len() + 3);
        padded.extend_from_slice(data);
        while padded.len() % 4 != 0 {
            padded.push(0);
        }
        padded
    }
}

/// Offset the next entry of a heap of `len` bytes receives.
fn next_offset(heap: &'static str, len: usize) -> crate::Result<u32> {
    u32::try_from(len).map_err(|_| crate::Error::HeapOverflow { heap, size: len })
}
