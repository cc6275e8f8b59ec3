use rustc_hash::FxHashMap;

use crate::{
    builder::heaps::Heap,
    utils::to_u32,
    Result,
};

/// The `#GUID` heap: 16-byte entries addressed by a 1-based index.
///
/// Index 0 means "no GUID" and has no storage.
#[derive(Debug, Clone, Default)]
pub struct GuidHeap {
    data: Vec<u8>,
    indices: FxHashMap<uguid::Guid, u32>,
}

impl GuidHeap {
    /// Creates an empty heap.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the 1-based index of `guid`, appending it if it is not present.
    ///
    /// # Errors
    /// Returns an error if the heap outgrew 32-bit indices.
    pub fn add(&mut self, guid: uguid::Guid) -> Result<u32> {
        if let Some(index) = self.indices.get(&guid) {
            return Ok(*index);
        }

        let index = to_u32(self.indices.len() + 1)?;
        self.data.extend_from_slice(&guid.to_bytes());
        self.indices.insert(guid, index);
        Ok(index)
    }

    /// Like [`GuidHeap::add`], mapping `None` to index 0.
    ///
    /// # Errors
    /// Returns an error if the heap outgrew 32-bit indices.
    pub fn add_optional(&mut self, guid: Option<uguid::Guid>) -> Result<u32> {
        match guid {
            Some(guid) => self.add(guid),
            None => Ok(0),
        }
    }

    /// Number of stored GUIDs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Returns true if no GUID was added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

impl Heap for GuidHeap {
    fn name(&self) -> &'static str {
        "#GUID"
    }

    fn data(&self) -> &[u8] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use uguid::guid;

    use super::*;

    #[test]
    fn test_one_based_indices() {
        let mut heap = GuidHeap::new();
        let a = guid!("d437908e-65e6-487c-9735-7bdff699bea5");
        let b = guid!("AAAAAAAA-AAAA-AAAA-AAAA-AAAAAAAAAAAA");

        assert_eq!(heap.add(a).unwrap(), 1);
        assert_eq!(heap.add(b).unwrap(), 2);
        assert_eq!(heap.add(a).unwrap(), 1);
        assert_eq!(heap.add_optional(None).unwrap(), 0);

        assert_eq!(heap.size(), 32);
        assert_eq!(&heap.data()[..16], &a.to_bytes());
    }
}
