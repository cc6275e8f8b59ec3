use rustc_hash::FxHashMap;

use crate::{
    builder::heaps::{next_offset, Heap},
    Error, Result,
};

/// The `#Strings` heap: null-terminated UTF-8 identifiers.
#[derive(Debug, Clone)]
pub struct StringHeap {
    data: Vec<u8>,
    offsets: FxHashMap<String, u32>,
}

impl Default for StringHeap {
    fn default() -> Self {
        Self::new()
    }
}

impl StringHeap {
    /// Creates a heap holding only the empty string at offset 0.
    #[must_use]
    pub fn new() -> Self {
        StringHeap {
            data: vec![0],
            offsets: FxHashMap::default(),
        }
    }

    /// Returns the offset of `value`, appending it if it is not present yet.
    ///
    /// # Errors
    /// Returns an error if `value` contains a NUL byte or the heap outgrew 32-bit offsets.
    pub fn add(&mut self, value: &str) -> Result<u32> {
        if value.is_empty() {
            return Ok(0);
        }
        if let Some(offset) = self.offsets.get(value) {
            return Ok(*offset);
        }
        if value.as_bytes().contains(&0) {
            return Err(malformed_error!(
                "Identifier {:?} contains an embedded NUL",
                value
            ));
        }

        let offset = next_offset(self.name(), self.data.len())?;
        let end = self.data.len() + value.len() + 1;
        if u32::try_from(end).is_err() {
            return Err(Error::HeapOverflow {
                heap: self.name(),
                size: end,
            });
        }

        self.data.extend_from_slice(value.as_bytes());
        self.data.push(0);
        self.offsets.insert(value.to_string(), offset);
        Ok(offset)
    }

    /// Returns the offset of `value` if it was added.
    #[must_use]
    pub fn get(&self, value: &str) -> Option<u32> {
        if value.is_empty() {
            return Some(0);
        }
        self.offsets.get(value).copied()
    }

    /// Number of distinct non-empty strings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// Returns true if only the empty string is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}

impl Heap for StringHeap {
    fn name(&self) -> &'static str {
        "#Strings"
    }

    fn data(&self) -> &[u8] {
        &self.data
    }
}
