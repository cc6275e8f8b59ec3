use rustc_hash::FxHashMap;
use widestring::U16String;

use crate::{
    builder::heaps::{next_offset, Heap},
    utils::{to_u32, write_compressed_uint},
    Error, Result,
};

/// Largest offset an `ldstr` token (`0x70` + 24-bit offset) can address.
const MAX_USER_STRING_OFFSET: usize = 0x00FF_FFFF;

/// The `#US` heap: UTF-16LE literals with a compressed length prefix and a terminal byte.
///
/// Unlike the other heaps, an empty literal gets a real entry: `ldstr ""` needs an operand
/// that is distinct from the null offset 0.
#[derive(Debug, Clone)]
pub struct UserStringHeap {
    data: Vec<u8>,
    offsets: FxHashMap<Vec<u16>, u32>,
}

impl Default for UserStringHeap {
    fn default() -> Self {
        Self::new()
    }
}

impl UserStringHeap {
    /// Creates a heap holding only the null entry at offset 0.
    #[must_use]
    pub fn new() -> Self {
        UserStringHeap {
            data: vec![0],
            offsets: FxHashMap::default(),
        }
    }

    /// Returns the offset of `value`, appending it if its UTF-16 code units are not present.
    ///
    /// # Errors
    /// Returns [`crate::Error::HeapOverflow`] if the heap grows past what an `ldstr` token can
    /// address.
    pub fn add(&mut self, value: &str) -> Result<u32> {
        let units = U16String::from_str(value).into_vec();
        if let Some(offset) = self.offsets.get(&units) {
            return Ok(*offset);
        }

        if self.data.len() > MAX_USER_STRING_OFFSET {
            return Err(Error::HeapOverflow {
                heap: "#US",
                size: self.data.len(),
            });
        }

        let offset = next_offset(self.name(), self.data.len())?;
        let total_len = units.len() * 2 + 1;

        write_compressed_uint(to_u32(total_len)?, &mut self.data).map_err(|_| {
            Error::HeapOverflow {
                heap: "#US",
                size: total_len,
            }
        })?;
        for unit in &units {
            self.data.extend_from_slice(&unit.to_le_bytes());
        }
        self.data.push(u8::from(units.iter().copied().any(is_special)));

        self.offsets.insert(units, offset);
        Ok(offset)
    }

    /// Returns the offset of `value` if it was added.
    #[must_use]
    pub fn get(&self, value: &str) -> Option<u32> {
        let units = U16String::from_str(value).into_vec();
        self.offsets.get(&units).copied()
    }

    /// Number of distinct literals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// Returns true if no literal was added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}

/// Characters that force the terminal byte to 1.
fn is_special(unit: u16) -> bool {
    unit > 0x7E || (0x01..=0x08).contains(&unit) || (0x0E..=0x1F).contains(&unit)
}

impl Heap for UserStringHeap {
    fn name(&self) -> &'static str {
        "#US"
    }

    fn data(&self) -> &[u8] {
        &self.data
    }
}
