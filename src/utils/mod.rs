//! Shared encoding helpers used by the heaps, the signature encoders and the row writers.

mod compression;
mod math;

pub use compression::{
    read_compressed_uint, write_compressed_int, write_compressed_uint,
    MAX_COMPRESSED_UINT,
};
pub use math::{tag_bits, to_u32};
