//! # Param Table Module
//!
//! The `Param` table (0x08) describes method parameters. Sequence 0 denotes the return value.
mod raw;

pub use raw::*;
