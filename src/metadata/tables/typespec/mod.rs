//! # `TypeSpec` Table Module
//!
//! The `TypeSpec` table (0x1B) describes constructed types (generic instantiations, arrays,
//! pointers, generic parameters) through a signature blob.
mod raw;

pub use raw::*;
