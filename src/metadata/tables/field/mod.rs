//! # Field Table Module
//!
//! The `Field` table (0x04) defines the fields of all types. Its rows are grouped into
//! the contiguous runs referenced by `TypeDef.FieldList`.
mod raw;

pub use raw::*;
