//! # `NestedClass` Table Module
//!
//! The `NestedClass` table (0x29) records which types are nested in which. Both columns are
//! plain `TypeDef` indices, so the table can only be written once every type has its row.
mod raw;

pub use raw::*;
