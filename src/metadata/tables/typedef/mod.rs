//! # `TypeDef` Table Module
//!
//! The `TypeDef` table (0x02) defines the types of the module. Each row owns a contiguous
//! run of `Field` and `MethodDef` rows: the run starts at `field_list` (`method_list`) and
//! ends where the next row's run starts, or at the end of the table for the last row.
mod raw;

pub use raw::*;
