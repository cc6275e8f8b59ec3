//! # `MethodDef` Table Module
//!
//! The `MethodDef` table (0x06) defines methods. Each row owns a contiguous run of `Param`
//! rows starting at `param_list`.
mod raw;

pub use raw::*;
