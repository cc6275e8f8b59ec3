//! # Module Table Module
//!
//! The `Module` table (0x00) holds exactly one row describing the module being built:
//! its generation, its name and its MVID.
mod raw;

pub use raw::*;
