//! # `GenericParam` Table Module
//!
//! The `GenericParam` table (0x2A) defines the generic parameters of types and methods.
//! ECMA-335 requires the table to be sorted by owner and then by parameter number.
mod raw;

pub use raw::*;
