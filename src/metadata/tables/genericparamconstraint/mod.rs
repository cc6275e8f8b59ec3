//! # `GenericParamConstraint` Table Module
//!
//! The `GenericParamConstraint` table (0x2C) lists the type constraints of generic
//! parameters. ECMA-335 requires the table to be sorted by owner.
mod raw;

pub use raw::*;
