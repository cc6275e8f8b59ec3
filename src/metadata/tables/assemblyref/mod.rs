//! # `AssemblyRef` Table Module
//!
//! The `AssemblyRef` table (0x23) identifies the assemblies that type references resolve
//! against.
mod raw;

pub use raw::*;
