//! # `TypeRef` Table Module
//!
//! The `TypeRef` table (0x01) references types defined in other modules and assemblies, or
//! types nested inside other referenced types. Rows are identified by their content: two
//! references with the same resolution scope, name and namespace share one row.
mod raw;

pub use raw::*;
