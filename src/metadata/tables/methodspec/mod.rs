//! # `MethodSpec` Table Module
//!
//! The `MethodSpec` table (0x2B) instantiates a generic method (a `MethodDef` or a
//! `MemberRef`) with the type arguments stored in its instantiation blob.
mod raw;

pub use raw::*;
