//! # `MemberRef` Table Module
//!
//! The `MemberRef` table (0x0A) references fields and methods through their parent
//! (`TypeRef`, `TypeSpec`, `TypeDef`, `ModuleRef` or `MethodDef` for vararg call sites).
//! Like type references, member references are shared between identical rows.
mod raw;

pub use raw::*;
