//! # `StandAloneSig` Table Module
//!
//! Signatures referenced directly from IL (local variable signatures, `calli` call sites).
mod raw;

pub use raw::*;
