//! # `ModuleRef` Table Module
mod raw;

pub use raw::*;
