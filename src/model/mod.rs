//! The module object model the metadata builder reads.
//!
//! This is the upstream side of the builder: a compiler or a module loader fills a
//! [`ModuleDefinition`] with types, members, references and signatures, and the builder turns
//! it into tables and heaps. The model is deliberately plain. Every entity carries a public
//! `token` field that the builder either assigns (rebuild mode) or reproduces from its
//! recorded value (preserve mode), and [`TypeDefinition`] carries the member ranges the
//! builder computes.
//!
//! # Key Components
//!
//! - [`ModuleDefinition`] - owns all entity collections
//! - [`TypeHandle`], [`MethodHandle`], [`ResolutionScope`], [`MemberRefParent`],
//!   [`GenericParamOwner`] - typed cross references between entities
//! - [`TypeDefinition`], [`FieldDefinition`], [`MethodDefinition`] - module definitions
//! - [`TypeReference`], [`MemberReference`], [`TypeSpecification`], [`MethodSpecification`] -
//!   references and constructed entities
//! - [`UserString`], [`BlobEntry`], [`StandAloneSignature`] - heap content

mod attributes;
mod content;
mod definitions;
mod generics;
mod handles;
mod module;
mod references;

pub use attributes::*;
pub use content::*;
pub use definitions::*;
pub use generics::*;
pub use handles::*;
pub use module::*;
pub use references::*;
