// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # cilmeta
//!
//! Builds the ECMA-335 metadata of a .NET module: the tables of the `#~` stream and the
//! `#Strings`, `#Blob`, `#US` and `#GUID` heaps, produced from an in-memory object model of
//! the module's types, members, references and signatures.
//!
//! Every cross-table reference in the output is a number computed from final row positions:
//! a RID, a coded index or a heap offset. The builder supports two token policies:
//!
//! - **Rebuild** assigns fresh tokens in discovery order and shares identical reference rows.
//!   Use it when writing a module that was created or modified in memory.
//! - **Preserve** reproduces the token recorded on every entity and, with raw signatures,
//!   the exact signature bytes. Use it to write a parsed module back unchanged, so that IL
//!   bodies and other consumers holding tokens stay valid.
//!
//! ## Quick Start
//!
//! ```rust
//! use cilmeta::prelude::*;
//!
//! let mut module = ModuleDefinition::new("Hello.dll");
//! let corlib = module.add_assembly_ref(AssemblyReference::new(
//!     "System.Runtime",
//!     AssemblyVersion::new(8, 0, 0, 0),
//! ));
//! let object = module.add_type_ref(TypeReference::new(
//!     ResolutionScope::AssemblyRef(corlib),
//!     "System",
//!     "Object",
//! ));
//!
//! module.add_type(TypeDefinition::new("", "<Module>", 0));
//! let hello = module.add_type(
//!     TypeDefinition::new("Hello", "Program", TypeAttributes::PUBLIC)
//!         .with_extends(TypeHandle::Ref(object)),
//! );
//! module.add_method(
//!     hello,
//!     MethodDefinition::new(
//!         "Main",
//!         MethodAttributes::PUBLIC | MethodAttributes::STATIC,
//!         SignatureMethod {
//!             return_type: SignatureParameter::new(TypeSignature::Void),
//!             ..Default::default()
//!         },
//!     ),
//! )?;
//!
//! let image = MetadataBuilder::new(BuilderConfig::rebuild()).build(&mut module)?;
//!
//! assert_eq!(image.row_count(TableId::TypeDef), 2);
//! assert_eq!(module.types[1].token.value(), 0x0200_0002);
//! assert_eq!(module.types[1].methods_range, MemberRange::new(1, 1));
//! # Ok::<(), cilmeta::Error>(())
//! ```
//!
//! ## Error Handling
//!
//! A build either produces a complete, internally consistent [`builder::MetadataImage`] or
//! fails with an [`Error`] describing the first violation it found:
//!
//! ```rust
//! use cilmeta::prelude::*;
//!
//! let mut module = ModuleDefinition::new("Broken.dll");
//! let ty = module.add_type(TypeDefinition::new("", "<Module>", 0));
//! module.types[ty.index()].token = Token::new(0x0200_0002);
//!
//! match MetadataBuilder::new(BuilderConfig::preserve()).build(&mut module) {
//!     Err(Error::NonDenseTokens { table, expected, found }) => {
//!         assert_eq!(table, TableId::TypeDef);
//!         assert_eq!((expected, found), (1, 2));
//!     }
//!     other => panic!("unexpected result: {:?}", other.map(|_| ())),
//! }
//! ```
//!
//! ## Standards Compliance
//!
//! Table layouts, coded index schemes, heap formats and signature encodings follow the
//! **ECMA-335 specification** (6th edition), Partition II.
//!
//! - [ECMA-335 Standard](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf)

#[macro_use]
pub(crate) mod error;

/// Little-endian row serialization primitives
pub mod file;

/// Compressed integer encoding and checked narrowing
pub mod utils;

/// Tokens, metadata tables and signatures
///
/// The [`metadata::tables`] module holds one `*Raw` row type per table the builder writes
/// together with the shared table infrastructure: [`metadata::tables::TableId`],
/// [`metadata::tables::CodedIndexType`], [`metadata::tables::TableInfo`] and the append-only
/// [`metadata::tables::RowStore`]. [`metadata::signatures`] holds the structural signature
/// model and its blob encoders.
pub mod metadata;

/// The object model the builder reads and annotates with tokens
pub mod model;

/// The metadata builder, its heaps, token policies and signature strategies
pub mod builder;

/// Convenient re-exports of the most commonly used types and traits.
///
/// ```rust
/// use cilmeta::prelude::*;
///
/// let mut module = ModuleDefinition::new("Empty.dll");
/// let image = MetadataBuilder::default().build(&mut module)?;
/// assert_eq!(image.row_count(TableId::Module), 1);
/// # Ok::<(), cilmeta::Error>(())
/// ```
pub mod prelude;

/// `cilmeta` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `cilmeta` Error type
///
/// Every failure aborts the build it occurred in; see [`Error`] for the individual variants.
pub use error::Error;
