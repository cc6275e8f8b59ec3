//! # cilmeta Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the cilmeta library. Import this module to get quick access to the object model,
//! the builder and the table types needed to inspect its output.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all cilmeta operations
pub use crate::Error;

/// The result type used throughout cilmeta
pub use crate::Result;

// ================================================================================================
// Builder
// ================================================================================================

/// The builder, its configuration and its output
pub use crate::builder::{
    BuildState, BuilderConfig, MetadataBuilder, MetadataImage, SignatureMode, TableSet,
    TokenMode,
};

/// Strategy interfaces and their implementations
pub use crate::builder::{
    OrderKey, PreserveTokens, RawSignatures, RebuildTokens, SignatureStrategy,
    StructuralSignatures, TokenPolicy,
};

/// Heaps
pub use crate::builder::{BlobHeap, GuidHeap, Heap, StringHeap, UserStringHeap};

// ================================================================================================
// Object Model
// ================================================================================================

/// Module and definitions
pub use crate::model::{
    FieldDefinition, MemberRange, MethodDefinition, ModuleDefinition, ParameterDefinition,
    TypeDefinition,
};

/// References and specifications
pub use crate::model::{
    AssemblyReference, AssemblyVersion, MemberReference, MemberSignature, MethodSpecification,
    ModuleReference, TypeReference, TypeSpecification,
};

/// Generics, standalone signatures and heap entries
pub use crate::model::{
    BlobEntry, GenericParameter, GenericParameterConstraint, StandAloneSignature,
    StandAloneSignatureKind, UserString,
};

/// Typed handles between entities
pub use crate::model::{
    AssemblyRefId, FieldId, GenericParamOwner, MemberRefId, MemberRefParent, MethodHandle,
    MethodId, MethodSpecId, ModuleRefId, ResolutionScope, TypeDefId, TypeHandle, TypeRefId,
    TypeSpecId,
};

/// Attribute flags
pub use crate::model::{
    FieldAttributes, GenericParamAttributes, MethodAttributes, ParamAttributes, TypeAttributes,
};

// ================================================================================================
// Metadata
// ================================================================================================

/// Metadata token type for referencing table entries
pub use crate::metadata::token::Token;

/// Table identification, coded indices and index widths
pub use crate::metadata::tables::{
    CodedIndex, CodedIndexType, RowStore, TableId, TableInfo, TableInfoRef,
};

/// Signature model
pub use crate::metadata::signatures::{
    CustomModifier, SignatureArray, SignatureField, SignatureLocalVariable,
    SignatureLocalVariables, SignatureMethod, SignatureMethodSpec, SignatureParameter,
    SignaturePointer, SignatureSzArray, SignatureTypeSpec, TypeResolver, TypeSignature,
};
