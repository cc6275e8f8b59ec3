//! Signature object model.
//!
//! These types describe signatures structurally, the way the object model holds them.
//! Types defined or referenced elsewhere in the module appear as [`TypeHandle`]s; their
//! tokens are only known once the builder has given them rows, so the encoders resolve
//! handles through a [`crate::metadata::signatures::TypeResolver`] while writing.

use crate::model::TypeHandle;

/// A type as it appears inside a signature (ECMA-335 II.23.2.12)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum TypeSignature {
    /// Placeholder for a type that was never filled in; cannot be encoded
    #[default]
    Unknown,
    /// `void`, only valid as a return type
    Void,
    /// `bool`
    Boolean,
    /// `char`
    Char,
    /// `sbyte`
    I1,
    /// `byte`
    U1,
    /// `short`
    I2,
    /// `ushort`
    U2,
    /// `int`
    I4,
    /// `uint`
    U4,
    /// `long`
    I8,
    /// `ulong`
    U8,
    /// `float`
    R4,
    /// `double`
    R8,
    /// `string`
    String,
    /// Unmanaged pointer to the inner type
    Ptr(SignaturePointer),
    /// Managed reference to the inner type
    ByRef(Box<TypeSignature>),
    /// A value type
    ValueType(TypeHandle),
    /// A reference type
    Class(TypeHandle),
    /// Generic parameter of the enclosing type, by number
    GenericParamType(u32),
    /// General (possibly multi-dimensional) array
    Array(SignatureArray),
    /// Instantiation of a generic type: the open type, then its arguments
    GenericInst(Box<TypeSignature>, Vec<TypeSignature>),
    /// `System.TypedReference`
    TypedByRef,
    /// `System.IntPtr`
    I,
    /// `System.UIntPtr`
    U,
    /// Function pointer
    FnPtr(Box<SignatureMethod>),
    /// `object`
    Object,
    /// Single-dimensional, zero-based array
    SzArray(SignatureSzArray),
    /// Generic parameter of the enclosing method, by number
    GenericParamMethod(u32),
    /// Pinned local variable type
    Pinned(Box<TypeSignature>),
}

/// A custom modifier (`modreq` / `modopt`) applied to a type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CustomModifier {
    /// `true` for `modreq`, `false` for `modopt`
    pub is_required: bool,
    /// The modifier type, a `TypeDef`, `TypeRef` or `TypeSpec`
    pub modifier_type: TypeHandle,
}

/// Size and lower bound of one array dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ArrayDimensions {
    /// Number of elements, if specified
    pub size: Option<u32>,
    /// Lower bound, if specified
    pub lower_bound: Option<i32>,
}

/// General array: `ARRAY Type ArrayShape`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SignatureArray {
    /// Element type
    pub base: Box<TypeSignature>,
    /// Number of dimensions
    pub rank: u32,
    /// Known sizes and lower bounds, leading dimensions first
    pub dimensions: Vec<ArrayDimensions>,
}

/// Single-dimensional zero-based array: `SZARRAY CustomMod* Type`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SignatureSzArray {
    /// Custom modifiers on the element type
    pub modifiers: Vec<CustomModifier>,
    /// Element type
    pub base: Box<TypeSignature>,
}

/// Unmanaged pointer: `PTR CustomMod* Type`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SignaturePointer {
    /// Custom modifiers on the pointee
    pub modifiers: Vec<CustomModifier>,
    /// Pointee type
    pub base: Box<TypeSignature>,
}

/// A parameter or return type: `CustomMod* [BYREF] Type`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SignatureParameter {
    /// Custom modifiers
    pub modifiers: Vec<CustomModifier>,
    /// Passed by reference
    pub by_ref: bool,
    /// The type
    pub base: TypeSignature,
}

impl SignatureParameter {
    /// A plain by-value parameter of type `base`
    #[must_use]
    pub fn new(base: TypeSignature) -> Self {
        SignatureParameter {
            modifiers: Vec::new(),
            by_ref: false,
            base,
        }
    }
}

/// Method signature (`MethodDefSig`, `MethodRefSig`, or a function pointer)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct SignatureMethod {
    /// Instance method, `this` is passed implicitly
    pub has_this: bool,
    /// `this` appears explicitly as the first parameter
    pub explicit_this: bool,
    /// Managed default calling convention
    pub default: bool,
    /// Managed vararg calling convention
    pub vararg: bool,
    /// Unmanaged cdecl
    pub cdecl: bool,
    /// Unmanaged stdcall
    pub stdcall: bool,
    /// Unmanaged thiscall
    pub thiscall: bool,
    /// Unmanaged fastcall
    pub fastcall: bool,
    /// Number of generic parameters of a generic method, 0 otherwise
    pub param_count_generic: u32,
    /// Return type
    pub return_type: SignatureParameter,
    /// Fixed parameters
    pub params: Vec<SignatureParameter>,
    /// Extra arguments of a vararg call site, written after the sentinel
    pub varargs: Vec<SignatureParameter>,
}

/// Field signature: `FIELD CustomMod* Type`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SignatureField {
    /// Custom modifiers
    pub modifiers: Vec<CustomModifier>,
    /// Field type
    pub base: TypeSignature,
}

/// Local variable signature: `LOCAL_SIG Count LocalVar*`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SignatureLocalVariables {
    /// The locals, in slot order
    pub locals: Vec<SignatureLocalVariable>,
}

/// One local variable slot
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SignatureLocalVariable {
    /// Custom modifiers
    pub modifiers: Vec<CustomModifier>,
    /// Managed reference
    pub is_byref: bool,
    /// Pinned for the lifetime of the method
    pub is_pinned: bool,
    /// Local type
    pub base: TypeSignature,
}

/// `TypeSpec` signature, a single type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SignatureTypeSpec {
    /// The specified type
    pub base: TypeSignature,
}

/// `MethodSpec` instantiation: `GENERICINST GenArgCount Type+`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SignatureMethodSpec {
    /// The type arguments
    pub generic_args: Vec<TypeSignature>,
}
