//! Types, fields, methods and parameters defined by the module.

use crate::{
    metadata::{
        signatures::{SignatureField, SignatureMethod},
        token::Token,
    },
    model::{FieldId, MethodId, TypeDefId, TypeHandle},
};

/// A contiguous run of rows in the `Field` or `MethodDef` table.
///
/// `start` is the first RID of the run. An empty run still has a start: the RID the next
/// owner's run begins at, which is what the `FieldList` / `MethodList` column stores.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MemberRange {
    /// First RID of the run
    pub start: u32,
    /// Number of rows in the run
    pub length: u32,
}

impl MemberRange {
    /// Creates a run of `length` rows starting at `start`.
    #[must_use]
    pub fn new(start: u32, length: u32) -> Self {
        MemberRange { start, length }
    }

    /// One past the last RID of the run.
    #[must_use]
    pub fn end(&self) -> u32 {
        self.start + self.length
    }

    /// Returns true if `rid` lies inside the run.
    #[must_use]
    pub fn contains(&self, rid: u32) -> bool {
        rid >= self.start && rid < self.end()
    }
}

/// A type defined in the module (`TypeDef` row).
#[derive(Clone, Debug, Default)]
pub struct TypeDefinition {
    /// Assigned or recorded `TypeDef` token
    pub token: Token,
    /// `TypeAttributes`
    pub flags: u32,
    /// Simple name
    pub name: String,
    /// Namespace, empty for the global namespace and for nested types
    pub namespace: String,
    /// Base type, `None` for interfaces and `System.Object`
    pub extends: Option<TypeHandle>,
    /// Fields in declaration order
    pub fields: Vec<FieldId>,
    /// Methods in declaration order
    pub methods: Vec<MethodId>,
    /// Directly nested types, in enumeration order
    pub nested_types: Vec<TypeDefId>,
    /// The rows of the `Field` table owned by this type
    pub fields_range: MemberRange,
    /// The rows of the `MethodDef` table owned by this type
    pub methods_range: MemberRange,
}

impl TypeDefinition {
    /// Creates a type without members.
    pub fn new(namespace: impl Into<String>, name: impl Into<String>, flags: u32) -> Self {
        TypeDefinition {
            namespace: namespace.into(),
            name: name.into(),
            flags,
            ..Default::default()
        }
    }

    /// Sets the base type.
    #[must_use]
    pub fn with_extends(mut self, base: TypeHandle) -> Self {
        self.extends = Some(base);
        self
    }

    /// Sets the recorded token.
    #[must_use]
    pub fn with_token(mut self, token: Token) -> Self {
        self.token = token;
        self
    }
}

/// A field defined in the module (`Field` row).
#[derive(Clone, Debug)]
pub struct FieldDefinition {
    /// Assigned or recorded `Field` token
    pub token: Token,
    /// `FieldAttributes`
    pub flags: u16,
    /// Field name
    pub name: String,
    /// Structural signature
    pub signature: SignatureField,
    /// Signature bytes as found in a parsed module
    pub raw_signature: Option<Vec<u8>>,
}

impl FieldDefinition {
    /// Creates a field.
    pub fn new(name: impl Into<String>, flags: u16, signature: SignatureField) -> Self {
        FieldDefinition {
            token: Token::default(),
            flags,
            name: name.into(),
            signature,
            raw_signature: None,
        }
    }

    /// Sets the recorded token.
    #[must_use]
    pub fn with_token(mut self, token: Token) -> Self {
        self.token = token;
        self
    }

    /// Attaches the parsed signature bytes.
    #[must_use]
    pub fn with_raw_signature(mut self, raw: Vec<u8>) -> Self {
        self.raw_signature = Some(raw);
        self
    }
}

/// A parameter row of a method.
#[derive(Clone, Debug, Default)]
pub struct ParameterDefinition {
    /// Assigned or recorded `Param` token
    pub token: Token,
    /// `ParamAttributes`
    pub flags: u16,
    /// `0` for the return value, `1..` for parameters
    pub sequence: u16,
    /// Parameter name
    pub name: String,
}

impl ParameterDefinition {
    /// Creates a parameter.
    pub fn new(name: impl Into<String>, sequence: u16, flags: u16) -> Self {
        ParameterDefinition {
            token: Token::default(),
            flags,
            sequence,
            name: name.into(),
        }
    }
}

/// A method defined in the module (`MethodDef` row).
#[derive(Clone, Debug)]
pub struct MethodDefinition {
    /// Assigned or recorded `MethodDef` token
    pub token: Token,
    /// `MethodAttributes`
    pub flags: u16,
    /// `MethodImplAttributes`
    pub impl_flags: u16,
    /// Method name
    pub name: String,
    /// RVA of the method body, placed by the layout layer
    pub rva: u32,
    /// Structural signature
    pub signature: SignatureMethod,
    /// Signature bytes as found in a parsed module
    pub raw_signature: Option<Vec<u8>>,
    /// Parameter rows
    pub parameters: Vec<ParameterDefinition>,
}

impl MethodDefinition {
    /// Creates a method without parameter rows.
    pub fn new(name: impl Into<String>, flags: u16, signature: SignatureMethod) -> Self {
        MethodDefinition {
            token: Token::default(),
            flags,
            impl_flags: 0,
            name: name.into(),
            rva: 0,
            signature,
            raw_signature: None,
            parameters: Vec::new(),
        }
    }

    /// Sets the recorded token.
    #[must_use]
    pub fn with_token(mut self, token: Token) -> Self {
        self.token = token;
        self
    }

    /// Attaches the parsed signature bytes.
    #[must_use]
    pub fn with_raw_signature(mut self, raw: Vec<u8>) -> Self {
        self.raw_signature = Some(raw);
        self
    }

    /// Adds a parameter row.
    #[must_use]
    pub fn with_parameter(mut self, parameter: ParameterDefinition) -> Self {
        self.parameters.push(parameter);
        self
    }
}
