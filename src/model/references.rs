//! References to entities outside the module, and constructed types and methods.

use crate::{
    metadata::{
        signatures::{SignatureField, SignatureMethod, SignatureMethodSpec, SignatureTypeSpec},
        token::Token,
    },
    model::{MemberRefParent, MethodHandle, ResolutionScope},
};

/// A reference to a type defined in another module or assembly (`TypeRef` row).
#[derive(Clone, Debug)]
pub struct TypeReference {
    /// Assigned or recorded `TypeRef` token
    pub token: Token,
    /// Where the type is defined
    pub scope: ResolutionScope,
    /// Simple name
    pub name: String,
    /// Namespace
    pub namespace: String,
}

impl TypeReference {
    /// Creates a type reference.
    pub fn new(
        scope: ResolutionScope,
        namespace: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        TypeReference {
            token: Token::default(),
            scope,
            name: name.into(),
            namespace: namespace.into(),
        }
    }

    /// Sets the recorded token.
    #[must_use]
    pub fn with_token(mut self, token: Token) -> Self {
        self.token = token;
        self
    }
}

/// The signature of a referenced member.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MemberSignature {
    /// A method reference
    Method(SignatureMethod),
    /// A field reference
    Field(SignatureField),
}

/// A reference to a field or method (`MemberRef` row).
#[derive(Clone, Debug)]
pub struct MemberReference {
    /// Assigned or recorded `MemberRef` token
    pub token: Token,
    /// The declaring entity
    pub parent: MemberRefParent,
    /// Member name
    pub name: String,
    /// Structural signature
    pub signature: MemberSignature,
    /// Signature bytes as found in a parsed module
    pub raw_signature: Option<Vec<u8>>,
}

impl MemberReference {
    /// Creates a member reference.
    pub fn new(parent: MemberRefParent, name: impl Into<String>, signature: MemberSignature) -> Self {
        MemberReference {
            token: Token::default(),
            parent,
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

/// A constructed type such as `List<int>` or `int[]` (`TypeSpec` row).
#[derive(Clone, Debug)]
pub struct TypeSpecification {
    /// Assigned or recorded `TypeSpec` token
    pub token: Token,
    /// Structural signature
    pub signature: SignatureTypeSpec,
    /// Signature bytes as found in a parsed module
    pub raw_signature: Option<Vec<u8>>,
}

impl TypeSpecification {
    /// Creates a type specification.
    #[must_use]
    pub fn new(signature: SignatureTypeSpec) -> Self {
        TypeSpecification {
            token: Token::default(),
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

/// An instantiation of a generic method (`MethodSpec` row).
#[derive(Clone, Debug)]
pub struct MethodSpecification {
    /// Assigned or recorded `MethodSpec` token
    pub token: Token,
    /// The generic method
    pub method: MethodHandle,
    /// The type arguments
    pub instantiation: SignatureMethodSpec,
    /// Instantiation bytes as found in a parsed module
    pub raw_signature: Option<Vec<u8>>,
}

impl MethodSpecification {
    /// Creates a method instantiation.
    #[must_use]
    pub fn new(method: MethodHandle, instantiation: SignatureMethodSpec) -> Self {
        MethodSpecification {
            token: Token::default(),
            method,
            instantiation,
            raw_signature: None,
        }
    }

    /// Sets the recorded token.
    #[must_use]
    pub fn with_token(mut self, token: Token) -> Self {
        self.token = token;
        self
    }

    /// Attaches the parsed instantiation bytes.
    #[must_use]
    pub fn with_raw_signature(mut self, raw: Vec<u8>) -> Self {
        self.raw_signature = Some(raw);
        self
    }
}

/// Four-part assembly version.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct AssemblyVersion {
    /// Major version
    pub major: u16,
    /// Minor version
    pub minor: u16,
    /// Build number
    pub build: u16,
    /// Revision number
    pub revision: u16,
}

impl AssemblyVersion {
    /// Creates a version.
    #[must_use]
    pub fn new(major: u16, minor: u16, build: u16, revision: u16) -> Self {
        AssemblyVersion {
            major,
            minor,
            build,
            revision,
        }
    }
}

/// A referenced assembly (`AssemblyRef` row).
#[derive(Clone, Debug, Default)]
pub struct AssemblyReference {
    /// Assigned or recorded `AssemblyRef` token
    pub token: Token,
    /// Simple assembly name
    pub name: String,
    /// Culture, empty for neutral
    pub culture: String,
    /// Version
    pub version: AssemblyVersion,
    /// `AssemblyFlags`
    pub flags: u32,
    /// Public key or its 8-byte token, empty if unsigned
    pub public_key_or_token: Vec<u8>,
    /// Hash of the referenced assembly, usually empty
    pub hash_value: Vec<u8>,
}

impl AssemblyReference {
    /// Creates a reference to a culture-neutral, unsigned assembly.
    pub fn new(name: impl Into<String>, version: AssemblyVersion) -> Self {
        AssemblyReference {
            name: name.into(),
            version,
            ..Default::default()
        }
    }

    /// Sets the public key token.
    #[must_use]
    pub fn with_public_key_token(mut self, token: Vec<u8>) -> Self {
        self.public_key_or_token = token;
        self
    }

    /// Sets the recorded token.
    #[must_use]
    pub fn with_token(mut self, token: Token) -> Self {
        self.token = token;
        self
    }
}

/// A referenced module of the same assembly (`ModuleRef` row).
#[derive(Clone, Debug, Default)]
pub struct ModuleReference {
    /// Assigned or recorded `ModuleRef` token
    pub token: Token,
    /// File name of the module
    pub name: String,
}

impl ModuleReference {
    /// Creates a module reference.
    pub fn new(name: impl Into<String>) -> Self {
        ModuleReference {
            token: Token::default(),
            name: name.into(),
        }
    }

    /// Sets the recorded token.
    #[must_use]
    pub fn with_token(mut self, token: Token) -> Self {
        self.token = token;
        self
    }
}
