//! Generic parameters and their constraints.

use crate::{
    metadata::token::Token,
    model::{GenericParamOwner, GenericParamAttributes, TypeHandle},
};

/// A generic parameter of a type or method (`GenericParam` row).
///
/// The `token` doubles as the key constraints use to name their parameter. In preserve mode it
/// is the recorded `GenericParam` token; in rebuild mode any unique non-null value works, and
/// the build replaces it (and every constraint's `owner`) with the final token.
#[derive(Clone, Debug)]
pub struct GenericParameter {
    /// Key, recorded token or final token
    pub token: Token,
    /// Ordinal within the owner's parameter list
    pub number: u16,
    /// Variance and special constraints
    pub flags: GenericParamAttributes,
    /// Declaring type or method
    pub owner: GenericParamOwner,
    /// Parameter name
    pub name: String,
}

impl GenericParameter {
    /// Creates a generic parameter identified by `key`.
    pub fn new(key: Token, owner: GenericParamOwner, number: u16, name: impl Into<String>) -> Self {
        GenericParameter {
            token: key,
            number,
            flags: GenericParamAttributes::empty(),
            owner,
            name: name.into(),
        }
    }

    /// Sets the attributes.
    #[must_use]
    pub fn with_flags(mut self, flags: GenericParamAttributes) -> Self {
        self.flags = flags;
        self
    }
}

/// A type constraint on a generic parameter (`GenericParamConstraint` row).
#[derive(Clone, Debug)]
pub struct GenericParameterConstraint {
    /// Assigned or recorded `GenericParamConstraint` token
    pub token: Token,
    /// Key of the constrained [`GenericParameter`]
    pub owner: Token,
    /// The required base type or interface
    pub constraint: TypeHandle,
}

impl GenericParameterConstraint {
    /// Creates a constraint on the parameter identified by `owner`.
    #[must_use]
    pub fn new(owner: Token, constraint: TypeHandle) -> Self {
        GenericParameterConstraint {
            token: Token::default(),
            owner,
            constraint,
        }
    }

    /// Sets the recorded token.
    #[must_use]
    pub fn with_token(mut self, token: Token) -> Self {
        self.token = token;
        self
    }
}
