//! Heap content that exists independently of a table row owner.

use crate::metadata::{
    signatures::{SignatureLocalVariables, SignatureMethod},
    token::Token,
};

/// The blob referenced by a `StandAloneSig` row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StandAloneSignatureKind {
    /// Already encoded bytes, written verbatim
    Raw(Vec<u8>),
    /// A method body's locals
    LocalVariables(SignatureLocalVariables),
    /// A `calli` call site
    Method(SignatureMethod),
}

/// A standalone signature (`StandAloneSig` row).
#[derive(Clone, Debug)]
pub struct StandAloneSignature {
    /// Assigned or recorded `StandAloneSig` token
    pub token: Token,
    /// The signature
    pub signature: StandAloneSignatureKind,
}

impl StandAloneSignature {
    /// Creates a standalone signature.
    #[must_use]
    pub fn new(signature: StandAloneSignatureKind) -> Self {
        StandAloneSignature {
            token: Token::default(),
            signature,
        }
    }

    /// Sets the recorded token.
    #[must_use]
    pub fn with_token(mut self, token: Token) -> Self {
        self.token = token;
        self
    }
}

/// A literal of the `#US` heap, as loaded by `ldstr`.
#[derive(Clone, Debug, Default)]
pub struct UserString {
    /// Recorded or assigned `#US` offset
    pub offset: u32,
    /// The string
    pub value: String,
}

impl UserString {
    /// Creates a user string without a recorded offset.
    pub fn new(value: impl Into<String>) -> Self {
        UserString {
            offset: 0,
            value: value.into(),
        }
    }

    /// Creates a user string recorded at `offset`.
    pub fn at(offset: u32, value: impl Into<String>) -> Self {
        UserString {
            offset,
            value: value.into(),
        }
    }

    /// The `ldstr` operand token, `0x70` followed by the heap offset.
    #[must_use]
    pub fn token(&self) -> Token {
        Token::new(0x7000_0000 | self.offset)
    }
}

/// Raw `#Blob` content known before any row refers to it.
#[derive(Clone, Debug, Default)]
pub struct BlobEntry {
    /// Recorded or assigned `#Blob` offset
    pub offset: u32,
    /// The blob bytes, without length prefix
    pub data: Vec<u8>,
}

impl BlobEntry {
    /// Creates a blob without a recorded offset.
    #[must_use]
    pub fn new(data: Vec<u8>) -> Self {
        BlobEntry { offset: 0, data }
    }

    /// Creates a blob recorded at `offset`.
    #[must_use]
    pub fn at(offset: u32, data: Vec<u8>) -> Self {
        BlobEntry { offset, data }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_string_token() {
        let s = UserString::at(0x1F, "hello");
        assert_eq!(s.token().value(), 0x7000_001F);
    }
}
