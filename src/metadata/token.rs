//! Metadata tokens.
//!
//! A [`Token`] names one row of one metadata table. The builder writes the final token of
//! every entity back into the object model once a build succeeds.
//!
//! ```rust
//! use cilmeta::metadata::token::Token;
//!
//! let token = Token::new(0x0200_0003);
//! assert_eq!(token.table(), 0x02);
//! assert_eq!(token.row(), 3);
//! assert!(!token.is_null());
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::{metadata::tables::TableId, Result};

/// A metadata token representing a reference to a metadata table entry.
///
/// Tokens in .NET metadata consist of a 32-bit value where:
/// - The high byte (bits 24-31) indicates the table type
/// - The low 24 bits (bits 0-23) indicate the row index (RID) within that table
///
/// A RID of `0` means the entity has no row yet (or the reference is null).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Token(pub u32);

impl Token {
    /// Creates a new token from a raw 32-bit value
    #[must_use]
    pub fn new(value: u32) -> Self {
        Token(value)
    }

    /// Creates a token for row `rid` of `table`
    #[must_use]
    pub fn from_parts(table: TableId, rid: u32) -> Self {
        Token(table.token_type() | (rid & 0x00FF_FFFF))
    }

    /// Returns the raw token value
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Extracts the table type from the token (high byte)
    #[must_use]
    pub fn table(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Extracts the table type as [`TableId`]
    ///
    /// # Errors
    /// Returns an error if the high byte is not a known table number
    pub fn table_id(&self) -> Result<TableId> {
        TableId::try_from(self.table())
    }

    /// Returns true if the token points into `table`
    #[must_use]
    pub fn is_table(&self, table: TableId) -> bool {
        self.table() == table as u8
    }

    /// Extracts the row index from the token (low 24 bits)
    #[must_use]
    pub fn row(&self) -> u32 {
        self.0 & 0x00FF_FFFF
    }

    /// Returns true if this is a null token (value 0)
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.0 == 0
    }
}

impl From<u32> for Token {
    fn from(value: u32) -> Self {
        Token(value)
    }
}

impl From<Token> for u32 {
    fn from(token: Token) -> Self {
        token.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Token(0x{:08x}, table: 0x{:02x}, row: {})",
            self.0,
            self.table(),
            self.row()
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_token_new() {
        let token = Token::new(0x06000001);
        assert_eq!(token.value(), 0x06000001);
    }

    #[test]
    fn test_token_from_parts() {
        let token = Token::from_parts(TableId::MethodDef, 1);
        assert_eq!(token.value(), 0x06000001);

        let token = Token::from_parts(TableId::GenericParamConstraint, 0x00FF_FFFF);
        assert_eq!(token.value(), 0x2CFFFFFF);

        let token = Token::from_parts(TableId::TypeRef, 0);
        assert_eq!(token.row(), 0);
        assert!(!token.is_null());
    }

    #[test]
    fn test_token_table() {
        let token = Token(0x06000001);
        assert_eq!(token.table(), 0x06);
        assert_eq!(token.table_id().unwrap(), TableId::MethodDef);
        assert!(token.is_table(TableId::MethodDef));
        assert!(!token.is_table(TableId::Field));

        let token2 = Token(0x02000005);
        assert_eq!(token2.table(), 0x02);

        let token3 = Token(0x00000000);
        assert_eq!(token3.table(), 0x00);

        assert!(Token(0x70000001).table_id().is_err());
    }

    #[test]
    fn test_token_row() {
        let token = Token(0x06000001);
        assert_eq!(token.row(), 1);

        let token2 = Token(0x02000005);
        assert_eq!(token2.row(), 5);

        let token3 = Token(0x06FFFFFF);
        assert_eq!(token3.row(), 0x00FFFFFF);
    }

    #[test]
    fn test_token_is_null() {
        assert!(Token(0x00000000).is_null());
        assert!(Token::default().is_null());
        assert!(!Token(0x06000001).is_null());
    }

    #[test]
    fn test_token_from_conversion() {
        let value = 0x06000001u32;
        let token: Token = value.into();
        assert_eq!(token.value(), value);

        let back_to_u32: u32 = token.into();
        assert_eq!(back_to_u32, value);
    }

    #[test]
    fn test_token_display_and_debug() {
        let token = Token(0x06000001);
        assert_eq!(format!("{}", token), "0x06000001");
        assert_eq!(
            format!("{:?}", token),
            "Token(0x06000001, table: 0x06, row: 1)"
        );
    }

    #[test]
    fn test_token_ordering_follows_rid_within_table() {
        let mut tokens = vec![Token(0x04000003), Token(0x04000001), Token(0x04000002)];
        tokens.sort();
        assert_eq!(tokens, vec![Token(0x04000001), Token(0x04000002), Token(0x04000003)]);
    }

    #[test]
    fn test_token_hash() {
        let mut map = HashMap::new();
        map.insert(Token(0x02000001), "TypeDef");
        assert_eq!(map.get(&Token(0x02000001)), Some(&"TypeDef"));
        assert_eq!(map.get(&Token(0x02000002)), None);
    }
}
