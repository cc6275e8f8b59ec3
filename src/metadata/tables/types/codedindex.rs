//! # Coded Index Types Module
//!
//! Coded indices let one column reference rows of several tables. The low bits of the value
//! carry the position of the target table within the scheme's candidate list (the tag), and
//! the remaining bits carry the row id:
//!
//! ```text
//! value = (rid << tag_bits) | tag
//! tag_bits = ceil(log2(candidate count))
//! ```
//!
//! A null reference is encoded as `0`.
//!
//! ## Key Components
//!
//! - [`CodedIndexType`]: the coding schemes used by the tables this crate builds
//! - [`CodedIndex`]: a decoded `(table, row)` pair with its token
//!
//! ## References
//!
//! - [ECMA-335 Standard](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf) - Section II.24.2.6

use strum::{EnumCount, EnumIter, IntoStaticStr};

use crate::{
    file::io::write_le_at_dyn,
    metadata::{
        tables::{TableId, TableInfoRef},
        token::Token,
    },
    utils::tag_bits,
    Error, Result,
};

/// The coded index schemes of ECMA-335 II.24.2.6 used by the rows this crate builds.
///
/// Each variant fixes an ordered list of candidate tables. The order is part of the file
/// format: a table's position in [`CodedIndexType::tables`] is the tag value stored in the
/// low bits of the encoded index.
#[derive(Debug, Hash, Eq, PartialEq, Clone, Copy, EnumIter, EnumCount, IntoStaticStr)]
#[repr(usize)]
pub enum CodedIndexType {
    /// References `TypeDef`, `TypeRef`, or `TypeSpec` tables.
    TypeDefOrRef,





    /// References `TypeDef`, `TypeRef`, `ModuleRef`, `MethodDef`, or `TypeSpec` tables.
    ///
    /// Used as the parent of member references.
    MemberRefParent,


    /// References `MethodDef` or `MemberRef` tables.
    MethodDefOrRef,



    /// References `Module`, `ModuleRef`, `AssemblyRef`, or `TypeRef` tables.
    ///
    /// The scope in which a type reference is resolved.
    ResolutionScope,

    /// References `TypeDef` or `MethodDef` tables.
    ///
    /// The owner of a generic parameter.
    TypeOrMethodDef,
}

impl CodedIndexType {
    /// Returns the candidate tables of this scheme in tag order.
    #[must_use]
    pub fn tables(&self) -> &'static [TableId] {
        match self {
            CodedIndexType::TypeDefOrRef => {
                &[TableId::TypeDef, TableId::TypeRef, TableId::TypeSpec]
            }
            CodedIndexType::MemberRefParent => &[
                TableId::TypeDef,
                TableId::TypeRef,
                TableId::ModuleRef,
                TableId::MethodDef,
                TableId::TypeSpec,
            ],
            CodedIndexType::MethodDefOrRef => &[TableId::MethodDef, TableId::MemberRef],
            CodedIndexType::ResolutionScope => &[
                TableId::Module,
                TableId::ModuleRef,
                TableId::AssemblyRef,
                TableId::TypeRef,
            ],
            CodedIndexType::TypeOrMethodDef => &[TableId::TypeDef, TableId::MethodDef],
        }
    }

    /// Number of low bits holding the tag.
    #[must_use]
    pub fn tag_bits(&self) -> u8 {
        tag_bits(self.tables().len())
    }

    /// Scheme name used in diagnostics.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.into()
    }

    /// Packs `token` into this scheme. A null token encodes as `0`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidCodedIndex`] if the token's table is not a candidate of
    /// this scheme, or its row id does not fit next to the tag.
    pub fn encode(&self, token: Token) -> Result<u32> {
        if token.is_null() {
            return Ok(0);
        }

        let invalid = || Error::InvalidCodedIndex {
            token,
            scheme: self.name(),
        };

        let tag = self
            .tables()
            .iter()
            .position(|table| *table as u8 == token.table())
            .ok_or_else(invalid)?;

        let bits = self.tag_bits();
        let row = token.row();
        if u64::from(row) << bits > u64::from(u32::MAX) {
            return Err(invalid());
        }

        #[allow(clippy::cast_possible_truncation)] // tag < 32
        Ok((row << bits) | tag as u32)
    }

    /// Splits an encoded value back into its table and row id.
    ///
    /// # Errors
    /// Returns an error if the tag does not name a candidate table.
    pub fn decode(&self, value: u32) -> Result<(TableId, u32)> {
        let tables = self.tables();
        let bits = self.tag_bits();
        let tag = (value & ((1 << bits) - 1)) as usize;

        match tables.get(tag) {
            Some(table) => Ok((*table, value >> bits)),
            None => Err(malformed_error!(
                "Tag {} is out of range for {} coded index 0x{:X}",
                tag,
                self.name(),
                value
            )),
        }
    }
}

/// A decoded coded index: the referenced table, the row within it and the matching token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CodedIndex {
    /// The [`TableId`] this index is referring to.
    pub tag: TableId,
    /// The 1-based row id, `0` for a null reference.
    pub row: u32,
    /// The token of the referenced row.
    pub token: Token,
}

impl CodedIndex {
    /// Creates a coded index pointing at `row` of `tag`.
    #[must_use]
    pub fn new(tag: TableId, row: u32) -> CodedIndex {
        CodedIndex {
            tag,
            row,
            token: Token::from_parts(tag, row),
        }
    }

    /// A null reference, written as `0` in any scheme.
    #[must_use]
    pub fn null() -> CodedIndex {
        CodedIndex::new(TableId::Module, 0)
    }

    /// Returns true for a null reference.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.row == 0
    }

    /// Writes this index in the given scheme using the width from `sizes`.
    ///
    /// # Errors
    /// Returns an error if the table is not part of `ci_type` or the buffer is too small.
    pub fn write(
        &self,
        data: &mut [u8],
        offset: &mut usize,
        sizes: &TableInfoRef,
        ci_type: CodedIndexType,
    ) -> Result<()> {
        let value = if self.is_null() {
            0
        } else {
            ci_type.encode(self.token)?
        };

        write_le_at_dyn(
            data,
            offset,
            value,
            sizes.coded_index_bytes(ci_type) == 4,
        )
    }
}

impl TryFrom<Token> for CodedIndex {
    type Error = Error;

    fn try_from(token: Token) -> Result<Self> {
        if token.is_null() {
            return Err(malformed_error!("Cannot convert null token to CodedIndex"));
        }

        Ok(CodedIndex::new(token.table_id()?, token.row()))
    }
}
