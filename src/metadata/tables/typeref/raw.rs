use crate::{
    file::io::write_le_at_dyn,
    metadata::{
        tables::{CodedIndex, CodedIndexType, RowWritable, TableId, TableInfoRef, TableRow},
        token::Token,
    },
    Result,
};

#[derive(Clone, Debug, PartialEq, Eq)]
/// The `TypeRef` table contains references to types defined in other modules. `TableId` = 0x01
pub struct TypeRefRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// an index into a `Module`, `ModuleRef`, `AssemblyRef` or `TypeRef` table; more precisely, a `ResolutionScope`
    pub resolution_scope: CodedIndex,
    /// an index into the String heap
    pub type_name: u32,
    /// an index into the String heap
    pub type_namespace: u32,
}

impl TableRow for TypeRefRaw {
    const TABLE_ID: TableId = TableId::TypeRef;

    fn rid(&self) -> u32 {
        self.rid
    }
}

impl RowWritable for TypeRefRaw {
    #[rustfmt::skip]
    fn row_size(sizes: &TableInfoRef) -> u32 {
        u32::from(
            /* resolution_scope */  sizes.coded_index_bytes(CodedIndexType::ResolutionScope) +
            /* type_name */         sizes.str_bytes() +
            /* type_namespace */    sizes.str_bytes()
        )
    }

    fn row_write(
        &self,
        data: &mut [u8],
        offset: &mut usize,
        _rid: u32,
        sizes: &TableInfoRef,
    ) -> Result<()> {
        self.resolution_scope
            .write(data, offset, sizes, CodedIndexType::ResolutionScope)?;
        write_le_at_dyn(data, offset, self.type_name, sizes.is_large_str())?;
        write_le_at_dyn(data, offset, self.type_namespace, sizes.is_large_str())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::metadata::tables::TableInfo;

    fn row() -> TypeRefRaw {
        TypeRefRaw {
            rid: 1,
            token: Token::new(0x01000001),
            resolution_scope: CodedIndex::new(TableId::AssemblyRef, 1),
            type_name: 0x0202,
            type_namespace: 0x0303,
        }
    }

    #[test]
    fn crafted_short() {
        let expected = vec![
            0x06, 0x00, // resolution_scope (tag 2 = AssemblyRef, index = 1)
            0x02, 0x02, // type_name
            0x03, 0x03, // type_namespace
        ];

        let sizes = Arc::new(TableInfo::new_test(
            &[(TableId::TypeRef, 1), (TableId::AssemblyRef, 1)],
            false,
            false,
            false,
        ));

        let mut data = vec![0u8; TypeRefRaw::row_size(&sizes) as usize];
        let mut offset = 0;
        row().row_write(&mut data, &mut offset, 1, &sizes).unwrap();
        assert_eq!(data, expected);
    }

    #[test]
    fn crafted_long() {
        let expected = vec![
            0x06, 0x00, 0x00, 0x00, // resolution_scope (tag 2 = AssemblyRef, index = 1)
            0x02, 0x02, 0x00, 0x00, // type_name
            0x03, 0x03, 0x00, 0x00, // type_namespace
        ];

        let sizes = Arc::new(TableInfo::new_test(
            &[(TableId::TypeRef, u16::MAX as u32 + 3)],
            true,
            true,
            true,
        ));

        let mut data = vec![0u8; TypeRefRaw::row_size(&sizes) as usize];
        let mut offset = 0;
        row().row_write(&mut data, &mut offset, 1, &sizes).unwrap();
        assert_eq!(data, expected);
    }

    #[test]
    fn rejects_scope_outside_resolution_scope() {
        let mut bad = row();
        bad.resolution_scope = CodedIndex::new(TableId::TypeDef, 1);

        let sizes = Arc::new(TableInfo::new_test(&[(TableId::TypeRef, 1)], false, false, false));
        let mut data = vec![0u8; TypeRefRaw::row_size(&sizes) as usize];
        let mut offset = 0;
        assert!(bad.row_write(&mut data, &mut offset, 1, &sizes).is_err());
    }
}
