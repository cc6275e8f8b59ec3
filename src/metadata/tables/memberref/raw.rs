use crate::{
    file::io::write_le_at_dyn,
    metadata::{
        tables::{CodedIndex, CodedIndexType, RowWritable, TableId, TableInfoRef, TableRow},
        token::Token,
    },
    Result,
};

#[derive(Clone, Debug, PartialEq, Eq)]
/// The `MemberRef` table combines references to methods and fields of a class. `TableId` = 0x0A
pub struct MemberRefRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// an index into the `MethodDef`, `ModuleRef`, `TypeDef`, `TypeRef`, or `TypeSpec` tables; more precisely, a `MemberRefParent`
    pub class: CodedIndex,
    /// an index into the String heap
    pub name: u32,
    /// an index into the Blob heap
    pub signature: u32,
}

impl TableRow for MemberRefRaw {
    const TABLE_ID: TableId = TableId::MemberRef;

    fn rid(&self) -> u32 {
        self.rid
    }
}

impl RowWritable for MemberRefRaw {
    #[rustfmt::skip]
    fn row_size(sizes: &TableInfoRef) -> u32 {
        u32::from(
            /* class */     sizes.coded_index_bytes(CodedIndexType::MemberRefParent) +
            /* name */      sizes.str_bytes() +
            /* signature */ sizes.blob_bytes()
        )
    }

    fn row_write(
        &self,
        data: &mut [u8],
        offset: &mut usize,
        _rid: u32,
        sizes: &TableInfoRef,
    ) -> Result<()> {
        self.class
            .write(data, offset, sizes, CodedIndexType::MemberRefParent)?;
        write_le_at_dyn(data, offset, self.name, sizes.is_large_str())?;
        write_le_at_dyn(data, offset, self.signature, sizes.is_large_blob())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::metadata::tables::TableInfo;

    fn row() -> MemberRefRaw {
        MemberRefRaw {
            rid: 1,
            token: Token::new(0x0A000001),
            class: CodedIndex::new(TableId::TypeSpec, 2),
            name: 0x0202,
            signature: 0x0303,
        }
    }

    #[test]
    fn crafted_short() {
        let expected = vec![
            0x14, 0x00, // class (tag 4 = TypeSpec, index = 2)
            0x02, 0x02, // name
            0x03, 0x03, // signature
        ];

        let sizes = Arc::new(TableInfo::new_test(
            &[(TableId::MemberRef, 1), (TableId::TypeSpec, 2)],
            false,
            false,
            false,
        ));

        let mut data = vec![0u8; MemberRefRaw::row_size(&sizes) as usize];
        let mut offset = 0;
        row().row_write(&mut data, &mut offset, 1, &sizes).unwrap();
        assert_eq!(data, expected);
    }

    #[test]
    fn crafted_long() {
        let expected = vec![
            0x14, 0x00, 0x00, 0x00, // class (tag 4 = TypeSpec, index = 2)
            0x02, 0x02, 0x00, 0x00, // name
            0x03, 0x03, 0x00, 0x00, // signature
        ];

        let sizes = Arc::new(TableInfo::new_test(
            &[(TableId::MemberRef, 1), (TableId::TypeSpec, u16::MAX as u32 + 3)],
            true,
            true,
            true,
        ));

        let mut data = vec![0u8; MemberRefRaw::row_size(&sizes) as usize];
        let mut offset = 0;
        row().row_write(&mut data, &mut offset, 1, &sizes).unwrap();
        assert_eq!(data, expected);
    }
}
