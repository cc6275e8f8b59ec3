use crate::{
    file::io::write_le_at_dyn,
    metadata::{
        tables::{RowWritable, TableId, TableInfoRef, TableRow},
        token::Token,
    },
    Result,
};

#[derive(Clone, Debug, PartialEq, Eq)]
/// The `TypeSpec` table holds type specifications described by a signature. `TableId` = 0x1B
pub struct TypeSpecRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// an index into the Blob heap
    pub signature: u32,
}

impl TableRow for TypeSpecRaw {
    const TABLE_ID: TableId = TableId::TypeSpec;

    fn rid(&self) -> u32 {
        self.rid
    }
}

impl RowWritable for TypeSpecRaw {
    fn row_size(sizes: &TableInfoRef) -> u32 {
        u32::from(/* signature */ sizes.blob_bytes())
    }

    fn row_write(
        &self,
        data: &mut [u8],
        offset: &mut usize,
        _rid: u32,
        sizes: &TableInfoRef,
    ) -> Result<()> {
        write_le_at_dyn(data, offset, self.signature, sizes.is_large_blob())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::metadata::tables::TableInfo;

    #[test]
    fn crafted_short() {
        let row = TypeSpecRaw {
            rid: 1,
            token: Token::new(0x1B000001),
            signature: 0x0101,
        };

        let sizes = Arc::new(TableInfo::new_test(&[(TableId::TypeSpec, 1)], false, false, false));
        let mut data = vec![0u8; 2];
        let mut offset = 0;
        row.row_write(&mut data, &mut offset, 1, &sizes).unwrap();
        assert_eq!(data, vec![0x01, 0x01]);
    }

    #[test]
    fn crafted_long() {
        let row = TypeSpecRaw {
            rid: 1,
            token: Token::new(0x1B000001),
            signature: 0x01010101,
        };

        let sizes = Arc::new(TableInfo::new_test(&[(TableId::TypeSpec, 1)], true, true, true));
        let mut data = vec![0u8; 4];
        let mut offset = 0;
        row.row_write(&mut data, &mut offset, 1, &sizes).unwrap();
        assert_eq!(data, vec![0x01, 0x01, 0x01, 0x01]);
    }

    #[test]
    fn small_blob_index_overflow() {
        let row = TypeSpecRaw {
            rid: 1,
            token: Token::new(0x1B000001),
            signature: 0x0001_0000,
        };

        let sizes = Arc::new(TableInfo::new_test(&[(TableId::TypeSpec, 1)], false, false, false));
        let mut data = vec![0u8; 2];
        let mut offset = 0;
        assert!(row.row_write(&mut data, &mut offset, 1, &sizes).is_err());
    }
}
