use crate::{
    file::io::write_le_at_dyn,
    metadata::{
        tables::{RowWritable, TableId, TableInfoRef, TableRow},
        token::Token,
    },
    Result,
};

#[derive(Clone, Debug, PartialEq, Eq)]
/// The `StandAloneSig` table stores signatures that are not attached to a member. `TableId` = 0x11
pub struct StandAloneSigRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// an index into the Blob heap
    pub signature: u32,
}

impl TableRow for StandAloneSigRaw {
    const TABLE_ID: TableId = TableId::StandAloneSig;

    fn rid(&self) -> u32 {
        self.rid
    }
}

impl RowWritable for StandAloneSigRaw {
    fn row_size(sizes: &TableInfoRef) -> u32 {
        u32::from(sizes.blob_bytes())
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
    fn crafted_short_and_long() {
        let row = StandAloneSigRaw {
            rid: 1,
            token: Token::new(0x11000001),
            signature: 0x0101,
        };

        for (large, expected) in [
            (false, vec![0x01, 0x01]),
            (true, vec![0x01, 0x01, 0x00, 0x00]),
        ] {
            let sizes = Arc::new(TableInfo::new_test(
                &[(TableId::StandAloneSig, 1)],
                false,
                large,
                false,
            ));
            let mut data = vec![0u8; StandAloneSigRaw::row_size(&sizes) as usize];
            let mut offset = 0;
            row.row_write(&mut data, &mut offset, 1, &sizes).unwrap();
            assert_eq!(data, expected);
        }
    }
}
