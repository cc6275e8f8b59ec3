use crate::{
    file::io::{write_le_at, write_le_at_dyn},
    metadata::{
        tables::{RowWritable, TableId, TableInfoRef, TableRow},
        token::Token,
    },
    Result,
};

#[derive(Clone, Debug, PartialEq, Eq)]
/// The `Module` table provides information about the current module. `TableId` = 0x00
pub struct ModuleRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// a 2-byte value, reserved, shall be zero
    pub generation: u16,
    /// an index into the String heap
    pub name: u32,
    /// an index into the Guid heap; the MVID
    pub mvid: u32,
    /// an index into the Guid heap; reserved, shall be zero
    pub encid: u32,
    /// an index into the Guid heap; reserved, shall be zero
    pub encbaseid: u32,
}

impl TableRow for ModuleRaw {
    const TABLE_ID: TableId = TableId::Module;

    fn rid(&self) -> u32 {
        self.rid
    }
}

impl RowWritable for ModuleRaw {
    #[rustfmt::skip]
    fn row_size(sizes: &TableInfoRef) -> u32 {
        u32::from(
            /* generation */ 2 +
            /* name */       sizes.str_bytes() +
            /* mvid */       sizes.guid_bytes() +
            /* encid */      sizes.guid_bytes() +
            /* encbaseid */  sizes.guid_bytes()
        )
    }

    fn row_write(
        &self,
        data: &mut [u8],
        offset: &mut usize,
        _rid: u32,
        sizes: &TableInfoRef,
    ) -> Result<()> {
        write_le_at(data, offset, self.generation)?;
        write_le_at_dyn(data, offset, self.name, sizes.is_large_str())?;
        write_le_at_dyn(data, offset, self.mvid, sizes.is_large_guid())?;
        write_le_at_dyn(data, offset, self.encid, sizes.is_large_guid())?;
        write_le_at_dyn(data, offset, self.encbaseid, sizes.is_large_guid())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::metadata::tables::TableInfo;

    fn row() -> ModuleRaw {
        ModuleRaw {
            rid: 1,
            token: Token::new(0x00000001),
            generation: 0x0101,
            name: 0x0202,
            mvid: 0x0303,
            encid: 0,
            encbaseid: 0,
        }
    }

    #[test]
    fn crafted_short() {
        let expected = vec![
            0x01, 0x01, // generation
            0x02, 0x02, // name
            0x03, 0x03, // mvid
            0x00, 0x00, // encid
            0x00, 0x00, // encbaseid
        ];

        let sizes = Arc::new(TableInfo::new_test(&[(TableId::Module, 1)], false, false, false));
        assert_eq!(ModuleRaw::row_size(&sizes) as usize, expected.len());

        let mut data = vec![0u8; expected.len()];
        let mut offset = 0;
        row().row_write(&mut data, &mut offset, 1, &sizes).unwrap();
        assert_eq!(data, expected);
    }

    #[test]
    fn crafted_long() {
        let expected = vec![
            0x01, 0x01, // generation
            0x02, 0x02, 0x00, 0x00, // name
            0x03, 0x03, 0x00, 0x00, // mvid
            0x00, 0x00, 0x00, 0x00, // encid
            0x00, 0x00, 0x00, 0x00, // encbaseid
        ];

        let sizes = Arc::new(TableInfo::new_test(&[(TableId::Module, 1)], true, true, true));
        assert_eq!(ModuleRaw::row_size(&sizes) as usize, expected.len());

        let mut data = vec![0u8; expected.len()];
        let mut offset = 0;
        row().row_write(&mut data, &mut offset, 1, &sizes).unwrap();
        assert_eq!(data, expected);
    }
}
