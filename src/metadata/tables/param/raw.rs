use crate::{
    file::io::{write_le_at, write_le_at_dyn},
    metadata::{
        tables::{RowWritable, TableId, TableInfoRef, TableRow},
        token::Token,
    },
    Result,
};

#[derive(Clone, Debug, PartialEq, Eq)]
/// The Param table holds information about method parameters. `TableId` = 0x08
pub struct ParamRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// a 2-byte bitmask of type `ParamAttributes`, §II.23.1.13
    pub flags: u16,
    /// a 2-byte constant
    pub sequence: u16,
    /// an index into the String heap
    pub name: u32,
}

impl TableRow for ParamRaw {
    const TABLE_ID: TableId = TableId::Param;

    fn rid(&self) -> u32 {
        self.rid
    }
}

impl RowWritable for ParamRaw {
    #[rustfmt::skip]
    fn row_size(sizes: &TableInfoRef) -> u32 {
        u32::from(
            /* flags */    2 +
            /* sequence */ 2 +
            /* name */     sizes.str_bytes()
        )
    }

    fn row_write(
        &self,
        data: &mut [u8],
        offset: &mut usize,
        _rid: u32,
        sizes: &TableInfoRef,
    ) -> Result<()> {
        write_le_at(data, offset, self.flags)?;
        write_le_at(data, offset, self.sequence)?;
        write_le_at_dyn(data, offset, self.name, sizes.is_large_str())?;
        Ok(())
    }
}
