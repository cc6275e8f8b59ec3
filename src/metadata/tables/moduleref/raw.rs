use crate::{
    file::io::write_le_at_dyn,
    metadata::{
        tables::{RowWritable, TableId, TableInfoRef, TableRow},
        token::Token,
    },
    Result,
};

#[derive(Clone, Debug, PartialEq, Eq)]
/// The `ModuleRef` table references other modules by name. `TableId` = 0x1A
pub struct ModuleRefRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// an index into the String heap
    pub name: u32,
}

impl TableRow for ModuleRefRaw {
    const TABLE_ID: TableId = TableId::ModuleRef;

    fn rid(&self) -> u32 {
        self.rid
    }
}

impl RowWritable for ModuleRefRaw {
    fn row_size(sizes: &TableInfoRef) -> u32 {
        u32::from(/* name */ sizes.str_bytes())
    }

    fn row_write(
        &self,
        data: &mut [u8],
        offset: &mut usize,
        _rid: u32,
        sizes: &TableInfoRef,
    ) -> Result<()> {
        write_le_at_dyn(data, offset, self.name, sizes.is_large_str())
    }
}
