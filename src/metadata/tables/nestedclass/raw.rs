use crate::{
    file::io::write_le_at_dyn,
    metadata::{
        tables::{RowWritable, TableId, TableInfoRef, TableRow},
        token::Token,
    },
    Result,
};

#[derive(Clone, Debug, PartialEq, Eq)]
/// The `NestedClass` table defines the relationship between nested types and their enclosing types. `TableId` = 0x29
pub struct NestedClassRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// an index into the `TypeDef` table
    pub nested_class: u32,
    /// an index into the `TypeDef` table
    pub enclosing_class: u32,
}

impl TableRow for NestedClassRaw {
    const TABLE_ID: TableId = TableId::NestedClass;

    fn rid(&self) -> u32 {
        self.rid
    }
}

impl RowWritable for NestedClassRaw {
    #[rustfmt::skip]
    fn row_size(sizes: &TableInfoRef) -> u32 {
        u32::from(
            /* nested_class */    sizes.table_index_bytes(TableId::TypeDef) +
            /* enclosing_class */ sizes.table_index_bytes(TableId::TypeDef)
        )
    }

    fn row_write(
        &self,
        data: &mut [u8],
        offset: &mut usize,
        _rid: u32,
        sizes: &TableInfoRef,
    ) -> Result<()> {
        let is_large = sizes.is_large(TableId::TypeDef);
        write_le_at_dyn(data, offset, self.nested_class, is_large)?;
        write_le_at_dyn(data, offset, self.enclosing_class, is_large)?;
        Ok(())
    }
}
