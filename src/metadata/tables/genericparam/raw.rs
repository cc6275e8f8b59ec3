use crate::{
    file::io::{write_le_at, write_le_at_dyn},
    metadata::{
        tables::{CodedIndex, CodedIndexType, RowWritable, TableId, TableInfoRef, TableRow},
        token::Token,
    },
    Result,
};

#[derive(Clone, Debug, PartialEq, Eq)]
/// The `GenericParam` table defines generic parameters for generic types and methods. `TableId` = 0x2A
pub struct GenericParamRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// a 2-byte index of the generic parameter, numbered left-to-right, from zero
    pub number: u16,
    /// a 2-byte bitmask of type `GenericParamAttributes`, §II.23.1.7
    pub flags: u16,
    /// an index into the `TypeDef` or `MethodDef` table; more precisely, a `TypeOrMethodDef`
    pub owner: CodedIndex,
    /// an index into the String heap
    pub name: u32,
}

impl TableRow for GenericParamRaw {
    const TABLE_ID: TableId = TableId::GenericParam;

    fn rid(&self) -> u32 {
        self.rid
    }
}

impl RowWritable for GenericParamRaw {
    #[rustfmt::skip]
    fn row_size(sizes: &TableInfoRef) -> u32 {
        u32::from(
            /* number */ 2 +
            /* flags */  2 +
            /* owner */  sizes.coded_index_bytes(CodedIndexType::TypeOrMethodDef) +
            /* name */   sizes.str_bytes()
        )
    }

    fn row_write(
        &self,
        data: &mut [u8],
        offset: &mut usize,
        _rid: u32,
        sizes: &TableInfoRef,
    ) -> Result<()> {
        write_le_at(data, offset, self.number)?;
        write_le_at(data, offset, self.flags)?;
        self.owner
            .write(data, offset, sizes, CodedIndexType::TypeOrMethodDef)?;
        write_le_at_dyn(data, offset, self.name, sizes.is_large_str())?;
        Ok(())
    }
}
