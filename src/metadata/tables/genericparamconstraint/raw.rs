use crate::{
    file::io::write_le_at_dyn,
    metadata::{
        tables::{CodedIndex, CodedIndexType, RowWritable, TableId, TableInfoRef, TableRow},
        token::Token,
    },
    Result,
};

#[derive(Clone, Debug, PartialEq, Eq)]
/// The `GenericParamConstraint` table defines constraints on generic parameters. `TableId` = 0x2C
pub struct GenericParamConstraintRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// an index into the `GenericParam` table
    pub owner: u32,
    /// an index into the `TypeDef`, `TypeRef`, or `TypeSpec` tables; more precisely, a `TypeDefOrRef`
    pub constraint: CodedIndex,
}

impl TableRow for GenericParamConstraintRaw {
    const TABLE_ID: TableId = TableId::GenericParamConstraint;

    fn rid(&self) -> u32 {
        self.rid
    }
}

impl RowWritable for GenericParamConstraintRaw {
    #[rustfmt::skip]
    fn row_size(sizes: &TableInfoRef) -> u32 {
        u32::from(
            /* owner */      sizes.table_index_bytes(TableId::GenericParam) +
            /* constraint */ sizes.coded_index_bytes(CodedIndexType::TypeDefOrRef)
        )
    }

    fn row_write(
        &self,
        data: &mut [u8],
        offset: &mut usize,
        _rid: u32,
        sizes: &TableInfoRef,
    ) -> Result<()> {
        write_le_at_dyn(data, offset, self.owner, sizes.is_large(TableId::GenericParam))?;
        self.constraint
            .write(data, offset, sizes, CodedIndexType::TypeDefOrRef)?;
        Ok(())
    }
}
