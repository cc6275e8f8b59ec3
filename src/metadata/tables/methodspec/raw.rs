use crate::{
    file::io::write_le_at_dyn,
    metadata::{
        tables::{CodedIndex, CodedIndexType, RowWritable, TableId, TableInfoRef, TableRow},
        token::Token,
    },
    Result,
};

#[derive(Clone, Debug, PartialEq, Eq)]
/// The `MethodSpec` table holds instantiations of generic methods. `TableId` = 0x2B
pub struct MethodSpecRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// an index into the `MethodDef` or `MemberRef` table; more precisely, a `MethodDefOrRef`
    pub method: CodedIndex,
    /// an index into the Blob heap
    pub instantiation: u32,
}

impl TableRow for MethodSpecRaw {
    const TABLE_ID: TableId = TableId::MethodSpec;

    fn rid(&self) -> u32 {
        self.rid
    }
}

impl RowWritable for MethodSpecRaw {
    #[rustfmt::skip]
    fn row_size(sizes: &TableInfoRef) -> u32 {
        u32::from(
            /* method */        sizes.coded_index_bytes(CodedIndexType::MethodDefOrRef) +
            /* instantiation */ sizes.blob_bytes()
        )
    }

    fn row_write(
        &self,
        data: &mut [u8],
        offset: &mut usize,
        _rid: u32,
        sizes: &TableInfoRef,
    ) -> Result<()> {
        self.method
            .write(data, offset, sizes, CodedIndexType::MethodDefOrRef)?;
        write_le_at_dyn(data, offset, self.instantiation, sizes.is_large_blob())?;
        Ok(())
    }
}
