//! The row stores of all tables a build populates.

use crate::{
    metadata::{
        tables::{
            AssemblyRefRaw, FieldRaw, GenericParamConstraintRaw, GenericParamRaw, MemberRefRaw,
            MethodDefRaw, MethodSpecRaw, ModuleRaw, ModuleRefRaw, NestedClassRaw, ParamRaw,
            RowStore, RowWritable, StandAloneSigRaw, TableId, TableInfoRef, TableRow, TypeDefRaw,
            TypeRefRaw, TypeSpecRaw,
        },
        token::Token,
    },
    utils::to_u32,
    Result,
};

/// Table-independent view of a [`RowStore`].
pub(crate) trait TableStore {
    fn row_count(&self) -> u32;
    fn reserve_rows(&mut self, count: u32);
    fn reserved_rows(&self) -> u32;
    fn allocated(&self, rid: u32) -> bool;
    fn bytes(&self, sizes: &TableInfoRef) -> Result<Vec<u8>>;
}

impl<T: TableRow + RowWritable> TableStore for RowStore<T> {
    fn row_count(&self) -> u32 {
        // RowStore caps its length at the 24-bit RID space
        u32::try_from(self.len()).unwrap_or(u32::MAX)
    }

    fn reserve_rows(&mut self, count: u32) {
        self.reserve(count);
    }

    fn reserved_rows(&self) -> u32 {
        self.reserved()
    }

    fn allocated(&self, rid: u32) -> bool {
        self.is_allocated(rid)
    }

    fn bytes(&self, sizes: &TableInfoRef) -> Result<Vec<u8>> {
        self.to_bytes(sizes)
    }
}

/// Every table the builder writes, one append-only [`RowStore`] each.
#[derive(Debug, Clone, Default)]
pub struct TableSet {
    /// `Module` (0x00)
    pub module: RowStore<ModuleRaw>,
    /// `TypeRef` (0x01)
    pub type_refs: RowStore<TypeRefRaw>,
    /// `TypeDef` (0x02)
    pub type_defs: RowStore<TypeDefRaw>,
    /// `Field` (0x04)
    pub fields: RowStore<FieldRaw>,
    /// `MethodDef` (0x06)
    pub methods: RowStore<MethodDefRaw>,
    /// `Param` (0x08)
    pub params: RowStore<ParamRaw>,
    /// `MemberRef` (0x0A)
    pub member_refs: RowStore<MemberRefRaw>,
    /// `StandAloneSig` (0x11)
    pub standalone_sigs: RowStore<StandAloneSigRaw>,
    /// `ModuleRef` (0x1A)
    pub module_refs: RowStore<ModuleRefRaw>,
    /// `TypeSpec` (0x1B)
    pub type_specs: RowStore<TypeSpecRaw>,
    /// `AssemblyRef` (0x23)
    pub assembly_refs: RowStore<AssemblyRefRaw>,
    /// `NestedClass` (0x29)
    pub nested_classes: RowStore<NestedClassRaw>,
    /// `GenericParam` (0x2A)
    pub generic_params: RowStore<GenericParamRaw>,
    /// `MethodSpec` (0x2B)
    pub method_specs: RowStore<MethodSpecRaw>,
    /// `GenericParamConstraint` (0x2C)
    pub generic_param_constraints: RowStore<GenericParamConstraintRaw>,
}

/// Tables in stream order.
const BUILT_TABLES: [TableId; 15] = [
    TableId::Module,
    TableId::TypeRef,
    TableId::TypeDef,
    TableId::Field,
    TableId::MethodDef,
    TableId::Param,
    TableId::MemberRef,
    TableId::StandAloneSig,
    TableId::ModuleRef,
    TableId::TypeSpec,
    TableId::AssemblyRef,
    TableId::NestedClass,
    TableId::GenericParam,
    TableId::MethodSpec,
    TableId::GenericParamConstraint,
];

impl TableSet {
    /// Creates empty tables.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn store(&self, table: TableId) -> Option<&dyn TableStore> {
        let store: &dyn TableStore = match table {
            TableId::Module => &self.module,
            TableId::TypeRef => &self.type_refs,
            TableId::TypeDef => &self.type_defs,
            TableId::Field => &self.fields,
            TableId::MethodDef => &self.methods,
            TableId::Param => &self.params,
            TableId::MemberRef => &self.member_refs,
            TableId::StandAloneSig => &self.standalone_sigs,
            TableId::ModuleRef => &self.module_refs,
            TableId::TypeSpec => &self.type_specs,
            TableId::AssemblyRef => &self.assembly_refs,
            TableId::NestedClass => &self.nested_classes,
            TableId::GenericParam => &self.generic_params,
            TableId::MethodSpec => &self.method_specs,
            TableId::GenericParamConstraint => &self.generic_param_constraints,
            _ => return None,
        };
        Some(store)
    }

    pub(crate) fn store_mut(&mut self, table: TableId) -> Option<&mut dyn TableStore> {
        let store: &mut dyn TableStore = match table {
            TableId::Module => &mut self.module,
            TableId::TypeRef => &mut self.type_refs,
            TableId::TypeDef => &mut self.type_defs,
            TableId::Field => &mut self.fields,
            TableId::MethodDef => &mut self.methods,
            TableId::Param => &mut self.params,
            TableId::MemberRef => &mut self.member_refs,
            TableId::StandAloneSig => &mut self.standalone_sigs,
            TableId::ModuleRef => &mut self.module_refs,
            TableId::TypeSpec => &mut self.type_specs,
            TableId::AssemblyRef => &mut self.assembly_refs,
            TableId::NestedClass => &mut self.nested_classes,
            TableId::GenericParam => &mut self.generic_params,
            TableId::MethodSpec => &mut self.method_specs,
            TableId::GenericParamConstraint => &mut self.generic_param_constraints,
            _ => return None,
        };
        Some(store)
    }

    /// Number of rows in `table`, 0 for tables the builder does not write.
    #[must_use]
    pub fn row_count(&self, table: TableId) -> u32 {
        self.store(table).map_or(0, |store| store.row_count())
    }

    /// `(table, rows)` for every non-empty table, in stream order.
    #[must_use]
    pub fn row_counts(&self) -> Vec<(TableId, u32)> {
        BUILT_TABLES
            .iter()
            .map(|table| (*table, self.row_count(*table)))
            .filter(|(_, rows)| *rows > 0)
            .collect()
    }

    /// Makes RIDs `1..=count` of `table` referenceable ahead of their rows.
    ///
    /// # Errors
    /// Returns an error for a table the builder does not write.
    pub fn reserve(&mut self, table: TableId, count: usize) -> Result<()> {
        let count = to_u32(count)?;
        match self.store_mut(table) {
            Some(store) => {
                store.reserve_rows(count);
                Ok(())
            }
            None => Err(malformed_error!("{} rows are not built", table.name())),
        }
    }

    /// Returns true if `token` names an appended or reserved row.
    #[must_use]
    pub fn is_allocated(&self, token: Token) -> bool {
        token
            .table_id()
            .ok()
            .and_then(|table| self.store(table))
            .is_some_and(|store| store.allocated(token.row()))
    }

    /// Returns the first table whose reservations were not all filled, with the reserved
    /// and the appended row counts.
    #[must_use]
    pub fn first_incomplete(&self) -> Option<(TableId, u32, u32)> {
        BUILT_TABLES.iter().find_map(|table| {
            let store = self.store(*table)?;
            (store.row_count() < store.reserved_rows())
                .then(|| (*table, store.reserved_rows(), store.row_count()))
        })
    }

    /// Serializes `table` as fixed-width rows; empty for tables the builder does not write.
    ///
    /// # Errors
    /// Returns an error if a row cannot be written with the given index widths.
    pub fn table_bytes(&self, table: TableId, sizes: &TableInfoRef) -> Result<Vec<u8>> {
        match self.store(table) {
            Some(store) => store.bytes(sizes),
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserve_and_allocation() {
        let mut tables = TableSet::new();
        assert!(!tables.is_allocated(Token::new(0x0200_0001)));

        tables.reserve(TableId::TypeDef, 2).unwrap();
        assert!(tables.is_allocated(Token::new(0x0200_0001)));
        assert!(tables.is_allocated(Token::new(0x0200_0002)));
        assert!(!tables.is_allocated(Token::new(0x0200_0003)));
        assert!(!tables.is_allocated(Token::new(0x0200_0000)));

        assert_eq!(tables.first_incomplete(), Some((TableId::TypeDef, 2, 0)));
        assert!(tables.reserve(TableId::Event, 1).is_err());
    }

    #[test]
    fn test_row_counts() {
        let mut tables = TableSet::new();
        tables
            .module_refs
            .push(ModuleRefRaw {
                rid: 1,
                token: Token::new(0x1A00_0001),
                name: 1,
            })
            .unwrap();

        assert_eq!(tables.row_count(TableId::ModuleRef), 1);
        assert_eq!(tables.row_count(TableId::Event), 0);
        assert_eq!(tables.row_counts(), vec![(TableId::ModuleRef, 1)]);
        assert!(tables.first_incomplete().is_none());
    }
}
