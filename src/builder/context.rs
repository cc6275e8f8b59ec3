//! State of one in-progress build and the phase driver.
//!
//! A [`BuildContext`] owns the row stores, heaps and dedup maps of exactly one build. It reads
//! the module through a shared borrow and records every token and heap offset it assigns in
//! [`Assignments`], which are written back to the module only once the image is complete.

use rustc_hash::FxHashMap;

use crate::{
    builder::{
        heaps::{BlobHeap, GuidHeap, Heap, StringHeap, UserStringHeap},
        image::MetadataImage,
        policy::{OrderKey, TokenPolicy},
        signatures::SignatureStrategy,
        tables::TableSet,
        BuilderConfig, TokenMode,
    },
    metadata::{
        signatures::TypeResolver,
        tables::{CodedIndex, CodedIndexType, ModuleRaw, RowStore, TableId, TableInfo, TableRow},
        token::Token,
    },
    model::{ModuleDefinition, TypeHandle},
    Error, Result,
};

/// Insertion state of an entity whose row may be created on first reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Slot {
    Pending,
    InProgress,
    Assigned(Token),
}

impl Slot {
    fn token(self) -> Option<Token> {
        match self {
            Slot::Assigned(token) => Some(token),
            _ => None,
        }
    }
}

/// Marks the entity at `index` as being inserted.
///
/// Returns its token if it already has a row.
pub(crate) fn begin_insert(slots: &mut [Slot], index: usize, what: &str) -> Result<Option<Token>> {
    match slots.get_mut(index) {
        None => Err(malformed_error!("{} handle {} is out of range", what, index)),
        Some(Slot::Assigned(token)) => Ok(Some(*token)),
        Some(Slot::InProgress) => Err(malformed_error!(
            "{} {} refers to itself through its own signature or scope",
            what,
            index
        )),
        Some(slot) => {
            *slot = Slot::InProgress;
            Ok(None)
        }
    }
}

/// Tokens and heap offsets assigned by a build, written back to the module on success.
#[derive(Debug, Default)]
pub(crate) struct Assignments {
    pub(crate) type_refs: Vec<Slot>,
    pub(crate) member_refs: Vec<Slot>,
    pub(crate) type_specs: Vec<Slot>,
    pub(crate) method_specs: Vec<Slot>,
    pub(crate) assembly_refs: Vec<Slot>,
    pub(crate) module_refs: Vec<Slot>,
    pub(crate) standalone_sigs: Vec<Option<Token>>,
    pub(crate) generic_params: Vec<Option<Token>>,
    pub(crate) constraints: Vec<Option<Token>>,
    /// Generic parameter key to final `GenericParam` token
    pub(crate) generic_param_keys: FxHashMap<Token, Token>,
    pub(crate) user_strings: Vec<Option<u32>>,
    pub(crate) blobs: Vec<Option<u32>>,
}

impl Assignments {
    fn for_module(module: &ModuleDefinition) -> Self {
        Assignments {
            type_refs: vec![Slot::Pending; module.type_refs.len()],
            member_refs: vec![Slot::Pending; module.member_refs.len()],
            type_specs: vec![Slot::Pending; module.type_specs.len()],
            method_specs: vec![Slot::Pending; module.method_specs.len()],
            assembly_refs: vec![Slot::Pending; module.assembly_refs.len()],
            module_refs: vec![Slot::Pending; module.module_refs.len()],
            standalone_sigs: vec![None; module.standalone_sigs.len()],
            generic_params: vec![None; module.generic_params.len()],
            constraints: vec![None; module.generic_param_constraints.len()],
            generic_param_keys: FxHashMap::default(),
            user_strings: vec![None; module.user_strings.len()],
            blobs: vec![None; module.blobs.len()],
        }
    }

    /// Writes the assigned tokens and offsets into `module`.
    pub(crate) fn apply(self, module: &mut ModuleDefinition) {
        fn write_slots<T>(entities: &mut [T], slots: &[Slot], token: impl Fn(&mut T) -> &mut Token) {
            for (entity, slot) in entities.iter_mut().zip(slots) {
                if let Some(assigned) = slot.token() {
                    *token(entity) = assigned;
                }
            }
        }

        write_slots(&mut module.type_refs, &self.type_refs, |e| &mut e.token);
        write_slots(&mut module.member_refs, &self.member_refs, |e| &mut e.token);
        write_slots(&mut module.type_specs, &self.type_specs, |e| &mut e.token);
        write_slots(&mut module.method_specs, &self.method_specs, |e| &mut e.token);
        write_slots(&mut module.assembly_refs, &self.assembly_refs, |e| &mut e.token);
        write_slots(&mut module.module_refs, &self.module_refs, |e| &mut e.token);

        for (sig, token) in module.standalone_sigs.iter_mut().zip(&self.standalone_sigs) {
            if let Some(token) = token {
                sig.token = *token;
            }
        }
        for (param, token) in module.generic_params.iter_mut().zip(&self.generic_params) {
            if let Some(token) = token {
                param.token = *token;
            }
        }
        for (constraint, token) in module
            .generic_param_constraints
            .iter_mut()
            .zip(&self.constraints)
        {
            if let Some(token) = token {
                constraint.token = *token;
            }
            if let Some(owner) = self.generic_param_keys.get(&constraint.owner) {
                constraint.owner = *owner;
            }
        }
        for (user_string, offset) in module.user_strings.iter_mut().zip(&self.user_strings) {
            if let Some(offset) = offset {
                user_string.offset = *offset;
            }
        }
        for (blob, offset) in module.blobs.iter_mut().zip(&self.blobs) {
            if let Some(offset) = offset {
                blob.offset = *offset;
            }
        }
    }
}

/// Row content of reference tables, used to share identical rows.
#[derive(Debug, Default)]
pub(crate) struct DedupMaps {
    /// (scope, name, namespace)
    pub(crate) type_refs: FxHashMap<(Token, u32, u32), Token>,
    /// (parent, name, signature)
    pub(crate) member_refs: FxHashMap<(Token, u32, u32), Token>,
    /// signature
    pub(crate) type_specs: FxHashMap<u32, Token>,
    /// (method, instantiation)
    pub(crate) method_specs: FxHashMap<(Token, u32), Token>,
}

/// One build: the module being read, the selected strategies and everything produced so far.
pub(crate) struct BuildContext<'a> {
    pub(crate) module: &'a ModuleDefinition,
    pub(crate) config: BuilderConfig,
    pub(crate) policy: &'a dyn TokenPolicy,
    pub(crate) signatures: &'a dyn SignatureStrategy,
    pub(crate) tables: TableSet,
    pub(crate) strings: StringHeap,
    pub(crate) blobs: BlobHeap,
    pub(crate) user_strings: UserStringHeap,
    pub(crate) guids: GuidHeap,
    pub(crate) assigned: Assignments,
    pub(crate) dedup: DedupMaps,
}

impl<'a> BuildContext<'a> {
    pub(crate) fn new(
        module: &'a ModuleDefinition,
        config: BuilderConfig,
        policy: &'a dyn TokenPolicy,
        signatures: &'a dyn SignatureStrategy,
    ) -> Self {
        BuildContext {
            module,
            config,
            policy,
            signatures,
            tables: TableSet::new(),
            strings: StringHeap::new(),
            blobs: BlobHeap::new(),
            user_strings: UserStringHeap::new(),
            guids: GuidHeap::new(),
            assigned: Assignments::for_module(module),
            dedup: DedupMaps::default(),
        }
    }

    /// Runs all phases and finalizes the image.
    pub(crate) fn run(mut self) -> Result<(MetadataImage, Assignments)> {
        self.reserve()?;

        self.populate_blobs()?;
        self.populate_module()?;
        self.populate_scopes()?;
        log::debug!(
            "Phase 1: {} blobs, {} ModuleRef, {} AssemblyRef rows",
            self.blobs.len(),
            self.tables.module_refs.len(),
            self.tables.assembly_refs.len()
        );

        self.populate_standalone_sigs()?;
        self.populate_user_strings()?;
        log::debug!(
            "Phase 2: {} StandAloneSig rows, {} user strings",
            self.tables.standalone_sigs.len(),
            self.user_strings.len()
        );

        self.populate_type_specs()?;
        self.populate_method_specs()?;
        log::debug!(
            "Phase 3: {} TypeSpec, {} MethodSpec rows",
            self.tables.type_specs.len(),
            self.tables.method_specs.len()
        );

        self.populate_generic_params()?;
        self.populate_generic_param_constraints()?;
        log::debug!(
            "Phase 4: {} GenericParam, {} GenericParamConstraint rows",
            self.tables.generic_params.len(),
            self.tables.generic_param_constraints.len()
        );

        self.populate_type_refs()?;
        self.populate_member_refs()?;
        log::debug!(
            "Phase 5: {} TypeRef, {} MemberRef rows",
            self.tables.type_refs.len(),
            self.tables.member_refs.len()
        );

        self.populate_fields()?;
        self.populate_methods()?;
        log::debug!(
            "Phase 6: {} Field, {} MethodDef, {} Param rows",
            self.tables.fields.len(),
            self.tables.methods.len(),
            self.tables.params.len()
        );

        self.populate_type_defs()?;
        self.populate_nested_classes()?;
        log::debug!(
            "Phase 7: {} TypeDef, {} NestedClass rows",
            self.tables.type_defs.len(),
            self.tables.nested_classes.len()
        );

        self.finish()
    }

    /// Makes rows referenceable before their phase: definition tables in every mode (their
    /// tokens are attached up front), every policy-ordered table in preserve mode.
    fn reserve(&mut self) -> Result<()> {
        let module = self.module;
        self.tables.reserve(TableId::TypeDef, module.types.len())?;
        self.tables.reserve(TableId::Field, module.fields.len())?;
        self.tables.reserve(TableId::MethodDef, module.methods.len())?;
        self.tables.reserve(
            TableId::Param,
            module.methods.iter().map(|m| m.parameters.len()).sum(),
        )?;

        if self.mode() == TokenMode::Preserve {
            let recorded: [(TableId, Vec<Token>); 9] = [
                (TableId::TypeRef, module.type_refs.iter().map(|e| e.token).collect()),
                (TableId::MemberRef, module.member_refs.iter().map(|e| e.token).collect()),
                (TableId::TypeSpec, module.type_specs.iter().map(|e| e.token).collect()),
                (TableId::MethodSpec, module.method_specs.iter().map(|e| e.token).collect()),
                (TableId::AssemblyRef, module.assembly_refs.iter().map(|e| e.token).collect()),
                (TableId::ModuleRef, module.module_refs.iter().map(|e| e.token).collect()),
                (TableId::StandAloneSig, module.standalone_sigs.iter().map(|e| e.token).collect()),
                (TableId::GenericParam, module.generic_params.iter().map(|e| e.token).collect()),
                (
                    TableId::GenericParamConstraint,
                    module.generic_param_constraints.iter().map(|e| e.token).collect(),
                ),
            ];

            for (table, tokens) in recorded {
                let count = tokens.len();
                self.recorded_order(table, tokens.into_iter())?;
                self.tables.reserve(table, count)?;
            }
        }

        Ok(())
    }

    pub(crate) fn mode(&self) -> TokenMode {
        self.policy.mode()
    }

    /// Insertion order of a table whose rebuild order is its collection order.
    pub(crate) fn recorded_order(
        &self,
        table: TableId,
        tokens: impl Iterator<Item = Token>,
    ) -> Result<Vec<usize>> {
        let keys: Vec<OrderKey> = tokens
            .enumerate()
            .map(|(index, token)| OrderKey::new(token, index as u64))
            .collect();
        self.policy.order(table, &keys)
    }

    /// The RID the next row of `store` receives, checked against the entity's recorded token
    /// when `verify` is set.
    pub(crate) fn claim_rid<T: TableRow>(
        store: &RowStore<T>,
        recorded: Token,
        verify: bool,
    ) -> Result<Token> {
        let token = store.next_token()?;
        if verify && recorded != token {
            return Err(Error::TokenMismatch {
                expected: recorded,
                actual: token,
            });
        }
        Ok(token)
    }

    /// Whether reference rows are checked against recorded tokens.
    pub(crate) fn verify_recorded(&self) -> bool {
        self.mode() == TokenMode::Preserve
    }

    /// Encodes a reference to an allocated row in `scheme`.
    pub(crate) fn coded(&self, token: Token, scheme: CodedIndexType) -> Result<CodedIndex> {
        if token.is_null() {
            return Ok(CodedIndex::null());
        }

        scheme.encode(token)?;
        if !self.tables.is_allocated(token) {
            return Err(Error::UnresolvedToken(token));
        }

        CodedIndex::try_from(token)
    }

    /// Returns `token` if it names an allocated row of `table`.
    pub(crate) fn allocated(&self, token: Token, table: TableId) -> Result<Token> {
        if token.is_table(table) && self.tables.is_allocated(token) {
            Ok(token)
        } else {
            Err(Error::UnresolvedToken(token))
        }
    }

    /// Token of a type referenced from a signature, constraint or `extends` clause.
    pub(crate) fn type_token(&mut self, handle: TypeHandle) -> Result<Token> {
        match handle {
            TypeHandle::Def(id) => self.allocated(self.module.type_def(id)?.token, TableId::TypeDef),
            TypeHandle::Ref(id) => self.type_ref_token(id),
            TypeHandle::Spec(id) => self.type_spec_token(id),
        }
    }

    fn populate_blobs(&mut self) -> Result<()> {
        let module = self.module;
        let offsets: Vec<u32> = module.blobs.iter().map(|b| b.offset).collect();

        for index in self.policy.order_heap(&offsets) {
            let blob = &module.blobs[index];
            let offset = self.blobs.add(&blob.data)?;
            self.check_heap_offset("#Blob", blob.offset, offset)?;
            self.assigned.blobs[index] = Some(offset);
        }

        Ok(())
    }

    fn populate_user_strings(&mut self) -> Result<()> {
        let module = self.module;
        let offsets: Vec<u32> = module.user_strings.iter().map(|s| s.offset).collect();

        for index in self.policy.order_heap(&offsets) {
            let user_string = &module.user_strings[index];
            let offset = self.user_strings.add(&user_string.value)?;
            self.check_heap_offset("#US", user_string.offset, offset)?;
            self.assigned.user_strings[index] = Some(offset);
        }

        Ok(())
    }

    fn check_heap_offset(&self, heap: &'static str, expected: u32, actual: u32) -> Result<()> {
        if self.verify_recorded() && self.config.verify_heap_offsets && expected != actual {
            return Err(Error::HeapOffsetMismatch {
                heap,
                expected,
                actual,
            });
        }
        Ok(())
    }

    fn populate_module(&mut self) -> Result<()> {
        let module = self.module;
        let token = Self::claim_rid(&self.tables.module, module.token, true)?;
        let name = self.strings.add(&module.name)?;
        let mvid = self.guids.add(module.mvid)?;

        self.tables.module.push(ModuleRaw {
            rid: token.row(),
            token,
            generation: module.generation,
            name,
            mvid,
            encid: 0,
            encbaseid: 0,
        })?;
        Ok(())
    }

    fn finish(self) -> Result<(MetadataImage, Assignments)> {
        if let Some((table, _reserved, rows)) = self.tables.first_incomplete() {
            return Err(Error::UnresolvedToken(Token::from_parts(table, rows + 1)));
        }

        let table_info = TableInfo::from_counts(
            &self.tables.row_counts(),
            self.strings.size(),
            self.guids.size(),
            self.blobs.size(),
        );

        let image = MetadataImage::new(
            self.tables,
            self.strings,
            self.blobs,
            self.user_strings,
            self.guids,
            table_info,
        );
        Ok((image, self.assigned))
    }
}

impl TypeResolver for BuildContext<'_> {
    fn resolve_type(&mut self, handle: TypeHandle) -> Result<Token> {
        self.type_token(handle)
    }
}
