//! Reference rows: scopes, type and member references, specifications and standalone
//! signatures.
//!
//! In rebuild mode these rows are created on first use: resolving a reference that has no
//! row yet inserts it on the spot, together with whatever it refers to. Identical rows are
//! shared. In preserve mode every row is inserted by its own phase at its recorded RID, and
//! references resolve to recorded tokens, which the policy reserved up front.

use crate::{
    builder::{
        context::{begin_insert, BuildContext, Slot},
        TokenMode,
    },
    metadata::{
        tables::{
            AssemblyRefRaw, CodedIndexType, MemberRefRaw, MethodSpecRaw, ModuleRefRaw,
            StandAloneSigRaw, TableId, TypeRefRaw, TypeSpecRaw,
        },
        token::Token,
    },
    model::{
        AssemblyRefId, MemberRefId, MemberRefParent, MethodHandle, MethodSpecId, ModuleRefId,
        ResolutionScope, TypeRefId, TypeSpecId,
    },
    Result,
};

impl BuildContext<'_> {
    /// `ModuleRef` and `AssemblyRef` rows, the scopes every `TypeRef` resolves against.
    pub(crate) fn populate_scopes(&mut self) -> Result<()> {
        let module = self.module;

        let order =
            self.recorded_order(TableId::ModuleRef, module.module_refs.iter().map(|e| e.token))?;
        for index in order {
            self.insert_module_ref(ModuleRefId::new(index))?;
        }

        let order = self.recorded_order(
            TableId::AssemblyRef,
            module.assembly_refs.iter().map(|e| e.token),
        )?;
        for index in order {
            self.insert_assembly_ref(AssemblyRefId::new(index))?;
        }

        Ok(())
    }

    pub(crate) fn populate_standalone_sigs(&mut self) -> Result<()> {
        let module = self.module;
        let strategy = self.signatures;
        let order = self.recorded_order(
            TableId::StandAloneSig,
            module.standalone_sigs.iter().map(|e| e.token),
        )?;

        for index in order {
            let sig = &module.standalone_sigs[index];
            let bytes = strategy.standalone_signature(&sig.signature, self)?;
            let signature = self.blobs.add(&bytes)?;

            let token = Self::claim_rid(
                &self.tables.standalone_sigs,
                sig.token,
                self.verify_recorded(),
            )?;
            self.tables.standalone_sigs.push(StandAloneSigRaw {
                rid: token.row(),
                token,
                signature,
            })?;
            self.assigned.standalone_sigs[index] = Some(token);
        }

        Ok(())
    }

    pub(crate) fn populate_type_specs(&mut self) -> Result<()> {
        let order = self.recorded_order(
            TableId::TypeSpec,
            self.module.type_specs.iter().map(|e| e.token),
        )?;
        for index in order {
            self.insert_type_spec(TypeSpecId::new(index))?;
        }
        Ok(())
    }

    pub(crate) fn populate_method_specs(&mut self) -> Result<()> {
        let order = self.recorded_order(
            TableId::MethodSpec,
            self.module.method_specs.iter().map(|e| e.token),
        )?;
        for index in order {
            self.insert_method_spec(MethodSpecId::new(index))?;
        }
        Ok(())
    }

    pub(crate) fn populate_type_refs(&mut self) -> Result<()> {
        let order = self.recorded_order(
            TableId::TypeRef,
            self.module.type_refs.iter().map(|e| e.token),
        )?;
        for index in order {
            self.insert_type_ref(TypeRefId::new(index))?;
        }
        Ok(())
    }

    pub(crate) fn populate_member_refs(&mut self) -> Result<()> {
        let order = self.recorded_order(
            TableId::MemberRef,
            self.module.member_refs.iter().map(|e| e.token),
        )?;
        for index in order {
            self.insert_member_ref(MemberRefId::new(index))?;
        }
        Ok(())
    }

    pub(crate) fn type_ref_token(&mut self, id: TypeRefId) -> Result<Token> {
        match self.mode() {
            TokenMode::Preserve => {
                self.allocated(self.module.type_ref(id)?.token, TableId::TypeRef)
            }
            TokenMode::Rebuild => self.insert_type_ref(id),
        }
    }

    pub(crate) fn type_spec_token(&mut self, id: TypeSpecId) -> Result<Token> {
        match self.mode() {
            TokenMode::Preserve => {
                self.allocated(self.module.type_spec(id)?.token, TableId::TypeSpec)
            }
            TokenMode::Rebuild => self.insert_type_spec(id),
        }
    }

    pub(crate) fn member_ref_token(&mut self, id: MemberRefId) -> Result<Token> {
        match self.mode() {
            TokenMode::Preserve => {
                self.allocated(self.module.member_ref(id)?.token, TableId::MemberRef)
            }
            TokenMode::Rebuild => self.insert_member_ref(id),
        }
    }

    fn module_ref_token(&mut self, id: ModuleRefId) -> Result<Token> {
        match self.mode() {
            TokenMode::Preserve => {
                self.allocated(self.module.module_ref(id)?.token, TableId::ModuleRef)
            }
            TokenMode::Rebuild => self.insert_module_ref(id),
        }
    }

    fn assembly_ref_token(&mut self, id: AssemblyRefId) -> Result<Token> {
        match self.mode() {
            TokenMode::Preserve => {
                self.allocated(self.module.assembly_ref(id)?.token, TableId::AssemblyRef)
            }
            TokenMode::Rebuild => self.insert_assembly_ref(id),
        }
    }

    fn scope_token(&mut self, scope: ResolutionScope) -> Result<Token> {
        match scope {
            ResolutionScope::Module => self.allocated(self.module.token, TableId::Module),
            ResolutionScope::ModuleRef(id) => self.module_ref_token(id),
            ResolutionScope::AssemblyRef(id) => self.assembly_ref_token(id),
            ResolutionScope::TypeRef(id) => self.type_ref_token(id),
        }
    }

    fn parent_token(&mut self, parent: MemberRefParent) -> Result<Token> {
        match parent {
            MemberRefParent::TypeDef(id) => {
                self.allocated(self.module.type_def(id)?.token, TableId::TypeDef)
            }
            MemberRefParent::TypeRef(id) => self.type_ref_token(id),
            MemberRefParent::ModuleRef(id) => self.module_ref_token(id),
            MemberRefParent::MethodDef(id) => {
                self.allocated(self.module.method(id)?.token, TableId::MethodDef)
            }
            MemberRefParent::TypeSpec(id) => self.type_spec_token(id),
        }
    }

    fn method_token(&mut self, method: MethodHandle) -> Result<Token> {
        match method {
            MethodHandle::Def(id) => {
                self.allocated(self.module.method(id)?.token, TableId::MethodDef)
            }
            MethodHandle::Ref(id) => self.member_ref_token(id),
        }
    }

    fn insert_module_ref(&mut self, id: ModuleRefId) -> Result<Token> {
        let index = id.index();
        if let Some(token) = begin_insert(&mut self.assigned.module_refs, index, "ModuleRef")? {
            return Ok(token);
        }

        let reference = self.module.module_ref(id)?;
        let name = self.strings.add(&reference.name)?;
        let token = Self::claim_rid(
            &self.tables.module_refs,
            reference.token,
            self.verify_recorded(),
        )?;
        self.tables.module_refs.push(ModuleRefRaw {
            rid: token.row(),
            token,
            name,
        })?;

        self.assigned.module_refs[index] = Slot::Assigned(token);
        Ok(token)
    }

    fn insert_assembly_ref(&mut self, id: AssemblyRefId) -> Result<Token> {
        let index = id.index();
        if let Some(token) = begin_insert(&mut self.assigned.assembly_refs, index, "AssemblyRef")?
        {
            return Ok(token);
        }

        let reference = self.module.assembly_ref(id)?;
        let name = self.strings.add(&reference.name)?;
        let culture = self.strings.add(&reference.culture)?;
        let public_key_or_token = self.blobs.add(&reference.public_key_or_token)?;
        let hash_value = self.blobs.add(&reference.hash_value)?;

        let token = Self::claim_rid(
            &self.tables.assembly_refs,
            reference.token,
            self.verify_recorded(),
        )?;
        self.tables.assembly_refs.push(AssemblyRefRaw {
            rid: token.row(),
            token,
            major_version: reference.version.major,
            minor_version: reference.version.minor,
            build_number: reference.version.build,
            revision_number: reference.version.revision,
            flags: reference.flags,
            public_key_or_token,
            name,
            culture,
            hash_value,
        })?;

        self.assigned.assembly_refs[index] = Slot::Assigned(token);
        Ok(token)
    }

    fn insert_type_ref(&mut self, id: TypeRefId) -> Result<Token> {
        let index = id.index();
        if let Some(token) = begin_insert(&mut self.assigned.type_refs, index, "TypeRef")? {
            return Ok(token);
        }

        let module = self.module;
        let reference = module.type_ref(id)?;
        let scope_token = self.scope_token(reference.scope)?;
        let resolution_scope = self.coded(scope_token, CodedIndexType::ResolutionScope)?;
        let type_name = self.strings.add(&reference.name)?;
        let type_namespace = self.strings.add(&reference.namespace)?;

        let key = (resolution_scope.token, type_name, type_namespace);
        if self.mode() == TokenMode::Rebuild {
            if let Some(existing) = self.dedup.type_refs.get(&key).copied() {
                log::trace!(
                    "TypeRef {}.{} shares row {}",
                    reference.namespace,
                    reference.name,
                    existing
                );
                self.assigned.type_refs[index] = Slot::Assigned(existing);
                return Ok(existing);
            }
        }

        let token = Self::claim_rid(&self.tables.type_refs, reference.token, self.verify_recorded())?;
        self.tables.type_refs.push(TypeRefRaw {
            rid: token.row(),
            token,
            resolution_scope,
            type_name,
            type_namespace,
        })?;
        log::trace!("TypeRef {}.{} -> {}", reference.namespace, reference.name, token);

        self.dedup.type_refs.insert(key, token);
        self.assigned.type_refs[index] = Slot::Assigned(token);
        Ok(token)
    }

    fn insert_member_ref(&mut self, id: MemberRefId) -> Result<Token> {
        let index = id.index();
        if let Some(token) = begin_insert(&mut self.assigned.member_refs, index, "MemberRef")? {
            return Ok(token);
        }

        let module = self.module;
        let strategy = self.signatures;
        let reference = module.member_ref(id)?;

        let parent_token = self.parent_token(reference.parent)?;
        let class = self.coded(parent_token, CodedIndexType::MemberRefParent)?;
        let name = self.strings.add(&reference.name)?;
        let bytes = strategy.member_signature(
            reference.token,
            &reference.signature,
            reference.raw_signature.as_deref(),
            self,
        )?;
        let signature = self.blobs.add(&bytes)?;

        let key = (class.token, name, signature);
        if self.mode() == TokenMode::Rebuild {
            if let Some(existing) = self.dedup.member_refs.get(&key).copied() {
                log::trace!("MemberRef {} shares row {}", reference.name, existing);
                self.assigned.member_refs[index] = Slot::Assigned(existing);
                return Ok(existing);
            }
        }

        let token = Self::claim_rid(
            &self.tables.member_refs,
            reference.token,
            self.verify_recorded(),
        )?;
        self.tables.member_refs.push(MemberRefRaw {
            rid: token.row(),
            token,
            class,
            name,
            signature,
        })?;
        log::trace!("MemberRef {} -> {}", reference.name, token);

        self.dedup.member_refs.insert(key, token);
        self.assigned.member_refs[index] = Slot::Assigned(token);
        Ok(token)
    }

    fn insert_type_spec(&mut self, id: TypeSpecId) -> Result<Token> {
        let index = id.index();
        if let Some(token) = begin_insert(&mut self.assigned.type_specs, index, "TypeSpec")? {
            return Ok(token);
        }

        let module = self.module;
        let strategy = self.signatures;
        let spec = module.type_spec(id)?;

        let bytes = strategy.typespec_signature(
            spec.token,
            &spec.signature,
            spec.raw_signature.as_deref(),
            self,
        )?;
        let signature = self.blobs.add(&bytes)?;

        let share = self.mode() == TokenMode::Rebuild && self.config.deduplicate_specifications;
        if share {
            if let Some(existing) = self.dedup.type_specs.get(&signature).copied() {
                log::trace!("TypeSpec {} shares row {}", index, existing);
                self.assigned.type_specs[index] = Slot::Assigned(existing);
                return Ok(existing);
            }
        }

        let token = Self::claim_rid(&self.tables.type_specs, spec.token, self.verify_recorded())?;
        self.tables.type_specs.push(TypeSpecRaw {
            rid: token.row(),
            token,
            signature,
        })?;

        if share {
            self.dedup.type_specs.insert(signature, token);
        }
        self.assigned.type_specs[index] = Slot::Assigned(token);
        Ok(token)
    }

    fn insert_method_spec(&mut self, id: MethodSpecId) -> Result<Token> {
        let index = id.index();
        if let Some(token) = begin_insert(&mut self.assigned.method_specs, index, "MethodSpec")? {
            return Ok(token);
        }

        let module = self.module;
        let strategy = self.signatures;
        let spec = module.method_spec(id)?;

        let method_token = self.method_token(spec.method)?;
        let method = self.coded(method_token, CodedIndexType::MethodDefOrRef)?;
        let bytes = strategy.method_spec_signature(
            spec.token,
            &spec.instantiation,
            spec.raw_signature.as_deref(),
            self,
        )?;
        let instantiation = self.blobs.add(&bytes)?;

        let key = (method.token, instantiation);
        let share = self.mode() == TokenMode::Rebuild && self.config.deduplicate_specifications;
        if share {
            if let Some(existing) = self.dedup.method_specs.get(&key).copied() {
                log::trace!("MethodSpec {} shares row {}", index, existing);
                self.assigned.method_specs[index] = Slot::Assigned(existing);
                return Ok(existing);
            }
        }

        let token = Self::claim_rid(&self.tables.method_specs, spec.token, self.verify_recorded())?;
        self.tables.method_specs.push(MethodSpecRaw {
            rid: token.row(),
            token,
            method,
            instantiation,
        })?;

        if share {
            self.dedup.method_specs.insert(key, token);
        }
        self.assigned.method_specs[index] = Slot::Assigned(token);
        Ok(token)
    }
}
