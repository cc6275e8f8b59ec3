//! The module being written and the collections the builder reads.

use crate::{
    metadata::token::Token,
    model::{
        AssemblyRefId, AssemblyReference, BlobEntry, FieldDefinition, FieldId, GenericParameter,
        GenericParameterConstraint, MemberRefId, MemberReference, MethodDefinition, MethodId,
        MethodSpecId, MethodSpecification, ModuleRefId, ModuleReference, StandAloneSignature,
        TypeDefId, TypeDefinition, TypeRefId, TypeReference, TypeSpecId, TypeSpecification,
        UserString,
    },
    Result,
};

macro_rules! entity_lookup {
    ($get:ident, $field:ident, $id:ty, $entity:ty, $what:literal) => {
        #[doc = concat!("Returns the ", $what, " behind `id`.")]
        ///
        /// # Errors
        /// Returns [`crate::Error::Malformed`] for a dangling handle.
        pub fn $get(&self, id: $id) -> Result<&$entity> {
            self.$field.get(id.index()).ok_or_else(|| {
                malformed_error!(
                    "{} handle {} is out of range ({} entries)",
                    $what,
                    id.index(),
                    self.$field.len()
                )
            })
        }
    };
}

/// An in-memory .NET module: every entity the metadata builder turns into rows and heaps.
///
/// Entities are stored in plain vectors and refer to each other through typed handles. The
/// builder reads these collections and writes back the tokens (and type member ranges) it
/// assigned; it never adds or removes entities.
#[derive(Clone, Debug)]
pub struct ModuleDefinition {
    /// Always `0x00000001`
    pub token: Token,
    /// Module file name
    pub name: String,
    /// Module version id
    pub mvid: uguid::Guid,
    /// Reserved, zero for regular modules
    pub generation: u16,
    /// Defined types
    pub types: Vec<TypeDefinition>,
    /// Defined fields, each owned by one type
    pub fields: Vec<FieldDefinition>,
    /// Defined methods, each owned by one type
    pub methods: Vec<MethodDefinition>,
    /// Referenced types
    pub type_refs: Vec<TypeReference>,
    /// Referenced fields and methods
    pub member_refs: Vec<MemberReference>,
    /// Constructed types
    pub type_specs: Vec<TypeSpecification>,
    /// Generic method instantiations
    pub method_specs: Vec<MethodSpecification>,
    /// Generic parameters of types and methods
    pub generic_params: Vec<GenericParameter>,
    /// Constraints on generic parameters
    pub generic_param_constraints: Vec<GenericParameterConstraint>,
    /// Local variable and call site signatures
    pub standalone_sigs: Vec<StandAloneSignature>,
    /// `ldstr` literals
    pub user_strings: Vec<UserString>,
    /// Blob content known ahead of its rows
    pub blobs: Vec<BlobEntry>,
    /// Referenced assemblies
    pub assembly_refs: Vec<AssemblyReference>,
    /// Referenced modules
    pub module_refs: Vec<ModuleReference>,
}

impl ModuleDefinition {
    /// Creates an empty module with a zero MVID.
    pub fn new(name: impl Into<String>) -> Self {
        ModuleDefinition {
            token: Token::new(0x0000_0001),
            name: name.into(),
            mvid: uguid::Guid::ZERO,
            generation: 0,
            types: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            type_refs: Vec::new(),
            member_refs: Vec::new(),
            type_specs: Vec::new(),
            method_specs: Vec::new(),
            generic_params: Vec::new(),
            generic_param_constraints: Vec::new(),
            standalone_sigs: Vec::new(),
            user_strings: Vec::new(),
            blobs: Vec::new(),
            assembly_refs: Vec::new(),
            module_refs: Vec::new(),
        }
    }

    /// Sets the module version id.
    #[must_use]
    pub fn with_mvid(mut self, mvid: uguid::Guid) -> Self {
        self.mvid = mvid;
        self
    }

    /// Adds a type.
    pub fn add_type(&mut self, definition: TypeDefinition) -> TypeDefId {
        self.types.push(definition);
        TypeDefId::new(self.types.len() - 1)
    }

    /// Adds a field and appends it to `owner`'s field list.
    ///
    /// # Errors
    /// Returns an error if `owner` is not a type of this module.
    pub fn add_field(&mut self, owner: TypeDefId, field: FieldDefinition) -> Result<FieldId> {
        let id = FieldId::new(self.fields.len());
        self.type_def_mut(owner)?.fields.push(id);
        self.fields.push(field);
        Ok(id)
    }

    /// Adds a method and appends it to `owner`'s method list.
    ///
    /// # Errors
    /// Returns an error if `owner` is not a type of this module.
    pub fn add_method(&mut self, owner: TypeDefId, method: MethodDefinition) -> Result<MethodId> {
        let id = MethodId::new(self.methods.len());
        self.type_def_mut(owner)?.methods.push(id);
        self.methods.push(method);
        Ok(id)
    }

    /// Records `nested` as a nested type of `enclosing`.
    ///
    /// # Errors
    /// Returns an error if either handle is not a type of this module.
    pub fn add_nested_type(&mut self, enclosing: TypeDefId, nested: TypeDefId) -> Result<()> {
        self.type_def(nested)?;
        self.type_def_mut(enclosing)?.nested_types.push(nested);
        Ok(())
    }

    /// Adds a type reference.
    pub fn add_type_ref(&mut self, reference: TypeReference) -> TypeRefId {
        self.type_refs.push(reference);
        TypeRefId::new(self.type_refs.len() - 1)
    }

    /// Adds a member reference.
    pub fn add_member_ref(&mut self, reference: MemberReference) -> MemberRefId {
        self.member_refs.push(reference);
        MemberRefId::new(self.member_refs.len() - 1)
    }

    /// Adds a type specification.
    pub fn add_type_spec(&mut self, spec: TypeSpecification) -> TypeSpecId {
        self.type_specs.push(spec);
        TypeSpecId::new(self.type_specs.len() - 1)
    }

    /// Adds a method instantiation.
    pub fn add_method_spec(&mut self, spec: MethodSpecification) -> MethodSpecId {
        self.method_specs.push(spec);
        MethodSpecId::new(self.method_specs.len() - 1)
    }

    /// Adds an assembly reference.
    pub fn add_assembly_ref(&mut self, reference: AssemblyReference) -> AssemblyRefId {
        self.assembly_refs.push(reference);
        AssemblyRefId::new(self.assembly_refs.len() - 1)
    }

    /// Adds a module reference.
    pub fn add_module_ref(&mut self, reference: ModuleReference) -> ModuleRefId {
        self.module_refs.push(reference);
        ModuleRefId::new(self.module_refs.len() - 1)
    }

    /// Adds a generic parameter and returns its key.
    pub fn add_generic_param(&mut self, param: GenericParameter) -> Token {
        let key = param.token;
        self.generic_params.push(param);
        key
    }

    /// Adds a generic parameter constraint.
    pub fn add_generic_param_constraint(&mut self, constraint: GenericParameterConstraint) {
        self.generic_param_constraints.push(constraint);
    }

    /// Adds a standalone signature and returns its position.
    pub fn add_standalone_sig(&mut self, signature: StandAloneSignature) -> usize {
        self.standalone_sigs.push(signature);
        self.standalone_sigs.len() - 1
    }

    /// Adds a user string and returns its position.
    pub fn add_user_string(&mut self, value: UserString) -> usize {
        self.user_strings.push(value);
        self.user_strings.len() - 1
    }

    /// Adds blob content and returns its position.
    pub fn add_blob(&mut self, blob: BlobEntry) -> usize {
        self.blobs.push(blob);
        self.blobs.len() - 1
    }

    entity_lookup!(type_def, types, TypeDefId, TypeDefinition, "TypeDef");
    entity_lookup!(field, fields, FieldId, FieldDefinition, "Field");
    entity_lookup!(method, methods, MethodId, MethodDefinition, "MethodDef");
    entity_lookup!(type_ref, type_refs, TypeRefId, TypeReference, "TypeRef");
    entity_lookup!(member_ref, member_refs, MemberRefId, MemberReference, "MemberRef");
    entity_lookup!(type_spec, type_specs, TypeSpecId, TypeSpecification, "TypeSpec");
    entity_lookup!(method_spec, method_specs, MethodSpecId, MethodSpecification, "MethodSpec");
    entity_lookup!(assembly_ref, assembly_refs, AssemblyRefId, AssemblyReference, "AssemblyRef");
    entity_lookup!(module_ref, module_refs, ModuleRefId, ModuleReference, "ModuleRef");

    /// Mutable access to a type.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] for a dangling handle.
    pub fn type_def_mut(&mut self, id: TypeDefId) -> Result<&mut TypeDefinition> {
        let count = self.types.len();
        self.types.get_mut(id.index()).ok_or_else(|| {
            malformed_error!(
                "TypeDef handle {} is out of range ({} entries)",
                id.index(),
                count
            )
        })
    }
}
