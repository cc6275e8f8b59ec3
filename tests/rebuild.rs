//! Integration tests for building modules with fresh tokens.
//!
//! These tests construct modules in memory and check the rows, tokens and heap contents of
//! the resulting image.

use cilmeta::{file::io::read_le_at, prelude::*};

fn int32() -> SignatureField {
    SignatureField {
        modifiers: Vec::new(),
        base: TypeSignature::I4,
    }
}

fn void_method(has_this: bool) -> SignatureMethod {
    SignatureMethod {
        has_this,
        return_type: SignatureParameter::new(TypeSignature::Void),
        ..Default::default()
    }
}

/// `<Module>` plus a reference to `System.Object` in `System.Runtime`.
fn base_module() -> (ModuleDefinition, TypeRefId) {
    let mut module = ModuleDefinition::new("Test.dll");
    let corlib = module.add_assembly_ref(AssemblyReference::new(
        "System.Runtime",
        AssemblyVersion::new(8, 0, 0, 0),
    ));
    let object = module.add_type_ref(TypeReference::new(
        ResolutionScope::AssemblyRef(corlib),
        "System",
        "Object",
    ));
    module.add_type(TypeDefinition::new("", "<Module>", 0));
    (module, object)
}

#[test]
fn test_identical_type_refs_share_one_row() -> Result<()> {
    let (mut module, object) = base_module();
    let corlib = AssemblyRefId::new(0);
    let duplicate = module.add_type_ref(TypeReference::new(
        ResolutionScope::AssemblyRef(corlib),
        "System",
        "Object",
    ));

    let elsewhere = module.add_type_ref(TypeReference::new(
        ResolutionScope::AssemblyRef(corlib),
        "Other",
        "Object",
    ));

    let image = MetadataBuilder::new(BuilderConfig::rebuild()).build(&mut module)?;

    assert_eq!(image.row_count(TableId::TypeRef), 2);
    assert_eq!(module.type_refs[object.index()].token.value(), 0x0100_0001);
    assert_eq!(module.type_refs[duplicate.index()].token.value(), 0x0100_0001);
    assert_eq!(module.type_refs[elsewhere.index()].token.value(), 0x0100_0002);

    let row = image.tables().type_refs.get(2).unwrap();
    assert_eq!(image.strings().get("Other"), Some(row.type_namespace));
    Ok(())
}

#[test]
fn test_references_get_rows_in_discovery_order() -> Result<()> {
    let (mut module, object) = base_module();
    let corlib = AssemblyRefId::new(0);
    let list = module.add_type_ref(TypeReference::new(
        ResolutionScope::AssemblyRef(corlib),
        "System.Collections.Generic",
        "List`1",
    ));
    let list_of_int = module.add_type_spec(TypeSpecification::new(SignatureTypeSpec {
        base: TypeSignature::GenericInst(
            Box::new(TypeSignature::Class(TypeHandle::Ref(list))),
            vec![TypeSignature::I4],
        ),
    }));
    module.add_type(
        TypeDefinition::new("App", "Program", TypeAttributes::PUBLIC)
            .with_extends(TypeHandle::Ref(object)),
    );

    let image = MetadataBuilder::default().build(&mut module)?;

    // The TypeSpec phase reaches List`1 before the TypeRef phase reaches Object
    assert_eq!(module.type_refs[list.index()].token.value(), 0x0100_0001);
    assert_eq!(module.type_refs[object.index()].token.value(), 0x0100_0002);
    assert_eq!(module.type_specs[list_of_int.index()].token.value(), 0x1B00_0001);

    let spec = image.tables().type_specs.get(1).unwrap();
    assert_eq!(
        image.blobs().get(&[0x15, 0x12, 0x05, 0x01, 0x08]),
        Some(spec.signature)
    );

    let program = image.tables().type_defs.get(2).unwrap();
    assert_eq!(program.extends.token.value(), 0x0100_0002);
    Ok(())
}

#[test]
fn test_member_ranges_and_list_columns() -> Result<()> {
    let (mut module, object) = base_module();
    let empty = module.add_type(TypeDefinition::new("App", "Empty", 0));
    let point = module.add_type(
        TypeDefinition::new("App", "Point", TypeAttributes::PUBLIC)
            .with_extends(TypeHandle::Ref(object)),
    );
    module.add_field(point, FieldDefinition::new("x", FieldAttributes::PUBLIC, int32()))?;
    module.add_field(point, FieldDefinition::new("y", FieldAttributes::PUBLIC, int32()))?;
    module.add_method(
        point,
        MethodDefinition::new(".ctor", MethodAttributes::PUBLIC, void_method(true))
            .with_parameter(ParameterDefinition::new("x", 1, 0))
            .with_parameter(ParameterDefinition::new("y", 2, 0)),
    )?;
    module.add_method(
        point,
        MethodDefinition::new("Reset", MethodAttributes::PUBLIC, void_method(true)),
    )?;

    let image = MetadataBuilder::default().build(&mut module)?;

    assert_eq!(module.types[empty.index()].fields_range, MemberRange::new(1, 0));
    assert_eq!(module.types[point.index()].fields_range, MemberRange::new(1, 2));
    assert_eq!(module.types[point.index()].methods_range, MemberRange::new(1, 2));
    assert_eq!(module.fields[1].token.value(), 0x0400_0002);

    let tables = image.tables();
    assert_eq!(tables.type_defs.get(2).unwrap().field_list, 1);
    assert_eq!(tables.type_defs.get(3).unwrap().field_list, 1);
    assert_eq!(tables.type_defs.get(3).unwrap().method_list, 1);

    // Reset has no parameters and points past the last one
    assert_eq!(tables.methods.get(1).unwrap().param_list, 1);
    assert_eq!(tables.methods.get(2).unwrap().param_list, 3);
    assert_eq!(image.row_count(TableId::Param), 2);
    assert_eq!(module.methods[0].parameters[1].token.value(), 0x0800_0002);
    Ok(())
}

#[test]
fn test_type_ref_row_bytes_decode_to_scope() -> Result<()> {
    let (mut module, _) = base_module();
    let image = MetadataBuilder::default().build(&mut module)?;

    let info = image.table_info();
    assert_eq!(info.coded_index_bytes(CodedIndexType::ResolutionScope), 2);
    assert_eq!(info.str_bytes(), 2);

    let bytes = image.table_bytes(TableId::TypeRef)?;
    assert_eq!(bytes.len(), 6);

    let mut offset = 0;
    let scope: u16 = read_le_at(&bytes, &mut offset)?;
    let name: u16 = read_le_at(&bytes, &mut offset)?;
    let namespace: u16 = read_le_at(&bytes, &mut offset)?;

    assert_eq!(
        CodedIndexType::ResolutionScope.decode(u32::from(scope))?,
        (TableId::AssemblyRef, 1)
    );
    assert_eq!(image.strings().get("Object"), Some(u32::from(name)));
    assert_eq!(image.strings().get("System"), Some(u32::from(namespace)));
    Ok(())
}

#[test]
fn test_self_referencing_scope_rejected() {
    let mut module = ModuleDefinition::new("Test.dll");
    module.add_type_ref(TypeReference::new(
        ResolutionScope::TypeRef(TypeRefId::new(0)),
        "",
        "Loop",
    ));

    let result = MetadataBuilder::default().build(&mut module);
    assert!(matches!(result, Err(Error::Malformed { .. })));
}

#[test]
fn test_specification_sharing_is_configurable() -> Result<()> {
    let array_of_int = || {
        TypeSpecification::new(SignatureTypeSpec {
            base: TypeSignature::SzArray(SignatureSzArray {
                modifiers: Vec::new(),
                base: Box::new(TypeSignature::I4),
            }),
        })
    };

    let (mut shared, _) = base_module();
    shared.add_type_spec(array_of_int());
    shared.add_type_spec(array_of_int());
    let image = MetadataBuilder::default().build(&mut shared)?;
    assert_eq!(image.row_count(TableId::TypeSpec), 1);
    assert_eq!(shared.type_specs[1].token.value(), 0x1B00_0001);

    let (mut separate, _) = base_module();
    separate.add_type_spec(array_of_int());
    separate.add_type_spec(array_of_int());
    let config = BuilderConfig::rebuild().with_deduplicate_specifications(false);
    let image = MetadataBuilder::new(config).build(&mut separate)?;
    assert_eq!(image.row_count(TableId::TypeSpec), 2);
    assert_eq!(separate.type_specs[1].token.value(), 0x1B00_0002);
    Ok(())
}

#[test]
fn test_method_spec_pulls_in_its_member_ref() -> Result<()> {
    let (mut module, _) = base_module();
    let corlib = AssemblyRefId::new(0);
    let array = module.add_type_ref(TypeReference::new(
        ResolutionScope::AssemblyRef(corlib),
        "System",
        "Array",
    ));
    let empty = module.add_member_ref(MemberReference::new(
        MemberRefParent::TypeRef(array),
        "Empty",
        MemberSignature::Method(SignatureMethod {
            param_count_generic: 1,
            return_type: SignatureParameter::new(TypeSignature::SzArray(SignatureSzArray {
                modifiers: Vec::new(),
                base: Box::new(TypeSignature::GenericParamMethod(0)),
            })),
            ..Default::default()
        }),
    ));
    module.add_method_spec(MethodSpecification::new(
        MethodHandle::Ref(empty),
        SignatureMethodSpec {
            generic_args: vec![TypeSignature::String],
        },
    ));

    let image = MetadataBuilder::default().build(&mut module)?;

    assert_eq!(module.member_refs[empty.index()].token.value(), 0x0A00_0001);
    assert_eq!(module.type_refs[array.index()].token.value(), 0x0100_0001);

    let spec = image.tables().method_specs.get(1).unwrap();
    assert_eq!(
        CodedIndexType::MethodDefOrRef.encode(spec.method.token)?,
        (1 << 1) | 1
    );
    assert_eq!(image.blobs().get(&[0x0A, 0x01, 0x0E]), Some(spec.instantiation));
    Ok(())
}

#[test]
fn test_nested_types() -> Result<()> {
    let (mut module, _) = base_module();
    let outer = module.add_type(TypeDefinition::new("App", "Outer", TypeAttributes::PUBLIC));
    let inner = module.add_type(TypeDefinition::new(
        "",
        "Inner",
        TypeAttributes::NESTED_PUBLIC,
    ));
    module.add_nested_type(outer, inner)?;

    let image = MetadataBuilder::default().build(&mut module)?;

    assert_eq!(image.row_count(TableId::NestedClass), 1);
    let row = image.tables().nested_classes.get(1).unwrap();
    assert_eq!(row.nested_class, 3);
    assert_eq!(row.enclosing_class, 2);
    Ok(())
}

#[test]
fn test_dangling_handle_fails_the_build() {
    let (mut module, _) = base_module();
    module.add_member_ref(MemberReference::new(
        MemberRefParent::TypeDef(TypeDefId::new(7)),
        "Missing",
        MemberSignature::Field(int32()),
    ));

    let result = MetadataBuilder::default().build(&mut module);
    assert!(matches!(result, Err(Error::Malformed { .. })));
    assert!(module.type_refs[0].token.is_null());
}

#[test]
fn test_inconsistent_nesting_rejected() {
    let (mut module, _) = base_module();
    let outer = module.add_type(TypeDefinition::new("App", "Outer", TypeAttributes::PUBLIC));
    let other = module.add_type(TypeDefinition::new("App", "Other", TypeAttributes::PUBLIC));
    let inner = module.add_type(TypeDefinition::new("", "Inner", TypeAttributes::NESTED_PUBLIC));

    let mut looped = module.clone();
    looped.add_nested_type(outer, outer).unwrap();
    let result = MetadataBuilder::default().build(&mut looped);
    assert!(matches!(result, Err(Error::Malformed { .. })));
    assert!(looped.types[outer.index()].token.is_null());

    let mut shared = module;
    shared.add_nested_type(outer, inner).unwrap();
    shared.add_nested_type(other, inner).unwrap();
    let result = MetadataBuilder::default().build(&mut shared);
    assert!(matches!(result, Err(Error::Malformed { .. })));
}
