//! Integration tests for writing modules back with their recorded tokens.

use cilmeta::prelude::*;

fn field(name: &str, base: TypeSignature) -> FieldDefinition {
    FieldDefinition::new(
        name,
        FieldAttributes::PUBLIC,
        SignatureField {
            modifiers: Vec::new(),
            base,
        },
    )
}

fn structural_preserve() -> BuilderConfig {
    BuilderConfig::preserve().with_signature_mode(SignatureMode::Structural)
}

/// One type owning three fields recorded as 0x04000002, 0x04000001 and 0x04000003.
fn shuffled_fields() -> ModuleDefinition {
    let mut module = ModuleDefinition::new("Parsed.dll");
    let ty = module.add_type(
        TypeDefinition::new("", "<Module>", 0).with_token(Token::new(0x0200_0001)),
    );
    for (name, rid) in [("b", 2), ("a", 1), ("c", 3)] {
        module
            .add_field(
                ty,
                field(name, TypeSignature::I4).with_token(Token::new(0x0400_0000 | rid)),
            )
            .unwrap();
    }
    module
}

#[test]
fn test_recorded_field_tokens_survive() -> Result<()> {
    let mut module = shuffled_fields();
    let image = MetadataBuilder::new(structural_preserve()).build(&mut module)?;

    let tokens: Vec<u32> = module.fields.iter().map(|f| f.token.value()).collect();
    assert_eq!(tokens, vec![0x0400_0002, 0x0400_0001, 0x0400_0003]);
    assert_eq!(module.types[0].fields_range, MemberRange::new(1, 3));

    let first = image.tables().fields.get(1).unwrap();
    assert_eq!(image.strings().get("a"), Some(first.name));
    let third = image.tables().fields.get(3).unwrap();
    assert_eq!(image.strings().get("c"), Some(third.name));
    Ok(())
}

#[test]
fn test_gap_in_recorded_tokens_rejected() {
    let mut module = shuffled_fields();
    module.fields.retain(|f| f.name != "b");
    module.types[0].fields.pop();

    let result = MetadataBuilder::new(structural_preserve()).build(&mut module);
    assert!(matches!(
        result,
        Err(Error::NonDenseTokens {
            table: TableId::Field,
            expected: 2,
            found: 3
        })
    ));
}

#[test]
fn test_raw_signatures_are_copied_verbatim() -> Result<()> {
    let mut module = ModuleDefinition::new("Parsed.dll");
    let ty = module.add_type(
        TypeDefinition::new("", "<Module>", 0).with_token(Token::new(0x0200_0001)),
    );
    // Recorded as int32 although the structural signature says string
    module.add_field(
        ty,
        field("value", TypeSignature::String)
            .with_token(Token::new(0x0400_0001))
            .with_raw_signature(vec![0x06, 0x08]),
    )?;

    let image = MetadataBuilder::new(BuilderConfig::preserve()).build(&mut module)?;

    let row = image.tables().fields.get(1).unwrap();
    assert_eq!(image.blobs().get(&[0x06, 0x08]), Some(row.signature));
    assert_eq!(image.blobs().get(&[0x06, 0x0E]), None);
    Ok(())
}

#[test]
fn test_references_keep_recorded_rows() -> Result<()> {
    let mut module = ModuleDefinition::new("Parsed.dll");
    module.add_type(TypeDefinition::new("", "<Module>", 0).with_token(Token::new(0x0200_0001)));
    let corlib = module.add_assembly_ref(
        AssemblyReference::new("mscorlib", AssemblyVersion::new(4, 0, 0, 0))
            .with_token(Token::new(0x2300_0001)),
    );
    let console = module.add_type_ref(
        TypeReference::new(ResolutionScope::AssemblyRef(corlib), "System", "Console")
            .with_token(Token::new(0x0100_0002)),
    );
    module.add_type_ref(
        TypeReference::new(ResolutionScope::AssemblyRef(corlib), "System", "Attribute")
            .with_token(Token::new(0x0100_0001)),
    );
    module.add_member_ref(
        MemberReference::new(
            MemberRefParent::TypeRef(console),
            "WriteLine",
            MemberSignature::Method(SignatureMethod {
                return_type: SignatureParameter::new(TypeSignature::Void),
                params: vec![SignatureParameter::new(TypeSignature::String)],
                ..Default::default()
            }),
        )
        .with_token(Token::new(0x0A00_0001)),
    );

    let image = MetadataBuilder::new(structural_preserve()).build(&mut module)?;

    let tables = image.tables();
    assert_eq!(
        image.strings().get("Attribute"),
        Some(tables.type_refs.get(1).unwrap().type_name)
    );
    assert_eq!(
        image.strings().get("Console"),
        Some(tables.type_refs.get(2).unwrap().type_name)
    );
    assert_eq!(tables.member_refs.get(1).unwrap().class.token.value(), 0x0100_0002);
    assert_eq!(module.type_refs[console.index()].token.value(), 0x0100_0002);
    Ok(())
}

#[test]
fn test_user_string_offsets_are_verified() {
    let literals = || {
        let mut module = ModuleDefinition::new("Parsed.dll");
        module.add_user_string(UserString::at(1, "Hi"));
        // "Hi" occupies bytes 1..7
        module.add_user_string(UserString::at(8, "Yo"));
        module
    };

    let mut strict = literals();
    let result = MetadataBuilder::new(structural_preserve()).build(&mut strict);
    assert!(matches!(
        result,
        Err(Error::HeapOffsetMismatch {
            heap: "#US",
            expected: 8,
            actual: 7
        })
    ));

    let mut lenient = literals();
    let config = structural_preserve().with_verify_heap_offsets(false);
    MetadataBuilder::new(config).build(&mut lenient).unwrap();
    assert_eq!(lenient.user_strings[1].offset, 7);
    assert_eq!(lenient.user_strings[1].token().value(), 0x7000_0007);
}

#[test]
fn test_token_from_other_table_rejected() {
    let mut module = ModuleDefinition::new("Parsed.dll");
    let ty = module.add_type(
        TypeDefinition::new("", "<Module>", 0).with_token(Token::new(0x0200_0001)),
    );
    module.add_generic_param(GenericParameter::new(
        Token::new(0x0200_0001),
        GenericParamOwner::Type(ty),
        0,
        "T",
    ));

    let result = MetadataBuilder::new(structural_preserve()).build(&mut module);
    assert!(matches!(result, Err(Error::TokenMismatch { .. })));
}

#[test]
fn test_unknown_constraint_owner_rejected() {
    let mut module = ModuleDefinition::new("Parsed.dll");
    let ty = module.add_type(
        TypeDefinition::new("", "<Module>", 0).with_token(Token::new(0x0200_0001)),
    );
    module.add_generic_param(GenericParameter::new(
        Token::new(0x2A00_0001),
        GenericParamOwner::Type(ty),
        0,
        "T",
    ));
    module.add_generic_param_constraint(
        GenericParameterConstraint::new(Token::new(0x2A00_0002), TypeHandle::Def(ty))
            .with_token(Token::new(0x2C00_0001)),
    );

    let result = MetadataBuilder::new(structural_preserve()).build(&mut module);
    assert!(matches!(
        result,
        Err(Error::GenericParamNotFound { owner, .. }) if owner.value() == 0x2A00_0002
    ));
}

/// A module touching every table the builder writes.
fn rich_module() -> Result<ModuleDefinition> {
    let mut module = ModuleDefinition::new("Rich.dll");
    let corlib = module.add_assembly_ref(AssemblyReference::new(
        "System.Runtime",
        AssemblyVersion::new(8, 0, 0, 0),
    ));
    module.add_module_ref(ModuleReference::new("native.dll"));
    let object = module.add_type_ref(TypeReference::new(
        ResolutionScope::AssemblyRef(corlib),
        "System",
        "Object",
    ));
    let list = module.add_type_ref(TypeReference::new(
        ResolutionScope::AssemblyRef(corlib),
        "System.Collections.Generic",
        "List`1",
    ));
    let list_of_t = module.add_type_spec(TypeSpecification::new(SignatureTypeSpec {
        base: TypeSignature::GenericInst(
            Box::new(TypeSignature::Class(TypeHandle::Ref(list))),
            vec![TypeSignature::GenericParamType(0)],
        ),
    }));
    module.add_member_ref(MemberReference::new(
        MemberRefParent::TypeRef(object),
        ".ctor",
        MemberSignature::Method(SignatureMethod {
            has_this: true,
            return_type: SignatureParameter::new(TypeSignature::Void),
            ..Default::default()
        }),
    ));

    module.add_type(TypeDefinition::new("", "<Module>", 0));
    let bag = module.add_type(
        TypeDefinition::new("App", "Bag`1", TypeAttributes::PUBLIC)
            .with_extends(TypeHandle::Ref(object)),
    );
    let entry = module.add_type(TypeDefinition::new(
        "",
        "Entry",
        TypeAttributes::NESTED_PUBLIC,
    ));
    module.add_nested_type(bag, entry)?;
    module.add_field(
        bag,
        field("items", TypeSignature::Class(TypeHandle::Spec(list_of_t))),
    )?;
    module.add_field(entry, field("count", TypeSignature::I4))?;
    module.add_method(
        bag,
        MethodDefinition::new(
            "Add",
            MethodAttributes::PUBLIC,
            SignatureMethod {
                has_this: true,
                return_type: SignatureParameter::new(TypeSignature::Void),
                params: vec![SignatureParameter::new(TypeSignature::GenericParamType(0))],
                ..Default::default()
            },
        )
        .with_parameter(ParameterDefinition::new("item", 1, 0)),
    )?;

    let t = module.add_generic_param(GenericParameter::new(
        Token::new(0x2A00_0001),
        GenericParamOwner::Type(bag),
        0,
        "T",
    ));
    module.add_generic_param_constraint(GenericParameterConstraint::new(
        t,
        TypeHandle::Ref(object),
    ));
    module.add_standalone_sig(StandAloneSignature::new(
        StandAloneSignatureKind::LocalVariables(SignatureLocalVariables {
            locals: vec![SignatureLocalVariable {
                base: TypeSignature::Class(TypeHandle::Ref(object)),
                ..Default::default()
            }],
        }),
    ));
    module.add_user_string(UserString::new("hello"));
    module.add_blob(BlobEntry::new(vec![0x01, 0x00, 0x00, 0x00]));
    Ok(module)
}

fn tokens(module: &ModuleDefinition) -> Vec<u32> {
    let mut tokens = Vec::new();
    tokens.extend(module.types.iter().map(|e| e.token.value()));
    tokens.extend(module.fields.iter().map(|e| e.token.value()));
    tokens.extend(module.methods.iter().map(|e| e.token.value()));
    tokens.extend(module.type_refs.iter().map(|e| e.token.value()));
    tokens.extend(module.member_refs.iter().map(|e| e.token.value()));
    tokens.extend(module.type_specs.iter().map(|e| e.token.value()));
    tokens.extend(module.generic_params.iter().map(|e| e.token.value()));
    tokens.extend(module.generic_param_constraints.iter().map(|e| e.token.value()));
    tokens.extend(module.standalone_sigs.iter().map(|e| e.token.value()));
    tokens.extend(module.assembly_refs.iter().map(|e| e.token.value()));
    tokens.extend(module.module_refs.iter().map(|e| e.token.value()));
    tokens.extend(module.user_strings.iter().map(|e| e.offset));
    tokens.extend(module.blobs.iter().map(|e| e.offset));
    tokens
}

#[test]
fn test_rebuilt_module_builds_again_in_preserve_mode() -> Result<()> {
    let mut module = rich_module()?;
    let rebuilt = MetadataBuilder::default().build(&mut module)?;
    let after_rebuild = tokens(&module);

    let mut parsed = module.clone();
    let preserved = MetadataBuilder::new(structural_preserve()).build(&mut parsed)?;

    assert_eq!(tokens(&parsed), after_rebuild);
    assert_eq!(preserved.tables().row_counts(), rebuilt.tables().row_counts());
    assert_eq!(parsed.types[1].fields_range, module.types[1].fields_range);
    assert_eq!(parsed.types[2].methods_range, module.types[2].methods_range);
    assert_eq!(preserved.user_strings().data(), rebuilt.user_strings().data());
    Ok(())
}
