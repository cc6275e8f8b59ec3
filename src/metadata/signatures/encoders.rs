//! Signature encoders for .NET metadata blob encoding.
//!
//! Each encoder implements the ECMA-335 II.23.2 binary format for one signature kind and
//! returns the blob bytes. Types referenced from a signature are written as compressed
//! `TypeDefOrRef` coded indices; the encoders obtain their tokens from a [`TypeResolver`].
//!
//! # Available Encoders
//!
//! - [`encode_method_signature`] - `MethodDef`, `MemberRef` and function pointer signatures
//! - [`encode_field_signature`] - `Field` and `MemberRef` field signatures
//! - [`encode_local_var_signature`] - local variable signatures for `StandAloneSig`
//! - [`encode_typespec_signature`] - `TypeSpec` signatures
//! - [`encode_method_spec_signature`] - `MethodSpec` instantiations

use crate::{
    metadata::{
        signatures::{
            CustomModifier, SignatureArray, SignatureField, SignatureLocalVariables,
            SignatureMethod, SignatureMethodSpec, SignatureParameter, SignatureTypeSpec,
            TypeSignature, CALLING_CONVENTION, ELEMENT_TYPE, SIGNATURE_HEADER,
        },
        tables::CodedIndexType,
        token::Token,
    },
    model::TypeHandle,
    utils::{to_u32, write_compressed_int, write_compressed_uint},
    Result,
};

/// Supplies the token of a type referenced from a signature.
///
/// Resolution may have side effects: a builder that assigns tokens on first use inserts
/// the referenced row while resolving it.
pub trait TypeResolver {
    /// Returns the `TypeDef`, `TypeRef` or `TypeSpec` token of `handle`.
    ///
    /// # Errors
    /// Returns an error if the handle cannot be resolved to a row.
    fn resolve_type(&mut self, handle: TypeHandle) -> Result<Token>;
}

impl<F> TypeResolver for F
where
    F: FnMut(TypeHandle) -> Result<Token>,
{
    fn resolve_type(&mut self, handle: TypeHandle) -> Result<Token> {
        self(handle)
    }
}

/// Writes `handle` as a compressed `TypeDefOrRef` coded index (II.23.2.8).
fn encode_type_def_or_ref<R: TypeResolver + ?Sized>(
    handle: TypeHandle,
    buffer: &mut Vec<u8>,
    resolver: &mut R,
) -> Result<()> {
    let token = resolver.resolve_type(handle)?;
    if token.row() == 0 {
        return Err(malformed_error!(
            "Type {:?} resolved to a null token inside a signature",
            handle
        ));
    }

    let coded_index = CodedIndexType::TypeDefOrRef.encode(token)?;
    write_compressed_uint(coded_index, buffer)
}

fn encode_custom_modifier<R: TypeResolver + ?Sized>(
    modifier: &CustomModifier,
    buffer: &mut Vec<u8>,
    resolver: &mut R,
) -> Result<()> {
    buffer.push(if modifier.is_required {
        ELEMENT_TYPE::CMOD_REQD
    } else {
        ELEMENT_TYPE::CMOD_OPT
    });

    encode_type_def_or_ref(modifier.modifier_type, buffer, resolver)
}

fn encode_modifiers<R: TypeResolver + ?Sized>(
    modifiers: &[CustomModifier],
    buffer: &mut Vec<u8>,
    resolver: &mut R,
) -> Result<()> {
    for modifier in modifiers {
        encode_custom_modifier(modifier, buffer, resolver)?;
    }
    Ok(())
}

/// `Param ::= CustomMod* [BYREF] Type`
fn encode_parameter<R: TypeResolver + ?Sized>(
    parameter: &SignatureParameter,
    buffer: &mut Vec<u8>,
    resolver: &mut R,
) -> Result<()> {
    encode_modifiers(&parameter.modifiers, buffer, resolver)?;

    if parameter.by_ref {
        buffer.push(ELEMENT_TYPE::BYREF);
    }

    encode_type_signature(&parameter.base, buffer, resolver)
}

/// `ArrayShape ::= Rank NumSizes Size* NumLoBounds LoBound*`
fn encode_array_shape(array: &SignatureArray, buffer: &mut Vec<u8>) -> Result<()> {
    // sizes and lower bounds apply to the leading dimensions only
    let sizes: Vec<u32> = array.dimensions.iter().map_while(|d| d.size).collect();
    let lower_bounds: Vec<i32> = array
        .dimensions
        .iter()
        .map_while(|d| d.lower_bound)
        .collect();

    write_compressed_uint(array.rank, buffer)?;

    write_compressed_uint(to_u32(sizes.len())?, buffer)?;
    for size in sizes {
        write_compressed_uint(size, buffer)?;
    }

    write_compressed_uint(to_u32(lower_bounds.len())?, buffer)?;
    for bound in lower_bounds {
        write_compressed_int(bound, buffer)?;
    }

    Ok(())
}

/// Appends the encoding of one type (II.23.2.12) to `buffer`.
///
/// # Errors
/// Returns an error for [`TypeSignature::Unknown`], for a generic instantiation whose
/// base is not a class or value type, or when a referenced type cannot be resolved.
pub fn encode_type_signature<R: TypeResolver + ?Sized>(
    signature: &TypeSignature,
    buffer: &mut Vec<u8>,
    resolver: &mut R,
) -> Result<()> {
    match signature {
        TypeSignature::Unknown => {
            return Err(malformed_error!("Cannot encode an unknown type signature"));
        }
        TypeSignature::Void => buffer.push(ELEMENT_TYPE::VOID),
        TypeSignature::Boolean => buffer.push(ELEMENT_TYPE::BOOLEAN),
        TypeSignature::Char => buffer.push(ELEMENT_TYPE::CHAR),
        TypeSignature::I1 => buffer.push(ELEMENT_TYPE::I1),
        TypeSignature::U1 => buffer.push(ELEMENT_TYPE::U1),
        TypeSignature::I2 => buffer.push(ELEMENT_TYPE::I2),
        TypeSignature::U2 => buffer.push(ELEMENT_TYPE::U2),
        TypeSignature::I4 => buffer.push(ELEMENT_TYPE::I4),
        TypeSignature::U4 => buffer.push(ELEMENT_TYPE::U4),
        TypeSignature::I8 => buffer.push(ELEMENT_TYPE::I8),
        TypeSignature::U8 => buffer.push(ELEMENT_TYPE::U8),
        TypeSignature::R4 => buffer.push(ELEMENT_TYPE::R4),
        TypeSignature::R8 => buffer.push(ELEMENT_TYPE::R8),
        TypeSignature::String => buffer.push(ELEMENT_TYPE::STRING),
        TypeSignature::TypedByRef => buffer.push(ELEMENT_TYPE::TYPEDBYREF),
        TypeSignature::I => buffer.push(ELEMENT_TYPE::I),
        TypeSignature::U => buffer.push(ELEMENT_TYPE::U),
        TypeSignature::Object => buffer.push(ELEMENT_TYPE::OBJECT),
        TypeSignature::Ptr(pointer) => {
            buffer.push(ELEMENT_TYPE::PTR);
            encode_modifiers(&pointer.modifiers, buffer, resolver)?;
            encode_type_signature(&pointer.base, buffer, resolver)?;
        }
        TypeSignature::ByRef(inner) => {
            buffer.push(ELEMENT_TYPE::BYREF);
            encode_type_signature(inner, buffer, resolver)?;
        }
        TypeSignature::ValueType(handle) => {
            buffer.push(ELEMENT_TYPE::VALUETYPE);
            encode_type_def_or_ref(*handle, buffer, resolver)?;
        }
        TypeSignature::Class(handle) => {
            buffer.push(ELEMENT_TYPE::CLASS);
            encode_type_def_or_ref(*handle, buffer, resolver)?;
        }
        TypeSignature::GenericParamType(number) => {
            buffer.push(ELEMENT_TYPE::VAR);
            write_compressed_uint(*number, buffer)?;
        }
        TypeSignature::GenericParamMethod(number) => {
            buffer.push(ELEMENT_TYPE::MVAR);
            write_compressed_uint(*number, buffer)?;
        }
        TypeSignature::Array(array) => {
            buffer.push(ELEMENT_TYPE::ARRAY);
            encode_type_signature(&array.base, buffer, resolver)?;
            encode_array_shape(array, buffer)?;
        }
        TypeSignature::SzArray(array) => {
            buffer.push(ELEMENT_TYPE::SZARRAY);
            encode_modifiers(&array.modifiers, buffer, resolver)?;
            encode_type_signature(&array.base, buffer, resolver)?;
        }
        TypeSignature::GenericInst(base, args) => {
            if !matches!(
                base.as_ref(),
                TypeSignature::Class(_) | TypeSignature::ValueType(_)
            ) {
                return Err(malformed_error!(
                    "Generic instantiation base must be a class or value type, got {:?}",
                    base
                ));
            }

            buffer.push(ELEMENT_TYPE::GENERICINST);
            encode_type_signature(base, buffer, resolver)?;
            write_compressed_uint(to_u32(args.len())?, buffer)?;
            for arg in args {
                encode_type_signature(arg, buffer, resolver)?;
            }
        }
        TypeSignature::FnPtr(method) => {
            buffer.push(ELEMENT_TYPE::FNPTR);
            write_method_signature(method, buffer, resolver)?;
        }
        TypeSignature::Pinned(inner) => {
            buffer.push(ELEMENT_TYPE::PINNED);
            encode_type_signature(inner, buffer, resolver)?;
        }
    }

    Ok(())
}

fn write_method_signature<R: TypeResolver + ?Sized>(
    signature: &SignatureMethod,
    buffer: &mut Vec<u8>,
    resolver: &mut R,
) -> Result<()> {
    // calling convention kind lives in the low 4 bits, most specific first
    let mut calling_convention = if signature.vararg {
        CALLING_CONVENTION::VARARG
    } else if signature.fastcall {
        CALLING_CONVENTION::FASTCALL
    } else if signature.thiscall {
        CALLING_CONVENTION::THISCALL
    } else if signature.stdcall {
        CALLING_CONVENTION::STDCALL
    } else if signature.cdecl {
        CALLING_CONVENTION::C
    } else {
        CALLING_CONVENTION::DEFAULT
    };

    if signature.has_this {
        calling_convention |= CALLING_CONVENTION::HASTHIS;
    }

    if signature.explicit_this {
        calling_convention |= CALLING_CONVENTION::EXPLICITTHIS;
    }

    if signature.param_count_generic > 0 {
        calling_convention |= CALLING_CONVENTION::GENERIC;
    }

    buffer.push(calling_convention);

    if signature.param_count_generic > 0 {
        write_compressed_uint(signature.param_count_generic, buffer)?;
    }

    let param_count = to_u32(signature.params.len() + signature.varargs.len())?;
    write_compressed_uint(param_count, buffer)?;

    encode_parameter(&signature.return_type, buffer, resolver)?;
    for param in &signature.params {
        encode_parameter(param, buffer, resolver)?;
    }

    if !signature.varargs.is_empty() {
        buffer.push(ELEMENT_TYPE::SENTINEL);
        for param in &signature.varargs {
            encode_parameter(param, buffer, resolver)?;
        }
    }

    Ok(())
}

/// Encodes a method signature into binary format according to ECMA-335 II.23.2.1 - II.23.2.3.
///
/// # Errors
/// Returns an error if a parameter or the return type cannot be encoded.
pub fn encode_method_signature<R: TypeResolver + ?Sized>(
    signature: &SignatureMethod,
    resolver: &mut R,
) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    write_method_signature(signature, &mut buffer, resolver)?;
    Ok(buffer)
}

/// Encodes a field signature into binary format according to ECMA-335 II.23.2.4.
///
/// # Errors
/// Returns an error if the field type cannot be encoded.
pub fn encode_field_signature<R: TypeResolver + ?Sized>(
    signature: &SignatureField,
    resolver: &mut R,
) -> Result<Vec<u8>> {
    let mut buffer = vec![SIGNATURE_HEADER::FIELD];
    encode_modifiers(&signature.modifiers, &mut buffer, resolver)?;
    encode_type_signature(&signature.base, &mut buffer, resolver)?;
    Ok(buffer)
}

/// Encodes a local variable signature into binary format according to ECMA-335 II.23.2.6.
///
/// # Errors
/// Returns an error if a local's type cannot be encoded.
pub fn encode_local_var_signature<R: TypeResolver + ?Sized>(
    signature: &SignatureLocalVariables,
    resolver: &mut R,
) -> Result<Vec<u8>> {
    let mut buffer = vec![SIGNATURE_HEADER::LOCAL_SIG];
    write_compressed_uint(to_u32(signature.locals.len())?, &mut buffer)?;

    for local in &signature.locals {
        encode_modifiers(&local.modifiers, &mut buffer, resolver)?;

        if local.is_pinned {
            buffer.push(ELEMENT_TYPE::PINNED);
        }

        if local.is_byref {
            buffer.push(ELEMENT_TYPE::BYREF);
        }

        encode_type_signature(&local.base, &mut buffer, resolver)?;
    }

    Ok(buffer)
}

/// Encodes a type specification signature (II.23.2.14).
///
/// # Errors
/// Returns an error if the type cannot be encoded.
pub fn encode_typespec_signature<R: TypeResolver + ?Sized>(
    signature: &SignatureTypeSpec,
    resolver: &mut R,
) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    encode_type_signature(&signature.base, &mut buffer, resolver)?;
    Ok(buffer)
}

/// Encodes a generic method instantiation (II.23.2.15).
///
/// # Errors
/// Returns an error if the instantiation is empty or an argument cannot be encoded.
pub fn encode_method_spec_signature<R: TypeResolver + ?Sized>(
    signature: &SignatureMethodSpec,
    resolver: &mut R,
) -> Result<Vec<u8>> {
    if signature.generic_args.is_empty() {
        return Err(malformed_error!(
            "Generic method instantiation without type arguments"
        ));
    }

    let mut buffer = vec![SIGNATURE_HEADER::METHOD_SPEC];
    write_compressed_uint(to_u32(signature.generic_args.len())?, &mut buffer)?;
    for arg in &signature.generic_args {
        encode_type_signature(arg, &mut buffer, resolver)?;
    }

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        metadata::signatures::{
            ArrayDimensions, SignatureLocalVariable, SignaturePointer, SignatureSzArray,
        },
        metadata::tables::TableId,
        model::{TypeDefId, TypeRefId, TypeSpecId},
        Error,
    };

    /// Maps every handle to row `index + 1` of its table.
    fn resolver() -> impl FnMut(TypeHandle) -> Result<Token> {
        |handle: TypeHandle| -> Result<Token> {
            Ok(match handle {
                TypeHandle::Def(id) => Token::from_parts(TableId::TypeDef, id.index() as u32 + 1),
                TypeHandle::Ref(id) => Token::from_parts(TableId::TypeRef, id.index() as u32 + 1),
                TypeHandle::Spec(id) => {
                    Token::from_parts(TableId::TypeSpec, id.index() as u32 + 1)
                }
            })
        }
    }

    #[test]
    fn test_encode_static_method() {
        // static void M(int, string)
        let signature = SignatureMethod {
            default: true,
            return_type: SignatureParameter::new(TypeSignature::Void),
            params: vec![
                SignatureParameter::new(TypeSignature::I4),
                SignatureParameter::new(TypeSignature::String),
            ],
            ..Default::default()
        };

        let encoded = encode_method_signature(&signature, &mut resolver()).unwrap();
        assert_eq!(encoded, vec![0x00, 0x02, 0x01, 0x08, 0x0E]);
    }

    #[test]
    fn test_encode_generic_instance_method() {
        // instance !!0 M<T>(class Foo&)
        let signature = SignatureMethod {
            has_this: true,
            param_count_generic: 1,
            return_type: SignatureParameter::new(TypeSignature::GenericParamMethod(0)),
            params: vec![SignatureParameter {
                modifiers: Vec::new(),
                by_ref: true,
                base: TypeSignature::Class(TypeHandle::Ref(TypeRefId::new(4))),
            }],
            ..Default::default()
        };

        let encoded = encode_method_signature(&signature, &mut resolver()).unwrap();
        assert_eq!(
            encoded,
            vec![
                0x30, // HASTHIS | GENERIC
                0x01, // generic parameter count
                0x01, // parameter count
                0x1E, 0x00, // !!0
                0x10, 0x12, 0x15, // class TypeRef(5) by ref: (5 << 2) | 1
            ]
        );
    }

    #[test]
    fn test_encode_vararg_call_site() {
        let signature = SignatureMethod {
            vararg: true,
            return_type: SignatureParameter::new(TypeSignature::Void),
            params: vec![SignatureParameter::new(TypeSignature::I4)],
            varargs: vec![SignatureParameter::new(TypeSignature::R8)],
            ..Default::default()
        };

        let encoded = encode_method_signature(&signature, &mut resolver()).unwrap();
        assert_eq!(encoded, vec![0x05, 0x02, 0x01, 0x08, 0x41, 0x0D]);
    }

    #[test]
    fn test_encode_field_signature() {
        let signature = SignatureField {
            modifiers: vec![CustomModifier {
                is_required: true,
                modifier_type: TypeHandle::Ref(TypeRefId::new(0)),
            }],
            base: TypeSignature::I4,
        };

        let encoded = encode_field_signature(&signature, &mut resolver()).unwrap();
        assert_eq!(encoded, vec![0x06, 0x1F, 0x05, 0x08]);
    }

    #[test]
    fn test_encode_local_var_signature() {
        let signature = SignatureLocalVariables {
            locals: vec![
                SignatureLocalVariable {
                    base: TypeSignature::I4,
                    ..Default::default()
                },
                SignatureLocalVariable {
                    is_pinned: true,
                    is_byref: true,
                    base: TypeSignature::U1,
                    ..Default::default()
                },
            ],
        };

        let encoded = encode_local_var_signature(&signature, &mut resolver()).unwrap();
        assert_eq!(encoded, vec![0x07, 0x02, 0x08, 0x45, 0x10, 0x05]);
    }

    #[test]
    fn test_encode_generic_instance_typespec() {
        // List<int> where List`1 is TypeRef row 2
        let signature = SignatureTypeSpec {
            base: TypeSignature::GenericInst(
                Box::new(TypeSignature::Class(TypeHandle::Ref(TypeRefId::new(1)))),
                vec![TypeSignature::I4],
            ),
        };

        let encoded = encode_typespec_signature(&signature, &mut resolver()).unwrap();
        assert_eq!(encoded, vec![0x15, 0x12, 0x09, 0x01, 0x08]);
    }

    #[test]
    fn test_encode_generic_instance_requires_class_base() {
        let signature = SignatureTypeSpec {
            base: TypeSignature::GenericInst(Box::new(TypeSignature::I4), vec![TypeSignature::I4]),
        };

        assert!(matches!(
            encode_typespec_signature(&signature, &mut resolver()),
            Err(Error::Malformed { .. })
        ));
    }

    #[test]
    fn test_encode_arrays_and_pointers() {
        let signature = SignatureTypeSpec {
            base: TypeSignature::Array(SignatureArray {
                base: Box::new(TypeSignature::SzArray(SignatureSzArray {
                    modifiers: Vec::new(),
                    base: Box::new(TypeSignature::Ptr(SignaturePointer {
                        modifiers: Vec::new(),
                        base: Box::new(TypeSignature::ValueType(TypeHandle::Def(
                            TypeDefId::new(0),
                        ))),
                    })),
                })),
                rank: 2,
                dimensions: vec![
                    ArrayDimensions {
                        size: Some(3),
                        lower_bound: Some(-1),
                    },
                    ArrayDimensions {
                        size: None,
                        lower_bound: Some(0),
                    },
                ],
            }),
        };

        let encoded = encode_typespec_signature(&signature, &mut resolver()).unwrap();
        assert_eq!(
            encoded,
            vec![
                0x14, // ARRAY
                0x1D, 0x0F, 0x11, 0x04, // SZARRAY PTR VALUETYPE TypeDef(1)
                0x02, // rank
                0x01, 0x03, // one size: 3
                0x02, 0x7F, 0x00, // two lower bounds: -1, 0
            ]
        );
    }

    #[test]
    fn test_encode_method_spec() {
        let signature = SignatureMethodSpec {
            generic_args: vec![
                TypeSignature::String,
                TypeSignature::Class(TypeHandle::Spec(TypeSpecId::new(0))),
            ],
        };

        let encoded = encode_method_spec_signature(&signature, &mut resolver()).unwrap();
        assert_eq!(encoded, vec![0x0A, 0x02, 0x0E, 0x12, 0x06]);

        assert!(encode_method_spec_signature(&SignatureMethodSpec::default(), &mut resolver())
            .is_err());
    }

    #[test]
    fn test_encode_rejects_non_type_tokens() {
        let mut bad = |_handle: TypeHandle| -> Result<Token> { Ok(Token::new(0x0600_0001)) };
        let signature = SignatureField {
            modifiers: Vec::new(),
            base: TypeSignature::Class(TypeHandle::Def(TypeDefId::new(0))),
        };

        assert!(matches!(
            encode_field_signature(&signature, &mut bad),
            Err(Error::InvalidCodedIndex { .. })
        ));
    }

    #[test]
    fn test_encode_unknown_fails() {
        let signature = SignatureField::default();
        assert!(encode_field_signature(&signature, &mut resolver()).is_err());
    }
}
