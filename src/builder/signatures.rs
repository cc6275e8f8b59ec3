//! Signature blob strategies.
//!
//! Every signature-bearing entity has a structural signature and may carry the raw bytes it
//! was parsed from. A [`SignatureStrategy`] decides which of the two becomes the blob:
//! [`StructuralSignatures`] always re-encodes, [`RawSignatures`] copies raw bytes verbatim so
//! a parsed module round-trips byte for byte, even where the encoder would pick a different
//! but equivalent encoding.

use crate::{
    builder::SignatureMode,
    metadata::{
        signatures::{
            encode_field_signature, encode_local_var_signature, encode_method_signature,
            encode_method_spec_signature, encode_typespec_signature, SignatureField,
            SignatureMethod, SignatureMethodSpec, SignatureTypeSpec, TypeResolver,
        },
        token::Token,
    },
    model::{MemberSignature, StandAloneSignatureKind},
    Result,
};

/// Produces the blob bytes of signatures.
///
/// Implementors decide only whether raw bytes are used; the provided methods do the
/// encoding and call [`SignatureStrategy::pass_through`] first.
pub trait SignatureStrategy {
    /// The mode this strategy implements.
    fn mode(&self) -> SignatureMode;

    /// Returns the bytes to write verbatim for the entity `owner`, or `None` to encode.
    fn pass_through<'s>(&self, owner: Token, raw: Option<&'s [u8]>) -> Option<&'s [u8]>;

    /// Blob of a `MethodDef` signature.
    ///
    /// # Errors
    /// Returns an error if the structural signature cannot be encoded.
    fn method_signature(
        &self,
        owner: Token,
        signature: &SignatureMethod,
        raw: Option<&[u8]>,
        resolver: &mut dyn TypeResolver,
    ) -> Result<Vec<u8>> {
        match self.pass_through(owner, raw) {
            Some(bytes) => Ok(bytes.to_vec()),
            None => encode_method_signature(signature, resolver),
        }
    }

    /// Blob of a `Field` signature.
    ///
    /// # Errors
    /// Returns an error if the structural signature cannot be encoded.
    fn field_signature(
        &self,
        owner: Token,
        signature: &SignatureField,
        raw: Option<&[u8]>,
        resolver: &mut dyn TypeResolver,
    ) -> Result<Vec<u8>> {
        match self.pass_through(owner, raw) {
            Some(bytes) => Ok(bytes.to_vec()),
            None => encode_field_signature(signature, resolver),
        }
    }

    /// Blob of a `MemberRef` signature.
    ///
    /// # Errors
    /// Returns an error if the structural signature cannot be encoded.
    fn member_signature(
        &self,
        owner: Token,
        signature: &MemberSignature,
        raw: Option<&[u8]>,
        resolver: &mut dyn TypeResolver,
    ) -> Result<Vec<u8>> {
        match self.pass_through(owner, raw) {
            Some(bytes) => Ok(bytes.to_vec()),
            None => match signature {
                MemberSignature::Method(method) => encode_method_signature(method, resolver),
                MemberSignature::Field(field) => encode_field_signature(field, resolver),
            },
        }
    }

    /// Blob of a `TypeSpec` signature.
    ///
    /// # Errors
    /// Returns an error if the structural signature cannot be encoded.
    fn typespec_signature(
        &self,
        owner: Token,
        signature: &SignatureTypeSpec,
        raw: Option<&[u8]>,
        resolver: &mut dyn TypeResolver,
    ) -> Result<Vec<u8>> {
        match self.pass_through(owner, raw) {
            Some(bytes) => Ok(bytes.to_vec()),
            None => encode_typespec_signature(signature, resolver),
        }
    }

    /// Blob of a `MethodSpec` instantiation.
    ///
    /// # Errors
    /// Returns an error if the structural signature cannot be encoded.
    fn method_spec_signature(
        &self,
        owner: Token,
        signature: &SignatureMethodSpec,
        raw: Option<&[u8]>,
        resolver: &mut dyn TypeResolver,
    ) -> Result<Vec<u8>> {
        match self.pass_through(owner, raw) {
            Some(bytes) => Ok(bytes.to_vec()),
            None => encode_method_spec_signature(signature, resolver),
        }
    }

    /// Blob of a `StandAloneSig` row. Raw standalone signatures are always written verbatim.
    ///
    /// # Errors
    /// Returns an error if the structural signature cannot be encoded.
    fn standalone_signature(
        &self,
        signature: &StandAloneSignatureKind,
        resolver: &mut dyn TypeResolver,
    ) -> Result<Vec<u8>> {
        match signature {
            StandAloneSignatureKind::Raw(bytes) => Ok(bytes.clone()),
            StandAloneSignatureKind::LocalVariables(locals) => {
                encode_local_var_signature(locals, resolver)
            }
            StandAloneSignatureKind::Method(method) => encode_method_signature(method, resolver),
        }
    }
}

/// Always encodes from the structural signature.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralSignatures;

impl SignatureStrategy for StructuralSignatures {
    fn mode(&self) -> SignatureMode {
        SignatureMode::Structural
    }

    fn pass_through<'s>(&self, _owner: Token, _raw: Option<&'s [u8]>) -> Option<&'s [u8]> {
        None
    }
}

/// Writes raw signature bytes verbatim, encoding only entities that carry none.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawSignatures;

impl SignatureStrategy for RawSignatures {
    fn mode(&self) -> SignatureMode {
        SignatureMode::Raw
    }

    fn pass_through<'s>(&self, owner: Token, raw: Option<&'s [u8]>) -> Option<&'s [u8]> {
        if raw.is_none() {
            log::warn!("{owner} carries no raw signature, falling back to structural encoding");
        }
        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        metadata::signatures::{SignatureParameter, TypeSignature},
        model::TypeHandle,
    };

    fn no_types(_handle: TypeHandle) -> Result<Token> {
        Err(malformed_error!("no types in this test"))
    }

    fn void_method() -> SignatureMethod {
        SignatureMethod {
            has_this: true,
            return_type: SignatureParameter::new(TypeSignature::Void),
            params: vec![SignatureParameter::new(TypeSignature::I4)],
            ..Default::default()
        }
    }

    #[test]
    fn test_structural_ignores_raw() {
        let raw = [0x20, 0x01, 0x01, 0x0E];
        let mut resolver = no_types;
        let bytes = StructuralSignatures
            .method_signature(Token::new(0x0600_0001), &void_method(), Some(&raw), &mut resolver)
            .unwrap();
        assert_eq!(bytes, vec![0x20, 0x01, 0x01, 0x08]);
    }

    #[test]
    fn test_raw_passes_through() {
        // Not what the encoder would produce for this signature
        let raw = [0x20, 0x01, 0x01, 0x0E];
        let mut resolver = no_types;
        let bytes = RawSignatures
            .method_signature(Token::new(0x0600_0001), &void_method(), Some(&raw), &mut resolver)
            .unwrap();
        assert_eq!(bytes, raw.to_vec());
    }

    #[test]
    fn test_raw_falls_back_without_bytes() {
        let mut resolver = no_types;
        let bytes = RawSignatures
            .field_signature(
                Token::new(0x0400_0001),
                &SignatureField {
                    modifiers: Vec::new(),
                    base: TypeSignature::String,
                },
                None,
                &mut resolver,
            )
            .unwrap();
        assert_eq!(bytes, vec![0x06, 0x0E]);
    }

    #[test]
    fn test_standalone_raw_is_verbatim() {
        let mut resolver = no_types;
        let bytes = StructuralSignatures
            .standalone_signature(&StandAloneSignatureKind::Raw(vec![0x07, 0x00]), &mut resolver)
            .unwrap();
        assert_eq!(bytes, vec![0x07, 0x00]);
    }
}
