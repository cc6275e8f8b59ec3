//! Builder configuration
//!
//! Selects the token policy and signature strategy of a build and toggles the checks and
//! orderings that differ between producing a fresh image and reproducing a parsed one.

use crate::{Error, Result};

/// How row tokens are assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenMode {
    /// Fresh tokens in discovery order
    #[default]
    Rebuild,
    /// Tokens reproduced from the values recorded on the entities
    Preserve,
}

/// How signature blobs are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignatureMode {
    /// Always encode from the structural signature
    #[default]
    Structural,
    /// Write an entity's raw signature bytes verbatim when it carries them
    Raw,
}

/// Configuration for one metadata build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct BuilderConfig {
    /// Token assignment policy
    pub token_mode: TokenMode,

    /// Signature blob policy
    pub signature_mode: SignatureMode,

    /// Preserve mode: fail when a re-inserted user string or blob does not land on its
    /// recorded heap offset
    pub verify_heap_offsets: bool,

    /// Reuse an existing `TypeSpec` / `MethodSpec` row for an identical row, the way
    /// `TypeRef` and `MemberRef` rows are always shared
    pub deduplicate_specifications: bool,

    /// Rebuild mode: insert `GenericParam` rows ordered by owner and number, and
    /// `GenericParamConstraint` rows ordered by owner, as the runtime expects sorted tables
    pub sort_rebuilt_tables: bool,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            token_mode: TokenMode::Rebuild,
            signature_mode: SignatureMode::Structural,
            verify_heap_offsets: true,
            deduplicate_specifications: true,
            sort_rebuilt_tables: true,
        }
    }
}

impl BuilderConfig {
    /// Configuration for writing a module whose tokens do not matter yet
    ///
    /// Fresh tokens in discovery order, structurally encoded signatures.
    #[must_use]
    pub fn rebuild() -> Self {
        Self::default()
    }

    /// Configuration for writing a parsed module back unchanged
    ///
    /// Recorded tokens are reproduced and raw signatures are copied byte for byte.
    #[must_use]
    pub fn preserve() -> Self {
        Self {
            token_mode: TokenMode::Preserve,
            signature_mode: SignatureMode::Raw,
            ..Self::default()
        }
    }

    /// Sets the token policy.
    #[must_use]
    pub fn with_token_mode(mut self, mode: TokenMode) -> Self {
        self.token_mode = mode;
        self
    }

    /// Sets the signature policy.
    #[must_use]
    pub fn with_signature_mode(mut self, mode: SignatureMode) -> Self {
        self.signature_mode = mode;
        self
    }

    /// Enables or disables heap offset verification.
    #[must_use]
    pub fn with_verify_heap_offsets(mut self, enabled: bool) -> Self {
        self.verify_heap_offsets = enabled;
        self
    }

    /// Enables or disables `TypeSpec` / `MethodSpec` row sharing.
    #[must_use]
    pub fn with_deduplicate_specifications(mut self, enabled: bool) -> Self {
        self.deduplicate_specifications = enabled;
        self
    }

    /// Enables or disables sorted insertion of generic parameter tables.
    #[must_use]
    pub fn with_sort_rebuilt_tables(mut self, enabled: bool) -> Self {
        self.sort_rebuilt_tables = enabled;
        self
    }

    /// Checks that the token and signature policies can be combined.
    ///
    /// Raw signature bytes carry the coded indices of the module they were parsed from, which
    /// only stay valid while every row keeps its recorded RID.
    ///
    /// # Errors
    /// Returns [`Error::InvalidConfiguration`] for rebuilt tokens with raw signatures.
    pub fn validate(&self) -> Result<()> {
        if self.token_mode == TokenMode::Rebuild && self.signature_mode == SignatureMode::Raw {
            return Err(Error::InvalidConfiguration(
                "raw signatures require preserved tokens".to_string(),
            ));
        }
        Ok(())
    }
}
