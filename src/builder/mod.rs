//! Metadata table and heap builder.
//!
//! [`MetadataBuilder`] turns a [`ModuleDefinition`] into a [`MetadataImage`]: the rows of every
//! table the module needs, the four heaps, and the index widths that follow from their final
//! sizes. Every cross-reference in the image is a final RID, coded index or heap offset.
//!
//! # Token policies
//!
//! - **Rebuild** ([`RebuildTokens`]): definitions are numbered by a traversal of the module's
//!   types; references, specifications and signatures get rows the first time they are
//!   reached, and identical references share one row.
//! - **Preserve** ([`PreserveTokens`]): every entity keeps the token recorded on it. The
//!   recorded RIDs of each table must be exactly `1..=N`, and every row is checked to land on
//!   its recorded RID. Paired with [`RawSignatures`] a parsed module is reproduced exactly.
//!
//! # Phases
//!
//! A build runs a fixed sequence of phases, each of which only references rows allocated by
//! an earlier one (or reserved up front by the token policy):
//!
//! 1. blobs, the `Module` row, `ModuleRef` and `AssemblyRef` rows
//! 2. standalone signatures and user strings
//! 3. `TypeSpec` and `MethodSpec` rows
//! 4. generic parameters and their constraints
//! 5. `TypeRef` and `MemberRef` rows
//! 6. fields, methods and parameters
//! 7. types and nesting relations
//!
//! Definition tokens and member ranges are attached before population, because every phase
//! resolves them. Reference tokens and heap offsets are copied back once the image is
//! complete. A failed build restores the definition tokens and ranges, so the module is left
//! exactly as it was handed in.
//!
//! # Examples
//!
//! ```rust
//! use cilmeta::prelude::*;
//!
//! let mut module = ModuleDefinition::new("Sample.dll");
//! module.add_type(TypeDefinition::new("", "<Module>", 0));
//!
//! let mut builder = MetadataBuilder::new(BuilderConfig::rebuild());
//! let image = builder.build(&mut module)?;
//!
//! assert_eq!(image.row_count(TableId::TypeDef), 1);
//! assert_eq!(module.types[0].token.value(), 0x0200_0001);
//! # Ok::<(), cilmeta::Error>(())
//! ```

mod config;
mod context;
mod definitions;
pub mod heaps;
mod image;
mod policy;
mod references;
mod signatures;
mod tables;

pub use config::{BuilderConfig, SignatureMode, TokenMode};
pub use heaps::{BlobHeap, GuidHeap, Heap, StringHeap, UserStringHeap};
pub use image::MetadataImage;
pub use policy::{OrderKey, PreserveTokens, RebuildTokens, TokenPolicy};
pub use signatures::{RawSignatures, SignatureStrategy, StructuralSignatures};
pub use tables::TableSet;

use crate::{
    builder::{context::BuildContext, policy::DefinitionSnapshot},
    model::ModuleDefinition,
    Error, Result,
};

/// Lifecycle of a [`MetadataBuilder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildState {
    /// No build was started
    NotStarted,
    /// A build is running, or failed and left the builder unusable
    Populating,
    /// The image was produced
    Finalized,
}

/// Builds the metadata image of one module.
///
/// A builder runs exactly one build. Create a new builder for every image.
pub struct MetadataBuilder {
    config: BuilderConfig,
    policy: Box<dyn TokenPolicy>,
    signatures: Box<dyn SignatureStrategy>,
    state: BuildState,
}

impl MetadataBuilder {
    /// Creates a builder with the token policy and signature strategy `config` selects.
    #[must_use]
    pub fn new(config: BuilderConfig) -> Self {
        let policy: Box<dyn TokenPolicy> = match config.token_mode {
            TokenMode::Rebuild => Box::new(RebuildTokens),
            TokenMode::Preserve => Box::new(PreserveTokens),
        };
        let signatures: Box<dyn SignatureStrategy> = match config.signature_mode {
            SignatureMode::Structural => Box::new(StructuralSignatures),
            SignatureMode::Raw => Box::new(RawSignatures),
        };

        MetadataBuilder {
            config,
            policy,
            signatures,
            state: BuildState::NotStarted,
        }
    }

    /// Replaces the token policy.
    #[must_use]
    pub fn with_token_policy(mut self, policy: impl TokenPolicy + 'static) -> Self {
        self.config.token_mode = policy.mode();
        self.policy = Box::new(policy);
        self
    }

    /// Replaces the signature strategy.
    #[must_use]
    pub fn with_signature_strategy(mut self, strategy: impl SignatureStrategy + 'static) -> Self {
        self.config.signature_mode = strategy.mode();
        self.signatures = Box::new(strategy);
        self
    }

    /// The configuration in effect.
    #[must_use]
    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Where this builder is in its lifecycle.
    #[must_use]
    pub fn state(&self) -> BuildState {
        self.state
    }

    /// Builds the tables and heaps of `module`.
    ///
    /// On success every entity's token is set to its row, every type's member ranges describe
    /// its rows, and user string and blob entries carry their heap offsets.
    ///
    /// # Errors
    /// Returns [`Error::InvalidBuildState`] if this builder already ran,
    /// [`Error::InvalidConfiguration`] if its token policy cannot be paired with its signature
    /// strategy, and any error of the build itself. A failed build produces no image and leaves the builder unusable.
    pub fn build(&mut self, module: &mut ModuleDefinition) -> Result<MetadataImage> {
        if self.state != BuildState::NotStarted {
            return Err(Error::InvalidBuildState(format!(
                "build requested in state {:?}, a builder runs exactly once",
                self.state
            )));
        }
        self.config.validate()?;
        self.state = BuildState::Populating;

        log::debug!(
            "Building metadata of {} in {:?} mode",
            module.name,
            self.policy.mode()
        );
        let snapshot = DefinitionSnapshot::capture(module);
        match self.populate(module) {
            Ok(image) => {
                self.state = BuildState::Finalized;
                Ok(image)
            }
            Err(error) => {
                snapshot.restore(module);
                Err(error)
            }
        }
    }

    fn populate(&self, module: &mut ModuleDefinition) -> Result<MetadataImage> {
        self.policy.attach_tokens(module)?;

        let (image, assignments) = BuildContext::new(
            module,
            self.config,
            self.policy.as_ref(),
            self.signatures.as_ref(),
        )
        .run()?;

        assignments.apply(module);
        Ok(image)
    }
}

impl Default for MetadataBuilder {
    fn default() -> Self {
        Self::new(BuilderConfig::default())
    }
}
