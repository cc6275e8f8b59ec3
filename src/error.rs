use thiserror::Error;

use crate::metadata::{tables::TableId, token::Token};

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Every variant aborts the build that produced it. A metadata image is either fully consistent
/// or not produced at all, so there is no partial result to recover and no internal retry; the
/// caller fixes the object model and runs a fresh build.
///
/// # Error Categories
///
/// ## Contract Violations
/// - [`Error::UnresolvedToken`] - A row referenced a token whose row was never allocated
/// - [`Error::InvalidCodedIndex`] - A token was encoded into a coded index that cannot hold its table
/// - [`Error::InvalidBuildState`] - The build lifecycle was driven out of order
/// - [`Error::InvalidConfiguration`] - The token policy and signature strategy cannot be combined
/// - [`Error::NonDenseTokens`] - Preserve mode found a gap or a duplicate among recorded RIDs
/// - [`Error::TokenMismatch`] - Preserve mode re-inserted an entity at a different RID
/// - [`Error::MemberRangeMismatch`] - A type's fields or methods cannot form a contiguous run
/// - [`Error::HeapOffsetMismatch`] - A preserved heap entry did not land on its recorded offset
///
/// ## Upstream Inconsistencies
/// - [`Error::Malformed`] - The object model contradicts itself (dangling handles, bad owners)
/// - [`Error::GenericParamNotFound`] - A constraint names a generic parameter that does not exist
///
/// ## Encoding Limits
/// - [`Error::HeapOverflow`] - Content too large for the heap or for compressed length encoding
/// - [`Error::OutOfBounds`] - A row did not fit into its output buffer
///
/// # Examples
///
/// ```rust
/// use cilmeta::prelude::*;
///
/// let mut module = ModuleDefinition::new("Sample.dll");
/// let mut builder = MetadataBuilder::new(BuilderConfig::rebuild());
///
/// match builder.build(&mut module) {
///     Ok(image) => println!("{} TypeDef rows", image.row_count(TableId::TypeDef)),
///     Err(Error::NonDenseTokens { table, .. }) => eprintln!("{table:?} tokens are not dense"),
///     Err(e) => eprintln!("build failed: {e}"),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The object model is internally inconsistent.
    ///
    /// Raised for dangling entity handles, owners of the wrong kind and similar upstream
    /// problems. Includes the source location where the inconsistency was detected.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// An out of bound write was attempted while serializing a row.
    #[error("Out of Bound write would have occurred!")]
    OutOfBounds,

    /// A row referenced a token that has no allocated row in its table.
    ///
    /// Coded and simple indices may only point at rows that already exist (or were reserved
    /// by the token policy) when the referencing row is encoded.
    #[error("Token {0} does not resolve to an allocated row")]
    UnresolvedToken(Token),

    /// A token was encoded into a coded index whose candidate tables do not include it.
    #[error("Token {token} cannot be encoded as a {scheme} coded index")]
    InvalidCodedIndex {
        /// The token that was being encoded
        token: Token,
        /// Name of the coding scheme
        scheme: &'static str,
    },

    /// The build lifecycle was driven out of order, e.g. a finalized builder was reused.
    #[error("Invalid build state transition: {0}")]
    InvalidBuildState(String),

    /// The selected token policy and signature strategy cannot produce a consistent image.
    #[error("Invalid builder configuration: {0}")]
    InvalidConfiguration(String),

    /// Recorded RIDs of a table are not exactly `1..=N`.
    ///
    /// Preserve mode reproduces original tokens by re-inserting rows in RID order, which only
    /// works when the recorded RIDs have neither gaps nor duplicates.
    #[error("Recorded {table:?} tokens are not dense: expected RID {expected}, found {found}")]
    NonDenseTokens {
        /// The table whose recorded tokens are broken
        table: TableId,
        /// The RID that sequential insertion would assign next
        expected: u32,
        /// The recorded RID found at that position
        found: u32,
    },

    /// A preserve-mode insertion produced a different token than the one recorded.
    #[error("Token mismatch: recorded {expected}, rebuilt {actual}")]
    TokenMismatch {
        /// The token recorded on the entity
        expected: Token,
        /// The token the rebuilt row received
        actual: Token,
    },

    /// A preserved heap entry was re-inserted at a different offset.
    #[error("{heap} entry recorded at offset 0x{expected:X} was rebuilt at 0x{actual:X}")]
    HeapOffsetMismatch {
        /// The heap name (e.g. `#Blob`)
        heap: &'static str,
        /// The recorded offset
        expected: u32,
        /// The offset obtained from the rebuilt heap
        actual: u32,
    },

    /// A type's fields or methods cannot be described by one contiguous `(start, length)` run.
    #[error("Member range of type {owner} is invalid: {message}")]
    MemberRangeMismatch {
        /// The owning type
        owner: Token,
        /// What went wrong
        message: String,
    },

    /// A generic parameter constraint refers to a generic parameter key that does not exist.
    #[error("GenericParamConstraint {constraint} refers to unknown generic parameter {owner}")]
    GenericParamNotFound {
        /// The constraint entity
        constraint: Token,
        /// The generic parameter key it refers to
        owner: Token,
    },

    /// Heap content is too large to be stored or length-prefixed.
    #[error("{heap} content of {size} bytes exceeds the encodable size")]
    HeapOverflow {
        /// The heap name (e.g. `#Blob`)
        heap: &'static str,
        /// The offending size in bytes
        size: usize,
    },
}
