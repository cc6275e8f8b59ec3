//! Metadata tables (ECMA-335 Partition II, Section 22).
//!
//! Every table the builder populates lives in its own module and provides one `*Raw` row
//! type: the row as stored in the `#~` stream, with heap offsets, table indices and coded
//! indices already resolved to numbers. Row types implement [`TableRow`] to tie them to
//! their [`TableId`] and [`RowWritable`] for their binary layout.
//!
//! The shared infrastructure ([`TableId`], [`CodedIndexType`], [`TableInfo`], [`RowStore`])
//! lives in the `types` module and is re-exported here.

mod assemblyref;
mod field;
mod genericparam;
mod genericparamconstraint;
mod memberref;
mod methoddef;
mod methodspec;
mod module;
mod moduleref;
mod nestedclass;
mod param;
mod standalonesig;
mod typedef;
mod typeref;
mod types;
mod typespec;

pub use assemblyref::*;
pub use field::*;
pub use genericparam::*;
pub use genericparamconstraint::*;
pub use memberref::*;
pub use methoddef::*;
pub use methodspec::*;
pub use module::*;
pub use moduleref::*;
pub use nestedclass::*;
pub use param::*;
pub use standalonesig::*;
pub use typedef::*;
pub use typeref::*;
pub use types::*;
pub use typespec::*;
