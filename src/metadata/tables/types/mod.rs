//! Shared building blocks of the metadata tables: table identifiers, coded indices,
//! index widths, row storage and row serialization.

mod codedindex;
mod store;
mod tableid;
mod tableinfo;
mod write;

pub use codedindex::{CodedIndex, CodedIndexType};
pub use store::{RowStore, TableRow};
pub use tableid::{TableId, TABLE_COUNT};
pub use tableinfo::{TableInfo, TableInfoRef, TableRowInfo};
pub use write::RowWritable;
