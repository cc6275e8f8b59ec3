//! Append-only row storage for one metadata table.

use crate::{
    metadata::{
        tables::types::{RowWritable, TableId, TableInfoRef},
        token::Token,
    },
    utils::to_u32,
    Result,
};

/// A row type that belongs to one specific metadata table.
pub trait TableRow {
    /// The table this row type is stored in.
    const TABLE_ID: TableId;

    /// The row id the row was created for.
    fn rid(&self) -> u32;
}

/// The rows of one metadata table, in RID order.
///
/// Rows can only be appended. The N-th appended row must carry RID N, which keeps the RID
/// sequence of every table exactly `1..=N`. A store may additionally *reserve* RIDs ahead
/// of their rows: a reserved RID counts as allocated, so other rows can reference it
/// before the row itself is appended. A finished table has filled all reservations.
#[derive(Debug, Clone)]
pub struct RowStore<T> {
    rows: Vec<T>,
    reserved: u32,
}

impl<T> Default for RowStore<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            reserved: 0,
        }
    }
}

impl<T: TableRow> RowStore<T> {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The table this store holds.
    #[must_use]
    pub fn table_id(&self) -> TableId {
        T::TABLE_ID
    }

    /// The RID the next appended row receives.
    ///
    /// # Errors
    /// Returns an error if the table outgrew the 24-bit RID space.
    pub fn next_rid(&self) -> Result<u32> {
        let next = to_u32(self.rows.len() + 1)?;
        if next > 0x00FF_FFFF {
            return Err(malformed_error!(
                "{} table exceeds the 24-bit row id space",
                T::TABLE_ID.name()
            ));
        }

        Ok(next)
    }

    /// The token the next appended row receives.
    ///
    /// # Errors
    /// Returns an error if the table outgrew the 24-bit RID space.
    pub fn next_token(&self) -> Result<Token> {
        Ok(Token::from_parts(T::TABLE_ID, self.next_rid()?))
    }

    /// Appends `row` and returns its RID, which is the row count after the append.
    ///
    /// # Errors
    /// Returns an error if the row was created for a different RID than the next one.
    pub fn push(&mut self, row: T) -> Result<u32> {
        let rid = self.next_rid()?;
        if row.rid() != rid {
            return Err(malformed_error!(
                "{} row created for RID {} appended at RID {}",
                T::TABLE_ID.name(),
                row.rid(),
                rid
            ));
        }

        self.rows.push(row);
        Ok(rid)
    }

    /// Reserves RIDs `1..=count`, making them referenceable before their rows exist.
    pub fn reserve(&mut self, count: u32) {
        self.reserved = self.reserved.max(count);
        self.rows.reserve((count as usize).saturating_sub(self.rows.len()));
    }

    /// Number of reserved RIDs.
    #[must_use]
    pub fn reserved(&self) -> u32 {
        self.reserved
    }

    /// Returns true if `rid` names an appended or reserved row.
    #[must_use]
    pub fn is_allocated(&self, rid: u32) -> bool {
        rid != 0 && (rid as usize <= self.rows.len() || rid <= self.reserved)
    }

    /// Returns true once every reserved RID has its row.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.rows.len() >= self.reserved as usize
    }

    /// Returns the row with the given RID.
    #[must_use]
    pub fn get(&self, rid: u32) -> Option<&T> {
        if rid == 0 {
            return None;
        }
        self.rows.get(rid as usize - 1)
    }

    /// Iterates the rows in RID order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.rows.iter()
    }

    /// The rows in RID order.
    #[must_use]
    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    /// Number of appended rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if no row was appended.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<T: TableRow + RowWritable> RowStore<T> {
    /// Serializes the whole table as consecutive fixed-width rows.
    ///
    /// # Errors
    /// Returns an error if a row cannot be written with the given index widths.
    pub fn to_bytes(&self, sizes: &TableInfoRef) -> Result<Vec<u8>> {
        let row_size = T::row_size(sizes) as usize;
        let mut data = vec![0u8; row_size * self.rows.len()];
        let mut offset = 0;

        for row in &self.rows {
            row.row_write(&mut data, &mut offset, row.rid(), sizes)?;
        }

        Ok(data)
    }
}

impl<'a, T> IntoIterator for &'a RowStore<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
