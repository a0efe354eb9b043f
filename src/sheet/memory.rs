//! In-memory sheet backend.
//!
//! A plain grid of string cells implementing both collaborator traits.
//! Used by the integration tests to run full sync passes without a
//! spreadsheet API, and usable as an embedded store in its own right.

use crate::columns::ColumnMap;
use crate::record::RowLocation;
use crate::snapshot::Snapshot;

use super::traits::{RowWriter, SheetError, SnapshotSource};

/// An in-memory grid of rows with a fixed column layout.
///
/// Row locations are one-based and count from `first_row`, mirroring how
/// spreadsheet data commonly starts below a header band.
///
/// # Examples
///
/// ```
/// use sheetsync::{ColumnMap, InMemorySheet, SnapshotSource};
///
/// let columns = ColumnMap::new("name", ["name", "description"]).unwrap();
/// let sheet = InMemorySheet::with_rows(
///     columns,
///     vec![vec!["Acme".to_string(), "Widgets".to_string()]],
/// );
/// let snapshot = sheet.load_snapshot().unwrap();
/// assert_eq!(snapshot.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct InMemorySheet {
    columns: ColumnMap,
    rows: Vec<Vec<String>>,
    first_row: u32,
}

impl InMemorySheet {
    /// Creates an empty sheet with data starting at row 1.
    #[must_use]
    pub fn new(columns: ColumnMap) -> Self {
        Self::with_rows(columns, Vec::new())
    }

    /// Creates a sheet pre-populated with rows, data starting at row 1.
    #[must_use]
    pub fn with_rows(columns: ColumnMap, rows: Vec<Vec<String>>) -> Self {
        Self {
            columns,
            rows,
            first_row: 1,
        }
    }

    /// Moves the first data row, as when header rows occupy the top of
    /// the sheet.
    #[must_use]
    pub fn starting_at(mut self, first_row: u32) -> Self {
        self.first_row = first_row.max(1);
        self
    }

    /// The sheet's column layout.
    #[must_use]
    pub fn columns(&self) -> &ColumnMap {
        &self.columns
    }

    /// Number of data rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// The raw rows, in sheet order.
    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Reads one cell; `None` when the row is absent, empty string when
    /// only the cell is.
    #[must_use]
    pub fn cell(&self, location: RowLocation, column: usize) -> Option<&str> {
        let row = self.row_index(location)?;
        Some(self.rows.get(row)?.get(column).map_or("", String::as_str))
    }

    fn row_index(&self, location: RowLocation) -> Option<usize> {
        let offset = location.get().checked_sub(self.first_row)?;
        usize::try_from(offset).ok()
    }
}

impl SnapshotSource for InMemorySheet {
    fn load_snapshot(&self) -> Result<Snapshot, SheetError> {
        Ok(Snapshot::from_rows(
            self.columns.fields(),
            self.columns.key_field(),
            self.first_row,
            &self.rows,
        ))
    }
}

impl RowWriter for InMemorySheet {
    fn append_rows(&mut self, rows: Vec<Vec<String>>) -> Result<(), SheetError> {
        for mut row in rows {
            // Normalize to the column count so later cell reads line up.
            row.resize(self.columns.len(), String::new());
            self.rows.push(row);
        }
        Ok(())
    }

    fn write_cell(
        &mut self,
        location: RowLocation,
        column: usize,
        value: String,
    ) -> Result<(), SheetError> {
        if column >= self.columns.len() {
            return Err(SheetError::ColumnOutOfRange {
                index: column,
                columns: self.columns.len(),
            });
        }
        let index = self
            .row_index(location)
            .filter(|i| *i < self.rows.len())
            .ok_or(SheetError::RowNotFound(location))?;

        let row = &mut self.rows[index];
        if row.len() <= column {
            row.resize(column + 1, String::new());
        }
        row[column] = value;
        Ok(())
    }
}
