//! Abstract sheet traits.
//!
//! These traits define the contract that sheet backends must implement.
//! By using traits, we enable:
//! - In-memory backends for testing and embedded use
//! - Spreadsheet-API backends for production
//!
//! The reconciler only ever needs "read all rows as ordered tuples",
//! "append rows", and "write specific cells"; everything else about the
//! backing store is opaque.

use thiserror::Error;

use crate::record::RowLocation;
use crate::snapshot::Snapshot;

/// Errors that can occur during sheet operations.
#[derive(Debug, Error)]
pub enum SheetError {
    /// The backend could not be reached or answered with a failure.
    #[error("Sheet backend error: {0}")]
    Backend(String),

    /// A cell write addressed a row the backend does not have.
    #[error("Row not found: {0}")]
    RowNotFound(RowLocation),

    /// A cell write addressed a column the backend does not have.
    #[error("Column index {index} out of range ({columns} columns)")]
    ColumnOutOfRange {
        /// The offending zero-based column index.
        index: usize,
        /// Number of columns the sheet actually has.
        columns: usize,
    },
}

/// Loads the stored snapshot at the start of a run.
///
/// Implementations must return at most one entry per natural key (first
/// occurrence wins when the source contains duplicates) and must assign
/// each entry the one-based row location it currently occupies.
pub trait SnapshotSource {
    /// Reads every stored entity into a snapshot.
    ///
    /// # Errors
    /// `SheetError::Backend` when the store cannot be read.
    fn load_snapshot(&self) -> Result<Snapshot, SheetError>;
}

/// Applies reconciliation output to the backing store.
///
/// One writer serves one run; the reconciler is single-threaded by
/// design, so the trait takes `&mut self` rather than relying on
/// interior mutability.
pub trait RowWriter {
    /// Appends rows below all existing data.
    ///
    /// Each row is a fixed-order list of cell values matching the sheet's
    /// column order. Appending must not reuse or overwrite any row
    /// location referenced by a loaded snapshot.
    ///
    /// # Errors
    /// `SheetError::Backend` when the store rejects the write.
    fn append_rows(&mut self, rows: Vec<Vec<String>>) -> Result<(), SheetError>;

    /// Writes one value into the cell at `(location, column)`.
    ///
    /// Writes to distinct cells are order-independent; the planner never
    /// emits the same cell twice in one run.
    ///
    /// # Errors
    /// `SheetError::RowNotFound` or `SheetError::ColumnOutOfRange` when
    /// the cell does not exist, `SheetError::Backend` otherwise.
    fn write_cell(
        &mut self,
        location: RowLocation,
        column: usize,
        value: String,
    ) -> Result<(), SheetError>;
}
