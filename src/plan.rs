//! Write planning.
//!
//! A [`ReconcileOutcome`] speaks in field names; a writer speaks in
//! column indices. `WritePlan` bridges the two through the explicit
//! [`ColumnMap`], rendering appends as fixed-order rows and updates as
//! addressed cell writes.

use serde::{Deserialize, Serialize};

use crate::columns::ColumnMap;
use crate::error::PlanError;
use crate::reconcile::ReconcileOutcome;
use crate::record::RowLocation;

/// One concrete cell write: value into `(row, column)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellWrite {
    /// Target row.
    pub location: RowLocation,
    /// Zero-based column index.
    pub column: usize,
    /// Value to write.
    pub value: String,
}

/// The concrete writes for one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WritePlan {
    /// Rows to append, each a fixed-order list of cell values.
    pub rows: Vec<Vec<String>>,
    /// Individual cell corrections.
    pub cells: Vec<CellWrite>,
}

impl WritePlan {
    /// Maps a reconcile outcome onto a column layout.
    ///
    /// Append order and cell order are preserved from the outcome.
    ///
    /// # Errors
    ///
    /// `PlanError::UnknownField` when an update names a field the column
    /// map does not carry. This is a caller configuration error, not a
    /// data problem: the reconciler only emits fields it observed, so a
    /// missing column means the scraper and the sheet disagree on layout.
    pub fn build(outcome: &ReconcileOutcome, columns: &ColumnMap) -> Result<Self, PlanError> {
        let rows = outcome.appends.iter().map(|r| columns.to_row(r)).collect();

        let mut cells = Vec::with_capacity(outcome.updates.len());
        for update in &outcome.updates {
            let column = columns
                .index_of(&update.field)
                .ok_or_else(|| PlanError::UnknownField {
                    field: update.field.clone(),
                })?;
            cells.push(CellWrite {
                location: update.location,
                column,
                value: update.value.clone(),
            });
        }

        Ok(Self { rows, cells })
    }

    /// Returns true if the plan carries no writes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.cells.is_empty()
    }
}
