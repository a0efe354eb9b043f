//! The sync engine: one full reconciliation run.
//!
//! Load the snapshot, reconcile, build the write plan, apply it.
//! The engine owns none of the I/O; it drives the collaborator traits
//! and returns a report of what one pass did.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::columns::ColumnMap;
use crate::error::SyncResult;
use crate::plan::WritePlan;
use crate::reconcile::{reconcile, SkippedRecord};
use crate::record::ObservedRecord;
use crate::sheet::{RowWriter, SnapshotSource};

/// What one sync run did, for the caller's diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    /// Rows appended as new entities.
    pub appended: usize,
    /// Individual cells corrected on existing rows.
    pub updated_cells: usize,
    /// Observations dropped for an empty-after-trim key.
    pub skipped: Vec<SkippedRecord>,
    /// Stored entities at the start of the run.
    pub snapshot_size: usize,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// When the run finished.
    pub finished_at: DateTime<Utc>,
}

impl SyncReport {
    /// Number of observations dropped for invalid keys.
    #[must_use]
    pub fn skipped_invalid(&self) -> usize {
        self.skipped.len()
    }

    /// Returns true if the run wrote nothing.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.appended == 0 && self.updated_cells == 0
    }
}

/// Drives one reconciliation run against a sheet backend.
///
/// The engine is a pure coordinator: deterministic given the same
/// observed sequence and stored state, single-threaded, one
/// unparallelized reconcile call per run. Callers that scrape several
/// sources concurrently must collect all observations into a single
/// ordered sequence first, or the first-seen-wins dedup rule loses its
/// meaning.
///
/// # Examples
///
/// ```
/// use sheetsync::{ColumnMap, InMemorySheet, ObservedRecord, SyncEngine};
///
/// let columns = ColumnMap::new("name", ["name", "description"]).unwrap();
/// let mut sheet = InMemorySheet::new(columns.clone());
///
/// let engine = SyncEngine::new(columns);
/// let observed = vec![ObservedRecord::new("Acme").with_field("description", "Widgets")];
/// let report = engine.run(&mut sheet, &observed).unwrap();
/// assert_eq!(report.appended, 1);
/// ```
#[derive(Debug, Clone)]
pub struct SyncEngine {
    columns: ColumnMap,
}

impl SyncEngine {
    /// Creates an engine for the given column layout.
    #[must_use]
    pub fn new(columns: ColumnMap) -> Self {
        Self { columns }
    }

    /// The column layout this engine plans against.
    #[must_use]
    pub fn columns(&self) -> &ColumnMap {
        &self.columns
    }

    /// Runs one full pass: load, reconcile, plan, write.
    ///
    /// Cell corrections are applied before appends; both target disjoint
    /// rows (appends land below all existing data), so the order is
    /// immaterial to the result.
    ///
    /// # Errors
    ///
    /// Propagates sheet backend failures and plan construction errors.
    /// Per-record problems never error; they come back in the report.
    pub fn run<S>(&self, sheet: &mut S, observed: &[ObservedRecord]) -> SyncResult<SyncReport>
    where
        S: SnapshotSource + RowWriter,
    {
        let started_at = Utc::now();

        let snapshot = sheet.load_snapshot()?;
        let outcome = reconcile(observed, &snapshot);
        let plan = WritePlan::build(&outcome, &self.columns)?;

        for cell in &plan.cells {
            sheet.write_cell(cell.location, cell.column, cell.value.clone())?;
        }
        if !plan.rows.is_empty() {
            sheet.append_rows(plan.rows.clone())?;
        }

        Ok(SyncReport {
            appended: plan.rows.len(),
            updated_cells: plan.cells.len(),
            skipped: outcome.skipped,
            snapshot_size: snapshot.len(),
            started_at,
            finished_at: Utc::now(),
        })
    }
}
