//! # sheetsync - entity reconciliation for tabular stores
//!
//! sheetsync decides how freshly scraped entity records merge into a
//! persistent spreadsheet-like store. It never deletes, never reorders,
//! and never duplicates: each run splits the observed records into rows
//! to append and individual cells to correct.
//!
//! ## Core Concepts
//!
//! - **ObservedRecord**: a freshly scraped entity (natural key + fields)
//! - **Snapshot**: the stored rows as they looked at the start of the run
//! - **ReconcileOutcome**: appends, field updates, and skipped diagnostics
//! - **SyncEngine**: one load → reconcile → plan → write pass over a sheet
//!
//! ## Usage
//!
//! ```rust
//! use sheetsync::{ColumnMap, InMemorySheet, ObservedRecord, SyncEngine};
//!
//! let columns = ColumnMap::new("name", ["name", "description"]).unwrap();
//! let mut sheet = InMemorySheet::new(columns.clone());
//!
//! let observed = vec![ObservedRecord::new("Acme")
//!     .with_field("description", "Widgets")];
//!
//! let engine = SyncEngine::new(columns);
//! let report = engine.run(&mut sheet, &observed).unwrap();
//! assert_eq!(report.appended, 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Core data model and the reconciliation pass
pub mod columns;
pub mod error;
pub mod plan;
pub mod record;
pub mod reconcile;
pub mod snapshot;

// External collaborator contracts and the run driver
pub mod engine;
pub mod sheet;

// Row classification helpers layered on top of the data model
pub mod keywords;
pub mod status;

// Re-export primary types at crate root for convenience
pub use columns::ColumnMap;
pub use engine::{SyncEngine, SyncReport};
pub use error::{PlanError, SyncError, SyncResult};
pub use keywords::KeywordTally;
pub use plan::{CellWrite, WritePlan};
pub use record::{FieldMap, ObservedRecord, RowLocation, StoredRecord};
pub use reconcile::{reconcile, FieldUpdate, ReconcileOutcome, SkippedRecord};
pub use sheet::{InMemorySheet, RowWriter, SheetError, SnapshotSource};
pub use snapshot::Snapshot;
pub use status::{ApplicationStatus, StatusBreakdown, Timeline};
