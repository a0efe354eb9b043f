//! External sheet collaborators.
//!
//! The reconciler itself performs no I/O. These traits define the two
//! contracts it consumes: a snapshot loader that reads every stored row
//! once per run, and a writer that applies appends and cell corrections.
//! An in-memory backend implements both for tests and embedded use.

mod memory;
mod traits;

pub use memory::InMemorySheet;
pub use traits::{RowWriter, SheetError, SnapshotSource};
