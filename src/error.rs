//! Error types for sheetsync.
//!
//! Per-record problems (empty keys, missing field mappings) are never
//! errors: the reconciler handles them by skipping and reporting counts.
//! The types here cover the things that can genuinely fail a run — the
//! external sheet collaborators and plan construction.

use thiserror::Error;

use crate::sheet::SheetError;

/// Errors raised while turning a reconcile outcome into concrete writes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    /// An update names a field with no column in the column map.
    #[error("Field '{field}' has no column in the column map")]
    UnknownField {
        /// The unmapped field name.
        field: String,
    },
}

/// Top-level error type for a sync run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The sheet collaborator failed to load or write.
    #[error("Sheet error: {0}")]
    Sheet(#[from] SheetError),

    /// The outcome could not be mapped onto the sheet's columns.
    #[error("Plan error: {0}")]
    Plan(#[from] PlanError),

    /// Internal error.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the failure.
        message: String,
    },
}

impl SyncError {
    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true if this is a sheet collaborator error.
    #[must_use]
    pub const fn is_sheet(&self) -> bool {
        matches!(self, Self::Sheet(_))
    }

    /// Returns true if this is a plan construction error.
    #[must_use]
    pub const fn is_plan(&self) -> bool {
        matches!(self, Self::Plan(_))
    }
}

/// Result type alias for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;
