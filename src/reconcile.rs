//! The Entity Reconciler.
//!
//! `reconcile` is a pure function over two immutable inputs: the observed
//! records of one scrape and the stored snapshot loaded at the start of
//! the run. It produces two disjoint instruction sets for the external
//! writer: whole records to append and individual cells to correct. It
//! never deletes, never reorders, and never raises for per-record
//! problems; invalid records are dropped and reported back as data.
//!
//! Matching is exact on the trimmed natural key. No fuzzy or
//! case-insensitive matching: over-aggressive matching silently merges
//! distinct entities, which is worse than an occasional duplicate row.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::record::{ObservedRecord, RowLocation};
use crate::snapshot::Snapshot;

/// One cell correction for the external writer.
///
/// Any two updates with different locations or fields may be applied in
/// any order without conflict; the reconciler never emits the same
/// `(location, field)` pair twice in one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldUpdate {
    /// Row of the stored record being corrected.
    pub location: RowLocation,
    /// Field whose cell receives the new value.
    pub field: String,
    /// The freshly observed, non-empty value.
    pub value: String,
}

/// Diagnostic entry for an observation dropped for an invalid key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRecord {
    /// Position of the observation in the input sequence.
    pub index: usize,
    /// The offending name, as scraped.
    pub name: String,
}

/// Everything one reconciliation pass decided.
///
/// `appends` preserves the input order of first-seen unmatched
/// observations; `updates` preserves the input order of the triggering
/// observations, then the field order of each observed record. Together
/// they touch each natural key at most once for append and each
/// `(key, field)` pair at most once for update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileOutcome {
    /// Records with no stored counterpart, to append as new rows.
    pub appends: Vec<ObservedRecord>,
    /// Cell corrections for records that already have a row.
    pub updates: Vec<FieldUpdate>,
    /// Observations dropped for an empty-after-trim key.
    pub skipped: Vec<SkippedRecord>,
}

impl ReconcileOutcome {
    /// Number of observations dropped for invalid keys.
    #[must_use]
    pub fn skipped_invalid(&self) -> usize {
        self.skipped.len()
    }

    /// Returns true if the pass produced no writes at all.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.appends.is_empty() && self.updates.is_empty()
    }
}

/// Reconciles freshly observed records against the stored snapshot.
///
/// Observations are evaluated in input order:
///
/// 1. A key already finalized earlier in the run is skipped outright,
///    even if its field values differ from the first occurrence.
/// 2. A key present in the snapshot emits one [`FieldUpdate`] per observed
///    non-empty field whose stored value is absent or different. An
///    observed empty value never overwrites stored data.
/// 3. An unmatched key is appended whole (name trimmed) and joins the
///    effective stored set, so a later duplicate is a skip, not a second
///    append.
///
/// Records whose key is empty after trimming are dropped and reported in
/// [`ReconcileOutcome::skipped`]; nothing here is fatal.
///
/// # Examples
///
/// ```
/// use sheetsync::{reconcile, ObservedRecord, RowLocation, Snapshot, StoredRecord};
///
/// let snapshot: Snapshot = [StoredRecord::new("Acme", RowLocation::new(5).unwrap())
///     .with_field("description", "")]
/// .into_iter()
/// .collect();
///
/// let observed = vec![ObservedRecord::new("Acme").with_field("description", "Widgets")];
/// let outcome = reconcile(&observed, &snapshot);
///
/// assert!(outcome.appends.is_empty());
/// assert_eq!(outcome.updates.len(), 1);
/// assert_eq!(outcome.updates[0].value, "Widgets");
/// ```
#[must_use]
pub fn reconcile(observed: &[ObservedRecord], snapshot: &Snapshot) -> ReconcileOutcome {
    let mut outcome = ReconcileOutcome::default();
    let mut finalized: HashSet<String> = HashSet::new();

    for (index, record) in observed.iter().enumerate() {
        let key = record.key();
        if key.is_empty() {
            outcome.skipped.push(SkippedRecord {
                index,
                name: record.name.clone(),
            });
            continue;
        }

        // Rule 1: one instruction per key per run, first seen wins.
        if finalized.contains(key) {
            continue;
        }

        if let Some(stored) = snapshot.get(key) {
            // Rule 2: correct cells where the fresh value is non-empty
            // and the stored one is absent, empty, or different.
            for (field, value) in record.fields.iter() {
                if value.is_empty() {
                    continue;
                }
                if stored.fields.get_or_empty(field) != value {
                    outcome.updates.push(FieldUpdate {
                        location: stored.location,
                        field: field.to_string(),
                        value: value.to_string(),
                    });
                }
            }
        } else {
            // Rule 3: brand new entity, append whole.
            let mut append = record.clone();
            append.name = key.to_string();
            outcome.appends.push(append);
        }

        // A clean match still finalizes the key so duplicates stay silent.
        finalized.insert(key.to_string());
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::StoredRecord;

    fn loc(index: u32) -> RowLocation {
        RowLocation::new(index).unwrap()
    }

    fn stored(records: Vec<StoredRecord>) -> Snapshot {
        records.into_iter().collect()
    }

    #[test]
    fn test_update_fills_empty_stored_field() {
        let snapshot = stored(vec![
            StoredRecord::new("Acme", loc(5)).with_field("desc", "")
        ]);
        let observed = vec![ObservedRecord::new("Acme").with_field("desc", "Widgets")];

        let outcome = reconcile(&observed, &snapshot);

        assert!(outcome.appends.is_empty());
        assert_eq!(
            outcome.updates,
            vec![FieldUpdate {
                location: loc(5),
                field: "desc".to_string(),
                value: "Widgets".to_string(),
            }]
        );
    }

    #[test]
    fn test_update_on_absent_stored_field() {
        // Absent field is equivalent to never populated.
        let snapshot = stored(vec![StoredRecord::new("Acme", loc(3))]);
        let observed = vec![ObservedRecord::new("Acme").with_field("size", "10-50")];

        let outcome = reconcile(&observed, &snapshot);
        assert_eq!(outcome.updates.len(), 1);
        assert_eq!(outcome.updates[0].field, "size");
    }

    #[test]
    fn test_no_op_when_value_already_correct() {
        let snapshot = stored(vec![
            StoredRecord::new("Beta", loc(2)).with_field("desc", "same")
        ]);
        let observed = vec![ObservedRecord::new("Beta").with_field("desc", "same")];

        let outcome = reconcile(&observed, &snapshot);
        assert!(outcome.is_noop());
        assert_eq!(outcome.skipped_invalid(), 0);
    }

    #[test]
    fn test_differing_value_overwrites() {
        let snapshot = stored(vec![
            StoredRecord::new("Acme", loc(1)).with_field("desc", "stale")
        ]);
        let observed = vec![ObservedRecord::new("Acme").with_field("desc", "fresh")];

        let outcome = reconcile(&observed, &snapshot);
        assert_eq!(outcome.updates.len(), 1);
        assert_eq!(outcome.updates[0].value, "fresh");
    }

    #[test]
    fn test_empty_observation_never_regresses_stored_value() {
        let snapshot = stored(vec![
            StoredRecord::new("Acme", loc(1)).with_field("desc", "kept")
        ]);
        let observed = vec![ObservedRecord::new("Acme").with_field("desc", "")];

        let outcome = reconcile(&observed, &snapshot);
        assert!(outcome.is_noop());
    }

    #[test]
    fn test_unmatched_record_appends_whole() {
        let observed = vec![ObservedRecord::new("NewCo").with_field("desc", "X")];
        let outcome = reconcile(&observed, &Snapshot::new());

        assert!(outcome.updates.is_empty());
        assert_eq!(outcome.appends.len(), 1);
        assert_eq!(outcome.appends[0].name, "NewCo");
        assert_eq!(outcome.appends[0].fields.get("desc"), Some("X"));
    }

    #[test]
    fn test_duplicate_observation_first_wins() {
        let observed = vec![
            ObservedRecord::new("NewCo").with_field("desc", "X"),
            ObservedRecord::new("NewCo").with_field("desc", "Y"),
        ];
        let outcome = reconcile(&observed, &Snapshot::new());

        assert_eq!(outcome.appends.len(), 1);
        assert_eq!(outcome.appends[0].fields.get("desc"), Some("X"));
        assert!(outcome.updates.is_empty());
    }

    #[test]
    fn test_duplicate_after_match_stays_silent() {
        // A matched key with no updates still finalizes, so the second
        // occurrence produces nothing even with a differing value.
        let snapshot = stored(vec![
            StoredRecord::new("Beta", loc(2)).with_field("desc", "same")
        ]);
        let observed = vec![
            ObservedRecord::new("Beta").with_field("desc", "same"),
            ObservedRecord::new("Beta").with_field("desc", "different"),
        ];

        let outcome = reconcile(&observed, &snapshot);
        assert!(outcome.is_noop());
    }

    #[test]
    fn test_whitespace_key_skipped_with_diagnostic() {
        let observed = vec![
            ObservedRecord::new("   ").with_field("desc", "ghost"),
            ObservedRecord::new("Real").with_field("desc", "X"),
        ];
        let outcome = reconcile(&observed, &Snapshot::new());

        assert_eq!(outcome.skipped_invalid(), 1);
        assert_eq!(outcome.skipped[0].index, 0);
        assert_eq!(outcome.appends.len(), 1);
        assert_eq!(outcome.appends[0].name, "Real");
    }

    #[test]
    fn test_key_matching_trims_but_stays_case_sensitive() {
        let snapshot = stored(vec![
            StoredRecord::new("Acme", loc(1)).with_field("desc", "old")
        ]);
        let observed = vec![
            ObservedRecord::new("  Acme  ").with_field("desc", "new"),
            ObservedRecord::new("ACME").with_field("desc", "shouty"),
        ];

        let outcome = reconcile(&observed, &snapshot);

        // Trimmed match updates; the case variant is a distinct entity.
        assert_eq!(outcome.updates.len(), 1);
        assert_eq!(outcome.updates[0].value, "new");
        assert_eq!(outcome.appends.len(), 1);
        assert_eq!(outcome.appends[0].name, "ACME");
    }

    #[test]
    fn test_append_name_is_trimmed() {
        let observed = vec![ObservedRecord::new(" NewCo ")];
        let outcome = reconcile(&observed, &Snapshot::new());
        assert_eq!(outcome.appends[0].name, "NewCo");
    }

    #[test]
    fn test_append_then_duplicate_treated_as_duplicate_not_second_append() {
        let observed = vec![
            ObservedRecord::new("NewCo").with_field("desc", "X"),
            ObservedRecord::new(" NewCo ").with_field("desc", "Y"),
        ];
        let outcome = reconcile(&observed, &Snapshot::new());
        assert_eq!(outcome.appends.len(), 1);
    }

    #[test]
    fn test_appends_preserve_input_order() {
        let observed = vec![
            ObservedRecord::new("C"),
            ObservedRecord::new("A"),
            ObservedRecord::new("B"),
        ];
        let outcome = reconcile(&observed, &Snapshot::new());
        let names: Vec<_> = outcome.appends.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["C", "A", "B"]);
    }

    #[test]
    fn test_updates_preserve_observation_then_field_order() {
        let snapshot = stored(vec![
            StoredRecord::new("Acme", loc(1)),
            StoredRecord::new("Beta", loc(2)),
        ]);
        let observed = vec![
            ObservedRecord::new("Beta")
                .with_field("z_field", "1")
                .with_field("a_field", "2"),
            ObservedRecord::new("Acme").with_field("desc", "3"),
        ];

        let outcome = reconcile(&observed, &snapshot);
        let order: Vec<_> = outcome
            .updates
            .iter()
            .map(|u| (u.location.get(), u.field.as_str()))
            .collect();
        // Beta first (observation order), its fields in map order, then Acme.
        assert_eq!(order, vec![(2, "z_field"), (2, "a_field"), (1, "desc")]);
    }

    #[test]
    fn test_mixed_fields_update_only_where_needed() {
        let snapshot = stored(vec![StoredRecord::new("Acme", loc(4))
            .with_field("desc", "correct")
            .with_field("size", "")]);
        let observed = vec![ObservedRecord::new("Acme")
            .with_field("desc", "correct")
            .with_field("size", "10-50")
            .with_field("location", "Remote")];

        let outcome = reconcile(&observed, &snapshot);
        let fields: Vec<_> = outcome.updates.iter().map(|u| u.field.as_str()).collect();
        assert_eq!(fields, vec!["size", "location"]);
    }

    #[test]
    fn test_keys_touched_at_most_once_across_outputs() {
        let snapshot = stored(vec![
            StoredRecord::new("Stored", loc(1)).with_field("desc", "old")
        ]);
        let observed = vec![
            ObservedRecord::new("Stored").with_field("desc", "new"),
            ObservedRecord::new("Fresh").with_field("desc", "X"),
            ObservedRecord::new("Stored").with_field("desc", "other"),
            ObservedRecord::new("Fresh").with_field("desc", "Y"),
        ];

        let outcome = reconcile(&observed, &snapshot);

        let appended: Vec<_> = outcome.appends.iter().map(|r| r.key()).collect();
        assert_eq!(appended, vec!["Fresh"]);
        assert_eq!(outcome.updates.len(), 1);
        // Appends and updates are disjoint on keys.
        assert!(!appended.contains(&"Stored"));
    }

    #[test]
    fn test_all_empty_fields_record_matching_stored_is_noop() {
        // The missing-field-mapping shape: all-empty fields, valid key.
        let snapshot = stored(vec![StoredRecord::new("Acme", loc(1))]);
        let observed = vec![ObservedRecord::new("Acme")];

        let outcome = reconcile(&observed, &snapshot);
        assert!(outcome.is_noop());
        assert_eq!(outcome.skipped_invalid(), 0);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(reconcile(&[], &Snapshot::new()).is_noop());

        let snapshot = stored(vec![StoredRecord::new("Acme", loc(1))]);
        assert!(reconcile(&[], &snapshot).is_noop());
    }
}
