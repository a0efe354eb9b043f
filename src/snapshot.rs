//! The stored-side snapshot a reconciliation run reads against.
//!
//! A snapshot is loaded once at the start of a run and never mutated.
//! It holds at most one record per natural key; when the backing store
//! contains the same key twice, the first occurrence wins and later ones
//! are ignored, per the snapshot loader contract.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::record::{FieldMap, RowLocation, StoredRecord};

/// Read-only view of the stored records, keyed by trimmed natural key.
///
/// # Examples
///
/// ```
/// use sheetsync::{RowLocation, Snapshot, StoredRecord};
///
/// let mut snapshot = Snapshot::new();
/// snapshot.insert(StoredRecord::new("Acme", RowLocation::new(5).unwrap()));
/// assert!(snapshot.get("Acme").is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    records: HashMap<String, StoredRecord>,
}

impl Snapshot {
    /// Creates an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
        }
    }

    /// Inserts a stored record, first occurrence wins.
    ///
    /// Returns true if the record was inserted, false if the key was
    /// already present (the existing record is kept) or the key is empty
    /// after trimming (whitespace-only names are not loadable entities).
    pub fn insert(&mut self, record: StoredRecord) -> bool {
        let key = record.key();
        if key.is_empty() || self.records.contains_key(key) {
            return false;
        }
        self.records.insert(key.to_string(), record);
        true
    }

    /// Builds a snapshot from an ordered grid of rows.
    ///
    /// `columns` names each cell position, with `key_field` identifying
    /// the natural-key column. Rows are assigned one-based locations in
    /// grid order starting at `first_row`; duplicate keys resolve to the
    /// first occurrence and whitespace-only keys are skipped.
    ///
    /// Missing trailing cells (a common shape for spreadsheet reads) are
    /// treated as empty.
    #[must_use]
    pub fn from_rows<S: AsRef<str>>(
        columns: &[S],
        key_field: &str,
        first_row: u32,
        rows: &[Vec<String>],
    ) -> Self {
        let key_index = columns.iter().position(|c| c.as_ref() == key_field);
        let mut snapshot = Self::new();
        let Some(key_index) = key_index else {
            return snapshot;
        };

        for (offset, row) in rows.iter().enumerate() {
            let Ok(offset) = u32::try_from(offset) else {
                break;
            };
            let Some(location) = RowLocation::new(first_row.saturating_add(offset)) else {
                continue;
            };
            let name = row.get(key_index).map(String::as_str).unwrap_or("");

            let mut fields = FieldMap::new();
            for (i, column) in columns.iter().enumerate() {
                if i == key_index {
                    continue;
                }
                let value = row.get(i).map(String::as_str).unwrap_or("");
                fields.insert(column.as_ref(), value);
            }

            snapshot.insert(StoredRecord {
                name: name.to_string(),
                location,
                fields,
            });
        }
        snapshot
    }

    /// Looks up a record by natural key (caller trims).
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&StoredRecord> {
        self.records.get(key)
    }

    /// Returns true if the snapshot holds the key.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.records.contains_key(key)
    }

    /// Number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the snapshot holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates over stored records in no particular order.
    pub fn records(&self) -> impl Iterator<Item = &StoredRecord> {
        self.records.values()
    }
}

impl FromIterator<StoredRecord> for Snapshot {
    fn from_iter<T: IntoIterator<Item = StoredRecord>>(iter: T) -> Self {
        let mut snapshot = Self::new();
        for record in iter {
            snapshot.insert(record);
        }
        snapshot
    }
}
