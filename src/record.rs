//! Record types and field mappings.
//!
//! Records carry a natural key (the entity name) and a mapping from field
//! name to string value. Matching across runs happens on the natural key
//! alone, trimmed of surrounding whitespace and nothing else; storage
//! locations are run-scoped and never used for identity.

use std::fmt;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

/// Insertion-ordered mapping from field name to string value.
///
/// Field iteration order must be deterministic because it decides the
/// relative order of emitted cell updates, so this is a small ordered map
/// rather than a hash map. Inserting an existing key replaces its value in
/// place without moving the entry.
///
/// # Examples
///
/// ```
/// use sheetsync::FieldMap;
///
/// let mut fields = FieldMap::new();
/// fields.insert("description", "Widgets");
/// assert_eq!(fields.get("description"), Some("Widgets"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldMap {
    entries: Vec<(String, String)>,
}

impl FieldMap {
    /// Creates an empty field map.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Inserts or replaces a field value.
    ///
    /// A replaced field keeps its original position.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        let field = field.into();
        let value = value.into();
        if let Some(entry) = self.entries.iter_mut().find(|(f, _)| *f == field) {
            entry.1 = value;
        } else {
            self.entries.push((field, value));
        }
    }

    /// Returns the value for a field, if present.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, v)| v.as_str())
    }

    /// Returns the value for a field, treating an absent field as empty.
    ///
    /// Absent field and empty string are equivalent in the stored data
    /// model, so this is the lookup the reconciler uses.
    #[must_use]
    pub fn get_or_empty(&self, field: &str) -> &str {
        self.get(field).unwrap_or("")
    }

    /// Returns true if the map contains the field.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    /// Iterates over `(field, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(f, v)| (f.as_str(), v.as_str()))
    }

    /// Number of fields in the map.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the map has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<F: Into<String>, V: Into<String>> FromIterator<(F, V)> for FieldMap {
    fn from_iter<T: IntoIterator<Item = (F, V)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (field, value) in iter {
            map.insert(field, value);
        }
        map
    }
}

/// A freshly observed entity record, produced per run by the scraping step.
///
/// The natural key is the entity name: case-sensitive, matched after
/// trimming surrounding whitespace, and required non-empty. An empty field
/// value means "not found in this scrape" and never overwrites stored data.
///
/// # Examples
///
/// ```
/// use sheetsync::ObservedRecord;
///
/// let record = ObservedRecord::new("  Acme  ").with_field("description", "Widgets");
/// assert_eq!(record.key(), "Acme");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservedRecord {
    /// The natural key as scraped, whitespace untrimmed.
    pub name: String,

    /// Observed field values.
    ///
    /// Defaults to an empty map when absent from the wire form: a record
    /// that arrives without its field mapping behaves as a record with
    /// all-empty fields rather than an error.
    #[serde(default)]
    pub fields: FieldMap,
}

impl ObservedRecord {
    /// Creates an observed record with no fields yet.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: FieldMap::new(),
        }
    }

    /// Adds an observed field value.
    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(field, value);
        self
    }

    /// The natural key: the name with surrounding whitespace trimmed.
    #[must_use]
    pub fn key(&self) -> &str {
        self.name.trim()
    }

    /// Returns true if the key is empty after trimming.
    ///
    /// Such records are dropped by the reconciler with a diagnostic.
    #[must_use]
    pub fn has_valid_key(&self) -> bool {
        !self.key().is_empty()
    }
}

/// One-based row index of a stored record.
///
/// Opaque and stable only within a single reconciliation pass; it is never
/// used for matching, only for addressing cell updates back to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowLocation(NonZeroU32);

impl RowLocation {
    /// Creates a row location from a one-based index.
    ///
    /// Returns `None` for zero: row locations are one-based by contract.
    #[must_use]
    pub fn new(index: u32) -> Option<Self> {
        NonZeroU32::new(index).map(Self)
    }

    /// Returns the one-based row index.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }
}

impl fmt::Display for RowLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A previously stored entity record, loaded once at the start of a run.
///
/// Treated as a read-only snapshot entry: the reconciler never mutates it
/// and never assumes it reflects writes made during the same run. An absent
/// field means the field was never populated and is equivalent to an empty
/// string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRecord {
    /// The natural key under which the record was stored.
    pub name: String,

    /// Where the record's row currently lives.
    pub location: RowLocation,

    /// Currently stored field values.
    #[serde(default)]
    pub fields: FieldMap,
}

impl StoredRecord {
    /// Creates a stored record at the given row.
    #[must_use]
    pub fn new(name: impl Into<String>, location: RowLocation) -> Self {
        Self {
            name: name.into(),
            location,
            fields: FieldMap::new(),
        }
    }

    /// Adds a stored field value.
    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(field, value);
        self
    }

    /// The natural key: the name with surrounding whitespace trimmed.
    #[must_use]
    pub fn key(&self) -> &str {
        self.name.trim()
    }
}
