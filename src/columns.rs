//! Field-name to column mapping.
//!
//! The writer addresses cells by `(row, column)` while the reconciler
//! speaks in field names. This module carries the explicit mapping between
//! the two, replacing ad hoc column-letter arithmetic with one declared
//! column order shared by the snapshot loader and the writer.

use serde::{Deserialize, Serialize};

use crate::record::{ObservedRecord, RowLocation};

/// Ordered list of column field names, with one designated key column.
///
/// # Examples
///
/// ```
/// use sheetsync::ColumnMap;
///
/// let columns = ColumnMap::new("name", ["name", "description"]).unwrap();
/// assert_eq!(columns.index_of("description"), Some(1));
/// assert_eq!(columns.column_letter(1), "B");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMap {
    key_field: String,
    fields: Vec<String>,
}

impl ColumnMap {
    /// Creates a column map from the key field and the ordered columns.
    ///
    /// Returns `None` when the key field is not among the columns or a
    /// column name repeats; both would make cell addressing ambiguous.
    #[must_use]
    pub fn new<S: Into<String>>(
        key_field: impl Into<String>,
        fields: impl IntoIterator<Item = S>,
    ) -> Option<Self> {
        let key_field = key_field.into();
        let fields: Vec<String> = fields.into_iter().map(Into::into).collect();

        if !fields.contains(&key_field) {
            return None;
        }
        for (i, field) in fields.iter().enumerate() {
            if fields[..i].contains(field) {
                return None;
            }
        }

        Some(Self { key_field, fields })
    }

    /// The field holding the natural key.
    #[must_use]
    pub fn key_field(&self) -> &str {
        &self.key_field
    }

    /// Ordered column field names.
    #[must_use]
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Zero-based column index of a field.
    #[must_use]
    pub fn index_of(&self, field: &str) -> Option<usize> {
        self.fields.iter().position(|f| f == field)
    }

    /// Field name at a zero-based column index.
    #[must_use]
    pub fn field_at(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }

    /// Number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the map has no columns.
    ///
    /// `new` never produces this shape (the key column is required), but
    /// deserialized maps can carry it.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Renders a record as a fixed-order list of cell values.
    ///
    /// The key column receives the trimmed name; every other column its
    /// field value, empty when unobserved. This is the row shape the
    /// append contract expects.
    #[must_use]
    pub fn to_row(&self, record: &ObservedRecord) -> Vec<String> {
        self.fields
            .iter()
            .map(|field| {
                if *field == self.key_field {
                    record.key().to_string()
                } else {
                    record.fields.get_or_empty(field).to_string()
                }
            })
            .collect()
    }

    /// Spreadsheet-style letter for a zero-based column index.
    ///
    /// `0 → "A"`, `25 → "Z"`, `26 → "AA"`.
    #[must_use]
    pub fn column_letter(&self, index: usize) -> String {
        let mut letters = Vec::new();
        let mut n = index;
        loop {
            #[allow(clippy::cast_possible_truncation)]
            let rem = (n % 26) as u8;
            letters.push(b'A' + rem);
            if n < 26 {
                break;
            }
            n = n / 26 - 1;
        }
        letters.reverse();
        String::from_utf8(letters).unwrap_or_default()
    }

    /// A1-style cell reference for a field at a row, e.g. `"C5"`.
    ///
    /// Returns `None` when the field has no column.
    #[must_use]
    pub fn a1_reference(&self, field: &str, location: RowLocation) -> Option<String> {
        let index = self.index_of(field)?;
        Some(format!("{}{}", self.column_letter(index), location))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns() -> ColumnMap {
        ColumnMap::new("name", ["name", "description", "size"]).unwrap()
    }

    #[test]
    fn test_new_requires_key_among_columns() {
        assert!(ColumnMap::new("name", ["description", "size"]).is_none());
        assert!(ColumnMap::new("name", ["name"]).is_some());
    }

    #[test]
    fn test_new_rejects_duplicate_columns() {
        assert!(ColumnMap::new("name", ["name", "description", "description"]).is_none());
    }

    #[test]
    fn test_index_lookup_both_ways() {
        let columns = columns();
        assert_eq!(columns.index_of("name"), Some(0));
        assert_eq!(columns.index_of("size"), Some(2));
        assert_eq!(columns.index_of("missing"), None);
        assert_eq!(columns.field_at(1), Some("description"));
        assert_eq!(columns.field_at(9), None);
    }

    #[test]
    fn test_to_row_fixed_order() {
        let record = ObservedRecord::new("  Acme ")
            .with_field("size", "10-50")
            .with_field("description", "Widgets");

        let row = columns().to_row(&record);
        assert_eq!(row, vec!["Acme", "Widgets", "10-50"]);
    }

    #[test]
    fn test_to_row_unobserved_fields_empty() {
        let record = ObservedRecord::new("Acme");
        let row = columns().to_row(&record);
        assert_eq!(row, vec!["Acme", "", ""]);
    }

    #[test]
    fn test_column_letters() {
        let columns = columns();
        assert_eq!(columns.column_letter(0), "A");
        assert_eq!(columns.column_letter(2), "C");
        assert_eq!(columns.column_letter(25), "Z");
        assert_eq!(columns.column_letter(26), "AA");
        assert_eq!(columns.column_letter(27), "AB");
        assert_eq!(columns.column_letter(51), "AZ");
        assert_eq!(columns.column_letter(52), "BA");
    }

    #[test]
    fn test_a1_reference() {
        let columns = columns();
        let row5 = RowLocation::new(5).unwrap();
        assert_eq!(columns.a1_reference("size", row5), Some("C5".to_string()));
        assert_eq!(columns.a1_reference("missing", row5), None);
    }
}
