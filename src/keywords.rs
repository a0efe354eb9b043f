//! Keyword cell aggregation.
//!
//! Keyword columns hold comma-separated lists written by the extraction
//! step. This module splits those cells back apart and tallies how many
//! rows mention each keyword.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Splits a comma-separated keyword cell into trimmed, non-empty entries.
///
/// # Examples
///
/// ```
/// use sheetsync::keywords::split_keyword_cell;
///
/// let parts = split_keyword_cell("Rust, SQL , , AWS");
/// assert_eq!(parts, vec!["Rust", "SQL", "AWS"]);
/// ```
#[must_use]
pub fn split_keyword_cell(cell: &str) -> Vec<&str> {
    cell.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .collect()
}

/// Counts keyword mentions across rows.
///
/// Each call to [`KeywordTally::add_cell`] counts one row's cell; a
/// keyword repeated inside the same cell counts once per occurrence,
/// matching how the cells are written (the extractor deduplicates).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordTally {
    counts: HashMap<String, usize>,
}

impl KeywordTally {
    /// Creates an empty tally.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Tallies one keyword cell.
    pub fn add_cell(&mut self, cell: &str) {
        for keyword in split_keyword_cell(cell) {
            *self.counts.entry(keyword.to_string()).or_insert(0) += 1;
        }
    }

    /// Mentions of one keyword (exact, case-sensitive).
    #[must_use]
    pub fn count_of(&self, keyword: &str) -> usize {
        self.counts.get(keyword).copied().unwrap_or(0)
    }

    /// Number of distinct keywords seen.
    #[must_use]
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    /// Returns true if nothing has been tallied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// The `n` most frequent keywords.
    ///
    /// Ordered by count descending, then name ascending, so output is
    /// deterministic across runs.
    #[must_use]
    pub fn top(&self, n: usize) -> Vec<(String, usize)> {
        let mut ranked: Vec<(String, usize)> = self
            .counts
            .iter()
            .map(|(k, c)| (k.clone(), *c))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(n);
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_trims_and_drops_empties() {
        assert_eq!(split_keyword_cell(" a , b ,, c ,"), vec!["a", "b", "c"]);
        assert!(split_keyword_cell("").is_empty());
        assert!(split_keyword_cell(" , , ").is_empty());
    }

    #[test]
    fn test_tally_across_cells() {
        let mut tally = KeywordTally::new();
        tally.add_cell("Rust, SQL");
        tally.add_cell("Rust, AWS");
        tally.add_cell("");

        assert_eq!(tally.count_of("Rust"), 2);
        assert_eq!(tally.count_of("SQL"), 1);
        assert_eq!(tally.count_of("Go"), 0);
        assert_eq!(tally.distinct(), 3);
    }

    #[test]
    fn test_top_orders_by_count_then_name() {
        let mut tally = KeywordTally::new();
        tally.add_cell("b, a, c");
        tally.add_cell("b, c");
        tally.add_cell("b");

        assert_eq!(
            tally.top(2),
            vec![("b".to_string(), 3), ("c".to_string(), 2)]
        );
        // Ties break alphabetically.
        let mut tied = KeywordTally::new();
        tied.add_cell("z, a");
        assert_eq!(
            tied.top(10),
            vec![("a".to_string(), 1), ("z".to_string(), 1)]
        );
    }

    #[test]
    fn test_top_truncates() {
        let mut tally = KeywordTally::new();
        tally.add_cell("a, b, c, d");
        assert_eq!(tally.top(2).len(), 2);
        assert!(tally.top(0).is_empty());
    }
}
