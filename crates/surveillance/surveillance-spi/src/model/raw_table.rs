//! Untyped tabular input.

use serde::{Deserialize, Serialize};

/// An untyped table of string cells addressed by column name.
///
/// Nothing is guaranteed about the content: headers may carry whitespace
/// and cells may be empty or malformed. An empty cell stands for a missing
/// value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Create a table from headers and row-major cells.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Create a table from `(name, values)` columns.
    ///
    /// Shorter columns are padded with empty cells.
    pub fn from_columns<N, V>(columns: Vec<(N, Vec<V>)>) -> Self
    where
        N: Into<String>,
        V: Into<String>,
    {
        let height = columns.iter().map(|(_, values)| values.len()).max().unwrap_or(0);
        let mut headers = Vec::with_capacity(columns.len());
        let mut rows = vec![Vec::with_capacity(columns.len()); height];

        for (name, values) in columns {
            headers.push(name.into());
            let mut values = values.into_iter().map(Into::into);
            for row in rows.iter_mut() {
                row.push(values.next().unwrap_or_default());
            }
        }

        Self { headers, rows }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of data rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append a data row.
    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// Index of the column named exactly `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    /// Cell at `(row, column)`; cells past the end of a short row read as empty.
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        let cells = self.rows.get(row)?;
        if column >= self.headers.len() {
            return None;
        }
        Some(cells.get(column).map(String::as_str).unwrap_or(""))
    }

    /// All cells of the column named exactly `name`.
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let index = self.column_index(name)?;
        Some(
            (0..self.rows.len())
                .map(|row| self.cell(row, index).unwrap_or(""))
                .collect(),
        )
    }

    /// Copy of the table with surrounding whitespace trimmed from every header.
    pub fn with_trimmed_headers(&self) -> RawTable {
        RawTable {
            headers: self.headers.iter().map(|h| h.trim().to_string()).collect(),
            rows: self.rows.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_columns_pads_short_columns() {
        let table = RawTable::from_columns(vec![("Week", vec!["1", "2"]), ("% AMX", vec!["3"])]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.cell(1, 1), Some(""));
        assert_eq!(table.column("Week"), Some(vec!["1", "2"]));
    }

    #[test]
    fn test_column_lookup_is_exact() {
        let table = RawTable::from_columns(vec![(" Week ", vec!["1"])]);
        assert_eq!(table.column_index("Week"), None);
        assert_eq!(table.with_trimmed_headers().column_index("Week"), Some(0));
    }

    #[test]
    fn test_trimming_does_not_touch_input() {
        let table = RawTable::from_columns(vec![(" Week", vec!["1"])]);
        let _ = table.with_trimmed_headers();
        assert_eq!(table.headers()[0], " Week");
    }

    #[test]
    fn test_cell_out_of_bounds() {
        let table = RawTable::new(vec!["a".into()], vec![vec![]]);
        assert_eq!(table.cell(0, 0), Some(""));
        assert_eq!(table.cell(0, 1), None);
        assert_eq!(table.cell(1, 0), None);
    }
}
