//! In-memory tabular results for read operations.

use serde::{Deserialize, Serialize};

use crate::driver::{DriverError, DriverRows};
use crate::value::SqlValue;

/// A fully materialized query result.
///
/// Columns keep their result order. Lookups by name are case-insensitive,
/// matching how the target dialect resolves column names.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RowSet {
    columns: Vec<String>,
    rows: Vec<Vec<SqlValue>>,
}

impl RowSet {
    /// Creates an empty result with the given column names.
    #[must_use]
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Drains a driver reader into a materialized result.
    pub fn from_reader(reader: &mut dyn DriverRows) -> Result<Self, DriverError> {
        let columns = reader.columns().to_vec();
        let mut rows = Vec::new();
        while let Some(row) = reader.next_row()? {
            rows.push(row);
        }
        Ok(Self { columns, rows })
    }

    /// Returns the column names in result order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns whether the result holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Appends a row, which must match the column count.
    pub fn push_row(&mut self, row: Vec<SqlValue>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }

    /// Looks up one cell by row index and column name.
    #[must_use]
    pub fn get(&self, row: usize, column: &str) -> Option<&SqlValue> {
        let index = self.column_index(column)?;
        self.rows.get(row)?.get(index)
    }

    /// Returns the position of a column by case-insensitive name.
    #[must_use]
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|name| name.eq_ignore_ascii_case(column))
    }

    /// Iterates rows in result order.
    pub fn iter(&self) -> impl Iterator<Item = &[SqlValue]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Splits the result into column names and rows.
    #[must_use]
    pub fn into_parts(self) -> (Vec<String>, Vec<Vec<SqlValue>>) {
        (self.columns, self.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeRows {
        columns: Vec<String>,
        rows: std::vec::IntoIter<Vec<SqlValue>>,
    }

    impl DriverRows for FakeRows {
        fn columns(&self) -> &[String] {
            &self.columns
        }

        fn next_row(&mut self) -> Result<Option<Vec<SqlValue>>, DriverError> {
            Ok(self.rows.next())
        }
    }

    fn sample() -> RowSet {
        let mut set = RowSet::new(vec!["Id".to_string(), "Email".to_string()]);
        set.push_row(vec![SqlValue::Int(1), SqlValue::Text("a@b".to_string())]);
        set.push_row(vec![SqlValue::Int(2), SqlValue::Null]);
        set
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let set = sample();
        assert_eq!(set.get(0, "email"), Some(&SqlValue::Text("a@b".to_string())));
        assert_eq!(set.get(0, "EMAIL"), set.get(0, "Email"));
        assert_eq!(set.get(0, "missing"), None);
        assert_eq!(set.get(9, "Id"), None);
    }

    #[test]
    fn test_from_reader_preserves_order() {
        let (columns, rows) = sample().into_parts();
        let mut reader = FakeRows {
            columns: columns.clone(),
            rows: rows.clone().into_iter(),
        };

        let set = RowSet::from_reader(&mut reader).unwrap();
        assert_eq!(set.columns(), columns.as_slice());
        assert_eq!(set.len(), 2);
        let collected: Vec<&[SqlValue]> = set.iter().collect();
        assert_eq!(collected[0], rows[0].as_slice());
        assert_eq!(collected[1], rows[1].as_slice());
    }

    #[test]
    fn test_empty_result() {
        let set = RowSet::new(vec!["Id".to_string()]);
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
        assert_eq!(set.get(0, "Id"), None);
    }
}
