use std::{ops::Index, slice};

use crate::Value;

/// A fully fetched result set: the column names reported by the result set metadata, and every
/// row in the order the driver returned them.
///
/// Columns and rows only ever travel together, so a cached dataset is always replaced as a whole.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Dataset {
    /// # Panics
    ///
    /// If any row has a different number of fields than there are columns.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        for (index, row) in rows.iter().enumerate() {
            assert_eq!(
                columns.len(),
                row.len(),
                "Row {index} has {} fields, but the result set has {} columns.",
                row.len(),
                columns.len()
            );
        }
        Self { columns, rows }
    }

    /// Result of a statement which did not produce a cursor, e.g. `INSERT` or `CREATE TABLE`.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Fields as fetched from the driver. Text is not trimmed here.
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate rows as name to value mappings.
    pub fn iter(&self) -> Rows<'_> {
        Rows {
            columns: &self.columns,
            rows: self.rows.iter(),
        }
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = Row;
    type IntoIter = Rows<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Lazy iterator over the rows of a [`Dataset`]. Returned by [`crate::Connection::iter_dataset`].
#[derive(Debug, Clone)]
pub struct Rows<'a> {
    columns: &'a [String],
    rows: slice::Iter<'a, Vec<Value>>,
}

impl Rows<'_> {
    /// Yields no rows at all. Used if nothing has been cached yet.
    pub fn empty() -> Self {
        let rows: &[Vec<Value>] = &[];
        Rows {
            columns: &[],
            rows: rows.iter(),
        }
    }
}

impl Iterator for Rows<'_> {
    type Item = Row;

    fn next(&mut self) -> Option<Row> {
        let fields = self.rows.next()?;
        let mut row = Row::with_capacity(self.columns.len());
        for (name, value) in self.columns.iter().zip(fields) {
            row.insert(name, value.trimmed());
        }
        Some(row)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.rows.size_hint()
    }
}

impl ExactSizeIterator for Rows<'_> {}

/// A row of a result set, mapping column names to field values. Keys keep the column order of the
/// result set.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    fields: Vec<(String, Value)>,
}

impl Row {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
        }
    }

    /// Should a name appear twice in the result set, the latter value wins and the key keeps the
    /// position of its first occurrence.
    fn insert(&mut self, name: &str, value: Value) {
        match self.fields.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((name.to_owned(), value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(key, value)| (key.as_str(), value))
    }
}

impl Index<&str> for Row {
    type Output = Value;

    /// # Panics
    ///
    /// If there is no column with that name.
    fn index(&self, name: &str) -> &Value {
        self.get(name)
            .unwrap_or_else(|| panic!("Row has no column named '{name}'."))
    }
}

impl IntoIterator for Row {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}
