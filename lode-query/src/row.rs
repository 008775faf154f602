//! Materialized rows and result sets.
//!
//! A [`Row`] maps column names to [`Value`]s in the order the engine
//! yielded the columns. A [`ResultSet`] keeps rows in the order the engine
//! produced them; no implicit sort is applied.

use indexmap::IndexMap;
use indexmap::map::Iter;
use serde_json::Value as JsonValue;

use crate::value::Value;

/// A single result row.
///
/// Inserting a column name that is already present replaces its value
/// while keeping the original column position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: IndexMap<String, Value>,
}

impl Row {
    /// Create an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty row with room for `capacity` columns.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            columns: IndexMap::with_capacity(capacity),
        }
    }

    /// Insert a column value, returning the value it replaced.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.columns.insert(column.into(), value.into())
    }

    /// Get a column value.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns.get(column)
    }

    /// Get a column value as a string slice, if it is text.
    pub fn get_text(&self, column: &str) -> Option<&str> {
        self.columns.get(column).and_then(Value::as_str)
    }

    /// Check if a column is present.
    pub fn contains(&self, column: &str) -> bool {
        self.columns.contains_key(column)
    }

    /// Number of columns present.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Check if the row has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column names in order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Iterate over `(column, value)` pairs in order.
    pub fn iter(&self) -> Iter<'_, String, Value> {
        self.columns.iter()
    }

    /// Consume the row and return the underlying map.
    pub fn into_inner(self) -> IndexMap<String, Value> {
        self.columns
    }

    /// Convert to a JSON object.
    pub fn to_json(&self) -> JsonValue {
        JsonValue::Object(
            self.columns
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            columns: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Row {
    type Item = (&'a String, &'a Value);
    type IntoIter = Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}

/// An ordered sequence of rows owned by the caller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    rows: Vec<Row>,
}

impl ResultSet {
    /// Create an empty result set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row.
    pub fn push(&mut self, row: Row) {
        self.rows.push(row);
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if there are no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The first row, if any.
    pub fn first(&self) -> Option<&Row> {
        self.rows.first()
    }

    /// Iterate over the rows.
    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }

    /// Borrow the rows as a slice.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Consume the result set and return its rows.
    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    /// Convert to a JSON array of objects.
    pub fn to_json(&self) -> JsonValue {
        JsonValue::Array(self.rows.iter().map(Row::to_json).collect())
    }
}

impl From<Vec<Row>> for ResultSet {
    fn from(rows: Vec<Row>) -> Self {
        Self { rows }
    }
}

impl FromIterator<Row> for ResultSet {
    fn from_iter<I: IntoIterator<Item = Row>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for ResultSet {
    type Item = Row;
    type IntoIter = std::vec::IntoIter<Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_row_preserves_column_order() {
        let mut row = Row::new();
        row.insert("id", "1");
        row.insert("name", "Tanner");
        assert_eq!(row.columns().collect::<Vec<_>>(), vec!["id", "name"]);
        assert_eq!(row.get_text("name"), Some("Tanner"));
    }

    #[test]
    fn test_row_duplicate_column_overwrites_in_place() {
        let mut row = Row::new();
        row.insert("a", "1");
        row.insert("b", "2");
        let previous = row.insert("a", "3");
        assert_eq!(previous, Some(Value::Text("1".into())));
        assert_eq!(row.len(), 2);
        assert_eq!(row.get_text("a"), Some("3"));
        assert_eq!(row.columns().next(), Some("a"));
    }

    #[test]
    fn test_row_from_iter() {
        let row: Row = [("id", Value::Int(1)), ("name", Value::from("Jill"))]
            .into_iter()
            .collect();
        assert!(row.contains("id"));
        assert!(!row.contains("email"));
        assert_eq!(row.get("id"), Some(&Value::Int(1)));
    }

    #[test]
    fn test_row_to_json() {
        let row: Row = [("id", "2"), ("name", "Jill")].into_iter().collect();
        assert_eq!(
            row.to_json(),
            serde_json::json!({ "id": "2", "name": "Jill" })
        );
    }

    #[test]
    fn test_result_set_order() {
        let set: ResultSet = vec![
            [("name", "Tanner")].into_iter().collect::<Row>(),
            [("name", "Jill")].into_iter().collect::<Row>(),
        ]
        .into();
        assert_eq!(set.len(), 2);
        let names: Vec<_> = set.iter().filter_map(|r| r.get_text("name")).collect();
        assert_eq!(names, vec!["Tanner", "Jill"]);
        assert_eq!(set.first().and_then(|r| r.get_text("name")), Some("Tanner"));
    }
}
