use serde_json::Value as Json;

use crate::value::Value;

/// An ordered set of rows sharing a column schema. Column insertion order is
/// the displayed order and is preserved by every operation in
/// [`crate::ops`].
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub(crate) columns: Vec<String>,
    pub(crate) rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Build a table column-wise. Shorter columns are padded with nulls so
    /// fixtures can express ragged data directly.
    pub fn from_columns<S: Into<String>>(columns: Vec<(S, Vec<Value>)>) -> Self {
        let n_rows = columns.iter().map(|(_, v)| v.len()).max().unwrap_or(0);
        let n_cols = columns.len();
        let mut table = Self {
            columns: Vec::with_capacity(n_cols),
            rows: vec![Vec::with_capacity(n_cols); n_rows],
        };
        for (name, mut values) in columns {
            table.columns.push(name.into());
            values.resize(n_rows, Value::Null);
            for (row, value) in table.rows.iter_mut().zip(values) {
                row.push(value);
            }
        }
        table
    }

    /// Build a table from an array of JSON objects (one object per record).
    /// Column order is first-appearance order across the records; keys absent
    /// from a record become nulls. Non-object entries are skipped.
    pub fn from_json_records(records: Vec<Json>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for record in &records {
            if let Json::Object(map) = record {
                for key in map.keys() {
                    if !columns.iter().any(|c| c == key) {
                        columns.push(key.clone());
                    }
                }
            }
        }

        let mut table = Self::new(columns);
        for record in records {
            if let Json::Object(mut map) = record {
                let row = table
                    .columns
                    .iter()
                    .map(|c| map.remove(c).map(Value::from).unwrap_or(Value::Null))
                    .collect();
                table.rows.push(row);
            }
        }
        table
    }

    /// Append a row, padding or truncating to the column count.
    pub fn push_row(&mut self, mut row: Vec<Value>) {
        row.resize(self.columns.len(), Value::Null);
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// True when the table holds no data rows. Callers use this to detect an
    /// empty reconciliation result, which is reportable but not an error.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell lookup by row index and column name.
    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        let col = self.column_index(column)?;
        self.rows.get(row).map(|r| &r[col])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_columns_pads_ragged_input() {
        let t = Table::from_columns(vec![
            ("id", vec![Value::Number(1.0), Value::Number(2.0)]),
            ("x", vec![Value::Text("a".into())]),
        ]);
        assert_eq!(t.n_rows(), 2);
        assert_eq!(t.value(1, "x"), Some(&Value::Null));
    }

    #[test]
    fn from_json_records_column_order_is_first_appearance() {
        let records = vec![
            serde_json::json!({"kurzname": "V1", "hu": "2022-01-01"}),
            serde_json::json!({"kurzname": "V2", "gruppe": "G1"}),
        ];
        let t = Table::from_json_records(records);
        assert_eq!(t.columns(), &["kurzname", "hu", "gruppe"]);
        assert_eq!(t.value(0, "gruppe"), Some(&Value::Null));
        assert_eq!(t.value(1, "gruppe"), Some(&Value::Text("G1".into())));
    }

    #[test]
    fn push_row_pads_and_truncates() {
        let mut t = Table::new(vec!["a".into(), "b".into()]);
        t.push_row(vec![Value::Number(1.0)]);
        t.push_row(vec![
            Value::Number(1.0),
            Value::Number(2.0),
            Value::Number(3.0),
        ]);
        assert_eq!(t.rows()[0], vec![Value::Number(1.0), Value::Null]);
        assert_eq!(t.rows()[1], vec![Value::Number(1.0), Value::Number(2.0)]);
    }
}
