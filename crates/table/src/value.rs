use std::cmp::Ordering;
use std::fmt;

/// A single cell value. Tables carry no schema beyond column names, so every
/// cell is self-describing.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Parse a CSV field: empty → Null, numeric-looking → Number, else Text.
    ///
    /// Numeric inference keeps identifiers type-consistent with JSON-sourced
    /// tables, so a join on a numeric key matches across sources.
    pub fn from_csv_field(field: &str) -> Value {
        if field.is_empty() {
            return Value::Null;
        }
        // Reject leading/trailing whitespace and strings like "1e" that
        // f64::from_str would still refuse; accept "42", "-1.5", "3e2".
        if field
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'-' | b'+' | b'.' | b'e' | b'E'))
        {
            if let Ok(n) = field.parse::<f64>() {
                if n.is_finite() {
                    return Value::Number(n);
                }
            }
        }
        Value::Text(field.to_string())
    }

    /// Canonical join-key representation. Type-tagged so `Text("2")` never
    /// matches `Number(2)` — a numeric id and its string spelling are
    /// different identifiers. `None` for Null (a null key matches nothing).
    pub fn key_repr(&self) -> Option<String> {
        match self {
            Value::Null => None,
            Value::Bool(b) => Some(format!("b:{b}")),
            Value::Number(n) => Some(format!("n:{}", fmt_number(*n))),
            Value::Text(s) => Some(format!("t:{s}")),
        }
    }

    /// Total order used by the report sort. Variant rank is
    /// Bool < Number < Text < Null; the null-last placement matches the
    /// sort convention documented on [`crate::ops::sort_by`].
    pub fn sort_cmp(&self, other: &Value) -> Ordering {
        fn rank(v: &Value) -> u8 {
            match v {
                Value::Bool(_) => 0,
                Value::Number(_) => 1,
                Value::Text(_) => 2,
                Value::Null => 3,
            }
        }
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Number(a), Value::Number(b)) => a.total_cmp(b),
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            _ => rank(self).cmp(&rank(other)),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                n.as_f64().map(Value::Number).unwrap_or(Value::Null)
            }
            serde_json::Value::String(s) => Value::Text(s),
            // Arrays and objects are kept as their JSON spelling; the report
            // renders them as text (e.g. a list of label ids).
            other => Value::Text(other.to_string()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{}", fmt_number(*n)),
            Value::Text(s) => write!(f, "{s}"),
        }
    }
}

/// Integral floats print without a trailing `.0` so ids round-trip cleanly.
fn fmt_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}
