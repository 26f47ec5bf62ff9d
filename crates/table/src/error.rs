use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// A required column name is absent from a table (join key, collision
    /// shadow, filter or sort column).
    ColumnNotFound { column: String },
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ColumnNotFound { column } => write!(f, "column not found: '{column}'"),
        }
    }
}

impl std::error::Error for TableError {}
