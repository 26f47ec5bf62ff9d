use std::fmt;

use fleetrecon_table::TableError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// A required column is absent from a table — join key, mandatory,
    /// group, label, or collision column. Indicates a contract violation
    /// between the input schemas and the job configuration; aborts the run.
    ColumnNotFound { column: String },
    /// A recency value could not be parsed as a date.
    InvalidDateFormat {
        row: usize,
        column: String,
        value: String,
    },
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (empty column name, key clash, bad URL).
    ConfigValidation(String),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ColumnNotFound { column } => write!(f, "column not found: '{column}'"),
            Self::InvalidDateFormat { row, column, value } => {
                write!(f, "row {row}, column '{column}': cannot parse date '{value}'")
            }
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
        }
    }
}

impl std::error::Error for PipelineError {}

impl From<TableError> for PipelineError {
    fn from(err: TableError) -> Self {
        match err {
            TableError::ColumnNotFound { column } => Self::ColumnNotFound { column },
        }
    }
}
