//! Color annotation for the rendered report: a uniform font color resolved
//! from label classifications, and a per-row background fill derived from
//! inspection recency.

use std::collections::HashSet;
use std::fmt;

use chrono::NaiveDate;
use fleetrecon_table::Table;

use crate::error::PipelineError;
use crate::recency::{months_between, parse_inspection_date, RecencyBucket, Rgb};

/// Transport failure from the label-color lookup. Recoverable: the
/// annotator skips the failing id and keeps going.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupError(pub String);

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lookup failed: {}", self.0)
    }
}

impl std::error::Error for LookupError {}

/// External label-color service seam. The CLI implements this over HTTP;
/// tests use an in-memory map.
pub trait LabelColorSource {
    /// Resolve a label id to its display color. `Ok(None)` when the label
    /// exists without a usable color (or is unknown).
    fn label_color(&self, label_id: &str) -> Result<Option<Rgb>, LookupError>;
}

#[derive(Debug, Clone)]
pub struct AnnotateOptions {
    /// Column holding label ids (font-color trigger).
    pub label_column: String,
    /// Column holding the inspection date (background-color input).
    pub date_column: String,
    pub font_color_enabled: bool,
    pub background_color_enabled: bool,
    /// Captured once per run; every row's recency is measured against it.
    pub reference_date: NaiveDate,
}

/// The projected table plus its styling instructions, consumed once by the
/// XLSX writer.
#[derive(Debug)]
pub struct StyledTable {
    pub table: Table,
    /// One color for every rendered cell, or none. The source system applies
    /// the first resolved label color to the whole sheet rather than per
    /// row; that simplification is kept deliberately (see DESIGN.md).
    pub font_color: Option<Rgb>,
    /// Background fill per data row, parallel to `table.rows()`.
    pub row_fills: Vec<Option<Rgb>>,
    /// Label ids whose lookup failed and was skipped.
    pub lookup_warnings: Vec<String>,
}

/// Compute both color signals for `table`.
///
/// Font coloring walks rows in order, querying each distinct non-null label
/// id once; the first resolved color is applied uniformly. Background
/// coloring buckets each row's inspection date against the reference date;
/// a malformed date aborts with [`PipelineError::InvalidDateFormat`] naming
/// the offending row (fail-fast, like the rest of the pipeline).
pub fn annotate(
    table: Table,
    labels: &dyn LabelColorSource,
    opts: &AnnotateOptions,
) -> Result<StyledTable, PipelineError> {
    let mut styled = StyledTable {
        font_color: None,
        row_fills: vec![None; table.n_rows()],
        lookup_warnings: Vec::new(),
        table,
    };

    if opts.font_color_enabled {
        resolve_font_color(&mut styled, labels, &opts.label_column)?;
    }
    if opts.background_color_enabled {
        resolve_row_fills(&mut styled, &opts.date_column, opts.reference_date)?;
    }

    Ok(styled)
}

fn resolve_font_color(
    styled: &mut StyledTable,
    labels: &dyn LabelColorSource,
    label_column: &str,
) -> Result<(), PipelineError> {
    let col = styled
        .table
        .column_index(label_column)
        .ok_or(PipelineError::ColumnNotFound {
            column: label_column.to_string(),
        })?;

    let mut tried: HashSet<String> = HashSet::new();
    for row in styled.table.rows() {
        let value = &row[col];
        if value.is_null() {
            continue;
        }
        let id = value.to_string();
        if !tried.insert(id.clone()) {
            continue;
        }
        match labels.label_color(&id) {
            Ok(Some(color)) => {
                styled.font_color = Some(color);
                break;
            }
            Ok(None) => {}
            Err(err) => {
                styled
                    .lookup_warnings
                    .push(format!("label '{id}': {err}"));
            }
        }
    }
    Ok(())
}

fn resolve_row_fills(
    styled: &mut StyledTable,
    date_column: &str,
    reference_date: NaiveDate,
) -> Result<(), PipelineError> {
    let col = styled
        .table
        .column_index(date_column)
        .ok_or(PipelineError::ColumnNotFound {
            column: date_column.to_string(),
        })?;

    for (i, row) in styled.table.rows().iter().enumerate() {
        let value = row[col].to_string();
        let date = parse_inspection_date(&value).ok_or(PipelineError::InvalidDateFormat {
            row: i + 1,
            column: date_column.to_string(),
            value,
        })?;
        let bucket = RecencyBucket::from_months(months_between(date, reference_date));
        styled.row_fills[i] = Some(bucket.fill_color());
    }
    Ok(())
}
