// XLSX report export. Presentation snapshot for sharing, not a round-trip
// format: one worksheet, header row, then data rows with the styling
// instructions computed by the annotator.

use std::collections::HashMap;
use std::path::Path;

use fleetrecon_engine::{Rgb, StyledTable};
use fleetrecon_table::Value;
use rust_xlsxwriter::{Color, Format, Workbook};

/// Write the styled report to `path`.
///
/// The uniform font color (when present) is applied to every written cell,
/// header included; background fills are per data row only. Null cells in a
/// filled row are written blank-with-format so the fill spans the whole row.
pub fn export(styled: &StyledTable, path: &Path) -> Result<(), String> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    let mut formats: HashMap<Option<Rgb>, Format> = HashMap::new();
    let format_for = |fill: Option<Rgb>, formats: &mut HashMap<Option<Rgb>, Format>| {
        formats
            .entry(fill)
            .or_insert_with(|| {
                let mut format = Format::new();
                if let Some(font) = styled.font_color {
                    format = format.set_font_color(Color::RGB(font));
                }
                if let Some(fill) = fill {
                    format = format.set_background_color(Color::RGB(fill));
                }
                format
            })
            .clone()
    };

    let header_format = format_for(None, &mut formats);
    for (col, name) in styled.table.columns().iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, name, &header_format)
            .map_err(|e| format!("cannot write header '{name}': {e}"))?;
    }

    for (i, row) in styled.table.rows().iter().enumerate() {
        let format = format_for(styled.row_fills.get(i).copied().flatten(), &mut formats);
        let row_num = (i + 1) as u32;
        for (col, value) in row.iter().enumerate() {
            let col_num = col as u16;
            let result = match value {
                Value::Null => worksheet.write_blank(row_num, col_num, &format),
                Value::Bool(b) => {
                    worksheet.write_boolean_with_format(row_num, col_num, *b, &format)
                }
                Value::Number(n) => {
                    worksheet.write_number_with_format(row_num, col_num, *n, &format)
                }
                Value::Text(s) => {
                    worksheet.write_string_with_format(row_num, col_num, s, &format)
                }
            };
            result.map_err(|e| format!("cannot write cell ({row_num}, {col_num}): {e}"))?;
        }
    }

    worksheet.autofit();
    workbook
        .save(path)
        .map_err(|e| format!("cannot save {}: {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use fleetrecon_table::Table;

    use super::*;

    fn styled_fixture() -> StyledTable {
        let table = Table::from_columns(vec![
            (
                "kurzname",
                vec![Value::Text("V1".into()), Value::Text("V2".into())],
            ),
            ("hu", vec![Value::Text("2022-01-01".into()), Value::Null]),
            ("rnr", vec![Value::Number(7.0), Value::Number(8.0)]),
        ]);
        StyledTable {
            table,
            font_color: Some(0x123456),
            row_fills: vec![Some(0x007500), None],
            lookup_warnings: Vec::new(),
        }
    }

    #[test]
    fn report_file_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vehicles.xlsx");
        export(&styled_fixture(), &path).unwrap();
        let meta = std::fs::metadata(&path).unwrap();
        assert!(meta.len() > 0);
    }

    #[test]
    fn empty_report_still_produces_a_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.xlsx");
        let styled = StyledTable {
            table: Table::new(vec!["kurzname".into(), "gruppe".into()]),
            font_color: None,
            row_fills: Vec::new(),
            lookup_warnings: Vec::new(),
        };
        export(&styled, &path).unwrap();
        assert!(path.exists());
    }
}
