// CSV import/export for vehicle tables

use std::io::Read;
use std::path::Path;

use fleetrecon_table::{Table, Value};

/// Read a delimited file into a table. The delimiter is sniffed (the fleet
/// export is semicolon-delimited, API dumps are comma-delimited); the first
/// row is the header; empty fields become nulls.
pub fn import(path: &Path) -> Result<Table, String> {
    let content = read_file_as_utf8(path)?;
    let delimiter = sniff_delimiter(&content);
    import_from_string(&content, delimiter)
}

pub fn import_from_string(content: &str, delimiter: u8) -> Result<Table, String> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| e.to_string())?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut table = Table::new(columns);
    for record in reader.records() {
        let record = record.map_err(|e| e.to_string())?;
        table.push_row(record.iter().map(Value::from_csv_field).collect());
    }
    Ok(table)
}

/// Detect the most likely field delimiter by checking consistency across the
/// first few lines. The candidate producing the most consistent multi-field
/// count wins; ties break toward more columns.
fn sniff_delimiter(content: &str) -> u8 {
    let candidates: &[u8] = &[b'\t', b';', b',', b'|'];
    let sample_lines: Vec<&str> = content.lines().take(10).collect();

    if sample_lines.is_empty() {
        return b';';
    }

    let mut best = b';';
    let mut best_score = 0u64;

    for &delim in candidates {
        let counts: Vec<usize> = sample_lines
            .iter()
            .map(|line| {
                csv::ReaderBuilder::new()
                    .delimiter(delim)
                    .has_headers(false)
                    .flexible(true)
                    .from_reader(line.as_bytes())
                    .records()
                    .next()
                    .and_then(|r| r.ok())
                    .map(|r| r.len())
                    .unwrap_or(1)
            })
            .collect();

        let target = counts[0];
        if target <= 1 {
            continue;
        }

        let consistent = counts.iter().filter(|&&c| c == target).count() as u64;
        let score = consistent * target as u64;
        if score > best_score {
            best_score = score;
            best = delim;
        }
    }

    best
}

/// Read a file as UTF-8, falling back to Windows-1252 (common for
/// Excel-exported CSVs).
pub fn read_file_as_utf8(path: &Path) -> Result<String, String> {
    let mut file = std::fs::File::open(path)
        .map_err(|e| format!("cannot open {}: {e}", path.display()))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;

    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}

/// Serialize a table as comma-delimited CSV (nulls as empty fields).
pub fn to_csv_string(table: &Table) -> Result<String, String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(table.columns())
        .map_err(|e| e.to_string())?;
    for row in table.rows() {
        writer
            .write_record(row.iter().map(|v| v.to_string()))
            .map_err(|e| e.to_string())?;
    }
    let bytes = writer.into_inner().map_err(|e| e.to_string())?;
    String::from_utf8(bytes).map_err(|e| e.to_string())
}

pub fn write(table: &Table, path: &Path) -> Result<(), String> {
    let content = to_csv_string(table)?;
    std::fs::write(path, content).map_err(|e| format!("cannot write {}: {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use super::*;

    #[test]
    fn semicolon_delimiter_is_sniffed() {
        let content = "kurzname;hu;gruppe\nV1;2022-01-01;G1\nV2;;G2\n";
        assert_eq!(sniff_delimiter(content), b';');
        let table = import_from_string(content, b';').unwrap();
        assert_eq!(table.columns(), &["kurzname", "hu", "gruppe"]);
        assert_eq!(table.n_rows(), 2);
        assert_eq!(table.value(1, "hu"), Some(&Value::Null));
    }

    #[test]
    fn comma_and_tab_delimiters_are_sniffed() {
        assert_eq!(sniff_delimiter("a,b,c\n1,2,3\n"), b',');
        assert_eq!(sniff_delimiter("a\tb\tc\n1\t2\t3\n"), b'\t');
    }

    #[test]
    fn numeric_fields_become_numbers() {
        let table = import_from_string("id;mileage\n1;12000\n2;8000.5\n", b';').unwrap();
        assert_eq!(table.value(0, "id"), Some(&Value::Number(1.0)));
        assert_eq!(table.value(1, "mileage"), Some(&Value::Number(8000.5)));
    }

    #[test]
    fn ragged_rows_are_padded() {
        let table = import_from_string("a;b;c\n1;2\n", b';').unwrap();
        assert_eq!(table.value(0, "c"), Some(&Value::Null));
    }

    #[test]
    fn windows_1252_bytes_decode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("umlaut.csv");
        let mut f = std::fs::File::create(&path).unwrap();
        // "gruppe\nStraße" with 0xDF (ß) in Windows-1252
        f.write_all(b"gruppe\nStra\xdfe\n").unwrap();
        drop(f);
        let table = import(&path).unwrap();
        assert_eq!(table.value(0, "gruppe"), Some(&Value::Text("Straße".into())));
    }

    #[test]
    fn csv_round_trip_keeps_shape() {
        let table = import_from_string("kurzname;gruppe\nV1;G1\nV2;\n", b';').unwrap();
        let out = to_csv_string(&table).unwrap();
        assert_eq!(out, "kurzname,gruppe\nV1,G1\nV2,\n");
    }
}
