use std::path::Path;

use anyhow::{anyhow, Context, Result};
use calamine::{open_workbook_auto, Data, Reader};

use super::model::CellValue;

// ---------------------------------------------------------------------------
// RawSheet – a header row plus untyped cells
// ---------------------------------------------------------------------------

/// One worksheet exactly as stored: header text is not cleaned up and cells
/// keep whatever type the source gave them.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSheet {
    pub name: String,
    pub headers: Vec<String>,
    /// Data rows; row `i` here is spreadsheet row `i + 2`.
    pub rows: Vec<Vec<CellValue>>,
}

impl RawSheet {
    pub fn new(name: &str, headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        RawSheet {
            name: name.to_string(),
            headers,
            rows,
        }
    }
}

// ---------------------------------------------------------------------------
// Workbook reader (.xlsx / .xlsm / .xls / .ods)
// ---------------------------------------------------------------------------

/// Read the named worksheets from a workbook, in the order given.
pub fn read_workbook(path: &Path, sheet_names: &[&str]) -> Result<Vec<RawSheet>> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| anyhow!("opening workbook {}: {e}", path.display()))?;

    sheet_names
        .iter()
        .map(|&name| -> Result<RawSheet> {
            let range = workbook
                .worksheet_range(name)
                .map_err(|e| anyhow!("reading sheet '{name}': {e}"))?;

            let mut rows = range.rows();
            let headers: Vec<String> = rows
                .next()
                .with_context(|| format!("sheet '{name}' is empty"))?
                .iter()
                .map(|cell| cell.to_string())
                .collect();
            let rows: Vec<Vec<CellValue>> =
                rows.map(|row| row.iter().map(cell_from_data).collect()).collect();

            log::debug!("sheet '{name}': {} columns, {} rows", headers.len(), rows.len());
            Ok(RawSheet::new(name, headers, rows))
        })
        .collect()
}

fn cell_from_data(cell: &Data) -> CellValue {
    match cell {
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::String(s) => CellValue::String(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Empty => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV reader (one exported file per sheet)
// ---------------------------------------------------------------------------

/// Read a single sheet exported as CSV. The first record is the header row.
/// Quoted headers may contain the same newlines as the workbook headers.
pub fn read_csv_sheet(path: &Path, name: &str) -> Result<RawSheet> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("opening CSV {}", path.display()))?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV {} row {}", path.display(), row_no + 2))?;
        rows.push(record.iter().map(guess_cell_type).collect());
    }

    Ok(RawSheet::new(name, headers, rows))
}

fn guess_cell_type(s: &str) -> CellValue {
    if s.trim().is_empty() {
        return CellValue::Null;
    }
    if let Ok(i) = s.trim().parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.trim().parse::<f64>() {
        return CellValue::Float(f);
    }
    if s == "true" || s == "false" {
        return CellValue::Bool(s == "true");
    }
    CellValue::String(s.to_string())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn csv_cells_get_typed() {
        assert_eq!(guess_cell_type(""), CellValue::Null);
        assert_eq!(guess_cell_type("67"), CellValue::Integer(67));
        assert_eq!(guess_cell_type("2.8"), CellValue::Float(2.8));
        assert_eq!(guess_cell_type("24-70"), CellValue::String("24-70".into()));
        assert_eq!(guess_cell_type("na"), CellValue::String("na".into()));
    }

    #[test]
    fn csv_sheet_keeps_multiline_headers() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "Lens,\"Focal\nLength\",Weight\nFE 50mm F1.8,50,186\nFE 24-70mm F2.8 GM,24-70,886\n"
        )
        .unwrap();

        let sheet = read_csv_sheet(file.path(), "All").unwrap();
        assert_eq!(sheet.name, "All");
        assert_eq!(sheet.headers, ["Lens", "Focal\nLength", "Weight"]);
        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(sheet.rows[1][1], CellValue::String("24-70".into()));
        assert_eq!(sheet.rows[0][2], CellValue::Integer(186));
    }

    #[test]
    fn missing_workbook_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.xlsx");
        assert!(read_workbook(&missing, &["All"]).is_err());
    }
}
