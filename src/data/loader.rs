use std::io::{Read, Seek};
use std::path::Path;

use anyhow::{bail, Context, Result};
use calamine::{open_workbook_auto, Data, Range, Reader, Xlsx};
use serde_json::Value as JsonValue;

use super::model::{CellValue, Row, Table};
use super::normalize::canon;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.xlsx` / `.xls` – first worksheet of the workbook
/// * `.csv`           – header row with column names
/// * `.json`          – records-oriented: `[{ "Country": "...", ... }, ...]`
///
/// Column names are canonicalized on the way in; when two headers collapse
/// to the same canonical name the right-most column wins.
pub fn load_file(path: &Path) -> Result<Table> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "xlsx" | "xls" => load_spreadsheet(path),
        "csv" => load_csv(path),
        "json" => load_json(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

/// Fail with a clear message when the table lacks the columns a dashboard
/// expects.  No column inference happens beyond header canonicalization.
pub fn ensure_columns(table: &Table, required: &[&str]) -> Result<()> {
    let missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|col| !table.has_column(col))
        .collect();
    if !missing.is_empty() {
        bail!(
            "Missing required column(s): {} (found: {})",
            missing.join(", "),
            table.column_names.join(", ")
        );
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Excel loader
// ---------------------------------------------------------------------------

fn load_spreadsheet(path: &Path) -> Result<Table> {
    let mut workbook = open_workbook_auto(path).context("opening workbook")?;
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .context("workbook has no worksheets")?;
    let range = workbook
        .worksheet_range(&sheet_name)
        .with_context(|| format!("reading worksheet '{sheet_name}'"))?;
    table_from_range(&range)
}

/// Load an `.xlsx` workbook from an in-memory reader (first worksheet).
pub fn load_xlsx_reader<RS: Read + Seek>(reader: RS) -> Result<Table> {
    let mut workbook: Xlsx<RS> = Xlsx::new(reader).context("opening workbook")?;
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .context("workbook has no worksheets")?;
    let range = workbook
        .worksheet_range(&sheet_name)
        .with_context(|| format!("reading worksheet '{sheet_name}'"))?;
    table_from_range(&range)
}

fn table_from_range(range: &Range<Data>) -> Result<Table> {
    let mut rows_iter = range.rows();
    let header_row = rows_iter.next().context("worksheet is empty")?;

    // Canonical header per column; unnamed columns are dropped.
    let headers: Vec<Option<String>> = header_row
        .iter()
        .map(|cell| {
            let name = canon(&cell.to_string());
            (!name.is_empty()).then_some(name)
        })
        .collect();

    if headers.iter().all(Option::is_none) {
        bail!("worksheet has no usable column headers");
    }

    let mut rows: Vec<Row> = Vec::new();
    for cells in rows_iter {
        let mut row = Row::new();
        for (idx, cell) in cells.iter().enumerate() {
            if let Some(Some(name)) = headers.get(idx) {
                row.insert(name.clone(), convert_cell(cell));
            }
        }
        // Trailing all-empty spreadsheet rows carry no information.
        if row.values().any(|v| *v != CellValue::Null) {
            rows.push(row);
        }
    }

    Ok(Table::from_rows(rows))
}

fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Null,
        Data::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                CellValue::Null
            } else {
                CellValue::Text(trimmed.to_string())
            }
        }
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(ndt) => CellValue::DateTime(ndt),
            None => CellValue::Null,
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(format!("#ERR {e:?}")),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<Table> {
    let file = std::fs::File::open(path).context("opening CSV")?;
    load_csv_reader(file)
}

/// Load a CSV table from any reader.  First record is the header row.
pub fn load_csv_reader<R: Read>(reader: R) -> Result<Table> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let headers: Vec<String> = csv_reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(canon)
        .collect();

    let mut rows: Vec<Row> = Vec::new();
    for (row_no, result) in csv_reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let mut row = Row::new();
        for (idx, value) in record.iter().enumerate() {
            let Some(name) = headers.get(idx) else { continue };
            if name.is_empty() {
                continue;
            }
            row.insert(name.clone(), guess_cell_type(value));
        }
        if row.values().any(|v| *v != CellValue::Null) {
            rows.push(row);
        }
    }

    Ok(Table::from_rows(rows))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

fn load_json(path: &Path) -> Result<Table> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    parse_json(&text)
}

fn parse_json(text: &str) -> Result<Table> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut rows: Vec<Row> = Vec::with_capacity(records.len());
    for (i, record) in records.iter().enumerate() {
        let object = record
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let mut row = Row::new();
        for (key, value) in object {
            let name = canon(key);
            if name.is_empty() {
                continue;
            }
            row.insert(name, json_to_cell(value));
        }
        if row.values().any(|v| *v != CellValue::Null) {
            rows.push(row);
        }
    }

    Ok(Table::from_rows(rows))
}

fn json_to_cell(value: &JsonValue) -> CellValue {
    match value {
        JsonValue::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                CellValue::Null
            } else {
                CellValue::Text(trimmed.to_string())
            }
        }
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::Text(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::Text(other.to_string()),
    }
}

fn guess_cell_type(s: &str) -> CellValue {
    let s = s.trim();
    if s.is_empty() {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::Float(f);
    }
    if s == "true" || s == "false" {
        return CellValue::Bool(s == "true");
    }
    CellValue::Text(s.to_string())
}
