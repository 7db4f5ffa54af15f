//! Raw tabular input: spreadsheet and CSV files read into typed cells
//!
//! Rows keep their physical position in the sheet (row 0 is the first row of
//! the sheet even when it is blank), so header offsets count real rows.

use crate::error::{RecapError, Result};
use calamine::{open_workbook_auto, Data, Reader};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use std::path::Path;

/// Timestamp layouts accepted in text cells; the time part is dropped
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %H:%M:%S",
];

/// Date layouts accepted in text cells. Slash dates are tried month-first.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d %B %Y",
    "%d %b %Y",
    "%d-%b-%Y",
    "%d-%b-%y",
];

/// A single spreadsheet cell
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Number(f64),
    Text(String),
    Date(NaiveDate),
    Bool(bool),
}

impl Cell {
    /// Build a cell from raw CSV text
    pub fn from_text(raw: &str) -> Self {
        if raw.trim().is_empty() {
            Cell::Empty
        } else {
            Cell::Text(raw.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Numeric value; numeric text is parsed, anything else is missing
    pub fn as_number(&self) -> Option<f64> {
        let value = match self {
            Cell::Number(n) => Some(*n),
            Cell::Text(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        value.filter(|v| v.is_finite())
    }

    /// Calendar date; numbers are read as Excel serial dates
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Cell::Date(d) => Some(*d),
            Cell::Number(n) => excel_serial_to_date(*n),
            Cell::Text(s) => parse_date_text(s.trim()),
            _ => None,
        }
    }

    /// Display text; integral numbers render without a fraction
    pub fn as_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
            Cell::Number(n) => n.to_string(),
            Cell::Text(s) => s.trim().to_string(),
            Cell::Date(d) => d.format("%Y-%m-%d").to_string(),
            Cell::Bool(b) => if *b { "True" } else { "False" }.to_string(),
        }
    }
}

impl From<&Data> for Cell {
    fn from(data: &Data) -> Self {
        match data {
            Data::Int(i) => Cell::Number(*i as f64),
            Data::Float(f) => Cell::Number(*f),
            Data::String(s) => Cell::from_text(s),
            Data::Bool(b) => Cell::Bool(*b),
            Data::DateTime(dt) => {
                excel_serial_to_date(dt.as_f64()).map_or(Cell::Empty, Cell::Date)
            }
            Data::DateTimeIso(s) => parse_date_text(s).map_or(Cell::Empty, Cell::Date),
            Data::DurationIso(_) | Data::Error(_) | Data::Empty => Cell::Empty,
        }
    }
}

/// Largest serial Excel can display (9999-12-31)
pub const EXCEL_MAX_SERIAL: f64 = 2_958_465.0;

/// Convert an Excel serial day number (1900 date system) to a date
pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || !(1.0..=EXCEL_MAX_SERIAL).contains(&serial) {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_signed(Duration::days(serial.floor() as i64))
}

/// Excel serial day number for a date (1900 date system)
pub fn date_to_excel_serial(date: NaiveDate) -> f64 {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30).unwrap_or(NaiveDate::MIN);
    (date - epoch).num_days() as f64
}

fn parse_date_text(text: &str) -> Option<NaiveDate> {
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .map(|dt| dt.date())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        })
}

static EMPTY_CELL: Cell = Cell::Empty;

/// Cell at `idx`, or an empty cell past the end of a short row
pub fn cell_at(row: &[Cell], idx: usize) -> &Cell {
    row.get(idx).unwrap_or(&EMPTY_CELL)
}

/// Whether every cell in a row is empty
pub fn row_is_empty(row: &[Cell]) -> bool {
    row.iter().all(Cell::is_empty)
}

/// Read the first worksheet of a spreadsheet, or a whole CSV file, into rows
pub fn read_table(path: &Path) -> Result<Vec<Vec<Cell>>> {
    if !path.exists() {
        return Err(RecapError::FileNotFound(path.to_path_buf()));
    }

    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => read_spreadsheet(path),
        "csv" => read_csv(path),
        _ => Err(RecapError::UnsupportedFormat(path.to_path_buf())),
    }
}

fn read_spreadsheet(path: &Path) -> Result<Vec<Vec<Cell>>> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook.worksheet_range_at(0).ok_or_else(|| {
        RecapError::DataError(format!("No worksheet in {}", path.display()))
    })??;

    // calamine trims leading blank rows/columns; restore them so offsets stay physical
    let (first_row, first_col) = range.start().unwrap_or((0, 0));
    let mut rows: Vec<Vec<Cell>> = vec![Vec::new(); first_row as usize];

    for data_row in range.rows() {
        let mut row = vec![Cell::Empty; first_col as usize];
        row.extend(data_row.iter().map(Cell::from));
        rows.push(row);
    }

    Ok(rows)
}

/// Read a CSV file without a header record. Note the csv reader skips lines
/// that are completely empty; rows made of empty fields are kept.
fn read_csv(path: &Path) -> Result<Vec<Vec<Cell>>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(Cell::from_text).collect());
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile};

    fn temp_with_suffix(suffix: &str) -> NamedTempFile {
        Builder::new().suffix(suffix).tempfile().unwrap()
    }

    #[test]
    fn test_number_coercion() {
        assert_eq!(Cell::Number(4000.0).as_number(), Some(4000.0));
        assert_eq!(Cell::Text(" 12.5 ".into()).as_number(), Some(12.5));
        assert_eq!(Cell::Text("n/a".into()).as_number(), None);
        assert_eq!(Cell::Empty.as_number(), None);
        assert_eq!(Cell::Text("NaN".into()).as_number(), None);
    }

    #[test]
    fn test_date_coercion() {
        let d = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
        assert_eq!(Cell::Text("2025-01-05".into()).as_date(), Some(d));
        assert_eq!(Cell::Text("2025-01-05 14:30:00".into()).as_date(), Some(d));
        assert_eq!(Cell::Text("1/5/2025 12:00:00 AM".into()).as_date(), Some(d));
        assert_eq!(Cell::Number(date_to_excel_serial(d)).as_date(), Some(d));
        assert_eq!(Cell::Number(date_to_excel_serial(d) + 0.75).as_date(), Some(d));
        assert_eq!(Cell::Text("not a date".into()).as_date(), None);
    }

    #[test]
    fn test_out_of_range_serial_is_not_a_date() {
        assert_eq!(Cell::Number(1e20).as_date(), None);
        assert_eq!(Cell::Number(f64::MAX).as_date(), None);
        assert_eq!(Cell::Number(EXCEL_MAX_SERIAL + 1.0).as_date(), None);
        assert_eq!(
            excel_serial_to_date(EXCEL_MAX_SERIAL),
            NaiveDate::from_ymd_opt(9999, 12, 31)
        );
        assert_eq!(Cell::Number(0.5).as_date(), None);
    }

    #[test]
    fn test_text_rendering() {
        assert_eq!(Cell::Number(123456.0).as_text(), "123456");
        assert_eq!(Cell::Number(1.5).as_text(), "1.5");
        assert_eq!(Cell::Text("  ab ".into()).as_text(), "ab");
        assert_eq!(Cell::Empty.as_text(), "");
    }

    #[test]
    fn test_read_csv_keeps_physical_rows() {
        let mut file = temp_with_suffix(".csv");
        writeln!(file, "title,").unwrap();
        writeln!(file, ",").unwrap();
        writeln!(file, "Tanggal,Kurs").unwrap();
        writeln!(file, "2025-01-02,16000").unwrap();
        file.flush().unwrap();

        let rows = read_table(file.path()).unwrap();
        assert_eq!(rows.len(), 4);
        assert!(row_is_empty(&rows[1]));
        assert_eq!(rows[2][1], Cell::Text("Kurs".into()));
        assert_eq!(rows[3][1].as_number(), Some(16000.0));
    }

    #[test]
    fn test_read_unknown_extension() {
        let file = temp_with_suffix(".parquet");
        let err = read_table(file.path()).unwrap_err();
        assert!(matches!(err, RecapError::UnsupportedFormat(_)));
    }
}
