//! JISDOR reference rate loader
//!
//! The Bank Indonesia JISDOR export carries a few banner rows above the
//! header; the header row holds a date column ("Tanggal") and a rate column
//! ("Kurs"), possibly alongside unnamed filler columns.

use super::rate_table::RateTable;
use crate::data::table::{cell_at, read_table, Cell};
use crate::error::{RecapError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Layout of a JISDOR reference file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JisdorFormat {
    /// Zero-based index of the header row
    pub header_row: usize,
    /// Date column name (matched case-insensitively after trimming)
    pub date_column: String,
    /// Rate column name (matched case-insensitively after trimming)
    pub rate_column: String,
}

impl Default for JisdorFormat {
    fn default() -> Self {
        Self {
            header_row: 4,
            date_column: "Tanggal".to_string(),
            rate_column: "Kurs".to_string(),
        }
    }
}

/// Find column index by name; blank ("unnamed") header cells never match
fn find_column(header: &[Cell], name: &str, path: &Path) -> Result<usize> {
    header
        .iter()
        .position(|cell| !cell.is_empty() && cell.as_text().eq_ignore_ascii_case(name.trim()))
        .ok_or_else(|| RecapError::MissingColumn {
            column: name.to_string(),
            path: path.to_path_buf(),
        })
}

/// Load a JISDOR file into a forward-filled rate table.
///
/// Rows with a blank date are ignored. A non-blank date that cannot be read
/// fails the load; a rate that cannot be read is treated as missing and is
/// filled from the previous known rate.
pub fn load_jisdor(path: &Path, format: &JisdorFormat) -> Result<RateTable> {
    let rows = read_table(path)?;

    let header: &[Cell] = rows.get(format.header_row).ok_or_else(|| {
        RecapError::DataError(format!(
            "Header row {} is beyond the end of {} ({} rows)",
            format.header_row,
            path.display(),
            rows.len()
        ))
    })?;
    let date_idx = find_column(header, &format.date_column, path)?;
    let rate_idx = find_column(header, &format.rate_column, path)?;

    let mut raw = Vec::new();
    for (offset, row) in rows.iter().enumerate().skip(format.header_row + 1) {
        let date_cell = cell_at(row, date_idx);
        if date_cell.is_empty() {
            continue;
        }

        let date = date_cell.as_date().ok_or_else(|| {
            RecapError::ParseError(format!(
                "Invalid date '{}' at row {} of {}",
                date_cell.as_text(),
                offset + 1,
                path.display()
            ))
        })?;
        let rate = cell_at(row, rate_idx).as_number();

        raw.push((date, rate));
    }

    let table = RateTable::build(raw);
    match table.date_range() {
        Some((first, last)) => log::info!(
            "Loaded {} JISDOR rates from {} ({} to {})",
            table.len(),
            path.display(),
            first,
            last
        ),
        None => log::warn!("No usable JISDOR rates in {}", path.display()),
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fx::RateLookup;
    use chrono::NaiveDate;
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile};

    fn write_csv(lines: &[&str]) -> NamedTempFile {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        file.flush().unwrap();
        file
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_load_with_banner_rows_and_unnamed_columns() {
        let file = write_csv(&[
            "Informasi Kurs JISDOR,,",
            ",,",
            "Periode 2024-2025,,",
            ",,",
            ",  tanggal ,KURS",
            ",2024-12-20,15800",
            ",2024-12-23,",
            ",2025-01-05,15900",
            ",,",
        ]);

        let table = load_jisdor(file.path(), &JisdorFormat::default()).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.rate_as_of(d(2024, 12, 23)), Some(15_800.0));
        assert_eq!(table.rate_as_of(d(2025, 1, 5)), Some(15_900.0));
    }

    #[test]
    fn test_header_row_past_end_of_sheet() {
        let file = write_csv(&["Informasi Kurs JISDOR,,", ",,"]);
        let result = load_jisdor(file.path(), &JisdorFormat::default());
        assert!(matches!(result, Err(RecapError::DataError(_))));
    }

    #[test]
    fn test_missing_rate_column() {
        let file = write_csv(&[",", ",", ",", ",", "Tanggal,Nilai", "2025-01-02,16000"]);

        let err = load_jisdor(file.path(), &JisdorFormat::default()).unwrap_err();
        match err {
            RecapError::MissingColumn { column, .. } => assert_eq!(column, "Kurs"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_date_fails() {
        let file = write_csv(&[",", ",", ",", ",", "Tanggal,Kurs", "yesterday,16000"]);
        let err = load_jisdor(file.path(), &JisdorFormat::default()).unwrap_err();
        assert!(matches!(err, RecapError::ParseError(_)));
    }
}
