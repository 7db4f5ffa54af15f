//! Month lookup tables and month keys
//!
//! Contract codes use English three-letter month abbreviations (`JAN`..`DEC`);
//! recap tables label months with Indonesian month names.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Three-letter month abbreviations, index 0 = January
pub const MONTH_ABBREVIATIONS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

/// Indonesian month names, index 0 = January
pub const INDONESIAN_MONTH_NAMES: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

/// Month number (1-12) for a three-letter abbreviation, case-insensitive
pub fn month_from_abbreviation(abbrev: &str) -> Option<u32> {
    MONTH_ABBREVIATIONS
        .iter()
        .position(|m| m.eq_ignore_ascii_case(abbrev))
        .map(|idx| idx as u32 + 1)
}

/// Three-letter abbreviation for a month number (1-12)
pub fn month_abbreviation(month: u32) -> Option<&'static str> {
    month
        .checked_sub(1)
        .and_then(|idx| MONTH_ABBREVIATIONS.get(idx as usize))
        .copied()
}

/// Indonesian month name for a month number (1-12)
pub fn indonesian_month_name(month: u32) -> Option<&'static str> {
    month
        .checked_sub(1)
        .and_then(|idx| INDONESIAN_MONTH_NAMES.get(idx as usize))
        .copied()
}

/// Calendar month identifier, ordered chronologically (year first)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Sheet name such as `JAN25`
    pub fn sheet_name(&self) -> String {
        let abbrev = month_abbreviation(self.month).unwrap_or("???");
        format!("{}{:02}", abbrev, self.year.rem_euclid(100))
    }

    /// Parse a sheet name such as `JAN25` back into a key (years offset from 2000)
    pub fn from_sheet_name(name: &str) -> Option<Self> {
        let month = month_from_abbreviation(name.get(..3)?)?;
        let yy: i32 = name.get(3..)?.trim().parse().ok()?;
        Self::new(2000 + yy, month)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sheet_name())
    }
}

/// Year range label: `"2025"` for a single year, `"2024-2025"` otherwise,
/// empty when there are no years.
pub fn year_range_label<I: IntoIterator<Item = i32>>(years: I) -> String {
    let mut min: Option<i32> = None;
    let mut max: Option<i32> = None;
    for year in years {
        min = Some(min.map_or(year, |m| m.min(year)));
        max = Some(max.map_or(year, |m| m.max(year)));
    }

    match (min, max) {
        (Some(lo), Some(hi)) if lo == hi => lo.to_string(),
        (Some(lo), Some(hi)) => format!("{}-{}", lo, hi),
        _ => String::new(),
    }
}
