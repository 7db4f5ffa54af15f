//! Recap output: the Excel workbook and an optional JSON summary

pub mod json;
pub mod workbook;

pub use json::write_summary_json;
pub use workbook::{
    WorkbookReport, BREAKDOWN_SHEET, DASHBOARD_SHEET, DETAIL_HEADERS, MARGIN_SHEET,
    VALUE_FOREIGN_SHEET, VALUE_LOCAL_SHEET, VOLUME_SHEET,
};
