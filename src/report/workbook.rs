//! Excel recap workbook writer

use crate::aggregate::{ProductYearBreakdown, RecapSummary, SummaryField, SummaryTable};
use crate::data::table::date_to_excel_serial;
use crate::engine::{MonthlySheet, RecapRun};
use crate::enrich::EnrichedTrade;
use crate::error::Result;
use chrono::NaiveDate;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, Worksheet};
use std::path::Path;

pub const VOLUME_SHEET: &str = "Rekap_Volume_Transaksi";
pub const BREAKDOWN_SHEET: &str = "Breakdown_Volume_Transaksi";
pub const VALUE_LOCAL_SHEET: &str = "Nilai_Transaksi_RP";
pub const VALUE_FOREIGN_SHEET: &str = "Nilai_transaksi_USD";
pub const MARGIN_SHEET: &str = "Margin_Transaksi";
pub const DASHBOARD_SHEET: &str = "Dashboard";

/// Column headers of the dashboard and monthly detail sheets
pub const DETAIL_HEADERS: [&str; 19] = [
    "DateTrade",
    "Trade ID",
    "Contract",
    "Acc.Buy",
    "Mbr.Buy",
    "Acc.Sell",
    "Mbr.Sell",
    "Currency",
    "Price",
    "Unit",
    "Vol(LOT)",
    "ClosePosition",
    "Jenis_Produk",
    "Contract_Size_KG",
    "Notional_Value",
    "Margin",
    "Tanggal_Kurs",
    "Kurs_Jisdor",
    "Notional_Value_USD",
];

/// Banner cell above the product column of the breakdown sheet
const BREAKDOWN_BANNER_PRODUCT: &str = "Jenis Produk";
/// Banner cell above each year column of the breakdown sheet
const BREAKDOWN_BANNER_YEAR: &str = "Lot";

/// Summary tables start below the title and a spacer row
const SUMMARY_HEADER_ROW: u32 = 2;
/// The breakdown has an extra banner row above its column headers
const BREAKDOWN_HEADER_ROW: u32 = 3;

/// Cell formats shared by every sheet
struct Formats {
    title: Format,
    header: Format,
    integer: Format,
    decimal: Format,
    percent: Format,
    date: Format,
    bold_text: Format,
    bold_integer: Format,
    bold_decimal: Format,
    bold_percent: Format,
}

impl Formats {
    fn new() -> Self {
        let right = || Format::new().set_align(FormatAlign::Right);
        Self {
            title: Format::new()
                .set_bold()
                .set_font_size(14)
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter),
            header: Format::new()
                .set_bold()
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter)
                .set_border(FormatBorder::Thin)
                .set_background_color(Color::RGB(0xD9E1F2)),
            integer: right().set_num_format("#,##0"),
            decimal: right().set_num_format("#,##0.00"),
            percent: right().set_num_format("0.00%"),
            date: Format::new().set_num_format("yyyy-mm-dd"),
            bold_text: Format::new().set_bold(),
            bold_integer: right().set_bold().set_num_format("#,##0"),
            bold_decimal: right().set_bold().set_num_format("#,##0.00"),
            bold_percent: right().set_bold().set_num_format("0.00%"),
        }
    }

    /// Number format of a summary value column
    fn for_field(&self, field: SummaryField, bold: bool) -> &Format {
        match (field, bold) {
            (SummaryField::VolumeLots, false) => &self.integer,
            (SummaryField::VolumeLots, true) => &self.bold_integer,
            (_, false) => &self.decimal,
            (_, true) => &self.bold_decimal,
        }
    }
}

/// The recap workbook: five summary sheets, the dashboard and one detail
/// sheet per trade month
pub struct WorkbookReport<'a> {
    summary: RecapSummary,
    trades: &'a [EnrichedTrade],
    monthly: &'a [MonthlySheet],
}

impl<'a> WorkbookReport<'a> {
    /// Create a report from precomputed tables
    pub fn new(
        summary: RecapSummary,
        trades: &'a [EnrichedTrade],
        monthly: &'a [MonthlySheet],
    ) -> Self {
        Self {
            summary,
            trades,
            monthly,
        }
    }

    /// Create a report for a finished run
    pub fn from_run(run: &'a RecapRun) -> Self {
        Self::new(run.summary(), &run.trades, &run.monthly)
    }

    pub fn summary(&self) -> &RecapSummary {
        &self.summary
    }

    /// Sheet names in workbook order
    pub fn sheet_names(&self) -> Vec<String> {
        let mut names: Vec<String> = [
            VOLUME_SHEET,
            BREAKDOWN_SHEET,
            VALUE_LOCAL_SHEET,
            VALUE_FOREIGN_SHEET,
            MARGIN_SHEET,
            DASHBOARD_SHEET,
        ]
        .iter()
        .map(|name| name.to_string())
        .collect();
        names.extend(self.monthly.iter().map(MonthlySheet::name));
        names
    }

    /// Write the workbook to `path`, replacing any existing file
    pub fn write(&self, path: &Path) -> Result<()> {
        let formats = Formats::new();
        let mut workbook = Workbook::new();
        let summary = &self.summary;

        let title = format!("VOLUME TRANSAKSI PERIODE TAHUN {}", summary.volume.year_label);
        let sheet = workbook.add_worksheet().set_name(VOLUME_SHEET)?;
        write_summary_sheet(sheet, &summary.volume, &title, 15.0, &formats)?;

        let sheet = workbook.add_worksheet().set_name(BREAKDOWN_SHEET)?;
        write_breakdown_sheet(sheet, &summary.volume_by_product, &formats)?;

        let title = format!(
            "Notional Value Rupiah Transaksi Periode {}",
            summary.value_local.year_label
        );
        let sheet = workbook.add_worksheet().set_name(VALUE_LOCAL_SHEET)?;
        write_summary_sheet(sheet, &summary.value_local, &title, 25.0, &formats)?;

        let title = format!(
            "Notional Value (USD) Transaksi Periode {}",
            summary.value_foreign.year_label
        );
        let sheet = workbook.add_worksheet().set_name(VALUE_FOREIGN_SHEET)?;
        write_summary_sheet(sheet, &summary.value_foreign, &title, 25.0, &formats)?;

        let title = format!("Margin Transaksi Rupiah Periode {}", summary.margin.year_label);
        let sheet = workbook.add_worksheet().set_name(MARGIN_SHEET)?;
        write_summary_sheet(sheet, &summary.margin, &title, 25.0, &formats)?;

        let sheet = workbook.add_worksheet().set_name(DASHBOARD_SHEET)?;
        write_detail_sheet(sheet, self.trades, &formats)?;

        for month in self.monthly {
            let sheet = workbook.add_worksheet().set_name(month.name())?;
            write_detail_sheet(sheet, &month.trades, &formats)?;
        }

        workbook.save(path)?;
        log::info!(
            "Wrote {} sheets to {}",
            6 + self.monthly.len(),
            path.display()
        );
        Ok(())
    }
}

fn write_title(sheet: &mut Worksheet, title: &str, width: u16, formats: &Formats) -> Result<()> {
    if width > 1 {
        sheet.merge_range(0, 0, 0, width - 1, title, &formats.title)?;
    } else {
        sheet.write_string_with_format(0, 0, title, &formats.title)?;
    }
    Ok(())
}

fn write_summary_sheet(
    sheet: &mut Worksheet,
    table: &SummaryTable,
    title: &str,
    value_width: f64,
    formats: &Formats,
) -> Result<()> {
    write_title(sheet, title, 2, formats)?;
    sheet.set_column_width(0, 20)?;
    sheet.set_column_width(1, value_width)?;

    sheet.write_string_with_format(SUMMARY_HEADER_ROW, 0, &table.key_header, &formats.header)?;
    sheet.write_string_with_format(SUMMARY_HEADER_ROW, 1, &table.value_header, &formats.header)?;

    for (offset, row) in table.rows.iter().enumerate() {
        let r = SUMMARY_HEADER_ROW + 1 + offset as u32;
        if row.is_total {
            sheet.write_string_with_format(r, 0, &row.label, &formats.bold_text)?;
        } else {
            sheet.write_string(r, 0, &row.label)?;
        }
        sheet.write_number_with_format(r, 1, row.value, formats.for_field(table.field, row.is_total))?;
    }
    Ok(())
}

fn write_breakdown_sheet(
    sheet: &mut Worksheet,
    breakdown: &ProductYearBreakdown,
    formats: &Formats,
) -> Result<()> {
    let year_count = breakdown.years.len() as u16;
    let change_col = year_count + 1;
    let title = format!("VOLUME TRANSAKSI PERIODE {}", breakdown.year_label);
    write_title(sheet, &title, change_col + 1, formats)?;

    let banner_row = BREAKDOWN_HEADER_ROW - 1;
    sheet.write_string_with_format(banner_row, 0, BREAKDOWN_BANNER_PRODUCT, &formats.header)?;
    for col in 1..=year_count {
        sheet.write_string_with_format(banner_row, col, BREAKDOWN_BANNER_YEAR, &formats.header)?;
    }
    sheet.write_blank(banner_row, change_col, &formats.header)?;

    for (col, header) in breakdown.headers().iter().enumerate() {
        sheet.write_string_with_format(BREAKDOWN_HEADER_ROW, col as u16, header, &formats.header)?;
    }

    sheet.set_column_width(0, 18)?;
    for col in 1..=year_count {
        sheet.set_column_width(col, 12)?;
    }
    sheet.set_column_width(change_col, 15)?;

    for (offset, row) in breakdown.rows.iter().enumerate() {
        let r = BREAKDOWN_HEADER_ROW + 1 + offset as u32;
        let (integer, percent) = if row.is_total {
            sheet.write_string_with_format(r, 0, &row.product, &formats.bold_text)?;
            (&formats.bold_integer, &formats.bold_percent)
        } else {
            sheet.write_string(r, 0, &row.product)?;
            (&formats.integer, &formats.percent)
        };
        for (idx, volume) in row.volumes.iter().enumerate() {
            sheet.write_number_with_format(r, idx as u16 + 1, *volume, integer)?;
        }
        sheet.write_number_with_format(r, change_col, row.change_pct / 100.0, percent)?;
    }
    Ok(())
}

fn write_text(sheet: &mut Worksheet, row: u32, col: u16, value: &str) -> Result<()> {
    if !value.is_empty() {
        sheet.write_string(row, col, value)?;
    }
    Ok(())
}

fn write_optional_number(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: Option<f64>,
    format: &Format,
) -> Result<()> {
    if let Some(value) = value.filter(|v| v.is_finite()) {
        sheet.write_number_with_format(row, col, value, format)?;
    }
    Ok(())
}

fn write_date(sheet: &mut Worksheet, row: u32, col: u16, date: NaiveDate, format: &Format) -> Result<()> {
    sheet.write_number_with_format(row, col, date_to_excel_serial(date), format)?;
    Ok(())
}

/// Dashboard layout: one row per enriched trade under a header row
fn write_detail_sheet(sheet: &mut Worksheet, trades: &[EnrichedTrade], formats: &Formats) -> Result<()> {
    for (col, header) in DETAIL_HEADERS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, &formats.header)?;
    }
    sheet.set_column_width(0, 12)?;
    sheet.set_column_width(2, 15)?;
    sheet.set_column_width(12, 15)?;
    sheet.set_column_width(13, 18)?;
    sheet.set_column_width(14, 20)?;
    sheet.set_column_width(15, 18)?;
    sheet.set_column_width(16, 12)?;
    sheet.set_column_width(18, 20)?;

    for (offset, trade) in trades.iter().enumerate() {
        let r = 1 + offset as u32;
        let record = &trade.record;

        write_date(sheet, r, 0, record.trade_date, &formats.date)?;
        write_text(sheet, r, 1, &record.trade_id)?;
        write_text(sheet, r, 2, &record.contract_code)?;
        write_text(sheet, r, 3, &record.buyer_account)?;
        write_text(sheet, r, 4, &record.buyer_member)?;
        write_text(sheet, r, 5, &record.seller_account)?;
        write_text(sheet, r, 6, &record.seller_member)?;
        write_text(sheet, r, 7, &record.currency)?;
        write_optional_number(sheet, r, 8, record.price, &formats.decimal)?;
        write_text(sheet, r, 9, &record.unit)?;
        write_optional_number(sheet, r, 10, record.volume_lots, &formats.integer)?;
        write_text(sheet, r, 11, &record.close_position)?;
        write_text(sheet, r, 12, &trade.product_type)?;
        write_optional_number(sheet, r, 13, trade.contract_size_kg, &formats.integer)?;
        write_optional_number(sheet, r, 14, trade.notional_value_local, &formats.decimal)?;
        write_optional_number(sheet, r, 15, trade.margin, &formats.decimal)?;
        if let Some(rate_date) = trade.matched_rate_date {
            write_date(sheet, r, 16, rate_date, &formats.date)?;
        }
        write_optional_number(sheet, r, 17, trade.matched_rate, &formats.decimal)?;
        write_optional_number(sheet, r, 18, trade.notional_value_foreign, &formats.decimal)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::MonthKey;
    use crate::data::fx::RateTable;
    use crate::data::trades::TradeRecord;
    use crate::enrich::enrich_trade;
    use crate::finance::SpotWindowMargin;
    use calamine::{open_workbook_auto, Data, Reader};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn trades() -> Vec<EnrichedTrade> {
        let rates = RateTable::build(vec![(date(2024, 12, 20), Some(15_800.0))]);
        let margin = SpotWindowMargin::default();
        vec![
            TradeRecord::new(date(2024, 12, 20), "CPOID-JAN25", Some(4000.0), Some(10.0), "IDR"),
            TradeRecord::new(date(2025, 1, 5), "CPOID-JAN25", Some(4100.0), Some(5.0), "IDR"),
        ]
        .into_iter()
        .map(|r| enrich_trade(r, &rates, &margin))
        .collect()
    }

    #[test]
    fn test_sheet_order() {
        let trades = trades();
        let monthly = vec![
            MonthlySheet {
                month: MonthKey::new(2024, 12).unwrap(),
                trades: trades[..1].to_vec(),
            },
            MonthlySheet {
                month: MonthKey::new(2025, 1).unwrap(),
                trades: trades[1..].to_vec(),
            },
        ];
        let report = WorkbookReport::new(RecapSummary::build(&trades), &trades, &monthly);

        let names = report.sheet_names();
        assert_eq!(names.len(), 8);
        assert_eq!(names[0], VOLUME_SHEET);
        assert_eq!(names[5], DASHBOARD_SHEET);
        assert_eq!(names[6], "DEC24");
        assert_eq!(names[7], "JAN25");
    }

    #[test]
    fn test_write_and_read_back() {
        let trades = trades();
        let monthly = vec![MonthlySheet {
            month: MonthKey::new(2024, 12).unwrap(),
            trades: trades.clone(),
        }];
        let report = WorkbookReport::new(RecapSummary::build(&trades), &trades, &monthly);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recap.xlsx");
        report.write(&path).unwrap();

        let mut workbook = open_workbook_auto(&path).unwrap();
        assert_eq!(workbook.sheet_names(), report.sheet_names());

        let volume = workbook.worksheet_range(VOLUME_SHEET).unwrap();
        assert_eq!(
            volume.get_value((0, 0)),
            Some(&Data::String("VOLUME TRANSAKSI PERIODE TAHUN 2024-2025".to_string()))
        );
        assert_eq!(volume.get_value((2, 0)), Some(&Data::String("Bulan".to_string())));
        // Januari, Desember, Total
        assert_eq!(volume.get_value((3, 0)), Some(&Data::String("Januari".to_string())));
        assert_eq!(volume.get_value((5, 0)), Some(&Data::String("Total".to_string())));
        assert_eq!(volume.get_value((5, 1)), Some(&Data::Float(15.0)));

        let dashboard = workbook.worksheet_range(DASHBOARD_SHEET).unwrap();
        assert_eq!(dashboard.get_value((0, 18)), Some(&Data::String("Notional_Value_USD".to_string())));
        assert_eq!(dashboard.get_value((1, 15)), Some(&Data::Float(100_000_000.0)));
    }
}
