//! Recap tables: monthly sums and the product x year volume breakdown
//!
//! Every builder takes the immutable enriched-trade slice and derives month
//! and year from the trade date itself. Missing values count as zero.

use crate::calendar::{indonesian_month_name, year_range_label};
use crate::enrich::EnrichedTrade;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Label of the synthetic total row in monthly tables
pub const TOTAL_LABEL: &str = "Total";
/// Label of the synthetic total row in the product breakdown
pub const TOTAL_LOT_LABEL: &str = "Total Lot";
/// Key column header of monthly tables
pub const MONTH_HEADER: &str = "Bulan";
/// Key column header of the product breakdown
pub const PRODUCT_HEADER: &str = "Jenis_Produk";
/// Percentage change column header of the product breakdown
pub const CHANGE_HEADER: &str = "Perubahan (%)";

/// Numeric trade field a monthly table sums
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SummaryField {
    VolumeLots,
    NotionalLocal,
    NotionalForeign,
    Margin,
}

impl SummaryField {
    /// Value column header
    pub fn header(&self) -> &'static str {
        match self {
            SummaryField::VolumeLots => "Volume_Lot",
            SummaryField::NotionalLocal => "Nilai Transaksi RP",
            SummaryField::NotionalForeign => "Nilai Transaksi (USD)",
            SummaryField::Margin => "Margin Transaksi (Rp)",
        }
    }

    pub fn value(&self, trade: &EnrichedTrade) -> Option<f64> {
        match self {
            SummaryField::VolumeLots => trade.record.volume_lots,
            SummaryField::NotionalLocal => trade.notional_value_local,
            SummaryField::NotionalForeign => trade.notional_value_foreign,
            SummaryField::Margin => trade.margin,
        }
    }
}

/// One row of a monthly table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub label: String,
    /// Calendar month 1-12; `None` on the total row
    pub month: Option<u32>,
    pub value: f64,
    pub is_total: bool,
}

/// Monthly sums of one field, total row last
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryTable {
    pub field: SummaryField,
    pub key_header: String,
    pub value_header: String,
    pub rows: Vec<SummaryRow>,
    /// `"2025"` or `"2024-2025"`; empty for an empty table
    pub year_label: String,
}

impl SummaryTable {
    /// Rows without the total row
    pub fn data_rows(&self) -> &[SummaryRow] {
        match self.rows.last() {
            Some(last) if last.is_total => &self.rows[..self.rows.len() - 1],
            _ => &self.rows,
        }
    }

    /// Value of the total row
    pub fn total(&self) -> Option<f64> {
        self.rows.last().filter(|row| row.is_total).map(|row| row.value)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Sum a field per calendar month (1-12, all years pooled) and append a total row
pub fn summarize_by_month(trades: &[EnrichedTrade], field: SummaryField) -> SummaryTable {
    let mut by_month: BTreeMap<u32, f64> = BTreeMap::new();
    for trade in trades {
        *by_month.entry(trade.month()).or_insert(0.0) += field.value(trade).unwrap_or(0.0);
    }

    let mut rows: Vec<SummaryRow> = by_month
        .iter()
        .map(|(&month, &value)| SummaryRow {
            label: indonesian_month_name(month).unwrap_or_default().to_string(),
            month: Some(month),
            value,
            is_total: false,
        })
        .collect();

    if !rows.is_empty() {
        let total = rows.iter().map(|row| row.value).sum();
        rows.push(SummaryRow {
            label: TOTAL_LABEL.to_string(),
            month: None,
            value: total,
            is_total: true,
        });
    }

    SummaryTable {
        field,
        key_header: MONTH_HEADER.to_string(),
        value_header: field.header().to_string(),
        rows,
        year_label: year_range_label(trades.iter().map(EnrichedTrade::year)),
    }
}

/// Traded lots per month
pub fn volume_by_month(trades: &[EnrichedTrade]) -> SummaryTable {
    summarize_by_month(trades, SummaryField::VolumeLots)
}

/// Notional value in Rupiah per month
pub fn local_value_by_month(trades: &[EnrichedTrade]) -> SummaryTable {
    summarize_by_month(trades, SummaryField::NotionalLocal)
}

/// Notional value in USD per month
pub fn foreign_value_by_month(trades: &[EnrichedTrade]) -> SummaryTable {
    summarize_by_month(trades, SummaryField::NotionalForeign)
}

/// Margin per month
pub fn margin_by_month(trades: &[EnrichedTrade]) -> SummaryTable {
    summarize_by_month(trades, SummaryField::Margin)
}

/// Percentage change from the earliest to the latest year.
///
/// Reported as 0 when the earliest value is not positive, even if the latest
/// value is not.
pub fn percent_change(first: f64, last: f64) -> f64 {
    if first > 0.0 {
        (last - first) / first * 100.0
    } else {
        0.0
    }
}

/// One product row of the volume breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownRow {
    pub product: String,
    /// Lots per year, aligned with `ProductYearBreakdown::years`
    pub volumes: Vec<f64>,
    /// Percent units (12.5 means 12.5%)
    pub change_pct: f64,
    pub is_total: bool,
}

/// Traded lots per product type and calendar year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductYearBreakdown {
    /// Ascending
    pub years: Vec<i32>,
    /// Products in alphabetical order, then the "Total Lot" row
    pub rows: Vec<BreakdownRow>,
    pub year_label: String,
}

impl ProductYearBreakdown {
    /// Column headers: product, one per year, percentage change
    pub fn headers(&self) -> Vec<String> {
        let mut headers = vec![PRODUCT_HEADER.to_string()];
        headers.extend(self.years.iter().map(|y| y.to_string()));
        headers.push(CHANGE_HEADER.to_string());
        headers
    }

    pub fn data_rows(&self) -> &[BreakdownRow] {
        match self.rows.last() {
            Some(last) if last.is_total => &self.rows[..self.rows.len() - 1],
            _ => &self.rows,
        }
    }

    pub fn total_row(&self) -> Option<&BreakdownRow> {
        self.rows.last().filter(|row| row.is_total)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn change_over_years(volumes: &[f64]) -> f64 {
    match (volumes.first(), volumes.last()) {
        (Some(&first), Some(&last)) if volumes.len() >= 2 => percent_change(first, last),
        _ => 0.0,
    }
}

/// Pivot traded lots by product type x year, with a percentage change column
/// (earliest vs latest year) and a total row
pub fn volume_by_product_year(trades: &[EnrichedTrade]) -> ProductYearBreakdown {
    let mut sums: HashMap<(&str, i32), f64> = HashMap::new();
    let mut products: BTreeSet<&str> = BTreeSet::new();
    let mut years: BTreeSet<i32> = BTreeSet::new();

    for trade in trades {
        let product = trade.product_type.as_str();
        products.insert(product);
        years.insert(trade.year());
        *sums.entry((product, trade.year())).or_insert(0.0) +=
            trade.record.volume_lots.unwrap_or(0.0);
    }

    let years: Vec<i32> = years.into_iter().collect();

    let mut rows: Vec<BreakdownRow> = products
        .iter()
        .map(|product| {
            let volumes: Vec<f64> = years
                .iter()
                .map(|year| sums.get(&(*product, *year)).copied().unwrap_or(0.0))
                .collect();
            BreakdownRow {
                product: product.to_string(),
                change_pct: change_over_years(&volumes),
                volumes,
                is_total: false,
            }
        })
        .collect();

    if !rows.is_empty() {
        let totals: Vec<f64> = (0..years.len())
            .map(|idx| rows.iter().map(|row| row.volumes[idx]).sum())
            .collect();
        rows.push(BreakdownRow {
            product: TOTAL_LOT_LABEL.to_string(),
            change_pct: change_over_years(&totals),
            volumes: totals,
            is_total: true,
        });
    }

    ProductYearBreakdown {
        year_label: year_range_label(years.iter().copied()),
        years,
        rows,
    }
}

/// All five recap tables of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecapSummary {
    pub volume: SummaryTable,
    pub volume_by_product: ProductYearBreakdown,
    pub value_local: SummaryTable,
    pub value_foreign: SummaryTable,
    pub margin: SummaryTable,
}

impl RecapSummary {
    pub fn build(trades: &[EnrichedTrade]) -> Self {
        Self {
            volume: volume_by_month(trades),
            volume_by_product: volume_by_product_year(trades),
            value_local: local_value_by_month(trades),
            value_foreign: foreign_value_by_month(trades),
            margin: margin_by_month(trades),
        }
    }
}
