//! Trade history file reader
//!
//! A trade history export has a header row, a units/sub-header row that is
//! discarded, then one trade per row in twelve fixed positional columns.

use crate::data::table::{cell_at, read_table, row_is_empty, Cell};
use crate::error::{RecapError, Result};
use crate::types::{Price, Quantity};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Number of positional columns in a trade history export
pub const TRADE_COLUMN_COUNT: usize = 12;

/// Column positions in a trade history export
mod col {
    pub const DATE_TRADE: usize = 0;
    pub const TRADE_ID: usize = 1;
    pub const CONTRACT: usize = 2;
    pub const ACC_BUY: usize = 3;
    pub const MBR_BUY: usize = 4;
    pub const ACC_SELL: usize = 5;
    pub const MBR_SELL: usize = 6;
    pub const CURRENCY: usize = 7;
    pub const PRICE: usize = 8;
    pub const UNIT: usize = 9;
    pub const VOLUME: usize = 10;
    pub const CLOSE_POSITION: usize = 11;
}

/// One parsed trade row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub trade_date: NaiveDate,
    pub trade_id: String,
    /// e.g. `CPOID-JAN25`
    pub contract_code: String,
    pub buyer_account: String,
    pub buyer_member: String,
    pub seller_account: String,
    pub seller_member: String,
    pub currency: String,
    /// Missing when the cell is blank or not numeric
    pub price: Option<Price>,
    pub unit: String,
    /// Missing when the cell is blank or not numeric
    pub volume_lots: Option<Quantity>,
    pub close_position: String,
}

impl TradeRecord {
    /// Minimal record, mostly for tests and synthetic batches
    pub fn new(
        trade_date: NaiveDate,
        contract_code: impl Into<String>,
        price: Option<Price>,
        volume_lots: Option<Quantity>,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            trade_date,
            trade_id: String::new(),
            contract_code: contract_code.into(),
            buyer_account: String::new(),
            buyer_member: String::new(),
            seller_account: String::new(),
            seller_member: String::new(),
            currency: currency.into(),
            price,
            unit: String::new(),
            volume_lots,
            close_position: String::new(),
        }
    }

    /// Interpret one positional row. `line` is the 1-based row number, for messages.
    pub fn from_row(row: &[Cell], line: usize) -> Result<Self> {
        let date_cell = cell_at(row, col::DATE_TRADE);
        let trade_date = date_cell.as_date().ok_or_else(|| {
            RecapError::ParseError(format!(
                "Invalid trade date '{}' at row {}",
                date_cell.as_text(),
                line
            ))
        })?;

        let text = |idx: usize| cell_at(row, idx).as_text();

        Ok(Self {
            trade_date,
            trade_id: text(col::TRADE_ID),
            contract_code: text(col::CONTRACT),
            buyer_account: text(col::ACC_BUY),
            buyer_member: text(col::MBR_BUY),
            seller_account: text(col::ACC_SELL),
            seller_member: text(col::MBR_SELL),
            currency: text(col::CURRENCY),
            price: cell_at(row, col::PRICE).as_number(),
            unit: text(col::UNIT),
            volume_lots: cell_at(row, col::VOLUME).as_number(),
            close_position: text(col::CLOSE_POSITION),
        })
    }
}

/// Read every trade in a trade history file.
///
/// Fails when the header has fewer than twelve columns or when any non-blank
/// row has an unreadable trade date. Blank rows are skipped.
pub fn read_trade_file(path: &Path) -> Result<Vec<TradeRecord>> {
    let rows = read_table(path)?;

    let Some(header) = rows.first() else {
        return Ok(Vec::new());
    };
    if header.len() < TRADE_COLUMN_COUNT {
        return Err(RecapError::DataError(format!(
            "{} has {} columns, expected {}",
            path.display(),
            header.len(),
            TRADE_COLUMN_COUNT
        )));
    }

    // rows[0] is the header, rows[1] the units row
    rows.iter()
        .enumerate()
        .skip(2)
        .filter(|(_, row)| !row_is_empty(row))
        .map(|(idx, row)| {
            TradeRecord::from_row(row, idx + 1).map_err(|e| match e {
                RecapError::ParseError(msg) => {
                    RecapError::ParseError(format!("{} in {}", msg, path.display()))
                }
                other => other,
            })
        })
        .collect()
}
