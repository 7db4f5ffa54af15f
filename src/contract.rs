//! Contract code classification
//!
//! Contract codes look like `CPOID-JAN25`: a product root, a dash, then the
//! contract month as a three-letter abbreviation and a two-digit year offset
//! from 2000.

use crate::calendar::month_from_abbreviation;
use crate::error::{RecapError, Result};
use crate::types::UNKNOWN_PRODUCT;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// First day of the spot window, in the month preceding the contract month
const SPOT_WINDOW_START_DAY: u32 = 16;
/// Last day of the spot window, in the contract month
const SPOT_WINDOW_END_DAY: u32 = 15;

/// Product type of a contract code: the upper-cased token before the first dash.
///
/// Never fails. Empty codes and codes with an empty root map to `"Unknown"`.
pub fn product_type(contract_code: &str) -> String {
    let root = contract_code
        .split('-')
        .next()
        .unwrap_or_default()
        .trim()
        .to_uppercase();

    if root.is_empty() {
        UNKNOWN_PRODUCT.to_string()
    } else {
        root
    }
}

/// Delivery month of a futures contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ContractMonth {
    pub year: i32,
    pub month: u32,
}

impl ContractMonth {
    /// Parse the token after the last dash of a contract code
    pub fn parse(contract_code: &str) -> Result<Self> {
        let suffix = contract_code.rsplit('-').next().unwrap_or_default().trim();

        let month = suffix
            .get(..3)
            .and_then(month_from_abbreviation)
            .ok_or_else(|| {
                RecapError::ParseError(format!(
                    "Unknown contract month in '{}'",
                    contract_code
                ))
            })?;

        let yy: i32 = suffix[3..].trim().parse().map_err(|_| {
            RecapError::ParseError(format!("Invalid contract year in '{}'", contract_code))
        })?;

        let year = 2000i32.checked_add(yy).ok_or_else(|| {
            RecapError::ParseError(format!("Invalid contract year in '{}'", contract_code))
        })?;

        Ok(Self { year, month })
    }

    /// Inclusive spot window: 16th of the preceding month through the 15th of
    /// the contract month. January contracts start the window in December of
    /// the previous year.
    pub fn spot_window(&self) -> Option<(NaiveDate, NaiveDate)> {
        let (prev_year, prev_month) = if self.month == 1 {
            (self.year.checked_sub(1)?, 12)
        } else {
            (self.year, self.month - 1)
        };

        let start = NaiveDate::from_ymd_opt(prev_year, prev_month, SPOT_WINDOW_START_DAY)?;
        let end = NaiveDate::from_ymd_opt(self.year, self.month, SPOT_WINDOW_END_DAY)?;
        Some((start, end))
    }

    /// Whether a trade date falls inside the spot window
    pub fn in_spot_window(&self, trade_date: NaiveDate) -> Option<bool> {
        self.spot_window()
            .map(|(start, end)| start <= trade_date && trade_date <= end)
    }
}

/// Classification of a contract code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub product_type: String,
    /// `None` when the code has no parsable contract month
    pub contract_month: Option<ContractMonth>,
}

/// Classify a contract code into product type and contract month
pub fn classify(contract_code: &str) -> Classification {
    Classification {
        product_type: product_type(contract_code),
        contract_month: ContractMonth::parse(contract_code).ok(),
    }
}
