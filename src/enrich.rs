//! Trade enrichment: classification, notional value, margin and rate alignment

use crate::calendar::MonthKey;
use crate::contract::product_type;
use crate::data::fx::RateLookup;
use crate::data::trades::TradeRecord;
use crate::finance::{contract_size_kg, notional_foreign, notional_local, MarginModel};
use crate::types::{Cash, Rate};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A trade with its derived financial fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedTrade {
    #[serde(flatten)]
    pub record: TradeRecord,
    pub product_type: String,
    pub contract_size_kg: Option<f64>,
    /// Notional value in the trade currency (IDR)
    pub notional_value_local: Option<Cash>,
    /// Notional value in USD at the matched JISDOR rate
    pub notional_value_foreign: Option<Cash>,
    pub margin: Option<Cash>,
    /// Effective date of the matched rate; never after the trade date
    pub matched_rate_date: Option<NaiveDate>,
    pub matched_rate: Option<Rate>,
}

impl EnrichedTrade {
    pub fn trade_date(&self) -> NaiveDate {
        self.record.trade_date
    }

    pub fn year(&self) -> i32 {
        self.record.trade_date.year()
    }

    pub fn month(&self) -> u32 {
        self.record.trade_date.month()
    }

    pub fn month_key(&self) -> MonthKey {
        MonthKey::from_date(self.record.trade_date)
    }
}

/// Enrich one trade.
///
/// Never fails: missing price or volume leaves the dependent values empty,
/// an unparsable contract code yields an "Unknown" product (for empty codes)
/// and the remote margin rate, and a trade dated before the first rate
/// observation gets no foreign value.
pub fn enrich_trade<R, M>(record: TradeRecord, rates: &R, margin_model: &M) -> EnrichedTrade
where
    R: RateLookup + ?Sized,
    M: MarginModel + ?Sized,
{
    let local = notional_local(record.volume_lots, record.price);
    let matched = rates.observation_as_of(record.trade_date);
    let margin = record
        .volume_lots
        .map(|lots| margin_model.calculate(&record.contract_code, record.trade_date, lots));

    EnrichedTrade {
        product_type: product_type(&record.contract_code),
        contract_size_kg: contract_size_kg(record.volume_lots),
        notional_value_local: local,
        notional_value_foreign: notional_foreign(local, matched.map(|obs| obs.rate)),
        margin,
        matched_rate_date: matched.map(|obs| obs.effective_date),
        matched_rate: matched.map(|obs| obs.rate),
        record,
    }
}
