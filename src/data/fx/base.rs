//! Base FX types - rate observations and the as-of lookup trait

use crate::types::Rate;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One published exchange rate (IDR per USD) effective from a date
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateObservation {
    pub effective_date: NaiveDate,
    pub rate: Rate,
}

impl RateObservation {
    pub fn new(effective_date: NaiveDate, rate: Rate) -> Self {
        Self {
            effective_date,
            rate,
        }
    }
}

/// Trait for as-of exchange rate lookup
pub trait RateLookup: Send + Sync {
    /// Latest observation with `effective_date <= date`, or `None` when the
    /// date precedes every observation
    fn observation_as_of(&self, date: NaiveDate) -> Option<RateObservation>;

    /// Rate of the latest observation on or before `date`
    fn rate_as_of(&self, date: NaiveDate) -> Option<Rate> {
        self.observation_as_of(date).map(|obs| obs.rate)
    }

    /// Check if a rate is available for the date
    fn has_rate(&self, date: NaiveDate) -> bool {
        self.observation_as_of(date).is_some()
    }
}
