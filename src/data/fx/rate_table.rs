//! In-memory exchange rate table
//!
//! Rates are stored in a `BTreeMap` keyed by effective date, so the as-of
//! lookup is a range query for the largest date `<= d`. Gaps in the raw
//! series are forward-filled once, when the table is built.

use super::base::{RateLookup, RateObservation};
use crate::error::{RecapError, Result};
use crate::types::Rate;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Carry the most recent known rate forward over missing entries.
///
/// Input must already be sorted by date. Entries before the first known rate
/// have nothing to inherit and are dropped; non-positive rates count as
/// missing. Duplicate dates are kept in input order.
pub fn forward_fill(raw: &[(NaiveDate, Option<Rate>)]) -> Vec<RateObservation> {
    let mut last_known: Option<Rate> = None;

    raw.iter()
        .filter_map(|&(date, rate)| {
            if let Some(r) = rate.filter(|r| r.is_finite() && *r > 0.0) {
                last_known = Some(r);
            }
            last_known.map(|r| RateObservation::new(date, r))
        })
        .collect()
}

/// Immutable, date-ordered exchange rate table
#[derive(Debug, Clone, Default)]
pub struct RateTable {
    /// effective date -> rate, unique per date
    rates: BTreeMap<NaiveDate, Rate>,
}

impl RateTable {
    /// Build from raw (date, rate) rows in any order.
    ///
    /// Rows are sorted by date (stable), forward-filled, and collapsed to one
    /// observation per date with the last row for a date winning.
    pub fn build(mut raw: Vec<(NaiveDate, Option<Rate>)>) -> Self {
        raw.sort_by_key(|(date, _)| *date);

        let rates: BTreeMap<NaiveDate, Rate> = forward_fill(&raw)
            .into_iter()
            .map(|obs| (obs.effective_date, obs.rate))
            .collect();

        Self { rates }
    }

    /// Build from already-known observations
    pub fn from_observations(observations: Vec<RateObservation>) -> Result<Self> {
        if let Some(bad) = observations
            .iter()
            .find(|obs| !(obs.rate.is_finite() && obs.rate > 0.0))
        {
            return Err(RecapError::DataError(format!(
                "Exchange rate must be positive, got {} on {}",
                bad.rate, bad.effective_date
            )));
        }

        Ok(Self::build(
            observations
                .into_iter()
                .map(|obs| (obs.effective_date, Some(obs.rate)))
                .collect(),
        ))
    }

    /// Number of observations
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// First and last effective dates
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.rates.keys().next()?;
        let last = self.rates.keys().next_back()?;
        Some((*first, *last))
    }

    /// Observations in ascending date order
    pub fn observations(&self) -> impl Iterator<Item = RateObservation> + '_ {
        self.rates
            .iter()
            .map(|(date, rate)| RateObservation::new(*date, *rate))
    }
}

impl RateLookup for RateTable {
    fn observation_as_of(&self, date: NaiveDate) -> Option<RateObservation> {
        self.rates
            .range(..=date)
            .next_back()
            .map(|(d, r)| RateObservation::new(*d, *r))
    }
}
