//! Margin models for calculating the collateral owed on a trade

use crate::contract::ContractMonth;
use crate::error::{RecapError, Result};
use crate::types::{Cash, Quantity, DEFAULT_RATE_REMOTE, DEFAULT_RATE_SPOT};
use chrono::NaiveDate;

/// Number of sides a margin is charged on (buyer and seller)
pub const MARGIN_SIDES: f64 = 2.0;

/// Margin model trait
pub trait MarginModel: Send + Sync {
    /// Total margin for a trade of `volume_lots` on `contract_code`
    fn calculate(&self, contract_code: &str, trade_date: NaiveDate, volume_lots: Quantity) -> Cash;

    /// Get model name
    fn name(&self) -> &str;
}

/// Contract-month margin: the spot rate applies from the 16th of the month
/// before the contract month through the 15th of the contract month, the
/// remote rate applies otherwise. Both rates are per lot per side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotWindowMargin {
    /// Rate per lot per side inside the spot window
    pub rate_spot: Cash,
    /// Rate per lot per side outside the spot window
    pub rate_remote: Cash,
}

impl SpotWindowMargin {
    /// Create new spot-window margin model
    pub fn new(rate_spot: Cash, rate_remote: Cash) -> Result<Self> {
        for (name, rate) in [("rate_spot", rate_spot), ("rate_remote", rate_remote)] {
            if !(rate.is_finite() && rate > 0.0) {
                return Err(RecapError::ConfigError(format!(
                    "{} must be positive, got {}",
                    name, rate
                )));
            }
        }
        Ok(Self {
            rate_spot,
            rate_remote,
        })
    }

    /// Per-side rate for a trade date. Unparsable contract codes get the
    /// remote rate.
    pub fn applicable_rate(&self, contract_code: &str, trade_date: NaiveDate) -> Cash {
        let in_window = ContractMonth::parse(contract_code)
            .ok()
            .and_then(|cm| cm.in_spot_window(trade_date))
            .unwrap_or(false);

        if in_window {
            self.rate_spot
        } else {
            self.rate_remote
        }
    }
}

impl Default for SpotWindowMargin {
    fn default() -> Self {
        Self {
            rate_spot: DEFAULT_RATE_SPOT,
            rate_remote: DEFAULT_RATE_REMOTE,
        }
    }
}

impl MarginModel for SpotWindowMargin {
    fn calculate(&self, contract_code: &str, trade_date: NaiveDate, volume_lots: Quantity) -> Cash {
        let per_side = volume_lots * self.applicable_rate(contract_code, trade_date);
        per_side * MARGIN_SIDES
    }

    fn name(&self) -> &str {
        "SpotWindow"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_spot_window_margin() {
        let model = SpotWindowMargin::new(5_000_000.0, 3_500_000.0).unwrap();

        // Inside the JAN25 window (2024-12-16 .. 2025-01-15)
        let margin = model.calculate("CPOID-JAN25", date(2024, 12, 20), 10.0);
        assert_eq!(margin, 100_000_000.0);

        let margin = model.calculate("CPOID-JAN25", date(2025, 1, 5), 5.0);
        assert_eq!(margin, 50_000_000.0);
    }

    #[test]
    fn test_remote_rate_outside_window() {
        let model = SpotWindowMargin::default();

        let margin = model.calculate("CPOID-MAR25", date(2025, 1, 5), 4.0);
        assert_eq!(margin, 4.0 * 3_500_000.0 * 2.0);

        // Day after the window closes
        let margin = model.calculate("CPOID-JAN25", date(2025, 1, 16), 1.0);
        assert_eq!(margin, 7_000_000.0);
    }

    #[test]
    fn test_window_boundaries_use_spot_rate() {
        let model = SpotWindowMargin::default();
        assert_eq!(model.applicable_rate("CPOID-JAN25", date(2024, 12, 16)), 5_000_000.0);
        assert_eq!(model.applicable_rate("CPOID-JAN25", date(2025, 1, 15)), 5_000_000.0);
        assert_eq!(model.applicable_rate("CPOID-JAN25", date(2024, 12, 15)), 3_500_000.0);
    }

    #[test]
    fn test_unparsable_code_falls_back_to_remote() {
        let model = SpotWindowMargin::default();
        let margin = model.calculate("BADCODE", date(2025, 1, 5), 3.0);
        assert_eq!(margin, 3.0 * 3_500_000.0 * 2.0);
        assert_eq!(model.name(), "SpotWindow");
    }

    #[test]
    fn test_overflowing_contract_year_falls_back_to_remote() {
        let model = SpotWindowMargin::default();
        let margin = model.calculate("CPOID-JAN2147483647", date(2025, 1, 5), 2.0);
        assert_eq!(margin, 2.0 * 3_500_000.0 * 2.0);
    }

    #[test]
    fn test_rejects_non_positive_rates() {
        assert!(SpotWindowMargin::new(0.0, 3_500_000.0).is_err());
        assert!(SpotWindowMargin::new(5_000_000.0, -1.0).is_err());
    }
}
