//! Foreign exchange reference rates (JISDOR, IDR per USD)
//!
//! # Components
//!
//! - **base**: `RateObservation` and the `RateLookup` as-of trait
//! - **rate_table**: immutable, forward-filled rate table with as-of lookup
//! - **jisdor**: loader for the JISDOR reference spreadsheet
//!
//! # Example
//!
//! ```rust
//! use trade_recap::data::fx::{RateLookup, RateTable};
//! use chrono::NaiveDate;
//!
//! let d = |day| NaiveDate::from_ymd_opt(2025, 1, day).unwrap();
//! let table = RateTable::build(vec![(d(2), Some(16_000.0)), (d(3), None)]);
//!
//! // The gap on the 3rd inherits the rate from the 2nd
//! assert_eq!(table.rate_as_of(d(3)), Some(16_000.0));
//! // Dates before the first observation have no rate
//! assert_eq!(table.rate_as_of(d(1)), None);
//! ```

pub mod base;
pub mod jisdor;
pub mod rate_table;

pub use base::{RateLookup, RateObservation};
pub use jisdor::{load_jisdor, JisdorFormat};
pub use rate_table::{forward_fill, RateTable};
