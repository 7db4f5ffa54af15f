//! # Trade Recap
//!
//! Batch recap of commodity-futures trade history.
//!
//! Trade history exports are enriched with the product type, the notional
//! value in Rupiah, the margin owed under the contract-month spot window and
//! the USD value at the JISDOR reference rate in force on the trade date.
//! The enriched trades are summarized per month and per product/year and
//! written to a single Excel workbook.
//!
//! ## Example
//!
//! ```rust,no_run
//! use trade_recap::prelude::*;
//! use std::path::{Path, PathBuf};
//!
//! # fn main() -> Result<()> {
//! let engine = RecapEngine::from_rate_file(
//!     EngineConfig::default(),
//!     Path::new("Informasi_Kurs_Jisdor.xlsx"),
//! )?;
//! let files = vec![PathBuf::from("trade_history_jan25.xlsx")];
//! let run = engine.run(&files, |_| {})?;
//! WorkbookReport::from_run(&run).write(Path::new("recap.xlsx"))?;
//! # Ok(())
//! # }
//! ```

pub mod aggregate;
pub mod calendar;
pub mod contract;
pub mod data;
pub mod engine;
pub mod enrich;
pub mod error;
pub mod finance;
pub mod report;
pub mod types;

pub mod prelude {
    //! Commonly used types and traits
    pub use crate::aggregate::{RecapSummary, SummaryTable};
    pub use crate::calendar::MonthKey;
    pub use crate::contract::{classify, ContractMonth};
    pub use crate::data::fx::{RateLookup, RateTable};
    pub use crate::data::trades::TradeRecord;
    pub use crate::engine::{EngineConfig, RecapEngine, RecapRun};
    pub use crate::enrich::EnrichedTrade;
    pub use crate::error::{RecapError, Result};
    pub use crate::finance::{MarginModel, SpotWindowMargin};
    pub use crate::report::{write_summary_json, WorkbookReport};
    pub use crate::types::*;
}
