//! Input data: tabular files, JISDOR exchange rates and trade history

pub mod fx;
pub mod table;
pub mod trades;

pub use fx::{load_jisdor, JisdorFormat, RateLookup, RateObservation, RateTable};
pub use table::{read_table, Cell};
pub use trades::{read_trade_file, TradeRecord};
