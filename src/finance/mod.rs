//! Finance module - margin models and notional value

pub mod margin;
pub mod notional;

pub use margin::{MarginModel, SpotWindowMargin, MARGIN_SIDES};
pub use notional::{contract_size_kg, notional_foreign, notional_local};
