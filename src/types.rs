//! Core types and constants

/// Price per kilogram, in the trade currency
pub type Price = f64;

/// Quantity/volume type (lots)
pub type Quantity = f64;

/// Money/cash type
pub type Cash = f64;

/// Exchange rate: local currency units per one foreign unit (IDR per USD)
pub type Rate = f64;

/// Kilograms per lot. Applies to every product type.
pub const CONTRACT_SIZE_KG: f64 = 25_000.0;

/// Default margin rate per lot per side inside the spot window (Rp)
pub const DEFAULT_RATE_SPOT: Cash = 5_000_000.0;

/// Default margin rate per lot per side outside the spot window (Rp)
pub const DEFAULT_RATE_REMOTE: Cash = 3_500_000.0;

/// Product type assigned when a contract code cannot be classified
pub const UNKNOWN_PRODUCT: &str = "Unknown";
