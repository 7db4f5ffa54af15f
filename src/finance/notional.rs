//! Notional value of futures trades

use crate::types::{Cash, Price, Quantity, Rate, CONTRACT_SIZE_KG};

/// Contract size in kilograms for a volume in lots
pub fn contract_size_kg(volume_lots: Option<Quantity>) -> Option<f64> {
    volume_lots.map(|lots| lots * CONTRACT_SIZE_KG)
}

/// Notional value in the trade currency: lots x 25,000 kg x price.
/// Missing when either input is missing.
pub fn notional_local(volume_lots: Option<Quantity>, price: Option<Price>) -> Option<Cash> {
    Some(volume_lots? * CONTRACT_SIZE_KG * price?)
}

/// Notional value in the foreign currency at the matched exchange rate
pub fn notional_foreign(local: Option<Cash>, rate: Option<Rate>) -> Option<Cash> {
    Some(local? / rate?)
}
