use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A point-in-time price for a symbol, as returned by a quote provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub symbol: String,
    pub price: Decimal,
}
