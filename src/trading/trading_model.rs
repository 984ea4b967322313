use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::holdings::LotConsumption;

/// Outcome of a committed purchase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeConfirmation {
    pub transaction_id: String,
    pub symbol: String,
    pub quantity: i64,
    pub unit_price: Decimal,
    pub total_cost: Decimal,
    pub cash_after: Decimal,
}

/// Outcome of a committed sale.
///
/// Proceeds are priced at the captured market quote; `realized_gain` is the
/// difference between those proceeds and the cost basis of the consumed
/// lots (negative for a loss). `lots` lists what each consumed lot
/// contributed, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleReceipt {
    pub transaction_id: String,
    pub symbol: String,
    pub quantity: i64,
    pub sale_price: Decimal,
    pub proceeds: Decimal,
    pub cost_basis: Decimal,
    pub realized_gain: Decimal,
    pub cash_after: Decimal,
    pub lots: Vec<LotConsumption>,
}
