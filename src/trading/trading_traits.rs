use async_trait::async_trait;
use rust_decimal::Decimal;

use super::trading_model::{SaleReceipt, TradeConfirmation};
use super::Result;

/// Trait defining the contract for the buy and sell engines.
///
/// The async methods fetch the current quote themselves; the `_at` variants
/// take a price the caller has already captured.
#[async_trait]
pub trait TradingServiceTrait: Send + Sync {
    async fn buy(&self, account_id: &str, symbol: &str, quantity: i64)
        -> Result<TradeConfirmation>;
    async fn sell(&self, account_id: &str, symbol: &str, quantity: i64) -> Result<SaleReceipt>;
    fn buy_at(
        &self,
        account_id: &str,
        symbol: &str,
        quantity: i64,
        unit_price: Decimal,
    ) -> Result<TradeConfirmation>;
    fn sell_at(
        &self,
        account_id: &str,
        symbol: &str,
        quantity: i64,
        sale_price: Decimal,
    ) -> Result<SaleReceipt>;
}
