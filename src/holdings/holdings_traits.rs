use super::holdings_model::{HoldingSummary, Lot};
use super::Result;

/// Trait defining the contract for the portfolio read side.
pub trait HoldingsServiceTrait: Send + Sync {
    fn get_portfolio(&self, account_id: &str) -> Result<Vec<HoldingSummary>>;
    fn get_lots(&self, account_id: &str, symbol: &str) -> Result<Vec<Lot>>;
}
