use async_trait::async_trait;

use super::quotes_errors::QuoteError;
use super::quotes_model::Quote;

/// Trait defining the contract for quote lookups as consumed by the rest of
/// the system (trading, UI layer).
#[async_trait]
pub trait QuoteServiceTrait: Send + Sync {
    /// Returns the current quote for `symbol`, normalized and bounded by the
    /// service timeout.
    async fn get_quote(&self, symbol: &str) -> Result<Quote, QuoteError>;
}
