use async_trait::async_trait;

use super::quotes_errors::QuoteError;
use super::quotes_model::Quote;

/// A source of current market prices.
///
/// Implementations are expected to be cheap to share behind an `Arc` and to
/// return a price already rounded to cents.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    async fn latest_quote(&self, symbol: &str) -> Result<Quote, QuoteError>;
}
