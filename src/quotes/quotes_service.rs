use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};

use crate::constants::QUOTE_TIMEOUT_SECS;

use super::quotes_errors::QuoteError;
use super::quotes_model::Quote;
use super::quotes_provider::QuoteProvider;
use super::quotes_traits::QuoteServiceTrait;

/// Normalizes a user-supplied ticker symbol before lookup.
///
/// Symbols are upper-cased; an empty or whitespace-only symbol is invalid.
pub(crate) fn normalize_symbol(symbol: &str) -> Result<String, QuoteError> {
    let normalized = symbol.trim().to_uppercase();
    if normalized.is_empty() {
        return Err(QuoteError::InvalidSymbol(symbol.to_string()));
    }
    Ok(normalized)
}

/// Service wrapping a [`QuoteProvider`] with symbol normalization and a
/// lookup timeout.
pub struct QuoteService {
    provider: Arc<dyn QuoteProvider>,
    timeout: Duration,
}

impl QuoteService {
    pub fn new(provider: Arc<dyn QuoteProvider>) -> Self {
        Self {
            provider,
            timeout: Duration::from_secs(QUOTE_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(provider: Arc<dyn QuoteProvider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }
}

#[async_trait]
impl QuoteServiceTrait for QuoteService {
    async fn get_quote(&self, symbol: &str) -> Result<Quote, QuoteError> {
        let symbol = normalize_symbol(symbol)?;
        debug!("Looking up quote for {}", symbol);

        match tokio::time::timeout(self.timeout, self.provider.latest_quote(&symbol)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    "Quote lookup for {} timed out after {:?}",
                    symbol, self.timeout
                );
                Err(QuoteError::Timeout(symbol))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quotes::providers::ManualProvider;
    use rust_decimal_macros::dec;

    fn service_with_price(symbol: &str, price: rust_decimal::Decimal) -> QuoteService {
        let provider = ManualProvider::new();
        provider.set_price(symbol, price);
        QuoteService::new(Arc::new(provider))
    }

    #[test]
    fn normalizes_to_uppercase() {
        assert_eq!(normalize_symbol(" aapl ").unwrap(), "AAPL");
    }

    #[test]
    fn rejects_empty_symbol() {
        assert!(matches!(
            normalize_symbol("   "),
            Err(QuoteError::InvalidSymbol(_))
        ));
    }

    #[tokio::test]
    async fn lower_case_lookup_hits_upper_case_table() {
        let service = service_with_price("AAPL", dec!(187.40));
        let quote = service.get_quote("aapl").await.unwrap();
        assert_eq!(quote.symbol, "AAPL");
        assert_eq!(quote.price, dec!(187.40));
    }

    #[tokio::test]
    async fn slow_provider_times_out() {
        struct SlowProvider;

        #[async_trait]
        impl QuoteProvider for SlowProvider {
            async fn latest_quote(&self, symbol: &str) -> Result<Quote, QuoteError> {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(Quote {
                    symbol: symbol.to_string(),
                    price: dec!(1),
                })
            }
        }

        let service =
            QuoteService::with_timeout(Arc::new(SlowProvider), Duration::from_millis(10));
        let err = service.get_quote("AAPL").await.unwrap_err();
        assert!(matches!(err, QuoteError::Timeout(_)));
    }
}
