use std::collections::HashMap;
use std::sync::RwLock;

use rust_decimal::Decimal;

use crate::constants::CURRENCY_SCALE;
use crate::quotes::quotes_errors::QuoteError;
use crate::quotes::quotes_model::Quote;
use crate::quotes::quotes_provider::QuoteProvider;

/// Quote provider backed by a fixed price table.
///
/// Used for offline demos and tests, where prices must be deterministic.
pub struct ManualProvider {
    prices: RwLock<HashMap<String, Decimal>>,
}

impl ManualProvider {
    pub fn new() -> Self {
        ManualProvider {
            prices: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_prices(prices: HashMap<String, Decimal>) -> Self {
        ManualProvider {
            prices: RwLock::new(prices),
        }
    }

    /// Builds a provider from a JSON object of symbol -> price,
    /// e.g. `{"AAPL": 187.40, "MSFT": 410.00}`.
    pub fn from_json(json: &str) -> Result<Self, QuoteError> {
        let prices: HashMap<String, Decimal> = serde_json::from_str(json)?;
        Ok(Self::with_prices(prices))
    }

    pub fn set_price(&self, symbol: &str, price: Decimal) {
        self.prices
            .write()
            .unwrap()
            .insert(symbol.to_string(), price);
    }
}

impl Default for ManualProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl QuoteProvider for ManualProvider {
    async fn latest_quote(&self, symbol: &str) -> Result<Quote, QuoteError> {
        self.prices
            .read()
            .unwrap()
            .get(symbol)
            .map(|price| Quote {
                symbol: symbol.to_string(),
                price: price.round_dp(CURRENCY_SCALE),
            })
            .ok_or_else(|| QuoteError::NotFound(symbol.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn returns_configured_price() {
        let provider = ManualProvider::new();
        provider.set_price("AAPL", dec!(187.40));

        let quote = provider.latest_quote("AAPL").await.unwrap();
        assert_eq!(quote.price, dec!(187.40));
        assert_eq!(quote.symbol, "AAPL");
    }

    #[tokio::test]
    async fn unknown_symbol_is_not_found() {
        let provider = ManualProvider::new();
        let err = provider.latest_quote("NOPE").await.unwrap_err();
        assert!(matches!(err, QuoteError::NotFound(_)));
    }

    #[tokio::test]
    async fn loads_price_table_from_json() {
        let provider = ManualProvider::from_json(r#"{"AAPL": 187.40, "MSFT": 410.0}"#).unwrap();
        let quote = provider.latest_quote("MSFT").await.unwrap();
        assert_eq!(quote.price, dec!(410.00));
    }
}
