use log::debug;
use num_traits::FromPrimitive;
use rust_decimal::Decimal;
use yahoo_finance_api as yahoo;

use crate::constants::CURRENCY_SCALE;
use crate::quotes::quotes_errors::QuoteError;
use crate::quotes::quotes_model::Quote;
use crate::quotes::quotes_provider::QuoteProvider;

/// Quote provider backed by Yahoo Finance.
pub struct YahooProvider {
    provider: yahoo::YahooConnector,
}

impl YahooProvider {
    pub fn new() -> Result<Self, QuoteError> {
        let provider = yahoo::YahooConnector::new()?;
        Ok(YahooProvider { provider })
    }
}

#[async_trait::async_trait]
impl QuoteProvider for YahooProvider {
    async fn latest_quote(&self, symbol: &str) -> Result<Quote, QuoteError> {
        debug!("Fetching latest Yahoo quote for {}", symbol);
        let response = self.provider.get_latest_quotes(symbol, "1d").await?;
        let yahoo_quote = response.last_quote()?;

        let price = Decimal::from_f64(yahoo_quote.close).ok_or_else(|| {
            QuoteError::ParsingError(format!(
                "Invalid close price {} for {}",
                yahoo_quote.close, symbol
            ))
        })?;

        Ok(Quote {
            symbol: symbol.to_string(),
            price: price.round_dp(CURRENCY_SCALE),
        })
    }
}
