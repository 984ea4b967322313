use thiserror::Error;
use yahoo_finance_api::YahooError;

pub type Result<T> = std::result::Result<T, QuoteError>;

#[derive(Error, Debug)]
pub enum QuoteError {
    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("No quote found for {0}")]
    NotFound(String),

    #[error("Quote lookup for {0} timed out")]
    Timeout(String),

    #[error("Invalid symbol: {0:?}")]
    InvalidSymbol(String),

    #[error("Parsing error: {0}")]
    ParsingError(String),
}

impl From<YahooError> for QuoteError {
    fn from(error: YahooError) -> Self {
        match error {
            YahooError::FetchFailed(e) => QuoteError::ProviderError(e),
            YahooError::NoQuotes => QuoteError::NotFound("No quotes found".to_string()),
            YahooError::NoResult => QuoteError::NotFound("No data found".to_string()),
            _ => QuoteError::ProviderError(error.to_string()),
        }
    }
}

impl From<serde_json::Error> for QuoteError {
    fn from(error: serde_json::Error) -> Self {
        QuoteError::ParsingError(error.to_string())
    }
}
