use diesel::result::Error as DieselError;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::accounts::AccountError;
use crate::holdings::HoldingsError;
use crate::quotes::QuoteError;
use crate::transactions::TransactionError;

pub type Result<T> = std::result::Result<T, TradingError>;

/// Custom error type for buy/sell operations
#[derive(Debug, Error)]
pub enum TradingError {
    #[error("Quantity must be a positive number of shares, got {0}")]
    InvalidQuantity(i64),

    #[error("Price must be positive, got {0}")]
    InvalidPrice(Decimal),

    #[error("Insufficient funds: {required} needed, {available} available")]
    InsufficientFunds {
        required: Decimal,
        available: Decimal,
    },

    #[error("Insufficient holdings: {requested} shares of {symbol} requested, {available} held")]
    InsufficientHoldings {
        symbol: String,
        requested: i64,
        available: i64,
    },

    #[error("No shares of {0} held")]
    SymbolNotHeld(String),

    #[error("Quote unavailable for {symbol}: {source}")]
    QuoteUnavailable {
        symbol: String,
        #[source]
        source: QuoteError,
    },

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Storage conflict, safe to retry: {0}")]
    StorageConflict(String),

    #[error("Storage failure: {0}")]
    StorageFailure(String),
}

/// Splits storage errors into the retryable lock/busy class and the
/// unrecoverable rest.
fn classify_storage_message(message: String) -> TradingError {
    if message.contains("locked") || message.contains("busy") {
        TradingError::StorageConflict(message)
    } else {
        TradingError::StorageFailure(message)
    }
}

impl From<DieselError> for TradingError {
    fn from(err: DieselError) -> Self {
        match &err {
            DieselError::DatabaseError(_, info) => {
                classify_storage_message(info.message().to_string())
            }
            _ => TradingError::StorageFailure(err.to_string()),
        }
    }
}

impl From<AccountError> for TradingError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::NotFound(id) => TradingError::AccountNotFound(id),
            AccountError::DatabaseError(message) => classify_storage_message(message),
            other => TradingError::StorageFailure(other.to_string()),
        }
    }
}

impl From<HoldingsError> for TradingError {
    fn from(err: HoldingsError) -> Self {
        match err {
            HoldingsError::DatabaseError(message) => classify_storage_message(message),
            other => TradingError::StorageFailure(other.to_string()),
        }
    }
}

impl From<TransactionError> for TradingError {
    fn from(err: TransactionError) -> Self {
        match err {
            TransactionError::DatabaseError(message) => classify_storage_message(message),
            other => TradingError::StorageFailure(other.to_string()),
        }
    }
}
