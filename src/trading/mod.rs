pub(crate) mod trading_errors;
pub(crate) mod trading_model;
pub(crate) mod trading_service;
pub(crate) mod trading_traits;

pub use trading_errors::{Result, TradingError};
pub use trading_model::{SaleReceipt, TradeConfirmation};
pub use trading_service::TradingService;
pub use trading_traits::TradingServiceTrait;

#[cfg(test)]
pub(crate) mod tests;
