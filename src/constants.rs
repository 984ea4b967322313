use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Cash every newly registered account starts with.
pub const DEFAULT_OPENING_CASH: Decimal = dec!(10000.00);

/// Decimal precision for cash amounts and quote prices.
pub const CURRENCY_SCALE: u32 = 2;

/// The only currency the ledger trades in.
pub const LEDGER_CURRENCY: &str = "USD";

/// Upper bound on quote provider calls before they surface as unavailable.
pub const QUOTE_TIMEOUT_SECS: u64 = 10;

/// How many times a write transaction is retried after a busy/locked error.
pub const MAX_WRITE_RETRIES: u32 = 3;
