use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::transactions::transactions_errors::TransactionError;
use crate::utils::parse_stored_decimal;

/// Purchase of shares. Decreases cash and increases lot inventory.
pub const TRANSACTION_SIDE_BUY: &str = "BUY";

/// Disposal of shares. Increases cash and decreases lot inventory.
pub const TRANSACTION_SIDE_SELL: &str = "SELL";

/// Which way a trade moved shares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionSide {
    Buy,
    Sell,
}

impl TransactionSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionSide::Buy => TRANSACTION_SIDE_BUY,
            TransactionSide::Sell => TRANSACTION_SIDE_SELL,
        }
    }
}

impl FromStr for TransactionSide {
    type Err = TransactionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            TRANSACTION_SIDE_BUY => Ok(TransactionSide::Buy),
            TRANSACTION_SIDE_SELL => Ok(TransactionSide::Sell),
            other => Err(TransactionError::InvalidData(format!(
                "Unknown transaction side: {}",
                other
            ))),
        }
    }
}

/// One committed trade, as kept in the append-only audit log.
///
/// Records are written exactly once per committed buy or sell and are never
/// updated or deleted afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub id: String,
    pub account_id: String,
    pub symbol: String,
    pub side: TransactionSide,
    pub quantity: i64,
    pub unit_price: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Input model for appending a trade to the log
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub account_id: String,
    pub symbol: String,
    pub side: TransactionSide,
    pub quantity: i64,
    pub unit_price: Decimal,
}

/// Database model for transactions
#[derive(
    Queryable, Identifiable, Insertable, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TransactionDB {
    pub id: String,
    pub account_id: String,
    pub symbol: String,
    pub side: String,
    pub quantity: i64,
    pub unit_price: String,
    pub created_at: NaiveDateTime,
}

impl From<TransactionDB> for TransactionRecord {
    fn from(db: TransactionDB) -> Self {
        Self {
            id: db.id.clone(),
            account_id: db.account_id,
            symbol: db.symbol,
            side: TransactionSide::from_str(&db.side).unwrap_or_else(|e| {
                log::error!("Corrupt transaction side in record {}: {}", db.id, e);
                TransactionSide::Buy
            }),
            quantity: db.quantity,
            unit_price: parse_stored_decimal(&db.unit_price, "unit_price"),
            created_at: Utc.from_utc_datetime(&db.created_at),
        }
    }
}

impl From<NewTransaction> for TransactionDB {
    fn from(new_transaction: NewTransaction) -> Self {
        Self {
            id: String::new(),
            account_id: new_transaction.account_id,
            symbol: new_transaction.symbol,
            side: new_transaction.side.as_str().to_string(),
            quantity: new_transaction.quantity,
            unit_price: new_transaction.unit_price.to_string(),
            created_at: Utc::now().naive_utc(),
        }
    }
}
