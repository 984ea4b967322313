use chrono::NaiveDateTime;
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::accounts::accounts_errors::AccountError;
use crate::accounts::Result;
use crate::constants::LEDGER_CURRENCY;
use crate::utils::parse_stored_decimal;

/// Domain model representing a trading account in the system
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub name: String,
    pub currency: String,
    pub cash_balance: Decimal,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input model for registering a new account
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
}

impl NewAccount {
    /// Validates the new account data
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(AccountError::InvalidInput(
                "Account name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Database model for accounts
#[derive(
    Queryable,
    Identifiable,
    Insertable,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::accounts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AccountDB {
    pub id: String,
    pub name: String,
    pub currency: String,
    pub cash_balance: String,
    #[diesel(skip_insertion)]
    pub created_at: NaiveDateTime,
    #[diesel(skip_insertion)]
    pub updated_at: NaiveDateTime,
}

// Conversion implementations
impl From<AccountDB> for Account {
    fn from(db: AccountDB) -> Self {
        Self {
            id: db.id,
            name: db.name,
            currency: db.currency,
            cash_balance: parse_stored_decimal(&db.cash_balance, "cash_balance"),
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<NewAccount> for AccountDB {
    fn from(new_account: NewAccount) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: new_account.id.unwrap_or_default(),
            name: new_account.name,
            currency: LEDGER_CURRENCY.to_string(),
            cash_balance: Decimal::ZERO.to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}
