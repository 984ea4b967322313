use std::sync::Arc;

use log::debug;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::accounts::accounts_errors::AccountError;
use crate::accounts::accounts_model::{Account, AccountDB, NewAccount};
use crate::accounts::accounts_repository::AccountRepository;
use crate::accounts::accounts_traits::AccountServiceTrait;
use crate::accounts::Result;
use crate::constants::{CURRENCY_SCALE, DEFAULT_OPENING_CASH};
use crate::db::{get_connection, DbPool};

/// Service for managing trading accounts
pub struct AccountService {
    pool: Arc<DbPool>,
    repository: AccountRepository,
}

impl AccountService {
    /// Creates a new AccountService instance
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self {
            pool,
            repository: AccountRepository::new(),
        }
    }
}

impl AccountServiceTrait for AccountService {
    /// Registers a new account, funded with the default opening cash.
    fn create_account(&self, new_account: NewAccount) -> Result<Account> {
        new_account.validate()?;
        debug!("Creating account {}", new_account.name);

        let mut conn = get_connection(&self.pool)
            .map_err(|e| AccountError::DatabaseError(e.to_string()))?;

        conn.immediate_transaction(|tx_conn| {
            if self
                .repository
                .find_by_name(tx_conn, &new_account.name)?
                .is_some()
            {
                return Err(AccountError::AlreadyExists(new_account.name.clone()));
            }

            let mut account_db: AccountDB = new_account.into();
            account_db.id = Uuid::new_v4().to_string();
            account_db.cash_balance = DEFAULT_OPENING_CASH.to_string();

            self.repository.insert(tx_conn, account_db)
        })
    }

    /// Retrieves an account by its ID
    fn get_account(&self, account_id: &str) -> Result<Account> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| AccountError::DatabaseError(e.to_string()))?;
        self.repository.get_by_id(&mut conn, account_id)
    }

    /// Retrieves an account by its unique name
    fn get_account_by_name(&self, name: &str) -> Result<Account> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| AccountError::DatabaseError(e.to_string()))?;
        self.repository
            .find_by_name(&mut conn, name)?
            .ok_or_else(|| AccountError::NotFound(name.to_string()))
    }

    /// Lists all accounts
    fn list_accounts(&self) -> Result<Vec<Account>> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| AccountError::DatabaseError(e.to_string()))?;
        self.repository.list(&mut conn)
    }

    /// Current cash balance for an account
    fn get_cash_balance(&self, account_id: &str) -> Result<Decimal> {
        Ok(self.get_account(account_id)?.cash_balance)
    }

    /// Credits a positive cash amount to the account, atomically.
    fn deposit_cash(&self, account_id: &str, amount: Decimal) -> Result<Account> {
        if amount <= Decimal::ZERO {
            return Err(AccountError::InvalidInput(format!(
                "Deposit amount must be positive, got {}",
                amount
            )));
        }

        let mut conn = get_connection(&self.pool)
            .map_err(|e| AccountError::DatabaseError(e.to_string()))?;

        conn.immediate_transaction(|tx_conn| {
            let account = self.repository.get_by_id(tx_conn, account_id)?;
            let new_balance = (account.cash_balance + amount).round_dp(CURRENCY_SCALE);
            self.repository
                .set_cash_balance(tx_conn, account_id, &new_balance)?;

            debug!(
                "Deposited {} into account {}, balance {} -> {}",
                amount, account_id, account.cash_balance, new_balance
            );
            self.repository.get_by_id(tx_conn, account_id)
        })
    }
}
