use std::sync::Arc;

use crate::db::{get_connection, DbPool};
use crate::transactions::transactions_errors::TransactionError;
use crate::transactions::transactions_model::TransactionRecord;
use crate::transactions::transactions_repository::TransactionRepository;
use crate::transactions::transactions_traits::TransactionServiceTrait;
use crate::transactions::Result;

/// Read-side service over the transaction log
pub struct TransactionService {
    pool: Arc<DbPool>,
    repository: TransactionRepository,
}

impl TransactionService {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self {
            pool,
            repository: TransactionRepository::new(),
        }
    }
}

impl TransactionServiceTrait for TransactionService {
    fn get_history(&self, account_id: &str) -> Result<Vec<TransactionRecord>> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| TransactionError::DatabaseError(e.to_string()))?;
        self.repository.history_for_account(&mut conn, account_id)
    }

    fn get_history_for_symbol(
        &self,
        account_id: &str,
        symbol: &str,
    ) -> Result<Vec<TransactionRecord>> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| TransactionError::DatabaseError(e.to_string()))?;
        self.repository
            .history_for_symbol(&mut conn, account_id, symbol)
    }
}
