use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use uuid::Uuid;

use crate::schema::transactions;
use crate::transactions::transactions_errors::TransactionError;
use crate::transactions::transactions_model::{
    NewTransaction, TransactionDB, TransactionRecord,
};
use crate::transactions::Result;

/// Repository for the append-only transaction log.
///
/// There is deliberately no update or delete here; the log is the audit
/// trail and only ever grows.
#[derive(Debug, Default, Clone)]
pub struct TransactionRepository;

impl TransactionRepository {
    pub fn new() -> Self {
        TransactionRepository
    }

    /// Appends one committed trade to the log.
    pub fn append(
        &self,
        conn: &mut SqliteConnection,
        new_transaction: NewTransaction,
    ) -> Result<TransactionRecord> {
        let mut transaction_db: TransactionDB = new_transaction.into();
        transaction_db.id = Uuid::new_v4().to_string();

        diesel::insert_into(transactions::table)
            .values(&transaction_db)
            .get_result::<TransactionDB>(conn)
            .map(TransactionRecord::from)
            .map_err(TransactionError::from)
    }

    /// Full history for an account, oldest first.
    pub fn history_for_account(
        &self,
        conn: &mut SqliteConnection,
        account_id: &str,
    ) -> Result<Vec<TransactionRecord>> {
        transactions::table
            .filter(transactions::account_id.eq(account_id))
            .order((transactions::created_at.asc(), transactions::id.asc()))
            .select(TransactionDB::as_select())
            .load::<TransactionDB>(conn)
            .map(|rows| rows.into_iter().map(TransactionRecord::from).collect())
            .map_err(TransactionError::from)
    }

    /// History for one symbol in an account, oldest first.
    pub fn history_for_symbol(
        &self,
        conn: &mut SqliteConnection,
        account_id: &str,
        symbol: &str,
    ) -> Result<Vec<TransactionRecord>> {
        transactions::table
            .filter(transactions::account_id.eq(account_id))
            .filter(transactions::symbol.eq(symbol))
            .order((transactions::created_at.asc(), transactions::id.asc()))
            .select(TransactionDB::as_select())
            .load::<TransactionDB>(conn)
            .map(|rows| rows.into_iter().map(TransactionRecord::from).collect())
            .map_err(TransactionError::from)
    }
}
