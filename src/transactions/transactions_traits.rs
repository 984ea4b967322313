use super::transactions_model::TransactionRecord;
use super::Result;

/// Trait defining the contract for reading the transaction log.
pub trait TransactionServiceTrait: Send + Sync {
    fn get_history(&self, account_id: &str) -> Result<Vec<TransactionRecord>>;
    fn get_history_for_symbol(
        &self,
        account_id: &str,
        symbol: &str,
    ) -> Result<Vec<TransactionRecord>>;
}
