use rust_decimal::Decimal;

use super::accounts_model::{Account, NewAccount};
use super::Result;

/// Trait defining the contract for account service operations.
pub trait AccountServiceTrait: Send + Sync {
    fn create_account(&self, new_account: NewAccount) -> Result<Account>;
    fn get_account(&self, account_id: &str) -> Result<Account>;
    fn get_account_by_name(&self, name: &str) -> Result<Account>;
    fn list_accounts(&self) -> Result<Vec<Account>>;
    fn get_cash_balance(&self, account_id: &str) -> Result<Decimal>;
    fn deposit_cash(&self, account_id: &str, amount: Decimal) -> Result<Account>;
}
