use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use rust_decimal::Decimal;

use crate::accounts::accounts_errors::AccountError;
use crate::accounts::accounts_model::{Account, AccountDB};
use crate::accounts::Result;
use crate::schema::accounts;

/// Repository for account rows.
///
/// Every method takes the connection it should run on, so callers can
/// compose several repository calls inside one transaction.
#[derive(Debug, Default, Clone)]
pub struct AccountRepository;

impl AccountRepository {
    pub fn new() -> Self {
        AccountRepository
    }

    pub fn get_by_id(&self, conn: &mut SqliteConnection, account_id: &str) -> Result<Account> {
        accounts::table
            .find(account_id)
            .select(AccountDB::as_select())
            .first::<AccountDB>(conn)
            .map(Account::from)
            .map_err(|e| match e {
                diesel::result::Error::NotFound => AccountError::NotFound(account_id.to_string()),
                other => AccountError::from(other),
            })
    }

    pub fn find_by_name(
        &self,
        conn: &mut SqliteConnection,
        name: &str,
    ) -> Result<Option<Account>> {
        accounts::table
            .filter(accounts::name.eq(name))
            .select(AccountDB::as_select())
            .first::<AccountDB>(conn)
            .optional()
            .map(|opt| opt.map(Account::from))
            .map_err(AccountError::from)
    }

    pub fn list(&self, conn: &mut SqliteConnection) -> Result<Vec<Account>> {
        accounts::table
            .order(accounts::name.asc())
            .select(AccountDB::as_select())
            .load::<AccountDB>(conn)
            .map(|rows| rows.into_iter().map(Account::from).collect())
            .map_err(AccountError::from)
    }

    pub fn insert(&self, conn: &mut SqliteConnection, account_db: AccountDB) -> Result<Account> {
        diesel::insert_into(accounts::table)
            .values(&account_db)
            .get_result::<AccountDB>(conn)
            .map(Account::from)
            .map_err(AccountError::from)
    }

    /// Overwrites the stored cash balance. Callers are responsible for
    /// having computed the new balance inside the same transaction.
    pub fn set_cash_balance(
        &self,
        conn: &mut SqliteConnection,
        account_id: &str,
        balance: &Decimal,
    ) -> Result<()> {
        let updated = diesel::update(accounts::table.find(account_id))
            .set((
                accounts::cash_balance.eq(balance.to_string()),
                accounts::updated_at.eq(chrono::Utc::now().naive_utc()),
            ))
            .execute(conn)
            .map_err(AccountError::from)?;

        if updated == 0 {
            return Err(AccountError::NotFound(account_id.to_string()));
        }
        Ok(())
    }
}
