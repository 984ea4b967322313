use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use rust_decimal::Decimal;

use crate::holdings::holdings_errors::HoldingsError;
use crate::holdings::holdings_model::{Lot, LotDB};
use crate::holdings::Result;
use crate::schema::lots;

/// Repository for purchase lots.
///
/// Methods take the connection to run on so the trading engines can call
/// them inside a single transaction together with cash and transaction-log
/// writes.
#[derive(Debug, Default, Clone)]
pub struct HoldingsRepository;

impl HoldingsRepository {
    pub fn new() -> Self {
        HoldingsRepository
    }

    /// All lots one account holds for one symbol, oldest first.
    pub fn lots_for_symbol(
        &self,
        conn: &mut SqliteConnection,
        account_id: &str,
        symbol: &str,
    ) -> Result<Vec<Lot>> {
        lots::table
            .filter(lots::account_id.eq(account_id))
            .filter(lots::symbol.eq(symbol))
            .order(lots::created_seq.asc())
            .select(LotDB::as_select())
            .load::<LotDB>(conn)
            .map(|rows| rows.into_iter().map(Lot::from).collect())
            .map_err(HoldingsError::from)
    }

    /// All lots one account holds, grouped naturally by symbol then age.
    pub fn lots_for_account(
        &self,
        conn: &mut SqliteConnection,
        account_id: &str,
    ) -> Result<Vec<Lot>> {
        lots::table
            .filter(lots::account_id.eq(account_id))
            .order((lots::symbol.asc(), lots::created_seq.asc()))
            .select(LotDB::as_select())
            .load::<LotDB>(conn)
            .map(|rows| rows.into_iter().map(Lot::from).collect())
            .map_err(HoldingsError::from)
    }

    /// Next value of the per-account creation counter. Safe against races
    /// only when called inside a write transaction.
    pub fn next_created_seq(
        &self,
        conn: &mut SqliteConnection,
        account_id: &str,
    ) -> Result<i64> {
        let max_seq: Option<i64> = lots::table
            .filter(lots::account_id.eq(account_id))
            .select(diesel::dsl::max(lots::created_seq))
            .first(conn)
            .map_err(HoldingsError::from)?;
        Ok(max_seq.unwrap_or(0) + 1)
    }

    pub fn insert(&self, conn: &mut SqliteConnection, lot: &Lot) -> Result<()> {
        diesel::insert_into(lots::table)
            .values(LotDB::from(lot))
            .execute(conn)
            .map_err(HoldingsError::from)?;
        Ok(())
    }

    /// Shrinks a partially consumed lot.
    pub fn update_quantity(
        &self,
        conn: &mut SqliteConnection,
        lot_id: &str,
        quantity: i64,
    ) -> Result<()> {
        let updated = diesel::update(lots::table.find(lot_id))
            .set(lots::quantity.eq(quantity))
            .execute(conn)
            .map_err(HoldingsError::from)?;

        if updated == 0 {
            return Err(HoldingsError::NotFound(lot_id.to_string()));
        }
        Ok(())
    }

    /// Rewrites a lot after a weighted-average merge.
    pub fn update_quantity_and_cost(
        &self,
        conn: &mut SqliteConnection,
        lot_id: &str,
        quantity: i64,
        unit_cost: &Decimal,
    ) -> Result<()> {
        let updated = diesel::update(lots::table.find(lot_id))
            .set((
                lots::quantity.eq(quantity),
                lots::unit_cost.eq(unit_cost.to_string()),
            ))
            .execute(conn)
            .map_err(HoldingsError::from)?;

        if updated == 0 {
            return Err(HoldingsError::NotFound(lot_id.to_string()));
        }
        Ok(())
    }

    /// Removes a fully consumed lot.
    pub fn delete(&self, conn: &mut SqliteConnection, lot_id: &str) -> Result<()> {
        diesel::delete(lots::table.find(lot_id))
            .execute(conn)
            .map_err(HoldingsError::from)?;
        Ok(())
    }
}
