use std::sync::Arc;

use crate::db::{get_connection, DbPool};
use crate::holdings::holdings_errors::HoldingsError;
use crate::holdings::holdings_model::{weighted_average_cost, HoldingSummary, Lot};
use crate::holdings::holdings_repository::HoldingsRepository;
use crate::holdings::holdings_traits::HoldingsServiceTrait;
use crate::holdings::Result;

/// Read-side service over the lot inventory
pub struct HoldingsService {
    pool: Arc<DbPool>,
    repository: HoldingsRepository,
}

impl HoldingsService {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self {
            pool,
            repository: HoldingsRepository::new(),
        }
    }
}

impl HoldingsServiceTrait for HoldingsService {
    /// One row per held symbol: total quantity and quantity-weighted average
    /// cost, sorted by symbol.
    fn get_portfolio(&self, account_id: &str) -> Result<Vec<HoldingSummary>> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| HoldingsError::DatabaseError(e.to_string()))?;
        let lots = self.repository.lots_for_account(&mut conn, account_id)?;

        let mut summaries: Vec<HoldingSummary> = Vec::new();
        let mut per_symbol: Vec<Lot> = Vec::new();

        for lot in lots {
            if let Some(prev) = per_symbol.last() {
                if prev.symbol != lot.symbol {
                    summaries.push(summarize(&per_symbol));
                    per_symbol.clear();
                }
            }
            per_symbol.push(lot);
        }
        if !per_symbol.is_empty() {
            summaries.push(summarize(&per_symbol));
        }

        Ok(summaries)
    }

    /// The raw lots for one symbol, oldest first.
    fn get_lots(&self, account_id: &str, symbol: &str) -> Result<Vec<Lot>> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| HoldingsError::DatabaseError(e.to_string()))?;
        self.repository.lots_for_symbol(&mut conn, account_id, symbol)
    }
}

fn summarize(lots: &[Lot]) -> HoldingSummary {
    HoldingSummary {
        symbol: lots[0].symbol.clone(),
        quantity: lots.iter().map(|lot| lot.quantity).sum(),
        average_cost: weighted_average_cost(lots),
    }
}
