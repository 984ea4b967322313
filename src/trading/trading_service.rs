use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, warn};
use rust_decimal::Decimal;

use crate::accounts::AccountRepository;
use crate::constants::{CURRENCY_SCALE, MAX_WRITE_RETRIES};
use crate::db::{get_connection, DbPool};
use crate::holdings::{plan_fifo_consumption, HoldingsRepository, Lot};
use crate::quotes::quotes_service::normalize_symbol;
use crate::quotes::QuoteServiceTrait;
use crate::trading::trading_errors::TradingError;
use crate::trading::trading_model::{SaleReceipt, TradeConfirmation};
use crate::trading::trading_traits::TradingServiceTrait;
use crate::trading::Result;
use crate::transactions::{NewTransaction, TransactionRepository, TransactionSide};

/// The buy and sell engines.
///
/// Each operation captures its price up front, then applies the full ledger
/// mutation (cash, lots, transaction log) inside one immediate transaction:
/// either everything commits or nothing does. Busy/locked storage errors
/// retry the whole read-compute-write cycle, never a part of it.
pub struct TradingService {
    pool: Arc<DbPool>,
    quote_service: Arc<dyn QuoteServiceTrait>,
    accounts: AccountRepository,
    holdings: HoldingsRepository,
    transactions: TransactionRepository,
}

impl TradingService {
    pub fn new(pool: Arc<DbPool>, quote_service: Arc<dyn QuoteServiceTrait>) -> Self {
        Self {
            pool,
            quote_service,
            accounts: AccountRepository::new(),
            holdings: HoldingsRepository::new(),
            transactions: TransactionRepository::new(),
        }
    }

    fn with_write_retries<T>(&self, mut operation: impl FnMut() -> Result<T>) -> Result<T> {
        let mut attempt = 0;
        loop {
            match operation() {
                Err(TradingError::StorageConflict(message)) if attempt < MAX_WRITE_RETRIES => {
                    attempt += 1;
                    warn!(
                        "Write transaction hit a lock ({}), retrying {}/{}",
                        message, attempt, MAX_WRITE_RETRIES
                    );
                }
                other => return other,
            }
        }
    }

    fn execute_buy(
        &self,
        account_id: &str,
        symbol: &str,
        quantity: i64,
        unit_price: Decimal,
    ) -> Result<TradeConfirmation> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| TradingError::StorageFailure(e.to_string()))?;

        conn.immediate_transaction::<_, TradingError, _>(|tx_conn| {
            let account = self.accounts.get_by_id(tx_conn, account_id)?;

            let total_cost = (unit_price * Decimal::from(quantity)).round_dp(CURRENCY_SCALE);
            if account.cash_balance < total_cost {
                return Err(TradingError::InsufficientFunds {
                    required: total_cost,
                    available: account.cash_balance,
                });
            }

            let cash_after = account.cash_balance - total_cost;
            self.accounts
                .set_cash_balance(tx_conn, account_id, &cash_after)?;

            let lots = self.holdings.lots_for_symbol(tx_conn, account_id, symbol)?;
            match lots.into_iter().next() {
                Some(mut lot) => {
                    lot.merge_purchase(quantity, unit_price);
                    self.holdings.update_quantity_and_cost(
                        tx_conn,
                        &lot.id,
                        lot.quantity,
                        &lot.unit_cost,
                    )?;
                }
                None => {
                    let created_seq = self.holdings.next_created_seq(tx_conn, account_id)?;
                    let lot = Lot::new(account_id, symbol, quantity, unit_price, created_seq);
                    self.holdings.insert(tx_conn, &lot)?;
                }
            }

            let record = self.transactions.append(
                tx_conn,
                NewTransaction {
                    account_id: account_id.to_string(),
                    symbol: symbol.to_string(),
                    side: TransactionSide::Buy,
                    quantity,
                    unit_price,
                },
            )?;

            debug!(
                "Bought {} {} @ {} for account {}, cash {} -> {}",
                quantity, symbol, unit_price, account_id, account.cash_balance, cash_after
            );

            Ok(TradeConfirmation {
                transaction_id: record.id,
                symbol: symbol.to_string(),
                quantity,
                unit_price,
                total_cost,
                cash_after,
            })
        })
    }

    fn execute_sell(
        &self,
        account_id: &str,
        symbol: &str,
        quantity: i64,
        sale_price: Decimal,
    ) -> Result<SaleReceipt> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| TradingError::StorageFailure(e.to_string()))?;

        conn.immediate_transaction::<_, TradingError, _>(|tx_conn| {
            let account = self.accounts.get_by_id(tx_conn, account_id)?;

            let lots = self.holdings.lots_for_symbol(tx_conn, account_id, symbol)?;
            if lots.is_empty() {
                return Err(TradingError::SymbolNotHeld(symbol.to_string()));
            }

            let available: i64 = lots.iter().map(|lot| lot.quantity).sum();
            if available < quantity {
                return Err(TradingError::InsufficientHoldings {
                    symbol: symbol.to_string(),
                    requested: quantity,
                    available,
                });
            }

            let plan = plan_fifo_consumption(&lots, quantity);
            for lot_id in &plan.delete_lot_ids {
                self.holdings.delete(tx_conn, lot_id)?;
            }
            if let Some((ref lot_id, remaining)) = plan.remainder {
                self.holdings.update_quantity(tx_conn, lot_id, remaining)?;
            }

            let proceeds = (sale_price * Decimal::from(quantity)).round_dp(CURRENCY_SCALE);
            let cost_basis = plan
                .consumptions
                .iter()
                .map(|c| c.unit_cost * Decimal::from(c.quantity))
                .sum::<Decimal>()
                .round_dp(CURRENCY_SCALE);
            let realized_gain = proceeds - cost_basis;

            let cash_after = account.cash_balance + proceeds;
            self.accounts
                .set_cash_balance(tx_conn, account_id, &cash_after)?;

            let record = self.transactions.append(
                tx_conn,
                NewTransaction {
                    account_id: account_id.to_string(),
                    symbol: symbol.to_string(),
                    side: TransactionSide::Sell,
                    quantity,
                    unit_price: sale_price,
                },
            )?;

            debug!(
                "Sold {} {} @ {} for account {}, realized {}, cash {} -> {}",
                quantity, symbol, sale_price, account_id, realized_gain,
                account.cash_balance, cash_after
            );

            Ok(SaleReceipt {
                transaction_id: record.id,
                symbol: symbol.to_string(),
                quantity,
                sale_price,
                proceeds,
                cost_basis,
                realized_gain,
                cash_after,
                lots: plan.consumptions,
            })
        })
    }
}

#[async_trait]
impl TradingServiceTrait for TradingService {
    /// Buys shares at the current market quote.
    async fn buy(&self, account_id: &str, symbol: &str, quantity: i64) -> Result<TradeConfirmation> {
        if quantity <= 0 {
            return Err(TradingError::InvalidQuantity(quantity));
        }

        // Quote is captured before the write transaction begins and the
        // price is passed in; it is never re-fetched mid-transaction.
        let quote = self
            .quote_service
            .get_quote(symbol)
            .await
            .map_err(|source| TradingError::QuoteUnavailable {
                symbol: symbol.to_string(),
                source,
            })?;

        self.buy_at(account_id, &quote.symbol, quantity, quote.price)
    }

    /// Sells shares at the current market quote.
    async fn sell(&self, account_id: &str, symbol: &str, quantity: i64) -> Result<SaleReceipt> {
        if quantity <= 0 {
            return Err(TradingError::InvalidQuantity(quantity));
        }

        let quote = self
            .quote_service
            .get_quote(symbol)
            .await
            .map_err(|source| TradingError::QuoteUnavailable {
                symbol: symbol.to_string(),
                source,
            })?;

        self.sell_at(account_id, &quote.symbol, quantity, quote.price)
    }

    /// Buys shares at a price captured by the caller.
    fn buy_at(
        &self,
        account_id: &str,
        symbol: &str,
        quantity: i64,
        unit_price: Decimal,
    ) -> Result<TradeConfirmation> {
        if quantity <= 0 {
            return Err(TradingError::InvalidQuantity(quantity));
        }
        if unit_price <= Decimal::ZERO {
            return Err(TradingError::InvalidPrice(unit_price));
        }
        let symbol = normalize_symbol(symbol).map_err(|source| TradingError::QuoteUnavailable {
            symbol: symbol.to_string(),
            source,
        })?;

        self.with_write_retries(|| self.execute_buy(account_id, &symbol, quantity, unit_price))
    }

    /// Sells shares at a price captured by the caller.
    fn sell_at(
        &self,
        account_id: &str,
        symbol: &str,
        quantity: i64,
        sale_price: Decimal,
    ) -> Result<SaleReceipt> {
        if quantity <= 0 {
            return Err(TradingError::InvalidQuantity(quantity));
        }
        if sale_price <= Decimal::ZERO {
            return Err(TradingError::InvalidPrice(sale_price));
        }
        let symbol = normalize_symbol(symbol).map_err(|source| TradingError::QuoteUnavailable {
            symbol: symbol.to_string(),
            source,
        })?;

        self.with_write_retries(|| self.execute_sell(account_id, &symbol, quantity, sale_price))
    }
}
