// Engine tests for the buy and sell paths, run against a real migrated
// sqlite database.

use std::sync::{Arc, Barrier};

use rust_decimal_macros::dec;

use crate::accounts::{Account, AccountService, AccountServiceTrait, NewAccount};
use crate::db::{get_connection, DbPool};
use crate::holdings::{HoldingsRepository, HoldingsService, HoldingsServiceTrait, Lot};
use crate::quotes::providers::ManualProvider;
use crate::quotes::QuoteService;
use crate::trading::{TradingError, TradingService, TradingServiceTrait};
use crate::transactions::{TransactionService, TransactionServiceTrait, TransactionSide};

use super::setup_test_db;

fn trading_service(pool: &Arc<DbPool>) -> TradingService {
    let provider = Arc::new(ManualProvider::new());
    let quote_service = Arc::new(QuoteService::new(provider));
    TradingService::new(pool.clone(), quote_service)
}

fn register_account(pool: &Arc<DbPool>, name: &str) -> Account {
    AccountService::new(pool.clone())
        .create_account(NewAccount {
            id: None,
            name: name.to_string(),
        })
        .unwrap()
}

#[test]
fn buy_debits_cash_and_appends_buy_record() {
    let (_dir, pool) = setup_test_db();
    let account = register_account(&pool, "alice");
    let trading = trading_service(&pool);

    let confirmation = trading.buy_at(&account.id, "AAPL", 10, dec!(50)).unwrap();

    assert_eq!(confirmation.total_cost, dec!(500.00));
    assert_eq!(confirmation.cash_after, dec!(9500.00));

    let accounts = AccountService::new(pool.clone());
    assert_eq!(accounts.get_cash_balance(&account.id).unwrap(), dec!(9500));

    let history = TransactionService::new(pool.clone())
        .get_history(&account.id)
        .unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].side, TransactionSide::Buy);
    assert_eq!(history[0].quantity, 10);
    assert_eq!(history[0].unit_price, dec!(50));
    assert_eq!(history[0].symbol, "AAPL");
}

#[test]
fn successive_buys_merge_into_weighted_average_lot() {
    let (_dir, pool) = setup_test_db();
    let account = register_account(&pool, "alice");
    let trading = trading_service(&pool);

    trading.buy_at(&account.id, "AAPL", 10, dec!(100)).unwrap();
    trading.buy_at(&account.id, "AAPL", 10, dec!(120)).unwrap();

    let holdings = HoldingsService::new(pool.clone());
    let lots = holdings.get_lots(&account.id, "AAPL").unwrap();
    assert_eq!(lots.len(), 1);
    assert_eq!(lots[0].quantity, 20);
    assert_eq!(lots[0].unit_cost, dec!(110));

    let portfolio = holdings.get_portfolio(&account.id).unwrap();
    assert_eq!(portfolio.len(), 1);
    assert_eq!(portfolio[0].quantity, 20);
    assert_eq!(portfolio[0].average_cost, dec!(110));
}

#[test]
fn sell_reduces_lots_and_credits_cash() {
    let (_dir, pool) = setup_test_db();
    let account = register_account(&pool, "alice");
    let trading = trading_service(&pool);

    trading.buy_at(&account.id, "AAPL", 10, dec!(50)).unwrap();
    let receipt = trading.sell_at(&account.id, "AAPL", 4, dec!(60)).unwrap();

    assert_eq!(receipt.proceeds, dec!(240.00));
    assert_eq!(receipt.cash_after, dec!(9740.00));

    let lots = HoldingsService::new(pool.clone())
        .get_lots(&account.id, "AAPL")
        .unwrap();
    assert_eq!(lots.len(), 1);
    assert_eq!(lots[0].quantity, 6);
}

#[test]
fn sell_consumes_lots_fifo_and_reports_per_lot_gain() {
    let (_dir, pool) = setup_test_db();
    let account = register_account(&pool, "alice");
    let trading = trading_service(&pool);

    // Seed two distinct lots directly, oldest first.
    let repository = HoldingsRepository::new();
    let mut conn = get_connection(&pool).unwrap();
    repository
        .insert(&mut conn, &Lot::new(&account.id, "AAPL", 3, dec!(10), 1))
        .unwrap();
    repository
        .insert(&mut conn, &Lot::new(&account.id, "AAPL", 5, dec!(12), 2))
        .unwrap();
    drop(conn);

    let receipt = trading.sell_at(&account.id, "AAPL", 4, dec!(20)).unwrap();

    // 3 shares at cost 10 and 1 share at cost 12.
    assert_eq!(receipt.cost_basis, dec!(42.00));
    assert_eq!(receipt.proceeds, dec!(80.00));
    assert_eq!(receipt.realized_gain, dec!(38.00));
    assert_eq!(receipt.lots.len(), 2);
    assert_eq!(receipt.lots[0].quantity, 3);
    assert_eq!(receipt.lots[0].unit_cost, dec!(10));
    assert_eq!(receipt.lots[1].quantity, 1);
    assert_eq!(receipt.lots[1].unit_cost, dec!(12));

    let lots = HoldingsService::new(pool.clone())
        .get_lots(&account.id, "AAPL")
        .unwrap();
    assert_eq!(lots.len(), 1);
    assert_eq!(lots[0].quantity, 4);
    assert_eq!(lots[0].unit_cost, dec!(12));
}

#[test]
fn failed_sell_leaves_cash_lots_and_history_unchanged() {
    let (_dir, pool) = setup_test_db();
    let account = register_account(&pool, "alice");
    let trading = trading_service(&pool);

    trading.buy_at(&account.id, "AAPL", 5, dec!(50)).unwrap();

    let holdings = HoldingsService::new(pool.clone());
    let accounts = AccountService::new(pool.clone());
    let transactions = TransactionService::new(pool.clone());

    let cash_before = accounts.get_cash_balance(&account.id).unwrap();
    let lots_before = holdings.get_lots(&account.id, "AAPL").unwrap();
    let history_before = transactions.get_history(&account.id).unwrap();

    let err = trading
        .sell_at(&account.id, "AAPL", 6, dec!(60))
        .unwrap_err();
    assert!(matches!(
        err,
        TradingError::InsufficientHoldings {
            requested: 6,
            available: 5,
            ..
        }
    ));

    assert_eq!(accounts.get_cash_balance(&account.id).unwrap(), cash_before);
    assert_eq!(holdings.get_lots(&account.id, "AAPL").unwrap(), lots_before);
    assert_eq!(
        transactions.get_history(&account.id).unwrap(),
        history_before
    );
}

#[test]
fn insufficient_funds_rejected_without_mutation() {
    let (_dir, pool) = setup_test_db();
    let account = register_account(&pool, "alice");
    let trading = trading_service(&pool);

    let err = trading
        .buy_at(&account.id, "AAPL", 1000, dec!(50))
        .unwrap_err();
    assert!(matches!(err, TradingError::InsufficientFunds { .. }));

    let accounts = AccountService::new(pool.clone());
    assert_eq!(accounts.get_cash_balance(&account.id).unwrap(), dec!(10000));
    assert!(HoldingsService::new(pool.clone())
        .get_lots(&account.id, "AAPL")
        .unwrap()
        .is_empty());
    assert!(TransactionService::new(pool.clone())
        .get_history(&account.id)
        .unwrap()
        .is_empty());
}

#[test]
fn non_positive_quantities_are_rejected() {
    let (_dir, pool) = setup_test_db();
    let account = register_account(&pool, "alice");
    let trading = trading_service(&pool);

    assert!(matches!(
        trading.buy_at(&account.id, "AAPL", 0, dec!(50)),
        Err(TradingError::InvalidQuantity(0))
    ));
    assert!(matches!(
        trading.sell_at(&account.id, "AAPL", -3, dec!(50)),
        Err(TradingError::InvalidQuantity(-3))
    ));
}

#[test]
fn selling_a_symbol_never_held_fails() {
    let (_dir, pool) = setup_test_db();
    let account = register_account(&pool, "alice");
    let trading = trading_service(&pool);

    let err = trading
        .sell_at(&account.id, "MSFT", 1, dec!(10))
        .unwrap_err();
    assert!(matches!(err, TradingError::SymbolNotHeld(s) if s == "MSFT"));
}

#[test]
fn buy_then_sell_round_trip() {
    let (_dir, pool) = setup_test_db();
    let account = register_account(&pool, "alice");
    let trading = trading_service(&pool);

    trading.buy_at(&account.id, "AAPL", 10, dec!(50)).unwrap();
    trading.sell_at(&account.id, "AAPL", 10, dec!(60)).unwrap();

    // 10000 - 500 + 600
    let accounts = AccountService::new(pool.clone());
    assert_eq!(accounts.get_cash_balance(&account.id).unwrap(), dec!(10100));

    assert!(HoldingsService::new(pool.clone())
        .get_lots(&account.id, "AAPL")
        .unwrap()
        .is_empty());

    let history = TransactionService::new(pool.clone())
        .get_history(&account.id)
        .unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].side, TransactionSide::Buy);
    assert_eq!(history[1].side, TransactionSide::Sell);
}

#[test]
fn concurrent_sells_of_the_same_shares_never_both_succeed() {
    let (_dir, pool) = setup_test_db();
    let account = register_account(&pool, "alice");
    let trading = Arc::new(trading_service(&pool));

    trading.buy_at(&account.id, "AAPL", 5, dec!(10)).unwrap();

    let barrier = Arc::new(Barrier::new(2));
    let mut handles = Vec::new();
    for _ in 0..2 {
        let trading = trading.clone();
        let barrier = barrier.clone();
        let account_id = account.id.clone();
        handles.push(std::thread::spawn(move || {
            barrier.wait();
            trading.sell_at(&account_id, "AAPL", 5, dec!(10))
        }));
    }

    let results: Vec<_> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();

    let successes = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1);
    // The loser sees either too few shares or, after full depletion, none.
    assert!(results.iter().any(|r| matches!(
        r,
        Err(TradingError::InsufficientHoldings { .. }) | Err(TradingError::SymbolNotHeld(_))
    )));

    // The five shares were sold exactly once.
    let accounts = AccountService::new(pool.clone());
    assert_eq!(accounts.get_cash_balance(&account.id).unwrap(), dec!(10000));
    assert!(HoldingsService::new(pool.clone())
        .get_lots(&account.id, "AAPL")
        .unwrap()
        .is_empty());
}

#[test]
fn concurrent_partial_sells_serialize_against_remaining_shares() {
    let (_dir, pool) = setup_test_db();
    let account = register_account(&pool, "alice");
    let trading = Arc::new(trading_service(&pool));

    trading.buy_at(&account.id, "AAPL", 5, dec!(10)).unwrap();

    let barrier = Arc::new(Barrier::new(2));
    let mut handles = Vec::new();
    for _ in 0..2 {
        let trading = trading.clone();
        let barrier = barrier.clone();
        let account_id = account.id.clone();
        handles.push(std::thread::spawn(move || {
            barrier.wait();
            trading.sell_at(&account_id, "AAPL", 4, dec!(10))
        }));
    }

    let results: Vec<_> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results.iter().any(|r| matches!(
        r,
        Err(TradingError::InsufficientHoldings {
            requested: 4,
            available: 1,
            ..
        })
    )));

    let lots = HoldingsService::new(pool.clone())
        .get_lots(&account.id, "AAPL")
        .unwrap();
    assert_eq!(lots.len(), 1);
    assert_eq!(lots[0].quantity, 1);
}
