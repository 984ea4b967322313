pub(crate) mod transactions_errors;
pub(crate) mod transactions_model;
pub(crate) mod transactions_repository;
pub(crate) mod transactions_service;
pub(crate) mod transactions_traits;

pub use transactions_errors::{Result, TransactionError};
pub use transactions_model::{
    NewTransaction, TransactionDB, TransactionRecord, TransactionSide,
};
pub use transactions_repository::TransactionRepository;
pub use transactions_service::TransactionService;
pub use transactions_traits::TransactionServiceTrait;
