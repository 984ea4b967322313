pub(crate) mod accounts_errors;
pub(crate) mod accounts_model;
pub(crate) mod accounts_repository;
pub(crate) mod accounts_service;
pub(crate) mod accounts_traits;

pub use accounts_errors::{AccountError, Result};
pub use accounts_model::{Account, AccountDB, NewAccount};
pub use accounts_repository::AccountRepository;
pub use accounts_service::AccountService;
pub use accounts_traits::AccountServiceTrait;
