pub(crate) mod quotes_errors;
pub(crate) mod quotes_model;
pub(crate) mod quotes_provider;
pub(crate) mod quotes_service;
pub(crate) mod quotes_traits;
pub mod providers;

pub use quotes_errors::{QuoteError, Result};
pub use quotes_model::Quote;
pub use quotes_provider::QuoteProvider;
pub use quotes_service::QuoteService;
pub use quotes_traits::QuoteServiceTrait;
