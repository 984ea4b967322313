pub(crate) mod holdings_errors;
pub(crate) mod holdings_model;
pub(crate) mod holdings_repository;
pub(crate) mod holdings_service;
pub(crate) mod holdings_traits;

pub use holdings_errors::{HoldingsError, Result};
pub use holdings_model::{
    plan_fifo_consumption, weighted_average_cost, HoldingSummary, Lot, LotConsumption, LotDB,
    SettlementPlan,
};
pub use holdings_repository::HoldingsRepository;
pub use holdings_service::HoldingsService;
pub use holdings_traits::HoldingsServiceTrait;
