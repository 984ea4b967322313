use chrono::NaiveDateTime;
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::parse_stored_decimal;

/// An open purchase position: a quantity of one symbol acquired at one
/// weighted-average unit cost.
///
/// `created_seq` is a per-account monotonic counter; settlement consumes
/// lots in ascending `created_seq` order (oldest first). A lot with
/// quantity zero never exists in storage — full consumption deletes the row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lot {
    pub id: String,
    pub account_id: String,
    pub symbol: String,
    pub quantity: i64,
    pub unit_cost: Decimal,
    pub created_seq: i64,
    pub created_at: NaiveDateTime,
}

impl Lot {
    pub fn new(
        account_id: &str,
        symbol: &str,
        quantity: i64,
        unit_cost: Decimal,
        created_seq: i64,
    ) -> Self {
        Lot {
            id: Uuid::new_v4().to_string(),
            account_id: account_id.to_string(),
            symbol: symbol.to_string(),
            quantity,
            unit_cost,
            created_seq,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }

    /// Folds an additional purchase into this lot, recomputing the unit cost
    /// as a quantity-weighted average:
    /// `(old_qty * old_cost + qty * price) / (old_qty + qty)`.
    pub fn merge_purchase(&mut self, quantity: i64, unit_price: Decimal) {
        let total_cost = self.unit_cost * Decimal::from(self.quantity)
            + unit_price * Decimal::from(quantity);
        let total_quantity = self.quantity + quantity;
        self.unit_cost = total_cost / Decimal::from(total_quantity);
        self.quantity = total_quantity;
    }

    /// Total acquisition cost of the shares still in this lot.
    pub fn cost_basis(&self) -> Decimal {
        self.unit_cost * Decimal::from(self.quantity)
    }
}

/// Database model for lots
#[derive(
    Queryable,
    Identifiable,
    Insertable,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::lots)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct LotDB {
    pub id: String,
    pub account_id: String,
    pub symbol: String,
    pub quantity: i64,
    pub unit_cost: String,
    pub created_seq: i64,
    pub created_at: NaiveDateTime,
}

impl From<LotDB> for Lot {
    fn from(db: LotDB) -> Self {
        Self {
            id: db.id,
            account_id: db.account_id,
            symbol: db.symbol,
            quantity: db.quantity,
            unit_cost: parse_stored_decimal(&db.unit_cost, "unit_cost"),
            created_seq: db.created_seq,
            created_at: db.created_at,
        }
    }
}

impl From<&Lot> for LotDB {
    fn from(lot: &Lot) -> Self {
        Self {
            id: lot.id.clone(),
            account_id: lot.account_id.clone(),
            symbol: lot.symbol.clone(),
            quantity: lot.quantity,
            unit_cost: lot.unit_cost.to_string(),
            created_seq: lot.created_seq,
            created_at: lot.created_at,
        }
    }
}

/// One symbol's aggregate position, as shown on the portfolio page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingSummary {
    pub symbol: String,
    pub quantity: i64,
    pub average_cost: Decimal,
}

/// The share of a settlement taken from a single lot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LotConsumption {
    pub lot_id: String,
    pub quantity: i64,
    pub unit_cost: Decimal,
}

/// The storage mutations a settlement must apply: which lots disappear,
/// which single lot (if any) shrinks, and what was taken from each.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SettlementPlan {
    pub consumptions: Vec<LotConsumption>,
    pub delete_lot_ids: Vec<String>,
    /// Lot left partially consumed: (lot id, remaining quantity).
    pub remainder: Option<(String, i64)>,
}

/// Plans FIFO consumption of `quantity_to_sell` shares across `lots`.
///
/// `lots` must be ordered by ascending `created_seq` and hold at least
/// `quantity_to_sell` shares in total; the caller validates both. Oldest
/// lots are consumed first; the first lot that is only partially needed is
/// shrunk and iteration stops.
pub fn plan_fifo_consumption(lots: &[Lot], quantity_to_sell: i64) -> SettlementPlan {
    let mut plan = SettlementPlan::default();
    let mut remaining = quantity_to_sell;

    for lot in lots {
        if remaining <= 0 {
            break;
        }

        let consumed = remaining.min(lot.quantity);
        plan.consumptions.push(LotConsumption {
            lot_id: lot.id.clone(),
            quantity: consumed,
            unit_cost: lot.unit_cost,
        });
        remaining -= consumed;

        if consumed == lot.quantity {
            plan.delete_lot_ids.push(lot.id.clone());
        } else {
            plan.remainder = Some((lot.id.clone(), lot.quantity - consumed));
            break;
        }
    }

    plan
}

/// Quantity-weighted average cost across lots; zero when no shares are held.
pub fn weighted_average_cost(lots: &[Lot]) -> Decimal {
    let total_quantity: i64 = lots.iter().map(|lot| lot.quantity).sum();
    if total_quantity <= 0 {
        return Decimal::ZERO;
    }
    let total_cost: Decimal = lots.iter().map(Lot::cost_basis).sum();
    total_cost / Decimal::from(total_quantity)
}
