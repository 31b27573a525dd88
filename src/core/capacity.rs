//! Storage capacity - How many potions and how much ml the shop can hold.
//!
//! Capacity is bought in units. The shop starts with one potion unit and one ml unit;
//! each extra unit is paid for with a gold ledger debit.

use crate::{
    config::shop::ShopSettings,
    core::ledger,
    entities::{Capacity, capacity},
    errors::{Error, Result},
};
use sea_orm::{Set, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

const CAPACITY_ROW_ID: i32 = 1;

/// Capacity units currently owned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityState {
    /// Potion storage units
    pub potion_capacity: i64,
    /// Ml storage units
    pub ml_capacity: i64,
}

impl Default for CapacityState {
    fn default() -> Self {
        Self {
            potion_capacity: 1,
            ml_capacity: 1,
        }
    }
}

/// Storage ceilings derived from owned units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityLimits {
    /// Maximum bottled potions across all recipes
    pub max_potions: i64,
    /// Maximum ml across all colors
    pub max_ml: i64,
}

/// Units to buy (plan) or being delivered (purchase).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityPurchase {
    /// Extra potion units
    pub potion_capacity: i64,
    /// Extra ml units
    pub ml_capacity: i64,
}

impl CapacityPurchase {
    /// Total units in this purchase, or None if the sum does not fit in an `i64`.
    #[must_use]
    pub const fn units(&self) -> Option<i64> {
        self.potion_capacity.checked_add(self.ml_capacity)
    }
}

/// Converts owned units into ceilings.
#[must_use]
pub const fn capacity_limits(state: CapacityState, settings: &ShopSettings) -> CapacityLimits {
    CapacityLimits {
        max_potions: state
            .potion_capacity
            .saturating_mul(settings.potions_per_capacity_unit),
        max_ml: state.ml_capacity.saturating_mul(settings.ml_per_capacity_unit),
    }
}

/// Reads owned capacity; a missing row means the initial one unit of each.
pub async fn get_capacity<C>(db: &C) -> Result<CapacityState>
where
    C: ConnectionTrait,
{
    let row = Capacity::find_by_id(CAPACITY_ROW_ID).one(db).await?;
    Ok(row.map_or_else(CapacityState::default, |row| CapacityState {
        potion_capacity: row.potion_capacity,
        ml_capacity: row.ml_capacity,
    }))
}

/// Reads owned capacity and converts it into ceilings.
pub async fn get_capacity_limits<C>(db: &C, settings: &ShopSettings) -> Result<CapacityLimits>
where
    C: ConnectionTrait,
{
    Ok(capacity_limits(get_capacity(db).await?, settings))
}

/// Overwrites the capacity row, creating it if needed.
pub async fn set_capacity<C>(db: &C, state: CapacityState) -> Result<()>
where
    C: ConnectionTrait,
{
    let model = capacity::ActiveModel {
        id: Set(CAPACITY_ROW_ID),
        potion_capacity: Set(state.potion_capacity),
        ml_capacity: Set(state.ml_capacity),
    };
    if Capacity::find_by_id(CAPACITY_ROW_ID).one(db).await?.is_some() {
        model.update(db).await?;
    } else {
        model.insert(db).await?;
    }
    Ok(())
}

/// Decides which capacity units to buy.
///
/// A resource gets one more unit once it is at least half full, as long as the gold left
/// after earlier picks still covers a unit. Potion capacity is considered first.
#[must_use]
pub const fn plan_capacity_purchase(
    gold: i64,
    potions_held: i64,
    ml_held: i64,
    limits: CapacityLimits,
    unit_cost: i64,
) -> CapacityPurchase {
    let mut plan = CapacityPurchase {
        potion_capacity: 0,
        ml_capacity: 0,
    };
    let mut gold_left = gold;

    if unit_cost <= 0 {
        return plan;
    }
    if potions_held * 2 >= limits.max_potions && gold_left >= unit_cost {
        plan.potion_capacity = 1;
        gold_left -= unit_cost;
    }
    if ml_held * 2 >= limits.max_ml && gold_left >= unit_cost {
        plan.ml_capacity = 1;
    }
    plan
}

/// Reads the ledgers and capacity and returns the capacity purchase plan.
pub async fn get_capacity_plan(
    db: &DatabaseConnection,
    settings: &ShopSettings,
) -> Result<CapacityPurchase> {
    let gold = ledger::current_gold(db).await?;
    let potions = ledger::total_potions(db).await?;
    let ml = ledger::current_ml(db).await?.total();
    let limits = get_capacity_limits(db, settings).await?;

    let plan = plan_capacity_purchase(gold, potions, ml, limits, settings.capacity_unit_cost);
    info!(?plan, gold, potions, ml, "capacity plan");
    Ok(plan)
}

/// Pays for and applies a capacity purchase.
///
/// # Errors
/// Returns an error if:
/// - Either unit count is negative, or the units or their cost overflow
/// - The ledger holds less gold than the purchase costs
/// - The database update fails
#[instrument(skip(db, settings))]
pub async fn deliver_capacity_plan(
    db: &DatabaseConnection,
    settings: &ShopSettings,
    purchase: CapacityPurchase,
    order_id: i64,
) -> Result<CapacityState> {
    for units in [purchase.potion_capacity, purchase.ml_capacity] {
        if units < 0 {
            return Err(Error::InvalidQuantity { quantity: units });
        }
    }

    let units = purchase.units().ok_or(Error::InvalidQuantity {
        quantity: purchase.potion_capacity.max(purchase.ml_capacity),
    })?;
    let cost = units
        .checked_mul(settings.capacity_unit_cost)
        .ok_or(Error::InvalidQuantity { quantity: units })?;

    let txn = db.begin().await?;
    let current = get_capacity(&txn).await?;
    if units == 0 {
        return Ok(current);
    }

    let gold = ledger::current_gold(&txn).await?;
    if gold < cost {
        return Err(Error::InsufficientGold {
            available: gold,
            required: cost,
        });
    }

    let (Some(potion_capacity), Some(ml_capacity)) = (
        current.potion_capacity.checked_add(purchase.potion_capacity),
        current.ml_capacity.checked_add(purchase.ml_capacity),
    ) else {
        return Err(Error::InvalidQuantity { quantity: units });
    };
    let updated = CapacityState {
        potion_capacity,
        ml_capacity,
    };
    ledger::record_gold_change(&txn, -cost, format!("capacity delivery {order_id}")).await?;
    set_capacity(&txn, updated).await?;
    txn.commit().await?;

    info!(?updated, cost, "capacity delivered");
    Ok(updated)
}
