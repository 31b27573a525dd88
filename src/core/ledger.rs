//! Ledger aggregation - The only source of current gold, ml and potion stock.
//!
//! Nothing in the shop stores a running balance. Every change is appended to one of the
//! three ledgers and the current state is recomputed with `SUM` on read. An empty ledger
//! sums to NULL in SQL, which is folded to zero here so callers never see a missing
//! balance.
//!
//! All functions are generic over [`ConnectionTrait`] so they can run against the pool
//! or inside an open transaction.

use crate::{
    core::potion_type::MlTotals,
    entities::{GoldLedger, MlLedger, PotionLedger, gold_ledger, ml_ledger, potion_ledger},
    errors::Result,
};
use chrono::Utc;
use sea_orm::{QuerySelect, Set, prelude::*, sea_query::Expr};
use std::collections::BTreeMap;
use tracing::debug;

/// Current gold: the sum of every gold ledger entry.
pub async fn current_gold<C>(db: &C) -> Result<i64>
where
    C: ConnectionTrait,
{
    let total: Option<Option<i64>> = GoldLedger::find()
        .select_only()
        .column_as(Expr::col(gold_ledger::Column::QuantityChange).sum(), "total")
        .into_tuple()
        .one(db)
        .await?;
    Ok(total.flatten().unwrap_or(0))
}

/// Current ml per color, summed column by column in a single query.
pub async fn current_ml<C>(db: &C) -> Result<MlTotals>
where
    C: ConnectionTrait,
{
    let sums: Option<(Option<i64>, Option<i64>, Option<i64>, Option<i64>)> = MlLedger::find()
        .select_only()
        .column_as(Expr::col(ml_ledger::Column::RedChange).sum(), "red")
        .column_as(Expr::col(ml_ledger::Column::GreenChange).sum(), "green")
        .column_as(Expr::col(ml_ledger::Column::BlueChange).sum(), "blue")
        .column_as(Expr::col(ml_ledger::Column::DarkChange).sum(), "dark")
        .into_tuple()
        .one(db)
        .await?;

    Ok(sums.map_or_else(MlTotals::default, |(red, green, blue, dark)| MlTotals {
        red: red.unwrap_or(0),
        green: green.unwrap_or(0),
        blue: blue.unwrap_or(0),
        dark: dark.unwrap_or(0),
    }))
}

/// Current stock of every potion that has at least one ledger entry, keyed by potion id.
///
/// Potions that were never bottled are absent rather than mapped to zero.
pub async fn potion_stock<C>(db: &C) -> Result<BTreeMap<i64, i64>>
where
    C: ConnectionTrait,
{
    let rows: Vec<(i64, Option<i64>)> = PotionLedger::find()
        .select_only()
        .column(potion_ledger::Column::PotionId)
        .column_as(
            Expr::col(potion_ledger::Column::QuantityChange).sum(),
            "stock",
        )
        .group_by(potion_ledger::Column::PotionId)
        .into_tuple()
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(potion_id, stock)| (potion_id, stock.unwrap_or(0)))
        .collect())
}

/// Current stock of a single potion; zero if it has no ledger entries.
pub async fn stock_for_potion<C>(db: &C, potion_id: i64) -> Result<i64>
where
    C: ConnectionTrait,
{
    let total: Option<Option<i64>> = PotionLedger::find()
        .select_only()
        .column_as(
            Expr::col(potion_ledger::Column::QuantityChange).sum(),
            "stock",
        )
        .filter(potion_ledger::Column::PotionId.eq(potion_id))
        .into_tuple()
        .one(db)
        .await?;
    Ok(total.flatten().unwrap_or(0))
}

/// Bottled potions across all recipes.
pub async fn total_potions<C>(db: &C) -> Result<i64>
where
    C: ConnectionTrait,
{
    let total: Option<Option<i64>> = PotionLedger::find()
        .select_only()
        .column_as(
            Expr::col(potion_ledger::Column::QuantityChange).sum(),
            "total",
        )
        .into_tuple()
        .one(db)
        .await?;
    Ok(total.flatten().unwrap_or(0))
}

/// Appends one gold entry.
pub async fn record_gold_change<C>(
    db: &C,
    quantity_change: i64,
    description: impl Into<String>,
) -> Result<gold_ledger::Model>
where
    C: ConnectionTrait,
{
    let description = description.into();
    debug!(quantity_change, %description, "appending gold ledger entry");
    gold_ledger::ActiveModel {
        quantity_change: Set(quantity_change),
        description: Set(description),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Appends one ml entry carrying all four color changes.
pub async fn record_ml_change<C>(
    db: &C,
    change: MlTotals,
    description: impl Into<String>,
) -> Result<ml_ledger::Model>
where
    C: ConnectionTrait,
{
    let description = description.into();
    debug!(?change, %description, "appending ml ledger entry");
    ml_ledger::ActiveModel {
        red_change: Set(change.red),
        green_change: Set(change.green),
        blue_change: Set(change.blue),
        dark_change: Set(change.dark),
        description: Set(description),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Appends one stock entry for a potion.
pub async fn record_potion_change<C>(
    db: &C,
    potion_id: i64,
    quantity_change: i64,
    description: impl Into<String>,
) -> Result<potion_ledger::Model>
where
    C: ConnectionTrait,
{
    let description = description.into();
    debug!(potion_id, quantity_change, %description, "appending potion ledger entry");
    potion_ledger::ActiveModel {
        potion_id: Set(potion_id),
        quantity_change: Set(quantity_change),
        description: Set(description),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}
