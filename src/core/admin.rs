//! Admin operations.
use crate::{
    config::shop::ShopSettings,
    core::{
        capacity::{self, CapacityState},
        ledger,
    },
    entities::{Cart, CartItem, GoldLedger, MlLedger, PotionLedger},
    errors::Result,
};
use sea_orm::{DatabaseConnection, EntityTrait, TransactionTrait};
use tracing::{info, instrument};

/// Resets the game state.
///
/// Clears every cart and all three ledgers, returns capacity to one unit of each, and
/// credits the starting gold. Potion recipes are kept.
#[instrument(skip_all)]
pub async fn reset(db: &DatabaseConnection, settings: &ShopSettings) -> Result<()> {
    let txn = db.begin().await?;

    CartItem::delete_many().exec(&txn).await?;
    Cart::delete_many().exec(&txn).await?;
    PotionLedger::delete_many().exec(&txn).await?;
    MlLedger::delete_many().exec(&txn).await?;
    GoldLedger::delete_many().exec(&txn).await?;

    capacity::set_capacity(&txn, CapacityState::default()).await?;
    ledger::record_gold_change(&txn, settings.starting_gold, "admin reset").await?;

    txn.commit().await?;
    info!(starting_gold = settings.starting_gold, "shop reset");
    Ok(())
}

/// Resets the shop if the gold ledger has never been written.
///
/// Returns true if a reset happened.
pub async fn bootstrap_if_empty(db: &DatabaseConnection, settings: &ShopSettings) -> Result<bool> {
    let entries = GoldLedger::find().one(db).await?;
    if entries.is_some() {
        return Ok(false);
    }
    reset(db, settings).await?;
    Ok(true)
}
