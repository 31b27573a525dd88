//! Bottling - Turning ml into potions.
//!
//! Planning happens in two passes. First every recipe gets a target: the most it could
//! make on its own, scaled down proportionally when the targets together would overflow
//! potion capacity. Then the targets are filled round-robin from one shared pool of ml,
//! so recipes that compete for a color split it instead of the first one taking it all.

use crate::{
    config::shop::ShopSettings,
    core::{
        capacity, ledger, potion,
        potion_type::{Color, MlTotals, PotionType},
    },
    errors::{Error, Result},
};
use sea_orm::{DatabaseConnection, TransactionTrait};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// A quantity of one potion type, planned or delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PotionBatch {
    /// Recipe color mix
    pub potion_type: PotionType,
    /// Number of potions
    pub quantity: i64,
}

/// How many potions of `recipe` the ml on hand could make if nothing else were bottled.
///
/// Colors the recipe does not use are ignored; a missing ingredient yields zero.
#[must_use]
pub fn max_producible(recipe: PotionType, ml: &MlTotals) -> i64 {
    Color::ALL
        .iter()
        .filter(|color| recipe.part(**color) > 0)
        .map(|color| ml.get(*color) / i64::from(recipe.part(*color)))
        .min()
        .unwrap_or(0)
        .max(0)
}

/// Scales `maxima` so they sum to `capacity`, handing leftover units to the largest
/// fractional remainders. Assumes `capacity` is below the sum of `maxima`.
fn scale_to_capacity(maxima: &[i64], capacity: i64) -> Vec<i64> {
    let sum: i128 = maxima.iter().map(|max| i128::from(*max)).sum();
    if sum == 0 {
        return vec![0; maxima.len()];
    }

    let mut targets = Vec::with_capacity(maxima.len());
    let mut remainders = Vec::with_capacity(maxima.len());
    for (index, max) in maxima.iter().enumerate() {
        let scaled = i128::from(*max) * i128::from(capacity);
        targets.push(i64::try_from(scaled / sum).unwrap_or(*max));
        remainders.push((scaled % sum, index));
    }

    let mut leftover = capacity - targets.iter().sum::<i64>();
    // Largest remainder first, earlier recipes win ties
    remainders.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
    for (_, index) in remainders {
        if leftover <= 0 {
            break;
        }
        if targets[index] < maxima[index] {
            targets[index] += 1;
            leftover -= 1;
        }
    }
    targets
}

/// Plans how many potions of each recipe to bottle.
///
/// The plan never uses more ml of any color than `ml` holds and never brings the stock
/// above `max_potions`. Recipes with nothing to make are left out.
#[must_use]
pub fn plan_bottling(
    recipes: &[PotionType],
    ml: MlTotals,
    potions_held: i64,
    max_potions: i64,
) -> Vec<PotionBatch> {
    let room = (max_potions - potions_held).max(0);
    let maxima: Vec<i64> = recipes
        .iter()
        .map(|recipe| max_producible(*recipe, &ml))
        .collect();

    let targets = if maxima.iter().sum::<i64>() > room {
        scale_to_capacity(&maxima, room)
    } else {
        maxima
    };

    let mut available = ml;
    let mut counts = vec![0_i64; recipes.len()];
    loop {
        let mut progressed = false;
        for (index, recipe) in recipes.iter().enumerate() {
            if counts[index] >= targets[index] {
                continue;
            }
            let needed = recipe.per_potion();
            if available.covers(&needed) {
                available = available.minus(&needed);
                counts[index] += 1;
                progressed = true;
            }
        }
        if !progressed {
            break;
        }
    }

    recipes
        .iter()
        .zip(counts)
        .filter(|(_, quantity)| *quantity > 0)
        .map(|(recipe, quantity)| PotionBatch {
            potion_type: *recipe,
            quantity,
        })
        .collect()
}

/// Reads ml, stock, capacity and the recipe catalog and plans today's bottling.
pub async fn get_bottle_plan(
    db: &DatabaseConnection,
    settings: &ShopSettings,
) -> Result<Vec<PotionBatch>> {
    let recipes = potion::list_potions(db)
        .await?
        .iter()
        .map(PotionType::from_model)
        .collect::<Result<Vec<_>>>()?;
    let ml = ledger::current_ml(db).await?;
    let potions_held = ledger::total_potions(db).await?;
    let limits = capacity::get_capacity_limits(db, settings).await?;

    let plan = plan_bottling(&recipes, ml, potions_held, limits.max_potions);
    info!(?ml, potions_held, ?plan, "bottle plan");
    Ok(plan)
}

/// Folds batches of the same potion type into one, keeping first-seen order.
fn merge_batches(batches: &[PotionBatch]) -> Result<Vec<PotionBatch>> {
    let mut merged: Vec<PotionBatch> = Vec::with_capacity(batches.len());
    for batch in batches {
        if let Some(existing) = merged
            .iter_mut()
            .find(|existing| existing.potion_type == batch.potion_type)
        {
            existing.quantity = existing
                .quantity
                .checked_add(batch.quantity)
                .ok_or(Error::InvalidQuantity {
                    quantity: batch.quantity,
                })?;
        } else {
            merged.push(*batch);
        }
    }
    Ok(merged)
}

/// Books bottled potions.
///
/// Batches of the same potion type are merged first. Then for each potion type one
/// negative ml entry (the recipe's parts times the quantity) and one positive potion
/// entry are appended, all in one transaction.
///
/// # Errors
/// Returns an error if:
/// - A batch has a non-positive quantity, or the volumes involved overflow
/// - No recipe matches a batch's potion type
/// - The ml on hand does not cover the batches
/// - The potions would exceed potion capacity
#[instrument(skip(db, settings, batches), fields(batches = batches.len()))]
pub async fn deliver_bottles(
    db: &DatabaseConnection,
    settings: &ShopSettings,
    batches: &[PotionBatch],
    order_id: i64,
) -> Result<()> {
    for batch in batches {
        if batch.quantity <= 0 {
            return Err(Error::InvalidQuantity {
                quantity: batch.quantity,
            });
        }
    }
    let merged = merge_batches(batches)?;
    if merged.is_empty() {
        return Ok(());
    }

    let mut consumption = Vec::with_capacity(merged.len());
    let mut needed = MlTotals::default();
    let mut bottled: i64 = 0;
    for batch in &merged {
        let used = batch
            .potion_type
            .ml_for(batch.quantity)
            .ok_or(Error::InvalidQuantity {
                quantity: batch.quantity,
            })?;
        needed = needed
            .checked_plus(&used)
            .ok_or(Error::InvalidQuantity {
                quantity: batch.quantity,
            })?;
        bottled = bottled
            .checked_add(batch.quantity)
            .ok_or(Error::InvalidQuantity {
                quantity: batch.quantity,
            })?;
        consumption.push(used);
    }

    let txn = db.begin().await?;

    let mut recipes = Vec::with_capacity(merged.len());
    for batch in &merged {
        let recipe = potion::get_potion_by_type(&txn, batch.potion_type)
            .await?
            .ok_or_else(|| Error::PotionNotFound {
                key: batch.potion_type.to_string(),
            })?;
        recipes.push(recipe);
    }

    let available = ledger::current_ml(&txn).await?;
    for color in Color::ALL {
        if available.get(color) < needed.get(color) {
            return Err(Error::InsufficientMl {
                color,
                available: available.get(color),
                required: needed.get(color),
            });
        }
    }

    let limits = capacity::get_capacity_limits(&txn, settings).await?;
    let potions_after = ledger::total_potions(&txn)
        .await?
        .checked_add(bottled)
        .ok_or(Error::InvalidQuantity { quantity: bottled })?;
    if potions_after > limits.max_potions {
        return Err(Error::CapacityExceeded {
            resource: "potion".to_string(),
            limit: limits.max_potions,
            requested: potions_after,
        });
    }

    let description = format!("bottle delivery {order_id}");
    for ((batch, recipe), used) in merged.iter().zip(&recipes).zip(&consumption) {
        ledger::record_ml_change(&txn, used.negated(), description.clone()).await?;
        ledger::record_potion_change(&txn, recipe.id, batch.quantity, description.clone())
            .await?;
    }
    txn.commit().await?;

    info!(bottled, ?needed, "bottles delivered");
    Ok(())
}
