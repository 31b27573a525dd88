//! Barrel purchasing - Planning wholesale orders and booking their delivery.
//!
//! The planner spends gold on the best value barrels first while keeping the four
//! colors roughly level: each color may only fill its even share of the ml capacity,
//! and colors are topped up in order of how little of them the shop holds.

use crate::{
    config::shop::ShopSettings,
    core::{
        capacity,
        ledger,
        potion_type::{Color, MlTotals},
    },
    errors::{Error, Result},
};
use sea_orm::{DatabaseConnection, TransactionTrait};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::{debug, info, instrument};

/// A wholesale catalog entry, or a delivered barrel line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Barrel {
    /// Wholesale sku
    pub sku: String,
    /// Ml contained in one barrel
    pub ml_per_barrel: i64,
    /// Color weights; only their proportions matter
    pub potion_type: [i32; 4],
    /// Gold per barrel
    pub price: i64,
    /// Barrels offered (catalog) or delivered (delivery)
    pub quantity: i64,
}

impl Barrel {
    /// Ml per color in one barrel, splitting `ml_per_barrel` by the color weights.
    ///
    /// Shares are rounded down and the ml lost to rounding goes to the largest
    /// remainders, so the shares always add up to `ml_per_barrel`. Returns None when the
    /// barrel has negative ml or no usable color weights.
    #[must_use]
    pub fn ml_per_color(&self) -> Option<MlTotals> {
        if self.ml_per_barrel < 0 || self.potion_type.iter().any(|weight| *weight < 0) {
            return None;
        }
        let weight_total: i128 = self.potion_type.iter().map(|w| i128::from(*w)).sum();
        if weight_total == 0 {
            return None;
        }

        let ml = i128::from(self.ml_per_barrel);
        let mut shares = [0_i128; 4];
        let mut remainders = [(0_i128, 0_usize); 4];
        for color in Color::ALL {
            let exact = ml * i128::from(self.potion_type[color.index()]);
            shares[color.index()] = exact / weight_total;
            remainders[color.index()] = (exact % weight_total, color.index());
        }

        let mut leftover = ml - shares.iter().sum::<i128>();
        // Largest remainder first, earlier colors win ties
        remainders.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
        for (remainder, index) in remainders {
            if leftover == 0 || remainder == 0 {
                break;
            }
            shares[index] += 1;
            leftover -= 1;
        }
        MlTotals::try_from_fn(|color| i64::try_from(shares[color.index()]).ok())
    }

    /// The color with the largest weight, ties going to the earlier color.
    #[must_use]
    pub fn dominant_color(&self) -> Color {
        Color::ALL
            .iter()
            .copied()
            .fold(Color::Red, |best, color| {
                if self.potion_type[color.index()] > self.potion_type[best.index()] {
                    color
                } else {
                    best
                }
            })
    }

    fn is_purchasable(&self) -> bool {
        self.ml_per_barrel > 0
            && self.price >= 0
            && self.quantity > 0
            && self.ml_per_color().is_some_and(|ml| ml.total() > 0)
    }

    /// Compares price per ml without dividing: `a.price / a.ml` vs `b.price / b.ml`.
    fn cmp_value(&self, other: &Self) -> Ordering {
        let lhs = i128::from(self.price) * i128::from(other.ml_per_barrel);
        let rhs = i128::from(other.price) * i128::from(self.ml_per_barrel);
        lhs.cmp(&rhs).then_with(|| self.sku.cmp(&other.sku))
    }
}

/// One line of a purchase plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarrelOrder {
    /// Wholesale sku
    pub sku: String,
    /// Barrels to buy
    pub quantity: i64,
}

struct Candidate<'a> {
    barrel: &'a Barrel,
    per_color: MlTotals,
    color: Color,
    bought: i64,
}

/// Builds a purchase plan from the wholesale catalog.
///
/// The plan never spends more than `gold`, never buys more of a sku than offered, keeps
/// each color at or below `max_ml` split evenly across the colors on offer, and keeps the
/// overall total at or below `max_ml`.
#[must_use]
pub fn plan_barrel_purchase(
    catalog: &[Barrel],
    gold: i64,
    ml: MlTotals,
    max_ml: i64,
) -> Vec<BarrelOrder> {
    let mut candidates: Vec<Candidate<'_>> = catalog
        .iter()
        .filter(|barrel| barrel.is_purchasable())
        .filter_map(|barrel| {
            barrel.ml_per_color().map(|per_color| Candidate {
                barrel,
                per_color,
                color: barrel.dominant_color(),
                bought: 0,
            })
        })
        .collect();
    if candidates.is_empty() || gold <= 0 {
        return Vec::new();
    }
    candidates.sort_by(|a, b| a.barrel.cmp_value(b.barrel));

    let mut colors: Vec<Color> = Color::ALL
        .into_iter()
        .filter(|color| candidates.iter().any(|candidate| candidate.color == *color))
        .collect();
    // At most four colors
    #[allow(clippy::cast_possible_wrap)]
    let per_color_ceiling = max_ml / colors.len() as i64;
    debug!(per_color_ceiling, ?colors, "planning barrel purchase");

    let mut gold_left = gold;
    let mut projected = ml;
    let mut purchase_order: Vec<usize> = Vec::new();

    loop {
        let mut bought_this_round = false;
        // Least stocked colors get the first pick of the gold in each round
        colors.sort_by_key(|color| (projected.get(*color), *color));

        for color in &colors {
            let pick = candidates.iter().position(|candidate| {
                if candidate.color != *color
                    || candidate.bought >= candidate.barrel.quantity
                    || candidate.barrel.price > gold_left
                {
                    return false;
                }
                let Some(after) = projected.checked_plus(&candidate.per_color) else {
                    return false;
                };
                after.checked_total().is_some_and(|total| total <= max_ml)
                    && Color::ALL.iter().all(|c| {
                        candidate.per_color.get(*c) == 0 || after.get(*c) <= per_color_ceiling
                    })
            });

            if let Some(index) = pick {
                let candidate = &mut candidates[index];
                candidate.bought += 1;
                gold_left -= candidate.barrel.price;
                projected = projected.plus(&candidate.per_color);
                if !purchase_order.contains(&index) {
                    purchase_order.push(index);
                }
                bought_this_round = true;
            }
        }

        if !bought_this_round {
            break;
        }
    }

    purchase_order
        .into_iter()
        .map(|index| BarrelOrder {
            sku: candidates[index].barrel.sku.clone(),
            quantity: candidates[index].bought,
        })
        .collect()
}

/// Reads gold, ml and capacity and plans today's wholesale purchase.
pub async fn get_wholesale_purchase_plan(
    db: &DatabaseConnection,
    settings: &ShopSettings,
    catalog: &[Barrel],
) -> Result<Vec<BarrelOrder>> {
    let gold = ledger::current_gold(db).await?;
    let ml = ledger::current_ml(db).await?;
    let limits = capacity::get_capacity_limits(db, settings).await?;

    let plan = plan_barrel_purchase(catalog, gold, ml, limits.max_ml);
    info!(gold, ?ml, ?plan, "wholesale purchase plan");
    Ok(plan)
}

/// Books delivered barrels: one gold debit for the total cost and one ml credit.
///
/// # Errors
/// Returns an error if:
/// - A line has a non-positive quantity or ml, a negative price, or no color weights
/// - The delivered ml or the total cost overflow
/// - The ledger holds less gold than the delivery costs
/// - The delivered ml would exceed ml capacity
#[instrument(skip(db, settings, barrels), fields(lines = barrels.len()))]
pub async fn deliver_barrels(
    db: &DatabaseConnection,
    settings: &ShopSettings,
    barrels: &[Barrel],
    order_id: i64,
) -> Result<MlTotals> {
    let mut added = MlTotals::default();
    let mut cost: i64 = 0;
    for barrel in barrels {
        if barrel.quantity <= 0 {
            return Err(Error::InvalidQuantity {
                quantity: barrel.quantity,
            });
        }
        if barrel.price < 0 {
            return Err(Error::InvalidPrice {
                price: barrel.price,
            });
        }
        if barrel.ml_per_barrel <= 0 {
            return Err(Error::InvalidQuantity {
                quantity: barrel.ml_per_barrel,
            });
        }
        let per_color = barrel.ml_per_color().ok_or_else(|| Error::InvalidPotionType {
            components: barrel.potion_type.to_vec(),
            reason: format!("barrel {} has no usable color weights", barrel.sku),
        })?;
        let too_many = || Error::InvalidQuantity {
            quantity: barrel.quantity,
        };
        let barrel_ml = per_color.checked_times(barrel.quantity).ok_or_else(too_many)?;
        added = added.checked_plus(&barrel_ml).ok_or_else(too_many)?;
        added.checked_total().ok_or_else(too_many)?;

        let too_expensive = || Error::InvalidPrice {
            price: barrel.price,
        };
        let line_cost = barrel
            .price
            .checked_mul(barrel.quantity)
            .ok_or_else(too_expensive)?;
        cost = line_cost.checked_add(cost).ok_or_else(too_expensive)?;
    }

    if barrels.is_empty() {
        return Ok(added);
    }

    let txn = db.begin().await?;

    let gold = ledger::current_gold(&txn).await?;
    if gold < cost {
        return Err(Error::InsufficientGold {
            available: gold,
            required: cost,
        });
    }

    let limits = capacity::get_capacity_limits(&txn, settings).await?;
    let ml_after = ledger::current_ml(&txn)
        .await?
        .checked_total()
        .and_then(|held| held.checked_add(added.total()))
        .unwrap_or(i64::MAX);
    if ml_after > limits.max_ml {
        return Err(Error::CapacityExceeded {
            resource: "ml".to_string(),
            limit: limits.max_ml,
            requested: ml_after,
        });
    }

    let description = format!("barrel delivery {order_id}");
    ledger::record_gold_change(&txn, -cost, description.clone()).await?;
    ledger::record_ml_change(&txn, added, description).await?;
    txn.commit().await?;

    info!(cost, ?added, "barrels delivered");
    Ok(added)
}
