//! Catalog - What customers can buy right now.
use crate::{
    config::shop::ShopSettings,
    core::{ledger, potion, potion_type::PotionType},
    errors::Result,
};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};

/// One sku on offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Catalog sku
    pub sku: String,
    /// Display name
    pub name: String,
    /// Potions in stock
    pub quantity: i64,
    /// Price per potion
    pub price: i64,
    /// Recipe color mix
    pub potion_type: PotionType,
}

/// Lists recipes with positive stock, in recipe order, capped at `catalog_limit` skus.
pub async fn get_catalog(
    db: &DatabaseConnection,
    settings: &ShopSettings,
) -> Result<Vec<CatalogEntry>> {
    let stock = ledger::potion_stock(db).await?;
    let mut entries = Vec::new();

    for recipe in potion::list_potions(db).await? {
        if entries.len() >= settings.catalog_limit {
            break;
        }
        let quantity = stock.get(&recipe.id).copied().unwrap_or(0);
        if quantity <= 0 {
            continue;
        }
        entries.push(CatalogEntry {
            potion_type: PotionType::from_model(&recipe)?,
            sku: recipe.sku,
            name: recipe.name,
            quantity,
            price: recipe.price,
        });
    }
    Ok(entries)
}
