//! Potion recipe management.
//!
//! Recipes are looked up either by sku (what customers order) or by [`PotionType`]
//! (what the bottler produces). A color mix maps to at most one recipe; unseen mixes can
//! be registered on demand with [`get_or_create_potion`].

use crate::{
    config::shop::{AppConfig, ShopSettings},
    core::potion_type::{Color, PotionType},
    entities::{Potion, potion},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::info;

const MAX_SKU_LEN: usize = 32;

/// Checks that a sku is 1-32 characters of `A-Z`, `0-9` or `_`.
pub fn validate_sku(sku: &str) -> Result<()> {
    let well_formed = !sku.is_empty()
        && sku.len() <= MAX_SKU_LEN
        && sku
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_');
    if well_formed {
        Ok(())
    } else {
        Err(Error::InvalidSku {
            sku: sku.to_string(),
        })
    }
}

/// Retrieves every recipe, ordered by id.
pub async fn list_potions<C>(db: &C) -> Result<Vec<potion::Model>>
where
    C: ConnectionTrait,
{
    Potion::find()
        .order_by_asc(potion::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a recipe by sku.
pub async fn get_potion_by_sku<C>(db: &C, sku: &str) -> Result<Option<potion::Model>>
where
    C: ConnectionTrait,
{
    Potion::find()
        .filter(potion::Column::Sku.eq(sku))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds the recipe for an exact color mix.
pub async fn get_potion_by_type<C>(
    db: &C,
    potion_type: PotionType,
) -> Result<Option<potion::Model>>
where
    C: ConnectionTrait,
{
    Potion::find()
        .filter(potion::Column::Red.eq(potion_type.part(Color::Red)))
        .filter(potion::Column::Green.eq(potion_type.part(Color::Green)))
        .filter(potion::Column::Blue.eq(potion_type.part(Color::Blue)))
        .filter(potion::Column::Dark.eq(potion_type.part(Color::Dark)))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a new recipe after validating every field.
///
/// # Errors
/// Returns an error if:
/// - The name is empty or whitespace-only
/// - The sku is malformed or already taken
/// - The price is not positive
/// - The database insert fails
pub async fn create_potion<C>(
    db: &C,
    name: String,
    sku: String,
    price: i64,
    potion_type: PotionType,
) -> Result<potion::Model>
where
    C: ConnectionTrait,
{
    if name.trim().is_empty() {
        return Err(Error::InvalidName { name });
    }
    validate_sku(&sku)?;
    if price <= 0 {
        return Err(Error::InvalidPrice { price });
    }
    if get_potion_by_sku(db, &sku).await?.is_some() {
        return Err(Error::DuplicatePotion { sku });
    }

    let [red, green, blue, dark] = potion_type.parts();
    let potion = potion::ActiveModel {
        name: Set(name.trim().to_string()),
        sku: Set(sku),
        price: Set(price),
        red: Set(red),
        green: Set(green),
        blue: Set(blue),
        dark: Set(dark),
        ..Default::default()
    };
    let created = potion.insert(db).await?;
    info!(sku = %created.sku, %potion_type, "created potion recipe");
    Ok(created)
}

/// Returns the recipe for `potion_type`, creating a custom one if the mix is new.
///
/// Custom recipes get the sku `CUSTOM_<r>_<g>_<b>_<d>` and the configured default price.
pub async fn get_or_create_potion<C>(
    db: &C,
    settings: &ShopSettings,
    potion_type: PotionType,
) -> Result<potion::Model>
where
    C: ConnectionTrait,
{
    if let Some(existing) = get_potion_by_type(db, potion_type).await? {
        return Ok(existing);
    }

    let [red, green, blue, dark] = potion_type.parts();
    create_potion(
        db,
        format!("custom potion {red}/{green}/{blue}/{dark}"),
        format!("CUSTOM_{red}_{green}_{blue}_{dark}"),
        settings.custom_potion_price,
        potion_type,
    )
    .await
}

/// Inserts configured recipes whose sku is not in the catalog yet.
///
/// Returns the number of recipes created. Existing rows are never modified.
pub async fn seed_potions(db: &DatabaseConnection, config: &AppConfig) -> Result<usize> {
    let mut created = 0;
    for entry in &config.potions {
        if get_potion_by_sku(db, &entry.sku).await?.is_some() {
            continue;
        }
        let potion_type = PotionType::try_from(entry.potion_type.clone())?;
        create_potion(
            db,
            entry.name.clone(),
            entry.sku.clone(),
            entry.price,
            potion_type,
        )
        .await?;
        created += 1;
    }
    info!("Seeded {created} potion recipes");
    Ok(created)
}
