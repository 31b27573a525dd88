//! Shared test utilities for the potion shop.
//!
//! Helpers for setting up an in-memory database and seeding recipes and ledgers.

use crate::{
    core::{
        carts::Customer,
        ledger, potion,
        potion_type::{MlTotals, PotionType},
    },
    entities,
    errors::Result,
};
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a test recipe priced at 50 gold.
///
/// The name is the sku lowercased with underscores turned into spaces.
pub async fn create_test_potion(
    db: &DatabaseConnection,
    sku: &str,
    mix: [i32; 4],
) -> Result<entities::potion::Model> {
    create_custom_potion(db, sku, 50, mix).await
}

/// Creates a test recipe with a custom price.
pub async fn create_custom_potion(
    db: &DatabaseConnection,
    sku: &str,
    price: i64,
    mix: [i32; 4],
) -> Result<entities::potion::Model> {
    let [red, green, blue, dark] = mix;
    potion::create_potion(
        db,
        sku.to_lowercase().replace('_', " "),
        sku.to_string(),
        price,
        PotionType::new(red, green, blue, dark)?,
    )
    .await
}

/// Appends one ml ledger row.
pub async fn seed_ml(db: &DatabaseConnection, ml: MlTotals) -> Result<()> {
    ledger::record_ml_change(db, ml, "test seed").await?;
    Ok(())
}

/// Appends one potion ledger row.
pub async fn seed_stock(db: &DatabaseConnection, potion_id: i64, quantity: i64) -> Result<()> {
    ledger::record_potion_change(db, potion_id, quantity, "test seed").await?;
    Ok(())
}

/// A customer with sensible defaults.
pub fn test_customer() -> Customer {
    Customer {
        customer_name: "Scaramouche".to_string(),
        character_class: "Bard".to_string(),
        level: 7,
    }
}
