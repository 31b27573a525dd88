use potion_shop::{
    config::{database, shop},
    core::{admin, inventory, potion},
    errors::Result,
};
use dotenvy::dotenv;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; variables can also be set externally
    dotenv().ok();

    // 3. Load shop configuration
    let app_config = shop::load_default_config()
        .inspect_err(|e| error!("Failed to load shop configuration: {e}"))?;
    info!(settings = ?app_config.shop, "Loaded shop configuration");

    // 4. Connect and make sure the schema exists
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {e}"))?;
    database::create_tables(&db).await?;
    info!("Database initialized successfully.");

    // 5. A fresh database starts from an admin reset
    if admin::bootstrap_if_empty(&db, &app_config.shop).await? {
        info!("Empty gold ledger, shop reset to starting state");
    }

    // 6. Seed recipes from config
    potion::seed_potions(&db, &app_config)
        .await
        .inspect_err(|e| error!("Failed to seed potion recipes: {e}"))?;

    let audit = inventory::get_inventory_audit(&db).await?;
    info!(
        potions = audit.number_of_potions,
        ml = audit.ml_in_barrels,
        gold = audit.gold,
        "Shop ready"
    );
    Ok(())
}
