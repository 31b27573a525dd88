//! Shop configuration loading from config.toml
//!
//! The `[shop]` table tunes the economy (starting gold, capacity pricing, catalog size)
//! and each `[[potions]]` entry describes a recipe to seed into the catalog on start.
//! Every setting has a default, so an empty file is a valid configuration.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, warn};

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize, Default, Clone)]
pub struct AppConfig {
    /// Economy settings
    #[serde(default)]
    pub shop: ShopSettings,
    /// Recipes to seed into the catalog
    #[serde(default)]
    pub potions: Vec<PotionConfig>,
}

/// Tunables for the shop economy
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ShopSettings {
    /// Gold credited by an admin reset
    pub starting_gold: i64,
    /// Gold per purchased capacity unit
    pub capacity_unit_cost: i64,
    /// Potions storable per potion-capacity unit
    pub potions_per_capacity_unit: i64,
    /// Ml storable per ml-capacity unit
    pub ml_per_capacity_unit: i64,
    /// Maximum number of skus offered in the catalog at once
    pub catalog_limit: usize,
    /// Price given to recipes created for unseen color mixes
    pub custom_potion_price: i64,
}

impl Default for ShopSettings {
    fn default() -> Self {
        Self {
            starting_gold: 100,
            capacity_unit_cost: 1000,
            potions_per_capacity_unit: 50,
            ml_per_capacity_unit: 10_000,
            catalog_limit: 6,
            custom_potion_price: 50,
        }
    }
}

/// Configuration for a single seeded recipe
#[derive(Debug, Deserialize, Clone)]
pub struct PotionConfig {
    /// Display name
    pub name: String,
    /// Catalog sku
    pub sku: String,
    /// Price per potion in gold
    pub price: i64,
    /// Red, green, blue, dark parts per 100
    pub potion_type: Vec<i32>,
}

/// Parses configuration from a TOML string.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - A field has the wrong type
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;
    parse_config(&contents)
}

/// Loads configuration from `SHOP_CONFIG` (default `./config.toml`).
///
/// A missing file is not an error: the defaults are used instead.
pub fn load_default_config() -> Result<AppConfig> {
    let path = std::env::var("SHOP_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
    if !Path::new(&path).exists() {
        warn!("No config file at {path}, using default shop settings");
        return Ok(AppConfig::default());
    }
    load_config(path)
}
