/// Database configuration and connection management
pub mod database;

/// Shop settings and recipe seeding from config.toml
pub mod shop;
