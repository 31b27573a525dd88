//! Potion entity - The recipe catalog.
//!
//! Each potion is identified by its color mix (parts per 100 of red, green, blue and
//! dark) and carries the sku and price customers see. Rows are never edited once
//! created; stock lives in the potion ledger.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Potion database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "potions")]
pub struct Model {
    /// Unique identifier for the recipe
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name (e.g. "red potion")
    pub name: String,
    /// Stock keeping unit shown in the catalog
    #[sea_orm(unique)]
    pub sku: String,
    /// Price per potion in gold
    pub price: i64,
    /// Red parts per 100
    pub red: i32,
    /// Green parts per 100
    pub green: i32,
    /// Blue parts per 100
    pub blue: i32,
    /// Dark parts per 100
    pub dark: i32,
}

/// Defines relationships between Potion and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One potion has many ledger entries
    #[sea_orm(has_many = "super::potion_ledger::Entity")]
    LedgerEntries,
    /// One potion appears in many cart items
    #[sea_orm(has_many = "super::cart_item::Entity")]
    CartItems,
}

impl Related<super::potion_ledger::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LedgerEntries.def()
    }
}

impl Related<super::cart_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CartItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
