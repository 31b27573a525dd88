//! Cart item entity - One potion line inside a cart.
//!
//! `cost` is `price × quantity` as priced when the line was written.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Cart item database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cart_items")]
pub struct Model {
    /// Unique identifier for the line
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Cart this line belongs to
    pub cart_id: i64,
    /// Sku as the customer requested it
    pub item_sku: String,
    /// Resolved potion recipe
    pub potion_id: i64,
    /// Number of potions requested
    pub quantity: i64,
    /// Total gold for this line
    pub cost: i64,
    /// When the line was written
    pub created_at: DateTimeUtc,
}

/// Defines relationships between cart items and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each item belongs to one cart
    #[sea_orm(
        belongs_to = "super::cart::Entity",
        from = "Column::CartId",
        to = "super::cart::Column::Id"
    )]
    Cart,
    /// Each item references one potion
    #[sea_orm(
        belongs_to = "super::potion::Entity",
        from = "Column::PotionId",
        to = "super::potion::Column::Id"
    )]
    Potion,
}

impl Related<super::cart::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cart.def()
    }
}

impl Related<super::potion::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Potion.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
