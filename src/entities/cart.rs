//! Cart entity - A customer's order staged before checkout.
//!
//! `checked_out_at` is empty while the cart is open and set exactly once when the
//! cart is checked out.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Cart database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "carts")]
pub struct Model {
    /// Generated cart identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// When the cart was opened
    pub created_at: DateTimeUtc,
    /// Name the customer gave
    pub customer_name: String,
    /// Customer's character class
    pub character_class: String,
    /// Customer's level
    pub level: i32,
    /// Payment description recorded at checkout
    pub payment: Option<String>,
    /// When the cart was checked out, None while open
    pub checked_out_at: Option<DateTimeUtc>,
}

/// Defines relationships between Cart and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One cart has many items
    #[sea_orm(has_many = "super::cart_item::Entity")]
    Items,
}

impl Related<super::cart_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
