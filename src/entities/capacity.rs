//! Capacity entity - Single row holding the purchased storage multipliers.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Capacity database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "capacity")]
pub struct Model {
    /// Always 1
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    /// Potion storage units owned
    pub potion_capacity: i64,
    /// Ml storage units owned
    pub ml_capacity: i64,
}

/// `Capacity` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
