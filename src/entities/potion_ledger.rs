//! Potion ledger entity - Signed stock changes for a single potion recipe.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Potion ledger database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "potion_ledger")]
pub struct Model {
    /// Unique identifier for the entry
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Recipe whose stock changed
    pub potion_id: i64,
    /// Potions bottled (positive) or sold (negative)
    pub quantity_change: i64,
    /// What caused the change
    pub description: String,
    /// When the entry was appended
    pub created_at: DateTimeUtc,
}

/// Defines relationships between potion ledger entries and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each entry belongs to one potion recipe
    #[sea_orm(
        belongs_to = "super::potion::Entity",
        from = "Column::PotionId",
        to = "super::potion::Column::Id"
    )]
    Potion,
}

impl Related<super::potion::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Potion.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
