//! Gold ledger entity - One signed change to the shop's gold per row.
//!
//! Rows are only ever inserted. Current gold is the sum of `quantity_change`
//! over the whole table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Gold ledger database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "gold_ledger")]
pub struct Model {
    /// Unique identifier for the entry
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Gold gained (positive) or spent (negative)
    pub quantity_change: i64,
    /// What caused the change, e.g. `"checkout cart 3"`
    pub description: String,
    /// When the entry was appended
    pub created_at: DateTimeUtc,
}

/// Gold ledger has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
