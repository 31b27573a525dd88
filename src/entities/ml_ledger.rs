//! Ml ledger entity - Per-color volume changes, one row per event.
//!
//! A barrel delivery appends one positive row, bottling appends one negative row
//! per potion type produced.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Ml ledger database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "ml_ledger")]
pub struct Model {
    /// Unique identifier for the entry
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Change in red ml
    pub red_change: i64,
    /// Change in green ml
    pub green_change: i64,
    /// Change in blue ml
    pub blue_change: i64,
    /// Change in dark ml
    pub dark_change: i64,
    /// What caused the change, e.g. `"barrel delivery 12"`
    pub description: String,
    /// When the entry was appended
    pub created_at: DateTimeUtc,
}

/// Ml ledger has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
