//! Entity module - Contains all SeaORM entity definitions for the database.
//! The three ledgers are append-only; potions, carts and capacity hold the
//! state that is not derived from ledger sums.

pub mod capacity;
pub mod cart;
pub mod cart_item;
pub mod gold_ledger;
pub mod ml_ledger;
pub mod potion;
pub mod potion_ledger;

// Re-export specific types to avoid conflicts
pub use capacity::{Column as CapacityColumn, Entity as Capacity, Model as CapacityModel};
pub use cart::{Column as CartColumn, Entity as Cart, Model as CartModel};
pub use cart_item::{Column as CartItemColumn, Entity as CartItem, Model as CartItemModel};
pub use gold_ledger::{
    Column as GoldLedgerColumn, Entity as GoldLedger, Model as GoldLedgerModel,
};
pub use ml_ledger::{Column as MlLedgerColumn, Entity as MlLedger, Model as MlLedgerModel};
pub use potion::{Column as PotionColumn, Entity as Potion, Model as PotionModel};
pub use potion_ledger::{
    Column as PotionLedgerColumn, Entity as PotionLedger, Model as PotionLedgerModel,
};
