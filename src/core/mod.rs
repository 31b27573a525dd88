/// Admin reset and first-run bootstrap
pub mod admin;
/// Wholesale barrel planning and delivery
pub mod barrels;
/// Bottling plans and delivery
pub mod bottler;
/// Storage capacity units
pub mod capacity;
/// Customer carts and checkout
pub mod carts;
/// Customer-facing catalog
pub mod catalog;
/// Inventory audit
pub mod inventory;
/// Gold, ml and potion ledgers
pub mod ledger;
/// Potion recipe management
pub mod potion;
/// Colors, potion mixes and ml totals
pub mod potion_type;
