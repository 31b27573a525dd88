//! Unified error type for the shop.
//!
//! Errors fall into four groups: lookups that found nothing, operations that would
//! overdraw a ledger, malformed input, and infrastructure failures bubbling up from
//! the database or filesystem.

use crate::core::potion_type::Color;
use sea_orm::DbErr;
use thiserror::Error;

/// All errors the shop can produce.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration or free-form input problem
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Underlying database failure
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// Filesystem failure while reading configuration
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No cart with this id
    #[error("Cart {cart_id} not found")]
    CartNotFound {
        /// Requested cart id
        cart_id: i64,
    },

    /// Cart has already been checked out
    #[error("Cart {cart_id} is already checked out")]
    CartAlreadyCheckedOut {
        /// Closed cart id
        cart_id: i64,
    },

    /// Checkout attempted on a cart without items
    #[error("Cart {cart_id} has no items")]
    EmptyCart {
        /// Empty cart id
        cart_id: i64,
    },

    /// No recipe matches the sku or potion type
    #[error("Potion '{key}' not found")]
    PotionNotFound {
        /// Sku or rendered potion type that was looked up
        key: String,
    },

    /// A recipe with this sku already exists
    #[error("Potion with sku '{sku}' already exists")]
    DuplicatePotion {
        /// Conflicting sku
        sku: String,
    },

    /// Not enough gold in the ledger
    #[error("Insufficient gold: have {available}, need {required}")]
    InsufficientGold {
        /// Aggregated gold
        available: i64,
        /// Gold the operation needs
        required: i64,
    },

    /// Not enough ml of one color
    #[error("Insufficient {color} ml: have {available}, need {required}")]
    InsufficientMl {
        /// Color that ran short
        color: Color,
        /// Aggregated ml of that color
        available: i64,
        /// Ml the operation needs
        required: i64,
    },

    /// Not enough bottled potions to fill an order
    #[error("Insufficient stock for {sku}: have {available}, requested {requested}")]
    InsufficientStock {
        /// Potion sku
        sku: String,
        /// Aggregated stock
        available: i64,
        /// Requested quantity
        requested: i64,
    },

    /// Storage ceiling would be exceeded
    #[error("{resource} capacity exceeded: limit {limit}, requested {requested}")]
    CapacityExceeded {
        /// "potion" or "ml"
        resource: String,
        /// Current ceiling
        limit: i64,
        /// Total after the operation
        requested: i64,
    },

    /// Sku is empty, too long, or uses characters outside `A-Z0-9_`
    #[error("Invalid sku: '{sku}'")]
    InvalidSku {
        /// Rejected sku
        sku: String,
    },

    /// Empty or whitespace-only name
    #[error("Invalid name: '{name}'")]
    InvalidName {
        /// Rejected name
        name: String,
    },

    /// Quantity outside the accepted range
    #[error("Invalid quantity: {quantity}")]
    InvalidQuantity {
        /// Rejected quantity
        quantity: i64,
    },

    /// Price outside the accepted range
    #[error("Invalid price: {price}")]
    InvalidPrice {
        /// Rejected price
        price: i64,
    },

    /// Color ratios that are negative or do not sum to the expected total
    #[error("Invalid potion type {components:?}: {reason}")]
    InvalidPotionType {
        /// Components as received
        components: Vec<i32>,
        /// Why they were rejected
        reason: String,
    },
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
