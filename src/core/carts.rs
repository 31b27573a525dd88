//! Cart business logic - Staging customer orders and checking them out.
//!
//! A cart is a database row keyed by a generated id. Items are priced against the recipe
//! catalog when they are written. Checkout is the only step that touches the ledgers:
//! it debits potion stock per item and credits the total gold, then closes the cart.

use crate::{
    core::{ledger, potion},
    entities::{Cart, CartItem, cart, cart_item},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// Who is shopping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Name the customer gave
    pub customer_name: String,
    /// Character class
    pub character_class: String,
    /// Character level
    pub level: i32,
}

/// Result of a successful checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutReceipt {
    /// Potions that left the shop
    pub total_potions_bought: i64,
    /// Gold credited to the ledger
    pub total_gold_paid: i64,
}

/// Opens a new, empty cart and returns its id.
pub async fn create_cart(db: &DatabaseConnection, customer: Customer) -> Result<i64> {
    if customer.customer_name.trim().is_empty() {
        return Err(Error::InvalidName {
            name: customer.customer_name,
        });
    }

    let cart = cart::ActiveModel {
        created_at: Set(Utc::now()),
        customer_name: Set(customer.customer_name.trim().to_string()),
        character_class: Set(customer.character_class),
        level: Set(customer.level),
        payment: Set(None),
        checked_out_at: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(cart_id = cart.id, customer = %cart.customer_name, "cart created");
    Ok(cart.id)
}

/// Finds a cart by id.
pub async fn get_cart<C>(db: &C, cart_id: i64) -> Result<Option<cart::Model>>
where
    C: ConnectionTrait,
{
    Cart::find_by_id(cart_id).one(db).await.map_err(Into::into)
}

async fn require_open_cart<C>(db: &C, cart_id: i64) -> Result<cart::Model>
where
    C: ConnectionTrait,
{
    let cart = get_cart(db, cart_id)
        .await?
        .ok_or(Error::CartNotFound { cart_id })?;
    if cart.checked_out_at.is_some() {
        return Err(Error::CartAlreadyCheckedOut { cart_id });
    }
    Ok(cart)
}

/// Retrieves the items of a cart in the order they were added.
pub async fn get_cart_items<C>(db: &C, cart_id: i64) -> Result<Vec<cart_item::Model>>
where
    C: ConnectionTrait,
{
    CartItem::find()
        .filter(cart_item::Column::CartId.eq(cart_id))
        .order_by_asc(cart_item::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Sets how many of `item_sku` the cart holds.
///
/// A quantity of zero removes the line. Any earlier line for the same sku is replaced, and
/// the line's cost is priced from the catalog now.
///
/// # Errors
/// Returns an error if:
/// - The quantity is negative, or its cost overflows
/// - The sku is malformed or not in the catalog
/// - The cart does not exist or is already checked out
pub async fn set_item_quantity(
    db: &DatabaseConnection,
    cart_id: i64,
    item_sku: &str,
    quantity: i64,
) -> Result<Option<cart_item::Model>> {
    if quantity < 0 {
        return Err(Error::InvalidQuantity { quantity });
    }
    potion::validate_sku(item_sku)?;

    let txn = db.begin().await?;
    require_open_cart(&txn, cart_id).await?;
    let recipe = potion::get_potion_by_sku(&txn, item_sku)
        .await?
        .ok_or_else(|| Error::PotionNotFound {
            key: item_sku.to_string(),
        })?;

    let cost = recipe
        .price
        .checked_mul(quantity)
        .ok_or(Error::InvalidQuantity { quantity })?;

    CartItem::delete_many()
        .filter(cart_item::Column::CartId.eq(cart_id))
        .filter(cart_item::Column::ItemSku.eq(item_sku))
        .exec(&txn)
        .await?;

    let item = if quantity == 0 {
        None
    } else {
        let model = cart_item::ActiveModel {
            cart_id: Set(cart_id),
            item_sku: Set(item_sku.to_string()),
            potion_id: Set(recipe.id),
            quantity: Set(quantity),
            cost: Set(cost),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        Some(model)
    };
    txn.commit().await?;

    Ok(item)
}

/// Checks out a cart.
///
/// Stock is re-read inside the transaction before anything is debited, so an item that
/// sold out after it was added fails the whole checkout.
///
/// # Errors
/// Returns an error if:
/// - The cart does not exist, is already checked out, or has no items
/// - Any item's potion has less stock than requested
/// - The cart total overflows
/// - The database write fails
#[instrument(skip(db, payment))]
pub async fn checkout(
    db: &DatabaseConnection,
    cart_id: i64,
    payment: &str,
) -> Result<CheckoutReceipt> {
    let txn = db.begin().await?;

    let cart = require_open_cart(&txn, cart_id).await?;
    let items = get_cart_items(&txn, cart_id).await?;
    if items.is_empty() {
        return Err(Error::EmptyCart { cart_id });
    }

    for item in &items {
        let available = ledger::stock_for_potion(&txn, item.potion_id).await?;
        if available < item.quantity {
            return Err(Error::InsufficientStock {
                sku: item.item_sku.clone(),
                available,
                requested: item.quantity,
            });
        }
    }

    let description = format!("checkout cart {cart_id}");
    let mut receipt = CheckoutReceipt {
        total_potions_bought: 0,
        total_gold_paid: 0,
    };
    for item in &items {
        receipt.total_potions_bought = receipt
            .total_potions_bought
            .checked_add(item.quantity)
            .ok_or(Error::InvalidQuantity {
                quantity: item.quantity,
            })?;
        receipt.total_gold_paid = receipt
            .total_gold_paid
            .checked_add(item.cost)
            .ok_or(Error::InvalidPrice { price: item.cost })?;
        ledger::record_potion_change(&txn, item.potion_id, -item.quantity, description.clone())
            .await?;
    }
    ledger::record_gold_change(&txn, receipt.total_gold_paid, description).await?;

    let mut closed: cart::ActiveModel = cart.into();
    closed.payment = Set(Some(payment.to_string()));
    closed.checked_out_at = Set(Some(Utc::now()));
    closed.update(&txn).await?;

    txn.commit().await?;

    info!(?receipt, "cart checked out");
    Ok(receipt)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_create_cart_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();
        let mut customer = test_customer();
        customer.customer_name = "   ".to_string();

        let result = create_cart(&db, customer).await;
        assert!(matches!(result, Err(Error::InvalidName { name }) if name == "   "));
        Ok(())
    }

    #[tokio::test]
    async fn test_create_cart_generates_distinct_ids() -> Result<()> {
        let db = setup_test_db().await?;

        let first = create_cart(&db, test_customer()).await?;
        let second = create_cart(&db, test_customer()).await?;
        assert_ne!(first, second);

        let cart = get_cart(&db, first).await?.unwrap();
        assert_eq!(cart.customer_name, "Scaramouche");
        assert!(cart.checked_out_at.is_none());
        assert!(get_cart_items(&db, first).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_set_item_quantity_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let result = set_item_quantity(&db, 1, "RED_POTION", -1).await;
        assert!(matches!(result, Err(Error::InvalidQuantity { quantity: -1 })));

        let result = set_item_quantity(&db, 1, "red potion", 1).await;
        assert!(matches!(result, Err(Error::InvalidSku { sku: _ })));
        Ok(())
    }

    #[tokio::test]
    async fn test_set_item_quantity_unknown_cart_or_sku() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_potion(&db, "RED_POTION", [100, 0, 0, 0]).await?;

        let result = set_item_quantity(&db, 42, "RED_POTION", 1).await;
        assert!(matches!(result, Err(Error::CartNotFound { cart_id: 42 })));

        let cart_id = create_cart(&db, test_customer()).await?;
        let result = set_item_quantity(&db, cart_id, "BLUE_POTION", 1).await;
        assert!(matches!(result, Err(Error::PotionNotFound { key }) if key == "BLUE_POTION"));
        Ok(())
    }

    #[tokio::test]
    async fn test_set_item_quantity_prices_and_replaces() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_potion(&db, "RED_POTION", [100, 0, 0, 0]).await?;
        let cart_id = create_cart(&db, test_customer()).await?;

        let item = set_item_quantity(&db, cart_id, "RED_POTION", 2).await?.unwrap();
        assert_eq!(item.quantity, 2);
        assert_eq!(item.cost, 100);

        set_item_quantity(&db, cart_id, "RED_POTION", 3).await?;
        let items = get_cart_items(&db, cart_id).await?;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 3);
        assert_eq!(items[0].cost, 150);

        let removed = set_item_quantity(&db, cart_id, "RED_POTION", 0).await?;
        assert!(removed.is_none());
        assert!(get_cart_items(&db, cart_id).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_set_item_quantity_rejects_overflowing_cost() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_potion(&db, "RED_POTION", [100, 0, 0, 0]).await?;
        let cart_id = create_cart(&db, test_customer()).await?;
        set_item_quantity(&db, cart_id, "RED_POTION", 1).await?;

        let result = set_item_quantity(&db, cart_id, "RED_POTION", i64::MAX / 10).await;
        assert!(matches!(result, Err(Error::InvalidQuantity { .. })));

        // The earlier line is untouched
        let items = get_cart_items(&db, cart_id).await?;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].cost, 50);
        Ok(())
    }

    #[tokio::test]
    async fn test_checkout_rejects_overflowing_total() -> Result<()> {
        let db = setup_test_db().await?;
        let price = i64::MAX / 2 + 1;
        let red = create_custom_potion(&db, "RED_POTION", price, [100, 0, 0, 0]).await?;
        let blue = create_custom_potion(&db, "BLUE_POTION", price, [0, 0, 100, 0]).await?;
        seed_stock(&db, red.id, 1).await?;
        seed_stock(&db, blue.id, 1).await?;

        let cart_id = create_cart(&db, test_customer()).await?;
        set_item_quantity(&db, cart_id, "RED_POTION", 1).await?;
        set_item_quantity(&db, cart_id, "BLUE_POTION", 1).await?;

        let result = checkout(&db, cart_id, "gold").await;
        assert!(matches!(result, Err(Error::InvalidPrice { .. })));
        assert_eq!(ledger::stock_for_potion(&db, red.id).await?, 1);
        assert_eq!(ledger::current_gold(&db).await?, 0);
        assert!(get_cart(&db, cart_id).await?.unwrap().checked_out_at.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_checkout_missing_or_empty_cart() -> Result<()> {
        let db = setup_test_db().await?;

        let result = checkout(&db, 7, "gold").await;
        assert!(matches!(result, Err(Error::CartNotFound { cart_id: 7 })));

        let cart_id = create_cart(&db, test_customer()).await?;
        let result = checkout(&db, cart_id, "gold").await;
        assert!(matches!(result, Err(Error::EmptyCart { cart_id: id }) if id == cart_id));
        Ok(())
    }

    #[tokio::test]
    async fn test_checkout_books_ledgers_and_closes_cart() -> Result<()> {
        let db = setup_test_db().await?;
        let red = create_test_potion(&db, "RED_POTION", [100, 0, 0, 0]).await?;
        let green = create_custom_potion(&db, "GREEN_POTION", 35, [0, 100, 0, 0]).await?;
        seed_stock(&db, red.id, 5).await?;
        seed_stock(&db, green.id, 5).await?;
        ledger::record_gold_change(&db, 100, "reset").await?;

        let cart_id = create_cart(&db, test_customer()).await?;
        set_item_quantity(&db, cart_id, "RED_POTION", 2).await?;
        set_item_quantity(&db, cart_id, "GREEN_POTION", 3).await?;

        let receipt = checkout(&db, cart_id, "cash").await?;
        assert_eq!(
            receipt,
            CheckoutReceipt {
                total_potions_bought: 5,
                total_gold_paid: 2 * 50 + 3 * 35
            }
        );

        assert_eq!(ledger::current_gold(&db).await?, 100 + 205);
        assert_eq!(ledger::stock_for_potion(&db, red.id).await?, 3);
        assert_eq!(ledger::stock_for_potion(&db, green.id).await?, 2);

        let cart = get_cart(&db, cart_id).await?.unwrap();
        assert_eq!(cart.payment.as_deref(), Some("cash"));
        assert!(cart.checked_out_at.is_some());

        // Closed carts accept neither new items nor a second checkout
        let result = set_item_quantity(&db, cart_id, "RED_POTION", 1).await;
        assert!(matches!(result, Err(Error::CartAlreadyCheckedOut { .. })));
        let result = checkout(&db, cart_id, "cash").await;
        assert!(matches!(result, Err(Error::CartAlreadyCheckedOut { .. })));
        assert_eq!(ledger::current_gold(&db).await?, 305);
        Ok(())
    }

    #[tokio::test]
    async fn test_checkout_rejects_oversold_items() -> Result<()> {
        let db = setup_test_db().await?;
        let red = create_test_potion(&db, "RED_POTION", [100, 0, 0, 0]).await?;
        seed_stock(&db, red.id, 1).await?;

        let cart_id = create_cart(&db, test_customer()).await?;
        set_item_quantity(&db, cart_id, "RED_POTION", 2).await?;

        let result = checkout(&db, cart_id, "gold").await;
        assert!(matches!(
            result,
            Err(Error::InsufficientStock {
                sku: _,
                available: 1,
                requested: 2
            })
        ));
        assert_eq!(ledger::stock_for_potion(&db, red.id).await?, 1);
        assert_eq!(ledger::current_gold(&db).await?, 0);
        assert!(get_cart(&db, cart_id).await?.unwrap().checked_out_at.is_none());
        Ok(())
    }
}
