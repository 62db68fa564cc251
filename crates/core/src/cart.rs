//! The session shopping cart.
//!
//! A [`Cart`] is an explicit value owned by whoever composes the
//! application (the storefront keeps one per session); there is no global
//! cart. It holds at most one line per product, keyed by [`ProductId`],
//! and derives its totals on every read.
//!
//! Policy decisions, also asserted by the test suite:
//!
//! - Re-adding a product already in the cart merges quantities; the newest
//!   customization and price snapshot replace the old ones.
//! - A zero quantity is rejected ([`CartError::ZeroQuantity`]) rather than
//!   clamped; the stored state never changes on rejection.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Customization, ProductId};

/// Errors from cart mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// Quantity must be a positive integer.
    #[error("quantity must be at least 1")]
    ZeroQuantity,

    /// The product has no line in the cart.
    #[error("product {0} is not in the cart")]
    UnknownProduct(ProductId),
}

/// One line in the cart.
///
/// `unit_price` is a snapshot captured when the product was added; it is
/// never recomputed from the catalog, so later catalog price changes do
/// not affect a cart in progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
    pub customization: Customization,
    pub unit_price: Decimal,
}

/// The session-scoped shopping cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    items: BTreeMap<ProductId, CartItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a line, or merge into the existing line for the same product.
    ///
    /// On merge the quantities are summed and the incoming name,
    /// customization, and price snapshot win.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ZeroQuantity`] if `item.quantity` is zero; the
    /// cart is left unchanged.
    pub fn add_item(&mut self, item: CartItem) -> Result<(), CartError> {
        if item.quantity == 0 {
            return Err(CartError::ZeroQuantity);
        }

        match self.items.get_mut(&item.product_id) {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(item.quantity);
                existing.product_name = item.product_name;
                existing.customization = item.customization;
                existing.unit_price = item.unit_price;
            }
            None => {
                self.items.insert(item.product_id, item);
            }
        }

        Ok(())
    }

    /// Remove the line for a product. No-op if the product is absent.
    pub fn remove_item(&mut self, product_id: ProductId) {
        self.items.remove(&product_id);
    }

    /// Set the quantity of an existing line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ZeroQuantity`] for a zero quantity and
    /// [`CartError::UnknownProduct`] if the product has no line; the cart
    /// is left unchanged in both cases.
    pub fn update_quantity(&mut self, product_id: ProductId, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            return Err(CartError::ZeroQuantity);
        }

        let item = self
            .items
            .get_mut(&product_id)
            .ok_or(CartError::UnknownProduct(product_id))?;
        item.quantity = quantity;
        Ok(())
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// The line for a product, if present.
    #[must_use]
    pub fn get(&self, product_id: ProductId) -> Option<&CartItem> {
        self.items.get(&product_id)
    }

    /// The lines, ordered by product id.
    pub fn items(&self) -> impl Iterator<Item = &CartItem> {
        self.items.values()
    }

    /// Number of distinct product lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total unit count across all lines, recomputed on every call.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.items
            .values()
            .map(|item| u64::from(item.quantity))
            .sum()
    }

    /// Total price (`unit_price x quantity` summed over all lines),
    /// recomputed on every call.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.items
            .values()
            .map(|item| item.unit_price * Decimal::from(item.quantity))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(n: u128) -> ProductId {
        ProductId::new(uuid::Uuid::from_u128(n))
    }

    fn line(id: ProductId, name: &str, quantity: u32, pence: i64) -> CartItem {
        CartItem {
            product_id: id,
            product_name: name.to_owned(),
            quantity,
            customization: Customization::new(),
            unit_price: Decimal::new(pence, 2),
        }
    }

    #[test]
    fn test_total_price_recomputed_across_mutations() {
        let mut cart = Cart::new();
        cart.add_item(line(pid(1), "Business Cards", 2, 10_00))
            .expect("add");
        cart.add_item(line(pid(2), "Flyers", 1, 5_50)).expect("add");
        assert_eq!(cart.total_price(), Decimal::new(25_50, 2));
        assert_eq!(cart.total_items(), 3);

        cart.update_quantity(pid(1), 5).expect("update");
        assert_eq!(cart.total_price(), Decimal::new(55_50, 2));
        assert_eq!(cart.total_items(), 6);

        cart.remove_item(pid(2));
        assert_eq!(cart.total_price(), Decimal::new(50_00, 2));
        assert_eq!(cart.total_items(), 5);
    }

    #[test]
    fn test_re_add_merges_quantities_and_newest_snapshot_wins() {
        let mut cart = Cart::new();
        cart.add_item(line(pid(1), "Business Cards", 2, 10_00))
            .expect("add");

        let mut updated = line(pid(1), "Business Cards", 3, 12_00);
        updated
            .customization
            .insert("finishes".to_owned(), "Gloss".into());
        cart.add_item(updated).expect("re-add");

        assert_eq!(cart.len(), 1);
        let item = cart.get(pid(1)).expect("line present");
        assert_eq!(item.quantity, 5);
        assert_eq!(item.unit_price, Decimal::new(12_00, 2));
        assert_eq!(item.customization.get("finishes"), Some(&"Gloss".into()));
        assert_eq!(cart.total_price(), Decimal::new(60_00, 2));
    }

    #[test]
    fn test_zero_quantity_add_rejected() {
        let mut cart = Cart::new();
        let err = cart
            .add_item(line(pid(1), "Flyers", 0, 5_50))
            .expect_err("zero quantity");
        assert_eq!(err, CartError::ZeroQuantity);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_zero_quantity_update_rejected_and_state_unchanged() {
        let mut cart = Cart::new();
        cart.add_item(line(pid(1), "Flyers", 4, 5_50)).expect("add");

        let err = cart.update_quantity(pid(1), 0).expect_err("zero quantity");
        assert_eq!(err, CartError::ZeroQuantity);
        assert_eq!(cart.get(pid(1)).expect("line present").quantity, 4);
    }

    #[test]
    fn test_update_quantity_unknown_product_rejected() {
        let mut cart = Cart::new();
        let err = cart.update_quantity(pid(9), 2).expect_err("unknown product");
        assert_eq!(err, CartError::UnknownProduct(pid(9)));
    }

    #[test]
    fn test_remove_absent_product_is_noop() {
        let mut cart = Cart::new();
        cart.add_item(line(pid(1), "Flyers", 1, 5_50)).expect("add");
        cart.remove_item(pid(9));
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_clear_zeroes_derived_reads() {
        let mut cart = Cart::new();
        cart.add_item(line(pid(1), "Business Cards", 2, 10_00))
            .expect("add");
        cart.add_item(line(pid(2), "Flyers", 1, 5_50)).expect("add");

        cart.clear();

        assert!(cart.is_empty());
        assert_eq!(cart.total_items(), 0);
        assert_eq!(cart.total_price(), Decimal::ZERO);
    }

    #[test]
    fn test_serde_round_trip_for_session_storage() {
        let mut cart = Cart::new();
        let mut item = line(pid(1), "Posters", 3, 7_25);
        item.customization.insert("sizes".to_owned(), "A2".into());
        item.customization.insert("quantities".to_owned(), 250.into());
        cart.add_item(item).expect("add");

        let json = serde_json::to_string(&cart).expect("serialize");
        let back: Cart = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, cart);
        assert_eq!(back.total_price(), Decimal::new(21_75, 2));
    }
}
