//! # Cart
//!
//! The shopping cart: line items keyed by product id plus a single coupon
//! slot. Every total is recomputed from the current lines and coupon on each
//! call; nothing is cached.
//!
//! ## Cart Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  add_item(product)        same id? qty += 1  :  push line (qty 1)       │
//! │  update_quantity(id, n)   n <= 0 ──► remove line; n > 999 ──► error     │
//! │  remove_item(id)          delete whole line; cart empty ──► no coupon   │
//! │  clear()                  no lines, no coupon                           │
//! │  apply_coupon(c)          replace the single slot                       │
//! │                                                                         │
//! │  subtotal = Σ unit_price × qty                                         │
//! │  total    = Σ effective_unit_price × qty                               │
//! │  discount = subtotal − total                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreResult;
use crate::money::Money;
use crate::types::{Coupon, LineItem, Product, ReceiptLine};
use crate::validation::validate_quantity;

/// The shopping cart.
///
/// ## Invariants
/// - Items are unique by `product_id` (adding the same product increases quantity)
/// - Every quantity is in `1..=MAX_ITEM_QUANTITY`
/// - The coupon slot is empty whenever the cart became empty through a removal
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<LineItem>,
    coupon: Option<Coupon>,
}

impl Cart {
    /// Creates a new empty cart with no coupon.
    pub fn new() -> Self {
        Cart::default()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Adds one unit of `product`.
    ///
    /// An existing line for the same id gains one unit; its frozen catalog
    /// attributes are kept. Otherwise a new line with quantity 1 is appended.
    ///
    /// ## Errors
    /// `ValidationError::OutOfRange` when the line is already at
    /// [`crate::MAX_ITEM_QUANTITY`]; the cart is left unchanged.
    pub fn add_item(&mut self, product: &Product) -> CoreResult<()> {
        if let Some(item) = self.items.iter_mut().find(|i| i.product_id == product.id) {
            validate_quantity(item.quantity + 1)?;
            item.quantity += 1;
            return Ok(());
        }

        self.items.push(LineItem::from_product(product));
        Ok(())
    }

    /// Sets the quantity of an existing line.
    ///
    /// A quantity of zero or less removes the line. Returns `false` when no
    /// line has that id.
    ///
    /// ## Errors
    /// `ValidationError::OutOfRange` above [`crate::MAX_ITEM_QUANTITY`].
    pub fn update_quantity(&mut self, product_id: &str, quantity: i64) -> CoreResult<bool> {
        if quantity <= 0 {
            return Ok(self.remove_item(product_id));
        }

        validate_quantity(quantity)?;

        match self.items.iter_mut().find(|i| i.product_id == product_id) {
            Some(item) => {
                item.quantity = quantity;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Removes the whole line for `product_id`. Returns `false` when absent.
    ///
    /// Emptying the cart also empties the coupon slot.
    pub fn remove_item(&mut self, product_id: &str) -> bool {
        let initial_len = self.items.len();
        self.items.retain(|i| i.product_id != product_id);

        if self.items.is_empty() {
            self.coupon = None;
        }

        self.items.len() != initial_len
    }

    /// Removes every line and the coupon.
    pub fn clear(&mut self) {
        self.items.clear();
        self.coupon = None;
    }

    /// Puts `coupon` in the slot, returning the one it replaced.
    pub fn apply_coupon(&mut self, coupon: Coupon) -> Option<Coupon> {
        self.coupon.replace(coupon)
    }

    /// Empties the coupon slot, returning what was there.
    pub fn clear_coupon(&mut self) -> Option<Coupon> {
        self.coupon.take()
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Lines in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// The line for `product_id`, if present.
    pub fn get(&self, product_id: &str) -> Option<&LineItem> {
        self.items.iter().find(|i| i.product_id == product_id)
    }

    /// The active coupon, if any.
    pub fn coupon(&self) -> Option<&Coupon> {
        self.coupon.as_ref()
    }

    /// Returns the number of unique lines in the cart.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Returns the total quantity of all lines.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Undiscounted sum of `unit_price × quantity`.
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(LineItem::line_total).sum()
    }

    /// Sum of `effective_unit_price × quantity` under the active coupon.
    pub fn total(&self) -> Money {
        let coupon = self.coupon.as_ref();
        self.items
            .iter()
            .map(|i| i.discounted_line_total(coupon))
            .sum()
    }

    /// `subtotal − total`; zero without a coupon.
    pub fn discount(&self) -> Money {
        self.subtotal() - self.total()
    }

    /// True when any line is prescription-only.
    pub fn needs_prescription(&self) -> bool {
        self.items.iter().any(|i| i.requires_prescription)
    }

    /// Priced lines for a receipt.
    pub fn receipt_lines(&self) -> Vec<ReceiptLine> {
        let coupon = self.coupon.as_ref();
        self.items
            .iter()
            .map(|i| ReceiptLine {
                product_id: i.product_id.clone(),
                name: i.name.clone(),
                quantity: i.quantity,
                unit_price: i.unit_price,
                effective_unit_price: i.effective_unit_price(coupon),
                line_total: i.discounted_line_total(coupon),
            })
            .collect()
    }
}

/// Cart totals summary for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartTotals {
    pub item_count: usize,
    pub total_quantity: i64,
    pub subtotal: Money,
    pub discount: Money,
    pub total: Money,
    pub needs_prescription: bool,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        let subtotal = cart.subtotal();
        let total = cart.total();

        CartTotals {
            item_count: cart.item_count(),
            total_quantity: cart.total_quantity(),
            subtotal,
            discount: subtotal - total,
            total,
            needs_prescription: cart.needs_prescription(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CoreError, ValidationError};
    use crate::money::DiscountRate;
    use crate::MAX_ITEM_QUANTITY;

    fn product(id: &str, price_cents: i64) -> Product {
        Product::new(id, format!("Product {}", id), price_cents, false)
    }

    fn vfarma10() -> Coupon {
        Coupon::global("VFARMA10", DiscountRate::from_bps(1000))
    }

    fn neymar20() -> Coupon {
        Coupon::targeted("NEYMAR20", DiscountRate::from_bps(2000), "4")
    }

    #[test]
    fn test_cart_add_item() {
        let mut cart = Cart::new();
        cart.add_item(&product("1", 999)).unwrap();

        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.total_quantity(), 1);
        assert_eq!(cart.subtotal(), Money::from_cents(999));
    }

    #[test]
    fn test_cart_add_same_product_increases_quantity() {
        let mut cart = Cart::new();
        let p = product("1", 999);

        cart.add_item(&p).unwrap();
        cart.add_item(&p).unwrap();

        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.get("1").map(|i| i.quantity), Some(2));
    }

    #[test]
    fn test_add_keeps_frozen_price() {
        let mut cart = Cart::new();
        cart.add_item(&product("1", 1_000)).unwrap();
        cart.add_item(&product("1", 5_000)).unwrap();

        assert_eq!(cart.get("1").map(|i| i.unit_price), Some(Money::from_cents(1_000)));
        assert_eq!(cart.subtotal(), Money::from_cents(2_000));
    }

    #[test]
    fn test_subtotal_tracks_every_mutation() {
        let mut cart = Cart::new();
        cart.add_item(&product("1", 5_000)).unwrap();
        cart.add_item(&product("2", 1_250)).unwrap();
        cart.add_item(&product("2", 1_250)).unwrap();
        assert_eq!(cart.subtotal(), Money::from_cents(7_500));

        cart.remove_item("1");
        assert_eq!(cart.subtotal(), Money::from_cents(2_500));

        cart.update_quantity("2", 5).unwrap();
        assert_eq!(cart.subtotal(), Money::from_cents(6_250));

        cart.remove_item("missing");
        assert_eq!(cart.subtotal(), Money::from_cents(6_250));
    }

    #[test]
    fn test_remove_deletes_whole_line() {
        let mut cart = Cart::new();
        let p = product("1", 999);
        cart.add_item(&p).unwrap();
        cart.add_item(&p).unwrap();
        cart.add_item(&product("2", 100)).unwrap();

        assert!(cart.remove_item("1"));
        assert!(cart.get("1").is_none());
        assert!(!cart.remove_item("1"));
    }

    #[test]
    fn test_removing_last_item_clears_coupon() {
        let mut cart = Cart::new();
        cart.add_item(&product("1", 5_000)).unwrap();
        cart.apply_coupon(vfarma10());

        cart.remove_item("1");

        assert!(cart.is_empty());
        assert!(cart.coupon().is_none());
        assert_eq!(cart.total(), cart.subtotal());
    }

    #[test]
    fn test_removing_non_last_item_keeps_coupon() {
        let mut cart = Cart::new();
        cart.add_item(&product("1", 5_000)).unwrap();
        cart.add_item(&product("4", 10_000)).unwrap();
        cart.apply_coupon(vfarma10());

        cart.remove_item("1");

        assert_eq!(cart.coupon(), Some(&vfarma10()));
    }

    #[test]
    fn test_update_quantity_to_zero_removes_line() {
        let mut cart = Cart::new();
        cart.add_item(&product("1", 5_000)).unwrap();
        cart.apply_coupon(vfarma10());

        assert!(cart.update_quantity("1", 0).unwrap());

        assert!(cart.is_empty());
        assert!(cart.coupon().is_none());
        assert!(!cart.update_quantity("1", 3).unwrap());
    }

    #[test]
    fn test_cart_clear() {
        let mut cart = Cart::new();
        cart.add_item(&product("1", 999)).unwrap();
        cart.apply_coupon(vfarma10());

        cart.clear();

        assert!(cart.is_empty());
        assert!(cart.coupon().is_none());
    }

    #[test]
    fn test_targeted_coupon_scenario() {
        let mut cart = Cart::new();
        let p = product("4", 10_000);
        cart.add_item(&p).unwrap();
        cart.add_item(&p).unwrap();

        cart.apply_coupon(neymar20());

        assert_eq!(cart.subtotal(), Money::from_cents(20_000));
        assert_eq!(cart.total(), Money::from_cents(16_000));
        assert_eq!(cart.discount(), Money::from_cents(4_000));
    }

    #[test]
    fn test_targeted_coupon_leaves_other_items_at_full_price() {
        let mut cart = Cart::new();
        cart.add_item(&product("1", 5_000)).unwrap();
        cart.add_item(&product("4", 10_000)).unwrap();

        cart.apply_coupon(neymar20());

        assert_eq!(cart.total(), Money::from_cents(5_000 + 8_000));
        let lines = cart.receipt_lines();
        assert_eq!(lines[0].effective_unit_price, lines[0].unit_price);
        assert_eq!(lines[1].effective_unit_price, Money::from_cents(8_000));
    }

    #[test]
    fn test_global_coupon_scenario() {
        let mut cart = Cart::new();
        cart.add_item(&product("1", 5_000)).unwrap();
        cart.add_item(&product("4", 10_000)).unwrap();

        cart.apply_coupon(vfarma10());

        assert_eq!(cart.total(), Money::from_cents(4_500 + 9_000));
        assert_eq!(cart.discount(), Money::from_cents(1_500));
    }

    #[test]
    fn test_global_coupon_reduces_total_by_rate() {
        let mut cart = Cart::new();
        cart.add_item(&product("1", 2_000)).unwrap();
        cart.add_item(&product("2", 3_000)).unwrap();
        cart.add_item(&product("2", 3_000)).unwrap();

        cart.apply_coupon(Coupon::global("VIP20", DiscountRate::from_bps(2000)));

        // subtotal 80.00 × (1 − 0.2)
        assert_eq!(cart.total(), Money::from_cents(6_400));
    }

    #[test]
    fn test_apply_coupon_replaces_slot() {
        let mut cart = Cart::new();
        cart.add_item(&product("4", 10_000)).unwrap();

        assert_eq!(cart.apply_coupon(vfarma10()), None);
        assert_eq!(cart.apply_coupon(neymar20()), Some(vfarma10()));
        assert_eq!(cart.total(), Money::from_cents(8_000));
    }

    #[test]
    fn test_needs_prescription() {
        let mut cart = Cart::new();
        cart.add_item(&product("1", 999)).unwrap();
        assert!(!cart.needs_prescription());

        cart.add_item(&Product::new("9", "Rivotril 2mg", 2_590, true)).unwrap();
        assert!(cart.needs_prescription());

        cart.remove_item("9");
        assert!(!cart.needs_prescription());
    }

    #[test]
    fn test_totals_summary() {
        let mut cart = Cart::new();
        cart.add_item(&product("1", 5_000)).unwrap();
        cart.add_item(&product("4", 10_000)).unwrap();
        cart.add_item(&product("4", 10_000)).unwrap();
        cart.apply_coupon(neymar20());

        let totals = CartTotals::from(&cart);

        assert_eq!(totals.item_count, 2);
        assert_eq!(totals.total_quantity, 3);
        assert_eq!(totals.subtotal, Money::from_cents(25_000));
        assert_eq!(totals.total, Money::from_cents(21_000));
        assert_eq!(totals.discount, Money::from_cents(4_000));
        assert!(!totals.needs_prescription);
    }

    #[test]
    fn test_update_quantity_above_limit_rejected() {
        let mut cart = Cart::new();
        cart.add_item(&product("1", 5_000)).unwrap();

        let err = cart.update_quantity("1", i64::MAX / 2).unwrap_err();

        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::OutOfRange { .. })
        ));
        assert_eq!(cart.get("1").map(|i| i.quantity), Some(1));
        assert_eq!(cart.subtotal(), Money::from_cents(5_000));
    }

    #[test]
    fn test_add_item_stops_at_limit() {
        let mut cart = Cart::new();
        let p = product("1", 100);
        cart.add_item(&p).unwrap();
        assert!(cart.update_quantity("1", MAX_ITEM_QUANTITY).unwrap());

        assert!(cart.add_item(&p).is_err());
        assert_eq!(cart.total_quantity(), MAX_ITEM_QUANTITY);
        assert_eq!(cart.subtotal(), Money::from_cents(100 * MAX_ITEM_QUANTITY));
    }
}
