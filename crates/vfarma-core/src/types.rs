//! # Domain Types
//!
//! Core domain types used throughout VFarma Checkout.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    LineItem     │   │     Coupon      │       │
//! │  │  ─────────────  │──►│  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  product_id     │   │  code           │       │
//! │  │  name           │   │  unit_price     │   │  rate (bps)     │       │
//! │  │  price          │   │  quantity ≥ 1   │   │  target_id?     │       │
//! │  │  requires_rx    │   │  requires_rx    │   └────────┬────────┘       │
//! │  └─────────────────┘   └─────────────────┘            │                │
//! │                                                        ▼                │
//! │  ┌─────────────────┐   ┌─────────────────────────────────────────┐     │
//! │  │ CheckoutReceipt │   │ CouponStatus: Inactive | Pending | Active│    │
//! │  └─────────────────┘   └─────────────────────────────────────────┘     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::{DiscountRate, Money};

// =============================================================================
// Product
// =============================================================================

/// A catalog item that can be placed in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Opaque product identifier, unique within the catalog.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Unit price (non-negative).
    pub price: Money,

    /// Prescription-only medicine. Set at catalog time.
    #[serde(default)]
    pub requires_prescription: bool,
}

impl Product {
    /// Creates a product with a price in cents.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        price_cents: i64,
        requires_prescription: bool,
    ) -> Self {
        Product {
            id: id.into(),
            name: name.into(),
            price: Money::from_cents(price_cents),
            requires_prescription,
        }
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// An item in the shopping cart.
///
/// ## Invariants
/// - `quantity >= 1`; a line that would drop to zero is removed instead
/// - catalog attributes are copied once, when the product is first added
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItem {
    pub product_id: String,
    pub name: String,
    pub unit_price: Money,
    pub quantity: i64,
    pub requires_prescription: bool,
}

impl LineItem {
    /// Creates a line with quantity 1 from a catalog product.
    pub fn from_product(product: &Product) -> Self {
        LineItem {
            product_id: product.id.clone(),
            name: product.name.clone(),
            unit_price: product.price,
            quantity: 1,
            requires_prescription: product.requires_prescription,
        }
    }

    /// Undiscounted line total (unit price × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price * self.quantity
    }

    /// Unit price after `coupon`, if the coupon covers this product.
    pub fn effective_unit_price(&self, coupon: Option<&Coupon>) -> Money {
        match coupon {
            Some(coupon) if coupon.applies_to(&self.product_id) => {
                self.unit_price.apply_discount(coupon.rate)
            }
            _ => self.unit_price,
        }
    }

    /// Line total after `coupon` (effective unit price × quantity).
    pub fn discounted_line_total(&self, coupon: Option<&Coupon>) -> Money {
        self.effective_unit_price(coupon) * self.quantity
    }
}

// =============================================================================
// Coupon
// =============================================================================

/// A promotional discount rule.
///
/// A coupon without `target_id` is global and discounts every line; a
/// targeted coupon discounts only the line whose product id matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Coupon {
    /// Normalized code (trimmed, upper-case).
    pub code: String,

    /// Discount in basis points, `1..=10000`.
    #[serde(rename = "rate_bps")]
    pub rate: DiscountRate,

    /// Product the coupon is restricted to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_id: Option<String>,
}

impl Coupon {
    /// Creates a coupon that discounts every item in the cart.
    pub fn global(code: impl Into<String>, rate: DiscountRate) -> Self {
        Coupon {
            code: code.into(),
            rate,
            target_id: None,
        }
    }

    /// Creates a coupon restricted to one product.
    pub fn targeted(
        code: impl Into<String>,
        rate: DiscountRate,
        target_id: impl Into<String>,
    ) -> Self {
        Coupon {
            code: code.into(),
            rate,
            target_id: Some(target_id.into()),
        }
    }

    /// True when the coupon applies to every item.
    #[inline]
    pub fn is_global(&self) -> bool {
        self.target_id.is_none()
    }

    /// True when the coupon discounts the given product.
    pub fn applies_to(&self, product_id: &str) -> bool {
        match &self.target_id {
            None => true,
            Some(target) => target == product_id,
        }
    }
}

// =============================================================================
// Coupon Status
// =============================================================================

/// Where the cart's coupon slot stands.
///
/// ```text
///   Inactive ──apply──► Pending ──resolve──► Active
///      ▲                   │                   │
///      └──────reject───────┘                   │
///      └──────clear / cart emptied─────────────┘
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CouponStatus {
    /// No coupon; every item is priced raw.
    #[default]
    Inactive,
    /// A validation request for `code` is outstanding.
    Pending { code: String },
    /// `coupon` is attached to the cart.
    Active { coupon: Coupon },
}

impl CouponStatus {
    /// The attached coupon, when active.
    pub fn active_coupon(&self) -> Option<&Coupon> {
        match self {
            CouponStatus::Active { coupon } => Some(coupon),
            _ => None,
        }
    }
}

// =============================================================================
// Checkout Receipt
// =============================================================================

/// A line on a completed checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReceiptLine {
    pub product_id: String,
    pub name: String,
    pub quantity: i64,
    pub unit_price: Money,
    /// Unit price after the coupon.
    pub effective_unit_price: Money,
    pub line_total: Money,
}

/// Frozen copy of the cart at checkout completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CheckoutReceipt {
    /// Checkout session this receipt closes (UUID v4).
    pub session_id: String,
    pub lines: Vec<ReceiptLine>,
    pub subtotal: Money,
    pub discount: Money,
    pub total: Money,
    /// Code of the coupon that priced this checkout.
    pub coupon_code: Option<String>,
    pub needs_prescription: bool,
    /// When the checkout session opened.
    #[ts(as = "String")]
    pub started_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub completed_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_item_from_product_copies_catalog_attributes() {
        let product = Product::new("7", "Amoxicilina 500mg", 3_490, true);
        let line = LineItem::from_product(&product);

        assert_eq!(line.product_id, "7");
        assert_eq!(line.unit_price, Money::from_cents(3_490));
        assert_eq!(line.quantity, 1);
        assert!(line.requires_prescription);
    }

    #[test]
    fn test_targeted_coupon_only_applies_to_target() {
        let coupon = Coupon::targeted("NEYMAR20", DiscountRate::from_bps(2000), "4");

        assert!(coupon.applies_to("4"));
        assert!(!coupon.applies_to("1"));
        assert!(!coupon.is_global());
    }

    #[test]
    fn test_effective_unit_price() {
        let mut line = LineItem::from_product(&Product::new("1", "Soro", 5_000, false));
        line.quantity = 3;
        let global = Coupon::global("VFARMA10", DiscountRate::from_bps(1000));
        let other = Coupon::targeted("NEYMAR20", DiscountRate::from_bps(2000), "4");

        assert_eq!(line.effective_unit_price(None), Money::from_cents(5_000));
        assert_eq!(line.effective_unit_price(Some(&global)), Money::from_cents(4_500));
        assert_eq!(line.effective_unit_price(Some(&other)), Money::from_cents(5_000));
        assert_eq!(line.discounted_line_total(Some(&global)), Money::from_cents(13_500));
    }

    #[test]
    fn test_coupon_status_serialization() {
        let status = CouponStatus::Pending {
            code: "VIP20".to_string(),
        };
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["state"], "pending");
        assert_eq!(json["code"], "VIP20");

        assert_eq!(CouponStatus::default(), CouponStatus::Inactive);
    }

    #[test]
    fn test_coupon_serializes_rate_in_bps() {
        let coupon = Coupon::global("VFARMA10", DiscountRate::from_bps(1000));
        let json = serde_json::to_value(&coupon).unwrap();

        assert_eq!(json["rate_bps"], 1000);
        assert!(json.get("target_id").is_none());
    }
}
