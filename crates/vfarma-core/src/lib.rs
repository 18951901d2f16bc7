//! # vfarma-core: Pure Cart-Pricing Logic
//!
//! This crate holds the pricing and coupon rules of VFarma Checkout as pure
//! functions over plain data. It never sleeps, never touches the network and
//! never reads files.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     VFarma Checkout Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                Presentation layer (out of scope)                │   │
//! │  │        Catalog page ──► Cart drawer ──► Checkout page          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ commands                               │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              vfarma-checkout (apps/checkout)                    │   │
//! │  │     CartStore ──► CouponValidator (async, simulated latency)    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ vfarma-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │  coupon   │  │   │
//! │  │   │  Product  │  │   Money   │  │   Cart    │  │  Table    │  │   │
//! │  │   │  Coupon   │  │ Discount  │  │  Totals   │  │ Approval  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO TIMERS • NO GLOBAL STATE • PURE FUNCTIONS        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, LineItem, Coupon, CouponStatus)
//! - [`money`] - Money and discount rates with integer arithmetic
//! - [`cart`] - The cart, its single coupon slot and derived totals
//! - [`coupon`] - Coupon table lookup and approval messages
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation and code normalization
//!
//! ## Example Usage
//!
//! ```rust
//! use vfarma_core::{Cart, Coupon, DiscountRate, Money, Product};
//!
//! let mut cart = Cart::new();
//! let dipirona = Product::new("4", "Dipirona 500mg", 10_000, false);
//! cart.add_item(&dipirona).unwrap();
//! cart.add_item(&dipirona).unwrap();
//!
//! cart.apply_coupon(Coupon::targeted("NEYMAR20", DiscountRate::from_bps(2000), "4"));
//!
//! assert_eq!(cart.subtotal(), Money::from_cents(20_000));
//! assert_eq!(cart.total(), Money::from_cents(16_000));
//! assert_eq!(cart.discount(), Money::from_cents(4_000));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod coupon;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartTotals};
pub use coupon::{CouponApproval, CouponTable, StaticCouponTable};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{DiscountRate, Money};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Longest coupon code accepted by the table, after normalization.
pub const MAX_COUPON_CODE_LEN: usize = 32;

/// Longest product identifier accepted in the catalog.
pub const MAX_PRODUCT_ID_LEN: usize = 64;

/// Maximum quantity of a single cart line.
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Highest catalog unit price (R$ 1,000,000.00).
///
/// With `MAX_ITEM_QUANTITY` this keeps line totals far inside `i64`.
pub const MAX_PRICE_CENTS: i64 = 100_000_000;
