//! # Commands Module
//!
//! Functions the presentation layer calls.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (exports)
//! └── cart.rs     ◄─── Cart manipulation, coupon entry, checkout
//! ```
//!
//! ## Shape
//! Each command borrows only the state it needs and returns a
//! serializable value or an [`ApiError`](crate::error::ApiError):
//! ```rust,ignore
//! // Only needs the cart
//! fn get_cart(cart: &CartStore) -> CartSnapshot
//!
//! // Needs the catalog to resolve the product id
//! fn add_to_cart(catalog: &Catalog, cart: &CartStore, product_id: &str)
//!
//! // Suspends for the coupon lookup
//! async fn apply_coupon(cart: &CartStore, code: &str)
//! ```

pub mod cart;

pub use cart::CouponResponse;
