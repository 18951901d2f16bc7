//! # Cart Commands
//!
//! Cart manipulation and coupon entry.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Empty   │────►│ In Cart  │────►│  Coupon  │────►│ Receipt  │       │
//! │  │  Cart    │     │          │     │ (1.5s)   │     │          │       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │                        │                 │                │             │
//! │                   add_to_cart       apply_coupon   complete_checkout    │
//! │                   update_cart_item                        │             │
//! │                   remove_from_cart                        │             │
//! │                        │                                  │             │
//! │                        ▼                                  ▼             │
//! │                   clear_cart ─────────────────────► (new session)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;
use vfarma_core::{CheckoutReceipt, CouponApproval};

use crate::error::ApiError;
use crate::state::{CartSnapshot, CartStore, Catalog};

/// Confirmation shown after a coupon is accepted.
///
/// ```json
/// { "message": "10% discount applied!", "percent": 10.0, "targetId": null }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponResponse {
    pub message: String,
    /// Discount in percent (`10.0` for 10%).
    pub percent: f64,
    pub target_id: Option<String>,
}

impl From<CouponApproval> for CouponResponse {
    fn from(approval: CouponApproval) -> Self {
        CouponResponse {
            percent: approval.coupon.rate.percentage(),
            target_id: approval.coupon.target_id,
            message: approval.message,
        }
    }
}

/// Gets the current cart contents, totals and coupon state.
pub fn get_cart(cart: &CartStore) -> CartSnapshot {
    debug!("get_cart command");
    cart.snapshot()
}

/// Adds one unit of a catalog product.
///
/// ## Behavior
/// - Already in cart: quantity increases by one
/// - Not in cart: added with quantity 1
/// - Price and prescription flag are copied at the time of adding
pub fn add_to_cart(
    catalog: &Catalog,
    cart: &CartStore,
    product_id: &str,
) -> Result<CartSnapshot, ApiError> {
    debug!(product_id = %product_id, "add_to_cart command");

    let product = catalog
        .get(product_id)
        .ok_or_else(|| ApiError::not_found("Product", product_id))?;

    cart.add_to_cart(product)?;
    Ok(cart.snapshot())
}

/// Sets the quantity of a line. Zero or less removes it.
///
/// ## Errors
/// `VALIDATION_ERROR` above the per-line quantity limit.
pub fn update_cart_item(
    cart: &CartStore,
    product_id: &str,
    quantity: i64,
) -> Result<CartSnapshot, ApiError> {
    debug!(product_id = %product_id, quantity = %quantity, "update_cart_item command");
    cart.update_cart_item(product_id, quantity)?;
    Ok(cart.snapshot())
}

/// Removes a line. Unknown ids are a no-op.
pub fn remove_from_cart(cart: &CartStore, product_id: &str) -> CartSnapshot {
    debug!(product_id = %product_id, "remove_from_cart command");
    cart.remove_from_cart(product_id);
    cart.snapshot()
}

/// Empties the cart and starts a new checkout session.
pub fn clear_cart(cart: &CartStore) -> CartSnapshot {
    debug!("clear_cart command");
    cart.clear_cart();
    cart.snapshot()
}

/// Validates and applies a coupon code.
///
/// ## User Workflow
/// ```text
/// Type " vfarma10 " ──► apply_coupon ──► (1.5s, cart stays usable)
///                                            │
///                    ┌───────────────────────┴──────────────────┐
///                    ▼                                          ▼
///  { message: "10% discount applied!",        { code: "COUPON_REJECTED",
///    percent: 10.0, targetId: null }             message: "Coupon invalid or expired." }
/// ```
pub async fn apply_coupon(cart: &CartStore, code: &str) -> Result<CouponResponse, ApiError> {
    debug!(code = %code, "apply_coupon command");
    let approval = cart.apply_coupon(code).await?;
    Ok(CouponResponse::from(approval))
}

/// Closes the checkout and returns its receipt.
pub fn complete_checkout(cart: &CartStore) -> Result<CheckoutReceipt, ApiError> {
    debug!("complete_checkout command");
    Ok(cart.complete_checkout()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use vfarma_core::{CouponStatus, Money};

    use crate::error::ErrorCode;
    use crate::validator::CouponValidator;

    fn setup() -> (Catalog, CartStore) {
        (
            Catalog::pharmacy(),
            CartStore::new(CouponValidator::builtin(Duration::ZERO)),
        )
    }

    #[test]
    fn test_add_unknown_product() {
        let (catalog, cart) = setup();

        let err = add_to_cart(&catalog, &cart, "999").unwrap_err();

        assert_eq!(err.code, ErrorCode::NotFound);
        assert!(get_cart(&cart).items.is_empty());
    }

    #[test]
    fn test_cart_commands_return_fresh_snapshot() {
        let (catalog, cart) = setup();

        add_to_cart(&catalog, &cart, "4").unwrap();
        let snapshot = add_to_cart(&catalog, &cart, "4").unwrap();
        assert_eq!(snapshot.items[0].quantity, 2);
        assert_eq!(snapshot.totals.subtotal, Money::from_cents(20_000));

        let snapshot = update_cart_item(&cart, "4", 5).unwrap();
        assert_eq!(snapshot.totals.total_quantity, 5);

        let snapshot = remove_from_cart(&cart, "4");
        assert!(snapshot.items.is_empty());
    }

    #[tokio::test]
    async fn test_apply_coupon_response() {
        let (catalog, cart) = setup();
        add_to_cart(&catalog, &cart, "4").unwrap();

        let response = apply_coupon(&cart, "neymar20").await.unwrap();

        assert_eq!(response.message, "20% discount applied to the promoted product!");
        assert!((response.percent - 20.0).abs() < f64::EPSILON);
        assert_eq!(response.target_id.as_deref(), Some("4"));
        assert_eq!(get_cart(&cart).totals.total, Money::from_cents(8_000));
    }

    #[tokio::test]
    async fn test_apply_coupon_rejected() {
        let (catalog, cart) = setup();
        add_to_cart(&catalog, &cart, "1").unwrap();
        apply_coupon(&cart, "VIP20").await.unwrap();

        let err = apply_coupon(&cart, "XYZ").await.unwrap_err();

        assert_eq!(err.code, ErrorCode::CouponRejected);
        assert_eq!(err.message, "Coupon invalid or expired.");
        assert_eq!(get_cart(&cart).coupon, CouponStatus::Inactive);
    }

    #[test]
    fn test_oversized_quantity_is_a_validation_error() {
        let (catalog, cart) = setup();
        add_to_cart(&catalog, &cart, "1").unwrap();

        let err = update_cart_item(&cart, "1", i64::MAX / 2).unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "quantity must be between 1 and 999");
        assert_eq!(get_cart(&cart).totals.total_quantity, 1);
    }

    #[test]
    fn test_checkout_empty_cart() {
        let (_, cart) = setup();
        let err = complete_checkout(&cart).unwrap_err();
        assert_eq!(err.code, ErrorCode::CartError);
    }

    #[test]
    fn test_checkout_and_clear() {
        let (catalog, cart) = setup();
        add_to_cart(&catalog, &cart, "1").unwrap();
        add_to_cart(&catalog, &cart, "5").unwrap();

        let receipt = complete_checkout(&cart).unwrap();
        assert!(receipt.needs_prescription);
        assert_eq!(receipt.total, receipt.subtotal);

        add_to_cart(&catalog, &cart, "2").unwrap();
        let snapshot = clear_cart(&cart);
        assert!(snapshot.items.is_empty());
        assert_ne!(snapshot.session_id.to_string(), receipt.session_id);
    }

    #[test]
    fn test_snapshot_json_shape() {
        let (catalog, cart) = setup();
        add_to_cart(&catalog, &cart, "1").unwrap();

        let json = serde_json::to_value(get_cart(&cart)).unwrap();

        assert!(json.get("sessionId").is_some());
        assert_eq!(json["coupon"]["state"], "inactive");
        assert_eq!(json["items"].as_array().map(Vec::len), Some(1));
    }
}
