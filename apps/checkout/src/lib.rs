//! # VFarma Checkout
//!
//! Orchestration layer between the pricing core and a presentation layer.
//!
//! ## Module Organization
//! ```text
//! vfarma_checkout/
//! ├── lib.rs          ◄─── You are here (logging setup & demo run)
//! ├── validator.rs    ◄─── Asynchronous coupon validator
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── cart.rs     ◄─── Cart Store (session, coupon requests, snapshots)
//! │   ├── catalog.rs  ◄─── Product catalog
//! │   └── config.rs   ◄─── Configuration loading
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   └── cart.rs     ◄─── Cart and coupon commands
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## Wiring
//! ```text
//! CheckoutConfig ──► coupon_table() + coupon_delay()
//!                              │
//!                              ▼
//!                      CouponValidator ──► CartStore ◄── commands::cart::*
//!                                              │
//!                                              └──► subscribe() (watch)
//! ```

pub mod commands;
pub mod error;
pub mod state;
pub mod validator;

use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use error::ApiError;
use state::{CartStore, Catalog, CheckoutConfig};
use validator::CouponValidator;

pub use validator::DEFAULT_COUPON_DELAY;

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=vfarma=trace` - Show trace for vfarma crates only
/// - Default: `info,vfarma=debug`
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,vfarma=debug"));

    // A second call (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Builds a Cart Store from configuration.
pub fn build_store(config: &CheckoutConfig) -> Result<CartStore, ApiError> {
    let table = config.coupon_table()?;
    let validator = CouponValidator::new(Arc::new(table), config.coupon_delay());
    Ok(CartStore::new(validator))
}

/// Runs the demo checkout.
///
/// ## Sequence
/// ```text
/// 1. Load config (file + env, falls back to defaults)
/// 2. Seed the pharmacy catalog and fill a cart
/// 3. Apply each code from `codes` in order, logging the outcome
/// 4. Complete checkout and print the receipt as JSON
/// ```
pub async fn run(config_path: Option<&Path>, codes: &[String]) -> Result<(), ApiError> {
    let config = CheckoutConfig::load_or_default(config_path);
    info!(
        coupon_delay_ms = config.coupon_delay_ms,
        currency = %config.currency_symbol,
        "Starting VFarma checkout"
    );

    let catalog = Catalog::pharmacy();
    let store = build_store(&config)?;

    for product_id in ["1", "4", "4", "5"] {
        commands::cart::add_to_cart(&catalog, &store, product_id)?;
    }

    let totals = store.totals();
    info!(
        subtotal = %config.format_currency(totals.subtotal),
        items = totals.item_count,
        "Cart filled"
    );

    for code in codes {
        match commands::cart::apply_coupon(&store, code).await {
            Ok(response) => info!(code = %code, message = %response.message, "Coupon accepted"),
            Err(e) => warn!(code = %code, error = %e, "Coupon not applied"),
        }
    }

    if let Some(coupon) = store.coupon_status().active_coupon() {
        info!(code = %coupon.code, rate = %coupon.rate, "Coupon in effect");
    }

    let receipt = commands::cart::complete_checkout(&store)?;
    info!(
        total = %config.format_currency(receipt.total),
        discount = %config.format_currency(receipt.discount),
        "Receipt ready"
    );

    let json = serde_json::to_string_pretty(&receipt)
        .map_err(|e| ApiError::internal(format!("Failed to serialize receipt: {}", e)))?;
    println!("{}", json);

    Ok(())
}
