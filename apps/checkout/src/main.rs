//! # VFarma Checkout Binary
//!
//! ```text
//! vfarma-checkout [COUPON_CODE...]
//! ```
//!
//! Fills a demo cart, applies each coupon code in order and prints the
//! receipt as JSON. `VFARMA_CONFIG` points at an optional `checkout.toml`.

use std::process::ExitCode;

use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    vfarma_checkout::init_tracing();

    let codes: Vec<String> = std::env::args().skip(1).collect();

    match vfarma_checkout::run(None, &codes).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Checkout failed");
            ExitCode::FAILURE
        }
    }
}
