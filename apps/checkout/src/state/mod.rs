//! # State Module
//!
//! Long-lived state handed to the command layer.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────┐  ┌──────────────────┐  ┌──────────────────────┐  │
//! │  │    CartStore     │  │     Catalog      │  │   CheckoutConfig     │  │
//! │  │                  │  │                  │  │                      │  │
//! │  │  Arc<Mutex<      │  │  products by id  │  │  coupon delay        │  │
//! │  │    Session>>     │  │                  │  │  currency display    │  │
//! │  │  + validator     │  │                  │  │  coupon table        │  │
//! │  │  + watch::Sender │  │                  │  │                      │  │
//! │  └──────────────────┘  └──────────────────┘  └──────────────────────┘  │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • CartStore: one Mutex, never held across an await                    │
//! │  • Catalog / CheckoutConfig: read-only after initialization            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cart;
mod catalog;
mod config;

pub use cart::{CartSnapshot, CartStore};
pub use catalog::Catalog;
pub use config::{default_config_path, CheckoutConfig, ConfigError};
