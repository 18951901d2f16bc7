//! # API Error Type
//!
//! Unified error type for checkout commands.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Presentation layer           Checkout commands                        │
//! │  ──────────────────           ─────────────────                        │
//! │                                                                         │
//! │  apply_coupon("xyz")  ──►  Result<CouponResponse, ApiError>            │
//! │                                     │                                   │
//! │                 CoreError::CouponRejected ──► COUPON_REJECTED           │
//! │                 CoreError::CouponSuperseded ► COUPON_SUPERSEDED         │
//! │                 CoreError::EmptyCart ───────► CART_ERROR                │
//! │                 CoreError::Validation ──────► VALIDATION_ERROR          │
//! │                 ConfigError ────────────────► CONFIG_ERROR              │
//! │                                                                         │
//! │  catch (e) { e.code === "COUPON_REJECTED" → show e.message }           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use vfarma_core::CoreError;

use crate::state::ConfigError;

/// Error returned from checkout commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "COUPON_REJECTED",
///   "message": "Coupon invalid or expired."
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Unknown product id
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Coupon code matched nothing
    CouponRejected,

    /// A newer coupon request won
    CouponSuperseded,

    /// Cart operation failed
    CartError,

    /// Configuration could not be loaded
    ConfigError,

    /// Internal error
    Internal,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    pub fn cart(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::CartError, message)
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let message = err.reason();
        match err {
            CoreError::CouponRejected { .. } => ApiError::new(ErrorCode::CouponRejected, message),
            CoreError::CouponSuperseded { .. } => {
                ApiError::new(ErrorCode::CouponSuperseded, message)
            }
            CoreError::EmptyCart => ApiError::cart(message),
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        tracing::error!("Configuration error: {}", err);
        ApiError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
