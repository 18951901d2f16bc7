//! # Error Types
//!
//! Domain-specific error types for vfarma-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  vfarma-core errors (this file)                                        │
//! │  ├── CoreError        - Coupon and checkout failures                   │
//! │  └── ValidationError  - Catalog / coupon-table input failures          │
//! │                                                                         │
//! │  vfarma-checkout errors (app)                                          │
//! │  ├── ConfigError      - Config file I/O and parsing                    │
//! │  └── ApiError         - What the presentation layer sees (serialized)  │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → Presentation layer     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Cart mutations are infallible: removing an unknown id or clearing an
//! empty cart are no-ops, so nothing here describes them.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// The submitted code normalizes to no entry in the coupon table.
    ///
    /// ## User Workflow
    /// ```text
    /// Type "xyz" ──► apply_coupon("xyz")
    ///      │
    ///      ▼ (1.5s later)
    /// CouponRejected { code: "XYZ" }
    ///      │
    ///      ▼
    /// Active coupon cleared, total == subtotal
    /// UI shows: "Coupon invalid or expired."
    /// ```
    #[error("Coupon invalid or expired: {code}")]
    CouponRejected { code: String },

    /// A newer coupon request (or a cart reset) overtook this one before it
    /// resolved. Its outcome was discarded and the coupon slot left as is.
    #[error("Coupon request for {code} was superseded")]
    CouponSuperseded { code: String },

    /// Checkout was requested on a cart with no items.
    #[error("Cart is empty")]
    EmptyCart,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Human-readable reason shown to the shopper.
    pub fn reason(&self) -> String {
        match self {
            CoreError::CouponRejected { .. } => "Coupon invalid or expired.".to_string(),
            CoreError::CouponSuperseded { .. } => {
                "A newer coupon request replaced this one.".to_string()
            }
            other => other.to_string(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised while building a catalog or a coupon table, before any cart
/// operation runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., two coupons with the same code).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::CouponRejected {
            code: "XYZ".to_string(),
        };
        assert_eq!(err.to_string(), "Coupon invalid or expired: XYZ");
        assert_eq!(err.reason(), "Coupon invalid or expired.");

        assert_eq!(CoreError::EmptyCart.to_string(), "Cart is empty");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "code".to_string(),
        };
        assert_eq!(err.to_string(), "code is required");

        let err = ValidationError::Duplicate {
            field: "code".to_string(),
            value: "VIP20".to_string(),
        };
        assert_eq!(err.to_string(), "code 'VIP20' already exists");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "id".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
