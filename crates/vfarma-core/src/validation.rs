//! # Validation Module
//!
//! Input validation and normalization for VFarma Checkout.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Catalog / coupon table construction                                   │
//! │  ├── validate_product   (id, name, price)                              │
//! │  └── validate_coupon    (code, rate, target)                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Cart mutations                                                        │
//! │  └── validate_quantity  (1..=MAX_ITEM_QUANTITY per line)               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Coupon submission                                                      │
//! │  └── normalize_coupon_code (trim + upper-case, then exact match)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::FULL_BPS;
use crate::types::{Coupon, Product};
use crate::{MAX_COUPON_CODE_LEN, MAX_ITEM_QUANTITY, MAX_PRICE_CENTS, MAX_PRODUCT_ID_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Coupon Codes
// =============================================================================

/// Normalizes a submitted coupon code: surrounding whitespace trimmed,
/// upper-cased.
///
/// ## Example
/// ```rust
/// use vfarma_core::validation::normalize_coupon_code;
///
/// assert_eq!(normalize_coupon_code(" vfarma10 "), "VFARMA10");
/// assert_eq!(normalize_coupon_code("VFARMA10"), "VFARMA10");
/// ```
pub fn normalize_coupon_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Validates a coupon code as stored in the coupon table.
///
/// ## Rules
/// - Must not be empty
/// - At most 32 characters
/// - Letters, digits, hyphens and underscores only
/// - Already normalized (no surrounding spaces, upper-case)
pub fn validate_coupon_code(code: &str) -> ValidationResult<()> {
    if code.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "code".to_string(),
        });
    }

    if code.chars().count() > MAX_COUPON_CODE_LEN {
        return Err(ValidationError::TooLong {
            field: "code".to_string(),
            max: MAX_COUPON_CODE_LEN,
        });
    }

    if !code
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "code".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    if normalize_coupon_code(code) != code {
        return Err(ValidationError::InvalidFormat {
            field: "code".to_string(),
            reason: "must be upper-case".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a coupon discount in basis points.
///
/// ## Rules
/// - Must be in `1..=10000` (a fraction in `(0, 1]`)
///
/// ## Example
/// ```rust
/// use vfarma_core::validation::validate_discount_bps;
///
/// assert!(validate_discount_bps(1000).is_ok());
/// assert!(validate_discount_bps(0).is_err());
/// assert!(validate_discount_bps(10_001).is_err());
/// ```
pub fn validate_discount_bps(bps: u32) -> ValidationResult<()> {
    if bps == 0 || bps > FULL_BPS {
        return Err(ValidationError::OutOfRange {
            field: "rate_bps".to_string(),
            min: 1,
            max: FULL_BPS as i64,
        });
    }

    Ok(())
}

/// Validates a price in cents.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free samples)
/// - At most `MAX_PRICE_CENTS`
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if !(0..=MAX_PRICE_CENTS).contains(&cents) {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: MAX_PRICE_CENTS,
        });
    }

    Ok(())
}

/// Validates a line quantity.
///
/// ## Rules
/// - Must be in `1..=MAX_ITEM_QUANTITY`
///
/// ## Example
/// ```rust
/// use vfarma_core::validation::validate_quantity;
///
/// assert!(validate_quantity(3).is_ok());
/// assert!(validate_quantity(1_000).is_err());
/// ```
pub fn validate_quantity(quantity: i64) -> ValidationResult<()> {
    if !(1..=MAX_ITEM_QUANTITY).contains(&quantity) {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

// =============================================================================
// Identifiers
// =============================================================================

/// Validates a product identifier.
///
/// ## Rules
/// - Must not be empty or whitespace
/// - At most 64 characters
pub fn validate_product_id(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    if id.chars().count() > MAX_PRODUCT_ID_LEN {
        return Err(ValidationError::TooLong {
            field: "id".to_string(),
            max: MAX_PRODUCT_ID_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Entity Validators
// =============================================================================

/// Validates a catalog product.
pub fn validate_product(product: &Product) -> ValidationResult<()> {
    validate_product_id(&product.id)?;

    if product.name.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    validate_price_cents(product.price.cents())
}

/// Validates a coupon table entry.
pub fn validate_coupon(coupon: &Coupon) -> ValidationResult<()> {
    validate_coupon_code(&coupon.code)?;
    validate_discount_bps(coupon.rate.bps())?;

    if let Some(target) = &coupon.target_id {
        validate_product_id(target)?;
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
