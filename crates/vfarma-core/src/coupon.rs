//! # Coupon Table
//!
//! The set of valid promotional codes and the approval payload produced
//! when a code matches.
//!
//! ## Lookup Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  raw code ──► normalize (trim, upper-case) ──► exact match on `code`    │
//! │                                                     │                   │
//! │                                   ┌─────────────────┴──────────┐        │
//! │                                   ▼                            ▼        │
//! │                          Some(Coupon)                        None       │
//! │                    CouponApproval + message            CouponRejected   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The table is a seam: [`StaticCouponTable`] keeps the codes in memory, a
//! remote lookup can implement [`CouponTable`] with the same contract.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreResult, ValidationError};
use crate::money::DiscountRate;
use crate::types::Coupon;
use crate::validation::validate_coupon;

// =============================================================================
// Table Trait
// =============================================================================

/// Deterministic exact-match lookup of coupon definitions.
pub trait CouponTable: Send + Sync {
    /// Returns the coupon whose code equals `normalized_code`.
    ///
    /// Callers normalize first (see
    /// [`crate::validation::normalize_coupon_code`]).
    fn find(&self, normalized_code: &str) -> Option<Coupon>;
}

// =============================================================================
// Static Table
// =============================================================================

/// Ordered, in-memory coupon table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticCouponTable {
    coupons: Vec<Coupon>,
}

impl StaticCouponTable {
    /// Builds a table after validating every entry.
    ///
    /// ## Errors
    /// - any entry fails [`validate_coupon`]
    /// - two entries share a code
    pub fn new(coupons: Vec<Coupon>) -> CoreResult<Self> {
        let mut seen = HashSet::with_capacity(coupons.len());

        for coupon in &coupons {
            validate_coupon(coupon)?;

            if !seen.insert(coupon.code.as_str()) {
                return Err(ValidationError::Duplicate {
                    field: "code".to_string(),
                    value: coupon.code.clone(),
                }
                .into());
            }
        }

        Ok(StaticCouponTable { coupons })
    }

    /// The codes shipped with the storefront.
    ///
    /// | Code       | Discount | Scope       |
    /// |------------|----------|-------------|
    /// | `VFARMA10` | 10%      | whole cart  |
    /// | `VIP20`    | 20%      | whole cart  |
    /// | `NEYMAR20` | 20%      | product `4` |
    pub fn builtin() -> Self {
        StaticCouponTable {
            coupons: vec![
                Coupon::global("VFARMA10", DiscountRate::from_bps(1000)),
                Coupon::global("VIP20", DiscountRate::from_bps(2000)),
                Coupon::targeted("NEYMAR20", DiscountRate::from_bps(2000), "4"),
            ],
        }
    }

    /// Entries in table order.
    pub fn coupons(&self) -> &[Coupon] {
        &self.coupons
    }

    pub fn len(&self) -> usize {
        self.coupons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coupons.is_empty()
    }
}

impl Default for StaticCouponTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl CouponTable for StaticCouponTable {
    fn find(&self, normalized_code: &str) -> Option<Coupon> {
        self.coupons
            .iter()
            .find(|c| c.code == normalized_code)
            .cloned()
    }
}

// =============================================================================
// Approval
// =============================================================================

/// A successful validation: the matched coupon plus the confirmation shown
/// to the shopper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CouponApproval {
    pub coupon: Coupon,
    pub message: String,
}

impl CouponApproval {
    /// Builds the approval for a matched coupon.
    ///
    /// ## Messages
    /// - global: `"10% discount applied!"`
    /// - targeted: `"20% discount applied to the promoted product!"`
    pub fn for_coupon(coupon: Coupon) -> Self {
        let message = if coupon.is_global() {
            format!("{} discount applied!", coupon.rate)
        } else {
            format!("{} discount applied to the promoted product!", coupon.rate)
        };

        CouponApproval { coupon, message }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
