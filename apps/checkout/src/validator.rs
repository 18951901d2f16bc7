//! # Coupon Validator
//!
//! Asynchronous check of a submitted code against a [`CouponTable`].
//!
//! ## Validation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  validate(" vip20 ")                                                    │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  normalize ──► "VIP20"                                                  │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  sleep(delay)   ◄── caller's task is suspended, not blocked;            │
//! │        │            other cart operations keep running                  │
//! │        ▼                                                                │
//! │  table.find("VIP20")                                                    │
//! │        ├── Some ──► Ok(CouponApproval { coupon, message })              │
//! │        └── None ──► Err(CoreError::CouponRejected { code })             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The validator owns no state besides the table handle and the delay. A
//! zero delay skips the timer entirely, which keeps unit tests synchronous.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};
use vfarma_core::validation::normalize_coupon_code;
use vfarma_core::{CoreError, CoreResult, CouponApproval, CouponTable, StaticCouponTable};

/// Simulated round-trip of the coupon lookup.
pub const DEFAULT_COUPON_DELAY: Duration = Duration::from_millis(1500);

/// Checks coupon codes after a fixed simulated latency.
#[derive(Clone)]
pub struct CouponValidator {
    table: Arc<dyn CouponTable>,
    delay: Duration,
}

impl CouponValidator {
    /// Creates a validator over `table` that answers after `delay`.
    pub fn new(table: Arc<dyn CouponTable>, delay: Duration) -> Self {
        CouponValidator { table, delay }
    }

    /// Built-in coupon table with the given delay.
    pub fn builtin(delay: Duration) -> Self {
        Self::new(Arc::new(StaticCouponTable::builtin()), delay)
    }

    /// The simulated latency.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Resolves `code` against the table.
    ///
    /// ## Errors
    /// `CoreError::CouponRejected` carrying the normalized code when nothing
    /// matches.
    pub async fn validate(&self, code: &str) -> CoreResult<CouponApproval> {
        let normalized = normalize_coupon_code(code);
        debug!(code = %normalized, delay_ms = self.delay.as_millis() as u64, "Validating coupon");

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        match self.table.find(&normalized) {
            Some(coupon) => Ok(CouponApproval::for_coupon(coupon)),
            None => {
                warn!(code = %normalized, "Coupon rejected");
                Err(CoreError::CouponRejected { code: normalized })
            }
        }
    }
}

impl Default for CouponValidator {
    fn default() -> Self {
        Self::builtin(DEFAULT_COUPON_DELAY)
    }
}

impl fmt::Debug for CouponValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CouponValidator")
            .field("delay", &self.delay)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;
    use vfarma_core::{Coupon, DiscountRate};

    #[tokio::test(start_paused = true)]
    async fn test_validate_waits_for_delay() {
        let validator = CouponValidator::default();
        let started = Instant::now();

        let approval = validator.validate("VFARMA10").await.unwrap();

        assert!(started.elapsed() >= DEFAULT_COUPON_DELAY);
        assert_eq!(approval.coupon.rate, DiscountRate::from_bps(1000));
        assert_eq!(approval.message, "10% discount applied!");
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejection_also_waits_for_delay() {
        let validator = CouponValidator::default();
        let started = Instant::now();

        let err = validator.validate("xyz").await.unwrap_err();

        assert!(started.elapsed() >= DEFAULT_COUPON_DELAY);
        assert_eq!(
            err,
            CoreError::CouponRejected {
                code: "XYZ".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_code_normalization() {
        let validator = CouponValidator::builtin(Duration::ZERO);

        let padded = validator.validate(" vfarma10 ").await.unwrap();
        let exact = validator.validate("VFARMA10").await.unwrap();

        assert_eq!(padded, exact);
    }

    #[tokio::test]
    async fn test_targeted_coupon_message() {
        let validator = CouponValidator::builtin(Duration::ZERO);

        let approval = validator.validate("neymar20").await.unwrap();

        assert_eq!(approval.coupon.target_id.as_deref(), Some("4"));
        assert_eq!(
            approval.message,
            "20% discount applied to the promoted product!"
        );
    }

    #[tokio::test]
    async fn test_custom_table() {
        let table = StaticCouponTable::new(vec![Coupon::global(
            "BEMVINDO5",
            DiscountRate::from_bps(500),
        )])
        .unwrap();
        let validator = CouponValidator::new(Arc::new(table), Duration::ZERO);

        assert!(validator.validate("bemvindo5").await.is_ok());
        assert!(validator.validate("VFARMA10").await.is_err());
    }
}
