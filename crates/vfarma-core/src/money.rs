//! # Money Module
//!
//! Provides the `Money` and `DiscountRate` types for pricing arithmetic.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                    │
//! │    50.0 × (1 − 0.1) + 100.0 × (1 − 0.1) = 135.00000000000003  ❌       │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units + basis points                      │
//! │    5000 − 500 + 10000 − 1000 = 13500 (exactly 135.00)                  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Amounts are currency-agnostic: `Money` counts minor units (cents) and the
//! presentation layer decides which symbol to print.
//!
//! ## Usage
//! ```rust
//! use vfarma_core::money::{DiscountRate, Money};
//!
//! let price = Money::from_cents(10_000); // 100.00
//! let line = price * 2;                  // 200.00
//! let off = DiscountRate::from_bps(2000); // 20%
//!
//! assert_eq!(price.apply_discount(off).cents(), 8_000);
//! assert_eq!(line.cents(), 20_000);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

/// Basis points in 100%.
pub const FULL_BPS: u32 = 10_000;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: differences such as `subtotal - total` stay in the type
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use vfarma_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents 10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Returns the part of this amount taken off by `rate`.
    ///
    /// ## Implementation
    /// Integer math: `(amount * bps + 5000) / 10000`. The +5000 rounds half up.
    pub fn discount_amount(&self, rate: DiscountRate) -> Money {
        let off = (self.0 as i128 * rate.bps() as i128 + 5000) / FULL_BPS as i128;
        Money::from_cents(off as i64)
    }

    /// Applies a percentage discount and returns the reduced amount.
    ///
    /// ## Example
    /// ```rust
    /// use vfarma_core::money::{DiscountRate, Money};
    ///
    /// let price = Money::from_cents(5000); // 50.00
    /// let discounted = price.apply_discount(DiscountRate::from_bps(1000)); // 10% off
    /// assert_eq!(discounted.cents(), 4500); // 45.00
    /// ```
    pub fn apply_discount(&self, rate: DiscountRate) -> Money {
        *self - self.discount_amount(rate)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Renders `major.minor` without a currency symbol; the app's config
/// formats amounts for display.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by a line quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Discount Rate
// =============================================================================

/// Coupon discount represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01%. A coupon `percent` of 0.10 is 1000 bps, 1.0 is
/// 10000 bps. Valid coupon rates live in `1..=10000`; see
/// [`crate::validation::validate_discount_bps`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DiscountRate(u32);

impl DiscountRate {
    /// Creates a discount rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        DiscountRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

/// `10%`, `12.5%`, `0.25%`.
impl fmt::Display for DiscountRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / 100;
        let frac = self.0 % 100;
        if frac == 0 {
            write!(f, "{}%", whole)
        } else if frac % 10 == 0 {
            write!(f, "{}.{}%", whole, frac / 10)
        } else {
            write!(f, "{}.{:02}%", whole, frac)
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.minor(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-5.50");
        assert_eq!(format!("{}", Money::zero()), "0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3).cents(), 3000);

        let total: Money = [a, b, b].into_iter().sum();
        assert_eq!(total.cents(), 2000);
    }

    #[test]
    fn test_discount_amount_rounds_half_up() {
        // 0.05 at 10% = 0.005 → 0.01
        assert_eq!(Money::from_cents(5).discount_amount(DiscountRate::from_bps(1000)).cents(), 1);
        // 0.04 at 10% = 0.004 → 0.00
        assert_eq!(Money::from_cents(4).discount_amount(DiscountRate::from_bps(1000)).cents(), 0);
    }

    #[test]
    fn test_apply_discount() {
        let price = Money::from_cents(10_000);
        assert_eq!(price.apply_discount(DiscountRate::from_bps(2000)).cents(), 8_000);
        assert_eq!(price.apply_discount(DiscountRate::from_bps(FULL_BPS)).cents(), 0);
    }

    #[test]
    fn test_rate_percentage() {
        assert!((DiscountRate::from_bps(1000).percentage() - 10.0).abs() < 0.001);
        assert!((DiscountRate::from_bps(1250).percentage() - 12.5).abs() < 0.001);
    }

    #[test]
    fn test_rate_display() {
        assert_eq!(DiscountRate::from_bps(1000).to_string(), "10%");
        assert_eq!(DiscountRate::from_bps(1250).to_string(), "12.5%");
        assert_eq!(DiscountRate::from_bps(25).to_string(), "0.25%");
        assert_eq!(DiscountRate::from_bps(FULL_BPS).to_string(), "100%");
    }
}
