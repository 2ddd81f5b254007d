//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE DRIFT PROBLEM                                                      │
//! │                                                                         │
//! │  Editing a line price ten times with floats:                            │
//! │    499.99 × 3 = 1499.9699999999998  ❌ and it gets worse per edit       │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    49999 cents × 3 = 149997 cents                                      │
//! │    Every value is already rounded to 2 decimals, on every mutation.    │
//! │                                                                         │
//! │  The backend speaks decimal numbers; conversion happens exactly once,  │
//! │  at the wire boundary (`from_decimal` / `to_decimal`).                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use torque_core::money::Money;
//!
//! let price = Money::from_cents(50_000); // 500.00
//! let line_total = price.multiply_quantity(2).unwrap();
//! assert_eq!(line_total.cents(), 100_000);
//!
//! // Backend amounts are converted once, rounding to the nearest cent
//! let total = Money::from_decimal(1000.0).unwrap();
//! assert!(total.matches(line_total));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use ts_rs::TS;

/// Largest difference (in cents) at which two amounts are considered equal.
///
/// Backend totals and payment amounts are compared with a 0.01 tolerance.
pub const MATCH_TOLERANCE_CENTS: i64 = 1;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: outstanding balances can be computed as differences
/// - **Single field tuple struct**: Zero-cost abstraction over i64
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  CartLine.unit_price ──► CartLine.line_total ──► Cart.total            │
/// │                                                      │                  │
/// │  Sale.total_amount (backend) ──► max(...) ◄──────────┘                  │
/// │                                      │                                  │
/// │                                      ▼                                  │
/// │                              Payment.amount ──► Verifier / Classifier  │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use torque_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // 10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Converts a decimal amount received from the backend into cents.
    ///
    /// Rounds half away from zero to the nearest cent. Returns `None` for
    /// NaN, infinities, and values outside the representable range.
    ///
    /// ## Example
    /// ```rust
    /// use torque_core::money::Money;
    ///
    /// assert_eq!(Money::from_decimal(12.346).unwrap().cents(), 1235);
    /// assert_eq!(Money::from_decimal(1000.0).unwrap().cents(), 100_000);
    /// assert!(Money::from_decimal(f64::NAN).is_none());
    /// ```
    pub fn from_decimal(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }

        let cents = (value * 100.0).round();
        if cents.abs() >= i64::MAX as f64 {
            return None;
        }

        Some(Money(cents as i64))
    }

    /// Returns the amount as a decimal number for the wire.
    ///
    /// Exact for every value a till will ever see; only the JSON encoder
    /// uses this.
    #[inline]
    pub fn to_decimal(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion (shillings, dollars, ...).
    ///
    /// ## Example
    /// ```rust
    /// use torque_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(1099).major(), 10);
    /// assert_eq!(Money::from_cents(-550).major(), -5);
    /// ```
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
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

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Multiplies money by a quantity, `None` on overflow.
    ///
    /// ## Example
    /// ```rust
    /// use torque_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299);
    /// assert_eq!(unit_price.multiply_quantity(3).unwrap().cents(), 897);
    /// assert!(Money::from_cents(i64::MAX / 2).multiply_quantity(3).is_none());
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Adds two amounts, `None` on overflow.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// True when the two amounts differ by at most one cent.
    ///
    /// ## User Workflow
    /// ```text
    /// Sale total: 1000.00
    /// Payment on record: 999.99
    ///      │
    ///      ▼
    /// matches() ← THIS FUNCTION
    ///      │
    ///      ▼
    /// true → the payment settles the sale
    /// ```
    #[inline]
    pub const fn matches(&self, other: Money) -> bool {
        (self.0 - other.0).abs() <= MATCH_TOLERANCE_CENTS
    }

    /// Returns `self - other`, floored at zero.
    #[inline]
    pub fn saturating_remaining(&self, paid: Money) -> Money {
        Money((self.0 - paid.0).max(0))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain decimal rendering ("1234.50"). Currency symbols are a display
/// concern of the register configuration.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor_part())
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

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
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
        assert_eq!(money.minor_part(), 99);
    }

    #[test]
    fn test_from_decimal_rounds_to_cents() {
        assert_eq!(Money::from_decimal(500.0).unwrap().cents(), 50_000);
        assert_eq!(Money::from_decimal(0.1 + 0.2).unwrap().cents(), 30);
        assert_eq!(Money::from_decimal(12.346).unwrap().cents(), 1235);
        assert_eq!(Money::from_decimal(-2.5).unwrap().cents(), -250);
        assert!(Money::from_decimal(f64::INFINITY).is_none());
        assert!(Money::from_decimal(f64::NAN).is_none());
    }

    #[test]
    fn test_to_decimal() {
        assert_eq!(Money::from_cents(100_000).to_decimal(), 1000.0);
        assert_eq!(Money::from_cents(1099).to_decimal(), 10.99);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "10.99");
        assert_eq!(Money::from_cents(500).to_string(), "5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!(a.multiply_quantity(3), Some(Money::from_cents(3000)));
        assert_eq!(a.checked_add(b), Some(Money::from_cents(1500)));

        let total: Money = [a, b, b].iter().sum();
        assert_eq!(total.cents(), 2000);
    }

    #[test]
    fn test_overflow_is_none() {
        let huge = Money::from_cents(i64::MAX / 2);
        assert_eq!(huge.multiply_quantity(3), None);
        assert_eq!(huge.checked_add(huge).map(|m| m.cents()), Some(i64::MAX - 1));
        assert_eq!(huge.checked_add(huge).and_then(|m| m.checked_add(huge)), None);
    }

    #[test]
    fn test_matches_within_one_cent() {
        let total = Money::from_cents(100_000);
        assert!(total.matches(Money::from_cents(100_000)));
        assert!(total.matches(Money::from_cents(99_999)));
        assert!(total.matches(Money::from_cents(100_001)));
        assert!(!total.matches(Money::from_cents(99_998)));
        assert!(!total.matches(Money::from_cents(50_000)));
    }

    #[test]
    fn test_saturating_remaining() {
        let total = Money::from_cents(1000);
        assert_eq!(total.saturating_remaining(Money::from_cents(400)).cents(), 600);
        assert_eq!(total.saturating_remaining(Money::from_cents(1200)).cents(), 0);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let negative = Money::from_cents(-100);
        assert!(negative.is_negative());
        assert_eq!(negative.abs().cents(), 100);
    }
}
