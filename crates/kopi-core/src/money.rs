//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    36000 × 0.11 = 3959.9999999999995  ❌ rounds the wrong way           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer units + basis points                            │
//! │    36000 × 1100 bps = 39 600 000 / 10 000 = 3960  ✅                    │
//! │    Rounding happens once, explicitly, half away from zero              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All amounts are in the smallest currency unit. Kopi POS trades in
//! rupiah, which has no minor unit in practice, so one unit is one rupiah.
//!
//! ## Usage
//! ```rust
//! use kopi_core::money::Money;
//!
//! let price = Money::from_units(20000);
//! let line = price * 2;
//! assert_eq!(line.units(), 40000);
//!
//! // 10% of 40000, rounded half away from zero
//! assert_eq!(line.share_bps(1000).units(), 4000);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

/// Basis points in one whole (100%).
pub const BPS_SCALE: i128 = 10_000;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit.
///
/// ## Design Decisions
/// - **i64 (signed)**: intermediate differences may go negative before
///   they are clamped (e.g. subtotal minus an oversized nominal discount)
/// - **Single field tuple struct**: serializes as a bare JSON integer,
///   which is exactly what the order service expects for `unitPrice`
///
/// ## Where Money Flows
/// ```text
/// VariantConfig.prices ──► CartLine.unit_price ──► line total ──► subtotal
///                                                                   │
///            discount ◄─────────────────────────────────────────────┘
///               │
///               ▼
///          net total ──► tax ──► grand total ──► change due
///
/// SupplierCatalogItem.purchase_price ──► PurchaseOrderLine.price ──► grand_total
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from the smallest currency unit.
    ///
    /// ## Example
    /// ```rust
    /// use kopi_core::money::Money;
    ///
    /// let price = Money::from_units(18000);
    /// assert_eq!(price.units(), 18000);
    /// ```
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        Money(units)
    }

    /// Returns the value in the smallest currency unit.
    #[inline]
    pub const fn units(&self) -> i64 {
        self.0
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

    /// Returns this value, or zero if it is negative.
    ///
    /// ## Example
    /// ```rust
    /// use kopi_core::money::Money;
    ///
    /// assert_eq!(Money::from_units(-500).non_negative(), Money::zero());
    /// assert_eq!(Money::from_units(500).non_negative().units(), 500);
    /// ```
    #[inline]
    pub const fn non_negative(self) -> Self {
        if self.0 < 0 {
            Money(0)
        } else {
            self
        }
    }

    /// Multiplies money by a quantity, saturating at the `i64` bounds.
    ///
    /// ## Example
    /// ```rust
    /// use kopi_core::money::Money;
    ///
    /// let unit_price = Money::from_units(15000);
    /// assert_eq!(unit_price.multiply_quantity(3).units(), 45000);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Returns `bps / 10000` of this amount, rounded half away from zero
    /// to the nearest whole unit.
    ///
    /// Used for both percentage discounts and tax so the two pipelines share
    /// one rounding rule.
    ///
    /// ## Implementation
    /// Integer math in i128: `(|amount| × bps + 5000) / 10000`, sign restored
    /// afterwards. The +5000 is the half-unit bias.
    ///
    /// ## Example
    /// ```rust
    /// use kopi_core::money::Money;
    ///
    /// // 36000 at 11% = 3960 exactly
    /// assert_eq!(Money::from_units(36000).share_bps(1100).units(), 3960);
    ///
    /// // 4550 at 11% = 500.5 → 501
    /// assert_eq!(Money::from_units(4550).share_bps(1100).units(), 501);
    /// ```
    pub fn share_bps(&self, bps: u32) -> Money {
        let magnitude = (self.0 as i128).abs();
        let share = (magnitude * bps as i128 + BPS_SCALE / 2) / BPS_SCALE;
        let signed = if self.0 < 0 { -share } else { share };
        Money(signed as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Renders the integer amount with `.` thousands separators (`39.960`).
///
/// ## Note
/// The currency symbol is a store setting, see the checkout crate's
/// `format_currency`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }
        if self.0 < 0 {
            write!(f, "-{}", grouped)
        } else {
            write!(f, "{}", grouped)
        }
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

/// Multiplication by i64 (for quantity calculations).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
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
    fn test_from_units() {
        let money = Money::from_units(20000);
        assert_eq!(money.units(), 20000);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_units(39960)), "39.960");
        assert_eq!(format!("{}", Money::from_units(500)), "500");
        assert_eq!(format!("{}", Money::from_units(1_250_000)), "1.250.000");
        assert_eq!(format!("{}", Money::from_units(-10060)), "-10.060");
        assert_eq!(format!("{}", Money::zero()), "0");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_units(1000);
        let b = Money::from_units(500);

        assert_eq!((a + b).units(), 1500);
        assert_eq!((a - b).units(), 500);
        assert_eq!((a * 3).units(), 3000);

        let total: Money = [a, b, b].iter().sum();
        assert_eq!(total.units(), 2000);
    }

    #[test]
    fn test_arithmetic_saturates() {
        let huge = Money::from_units(i64::MAX / 2);
        assert_eq!(huge.multiply_quantity(999).units(), i64::MAX);
        assert_eq!((huge + huge + huge).units(), i64::MAX);
        assert_eq!((Money::from_units(i64::MIN) - Money::from_units(1)).units(), i64::MIN);

        let total: Money = [huge, huge, huge].iter().sum();
        assert_eq!(total.units(), i64::MAX);
    }

    #[test]
    fn test_share_bps_exact() {
        assert_eq!(Money::from_units(40000).share_bps(1000).units(), 4000);
        assert_eq!(Money::from_units(36000).share_bps(1100).units(), 3960);
    }

    #[test]
    fn test_share_bps_rounds_half_up() {
        // 4550 × 11% = 500.5 → 501
        assert_eq!(Money::from_units(4550).share_bps(1100).units(), 501);
        // 4545 × 11% = 499.95 → 500
        assert_eq!(Money::from_units(4545).share_bps(1100).units(), 500);
        // 4540 × 11% = 499.4 → 499
        assert_eq!(Money::from_units(4540).share_bps(1100).units(), 499);
        // 25 × 10% = 2.5 → 3, not 2 (no bankers rounding)
        assert_eq!(Money::from_units(25).share_bps(1000).units(), 3);
    }

    #[test]
    fn test_share_bps_negative_rounds_away_from_zero() {
        assert_eq!(Money::from_units(-25).share_bps(1000).units(), -3);
    }

    #[test]
    fn test_share_bps_large_amount_does_not_overflow() {
        let big = Money::from_units(i64::MAX / 2);
        let all = big.share_bps(10_000);
        assert_eq!(all, big);
    }

    #[test]
    fn test_non_negative() {
        assert!(Money::from_units(-1).non_negative().is_zero());
        assert!(Money::from_units(1).non_negative().is_positive());
        assert!(Money::from_units(-1).is_negative());
    }
}
