//! # Domain Types
//!
//! Shared value types used by every pricing component.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Channel      │   │    TaxRate      │   │    Percent      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  Retail         │   │  bps (u32)      │   │  bps (u32)      │       │
//! │  │  Reseller       │   │  1100 = 11%     │   │  1000 = 10%     │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Discount     │   │ PaymentMethod   │   │ PaymentStatus   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  None           │   │  Cash  Qris     │   │  Paid           │       │
//! │  │  Percentage(%)  │   │  Transfer Card  │   │  Unpaid         │       │
//! │  │  Nominal(Money) │   └─────────────────┘   └─────────────────┘       │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Sales Channel
// =============================================================================

/// The sales context that selects which price column applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    /// Walk-in customers.
    #[default]
    Retail,
    /// Orders placed on behalf of a reseller, priced from the reseller column.
    Reseller,
}

impl Channel {
    /// All channels, in price-column order.
    pub const ALL: [Channel; 2] = [Channel::Retail, Channel::Reseller];

    /// Returns the wire name of the channel.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Channel::Retail => "retail",
            Channel::Reseller => "reseller",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "retail" => Ok(Channel::Retail),
            "reseller" => Ok(Channel::Reseller),
            _ => Err(ValidationError::NotAllowed {
                field: "channel".to_string(),
                allowed: Channel::ALL.iter().map(|c| c.to_string()).collect(),
            }),
        }
    }
}

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1100 bps = 11% (Indonesian VAT). The order service speaks fractions
/// (`0.11`), so conversion happens only at the wire boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a fraction (`0.11` → 1100 bps).
    ///
    /// Negative or non-finite input becomes zero.
    pub fn from_fraction(fraction: f64) -> Self {
        if !fraction.is_finite() || fraction <= 0.0 {
            return TaxRate(0);
        }
        TaxRate((fraction * 10_000.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a fraction (for the wire payload only).
    #[inline]
    pub fn fraction(&self) -> f64 {
        self.0 as f64 / 10_000.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Tax on `amount`, rounded half away from zero.
    pub fn tax_on(&self, amount: Money) -> Money {
        amount.share_bps(self.0)
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Percent
// =============================================================================

/// A percentage in basis points, always within 0%..=100%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Percent(u32);

impl Percent {
    /// 100%.
    pub const FULL: Percent = Percent(10_000);

    /// Creates a percent from basis points, clamped to 100%.
    pub const fn from_bps(bps: u32) -> Self {
        if bps > 10_000 {
            Percent(10_000)
        } else {
            Percent(bps)
        }
    }

    /// Creates a percent from a percentage value (`12.5` → 1250 bps),
    /// clamped to `[0, 100]`.
    pub fn from_percentage(pct: f64) -> Self {
        if !pct.is_finite() || pct <= 0.0 {
            return Percent(0);
        }
        Percent::from_bps((pct.min(100.0) * 100.0).round() as u32)
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the percentage value (`1250` bps → `12.5`).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

// =============================================================================
// Discount
// =============================================================================

/// How a discount value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DiscountMode {
    #[default]
    None,
    Percentage,
    Nominal,
}

/// Cart-level discount.
///
/// Serialized as the `{ mode, value }` descriptor the order service expects;
/// `value` is a percentage for `percentage` and an amount for `nominal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "DiscountDescriptor", into = "DiscountDescriptor")]
pub enum Discount {
    #[default]
    None,
    Percentage(Percent),
    Nominal(Money),
}

impl Discount {
    pub fn mode(&self) -> DiscountMode {
        match self {
            Discount::None => DiscountMode::None,
            Discount::Percentage(_) => DiscountMode::Percentage,
            Discount::Nominal(_) => DiscountMode::Nominal,
        }
    }

    /// Amount taken off `subtotal`. Never negative, never above `subtotal`.
    ///
    /// ## Rules
    /// - `nominal`: `min(value, subtotal)`
    /// - `percentage`: `round(value / 100 × subtotal)`, half away from zero
    /// - `none`: zero
    pub fn amount(&self, subtotal: Money) -> Money {
        let subtotal = subtotal.non_negative();
        match self {
            Discount::None => Money::zero(),
            Discount::Percentage(pct) => subtotal.share_bps(pct.bps()),
            Discount::Nominal(value) => value.non_negative().min(subtotal),
        }
    }
}

/// Wire shape of [`Discount`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DiscountDescriptor {
    pub mode: DiscountMode,
    #[serde(default)]
    pub value: f64,
}

impl From<DiscountDescriptor> for Discount {
    fn from(d: DiscountDescriptor) -> Self {
        match d.mode {
            DiscountMode::None => Discount::None,
            DiscountMode::Percentage => Discount::Percentage(Percent::from_percentage(d.value)),
            DiscountMode::Nominal => {
                let units = if d.value.is_finite() && d.value > 0.0 {
                    d.value.round() as i64
                } else {
                    0
                };
                Discount::Nominal(Money::from_units(units))
            }
        }
    }
}

impl From<Discount> for DiscountDescriptor {
    fn from(d: Discount) -> Self {
        let value = match d {
            Discount::None => 0.0,
            Discount::Percentage(pct) => pct.percentage(),
            Discount::Nominal(amount) => amount.units() as f64,
        };
        DiscountDescriptor {
            mode: d.mode(),
            value,
        }
    }
}

// =============================================================================
// Payment
// =============================================================================

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash; the only method with change due.
    #[default]
    Cash,
    /// QRIS code scan.
    Qris,
    /// Bank transfer.
    Transfer,
    /// Card on an external terminal.
    Card,
}

impl PaymentMethod {
    #[inline]
    pub const fn is_cash(&self) -> bool {
        matches!(self, PaymentMethod::Cash)
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cash" | "tunai" => Ok(PaymentMethod::Cash),
            "qris" => Ok(PaymentMethod::Qris),
            "transfer" | "bank_transfer" => Ok(PaymentMethod::Transfer),
            "card" | "debit" | "credit" => Ok(PaymentMethod::Card),
            _ => Err(ValidationError::NotAllowed {
                field: "paymentMethod".to_string(),
                allowed: ["cash", "qris", "transfer", "card"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            }),
        }
    }
}

/// Whether the order is settled at submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Paid,
    /// Reseller orders may be settled later, by `due_date`.
    Unpaid,
}

/// Payment form values carried by the cart.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    /// Settlement date for unpaid reseller orders.
    #[ts(as = "Option<String>")]
    pub due_date: Option<NaiveDate>,
    /// Cash handed over by the customer.
    pub amount_received: Option<Money>,
    /// The received amount exactly as typed, when it came from text input.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_received_input: Option<String>,
    #[serde(default)]
    pub note: String,
}

impl Payment {
    /// A payment form with the given method and everything else at defaults.
    pub fn with_method(method: PaymentMethod) -> Self {
        Payment {
            method,
            ..Payment::default()
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
    fn test_tax_rate_from_fraction() {
        let rate = TaxRate::from_fraction(0.11);
        assert_eq!(rate.bps(), 1100);
        assert!((rate.fraction() - 0.11).abs() < 1e-9);

        assert_eq!(TaxRate::from_fraction(-0.5).bps(), 0);
        assert_eq!(TaxRate::from_fraction(f64::NAN).bps(), 0);
    }

    #[test]
    fn test_percent_clamped() {
        assert_eq!(Percent::from_percentage(12.5).bps(), 1250);
        assert_eq!(Percent::from_percentage(150.0), Percent::FULL);
        assert_eq!(Percent::from_percentage(-3.0).bps(), 0);
        assert_eq!(Percent::from_bps(20_000), Percent::FULL);
    }

    #[test]
    fn test_discount_amounts() {
        let subtotal = Money::from_units(40000);

        assert_eq!(Discount::None.amount(subtotal), Money::zero());
        assert_eq!(
            Discount::Percentage(Percent::from_percentage(10.0)).amount(subtotal),
            Money::from_units(4000)
        );
        assert_eq!(
            Discount::Nominal(Money::from_units(5000)).amount(subtotal),
            Money::from_units(5000)
        );
        assert_eq!(
            Discount::Nominal(Money::from_units(50000)).amount(subtotal),
            subtotal
        );
        assert_eq!(
            Discount::Nominal(Money::from_units(-10)).amount(subtotal),
            Money::zero()
        );
    }

    #[test]
    fn test_discount_wire_shape() {
        let json = serde_json::to_value(Discount::Percentage(Percent::from_percentage(10.0))).unwrap();
        assert_eq!(json, serde_json::json!({ "mode": "percentage", "value": 10.0 }));

        let json = serde_json::to_value(Discount::None).unwrap();
        assert_eq!(json, serde_json::json!({ "mode": "none", "value": 0.0 }));

        let parsed: Discount =
            serde_json::from_value(serde_json::json!({ "mode": "nominal", "value": 50000 })).unwrap();
        assert_eq!(parsed, Discount::Nominal(Money::from_units(50000)));

        let parsed: Discount = serde_json::from_value(serde_json::json!({ "mode": "none" })).unwrap();
        assert_eq!(parsed, Discount::None);
    }

    #[test]
    fn test_channel_parsing() {
        assert_eq!("Retail".parse::<Channel>().unwrap(), Channel::Retail);
        assert_eq!("reseller".parse::<Channel>().unwrap(), Channel::Reseller);
        assert!("wholesale".parse::<Channel>().is_err());
        assert_eq!(serde_json::to_value(Channel::Reseller).unwrap(), "reseller");
    }

    #[test]
    fn test_payment_defaults() {
        let payment = Payment::default();
        assert!(payment.method.is_cash());
        assert_eq!(payment.status, PaymentStatus::Paid);
        assert!(payment.due_date.is_none());
        assert_eq!("qris".parse::<PaymentMethod>().unwrap(), PaymentMethod::Qris);
    }
}
