//! # kopi-core: Pricing & Order-Totals Core for Kopi POS
//!
//! This crate holds the only part of Kopi POS with real financial rules:
//! resolving the unit price of a sold item from its variant matrix, and
//! computing deterministic totals for point-of-sale carts and supplier
//! purchase orders. Everything here is a pure function or an in-memory
//! state transition with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Kopi POS Pricing Flow                            │
//! │                                                                         │
//! │  Catalog / menu service (external)        Supplier catalog (external)   │
//! │           │                                         │                   │
//! │           ▼                                         ▼                   │
//! │  ┌─────────────────┐                     ┌──────────────────────┐      │
//! │  │ variant/pricing │                     │      purchase        │      │
//! │  │ price resolver  │                     │  PO total snapshot   │      │
//! │  └────────┬────────┘                     └──────────┬───────────┘      │
//! │           │ add line                                │                   │
//! │           ▼                                         │                   │
//! │  ┌─────────────────┐     checkout    ┌───────────┐  │                   │
//! │  │      cart       │ ──────────────► │  payload  │  │                   │
//! │  │ totals machine  │                 │  builder  │  │                   │
//! │  └─────────────────┘                 └─────┬─────┘  │                   │
//! │                                            ▼        ▼                   │
//! │                     kopi-checkout (session, services, notifications)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type with integer arithmetic and half-up rounding
//! - [`types`] - Shared enums and rates (Channel, TaxRate, Percent, payment)
//! - [`variant`] - Validated size × temperature × channel price matrix
//! - [`pricing`] - Menu items, flat prices, selection → cart line spec
//! - [`cart`] - Cart state machine and totals computation
//! - [`payload`] - Order submission payload builder
//! - [`purchase`] - Purchase order pricing and frozen totals
//! - [`coerce`] - Lenient parsing of live text-field input
//! - [`validation`] - Business rule validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use kopi_core::cart::{compute_totals, Cart, LineSpec};
//! use kopi_core::types::{Channel, Discount, Percent, TaxRate};
//! use kopi_core::Money;
//!
//! let mut cart = Cart::new();
//! cart.add_line(LineSpec::simple("menu-1", "Es Kopi Susu", Money::from_units(20000), Channel::Retail).with_quantity(2));
//! cart.set_discount(Discount::Percentage(Percent::from_percentage(10.0)));
//!
//! let totals = compute_totals(&cart, TaxRate::from_fraction(0.11));
//! assert_eq!(totals.subtotal.units(), 40000);
//! assert_eq!(totals.discount_amount.units(), 4000);
//! assert_eq!(totals.tax.units(), 3960);
//! assert_eq!(totals.grand_total.units(), 39960);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod coerce;
pub mod error;
pub mod money;
pub mod payload;
pub mod pricing;
pub mod purchase;
pub mod types;
pub mod validation;
pub mod variant;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Tax rate applied when neither the cart nor the store configuration
/// provides one (Indonesian VAT, 11%).
pub const DEFAULT_TAX_RATE_BPS: u32 = 1100;

/// Quantity a new cart line gets when the caller does not specify one.
pub const DEFAULT_LINE_QUANTITY: i64 = 1;

/// Largest quantity a single cart or purchase-order line may carry.
///
/// ## Business Reason
/// Catches slips like typing 1000 instead of 10, and keeps
/// `unit price × quantity` far from `i64` limits.
pub const MAX_LINE_QUANTITY: i64 = 999;
