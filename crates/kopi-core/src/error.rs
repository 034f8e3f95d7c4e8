//! # Error Types
//!
//! Domain-specific error types for kopi-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  kopi-core errors (this file)                                          │
//! │  ├── CoreError        - Pricing / checkout / purchase rule failures    │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  kopi-checkout errors (separate crate)                                 │
//! │  └── CheckoutError    - Core + remote + store failures                 │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → CheckoutError → Notifier          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (menu id, catalog item id, status)
//! 3. Errors are enum variants, never String
//! 4. Every failure path is distinguishable so the caller can pick the
//!    right user-facing message

use thiserror::Error;

use crate::purchase::PurchaseOrderStatus;
use crate::types::Channel;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// None of these involve a network call: they are local rejections that
/// happen before anything is submitted.
#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    /// No price is configured for the requested combination on the channel.
    ///
    /// ## When This Occurs
    /// - Variant combination has a null price for this channel
    /// - Simple item has no flat price for this channel
    /// - Item is not sellable on this channel at all
    ///
    /// Surfaced at item-selection time, never at checkout time.
    #[error("{menu_id} is not available on the {channel} channel{}", describe_selection(.size, .temperature))]
    PriceUnavailable {
        menu_id: String,
        channel: Channel,
        size: Option<String>,
        temperature: Option<String>,
    },

    /// Checkout attempted with no lines in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Reseller checkout attempted without a reseller selected.
    #[error("A reseller must be selected for reseller orders")]
    ResellerRequired,

    /// A purchase order line references an unknown, inactive or foreign
    /// catalog item. The whole order is rejected.
    #[error("Catalog item {catalog_item_id} is not available from supplier {supplier_id}")]
    CatalogItemUnavailable {
        supplier_id: String,
        catalog_item_id: String,
    },

    /// Purchase order submitted with no lines.
    #[error("Purchase order must contain at least one item")]
    EmptyPurchaseOrder,

    /// The purchase order is complete; its prices and totals are frozen.
    #[error("Purchase order {order_id} is {status}, its totals are frozen")]
    OrderLocked {
        order_id: String,
        status: PurchaseOrderStatus,
    },

    /// Purchase order status cannot move from `from` to `to`.
    #[error("Purchase order cannot move from {from} to {to}")]
    InvalidStatusTransition {
        from: PurchaseOrderStatus,
        to: PurchaseOrderStatus,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// True when the failure came from resolving a price or catalog item
    /// rather than from malformed input.
    pub fn is_resolution_failure(&self) -> bool {
        matches!(
            self,
            CoreError::PriceUnavailable { .. } | CoreError::CatalogItemUnavailable { .. }
        )
    }
}

fn describe_selection(size: &Option<String>, temperature: &Option<String>) -> String {
    match (size, temperature) {
        (Some(s), Some(t)) => format!(" as {} / {}", s, t),
        (Some(s), None) => format!(" as {}", s),
        (None, Some(t)) => format!(" as {}", t),
        (None, None) => String::new(),
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., non-numeric amount).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Duplicate value (e.g., the same size listed twice).
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
