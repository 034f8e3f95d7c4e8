//! # Validation Module
//!
//! Input validation utilities shared by the pricing components.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Live form edits                                              │
//! │  └── coerce module: clamp transient garbage to safe defaults           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Construction & submission                                    │
//! │  └── THIS MODULE: reject values that would break an invariant          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Remote services                                              │
//! │  └── their own checks (outside this crate)                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use kopi_core::validation::{validate_id, validate_quantity};
//!
//! validate_id("supplierId", "sup-01").unwrap();
//! validate_quantity(3).unwrap();
//! assert!(validate_quantity(0).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::MAX_LINE_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates that an identifier is present.
///
/// ## Rules
/// - Must not be empty or whitespace
/// - At most 128 characters
pub fn validate_id(field: &str, id: &str) -> ValidationResult<()> {
    let id = id.trim();

    if id.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if id.len() > 128 {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be at most 128 characters".to_string(),
        });
    }

    Ok(())
}

/// Validates a UUID string format (client idempotency tokens, line ids).
///
/// ## Example
/// ```rust
/// use kopi_core::validation::validate_uuid;
///
/// assert!(validate_uuid("clientId", "550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("clientId", "not-a-uuid").is_err());
/// ```
pub fn validate_uuid(field: &str, id: &str) -> ValidationResult<()> {
    validate_id(field, id)?;

    uuid::Uuid::parse_str(id.trim()).map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (>= 1)
/// - Must not exceed [`MAX_LINE_QUANTITY`]
///
/// ## User Workflow
/// ```text
/// Purchase order line: quantity 0
///      │
///      ▼
/// validate_quantity(0) ← THIS FUNCTION
///      │
///      └── Error: "quantity must be positive" → order rejected before pricing
/// ```
///
/// Cart edits do not go through this: the cart treats an out-of-range
/// quantity as a no-op. Persisted cart lines are checked with it on load.
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free items)
///
/// ## Example
/// ```rust
/// use kopi_core::money::Money;
/// use kopi_core::validation::validate_price;
///
/// assert!(validate_price(Money::from_units(20000)).is_ok());
/// assert!(validate_price(Money::zero()).is_ok());
/// assert!(validate_price(Money::from_units(-100)).is_err());
/// ```
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a tax rate in basis points.
///
/// ## Rules
/// - Must be between 0 and 10000 (0% to 100%)
pub fn validate_tax_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10000 {
        return Err(ValidationError::OutOfRange {
            field: "taxRate".to_string(),
            min: 0,
            max: 10000,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
