//! # Input Coercion
//!
//! Quantity and amount fields are edited live in text inputs, so they pass
//! through states like `""`, `"-"` or `"50.0"` while the cashier types.
//! The lenient functions here clamp those to safe defaults instead of
//! failing; [`parse_amount`] is the strict variant used right before
//! submission.
//!
//! Amounts are whole rupiah. `.` and `,` are treated as thousands
//! separators, and an optional `Rp` prefix is ignored:
//! `"Rp 50.000"` → 50000.

use crate::error::ValidationError;
use crate::money::Money;
use crate::{DEFAULT_LINE_QUANTITY, MAX_LINE_QUANTITY};

/// Parses a quantity field; anything unparseable or below 1 becomes 1, and
/// anything above [`MAX_LINE_QUANTITY`] becomes the maximum.
///
/// ## Example
/// ```rust
/// use kopi_core::coerce::coerce_quantity;
///
/// assert_eq!(coerce_quantity("3"), 3);
/// assert_eq!(coerce_quantity(""), 1);
/// assert_eq!(coerce_quantity("-2"), 1);
/// assert_eq!(coerce_quantity("abc"), 1);
/// assert_eq!(coerce_quantity("5000"), 999);
/// ```
pub fn coerce_quantity(input: &str) -> i64 {
    let normalized = normalize_number(input);
    match normalized.parse::<i64>() {
        Ok(qty) => qty.clamp(DEFAULT_LINE_QUANTITY, MAX_LINE_QUANTITY),
        // Too many digits for i64
        Err(_) if !normalized.is_empty() && normalized.bytes().all(|b| b.is_ascii_digit()) => MAX_LINE_QUANTITY,
        Err(_) => DEFAULT_LINE_QUANTITY,
    }
}

/// Parses an amount field; anything unparseable or negative becomes zero.
///
/// ## Example
/// ```rust
/// use kopi_core::coerce::coerce_amount;
///
/// assert_eq!(coerce_amount("Rp 50.000").units(), 50000);
/// assert_eq!(coerce_amount("lima puluh").units(), 0);
/// ```
pub fn coerce_amount(input: &str) -> Money {
    normalize_number(input)
        .parse::<i64>()
        .map(|units| Money::from_units(units).non_negative())
        .unwrap_or_default()
}

/// Strict amount parsing for submission.
///
/// ## Errors
/// - `Required` for blank input
/// - `InvalidFormat` for non-numeric input
/// - `OutOfRange` for negative amounts
pub fn parse_amount(field: &str, input: &str) -> Result<Money, ValidationError> {
    let normalized = normalize_number(input);
    if normalized.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    let units = normalized
        .parse::<i64>()
        .map_err(|_| ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: format!("'{}' is not a whole amount", input.trim()),
        })?;

    if units < 0 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }
    Ok(Money::from_units(units))
}

fn normalize_number(input: &str) -> String {
    let trimmed = input.trim();
    let without_prefix = trimmed
        .strip_prefix("Rp")
        .or_else(|| trimmed.strip_prefix("rp"))
        .or_else(|| trimmed.strip_prefix("RP"))
        .unwrap_or(trimmed);
    without_prefix
        .chars()
        .filter(|c| !matches!(c, '.' | ',' | ' ' | '_'))
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_quantity_transient_states() {
        assert_eq!(coerce_quantity("12"), 12);
        assert_eq!(coerce_quantity(" 4 "), 4);
        assert_eq!(coerce_quantity("0"), 1);
        assert_eq!(coerce_quantity("-"), 1);
        assert_eq!(coerce_quantity("1e3"), 1);
    }

    #[test]
    fn test_coerce_quantity_caps_large_input() {
        assert_eq!(coerce_quantity("999"), 999);
        assert_eq!(coerce_quantity("1.000"), MAX_LINE_QUANTITY);
        assert_eq!(coerce_quantity("99999999999999"), MAX_LINE_QUANTITY);
        assert_eq!(coerce_quantity("99999999999999999999999"), MAX_LINE_QUANTITY);
        assert_eq!(coerce_quantity("-99999999999999999999999"), 1);
    }

    #[test]
    fn test_coerce_amount_separators() {
        assert_eq!(coerce_amount("50000").units(), 50000);
        assert_eq!(coerce_amount("50.000").units(), 50000);
        assert_eq!(coerce_amount("1,250,000").units(), 1_250_000);
        assert_eq!(coerce_amount("rp 20 000").units(), 20000);
        assert_eq!(coerce_amount("-5000"), Money::zero());
        assert_eq!(coerce_amount(""), Money::zero());
    }

    #[test]
    fn test_parse_amount_strict() {
        assert_eq!(parse_amount("amountReceived", "Rp 50.000").unwrap().units(), 50000);
        assert!(matches!(
            parse_amount("amountReceived", "  "),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            parse_amount("amountReceived", "lima"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(matches!(
            parse_amount("amountReceived", "-100"),
            Err(ValidationError::OutOfRange { .. })
        ));
    }
}
