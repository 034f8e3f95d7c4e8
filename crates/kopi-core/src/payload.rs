//! # Order Payload Builder
//!
//! Converts a cart into the payload the order-creation service accepts.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Cashier presses "Pay"                                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate_checkout(cart) ── empty cart? ─────────► EmptyCart           │
//! │       │                 └── reseller, none set? ─► ResellerRequired    │
//! │       ▼                                                                 │
//! │  ClientId::generate()      (one per submission attempt)                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  build_order_payload() ──► OrderPayload ──► order service (external)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here talks to the network: a validation failure means no call
//! is attempted at all.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;
use uuid::Uuid;

use crate::cart::{Cart, CartLine};
use crate::coerce::parse_amount;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Channel, DiscountDescriptor, PaymentMethod, PaymentStatus, TaxRate};

// =============================================================================
// Client Id
// =============================================================================

/// Idempotency token for one submission attempt.
///
/// The order service uses it to ignore duplicate deliveries of the same
/// attempt. A retry after a failure must use a new one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(transparent)]
pub struct ClientId(String);

impl ClientId {
    /// Generates a fresh UUID v4 token.
    pub fn generate() -> Self {
        ClientId(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Wire Types
// =============================================================================

/// One line of the order payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemPayload {
    pub menu_id: String,
    pub variant_key: Option<String>,
    pub quantity: i64,
    pub unit_price: Money,
    pub channel: Channel,
}

impl From<&CartLine> for OrderItemPayload {
    fn from(line: &CartLine) -> Self {
        OrderItemPayload {
            menu_id: line.menu_id().to_string(),
            variant_key: line.variant_key().map(str::to_string),
            quantity: line.quantity(),
            unit_price: line.unit_price(),
            channel: line.channel(),
        }
    }
}

/// Payload for the order-creation service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayload {
    pub channel: Channel,
    pub reseller_id: Option<String>,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    /// Only set for unpaid reseller orders.
    #[ts(as = "Option<String>")]
    pub due_date: Option<NaiveDate>,
    pub note: String,
    pub customer_name: String,
    pub items: Vec<OrderItemPayload>,
    pub discount: DiscountDescriptor,
    /// Fraction, e.g. `0.11`.
    pub tax_rate: f64,
    pub bypass_served: bool,
    /// Only set for cash payments.
    pub amount_received: Option<Money>,
    pub client_id: ClientId,
}

// =============================================================================
// Builder
// =============================================================================

/// Local preconditions for checkout.
///
/// ## Errors
/// - `EmptyCart` when there are no lines
/// - `ResellerRequired` on the reseller channel without a reseller
/// - `Validation` for a cash payment whose typed amount is not a
///   non-negative whole number
pub fn validate_checkout(cart: &Cart) -> CoreResult<()> {
    if cart.is_empty() {
        return Err(CoreError::EmptyCart);
    }
    if cart.channel() == Channel::Reseller && cart.reseller_id().is_none() {
        return Err(CoreError::ResellerRequired);
    }

    let payment = cart.payment();
    if payment.method.is_cash() {
        if let Some(input) = &payment.amount_received_input {
            parse_amount("amountReceived", input)?;
        }
    }
    Ok(())
}

/// Builds the order payload for `cart`.
///
/// `default_tax_rate` applies when the cart has no override, the same way
/// [`crate::cart::compute_totals`] resolves it.
pub fn build_order_payload(cart: &Cart, default_tax_rate: TaxRate, client_id: ClientId) -> CoreResult<OrderPayload> {
    validate_checkout(cart)?;

    let payment = cart.payment();
    let is_reseller = cart.channel() == Channel::Reseller;

    let due_date = if is_reseller && payment.status == PaymentStatus::Unpaid {
        payment.due_date
    } else {
        None
    };

    let amount_received = if payment.method.is_cash() {
        payment.amount_received
    } else {
        None
    };

    Ok(OrderPayload {
        channel: cart.channel(),
        reseller_id: if is_reseller {
            cart.reseller_id().map(str::to_string)
        } else {
            None
        },
        payment_method: payment.method,
        payment_status: payment.status,
        due_date,
        note: payment.note.trim().to_string(),
        customer_name: cart.customer_name().trim().to_string(),
        items: cart.lines().iter().map(OrderItemPayload::from).collect(),
        discount: cart.discount().into(),
        tax_rate: cart.tax_rate().unwrap_or(default_tax_rate).fraction(),
        bypass_served: cart.bypass_served(),
        amount_received,
        client_id,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::{LineSpec, VariantSelection};
    use crate::error::ValidationError;
    use crate::types::{Discount, Percent};

    fn cart_with_latte() -> Cart {
        let mut cart = Cart::new();
        cart.add_line(
            LineSpec::variant(
                "latte",
                "Latte",
                VariantSelection::new("M", "Iced"),
                Money::from_units(24000),
                Channel::Retail,
            )
            .with_quantity(2),
        );
        cart
    }

    #[test]
    fn test_empty_cart_rejected() {
        let err = build_order_payload(&Cart::new(), TaxRate::from_bps(1100), ClientId::generate()).unwrap_err();
        assert_eq!(err, CoreError::EmptyCart);
    }

    #[test]
    fn test_reseller_requires_selection() {
        let mut cart = cart_with_latte();
        cart.set_channel(Channel::Reseller);
        assert_eq!(validate_checkout(&cart), Err(CoreError::ResellerRequired));

        cart.set_reseller(Some("res-1".to_string()));
        assert!(validate_checkout(&cart).is_ok());
    }

    #[test]
    fn test_non_numeric_cash_amount_rejected() {
        let mut cart = cart_with_latte();
        cart.set_amount_received_text("lima puluh ribu");

        let err = build_order_payload(&cart, TaxRate::from_bps(1100), ClientId::generate()).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::InvalidFormat { ref field, .. }) if field == "amountReceived"
        ));

        cart.set_amount_received_text("-5000");
        assert!(validate_checkout(&cart).is_err());

        cart.set_amount_received_text("Rp 50.000");
        let payload = build_order_payload(&cart, TaxRate::from_bps(1100), ClientId::generate()).unwrap();
        assert_eq!(payload.amount_received, Some(Money::from_units(50000)));
    }

    #[test]
    fn test_typed_amount_ignored_for_non_cash() {
        let mut cart = cart_with_latte();
        cart.set_amount_received_text("abc");
        cart.set_payment_method(PaymentMethod::Qris);
        assert!(validate_checkout(&cart).is_ok());
    }

    #[test]
    fn test_retail_cash_payload() {
        let mut cart = cart_with_latte();
        cart.set_discount(Discount::Percentage(Percent::from_percentage(10.0)));
        cart.set_amount_received(Some(Money::from_units(100000)));
        cart.set_customer_name("  Sari ");
        cart.set_bypass_served(true);

        let client_id = ClientId::generate();
        let payload = build_order_payload(&cart, TaxRate::from_bps(1100), client_id.clone()).unwrap();

        assert_eq!(payload.channel, Channel::Retail);
        assert_eq!(payload.reseller_id, None);
        assert_eq!(payload.customer_name, "Sari");
        assert_eq!(payload.items.len(), 1);
        assert_eq!(payload.items[0].variant_key.as_deref(), Some("M|Iced"));
        assert_eq!(payload.items[0].unit_price.units(), 24000);
        assert!((payload.tax_rate - 0.11).abs() < 1e-9);
        assert_eq!(payload.amount_received, Some(Money::from_units(100000)));
        assert!(payload.bypass_served);
        assert_eq!(payload.client_id, client_id);
    }

    #[test]
    fn test_non_cash_has_no_amount_received() {
        let mut cart = cart_with_latte();
        cart.set_amount_received(Some(Money::from_units(100000)));
        cart.set_payment_method(PaymentMethod::Transfer);
        cart.set_amount_received(Some(Money::from_units(100000)));

        let payload = build_order_payload(&cart, TaxRate::zero(), ClientId::generate()).unwrap();
        assert_eq!(payload.amount_received, None);
    }

    #[test]
    fn test_due_date_only_for_unpaid_reseller() {
        let due = NaiveDate::from_ymd_opt(2026, 11, 30);

        let mut cart = cart_with_latte();
        cart.set_channel(Channel::Reseller);
        cart.set_reseller(Some("res-1".to_string()));
        cart.set_payment_status(PaymentStatus::Unpaid);
        cart.set_due_date(due);
        let payload = build_order_payload(&cart, TaxRate::zero(), ClientId::generate()).unwrap();
        assert_eq!(payload.due_date, due);
        assert_eq!(payload.reseller_id.as_deref(), Some("res-1"));

        cart.set_payment_status(PaymentStatus::Paid);
        cart.set_due_date(due);
        let payload = build_order_payload(&cart, TaxRate::zero(), ClientId::generate()).unwrap();
        assert_eq!(payload.due_date, None);
    }

    #[test]
    fn test_payload_wire_field_names() {
        let cart = cart_with_latte();
        let payload = build_order_payload(&cart, TaxRate::from_bps(1100), ClientId::generate()).unwrap();
        let json = serde_json::to_value(&payload).unwrap();

        for key in [
            "channel",
            "resellerId",
            "paymentMethod",
            "paymentStatus",
            "dueDate",
            "note",
            "customerName",
            "items",
            "discount",
            "taxRate",
            "bypassServed",
            "amountReceived",
            "clientId",
        ] {
            assert!(json.get(key).is_some(), "missing {}", key);
        }
        assert_eq!(json["items"][0]["menuId"], "latte");
        assert_eq!(json["discount"]["mode"], "none");
    }

    #[test]
    fn test_client_ids_are_unique() {
        assert_ne!(ClientId::generate(), ClientId::generate());
    }
}
