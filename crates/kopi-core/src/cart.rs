//! # Cart Aggregator
//!
//! In-memory cart state and the totals computed from it.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Cashier Action           Operation               Cart Change           │
//! │  ──────────────           ─────────               ───────────           │
//! │                                                                         │
//! │  Pick item + variant ───► add_line() ───────────► lines.push(new line) │
//! │                                                                         │
//! │  Change quantity ───────► update_quantity() ────► line.qty = n (1..999)│
//! │                                                                         │
//! │  Click remove ──────────► remove_line() ────────► lines.retain(..)     │
//! │                                                                         │
//! │  Pick discount ─────────► set_discount() ───────► discount replaced    │
//! │                                                                         │
//! │  Clear / submitted ─────► clear() ──────────────► fresh default cart   │
//! │                                                                         │
//! │  Any render ────────────► compute_totals() ─────► (read only)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Every line has `1 ≤ quantity ≤ MAX_LINE_QUANTITY`; a mutation that
//!   would break this is ignored rather than applied
//! - A persisted line that breaks this (or has a negative price) fails to
//!   deserialize, so a tampered cart is never resumed
//! - Identical items added twice become two independent lines
//! - A line's unit price and channel are fixed at add time
//! - Lines are only reachable mutably through the operations below

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::coerce::coerce_amount;
use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{Channel, Discount, DiscountDescriptor, Payment, PaymentMethod, PaymentStatus, TaxRate};
use crate::validation::{validate_id, validate_price, validate_quantity};
use crate::{DEFAULT_LINE_QUANTITY, MAX_LINE_QUANTITY};

// =============================================================================
// Line Spec
// =============================================================================

/// The size/temperature a variant line was sold as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct VariantSelection {
    pub size: String,
    pub temperature: String,
}

impl VariantSelection {
    pub fn new(size: impl Into<String>, temperature: impl Into<String>) -> Self {
        VariantSelection {
            size: size.into(),
            temperature: temperature.into(),
        }
    }

    /// Stable key sent to the order service (`"M|Iced"`).
    pub fn key(&self) -> String {
        format!("{}|{}", self.size, self.temperature)
    }

    /// Human-readable label (`"M / Iced"`).
    pub fn label(&self) -> String {
        format!("{} / {}", self.size, self.temperature)
    }
}

/// Everything needed to add a line, with the unit price already resolved.
///
/// Build one with [`crate::pricing::MenuItem::line_spec`] so the price comes
/// from the resolver, or directly when the price is known.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSpec {
    pub menu_id: String,
    pub name: String,
    pub variant: Option<VariantSelection>,
    pub unit_price: Money,
    pub quantity: i64,
    pub channel: Channel,
}

impl LineSpec {
    /// A line for an item without variants.
    pub fn simple(menu_id: impl Into<String>, name: impl Into<String>, unit_price: Money, channel: Channel) -> Self {
        LineSpec {
            menu_id: menu_id.into(),
            name: name.into(),
            variant: None,
            unit_price,
            quantity: DEFAULT_LINE_QUANTITY,
            channel,
        }
    }

    /// A line for a specific variant combination.
    pub fn variant(
        menu_id: impl Into<String>,
        name: impl Into<String>,
        selection: VariantSelection,
        unit_price: Money,
        channel: Channel,
    ) -> Self {
        LineSpec {
            variant: Some(selection),
            ..LineSpec::simple(menu_id, name, unit_price, channel)
        }
    }

    pub fn with_quantity(mut self, quantity: i64) -> Self {
        self.quantity = quantity;
        self
    }
}

// =============================================================================
// Cart Line
// =============================================================================

/// A line in the cart.
///
/// ## Price Freezing
/// `unit_price` is captured once when the line is added. If the catalog
/// price changes afterwards, the line keeps the original price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", try_from = "CartLineRecord")]
pub struct CartLine {
    line_id: String,
    menu_id: String,
    name: String,
    variant_key: Option<String>,
    variant_label: Option<String>,
    size: Option<String>,
    temperature: Option<String>,
    unit_price: Money,
    quantity: i64,
    channel: Channel,
    #[ts(as = "String")]
    added_at: DateTime<Utc>,
}

impl CartLine {
    fn from_spec(spec: LineSpec) -> Self {
        let (variant_key, variant_label, size, temperature) = match &spec.variant {
            Some(v) => (
                Some(v.key()),
                Some(v.label()),
                Some(v.size.clone()),
                Some(v.temperature.clone()),
            ),
            None => (None, None, None, None),
        };

        CartLine {
            line_id: Uuid::new_v4().to_string(),
            menu_id: spec.menu_id,
            name: spec.name,
            variant_key,
            variant_label,
            size,
            temperature,
            unit_price: spec.unit_price,
            quantity: spec.quantity.clamp(DEFAULT_LINE_QUANTITY, MAX_LINE_QUANTITY),
            channel: spec.channel,
            added_at: Utc::now(),
        }
    }

    pub fn line_id(&self) -> &str {
        &self.line_id
    }

    pub fn menu_id(&self) -> &str {
        &self.menu_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn variant_key(&self) -> Option<&str> {
        self.variant_key.as_deref()
    }

    pub fn variant_label(&self) -> Option<&str> {
        self.variant_label.as_deref()
    }

    pub fn size(&self) -> Option<&str> {
        self.size.as_deref()
    }

    pub fn temperature(&self) -> Option<&str> {
        self.temperature.as_deref()
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    pub fn added_at(&self) -> DateTime<Utc> {
        self.added_at
    }

    /// Unit price × quantity.
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

/// Persisted shape of a [`CartLine`], checked before it becomes one.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CartLineRecord {
    line_id: String,
    menu_id: String,
    name: String,
    variant_key: Option<String>,
    variant_label: Option<String>,
    size: Option<String>,
    temperature: Option<String>,
    unit_price: Money,
    quantity: i64,
    channel: Channel,
    added_at: DateTime<Utc>,
}

impl TryFrom<CartLineRecord> for CartLine {
    type Error = ValidationError;

    fn try_from(record: CartLineRecord) -> Result<Self, Self::Error> {
        validate_id("lineId", &record.line_id)?;
        validate_price(record.unit_price)?;
        validate_quantity(record.quantity)?;

        Ok(CartLine {
            line_id: record.line_id,
            menu_id: record.menu_id,
            name: record.name,
            variant_key: record.variant_key,
            variant_label: record.variant_label,
            size: record.size,
            temperature: record.temperature,
            unit_price: record.unit_price,
            quantity: record.quantity,
            channel: record.channel,
            added_at: record.added_at,
        })
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The cart for one POS session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    lines: Vec<CartLine>,
    #[ts(as = "DiscountDescriptor")]
    discount: Discount,
    /// Cart-level override; `None` uses the store default.
    tax_rate: Option<TaxRate>,
    channel: Channel,
    reseller_id: Option<String>,
    customer_name: String,
    payment: Payment,
    bypass_served: bool,
    #[ts(as = "String")]
    created_at: DateTime<Utc>,
}

impl Default for Cart {
    fn default() -> Self {
        Cart::new()
    }
}

impl Cart {
    /// Creates a new empty cart: retail channel, no discount, cash payment.
    pub fn new() -> Self {
        Cart::with_defaults(Channel::Retail, PaymentMethod::default())
    }

    /// Creates a new empty cart with the given starting channel and
    /// payment method.
    pub fn with_defaults(channel: Channel, payment_method: PaymentMethod) -> Self {
        Cart {
            lines: Vec::new(),
            discount: Discount::None,
            tax_rate: None,
            channel,
            reseller_id: None,
            customer_name: String::new(),
            payment: Payment::with_method(payment_method),
            bypass_served: false,
            created_at: Utc::now(),
        }
    }

    // -------------------------------------------------------------------------
    // Line operations
    // -------------------------------------------------------------------------

    /// Appends a new line and returns its freshly generated id.
    ///
    /// Never merges with an existing line. The quantity is clamped to
    /// `1..=MAX_LINE_QUANTITY`.
    pub fn add_line(&mut self, spec: LineSpec) -> String {
        let line = CartLine::from_spec(spec);
        let line_id = line.line_id.clone();
        self.lines.push(line);
        line_id
    }

    /// Replaces the quantity of the matching line.
    ///
    /// ## Behavior
    /// - `qty < 1` or `qty > MAX_LINE_QUANTITY`: no-op, the line keeps its
    ///   quantity
    /// - unknown `line_id`: no-op
    ///
    /// Returns true if a line changed.
    pub fn update_quantity(&mut self, line_id: &str, qty: i64) -> bool {
        if !(DEFAULT_LINE_QUANTITY..=MAX_LINE_QUANTITY).contains(&qty) {
            return false;
        }
        match self.lines.iter_mut().find(|l| l.line_id == line_id) {
            Some(line) => {
                line.quantity = qty;
                true
            }
            None => false,
        }
    }

    /// Removes the matching line. Removing an unknown id is not an error.
    ///
    /// Returns true if a line was removed.
    pub fn remove_line(&mut self, line_id: &str) -> bool {
        let initial_len = self.lines.len();
        self.lines.retain(|l| l.line_id != line_id);
        self.lines.len() != initial_len
    }

    // -------------------------------------------------------------------------
    // Form fields
    // -------------------------------------------------------------------------

    /// Replaces the discount wholesale.
    pub fn set_discount(&mut self, discount: Discount) {
        self.discount = discount;
    }

    pub fn set_tax_rate(&mut self, tax_rate: Option<TaxRate>) {
        self.tax_rate = tax_rate;
    }

    /// Switches the channel for lines added from now on.
    ///
    /// Existing lines keep their own channel and price. Switching to retail
    /// drops the reseller selection and any due date.
    pub fn set_channel(&mut self, channel: Channel) {
        self.channel = channel;
        if channel == Channel::Retail {
            self.reseller_id = None;
            self.payment.due_date = None;
        }
    }

    /// Selects (or clears) the reseller. Blank ids clear it.
    pub fn set_reseller(&mut self, reseller_id: Option<String>) {
        self.reseller_id = reseller_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty());
    }

    pub fn set_customer_name(&mut self, name: impl Into<String>) {
        self.customer_name = name.into();
    }

    /// Switching away from cash drops the received amount.
    pub fn set_payment_method(&mut self, method: PaymentMethod) {
        self.payment.method = method;
        if !method.is_cash() {
            self.payment.amount_received = None;
            self.payment.amount_received_input = None;
        }
    }

    pub fn set_payment_status(&mut self, status: PaymentStatus) {
        self.payment.status = status;
        if status == PaymentStatus::Paid {
            self.payment.due_date = None;
        }
    }

    pub fn set_due_date(&mut self, due_date: Option<NaiveDate>) {
        self.payment.due_date = due_date;
    }

    pub fn set_amount_received(&mut self, amount: Option<Money>) {
        self.payment.amount_received = amount.map(Money::non_negative);
        self.payment.amount_received_input = None;
    }

    /// Cash received as typed. Blank clears it.
    ///
    /// The amount is coerced for live totals, and the raw text is kept so
    /// checkout can reject input that is not a number.
    pub fn set_amount_received_text(&mut self, input: &str) {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            self.payment.amount_received = None;
            self.payment.amount_received_input = None;
        } else {
            self.payment.amount_received = Some(coerce_amount(trimmed));
            self.payment.amount_received_input = Some(trimmed.to_string());
        }
    }

    pub fn set_note(&mut self, note: impl Into<String>) {
        self.payment.note = note.into();
    }

    pub fn set_bypass_served(&mut self, bypass: bool) {
        self.bypass_served = bypass;
    }

    /// Resets to an empty cart starting on `channel` with `payment_method`.
    pub fn clear(&mut self, channel: Channel, payment_method: PaymentMethod) {
        *self = Cart::with_defaults(channel, payment_method);
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line(&self, line_id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.line_id == line_id)
    }

    pub fn discount(&self) -> Discount {
        self.discount
    }

    pub fn tax_rate(&self) -> Option<TaxRate> {
        self.tax_rate
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    pub fn reseller_id(&self) -> Option<&str> {
        self.reseller_id.as_deref()
    }

    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    pub fn payment(&self) -> &Payment {
        &self.payment
    }

    pub fn bypass_served(&self) -> bool {
        self.bypass_served
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the number of lines in the cart.
    pub fn item_count(&self) -> usize {
        self.lines.len()
    }

    /// Returns the total quantity across lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Σ unit price × quantity.
    pub fn subtotal(&self) -> Money {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

// =============================================================================
// Totals
// =============================================================================

/// Totals derived from a cart snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub item_count: usize,
    pub total_quantity: i64,
    pub subtotal: Money,
    pub discount_amount: Money,
    pub net_total: Money,
    pub tax_rate: TaxRate,
    pub tax: Money,
    pub grand_total: Money,
    /// Cash payments only; zero otherwise.
    pub change_due: Money,
}

/// Computes totals for `cart`.
///
/// ## Calculation Steps
/// 1. `subtotal = Σ(unit_price × quantity)`
/// 2. `discount_amount` from the discount mode, within `[0, subtotal]`
/// 3. `net_total = max(subtotal − discount_amount, 0)`
/// 4. `tax = round(net_total × tax_rate)`; the cart's rate, else `default_tax_rate`
/// 5. `grand_total = net_total + tax`
/// 6. `change_due = max(amount_received − grand_total, 0)` for cash, else 0
///
/// Pure: calling it twice on the same cart gives the same result.
pub fn compute_totals(cart: &Cart, default_tax_rate: TaxRate) -> CartTotals {
    let subtotal = cart.subtotal();
    let discount_amount = cart.discount.amount(subtotal);
    let net_total = (subtotal - discount_amount).non_negative();

    let tax_rate = cart.tax_rate.unwrap_or(default_tax_rate);
    let tax = tax_rate.tax_on(net_total);
    let grand_total = net_total + tax;

    let change_due = match (cart.payment.method, cart.payment.amount_received) {
        (PaymentMethod::Cash, Some(received)) => (received - grand_total).non_negative(),
        _ => Money::zero(),
    };

    CartTotals {
        item_count: cart.item_count(),
        total_quantity: cart.total_quantity(),
        subtotal,
        discount_amount,
        net_total,
        tax_rate,
        tax,
        grand_total,
        change_due,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Percent;

    fn eleven_percent() -> TaxRate {
        TaxRate::from_fraction(0.11)
    }

    fn kopi_susu(qty: i64) -> LineSpec {
        LineSpec::simple("kopi-susu", "Es Kopi Susu", Money::from_units(20000), Channel::Retail)
            .with_quantity(qty)
    }

    #[test]
    fn test_add_line_never_merges() {
        let mut cart = Cart::new();
        let a = cart.add_line(kopi_susu(1));
        let b = cart.add_line(kopi_susu(1));

        assert_ne!(a, b);
        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.total_quantity(), 2);
    }

    #[test]
    fn test_add_line_defaults_quantity_to_one() {
        let mut cart = Cart::new();
        let id = cart.add_line(kopi_susu(0));
        assert_eq!(cart.line(&id).unwrap().quantity(), 1);
    }

    #[test]
    fn test_variant_line_carries_key_and_label() {
        let mut cart = Cart::new();
        let spec = LineSpec::variant(
            "latte",
            "Latte",
            VariantSelection::new("M", "Iced"),
            Money::from_units(24000),
            Channel::Retail,
        );
        let id = cart.add_line(spec);
        let line = cart.line(&id).unwrap();

        assert_eq!(line.variant_key(), Some("M|Iced"));
        assert_eq!(line.variant_label(), Some("M / Iced"));
        assert_eq!(line.size(), Some("M"));
        assert_eq!(line.temperature(), Some("Iced"));
    }

    #[test]
    fn test_update_quantity_floor_is_noop() {
        let mut cart = Cart::new();
        let id = cart.add_line(kopi_susu(3));

        assert!(!cart.update_quantity(&id, 0));
        assert!(!cart.update_quantity(&id, -5));
        assert_eq!(cart.line(&id).unwrap().quantity(), 3);

        assert!(cart.update_quantity(&id, 7));
        assert_eq!(cart.line(&id).unwrap().quantity(), 7);
    }

    #[test]
    fn test_update_quantity_ceiling() {
        let mut cart = Cart::new();
        let id = cart.add_line(kopi_susu(3));

        assert!(!cart.update_quantity(&id, MAX_LINE_QUANTITY + 1));
        assert!(!cart.update_quantity(&id, 99_999_999_999_999));
        assert_eq!(cart.line(&id).unwrap().quantity(), 3);

        assert!(cart.update_quantity(&id, MAX_LINE_QUANTITY));
        assert_eq!(cart.line(&id).unwrap().quantity(), MAX_LINE_QUANTITY);
    }

    #[test]
    fn test_add_line_clamps_quantity() {
        let mut cart = Cart::new();
        let id = cart.add_line(kopi_susu(99_999_999_999_999));
        assert_eq!(cart.line(&id).unwrap().quantity(), MAX_LINE_QUANTITY);
    }

    #[test]
    fn test_totals_stay_non_negative_for_extreme_prices() {
        let mut cart = Cart::new();
        cart.add_line(LineSpec::simple("gold", "Gold Bar", Money::from_units(i64::MAX / 2), Channel::Retail)
            .with_quantity(MAX_LINE_QUANTITY));
        cart.add_line(kopi_susu(MAX_LINE_QUANTITY));

        let totals = compute_totals(&cart, eleven_percent());
        assert_eq!(totals.subtotal.units(), i64::MAX);
        assert!(totals.grand_total >= totals.net_total);
        assert!(!totals.grand_total.is_negative());
    }

    #[test]
    fn test_update_unknown_line_is_noop() {
        let mut cart = Cart::new();
        cart.add_line(kopi_susu(1));
        assert!(!cart.update_quantity("missing", 4));
        assert_eq!(cart.total_quantity(), 1);
    }

    #[test]
    fn test_remove_line_is_idempotent() {
        let mut cart = Cart::new();
        let id = cart.add_line(kopi_susu(1));

        assert!(cart.remove_line(&id));
        assert!(!cart.remove_line(&id));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_percentage_discount_scenario() {
        let mut cart = Cart::new();
        cart.add_line(kopi_susu(2));
        cart.set_discount(Discount::Percentage(Percent::from_percentage(10.0)));

        let totals = compute_totals(&cart, eleven_percent());
        assert_eq!(totals.subtotal.units(), 40000);
        assert_eq!(totals.discount_amount.units(), 4000);
        assert_eq!(totals.net_total.units(), 36000);
        assert_eq!(totals.tax.units(), 3960);
        assert_eq!(totals.grand_total.units(), 39960);
    }

    #[test]
    fn test_nominal_discount_clamped_to_subtotal() {
        let mut cart = Cart::new();
        cart.add_line(kopi_susu(2));
        cart.set_discount(Discount::Nominal(Money::from_units(50000)));

        let totals = compute_totals(&cart, eleven_percent());
        assert_eq!(totals.discount_amount.units(), 40000);
        assert_eq!(totals.net_total, Money::zero());
        assert_eq!(totals.tax, Money::zero());
        assert_eq!(totals.grand_total, Money::zero());
    }

    #[test]
    fn test_change_due_cash_only() {
        let mut cart = Cart::new();
        cart.add_line(kopi_susu(2));
        cart.set_discount(Discount::Percentage(Percent::from_percentage(10.0)));

        cart.set_amount_received(Some(Money::from_units(50000)));
        assert_eq!(compute_totals(&cart, eleven_percent()).change_due.units(), 10040);

        cart.set_amount_received(Some(Money::from_units(30000)));
        assert_eq!(compute_totals(&cart, eleven_percent()).change_due, Money::zero());

        cart.set_payment_method(PaymentMethod::Qris);
        cart.set_amount_received(Some(Money::from_units(50000)));
        assert_eq!(compute_totals(&cart, eleven_percent()).change_due, Money::zero());
    }

    #[test]
    fn test_cart_tax_override_beats_default() {
        let mut cart = Cart::new();
        cart.add_line(kopi_susu(1));
        cart.set_tax_rate(Some(TaxRate::zero()));

        let totals = compute_totals(&cart, eleven_percent());
        assert_eq!(totals.tax, Money::zero());
        assert_eq!(totals.grand_total.units(), 20000);
    }

    #[test]
    fn test_compute_totals_is_idempotent() {
        let mut cart = Cart::new();
        cart.add_line(kopi_susu(3));
        cart.set_discount(Discount::Percentage(Percent::from_percentage(12.5)));
        let before = cart.clone();

        let first = compute_totals(&cart, eleven_percent());
        let second = compute_totals(&cart, eleven_percent());
        assert_eq!(first, second);
        assert_eq!(cart, before);
    }

    #[test]
    fn test_switch_to_retail_drops_reseller() {
        let mut cart = Cart::new();
        cart.set_channel(Channel::Reseller);
        cart.set_reseller(Some("res-9".to_string()));
        cart.set_payment_status(PaymentStatus::Unpaid);
        cart.set_due_date(NaiveDate::from_ymd_opt(2026, 11, 1));

        cart.set_channel(Channel::Retail);
        assert_eq!(cart.reseller_id(), None);
        assert_eq!(cart.payment().due_date, None);
    }

    #[test]
    fn test_blank_reseller_clears_selection() {
        let mut cart = Cart::new();
        cart.set_reseller(Some("  ".to_string()));
        assert_eq!(cart.reseller_id(), None);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut cart = Cart::new();
        cart.add_line(kopi_susu(2));
        cart.set_discount(Discount::Nominal(Money::from_units(1000)));
        cart.set_payment_method(PaymentMethod::Transfer);
        cart.set_customer_name("Budi");

        cart.clear(Channel::Retail, PaymentMethod::Cash);
        assert!(cart.is_empty());
        assert_eq!(cart.discount(), Discount::None);
        assert!(cart.payment().method.is_cash());
        assert_eq!(cart.customer_name(), "");
    }

    #[test]
    fn test_clear_uses_given_defaults() {
        let mut cart = Cart::with_defaults(Channel::Reseller, PaymentMethod::Transfer);
        cart.add_line(kopi_susu(1));
        cart.set_payment_method(PaymentMethod::Cash);

        cart.clear(Channel::Reseller, PaymentMethod::Qris);
        assert!(cart.is_empty());
        assert_eq!(cart.channel(), Channel::Reseller);
        assert_eq!(cart.payment().method, PaymentMethod::Qris);
    }

    #[test]
    fn test_amount_received_text_keeps_raw_input() {
        let mut cart = Cart::new();
        cart.set_amount_received_text(" Rp 50.000 ");
        assert_eq!(cart.payment().amount_received, Some(Money::from_units(50000)));
        assert_eq!(cart.payment().amount_received_input.as_deref(), Some("Rp 50.000"));

        cart.set_amount_received_text("lima puluh ribu");
        assert_eq!(cart.payment().amount_received, Some(Money::zero()));
        assert_eq!(cart.payment().amount_received_input.as_deref(), Some("lima puluh ribu"));

        cart.set_amount_received(Some(Money::from_units(20000)));
        assert_eq!(cart.payment().amount_received_input, None);

        cart.set_amount_received_text("   ");
        assert_eq!(cart.payment().amount_received, None);
        assert_eq!(cart.payment().amount_received_input, None);
    }

    #[test]
    fn test_cart_round_trips_through_json() {
        let mut cart = Cart::new();
        cart.add_line(kopi_susu(2));
        cart.set_discount(Discount::Nominal(Money::from_units(1500)));

        let json = serde_json::to_string(&cart).unwrap();
        let restored: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, cart);
    }

    #[test]
    fn test_persisted_line_out_of_range_is_rejected() {
        let mut cart = Cart::new();
        cart.add_line(kopi_susu(2));
        let valid = serde_json::to_value(&cart).unwrap();

        for bad_quantity in [0, -3, MAX_LINE_QUANTITY + 1] {
            let mut value = valid.clone();
            value["lines"][0]["quantity"] = serde_json::json!(bad_quantity);
            assert!(serde_json::from_value::<Cart>(value).is_err(), "quantity {}", bad_quantity);
        }

        let mut value = valid.clone();
        value["lines"][0]["unitPrice"] = serde_json::to_value(Money::from_units(-20000)).unwrap();
        assert!(serde_json::from_value::<Cart>(value).is_err());

        let mut value = valid;
        value["lines"][0]["lineId"] = serde_json::json!("  ");
        assert!(serde_json::from_value::<Cart>(value).is_err());
    }
}
