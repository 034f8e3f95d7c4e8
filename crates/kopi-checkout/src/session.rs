//! # Cart Session
//!
//! Owns the cart for one cashier session and keeps the store in step with
//! it.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Cart Session Lifecycle                            │
//! │                                                                         │
//! │  CartSession::new(store, defaults)                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  init() ──► store.load()                                               │
//! │       │       ├── Some(cart) ─► resume it                               │
//! │       │       ├── None ───────► fresh cart from defaults                │
//! │       │       └── corrupt ────► warn, fresh cart                        │
//! │       ▼                                                                 │
//! │  add / update / remove / set_* ──► cart op ──► store.save(cart)        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  reset() ──► cart.clear(defaults) ──► store.clear()                    │
//! │  (explicit "clear cart", or after a successful submission)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A store failure never rolls back the in-memory change; it is logged and
//! returned so the UI can warn that the cart is not saved.
//!
//! The session also carries the cart's submitting flag. It is not
//! persisted: a restart always comes back able to submit.

use chrono::NaiveDate;
use tracing::{debug, warn};

use kopi_core::cart::{compute_totals, Cart, CartTotals, LineSpec};
use kopi_core::coerce::coerce_quantity;
use kopi_core::pricing::MenuItem;
use kopi_core::{Channel, Discount, Money, PaymentMethod, PaymentStatus, TaxRate, MAX_LINE_QUANTITY};

use crate::config::CheckoutConfig;
use crate::error::{CheckoutResult, StoreError};
use crate::store::CartStore;

// =============================================================================
// Session Defaults
// =============================================================================

/// What a fresh cart starts with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionDefaults {
    pub channel: Channel,
    pub payment_method: PaymentMethod,
    pub tax_rate: TaxRate,
}

impl Default for SessionDefaults {
    fn default() -> Self {
        SessionDefaults {
            channel: Channel::Retail,
            payment_method: PaymentMethod::Cash,
            tax_rate: TaxRate::from_bps(kopi_core::DEFAULT_TAX_RATE_BPS),
        }
    }
}

impl SessionDefaults {
    pub fn from_config(config: &CheckoutConfig) -> Self {
        SessionDefaults {
            channel: config.pricing.default_channel,
            payment_method: config.pricing.default_payment_method,
            tax_rate: config.default_tax_rate(),
        }
    }

    fn fresh_cart(&self) -> Cart {
        Cart::with_defaults(self.channel, self.payment_method)
    }
}

// =============================================================================
// Cart Session
// =============================================================================

/// Session-scoped owner of the cart.
///
/// The cart is only reachable mutably through the methods below, each of
/// which persists the result.
pub struct CartSession<S: CartStore> {
    store: S,
    defaults: SessionDefaults,
    cart: Cart,
    submitting: bool,
}

impl<S: CartStore> CartSession<S> {
    /// Creates a session with a fresh cart. Call [`CartSession::init`] to
    /// resume a persisted one.
    pub fn new(store: S, defaults: SessionDefaults) -> Self {
        CartSession {
            cart: defaults.fresh_cart(),
            store,
            defaults,
            submitting: false,
        }
    }

    /// Loads the persisted cart, if any.
    ///
    /// A corrupt cart file is discarded with a warning. I/O failures are
    /// returned and the session keeps a fresh cart.
    pub fn init(&mut self) -> CheckoutResult<()> {
        match self.store.load() {
            Ok(Some(cart)) => {
                debug!(lines = cart.item_count(), "Resuming persisted cart");
                self.cart = cart;
                Ok(())
            }
            Ok(None) => {
                debug!("No persisted cart, starting fresh");
                self.cart = self.defaults.fresh_cart();
                Ok(())
            }
            Err(StoreError::Corrupt(reason)) => {
                warn!(%reason, "Discarding corrupt persisted cart");
                self.cart = self.defaults.fresh_cart();
                self.persist()
            }
            Err(e) => {
                warn!(error = %e, "Failed to load persisted cart");
                self.cart = self.defaults.fresh_cart();
                Err(e.into())
            }
        }
    }

    /// Clears the cart back to the session defaults and clears the store.
    pub fn reset(&mut self) -> CheckoutResult<()> {
        debug!("Resetting cart session");
        self.cart.clear(self.defaults.channel, self.defaults.payment_method);
        self.submitting = false;
        self.store.clear().map_err(|e| {
            warn!(error = %e, "Failed to clear persisted cart");
            e.into()
        })
    }

    fn persist(&self) -> CheckoutResult<()> {
        self.store.save(&self.cart).map_err(|e| {
            warn!(error = %e, "Failed to persist cart");
            e.into()
        })
    }

    fn mutate<R>(&mut self, op: impl FnOnce(&mut Cart) -> R) -> CheckoutResult<R> {
        let result = op(&mut self.cart);
        self.persist()?;
        Ok(result)
    }

    // -------------------------------------------------------------------------
    // Line operations
    // -------------------------------------------------------------------------

    /// Resolves `item`'s price on the cart's channel and adds a line.
    ///
    /// A selection without a price is rejected here, before the cart
    /// changes.
    pub fn add_item(
        &mut self,
        item: &MenuItem,
        size: Option<&str>,
        temperature: Option<&str>,
        quantity: i64,
    ) -> CheckoutResult<String> {
        let spec = item
            .line_spec(self.cart.channel(), size, temperature)?
            .with_quantity(quantity);
        self.add_line(spec)
    }

    /// Adds a line whose price is already resolved.
    pub fn add_line(&mut self, spec: LineSpec) -> CheckoutResult<String> {
        debug!(menu_id = %spec.menu_id, price = spec.unit_price.units(), "Adding cart line");
        self.mutate(|cart| cart.add_line(spec))
    }

    /// Returns true if the line changed. Quantities outside
    /// `1..=MAX_LINE_QUANTITY` are ignored.
    pub fn update_quantity(&mut self, line_id: &str, qty: i64) -> CheckoutResult<bool> {
        if !(1..=MAX_LINE_QUANTITY).contains(&qty) {
            debug!(line_id, qty, "Ignoring out-of-range quantity");
            return Ok(false);
        }
        self.mutate(|cart| cart.update_quantity(line_id, qty))
    }

    /// Quantity straight from the text input.
    pub fn update_quantity_text(&mut self, line_id: &str, input: &str) -> CheckoutResult<bool> {
        self.update_quantity(line_id, coerce_quantity(input))
    }

    pub fn remove_line(&mut self, line_id: &str) -> CheckoutResult<bool> {
        self.mutate(|cart| cart.remove_line(line_id))
    }

    // -------------------------------------------------------------------------
    // Form fields
    // -------------------------------------------------------------------------

    pub fn set_discount(&mut self, discount: Discount) -> CheckoutResult<()> {
        self.mutate(|cart| cart.set_discount(discount))
    }

    pub fn set_tax_rate(&mut self, tax_rate: Option<TaxRate>) -> CheckoutResult<()> {
        self.mutate(|cart| cart.set_tax_rate(tax_rate))
    }

    pub fn set_channel(&mut self, channel: Channel) -> CheckoutResult<()> {
        self.mutate(|cart| cart.set_channel(channel))
    }

    pub fn set_reseller(&mut self, reseller_id: Option<String>) -> CheckoutResult<()> {
        self.mutate(|cart| cart.set_reseller(reseller_id))
    }

    pub fn set_customer_name(&mut self, name: impl Into<String>) -> CheckoutResult<()> {
        let name = name.into();
        self.mutate(|cart| cart.set_customer_name(name))
    }

    pub fn set_payment_method(&mut self, method: PaymentMethod) -> CheckoutResult<()> {
        self.mutate(|cart| cart.set_payment_method(method))
    }

    pub fn set_payment_status(&mut self, status: PaymentStatus) -> CheckoutResult<()> {
        self.mutate(|cart| cart.set_payment_status(status))
    }

    pub fn set_due_date(&mut self, due_date: Option<NaiveDate>) -> CheckoutResult<()> {
        self.mutate(|cart| cart.set_due_date(due_date))
    }

    pub fn set_amount_received(&mut self, amount: Option<Money>) -> CheckoutResult<()> {
        self.mutate(|cart| cart.set_amount_received(amount))
    }

    /// Cash received straight from the text input. Blank clears it.
    ///
    /// The raw text is kept on the cart so a submission can reject input
    /// that is not an amount at all.
    pub fn set_amount_received_text(&mut self, input: &str) -> CheckoutResult<()> {
        self.mutate(|cart| cart.set_amount_received_text(input))
    }

    pub fn set_note(&mut self, note: impl Into<String>) -> CheckoutResult<()> {
        let note = note.into();
        self.mutate(|cart| cart.set_note(note))
    }

    pub fn set_bypass_served(&mut self, bypass: bool) -> CheckoutResult<()> {
        self.mutate(|cart| cart.set_bypass_served(bypass))
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn defaults(&self) -> &SessionDefaults {
        &self.defaults
    }

    /// Tax rate used when the cart has no override.
    pub fn default_tax_rate(&self) -> TaxRate {
        self.defaults.tax_rate
    }

    pub fn totals(&self) -> CartTotals {
        compute_totals(&self.cart, self.defaults.tax_rate)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // -------------------------------------------------------------------------
    // Submission flag
    // -------------------------------------------------------------------------

    /// True while this cart is waiting on the order service, or after a
    /// submission was dropped before it finished.
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Clears the flag left behind by an abandoned submission. The next
    /// submit sends a new client id.
    pub fn release_submission(&mut self) {
        if self.submitting {
            debug!("Releasing abandoned submission");
        }
        self.submitting = false;
    }

    pub(crate) fn mark_submitting(&mut self) {
        self.submitting = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CheckoutError;
    use crate::store::MemoryCartStore;
    use kopi_core::pricing::FlatPrice;
    use kopi_core::variant::VariantConfigInput;
    use kopi_core::{CoreError, Percent};

    fn session() -> CartSession<MemoryCartStore> {
        let mut session = CartSession::new(MemoryCartStore::new(), SessionDefaults::default());
        session.init().unwrap();
        session
    }

    fn latte() -> MenuItem {
        let input = VariantConfigInput::new(["S", "M"], ["Hot", "Iced"])
            .with_price(Channel::Retail, "S", "Hot", 18000)
            .with_price(Channel::Retail, "M", "Iced", 24000)
            .with_price(Channel::Reseller, "M", "Iced", 21000);
        MenuItem::with_variants("latte", "Latte", input).unwrap()
    }

    #[test]
    fn test_every_mutation_writes_through() {
        let mut session = session();
        let id = session.add_item(&latte(), Some("M"), Some("Iced"), 2).unwrap();
        assert_eq!(session.store().load().unwrap().as_ref(), Some(session.cart()));

        session.update_quantity(&id, 3).unwrap();
        session.set_discount(Discount::Percentage(Percent::from_percentage(10.0))).unwrap();
        let persisted = session.store().load().unwrap().unwrap();
        assert_eq!(persisted.total_quantity(), 3);
        assert_eq!(persisted.discount(), session.cart().discount());
    }

    #[test]
    fn test_unpriced_selection_leaves_cart_unchanged() {
        let mut session = session();
        let err = session.add_item(&latte(), Some("M"), Some("Hot"), 1).unwrap_err();
        assert!(matches!(err, CheckoutError::Core(CoreError::PriceUnavailable { .. })));
        assert!(session.cart().is_empty());
    }

    #[test]
    fn test_add_item_uses_cart_channel() {
        let mut session = session();
        session.set_channel(Channel::Reseller).unwrap();
        let id = session.add_item(&latte(), Some("M"), Some("Iced"), 1).unwrap();
        let line = session.cart().line(&id).unwrap();
        assert_eq!(line.unit_price().units(), 21000);
        assert_eq!(line.channel(), Channel::Reseller);
    }

    #[test]
    fn test_init_resumes_persisted_cart() {
        let mut cart = Cart::new();
        cart.add_line(LineSpec::simple(
            "teh",
            "Teh",
            Money::from_units(12000),
            Channel::Retail,
        ));
        let store = MemoryCartStore::with_cart(cart.clone());

        let mut session = CartSession::new(store, SessionDefaults::default());
        assert!(session.cart().is_empty());
        session.init().unwrap();
        assert_eq!(session.cart(), &cart);
    }

    #[test]
    fn test_reset_uses_configured_defaults() {
        let defaults = SessionDefaults {
            channel: Channel::Reseller,
            payment_method: PaymentMethod::Transfer,
            tax_rate: TaxRate::zero(),
        };
        let mut session = CartSession::new(MemoryCartStore::new(), defaults);
        session.init().unwrap();
        session
            .add_item(
                &MenuItem::simple("teh", "Teh", FlatPrice::new(None, Some(Money::from_units(9000)))).unwrap(),
                None,
                None,
                1,
            )
            .unwrap();

        session.reset().unwrap();
        assert!(session.cart().is_empty());
        assert_eq!(session.cart().channel(), Channel::Reseller);
        assert_eq!(session.cart().payment().method, PaymentMethod::Transfer);
        assert!(session.store().load().unwrap().is_none());
    }

    #[test]
    fn test_text_inputs_are_coerced() {
        let mut session = session();
        let id = session.add_item(&latte(), Some("S"), Some("Hot"), 3).unwrap();

        assert!(session.update_quantity_text(&id, "abc").unwrap());
        assert_eq!(session.cart().total_quantity(), 1);
        assert!(session.update_quantity_text(&id, "4").unwrap());
        assert_eq!(session.cart().total_quantity(), 4);

        session.set_amount_received_text("Rp 100.000").unwrap();
        assert_eq!(session.cart().payment().amount_received, Some(Money::from_units(100000)));
        assert_eq!(session.cart().payment().amount_received_input.as_deref(), Some("Rp 100.000"));
        session.set_amount_received_text("  ").unwrap();
        assert_eq!(session.cart().payment().amount_received, None);
        assert_eq!(session.cart().payment().amount_received_input, None);
    }

    #[test]
    fn test_quantity_text_is_capped() {
        let mut session = session();
        let id = session.add_item(&latte(), Some("S"), Some("Hot"), 1).unwrap();

        assert!(session.update_quantity_text(&id, "99999999999999999999").unwrap());
        assert_eq!(session.cart().total_quantity(), MAX_LINE_QUANTITY);
        assert!(!session.update_quantity(&id, MAX_LINE_QUANTITY + 1).unwrap());
        assert!(!session.update_quantity(&id, i64::MAX).unwrap());

        let totals = session.totals();
        assert_eq!(totals.subtotal.units(), 18000 * MAX_LINE_QUANTITY);
        assert_eq!(session.store().load().unwrap().unwrap().total_quantity(), MAX_LINE_QUANTITY);
    }

    #[test]
    fn test_submitting_flag_is_per_session() {
        let mut first = session();
        let second = session();
        first.mark_submitting();
        assert!(first.is_submitting());
        assert!(!second.is_submitting());

        first.release_submission();
        assert!(!first.is_submitting());

        first.mark_submitting();
        first.reset().unwrap();
        assert!(!first.is_submitting());
    }

    #[test]
    fn test_totals_use_default_tax_rate() {
        let mut session = session();
        session
            .add_line(LineSpec::simple("kopi", "Kopi", Money::from_units(20000), Channel::Retail).with_quantity(2))
            .unwrap();
        session.set_discount(Discount::Percentage(Percent::from_percentage(10.0))).unwrap();

        let totals = session.totals();
        assert_eq!(totals.grand_total.units(), 39960);
    }
}
