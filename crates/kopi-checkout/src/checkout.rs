//! # Order Submission
//!
//! ## Submit Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  submit(session)                                                       │
//! │       │                                                                 │
//! │       ├── session.is_submitting()? ─────────► SubmissionInFlight       │
//! │       │                                                                 │
//! │       ├── build_order_payload(new ClientId)                            │
//! │       │        └── EmptyCart / ResellerRequired ──► Core error         │
//! │       │            (no request sent)                                    │
//! │       ▼                                                                 │
//! │  mark submitting ─► OrderService::create_order(payload).await          │
//! │       │                                                                 │
//! │       ├── Ok  ──► session.reset() ─► order_submitted ─► close_payment  │
//! │       │                                                                 │
//! │       └── Err ──► cart untouched ─► submission_failed ─► Remote error  │
//! │                   (next attempt gets a new ClientId)                    │
//! │                                                                         │
//! │  The flag lives on the session, so one Checkout can serve many carts.  │
//! │  Dropping a submit mid-await leaves it set until release_submission(). │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use tracing::{debug, info, warn};

use kopi_core::cart::CartTotals;
use kopi_core::payload::{build_order_payload, ClientId};

use crate::error::{CheckoutError, CheckoutResult};
use crate::services::{NoOpNotifier, Notifier, OrderReceipt, OrderService};
use crate::session::CartSession;
use crate::store::CartStore;

/// An accepted order and the totals the cashier saw.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmittedOrder {
    pub receipt: OrderReceipt,
    pub totals: CartTotals,
}

/// Submits carts to the order service.
pub struct Checkout {
    orders: Arc<dyn OrderService>,
    notifier: Arc<dyn Notifier>,
}

impl Checkout {
    pub fn new(orders: Arc<dyn OrderService>) -> Self {
        Self::with_notifier(orders, Arc::new(NoOpNotifier))
    }

    pub fn with_notifier(orders: Arc<dyn OrderService>, notifier: Arc<dyn Notifier>) -> Self {
        Checkout { orders, notifier }
    }

    /// Submits the session's cart.
    ///
    /// ## Errors
    /// - `SubmissionInFlight` if this cart's previous submit has not finished
    /// - `Core` for local validation failures; nothing is sent
    /// - `Remote` when the service fails; the cart is left as it was
    pub async fn submit<S: CartStore>(&self, session: &mut CartSession<S>) -> CheckoutResult<SubmittedOrder> {
        if session.is_submitting() {
            debug!("Submit ignored, this cart is already being submitted");
            return Err(CheckoutError::SubmissionInFlight);
        }

        let totals = session.totals();
        let client_id = ClientId::generate();
        let payload = build_order_payload(session.cart(), session.default_tax_rate(), client_id.clone())?;

        info!(
            client_id = %client_id,
            items = payload.items.len(),
            grand_total = totals.grand_total.units(),
            "Submitting order"
        );

        session.mark_submitting();
        let outcome = self.orders.create_order(payload).await;
        session.release_submission();

        match outcome {
            Ok(receipt) => {
                info!(order_id = %receipt.order_id, client_id = %client_id, "Order accepted");
                if let Err(e) = session.reset() {
                    warn!(error = %e, "Order accepted but the persisted cart was not cleared");
                }
                self.notifier.order_submitted(&receipt, &totals);
                self.notifier.close_payment();
                Ok(SubmittedOrder { receipt, totals })
            }
            Err(e) => {
                warn!(client_id = %client_id, error = %e, "Order submission failed");
                self.notifier.submission_failed(&e.to_string(), e.is_retryable());
                Err(e.into())
            }
        }
    }
}
