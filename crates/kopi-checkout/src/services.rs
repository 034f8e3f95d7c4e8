//! # External Collaborators
//!
//! The remote services and the notification layer, as traits. Hosts plug
//! in an HTTP client and a UI toast layer; tests plug in fakes.
//!
//! ```text
//! Checkout ───► OrderService::create_order(OrderPayload)
//! Purchasing ─► PurchaseOrderService::{create_purchase_order, update_status}
//!     │
//!     └───────► Notifier  (success / failure signals for display)
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use kopi_core::cart::CartTotals;
use kopi_core::payload::{ClientId, OrderPayload};
use kopi_core::purchase::{PurchaseOrder, PurchaseOrderPayload, PurchaseOrderStatus};

use crate::error::RemoteError;

// =============================================================================
// Remote Services
// =============================================================================

/// What the order service returns for an accepted order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderReceipt {
    pub order_id: String,
    /// Echo of the submitted idempotency token.
    pub client_id: ClientId,
    #[serde(default)]
    pub order_number: Option<String>,
}

/// Order-creation service.
///
/// Implementations must treat a repeated `clientId` as the same order.
#[async_trait]
pub trait OrderService: Send + Sync {
    async fn create_order(&self, payload: OrderPayload) -> Result<OrderReceipt, RemoteError>;
}

/// Purchase-order service.
#[async_trait]
pub trait PurchaseOrderService: Send + Sync {
    /// Creates the order and returns its id.
    async fn create_purchase_order(&self, payload: PurchaseOrderPayload) -> Result<String, RemoteError>;

    async fn update_status(&self, order_id: &str, status: PurchaseOrderStatus) -> Result<(), RemoteError>;
}

// =============================================================================
// Notifier
// =============================================================================

/// Signals for the notification layer.
pub trait Notifier: Send + Sync {
    /// An order was accepted.
    fn order_submitted(&self, receipt: &OrderReceipt, totals: &CartTotals);

    /// A remote call failed.
    fn submission_failed(&self, message: &str, retryable: bool);

    /// A purchase order was created.
    fn purchase_order_created(&self, order: &PurchaseOrder);

    /// The payment dialog should close.
    fn close_payment(&self);
}

/// Ignores every signal.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpNotifier;

impl Notifier for NoOpNotifier {
    fn order_submitted(&self, _receipt: &OrderReceipt, _totals: &CartTotals) {}
    fn submission_failed(&self, _message: &str, _retryable: bool) {}
    fn purchase_order_created(&self, _order: &PurchaseOrder) {}
    fn close_payment(&self) {}
}

/// Writes every signal to the log. Useful for headless hosts.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn order_submitted(&self, receipt: &OrderReceipt, totals: &CartTotals) {
        info!(
            order_id = %receipt.order_id,
            client_id = %receipt.client_id,
            grand_total = totals.grand_total.units(),
            "Order submitted"
        );
    }

    fn submission_failed(&self, message: &str, retryable: bool) {
        warn!(retryable, "Submission failed: {}", message);
    }

    fn purchase_order_created(&self, order: &PurchaseOrder) {
        info!(
            order_id = order.id().unwrap_or_default(),
            supplier_id = order.supplier_id(),
            grand_total = order.totals().grand_total.units(),
            "Purchase order created"
        );
    }

    fn close_payment(&self) {
        info!("Closing payment dialog");
    }
}
