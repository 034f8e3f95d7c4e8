//! # Purchase Order Submission
//!
//! ## Create
//! ```text
//! request ──► price_purchase_order(request, catalog)
//!                 │  unresolvable line? ──► Core error, nothing sent
//!                 ▼
//!             PurchaseOrderService::create_purchase_order(payload)
//!                 │
//!                 ▼
//!             PurchaseOrder (with id) ──► purchase_order_created
//! ```
//!
//! ## Status Change
//! ```text
//! Optimistic<PurchaseOrder>
//!     │  order.transition(next) rejected? ──► Core error, nothing shown
//!     ▼
//! apply(tentative) ──► update_status().await ──┬── Ok  ──► commit
//!                                              └── Err ──► rollback
//! ```

use std::sync::Arc;

use tracing::{debug, info, warn};

use kopi_core::error::ValidationError;
use kopi_core::purchase::{price_purchase_order, CatalogLookup, PurchaseOrder, PurchaseOrderRequest, PurchaseOrderStatus};
use kopi_core::CoreError;

use crate::error::CheckoutResult;
use crate::optimistic::Optimistic;
use crate::services::{NoOpNotifier, Notifier, PurchaseOrderService};

/// Creates purchase orders and moves them through their statuses.
pub struct Purchasing {
    service: Arc<dyn PurchaseOrderService>,
    notifier: Arc<dyn Notifier>,
}

impl Purchasing {
    pub fn new(service: Arc<dyn PurchaseOrderService>) -> Self {
        Self::with_notifier(service, Arc::new(NoOpNotifier))
    }

    pub fn with_notifier(service: Arc<dyn PurchaseOrderService>, notifier: Arc<dyn Notifier>) -> Self {
        Purchasing { service, notifier }
    }

    /// Prices `request` against `catalog` and creates the order remotely.
    ///
    /// Pricing is all-or-nothing: if any line fails to resolve, no request
    /// is sent.
    pub async fn create<C>(&self, request: &PurchaseOrderRequest, catalog: &C) -> CheckoutResult<PurchaseOrder>
    where
        C: CatalogLookup + ?Sized,
    {
        let order = price_purchase_order(request, catalog)?;
        debug!(
            supplier_id = order.supplier_id(),
            lines = order.lines().len(),
            grand_total = order.totals().grand_total.units(),
            "Creating purchase order"
        );

        let id = match self.service.create_purchase_order(order.to_payload()).await {
            Ok(id) => id,
            Err(e) => {
                warn!(supplier_id = order.supplier_id(), error = %e, "Purchase order creation failed");
                self.notifier.submission_failed(&e.to_string(), e.is_retryable());
                return Err(e.into());
            }
        };

        let order = order.with_id(id);
        info!(order_id = order.id().unwrap_or_default(), "Purchase order created");
        self.notifier.purchase_order_created(&order);
        Ok(order)
    }

    /// Moves `order` to `next`, showing the new status while the service
    /// call is pending.
    ///
    /// ## Errors
    /// - `Core(InvalidStatusTransition)` from a terminal status; nothing changes
    /// - `Core(Validation)` if the order was never created remotely
    /// - `Remote` if the service refuses; the previous status is restored
    pub async fn transition(&self, order: &mut Optimistic<PurchaseOrder>, next: PurchaseOrderStatus) -> CheckoutResult<()> {
        let mut tentative = order.current().clone();
        tentative.transition(next)?;

        let order_id = tentative
            .id()
            .map(str::to_string)
            .ok_or_else(|| CoreError::from(ValidationError::Required { field: "id".to_string() }))?;

        let from = order.current().status();
        order.apply(tentative);
        debug!(order_id = %order_id, %from, to = %next, "Updating purchase order status");

        match self.service.update_status(&order_id, next).await {
            Ok(()) => {
                order.commit();
                info!(order_id = %order_id, status = %next, "Purchase order status updated");
                Ok(())
            }
            Err(e) => {
                order.rollback();
                warn!(order_id = %order_id, error = %e, "Status update failed, restored {}", from);
                self.notifier.submission_failed(&e.to_string(), e.is_retryable());
                Err(e.into())
            }
        }
    }
}
