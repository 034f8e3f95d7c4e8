//! # Purchase Order Total Calculator
//!
//! Prices supplier purchase orders against the supplier catalog and keeps
//! the result as a frozen snapshot.
//!
//! ## Snapshot Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  PurchaseOrderRequest { supplier, [catalogItemId × qty] }              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  price_purchase_order(request, catalog)                                │
//! │       │  every line resolved?  no ──► Err (nothing created)            │
//! │       ▼  yes                                                            │
//! │  PurchaseOrder { lines[price copied], totals snapshot }                │
//! │       │                                                                 │
//! │       ├── reprice(catalog)    allowed while not complete               │
//! │       │                                                                 │
//! │       └── transition(Complete) ──► prices and totals frozen            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Status Transitions
//! ```text
//! draft ──► ordered ──► received ──► complete
//!   │          │           │
//!   └──────────┴───────────┴──────► cancelled
//! ```
//! Any move between the open states is allowed. `complete` and `cancelled`
//! are terminal.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::validation::{validate_id, validate_price, validate_quantity};

// =============================================================================
// Status
// =============================================================================

/// Purchase order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseOrderStatus {
    #[default]
    Draft,
    Ordered,
    Received,
    Complete,
    Cancelled,
}

impl PurchaseOrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PurchaseOrderStatus::Draft => "draft",
            PurchaseOrderStatus::Ordered => "ordered",
            PurchaseOrderStatus::Received => "received",
            PurchaseOrderStatus::Complete => "complete",
            PurchaseOrderStatus::Cancelled => "cancelled",
        }
    }

    /// No further status changes once terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, PurchaseOrderStatus::Complete | PurchaseOrderStatus::Cancelled)
    }

    pub fn can_transition_to(&self, next: PurchaseOrderStatus) -> bool {
        !self.is_terminal() && *self != next
    }
}

impl fmt::Display for PurchaseOrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Supplier Catalog
// =============================================================================

/// A purchasable unit from one supplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SupplierCatalogItem {
    pub id: String,
    pub supplier_id: String,
    pub name: String,
    pub purchase_price: Money,
    pub is_active: bool,
}

/// Read access to supplier catalog items by id.
pub trait CatalogLookup {
    fn find(&self, catalog_item_id: &str) -> Option<&SupplierCatalogItem>;
}

impl CatalogLookup for [SupplierCatalogItem] {
    fn find(&self, catalog_item_id: &str) -> Option<&SupplierCatalogItem> {
        self.iter().find(|item| item.id == catalog_item_id)
    }
}

impl CatalogLookup for Vec<SupplierCatalogItem> {
    fn find(&self, catalog_item_id: &str) -> Option<&SupplierCatalogItem> {
        self.as_slice().find(catalog_item_id)
    }
}

impl CatalogLookup for HashMap<String, SupplierCatalogItem> {
    fn find(&self, catalog_item_id: &str) -> Option<&SupplierCatalogItem> {
        self.get(catalog_item_id)
    }
}

/// Resolves an item that is active and belongs to `supplier_id`.
fn resolve_item<'a, C>(catalog: &'a C, supplier_id: &str, catalog_item_id: &str) -> CoreResult<&'a SupplierCatalogItem>
where
    C: CatalogLookup + ?Sized,
{
    catalog
        .find(catalog_item_id)
        .filter(|item| item.is_active && item.supplier_id == supplier_id)
        .ok_or_else(|| CoreError::CatalogItemUnavailable {
            supplier_id: supplier_id.to_string(),
            catalog_item_id: catalog_item_id.to_string(),
        })
}

// =============================================================================
// Request
// =============================================================================

/// One requested line: which catalog item and how many.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RequestedLine {
    pub catalog_item_id: String,
    pub quantity: i64,
}

impl RequestedLine {
    pub fn new(catalog_item_id: impl Into<String>, quantity: i64) -> Self {
        RequestedLine {
            catalog_item_id: catalog_item_id.into(),
            quantity,
        }
    }
}

/// What the purchasing form submits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrderRequest {
    pub supplier_id: String,
    pub lines: Vec<RequestedLine>,
    #[serde(default)]
    pub status: PurchaseOrderStatus,
    #[ts(as = "Option<String>")]
    pub issued_at: Option<NaiveDate>,
}

impl PurchaseOrderRequest {
    pub fn new(supplier_id: impl Into<String>, lines: Vec<RequestedLine>) -> Self {
        PurchaseOrderRequest {
            supplier_id: supplier_id.into(),
            lines,
            status: PurchaseOrderStatus::Draft,
            issued_at: None,
        }
    }

    pub fn with_status(mut self, status: PurchaseOrderStatus) -> Self {
        self.status = status;
        self
    }

    pub fn issued_at(mut self, date: NaiveDate) -> Self {
        self.issued_at = Some(date);
        self
    }
}

// =============================================================================
// Priced Order
// =============================================================================

/// A priced line. `price` is the catalog price at pricing time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrderLine {
    pub catalog_item_id: String,
    pub quantity: i64,
    pub price: Money,
}

impl PurchaseOrderLine {
    pub fn line_total(&self) -> Money {
        self.price.multiply_quantity(self.quantity)
    }
}

/// Totals snapshot stored with the order.
///
/// Field names stay snake_case on the wire (`grand_total`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PurchaseOrderTotals {
    pub grand_total: Money,
    pub item_count: usize,
    pub total_quantity: i64,
}

impl PurchaseOrderTotals {
    fn from_lines(lines: &[PurchaseOrderLine]) -> Self {
        PurchaseOrderTotals {
            grand_total: lines.iter().map(PurchaseOrderLine::line_total).sum(),
            item_count: lines.len(),
            total_quantity: lines.iter().map(|l| l.quantity).sum(),
        }
    }
}

/// A priced purchase order.
///
/// Fields are private so the totals can only change through
/// [`PurchaseOrder::reprice`], which refuses once the order is complete.
/// Deserializing checks every line and that the stored totals match them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", try_from = "PurchaseOrderRecord")]
pub struct PurchaseOrder {
    id: Option<String>,
    supplier_id: String,
    status: PurchaseOrderStatus,
    lines: Vec<PurchaseOrderLine>,
    totals: PurchaseOrderTotals,
    #[ts(as = "Option<String>")]
    issued_at: Option<NaiveDate>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PurchaseOrderRecord {
    id: Option<String>,
    supplier_id: String,
    status: PurchaseOrderStatus,
    lines: Vec<PurchaseOrderLine>,
    totals: PurchaseOrderTotals,
    issued_at: Option<NaiveDate>,
}

impl TryFrom<PurchaseOrderRecord> for PurchaseOrder {
    type Error = CoreError;

    fn try_from(record: PurchaseOrderRecord) -> Result<Self, Self::Error> {
        validate_id("supplierId", &record.supplier_id)?;
        if record.lines.is_empty() {
            return Err(CoreError::EmptyPurchaseOrder);
        }
        for line in &record.lines {
            validate_id("catalogItemId", &line.catalog_item_id)?;
            validate_quantity(line.quantity)?;
            validate_price(line.price)?;
        }

        if record.totals != PurchaseOrderTotals::from_lines(&record.lines) {
            return Err(ValidationError::InvalidFormat {
                field: "totals".to_string(),
                reason: "do not match the order lines".to_string(),
            }
            .into());
        }

        Ok(PurchaseOrder {
            id: record.id,
            supplier_id: record.supplier_id,
            status: record.status,
            lines: record.lines,
            totals: record.totals,
            issued_at: record.issued_at,
        })
    }
}

impl PurchaseOrder {
    /// Attaches the id assigned by the purchase-order service.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn supplier_id(&self) -> &str {
        &self.supplier_id
    }

    pub fn status(&self) -> PurchaseOrderStatus {
        self.status
    }

    pub fn lines(&self) -> &[PurchaseOrderLine] {
        &self.lines
    }

    pub fn totals(&self) -> PurchaseOrderTotals {
        self.totals
    }

    pub fn issued_at(&self) -> Option<NaiveDate> {
        self.issued_at
    }

    /// Prices and totals may no longer change.
    pub fn is_locked(&self) -> bool {
        self.status.is_terminal()
    }

    /// Moves the order to `next`.
    ///
    /// ## Errors
    /// `InvalidStatusTransition` from a terminal status or to the current one.
    pub fn transition(&mut self, next: PurchaseOrderStatus) -> CoreResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(CoreError::InvalidStatusTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }

    /// Re-reads line prices from `catalog` and recomputes the totals.
    ///
    /// All-or-nothing: if any line no longer resolves, the order is left
    /// unchanged.
    ///
    /// ## Errors
    /// - `OrderLocked` once the order is complete or cancelled
    /// - `CatalogItemUnavailable` if a line no longer resolves
    pub fn reprice<C>(&mut self, catalog: &C) -> CoreResult<()>
    where
        C: CatalogLookup + ?Sized,
    {
        if self.is_locked() {
            return Err(CoreError::OrderLocked {
                order_id: self.id.clone().unwrap_or_default(),
                status: self.status,
            });
        }

        let lines = self
            .lines
            .iter()
            .map(|line| {
                let item = resolve_item(catalog, &self.supplier_id, &line.catalog_item_id)?;
                Ok(PurchaseOrderLine {
                    price: item.purchase_price,
                    ..line.clone()
                })
            })
            .collect::<CoreResult<Vec<_>>>()?;

        self.totals = PurchaseOrderTotals::from_lines(&lines);
        self.lines = lines;
        Ok(())
    }

    /// Wire payload for the purchase-order service.
    pub fn to_payload(&self) -> PurchaseOrderPayload {
        PurchaseOrderPayload {
            supplier_id: self.supplier_id.clone(),
            status: self.status,
            items: self.lines.clone(),
            totals: self.totals,
            issued_at: self.issued_at,
        }
    }
}

/// Prices a purchase order request against the supplier catalog.
///
/// ## Calculation
/// - `line_total = quantity × purchase_price` (price copied now)
/// - `grand_total = Σ line_total`
///
/// ## Errors
/// - `Validation` for a blank supplier id, a non-positive quantity or a
///   negative catalog price
/// - `EmptyPurchaseOrder` when there are no lines
/// - `CatalogItemUnavailable` when a line's item is unknown, inactive or
///   belongs to another supplier
///
/// Any error rejects the whole order; no partially priced order is returned.
///
/// ## Example
/// ```rust
/// use kopi_core::money::Money;
/// use kopi_core::purchase::{price_purchase_order, PurchaseOrderRequest, RequestedLine, SupplierCatalogItem};
///
/// let catalog = vec![SupplierCatalogItem {
///     id: "beans".into(),
///     supplier_id: "sup-1".into(),
///     name: "Arabica 1kg".into(),
///     purchase_price: Money::from_units(15000),
///     is_active: true,
/// }];
/// let request = PurchaseOrderRequest::new("sup-1", vec![RequestedLine::new("beans", 3)]);
/// let order = price_purchase_order(&request, &catalog).unwrap();
/// assert_eq!(order.totals().grand_total.units(), 45000);
/// ```
pub fn price_purchase_order<C>(request: &PurchaseOrderRequest, catalog: &C) -> CoreResult<PurchaseOrder>
where
    C: CatalogLookup + ?Sized,
{
    validate_id("supplierId", &request.supplier_id)?;
    if request.lines.is_empty() {
        return Err(CoreError::EmptyPurchaseOrder);
    }

    let supplier_id = request.supplier_id.trim();
    let mut lines = Vec::with_capacity(request.lines.len());
    for requested in &request.lines {
        validate_quantity(requested.quantity)?;
        let item = resolve_item(catalog, supplier_id, &requested.catalog_item_id)?;
        validate_price(item.purchase_price)?;
        lines.push(PurchaseOrderLine {
            catalog_item_id: item.id.clone(),
            quantity: requested.quantity,
            price: item.purchase_price,
        });
    }

    Ok(PurchaseOrder {
        id: None,
        supplier_id: supplier_id.to_string(),
        status: request.status,
        totals: PurchaseOrderTotals::from_lines(&lines),
        lines,
        issued_at: request.issued_at,
    })
}

// =============================================================================
// Wire Payload
// =============================================================================

/// Payload for the purchase-order service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrderPayload {
    pub supplier_id: String,
    pub status: PurchaseOrderStatus,
    pub items: Vec<PurchaseOrderLine>,
    pub totals: PurchaseOrderTotals,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    #[ts(as = "Option<String>")]
    pub issued_at: Option<NaiveDate>,
}

// =============================================================================
// Unit Tests
// =============================================================================
