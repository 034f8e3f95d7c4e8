//! # kopi-checkout: Session Orchestration for Kopi POS
//!
//! Wraps the pure `kopi-core` in the pieces a running register needs: a
//! persisted cart session, order and purchase-order submission, store
//! configuration and logging.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Checkout Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────┐        ┌──────────────────────────────────┐   │
//! │  │  CheckoutConfig     │───────►│  CartSession<S: CartStore>       │   │
//! │  │  (TOML + KOPI_*)    │        │  init() / reset() / set_*()      │   │
//! │  └─────────────────────┘        │  every mutation persisted        │   │
//! │                                 └───────────────┬──────────────────┘   │
//! │                                                 │ submit               │
//! │                                                 ▼                      │
//! │  ┌─────────────────────┐        ┌──────────────────────────────────┐   │
//! │  │  Purchasing         │        │  Checkout                        │   │
//! │  │  create/transition  │        │  one submission per cart         │   │
//! │  └──────────┬──────────┘        └───────────────┬──────────────────┘   │
//! │             │                                   │                      │
//! │             ▼                                   ▼                      │
//! │     PurchaseOrderService               OrderService      Notifier      │
//! │          (trait)                         (trait)          (trait)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//! - [`config`] - Store settings (tax, channel, payment defaults)
//! - [`session`] - Session-owned cart with write-through persistence
//! - [`store`] - Cart storage backends
//! - [`checkout`] - Order submission
//! - [`purchasing`] - Purchase order creation and status changes
//! - [`optimistic`] - Tentative state with rollback
//! - [`services`] - Remote service and notifier traits
//! - [`logging`] - Tracing setup
//! - [`error`] - Checkout error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use kopi_checkout::{Checkout, CheckoutConfig, CartSession, JsonFileCartStore, SessionDefaults};
//!
//! kopi_checkout::logging::init_tracing();
//! let config = CheckoutConfig::load_or_default(None);
//!
//! let store = JsonFileCartStore::new(config.cart_storage_path().unwrap());
//! let mut session = CartSession::new(store, SessionDefaults::from_config(&config));
//! session.init()?;
//!
//! let checkout = Checkout::new(Arc::new(http_order_service));
//! let submitted = checkout.submit(&mut session).await?;
//! println!("Order {}", submitted.receipt.order_id);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod checkout;
pub mod config;
pub mod error;
pub mod logging;
pub mod optimistic;
pub mod purchasing;
pub mod services;
pub mod session;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use checkout::{Checkout, SubmittedOrder};
pub use config::CheckoutConfig;
pub use error::{CheckoutError, CheckoutResult, RemoteError, StoreError};
pub use optimistic::Optimistic;
pub use purchasing::Purchasing;
pub use services::{NoOpNotifier, Notifier, OrderReceipt, OrderService, PurchaseOrderService, TracingNotifier};
pub use session::{CartSession, SessionDefaults};
pub use store::{CartStore, JsonFileCartStore, MemoryCartStore};

pub use async_trait::async_trait;
