//! # Checkout Error Types
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Checkout Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Local (Core)   │  │     Remote      │  │      Store              │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  EmptyCart      │  │  Network        │  │  Io                     │ │
//! │  │  ResellerReq.   │  │  Timeout        │  │  Corrupt                │ │
//! │  │  PriceUnavail.  │  │  Rejected       │  │  Serialization          │ │
//! │  │  Validation     │  │  Unavailable    │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  Local errors never reach the network. Remote errors leave the cart    │
//! │  untouched so the cashier can retry with a new client id.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use kopi_core::CoreError;
use thiserror::Error;

/// Result type alias for checkout operations.
pub type CheckoutResult<T> = Result<T, CheckoutError>;

// =============================================================================
// Remote Error
// =============================================================================

/// Failure reported by (or while reaching) a remote service.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RemoteError {
    /// Could not reach the service.
    #[error("Network error: {0}")]
    Network(String),

    /// The service did not answer in time.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// The service answered and refused the request.
    #[error("Rejected by server ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The service is temporarily unavailable.
    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

impl RemoteError {
    /// Returns true if sending the same request again may succeed.
    ///
    /// Server-side rejections in the 5xx range count as retryable;
    /// 4xx rejections do not.
    pub fn is_retryable(&self) -> bool {
        match self {
            RemoteError::Network(_) | RemoteError::Timeout(_) | RemoteError::Unavailable(_) => true,
            RemoteError::Rejected { status, .. } => *status >= 500,
        }
    }
}

// =============================================================================
// Store Error
// =============================================================================

/// Local cart persistence failure.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the cart file failed.
    #[error("Cart storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The persisted cart could not be parsed.
    #[error("Persisted cart is corrupt: {0}")]
    Corrupt(String),

    /// The cart could not be serialized.
    #[error("Failed to serialize cart: {0}")]
    Serialization(String),
}

// =============================================================================
// Checkout Error
// =============================================================================

/// Top-level error for the checkout crate.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Rejected locally before any network call.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The remote service failed; the cart is untouched.
    #[error("Remote service failed: {0}")]
    Remote(#[from] RemoteError),

    /// Local cart persistence failed.
    #[error("Cart storage failed: {0}")]
    Store(#[from] StoreError),

    /// Another submission is still waiting for the service.
    #[error("A submission is already in progress")]
    SubmissionInFlight,

    /// Configuration could not be loaded or is invalid.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// File system error outside cart storage (config files).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for CheckoutError {
    fn from(err: toml::de::Error) -> Self {
        CheckoutError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for CheckoutError {
    fn from(err: toml::ser::Error) -> Self {
        CheckoutError::Config(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl CheckoutError {
    /// Returns true if the failure was decided locally (no request sent).
    pub fn is_local(&self) -> bool {
        matches!(self, CheckoutError::Core(_) | CheckoutError::SubmissionInFlight)
    }

    /// Returns true if the cashier can simply try again.
    pub fn is_retryable(&self) -> bool {
        match self {
            CheckoutError::Remote(err) => err.is_retryable(),
            CheckoutError::SubmissionInFlight => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_retryable() {
        assert!(RemoteError::Network("reset".into()).is_retryable());
        assert!(RemoteError::Timeout(30).is_retryable());
        assert!(RemoteError::Rejected {
            status: 503,
            message: "busy".into()
        }
        .is_retryable());
        assert!(!RemoteError::Rejected {
            status: 422,
            message: "bad item".into()
        }
        .is_retryable());
    }

    #[test]
    fn test_local_vs_remote() {
        let local = CheckoutError::from(CoreError::EmptyCart);
        assert!(local.is_local());
        assert!(!local.is_retryable());
        assert_eq!(local.to_string(), "Cart is empty");

        let remote = CheckoutError::from(RemoteError::Timeout(10));
        assert!(!remote.is_local());
        assert!(remote.is_retryable());
    }
}
