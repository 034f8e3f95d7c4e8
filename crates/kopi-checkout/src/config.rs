//! # Checkout Configuration
//!
//! Store-level settings that feed the cart session and checkout.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     KOPI_STORE_NAME="Kopi Senja"                                       │
//! │     KOPI_TAX_RATE=11                                                   │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/kopi-pos/checkout.toml (Linux)                           │
//! │     ~/Library/Application Support/id.kopi.pos/checkout.toml (macOS)    │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     11% tax, retail channel, cash payment                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # checkout.toml
//! [store]
//! name = "Kopi Senja"
//! currency_symbol = "Rp"
//!
//! [pricing]
//! default_tax_rate_bps = 1100
//! default_channel = "retail"
//! default_payment_method = "cash"
//!
//! [cart]
//! storage_path = "/var/lib/kopi/cart.json"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use kopi_core::validation::validate_tax_rate_bps;
use kopi_core::{Channel, Money, PaymentMethod, TaxRate, DEFAULT_TAX_RATE_BPS};

use crate::error::{CheckoutError, CheckoutResult};

const CONFIG_FILE_NAME: &str = "checkout.toml";
const CART_FILE_NAME: &str = "cart.json";

// =============================================================================
// Store Settings
// =============================================================================

/// Store identity shown on receipts and amounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSettings {
    #[serde(default = "default_store_name")]
    pub name: String,

    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_store_name() -> String {
    "Kopi POS".to_string()
}

fn default_currency_symbol() -> String {
    "Rp".to_string()
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            name: default_store_name(),
            currency_symbol: default_currency_symbol(),
        }
    }
}

// =============================================================================
// Pricing Settings
// =============================================================================

/// Defaults applied to new carts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingSettings {
    /// Tax rate in basis points, used when a cart has no override.
    /// Default: 1100 (11%)
    #[serde(default = "default_tax_rate_bps")]
    pub default_tax_rate_bps: u32,

    #[serde(default)]
    pub default_channel: Channel,

    #[serde(default)]
    pub default_payment_method: PaymentMethod,
}

fn default_tax_rate_bps() -> u32 {
    DEFAULT_TAX_RATE_BPS
}

impl Default for PricingSettings {
    fn default() -> Self {
        PricingSettings {
            default_tax_rate_bps: default_tax_rate_bps(),
            default_channel: Channel::default(),
            default_payment_method: PaymentMethod::default(),
        }
    }
}

// =============================================================================
// Cart Settings
// =============================================================================

/// Where the cart is persisted between launches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartSettings {
    /// Explicit cart file. `None` uses the platform data directory.
    #[serde(default)]
    pub storage_path: Option<PathBuf>,
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete checkout configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckoutConfig {
    #[serde(default)]
    pub store: StoreSettings,

    #[serde(default)]
    pub pricing: PricingSettings,

    #[serde(default)]
    pub cart: CartSettings,
}

impl CheckoutConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (checkout.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> CheckoutResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading checkout config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load checkout config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> CheckoutResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| CheckoutError::Config("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Checkout config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> CheckoutResult<()> {
        if self.store.name.trim().is_empty() {
            return Err(CheckoutError::Config("store.name must not be empty".into()));
        }

        validate_tax_rate_bps(self.pricing.default_tax_rate_bps)
            .map_err(|e| CheckoutError::Config(e.to_string()))?;

        Ok(())
    }

    /// Applies `KOPI_*` overrides read through `lookup`.
    ///
    /// ## Variables
    /// - `KOPI_STORE_NAME`
    /// - `KOPI_CURRENCY_SYMBOL`
    /// - `KOPI_TAX_RATE`: percent, e.g. `"11"` or `"12.5"`
    /// - `KOPI_DEFAULT_CHANNEL`: `retail` | `reseller`
    /// - `KOPI_PAYMENT_METHOD`: `cash` | `qris` | `transfer` | `card`
    /// - `KOPI_CART_PATH`
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(name) = lookup("KOPI_STORE_NAME") {
            self.store.name = name;
        }

        if let Some(symbol) = lookup("KOPI_CURRENCY_SYMBOL") {
            self.store.currency_symbol = symbol;
        }

        if let Some(rate) = lookup("KOPI_TAX_RATE") {
            match rate.trim().parse::<f64>() {
                Ok(pct) if pct.is_finite() && pct >= 0.0 => {
                    debug!(percent = pct, "Overriding tax rate from environment");
                    self.pricing.default_tax_rate_bps = (pct * 100.0).round() as u32;
                }
                _ => warn!(rate = %rate, "Ignoring invalid KOPI_TAX_RATE"),
            }
        }

        if let Some(channel) = lookup("KOPI_DEFAULT_CHANNEL") {
            match channel.parse() {
                Ok(parsed) => self.pricing.default_channel = parsed,
                Err(_) => warn!(channel = %channel, "Unknown channel in environment"),
            }
        }

        if let Some(method) = lookup("KOPI_PAYMENT_METHOD") {
            match method.parse() {
                Ok(parsed) => self.pricing.default_payment_method = parsed,
                Err(_) => warn!(method = %method, "Unknown payment method in environment"),
            }
        }

        if let Some(path) = lookup("KOPI_CART_PATH") {
            self.cart.storage_path = Some(PathBuf::from(path));
        }
    }

    fn project_dirs() -> Option<directories::ProjectDirs> {
        directories::ProjectDirs::from("id", "kopi", "pos")
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Cart file location: the explicit setting, else the platform data dir.
    pub fn cart_storage_path(&self) -> Option<PathBuf> {
        self.cart
            .storage_path
            .clone()
            .or_else(|| Self::project_dirs().map(|dirs| dirs.data_dir().join(CART_FILE_NAME)))
    }

    pub fn default_tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.pricing.default_tax_rate_bps)
    }

    /// Renders an amount with the store's currency symbol (`Rp 39.960`).
    pub fn format_currency(&self, amount: Money) -> String {
        format!("{} {}", self.store.currency_symbol, amount)
    }
}
