//! # Variant Price Resolver
//!
//! Resolves the unit price of a drink from its size × temperature × channel
//! price matrix.
//!
//! ## The Variant Matrix
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Es Kopi Susu                     retail            reseller            │
//! │                                Hot     Iced       Hot     Iced          │
//! │                              ┌───────┬───────┐  ┌───────┬───────┐       │
//! │                         S    │ 18000 │ 20000 │  │ 15000 │ 17000 │       │
//! │                              ├───────┼───────┤  ├───────┼───────┤       │
//! │                         M    │ null  │ 24000 │  │ null  │ 21000 │       │
//! │                              └───────┴───────┘  └───────┴───────┘       │
//! │                                                                         │
//! │  null  = not sellable in this combination on this channel               │
//! │  0     = sellable and free (distinct from null)                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Validation at Construction
//! A [`VariantConfig`] can only be obtained through [`VariantConfig::new`]
//! (or deserialization, which routes through it). Empty size or
//! temperature sets are rejected there, so nothing downstream ever sees a
//! half-configured item masquerading as a simple one.
//!
//! ## Deterministic Fallback
//! [`VariantConfig::list_sellable_options`] walks allowed sizes in their
//! configured order (outer) and allowed temperatures in theirs (inner).
//! [`VariantConfig::resolve_default_price`] falls back to the first entry of
//! that list, so the same catalog data always yields the same price.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::Channel;
use crate::validation::validate_price;

/// Per-size, per-temperature prices for one channel.
pub type PriceGrid = BTreeMap<String, BTreeMap<String, Option<Money>>>;

// =============================================================================
// Channel Prices
// =============================================================================

/// One price grid per sales channel.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ChannelPrices {
    #[serde(default)]
    pub retail: PriceGrid,
    #[serde(default)]
    pub reseller: PriceGrid,
}

impl ChannelPrices {
    /// Returns the grid for `channel`.
    pub fn grid(&self, channel: Channel) -> &PriceGrid {
        match channel {
            Channel::Retail => &self.retail,
            Channel::Reseller => &self.reseller,
        }
    }

    fn grid_mut(&mut self, channel: Channel) -> &mut PriceGrid {
        match channel {
            Channel::Retail => &mut self.retail,
            Channel::Reseller => &mut self.reseller,
        }
    }

    /// Looks up a price cell. Missing cells and null cells are both `None`.
    pub fn get(&self, channel: Channel, size: &str, temperature: &str) -> Option<Money> {
        self.grid(channel)
            .get(size)
            .and_then(|row| row.get(temperature))
            .copied()
            .flatten()
    }

    /// Sets a price cell (`None` marks the combination unsellable).
    pub fn set(&mut self, channel: Channel, size: &str, temperature: &str, price: Option<Money>) {
        self.grid_mut(channel)
            .entry(size.to_string())
            .or_default()
            .insert(temperature.to_string(), price);
    }

    fn all_prices(&self) -> impl Iterator<Item = Money> + '_ {
        self.retail
            .values()
            .chain(self.reseller.values())
            .flat_map(|row| row.values())
            .filter_map(|cell| *cell)
    }
}

// =============================================================================
// Unvalidated Input
// =============================================================================

/// Variant configuration as it arrives from the catalog service.
///
/// This is the only untyped entry point; turn it into a [`VariantConfig`]
/// with [`VariantConfig::new`] before use.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct VariantConfigInput {
    #[serde(default)]
    pub allowed_sizes: Vec<String>,
    #[serde(default)]
    pub allowed_temperatures: Vec<String>,
    #[serde(default)]
    pub default_size: Option<String>,
    #[serde(default)]
    pub default_temperature: Option<String>,
    #[serde(default)]
    pub prices: ChannelPrices,
}

impl VariantConfigInput {
    /// Starts an input with the given allowed sets and no prices.
    pub fn new<S, T>(sizes: S, temperatures: T) -> Self
    where
        S: IntoIterator,
        S::Item: Into<String>,
        T: IntoIterator,
        T::Item: Into<String>,
    {
        VariantConfigInput {
            allowed_sizes: sizes.into_iter().map(Into::into).collect(),
            allowed_temperatures: temperatures.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Sets the default size and temperature.
    pub fn with_defaults(mut self, size: &str, temperature: &str) -> Self {
        self.default_size = Some(size.to_string());
        self.default_temperature = Some(temperature.to_string());
        self
    }

    /// Sets one price cell.
    pub fn with_price(mut self, channel: Channel, size: &str, temperature: &str, units: i64) -> Self {
        self.prices
            .set(channel, size, temperature, Some(Money::from_units(units)));
        self
    }
}

// =============================================================================
// Validated Config
// =============================================================================

/// A purchasable (size, temperature) combination with its price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SellableOption {
    pub size: String,
    pub temperature: String,
    pub price: Money,
}

/// Validated, immutable variant configuration owned by a catalog item.
///
/// ## Invariants
/// - `allowed_sizes` and `allowed_temperatures` are non-empty and
///   free of duplicates
/// - `default_size` / `default_temperature`, when set, belong to the
///   allowed sets
/// - every configured price is non-negative
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "VariantConfigInput", into = "VariantConfigInput")]
pub struct VariantConfig {
    allowed_sizes: Vec<String>,
    allowed_temperatures: Vec<String>,
    default_size: Option<String>,
    default_temperature: Option<String>,
    prices: ChannelPrices,
}

impl VariantConfig {
    /// Validates raw catalog input.
    ///
    /// ## Errors
    /// - `Required` when either allowed set is empty
    /// - `Duplicate` when a tag is listed twice
    /// - `NotAllowed` when a default is outside its allowed set
    /// - `OutOfRange` when a configured price is negative
    ///
    /// Blank tags and blank defaults are treated as absent.
    pub fn new(input: VariantConfigInput) -> Result<Self, ValidationError> {
        let allowed_sizes = normalize_tags("allowedSizes", input.allowed_sizes)?;
        let allowed_temperatures = normalize_tags("allowedTemperatures", input.allowed_temperatures)?;

        let default_size = normalize_default("defaultSize", input.default_size, &allowed_sizes)?;
        let default_temperature = normalize_default(
            "defaultTemperature",
            input.default_temperature,
            &allowed_temperatures,
        )?;

        for price in input.prices.all_prices() {
            validate_price(price)?;
        }

        Ok(VariantConfig {
            allowed_sizes,
            allowed_temperatures,
            default_size,
            default_temperature,
            prices: input.prices,
        })
    }

    pub fn allowed_sizes(&self) -> &[String] {
        &self.allowed_sizes
    }

    pub fn allowed_temperatures(&self) -> &[String] {
        &self.allowed_temperatures
    }

    pub fn default_size(&self) -> Option<&str> {
        self.default_size.as_deref()
    }

    pub fn default_temperature(&self) -> Option<&str> {
        self.default_temperature.as_deref()
    }

    pub fn prices(&self) -> &ChannelPrices {
        &self.prices
    }

    /// Every (size, temperature) pair with a non-null price on `channel`,
    /// sizes outer, temperatures inner, both in configured order.
    ///
    /// An empty list means the item is unavailable on this channel; that is
    /// a normal outcome, not an error.
    pub fn list_sellable_options(&self, channel: Channel) -> Vec<SellableOption> {
        let mut options = Vec::new();
        for size in &self.allowed_sizes {
            for temperature in &self.allowed_temperatures {
                if let Some(price) = self.prices.get(channel, size, temperature) {
                    options.push(SellableOption {
                        size: size.clone(),
                        temperature: temperature.clone(),
                        price,
                    });
                }
            }
        }
        options
    }

    /// Direct lookup. `None` means "not configured", which is distinct from
    /// `Some(Money::zero())`.
    ///
    /// Tags outside the allowed sets never resolve, even if the raw grid has
    /// a cell for them.
    pub fn resolve_price(&self, channel: Channel, size: &str, temperature: &str) -> Option<Money> {
        if !self.allows(size, temperature) {
            return None;
        }
        self.prices.get(channel, size, temperature)
    }

    /// The option a cashier gets without choosing: the configured default
    /// if both defaults are set and sellable on `channel`, otherwise the
    /// first sellable option.
    pub fn resolve_default_option(&self, channel: Channel) -> Option<SellableOption> {
        if let (Some(size), Some(temperature)) = (&self.default_size, &self.default_temperature) {
            if let Some(price) = self.prices.get(channel, size, temperature) {
                return Some(SellableOption {
                    size: size.clone(),
                    temperature: temperature.clone(),
                    price,
                });
            }
        }
        self.list_sellable_options(channel).into_iter().next()
    }

    /// Price of [`VariantConfig::resolve_default_option`].
    pub fn resolve_default_price(&self, channel: Channel) -> Option<Money> {
        self.resolve_default_option(channel).map(|option| option.price)
    }

    /// True if at least one combination is sellable on `channel`.
    pub fn is_sellable_on(&self, channel: Channel) -> bool {
        self.allowed_sizes.iter().any(|size| {
            self.allowed_temperatures
                .iter()
                .any(|temperature| self.prices.get(channel, size, temperature).is_some())
        })
    }

    fn allows(&self, size: &str, temperature: &str) -> bool {
        self.allowed_sizes.iter().any(|s| s == size)
            && self.allowed_temperatures.iter().any(|t| t == temperature)
    }
}

impl TryFrom<VariantConfigInput> for VariantConfig {
    type Error = ValidationError;

    fn try_from(input: VariantConfigInput) -> Result<Self, Self::Error> {
        VariantConfig::new(input)
    }
}

impl From<VariantConfig> for VariantConfigInput {
    fn from(config: VariantConfig) -> Self {
        VariantConfigInput {
            allowed_sizes: config.allowed_sizes,
            allowed_temperatures: config.allowed_temperatures,
            default_size: config.default_size,
            default_temperature: config.default_temperature,
            prices: config.prices,
        }
    }
}

fn normalize_tags(field: &str, tags: Vec<String>) -> Result<Vec<String>, ValidationError> {
    let mut seen = HashSet::new();
    let mut normalized = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim().to_string();
        if tag.is_empty() {
            continue;
        }
        if !seen.insert(tag.clone()) {
            return Err(ValidationError::Duplicate {
                field: field.to_string(),
                value: tag,
            });
        }
        normalized.push(tag);
    }

    if normalized.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(normalized)
}

fn normalize_default(
    field: &str,
    value: Option<String>,
    allowed: &[String],
) -> Result<Option<String>, ValidationError> {
    let Some(value) = value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    if !allowed.contains(&value) {
        return Err(ValidationError::NotAllowed {
            field: field.to_string(),
            allowed: allowed.to_vec(),
        });
    }
    Ok(Some(value))
}

// =============================================================================
// Unit Tests
// =============================================================================
