//! # Menu Item Pricing
//!
//! Turns a menu item plus the cashier's selection into a [`LineSpec`] with a
//! resolved unit price.
//!
//! ```text
//! MenuItem ──┬── Simple(FlatPrice) ───────► flat price for channel
//!            │
//!            └── Variant(VariantConfig) ──┬─ size + temp chosen ─► resolve_price
//!                                         └─ nothing chosen ─────► resolve_default_option
//!                                                   │
//!                                   None ◄──────────┴──────────► Some(price)
//!                                     │                              │
//!                            PriceUnavailable                    LineSpec
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::{LineSpec, VariantSelection};
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::Channel;
use crate::validation::validate_price;
use crate::variant::{VariantConfig, VariantConfigInput};

// =============================================================================
// Flat Price
// =============================================================================

/// Retail/reseller price pair for items without variants.
/// `None` means the item is not sold on that channel.
///
/// Deserializing rejects negative prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(try_from = "FlatPriceRecord")]
pub struct FlatPrice {
    pub retail: Option<Money>,
    pub reseller: Option<Money>,
}

#[derive(Deserialize)]
struct FlatPriceRecord {
    retail: Option<Money>,
    reseller: Option<Money>,
}

impl TryFrom<FlatPriceRecord> for FlatPrice {
    type Error = ValidationError;

    fn try_from(record: FlatPriceRecord) -> Result<Self, Self::Error> {
        let price = FlatPrice::new(record.retail, record.reseller);
        price.validate()?;
        Ok(price)
    }
}

impl FlatPrice {
    pub fn new(retail: Option<Money>, reseller: Option<Money>) -> Self {
        FlatPrice { retail, reseller }
    }

    pub fn resolve(&self, channel: Channel) -> Option<Money> {
        match channel {
            Channel::Retail => self.retail,
            Channel::Reseller => self.reseller,
        }
    }

    /// Every configured price must be non-negative.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for price in [self.retail, self.reseller].into_iter().flatten() {
            validate_price(price)?;
        }
        Ok(())
    }
}

// =============================================================================
// Item Pricing
// =============================================================================

/// How a menu item is priced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemPricing {
    Simple(FlatPrice),
    Variant(VariantConfig),
}

impl ItemPricing {
    /// True if anything about this item can be sold on `channel`.
    pub fn is_sellable_on(&self, channel: Channel) -> bool {
        match self {
            ItemPricing::Simple(flat) => flat.resolve(channel).is_some(),
            ItemPricing::Variant(config) => config.is_sellable_on(channel),
        }
    }
}

// =============================================================================
// Menu Item
// =============================================================================

/// A sellable menu item as supplied by the catalog service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    pub pricing: ItemPricing,
}

impl MenuItem {
    /// A menu item without variants. Negative prices are rejected.
    pub fn simple(id: impl Into<String>, name: impl Into<String>, price: FlatPrice) -> CoreResult<Self> {
        price.validate()?;
        Ok(MenuItem {
            id: id.into(),
            name: name.into(),
            pricing: ItemPricing::Simple(price),
        })
    }

    /// A menu item with a variant matrix.
    pub fn with_variants(id: impl Into<String>, name: impl Into<String>, input: VariantConfigInput) -> CoreResult<Self> {
        Ok(MenuItem {
            id: id.into(),
            name: name.into(),
            pricing: ItemPricing::Variant(VariantConfig::new(input)?),
        })
    }

    /// Resolves the unit price for a selection and returns a line spec.
    ///
    /// ## Selection Rules
    /// - Simple items ignore `size` / `temperature` and use the flat price
    /// - Variant items with both `size` and `temperature`: direct lookup
    /// - Variant items with neither: configured default, else first
    ///   sellable option
    /// - Variant items with only one of the two: the first sellable option
    ///   matching the given tag
    ///
    /// ## Errors
    /// `PriceUnavailable` when the selection has no price on `channel`.
    pub fn line_spec(&self, channel: Channel, size: Option<&str>, temperature: Option<&str>) -> CoreResult<LineSpec> {
        let unavailable = || CoreError::PriceUnavailable {
            menu_id: self.id.clone(),
            channel,
            size: size.map(str::to_string),
            temperature: temperature.map(str::to_string),
        };

        match &self.pricing {
            ItemPricing::Simple(flat) => {
                let price = flat.resolve(channel).ok_or_else(unavailable)?;
                Ok(LineSpec::simple(&self.id, &self.name, price, channel))
            }
            ItemPricing::Variant(config) => {
                let (selection, price) = match (size, temperature) {
                    (Some(s), Some(t)) => {
                        let price = config.resolve_price(channel, s, t).ok_or_else(unavailable)?;
                        (VariantSelection::new(s, t), price)
                    }
                    (None, None) => {
                        let option = config.resolve_default_option(channel).ok_or_else(unavailable)?;
                        (VariantSelection::new(option.size, option.temperature), option.price)
                    }
                    (s, t) => {
                        let option = config
                            .list_sellable_options(channel)
                            .into_iter()
                            .find(|o| s.map_or(true, |s| o.size == s) && t.map_or(true, |t| o.temperature == t))
                            .ok_or_else(unavailable)?;
                        (VariantSelection::new(option.size, option.temperature), option.price)
                    }
                };
                Ok(LineSpec::variant(&self.id, &self.name, selection, price, channel))
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn latte() -> MenuItem {
        let input = VariantConfigInput::new(["S", "M"], ["Hot", "Iced"])
            .with_defaults("M", "Hot")
            .with_price(Channel::Retail, "S", "Hot", 18000)
            .with_price(Channel::Retail, "M", "Iced", 24000)
            .with_price(Channel::Reseller, "M", "Iced", 21000);
        MenuItem::with_variants("latte", "Latte", input).unwrap()
    }

    #[test]
    fn test_simple_item_uses_flat_price() {
        let item = MenuItem::simple(
            "croissant",
            "Croissant",
            FlatPrice::new(Some(Money::from_units(22000)), None),
        )
        .unwrap();

        let spec = item.line_spec(Channel::Retail, Some("L"), None).unwrap();
        assert_eq!(spec.unit_price.units(), 22000);
        assert!(spec.variant.is_none());

        let err = item.line_spec(Channel::Reseller, None, None).unwrap_err();
        assert!(err.is_resolution_failure());
    }

    #[test]
    fn test_simple_item_rejects_negative_price() {
        let result = MenuItem::simple("x", "X", FlatPrice::new(Some(Money::from_units(-5)), None));
        assert!(matches!(result, Err(CoreError::Validation(_))));
    }

    #[test]
    fn test_explicit_selection() {
        let spec = latte().line_spec(Channel::Reseller, Some("M"), Some("Iced")).unwrap();
        assert_eq!(spec.unit_price.units(), 21000);
        assert_eq!(spec.channel, Channel::Reseller);
        assert_eq!(spec.variant.unwrap().key(), "M|Iced");
    }

    #[test]
    fn test_unpriced_selection_is_unavailable() {
        let err = latte().line_spec(Channel::Retail, Some("M"), Some("Hot")).unwrap_err();
        assert_eq!(
            err,
            CoreError::PriceUnavailable {
                menu_id: "latte".to_string(),
                channel: Channel::Retail,
                size: Some("M".to_string()),
                temperature: Some("Hot".to_string()),
            }
        );
    }

    #[test]
    fn test_no_selection_uses_default_fallback() {
        // Default M/Hot has no retail price, so the first option S/Hot wins.
        let spec = latte().line_spec(Channel::Retail, None, None).unwrap();
        assert_eq!(spec.unit_price.units(), 18000);
        assert_eq!(spec.variant.unwrap(), VariantSelection::new("S", "Hot"));
    }

    #[test]
    fn test_partial_selection_picks_first_match() {
        let spec = latte().line_spec(Channel::Retail, None, Some("Iced")).unwrap();
        assert_eq!(spec.variant.unwrap(), VariantSelection::new("M", "Iced"));
    }

    #[test]
    fn test_menu_item_json_shape() {
        let item: MenuItem = serde_json::from_value(serde_json::json!({
            "id": "teh",
            "name": "Teh Tarik",
            "pricing": { "kind": "simple", "retail": 12000, "reseller": 10000 }
        }))
        .unwrap();
        assert!(item.pricing.is_sellable_on(Channel::Reseller));
    }

    #[test]
    fn test_menu_item_json_rejects_negative_flat_price() {
        let result = serde_json::from_value::<MenuItem>(serde_json::json!({
            "id": "croissant",
            "name": "Croissant",
            "pricing": { "kind": "simple", "retail": -1, "reseller": null }
        }));
        assert!(result.is_err());
    }
}
