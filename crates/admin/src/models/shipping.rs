//! Shipping methods and regions.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Entity, text};
use crate::components::TableColumn;

/// A carrier service with a flat rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ShippingMethod {
    pub name: String,
    pub rate: Decimal,
    #[serde(default)]
    pub enabled: bool,
}

impl Entity for ShippingMethod {
    const COLLECTION: &'static str = "shipping_methods";
    const REQUIRED_FIELDS: &'static [&'static str] = &["name"];
    const SEARCH_FIELDS: &'static [&'static str] = &["name"];
    const TOGGLEABLE: bool = true;
    const COLUMNS: &'static [TableColumn] = &[
        TableColumn::new("name", "Name"),
        TableColumn::new("rate", "Rate"),
        TableColumn::new("enabled", "Enabled"),
    ];

    fn field(&self, key: &str) -> Option<String> {
        match key {
            "name" => text(&self.name),
            "rate" => Some(self.rate.to_string()),
            "enabled" => Some(self.enabled.to_string()),
            _ => None,
        }
    }
}

/// A destination region with its shipping cost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ShippingRegion {
    pub name: String,
    pub cost: Decimal,
    #[serde(default)]
    pub enabled: bool,
}

impl Entity for ShippingRegion {
    const COLLECTION: &'static str = "shipping_regions";
    const REQUIRED_FIELDS: &'static [&'static str] = &["name"];
    const SEARCH_FIELDS: &'static [&'static str] = &["name"];
    const TOGGLEABLE: bool = true;
    const COLUMNS: &'static [TableColumn] = &[
        TableColumn::new("name", "Region"),
        TableColumn::new("cost", "Cost"),
        TableColumn::new("enabled", "Enabled"),
    ];

    fn field(&self, key: &str) -> Option<String> {
        match key {
            "name" => text(&self.name),
            "cost" => Some(self.cost.to_string()),
            "enabled" => Some(self.enabled.to_string()),
            _ => None,
        }
    }
}
