//! Payment methods offered at checkout.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Entity, text};
use crate::components::TableColumn;

/// A payment method the tenant accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PaymentMethod {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for PaymentMethod {
    const COLLECTION: &'static str = "payment_methods";
    const REQUIRED_FIELDS: &'static [&'static str] = &["name", "category"];
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "category", "description"];
    const TOGGLEABLE: bool = true;
    const COLUMNS: &'static [TableColumn] = &[
        TableColumn::new("name", "Name"),
        TableColumn::new("category", "Category"),
        TableColumn::new("description", "Description"),
        TableColumn::new("enabled", "Enabled"),
        TableColumn::new("updated_at", "Updated"),
    ];

    fn field(&self, key: &str) -> Option<String> {
        match key {
            "name" => text(&self.name),
            "category" => text(&self.category),
            "description" => text(&self.description),
            "enabled" => Some(self.enabled.to_string()),
            "created_at" => self.created_at.map(|t| t.to_rfc3339()),
            "updated_at" => self.updated_at.map(|t| t.to_rfc3339()),
            _ => None,
        }
    }

    fn before_save(&mut self, now: DateTime<Utc>, creating: bool) {
        if creating || self.created_at.is_none() {
            self.created_at = Some(now);
        }
        self.updated_at = Some(now);
    }
}
