//! Vendor records.

use serde::{Deserialize, Serialize};

use super::{Entity, text};
use crate::components::TableColumn;

/// A supplier the tenant buys stock from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Vendor {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
}

impl Vendor {
    #[must_use]
    pub fn new(name: &str, email: &str) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
            ..Self::default()
        }
    }
}

impl Entity for Vendor {
    const COLLECTION: &'static str = "vendors";
    const REQUIRED_FIELDS: &'static [&'static str] = &["name", "email"];
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "email", "phone", "address"];
    const COLUMNS: &'static [TableColumn] = &[
        TableColumn::new("name", "Name"),
        TableColumn::new("email", "Email"),
        TableColumn::new("phone", "Phone"),
        TableColumn::new("address", "Address"),
    ];

    fn field(&self, key: &str) -> Option<String> {
        match key {
            "name" => text(&self.name),
            "email" => text(&self.email),
            "phone" => text(&self.phone),
            "address" => text(&self.address),
            _ => None,
        }
    }
}
