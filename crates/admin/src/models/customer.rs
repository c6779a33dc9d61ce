//! Customer records.

use serde::{Deserialize, Serialize};

use shopdesk_core::CustomerStatus;

use super::{Entity, text};
use crate::components::TableColumn;

/// A customer of the tenant's store.
///
/// Stored in the tenant's `users` collection; orders are nested below each
/// customer document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Customer {
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub order_count: u32,
    #[serde(default)]
    pub status: CustomerStatus,
}

impl Customer {
    /// First and last name joined with a space.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }
}

impl Entity for Customer {
    const COLLECTION: &'static str = "users";
    const REQUIRED_FIELDS: &'static [&'static str] = &["first_name", "email"];
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "email", "phone"];
    const COLUMNS: &'static [TableColumn] = &[
        TableColumn::new("name", "Customer"),
        TableColumn::new("email", "Email"),
        TableColumn::new("phone", "Phone"),
        TableColumn::new("address", "Address"),
        TableColumn::new("order_count", "Orders"),
        TableColumn::new("status", "Status"),
    ];

    fn field(&self, key: &str) -> Option<String> {
        match key {
            "name" => text(&self.full_name()),
            "first_name" => text(&self.first_name),
            "last_name" => text(&self.last_name),
            "email" => text(&self.email),
            "phone" => text(&self.phone),
            "address" => text(&self.address),
            "order_count" => Some(self.order_count.to_string()),
            "status" => Some(self.status.to_string()),
            _ => None,
        }
    }
}
