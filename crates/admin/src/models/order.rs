//! Customer orders.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use shopdesk_core::{DocumentId, OrderStatus};

use super::Entity;
use crate::components::TableColumn;

/// One line of an order.
///
/// `name` is the product name at order time; it is a copy, not a reference
/// to a product record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
}

impl LineItem {
    #[must_use]
    pub fn new(name: &str, price: Decimal, quantity: u32) -> Self {
        Self {
            name: name.to_string(),
            price,
            quantity,
        }
    }

    /// `price * quantity`, saturating at the bounds of [`Decimal`].
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.price.saturating_mul(Decimal::from(self.quantity))
    }
}

/// An order placed by a customer, stored under that customer's document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Order {
    /// Owning customer; filled in when the order is placed.
    #[serde(default)]
    pub customer_id: DocumentId,
    pub total: Decimal,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub paid: bool,
    #[serde(default)]
    pub items: Vec<LineItem>,
}

impl Order {
    /// Build an order whose total is the sum of its line items.
    #[must_use]
    pub fn from_items(items: Vec<LineItem>) -> Self {
        let total = items
            .iter()
            .map(LineItem::subtotal)
            .fold(Decimal::ZERO, Decimal::saturating_add);
        Self {
            total,
            items,
            ..Self::default()
        }
    }

    /// Total quantity across all line items.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0_u32, |count, item| count.saturating_add(item.quantity))
    }
}

impl Entity for Order {
    const COLLECTION: &'static str = "orders";
    const REQUIRED_FIELDS: &'static [&'static str] = &["customer_id"];
    const SEARCH_FIELDS: &'static [&'static str] = &["items"];
    const COLUMNS: &'static [TableColumn] = &[
        TableColumn::new("id", "Order"),
        TableColumn::new("customer_id", "Customer"),
        TableColumn::new("total", "Total"),
        TableColumn::new("status", "Status"),
        TableColumn::new("paid", "Paid"),
        TableColumn::new("item_count", "Items"),
    ];

    fn field(&self, key: &str) -> Option<String> {
        match key {
            "customer_id" => (!self.customer_id.is_empty()).then(|| self.customer_id.to_string()),
            "total" => Some(self.total.to_string()),
            "status" => Some(self.status.to_string()),
            "paid" => Some(self.paid.to_string()),
            "item_count" => Some(self.item_count().to_string()),
            "items" => {
                let names: Vec<&str> = self.items.iter().map(|item| item.name.as_str()).collect();
                (!names.is_empty()).then(|| names.join(" "))
            }
            _ => None,
        }
    }
}
