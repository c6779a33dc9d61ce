//! Catalog entities: products, categories and coupons.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use shopdesk_core::{Availability, BlobRef, Percentage};

use super::{Entity, text};
use crate::components::TableColumn;

/// A product in the tenant's catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Product {
    pub name: String,
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_price: Option<Decimal>,
    #[serde(default)]
    pub stock: u32,
    /// Category name; an informal reference, not checked against
    /// [`Category`] records.
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub availability: Availability,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<BlobRef>,
}

impl Product {
    /// Price the customer pays: the discount price when set and lower.
    #[must_use]
    pub fn effective_price(&self) -> Decimal {
        self.discount_price
            .filter(|discounted| *discounted < self.price)
            .unwrap_or(self.price)
    }
}

impl Entity for Product {
    const COLLECTION: &'static str = "products";
    const REQUIRED_FIELDS: &'static [&'static str] = &["name", "category"];
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "category"];
    const COLUMNS: &'static [TableColumn] = &[
        TableColumn::new("name", "Name"),
        TableColumn::new("price", "Price"),
        TableColumn::new("discount_price", "Discount Price"),
        TableColumn::new("stock", "Stock"),
        TableColumn::new("category", "Category"),
        TableColumn::new("availability", "Availability"),
    ];

    fn field(&self, key: &str) -> Option<String> {
        match key {
            "name" => text(&self.name),
            "price" => Some(self.price.to_string()),
            "discount_price" => self.discount_price.map(|p| p.to_string()),
            "stock" => Some(self.stock.to_string()),
            "category" => text(&self.category),
            "availability" => Some(self.availability.to_string()),
            "image" => self.image.as_ref().map(ToString::to_string),
            _ => None,
        }
    }
}

/// A flat product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Category {
    pub name: String,
}

impl Category {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

impl Entity for Category {
    const COLLECTION: &'static str = "categories";
    const REQUIRED_FIELDS: &'static [&'static str] = &["name"];
    const SEARCH_FIELDS: &'static [&'static str] = &["name"];
    const COLUMNS: &'static [TableColumn] = &[TableColumn::new("name", "Name")];

    fn field(&self, key: &str) -> Option<String> {
        match key {
            "name" => text(&self.name),
            _ => None,
        }
    }
}

/// A discount coupon.
///
/// Codes are not unique: two coupons may share a code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coupon {
    pub code: String,
    pub discount: Percentage,
}

impl Coupon {
    #[must_use]
    pub fn new(code: &str, discount: Percentage) -> Self {
        Self {
            code: code.to_string(),
            discount,
        }
    }
}

impl Entity for Coupon {
    const COLLECTION: &'static str = "coupons";
    const REQUIRED_FIELDS: &'static [&'static str] = &["code", "discount"];
    const SEARCH_FIELDS: &'static [&'static str] = &["code"];
    const COLUMNS: &'static [TableColumn] = &[
        TableColumn::new("code", "Code"),
        TableColumn::new("discount", "Discount (%)"),
    ];

    fn field(&self, key: &str) -> Option<String> {
        match key {
            "code" => text(&self.code),
            "discount" => Some(self.discount.value().to_string()),
            _ => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn product_requires_name_and_category() {
        let product = Product {
            price: Decimal::new(1999, 2),
            ..Product::default()
        };
        assert_eq!(product.missing_fields(), vec!["name", "category"]);
    }

    #[test]
    fn effective_price_prefers_lower_discount() {
        let mut product = Product {
            name: "Kettle".into(),
            price: Decimal::new(4000, 2),
            discount_price: Some(Decimal::new(3500, 2)),
            ..Product::default()
        };
        assert_eq!(product.effective_price(), Decimal::new(3500, 2));
        product.discount_price = Some(Decimal::new(4500, 2));
        assert_eq!(product.effective_price(), Decimal::new(4000, 2));
    }

    #[test]
    fn product_document_omits_empty_optionals() {
        let product = Product {
            name: "Kettle".into(),
            category: "Kitchen".into(),
            ..Product::default()
        };
        let json = serde_json::to_value(&product).unwrap();
        assert!(json.get("image").is_none());
        assert_eq!(json["availability"], "in_stock");
    }

    #[test]
    fn coupon_cells() {
        let coupon = Coupon::new("SAVE10", Percentage::new(Decimal::TEN).unwrap());
        assert_eq!(coupon.field("code").as_deref(), Some("SAVE10"));
        assert_eq!(coupon.field("discount").as_deref(), Some("10"));
    }
}
