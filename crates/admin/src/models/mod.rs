//! Domain models for the back office.
//!
//! Every entity is a plain serde record implementing [`Entity`]. The trait
//! tells the generic machinery where the entity lives, which fields a draft
//! must carry, which fields free-text search looks at and which columns an
//! export contains.
//!
//! # Entities
//!
//! - [`Product`], [`Customer`], [`Category`], [`Coupon`], [`Vendor`]
//! - [`Order`] (nested under a customer)
//! - [`PaymentMethod`], [`ShippingMethod`], [`ShippingRegion`]

pub mod catalog;
pub mod customer;
pub mod order;
pub mod payment;
pub mod shipping;
pub mod vendor;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use shopdesk_core::DocumentId;

use crate::components::{Cells, TableColumn};
use crate::db::{Fields, StoreError, StoredDocument, merge_fields};
use crate::error::AdminError;

pub use catalog::{Category, Coupon, Product};
pub use customer::Customer;
pub use order::{LineItem, Order};
pub use payment::PaymentMethod;
pub use shipping::{ShippingMethod, ShippingRegion};
pub use vendor::Vendor;

/// A record type stored in a tenant-scoped collection.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Collection name under the tenant (or under the parent document).
    const COLLECTION: &'static str;
    /// Fields that must be present and non-blank before saving.
    const REQUIRED_FIELDS: &'static [&'static str];
    /// Fields scanned by free-text search.
    const SEARCH_FIELDS: &'static [&'static str];
    /// Table/export columns, in display order.
    const COLUMNS: &'static [TableColumn];
    /// Whether records carry an `enabled` flag that bulk actions may flip.
    const TOGGLEABLE: bool = false;

    /// String value of a field, `None` when absent or blank.
    fn field(&self, key: &str) -> Option<String>;

    /// Hook run by the form view-model right before a create or update.
    fn before_save(&mut self, _now: DateTime<Utc>, _creating: bool) {}

    /// Required fields that are absent or blank.
    fn missing_fields(&self) -> Vec<String> {
        Self::REQUIRED_FIELDS
            .iter()
            .filter(|key| self.field(key).is_none_or(|v| v.trim().is_empty()))
            .map(ToString::to_string)
            .collect()
    }
}

/// A stored entity together with its store-assigned identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Record<T> {
    pub id: DocumentId,
    pub data: T,
}

impl<T: Entity> Record<T> {
    /// Decode a stored document.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Serialization`] when the fields do not match
    /// the entity shape.
    pub fn from_document(doc: StoredDocument) -> Result<Self, StoreError> {
        Ok(Self {
            id: doc.id,
            data: from_fields(doc.fields)?,
        })
    }
}

impl<T: Entity> Cells for Record<T> {
    fn cell(&self, key: &str) -> Option<String> {
        if key == "id" {
            return Some(self.id.to_string());
        }
        self.data.field(key)
    }
}

/// Partial update: top-level fields to overwrite.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Patch(Fields);

impl Patch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite `key` with `value`.
    #[must_use]
    pub fn set(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    /// Patch toggling the `enabled` flag.
    #[must_use]
    pub fn enabled(enabled: bool) -> Self {
        Self::new().set("enabled", enabled)
    }

    /// Patch carrying every field of `entity`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the entity does not serialize to an object.
    pub fn from_entity<T: Entity>(entity: &T) -> Result<Self, StoreError> {
        to_fields(entity).map(Self)
    }

    /// Apply to a local copy, the way the store merges it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Serialization`] if the merged document no
    /// longer matches the entity shape.
    pub fn apply_to<T: Entity>(&self, entity: &T) -> Result<T, StoreError> {
        let mut fields = to_fields(entity)?;
        merge_fields(&mut fields, self.0.clone());
        from_fields(fields)
    }

    /// Apply to `entity` and check the result is still a valid record.
    ///
    /// Rejects values of the wrong type, keys the entity has no field for,
    /// and blanking out a required field.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Validation`] naming the offending keys.
    pub fn validate<T: Entity>(&self, entity: &T) -> Result<T, AdminError> {
        let current = to_fields(entity)?;
        let mut merged = current.clone();
        merge_fields(&mut merged, self.0.clone());
        let Ok(patched) = from_fields::<T>(merged) else {
            return Err(AdminError::Validation {
                missing: self.mistyped_keys::<T>(&current),
            });
        };

        let kept = to_fields(&patched)?;
        let mut invalid: Vec<String> = self
            .0
            .iter()
            .filter(|(key, value)| !value.is_null() && !kept.contains_key(*key))
            .map(|(key, _)| key.clone())
            .collect();
        invalid.extend(
            patched
                .missing_fields()
                .into_iter()
                .filter(|key| self.0.contains_key(key)),
        );

        if invalid.is_empty() {
            Ok(patched)
        } else {
            Err(AdminError::Validation { missing: invalid })
        }
    }

    /// Keys whose value alone breaks decoding of `current`.
    fn mistyped_keys<T: Entity>(&self, current: &Fields) -> Vec<String> {
        let keys: Vec<String> = self
            .0
            .iter()
            .filter(|(key, value)| {
                let mut single = current.clone();
                single.insert((*key).clone(), (*value).clone());
                from_fields::<T>(single).is_err()
            })
            .map(|(key, _)| key.clone())
            .collect();
        if keys.is_empty() {
            self.0.keys().cloned().collect()
        } else {
            keys
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn into_fields(self) -> Fields {
        self.0
    }
}

/// Serialize an entity to top-level document fields.
///
/// # Errors
///
/// Returns [`StoreError`] if serialization fails or does not yield an object.
pub fn to_fields<T: Serialize>(entity: &T) -> Result<Fields, StoreError> {
    match serde_json::to_value(entity)? {
        Value::Object(fields) => Ok(fields),
        other => Err(StoreError::DataCorruption(format!(
            "entity serialized to a non-object: {other}"
        ))),
    }
}

/// Deserialize document fields into an entity.
///
/// # Errors
///
/// Returns [`StoreError::Serialization`] on shape mismatch.
pub fn from_fields<T: DeserializeOwned>(fields: Fields) -> Result<T, StoreError> {
    Ok(serde_json::from_value(Value::Object(fields))?)
}

/// Non-blank text as a cell value.
pub(crate) fn text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn patch_applies_like_store_merge() {
        let vendor = Vendor {
            name: "Acme".into(),
            email: "sales@acme.io".into(),
            phone: String::new(),
            address: String::new(),
        };
        let patched = Patch::new()
            .set("phone", "555-0100")
            .apply_to(&vendor)
            .unwrap();
        assert_eq!(patched.phone, "555-0100");
        assert_eq!(patched.name, "Acme");
    }

    #[test]
    fn validate_names_mistyped_fields() {
        let product = Product {
            name: "Laptop".into(),
            category: "Electronics".into(),
            ..Product::default()
        };
        let err = Patch::new()
            .set("stock", "lots")
            .set("name", "Laptop Pro")
            .validate(&product)
            .unwrap_err();
        assert!(
            matches!(&err, AdminError::Validation { missing } if missing == &["stock"]),
            "{err}"
        );
    }

    #[test]
    fn validate_rejects_unknown_and_blanked_fields() {
        let vendor = Vendor::new("Acme", "sales@acme.io");

        let err = Patch::enabled(true).validate(&vendor).unwrap_err();
        assert!(matches!(&err, AdminError::Validation { missing } if missing == &["enabled"]));

        let err = Patch::new().set("name", "  ").validate(&vendor).unwrap_err();
        assert!(matches!(&err, AdminError::Validation { missing } if missing == &["name"]));

        let patched = Patch::new()
            .set("phone", "555-0100")
            .validate(&vendor)
            .unwrap();
        assert_eq!(patched.phone, "555-0100");
    }

    #[test]
    fn validate_allows_clearing_optional_fields() {
        let product = Product {
            name: "Laptop".into(),
            category: "Electronics".into(),
            discount_price: Some(rust_decimal::Decimal::ONE),
            ..Product::default()
        };
        let patched = Patch::new()
            .set("discount_price", Value::Null)
            .validate(&product)
            .unwrap();
        assert_eq!(patched.discount_price, None);
    }

    #[test]
    fn record_cells_include_id() {
        let record = Record {
            id: DocumentId::new("c1"),
            data: Category::new("Electronics"),
        };
        assert_eq!(record.cell("id").as_deref(), Some("c1"));
        assert_eq!(record.cell("name").as_deref(), Some("Electronics"));
        assert_eq!(record.cell("nope"), None);
    }

    #[test]
    fn missing_fields_treats_blank_as_missing() {
        let category = Category::new("   ");
        assert_eq!(category.missing_fields(), vec!["name".to_string()]);
    }
}
