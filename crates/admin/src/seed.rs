//! Seeding a tenant from a YAML file.
//!
//! ```yaml
//! categories:
//!   - name: Electronics
//! products:
//!   - name: Desk Lamp
//!     price: "25.00"
//!     category: Electronics
//! customers:
//!   - first_name: Ada
//!     email: ada@example.com
//!     orders:
//!       - paid: true
//!         items:
//!           - { name: Desk Lamp, price: "25.00", quantity: 2 }
//! ```

use std::collections::BTreeMap;

use serde::Deserialize;
use tracing::instrument;

use shopdesk_core::{OrderStatus, Principal};

use crate::accessor::CollectionAccessor;
use crate::db::DocumentStore;
use crate::error::AdminError;
use crate::models::{
    Category, Coupon, Customer, Entity, LineItem, Order, PaymentMethod, Product, ShippingMethod,
    ShippingRegion, Vendor,
};
use crate::services::orders::CustomerOrders;

/// An order placed for a seeded customer.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedOrder {
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub paid: bool,
    pub items: Vec<LineItem>,
}

impl SeedOrder {
    fn to_order(&self) -> Order {
        let mut order = Order::from_items(self.items.clone());
        order.status = self.status;
        order.paid = self.paid;
        order
    }
}

/// A customer plus the orders to place for them.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedCustomer {
    #[serde(flatten)]
    pub customer: Customer,
    #[serde(default)]
    pub orders: Vec<SeedOrder>,
}

/// Contents of a seed file. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SeedFile {
    pub categories: Vec<Category>,
    pub products: Vec<Product>,
    pub coupons: Vec<Coupon>,
    pub vendors: Vec<Vendor>,
    pub customers: Vec<SeedCustomer>,
    pub payment_methods: Vec<PaymentMethod>,
    pub shipping_methods: Vec<ShippingMethod>,
    pub shipping_regions: Vec<ShippingRegion>,
}

impl SeedFile {
    /// Parse a seed file.
    ///
    /// # Errors
    ///
    /// Returns the YAML error on malformed input.
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    /// Records missing required fields, as `"{collection}[{index}]: {fields}"`.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        check(&mut errors, &self.categories);
        check(&mut errors, &self.products);
        check(&mut errors, &self.coupons);
        check(&mut errors, &self.vendors);
        let customers: Vec<Customer> = self.customers.iter().map(|c| c.customer.clone()).collect();
        check(&mut errors, &customers);
        check(&mut errors, &self.payment_methods);
        check(&mut errors, &self.shipping_methods);
        check(&mut errors, &self.shipping_regions);
        errors
    }
}

fn check<T: Entity>(errors: &mut Vec<String>, records: &[T]) {
    for (index, record) in records.iter().enumerate() {
        let missing = record.missing_fields();
        if !missing.is_empty() {
            errors.push(format!("{}[{index}]: {}", T::COLLECTION, missing.join(", ")));
        }
    }
}

/// Records created per collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub created: BTreeMap<&'static str, usize>,
}

impl SeedSummary {
    #[must_use]
    pub fn count(&self, collection: &str) -> usize {
        self.created.get(collection).copied().unwrap_or_default()
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.created.values().sum()
    }
}

/// Create every record of `file` for `principal`.
///
/// Records are created one by one; a failure stops seeding and records
/// created so far remain.
///
/// # Errors
///
/// Returns [`AdminError::Validation`] before writing anything if a record
/// lacks required fields, otherwise the first accessor error.
#[instrument(skip(store, principal, file))]
pub async fn seed<S: DocumentStore>(
    store: &S,
    principal: Option<&Principal>,
    file: &SeedFile,
) -> Result<SeedSummary, AdminError> {
    let errors = file.validate();
    if !errors.is_empty() {
        return Err(AdminError::Validation { missing: errors });
    }

    let mut summary = SeedSummary::default();
    create_all(store, principal, &file.categories, &mut summary).await?;
    create_all(store, principal, &file.products, &mut summary).await?;
    create_all(store, principal, &file.coupons, &mut summary).await?;
    create_all(store, principal, &file.vendors, &mut summary).await?;
    create_all(store, principal, &file.payment_methods, &mut summary).await?;
    create_all(store, principal, &file.shipping_methods, &mut summary).await?;
    create_all(store, principal, &file.shipping_regions, &mut summary).await?;

    let customers = CollectionAccessor::<S, Customer>::new(store.clone());
    let orders = CustomerOrders::new(store.clone());
    for seeded in &file.customers {
        let customer_id = customers.create(principal, &seeded.customer).await?;
        *summary.created.entry(Customer::COLLECTION).or_default() += 1;
        for order in &seeded.orders {
            orders
                .place_order(principal, &customer_id, order.to_order())
                .await?;
            *summary.created.entry(Order::COLLECTION).or_default() += 1;
        }
    }

    tracing::info!(total = summary.total(), "Seeding complete");
    Ok(summary)
}

async fn create_all<S: DocumentStore, T: Entity>(
    store: &S,
    principal: Option<&Principal>,
    records: &[T],
    summary: &mut SeedSummary,
) -> Result<(), AdminError> {
    let accessor = CollectionAccessor::<S, T>::new(store.clone());
    for record in records {
        let mut record = record.clone();
        record.before_save(chrono::Utc::now(), true);
        accessor.create(principal, &record).await?;
        *summary.created.entry(T::COLLECTION).or_default() += 1;
    }
    Ok(())
}
