//! Orders nested under customers.
//!
//! Orders live at `tenants/{key}/users/{customer_id}/orders`. Placing an
//! order bumps the customer's `order_count`; the two writes are independent
//! and a failure of the second leaves the order in place.

use tracing::instrument;

use shopdesk_core::{DocumentId, Principal};

use crate::accessor::CollectionAccessor;
use crate::db::DocumentStore;
use crate::error::AdminError;
use crate::models::{Customer, Order, Patch, Record};

/// Order operations across a tenant's customers.
#[derive(Debug, Clone)]
pub struct CustomerOrders<S> {
    store: S,
    customers: CollectionAccessor<S, Customer>,
}

impl<S: DocumentStore> CustomerOrders<S> {
    #[must_use]
    pub fn new(store: S) -> Self {
        Self {
            customers: CollectionAccessor::new(store.clone()),
            store,
        }
    }

    /// Accessor for one customer's orders.
    #[must_use]
    pub fn orders_of(&self, customer_id: &DocumentId) -> CollectionAccessor<S, Order> {
        CollectionAccessor::nested::<Customer>(self.store.clone(), customer_id.clone())
    }

    /// Create `order` for a customer and increment their order count.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::NotFound`] for an unknown customer and
    /// [`AdminError::Remote`] if either write fails.
    #[instrument(skip(self, principal, order), fields(total = %order.total))]
    pub async fn place_order(
        &self,
        principal: Option<&Principal>,
        customer_id: &DocumentId,
        mut order: Order,
    ) -> Result<DocumentId, AdminError> {
        let customer = self.customers.get(principal, customer_id).await?;
        order.customer_id = customer_id.clone();

        let id = self.orders_of(customer_id).create(principal, &order).await?;
        self.customers
            .update(
                principal,
                customer_id,
                Patch::new().set("order_count", customer.data.order_count.saturating_add(1)),
            )
            .await?;
        tracing::info!(order = %id, customer = %customer_id, "Placed order");
        Ok(id)
    }

    /// Every order of every customer, customer by customer.
    ///
    /// # Errors
    ///
    /// Returns the first failure; nothing is returned partially.
    #[instrument(skip(self, principal))]
    pub async fn all_orders(&self, principal: Option<&Principal>) -> Result<Vec<Record<Order>>, AdminError> {
        let mut orders = Vec::new();
        for customer in self.customers.list(principal).await? {
            orders.extend(self.orders_of(&customer.id).list(principal).await?);
        }
        tracing::debug!(count = orders.len(), "Loaded orders across customers");
        Ok(orders)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use shopdesk_core::{Email, PrincipalId};

    use super::*;
    use crate::db::MemoryStore;
    use crate::models::LineItem;

    fn owner() -> Principal {
        Principal::new(PrincipalId::new("uid"), Email::parse("owner@shop.io").unwrap())
    }

    fn customer(name: &str) -> Customer {
        Customer {
            first_name: name.into(),
            email: format!("{}@example.com", name.to_lowercase()),
            ..Customer::default()
        }
    }

    #[tokio::test]
    async fn placing_orders_counts_them() {
        let store = MemoryStore::new();
        let owner = owner();
        let customers = CollectionAccessor::<_, Customer>::new(store.clone());
        let ada = customers.create(Some(&owner), &customer("Ada")).await.unwrap();
        let bob = customers.create(Some(&owner), &customer("Bob")).await.unwrap();

        let orders = CustomerOrders::new(store);
        let order = Order::from_items(vec![LineItem::new("Mug", Decimal::new(850, 2), 2)]);
        orders.place_order(Some(&owner), &ada, order.clone()).await.unwrap();
        orders.place_order(Some(&owner), &ada, order.clone()).await.unwrap();
        orders.place_order(Some(&owner), &bob, order).await.unwrap();

        let ada_record = customers.get(Some(&owner), &ada).await.unwrap();
        assert_eq!(ada_record.data.order_count, 2);

        let ada_orders = orders.orders_of(&ada).list(Some(&owner)).await.unwrap();
        assert_eq!(ada_orders.len(), 2);
        assert!(ada_orders.iter().all(|o| o.data.customer_id == ada));

        assert_eq!(orders.all_orders(Some(&owner)).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn unknown_customer_is_not_found() {
        let orders = CustomerOrders::new(MemoryStore::new());
        let err = orders
            .place_order(Some(&owner()), &DocumentId::new("ghost"), Order::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AdminError::NotFound { .. }));
    }
}
