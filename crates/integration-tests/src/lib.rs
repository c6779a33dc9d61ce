//! Integration tests for Shopdesk.
//!
//! # Running Tests
//!
//! ```bash
//! # In-memory scenarios
//! cargo test -p shopdesk-integration-tests
//!
//! # Including the PostgreSQL store tests
//! SHOPDESK_DATABASE_URL=postgres://... cargo test -p shopdesk-integration-tests -- --include-ignored
//! ```
//!
//! # Test Categories
//!
//! - `scenarios` - End-to-end back office flows
//! - `properties` - Filter, pagination, validation and export properties
//! - `failures` - Authentication, remote failures and partial bulk failures
//! - `orders_reports` - Nested orders, seeding, reports and image upload
//! - `postgres_store` - `PostgreSQL` document store (ignored by default)

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use secrecy::SecretString;

use shopdesk_admin::accessor::CollectionAccessor;
use shopdesk_admin::db::{DocumentStore, MemoryStore, PgDocumentStore};
use shopdesk_admin::models::Entity;
use shopdesk_admin::view::ListViewModel;
use shopdesk_core::{Email, Principal, PrincipalId};

/// A principal signed in as `email`.
#[must_use]
pub fn principal(email: &str) -> Principal {
    Principal::new(
        PrincipalId::new(uuid::Uuid::new_v4().to_string()),
        Email::parse(email).unwrap(),
    )
}

/// The default test tenant owner.
#[must_use]
pub fn owner() -> Principal {
    principal("owner@shop.io")
}

/// An empty list view of `T` for `principal`.
#[must_use]
pub fn list_view<S: DocumentStore, T: Entity>(store: &S, principal: Option<&Principal>) -> ListViewModel<S, T> {
    ListViewModel::new(CollectionAccessor::new(store.clone()), principal.cloned())
}

/// A fresh in-memory store.
#[must_use]
pub fn memory_store() -> MemoryStore {
    MemoryStore::new()
}

/// `PostgreSQL` store from `SHOPDESK_DATABASE_URL`, migrated.
pub async fn postgres_store() -> PgDocumentStore {
    let url = std::env::var("SHOPDESK_DATABASE_URL").expect("SHOPDESK_DATABASE_URL must be set");
    let pool = shopdesk_admin::db::create_pool(&SecretString::from(url))
        .await
        .unwrap();
    shopdesk_admin::db::run_migrations(&pool).await.unwrap();
    PgDocumentStore::new(pool)
}
