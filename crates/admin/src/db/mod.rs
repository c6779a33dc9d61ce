//! Document store access.
//!
//! Shopdesk keeps every entity as a JSON document addressed by a
//! [`CollectionPath`] plus an opaque [`DocumentId`]. The [`DocumentStore`]
//! trait is the only thing the accessor layer depends on; it mirrors the
//! list/get/add/set/update/delete semantics of a hosted document database.
//!
//! # Implementations
//!
//! - [`MemoryStore`] - process-local, used by tests and demos
//! - [`PgDocumentStore`] - `PostgreSQL` `JSONB` table `shopdesk.documents`
//! - [`AnyStore`] - runtime selection between the two from configuration
//!
//! # Migrations
//!
//! Migrations are stored in `crates/admin/migrations/` and run via:
//! ```bash
//! cargo run -p shopdesk-cli -- migrate
//! ```

pub mod memory;
pub mod postgres;

use std::time::Duration;

use secrecy::ExposeSecret;
use serde_json::{Map, Value};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use shopdesk_core::{CollectionPath, DocumentId};

pub use memory::MemoryStore;
pub use postgres::PgDocumentStore;

/// Top-level fields of a stored document.
pub type Fields = Map<String, Value>;

/// Errors that can occur during document store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failed.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A record could not be converted to or from its JSON document.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Data in the store is corrupted or has an unexpected shape.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Update targeted a document that does not exist.
    #[error("document not found")]
    NotFound,

    /// The backend refused or dropped the request.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// A document as held by the store: its identifier plus its fields.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: DocumentId,
    pub fields: Fields,
}

/// Path-addressed document collections.
///
/// Every call is an independent round-trip; no call is retried and nothing
/// spans more than one document.
pub trait DocumentStore: Clone + Send + Sync + 'static {
    /// All documents in a collection, oldest first.
    fn list(
        &self,
        path: &CollectionPath,
    ) -> impl Future<Output = Result<Vec<StoredDocument>, StoreError>> + Send;

    /// One document, or `None` when absent.
    fn get(
        &self,
        path: &CollectionPath,
        id: &DocumentId,
    ) -> impl Future<Output = Result<Option<StoredDocument>, StoreError>> + Send;

    /// Insert a document under a store-assigned identifier.
    fn add(
        &self,
        path: &CollectionPath,
        fields: Fields,
    ) -> impl Future<Output = Result<DocumentId, StoreError>> + Send;

    /// Create or fully replace the document at `id`.
    fn set(
        &self,
        path: &CollectionPath,
        id: &DocumentId,
        fields: Fields,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Merge top-level `fields` into an existing document.
    ///
    /// Returns [`StoreError::NotFound`] when the document does not exist.
    fn update(
        &self,
        path: &CollectionPath,
        id: &DocumentId,
        fields: Fields,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Delete a document. Deleting an absent document succeeds.
    fn delete(
        &self,
        path: &CollectionPath,
        id: &DocumentId,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Merge `patch` into `target` the way [`DocumentStore::update`] does:
/// top-level keys are replaced, everything else is kept.
pub fn merge_fields(target: &mut Fields, patch: Fields) {
    for (key, value) in patch {
        target.insert(key, value);
    }
}

/// Store selected at runtime from configuration.
#[derive(Debug, Clone)]
pub enum AnyStore {
    Memory(MemoryStore),
    Postgres(PgDocumentStore),
}

impl DocumentStore for AnyStore {
    async fn list(&self, path: &CollectionPath) -> Result<Vec<StoredDocument>, StoreError> {
        match self {
            Self::Memory(store) => store.list(path).await,
            Self::Postgres(store) => store.list(path).await,
        }
    }

    async fn get(
        &self,
        path: &CollectionPath,
        id: &DocumentId,
    ) -> Result<Option<StoredDocument>, StoreError> {
        match self {
            Self::Memory(store) => store.get(path, id).await,
            Self::Postgres(store) => store.get(path, id).await,
        }
    }

    async fn add(&self, path: &CollectionPath, fields: Fields) -> Result<DocumentId, StoreError> {
        match self {
            Self::Memory(store) => store.add(path, fields).await,
            Self::Postgres(store) => store.add(path, fields).await,
        }
    }

    async fn set(
        &self,
        path: &CollectionPath,
        id: &DocumentId,
        fields: Fields,
    ) -> Result<(), StoreError> {
        match self {
            Self::Memory(store) => store.set(path, id, fields).await,
            Self::Postgres(store) => store.set(path, id, fields).await,
        }
    }

    async fn update(
        &self,
        path: &CollectionPath,
        id: &DocumentId,
        fields: Fields,
    ) -> Result<(), StoreError> {
        match self {
            Self::Memory(store) => store.update(path, id, fields).await,
            Self::Postgres(store) => store.update(path, id, fields).await,
        }
    }

    async fn delete(&self, path: &CollectionPath, id: &DocumentId) -> Result<(), StoreError> {
        match self {
            Self::Memory(store) => store.delete(path, id).await,
            Self::Postgres(store) => store.delete(path, id).await,
        }
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Apply the embedded migrations.
///
/// # Errors
///
/// Returns [`StoreError::Migration`] if a migration fails.
pub async fn run_migrations(pool: &PgPool) -> Result<(), StoreError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
