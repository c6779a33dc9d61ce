//! `PostgreSQL` document store.
//!
//! Documents live in a single `shopdesk.documents` table keyed by
//! `(collection, id)` with the fields in a `JSONB` column. Merging uses the
//! `||` operator, which replaces top-level keys exactly like
//! [`super::merge_fields`].

use sqlx::PgPool;
use sqlx::types::Json;

use shopdesk_core::{CollectionPath, DocumentId};

use super::{DocumentStore, Fields, StoreError, StoredDocument};

/// Internal row type for document queries.
#[derive(Debug, sqlx::FromRow)]
struct DocumentRow {
    id: DocumentId,
    fields: Json<serde_json::Value>,
}

impl TryFrom<DocumentRow> for StoredDocument {
    type Error = StoreError;

    fn try_from(row: DocumentRow) -> Result<Self, Self::Error> {
        match row.fields.0 {
            serde_json::Value::Object(fields) => Ok(Self { id: row.id, fields }),
            other => Err(StoreError::DataCorruption(format!(
                "document {} is not an object: {other}",
                row.id
            ))),
        }
    }
}

/// [`DocumentStore`] backed by `PostgreSQL`.
#[derive(Debug, Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    /// Create a store over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl DocumentStore for PgDocumentStore {
    async fn list(&self, path: &CollectionPath) -> Result<Vec<StoredDocument>, StoreError> {
        let rows = sqlx::query_as::<_, DocumentRow>(
            r"
            SELECT id, fields
            FROM shopdesk.documents
            WHERE collection = $1
            ORDER BY created_at ASC, id ASC
            ",
        )
        .bind(path.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn get(
        &self,
        path: &CollectionPath,
        id: &DocumentId,
    ) -> Result<Option<StoredDocument>, StoreError> {
        let row = sqlx::query_as::<_, DocumentRow>(
            r"
            SELECT id, fields
            FROM shopdesk.documents
            WHERE collection = $1 AND id = $2
            ",
        )
        .bind(path.as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn add(&self, path: &CollectionPath, fields: Fields) -> Result<DocumentId, StoreError> {
        let id = DocumentId::generate();
        sqlx::query(
            r"
            INSERT INTO shopdesk.documents (collection, id, fields)
            VALUES ($1, $2, $3)
            ",
        )
        .bind(path.as_str())
        .bind(&id)
        .bind(Json(fields))
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    async fn set(
        &self,
        path: &CollectionPath,
        id: &DocumentId,
        fields: Fields,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r"
            INSERT INTO shopdesk.documents (collection, id, fields)
            VALUES ($1, $2, $3)
            ON CONFLICT (collection, id)
            DO UPDATE SET fields = EXCLUDED.fields, updated_at = NOW()
            ",
        )
        .bind(path.as_str())
        .bind(id)
        .bind(Json(fields))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update(
        &self,
        path: &CollectionPath,
        id: &DocumentId,
        fields: Fields,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            r"
            UPDATE shopdesk.documents
            SET fields = fields || $3, updated_at = NOW()
            WHERE collection = $1 AND id = $2
            ",
        )
        .bind(path.as_str())
        .bind(id)
        .bind(Json(fields))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn delete(&self, path: &CollectionPath, id: &DocumentId) -> Result<(), StoreError> {
        sqlx::query(
            r"
            DELETE FROM shopdesk.documents
            WHERE collection = $1 AND id = $2
            ",
        )
        .bind(path.as_str())
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
