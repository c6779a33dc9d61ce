//! Tenant-scoped collection accessor.
//!
//! A [`CollectionAccessor`] binds an entity type to a document store and
//! resolves, per call, the storage path of the calling principal's copy of
//! that collection. The principal is an explicit argument of every
//! operation; a call without one fails with
//! [`AdminError::NotAuthenticated`] before touching the store.

use std::marker::PhantomData;

use tracing::instrument;

use shopdesk_core::{CollectionPath, DocumentId, Principal};

use crate::db::{DocumentStore, StoreError};
use crate::error::AdminError;
use crate::models::{Entity, Patch, Record, to_fields};

/// Where a collection hangs in the tenant tree.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Scope {
    /// `tenants/{key}/{collection}`
    Root,
    /// `tenants/{key}/{parent_collection}/{parent}/{collection}`
    Nested {
        parent_collection: &'static str,
        parent: DocumentId,
    },
}

/// CRUD access to one entity collection of the calling tenant.
#[derive(Debug, Clone)]
pub struct CollectionAccessor<S, T> {
    store: S,
    scope: Scope,
    _entity: PhantomData<fn() -> T>,
}

impl<S: DocumentStore, T: Entity> CollectionAccessor<S, T> {
    /// Accessor for a top-level tenant collection.
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self {
            store,
            scope: Scope::Root,
            _entity: PhantomData,
        }
    }

    /// Accessor for a collection nested under one record of `P`
    /// (e.g. a customer's orders).
    #[must_use]
    pub const fn nested<P: Entity>(store: S, parent: DocumentId) -> Self {
        Self {
            store,
            scope: Scope::Nested {
                parent_collection: P::COLLECTION,
                parent,
            },
            _entity: PhantomData,
        }
    }

    /// The underlying store handle.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Resolve the principal's storage path for this collection.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::NotAuthenticated`] without a principal and
    /// [`AdminError::InvalidPath`] if the parent id is not a valid segment.
    pub fn path(&self, principal: Option<&Principal>) -> Result<CollectionPath, AdminError> {
        let principal = principal.ok_or(AdminError::NotAuthenticated)?;
        let tenant = principal.tenant_key();
        let path = match &self.scope {
            Scope::Root => CollectionPath::for_tenant(&tenant, T::COLLECTION)?,
            Scope::Nested {
                parent_collection,
                parent,
            } => CollectionPath::for_tenant(&tenant, parent_collection)?
                .nested(parent, T::COLLECTION)?,
        };
        Ok(path)
    }

    /// All records of the collection.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::NotAuthenticated`] without a principal and
    /// [`AdminError::Remote`] if the store fails or holds a malformed record.
    #[instrument(skip(self, principal), fields(collection = T::COLLECTION))]
    pub async fn list(&self, principal: Option<&Principal>) -> Result<Vec<Record<T>>, AdminError> {
        let path = self.path(principal)?;
        let docs = self.store.list(&path).await?;
        let records = docs
            .into_iter()
            .map(Record::from_document)
            .collect::<Result<Vec<_>, StoreError>>()?;
        tracing::debug!(count = records.len(), "Listed records");
        Ok(records)
    }

    /// One record by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::NotFound`] when absent.
    #[instrument(skip(self, principal), fields(collection = T::COLLECTION))]
    pub async fn get(
        &self,
        principal: Option<&Principal>,
        id: &DocumentId,
    ) -> Result<Record<T>, AdminError> {
        let path = self.path(principal)?;
        let doc = self
            .store
            .get(&path, id)
            .await?
            .ok_or_else(|| self.not_found(id))?;
        Ok(Record::from_document(doc)?)
    }

    /// Persist a new record; the store assigns and returns its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::NotAuthenticated`] without a principal and
    /// [`AdminError::Remote`] if the store fails.
    #[instrument(skip(self, principal, record), fields(collection = T::COLLECTION))]
    pub async fn create(
        &self,
        principal: Option<&Principal>,
        record: &T,
    ) -> Result<DocumentId, AdminError> {
        let path = self.path(principal)?;
        let id = self.store.add(&path, to_fields(record)?).await?;
        tracing::info!(id = %id, "Created record");
        Ok(id)
    }

    /// Merge `patch` into an existing record.
    ///
    /// The patched record is checked against the entity before anything is
    /// written, so a rejected patch leaves the stored record untouched.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::NotFound`] if no record has this identifier and
    /// [`AdminError::Validation`] if the patch does not fit the entity.
    #[instrument(skip(self, principal, patch), fields(collection = T::COLLECTION))]
    pub async fn update(
        &self,
        principal: Option<&Principal>,
        id: &DocumentId,
        patch: Patch,
    ) -> Result<(), AdminError> {
        let path = self.path(principal)?;
        let current = self.get(principal, id).await?;
        patch.validate(&current.data)?;
        match self.store.update(&path, id, patch.into_fields()).await {
            Ok(()) => {
                tracing::info!(id = %id, "Updated record");
                Ok(())
            }
            Err(StoreError::NotFound) => Err(self.not_found(id)),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete a record. Removing an absent record succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::NotAuthenticated`] without a principal and
    /// [`AdminError::Remote`] if the store fails.
    #[instrument(skip(self, principal), fields(collection = T::COLLECTION))]
    pub async fn remove(
        &self,
        principal: Option<&Principal>,
        id: &DocumentId,
    ) -> Result<(), AdminError> {
        let path = self.path(principal)?;
        self.store.delete(&path, id).await?;
        tracing::info!(id = %id, "Removed record");
        Ok(())
    }

    fn not_found(&self, id: &DocumentId) -> AdminError {
        AdminError::NotFound {
            collection: T::COLLECTION.to_string(),
            id: id.clone(),
        }
    }
}
