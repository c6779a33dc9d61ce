//! Process-local document store.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::RwLock;

use shopdesk_core::{CollectionPath, DocumentId};

use super::{DocumentStore, Fields, StoreError, StoredDocument, merge_fields};

#[derive(Debug, Default)]
struct State {
    collections: HashMap<CollectionPath, Vec<StoredDocument>>,
    offline: bool,
    rejected: HashSet<DocumentId>,
}

impl State {
    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline {
            return Err(StoreError::Unavailable("store is offline".into()));
        }
        Ok(())
    }

    fn check_writable(&self, id: &DocumentId) -> Result<(), StoreError> {
        self.check_online()?;
        if self.rejected.contains(id) {
            return Err(StoreError::Unavailable(format!("write to {id} rejected")));
        }
        Ok(())
    }
}

/// In-memory [`DocumentStore`].
///
/// Cloning yields another handle onto the same data. Documents keep
/// insertion order. Outages can be simulated with [`Self::set_offline`] and
/// [`Self::reject_writes_to`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<State>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with [`StoreError::Unavailable`].
    pub async fn set_offline(&self, offline: bool) {
        self.state.write().await.offline = offline;
    }

    /// Make writes (`set`, `update`, `delete`) targeting `id` fail.
    pub async fn reject_writes_to(&self, id: DocumentId) {
        self.state.write().await.rejected.insert(id);
    }

    /// Number of documents in a collection.
    pub async fn len(&self, path: &CollectionPath) -> usize {
        self.state
            .read()
            .await
            .collections
            .get(path)
            .map_or(0, Vec::len)
    }
}

impl DocumentStore for MemoryStore {
    async fn list(&self, path: &CollectionPath) -> Result<Vec<StoredDocument>, StoreError> {
        let state = self.state.read().await;
        state.check_online()?;
        Ok(state.collections.get(path).cloned().unwrap_or_default())
    }

    async fn get(
        &self,
        path: &CollectionPath,
        id: &DocumentId,
    ) -> Result<Option<StoredDocument>, StoreError> {
        let state = self.state.read().await;
        state.check_online()?;
        Ok(state
            .collections
            .get(path)
            .and_then(|docs| docs.iter().find(|doc| &doc.id == id))
            .cloned())
    }

    async fn add(&self, path: &CollectionPath, fields: Fields) -> Result<DocumentId, StoreError> {
        let mut state = self.state.write().await;
        state.check_online()?;
        let id = DocumentId::generate();
        state
            .collections
            .entry(path.clone())
            .or_default()
            .push(StoredDocument {
                id: id.clone(),
                fields,
            });
        Ok(id)
    }

    async fn set(
        &self,
        path: &CollectionPath,
        id: &DocumentId,
        fields: Fields,
    ) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        state.check_writable(id)?;
        let docs = state.collections.entry(path.clone()).or_default();
        match docs.iter_mut().find(|doc| &doc.id == id) {
            Some(doc) => doc.fields = fields,
            None => docs.push(StoredDocument {
                id: id.clone(),
                fields,
            }),
        }
        Ok(())
    }

    async fn update(
        &self,
        path: &CollectionPath,
        id: &DocumentId,
        fields: Fields,
    ) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        state.check_writable(id)?;
        let doc = state
            .collections
            .get_mut(path)
            .and_then(|docs| docs.iter_mut().find(|doc| &doc.id == id))
            .ok_or(StoreError::NotFound)?;
        merge_fields(&mut doc.fields, fields);
        Ok(())
    }

    async fn delete(&self, path: &CollectionPath, id: &DocumentId) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        state.check_writable(id)?;
        if let Some(docs) = state.collections.get_mut(path) {
            docs.retain(|doc| &doc.id != id);
        }
        Ok(())
    }
}
