//! List view-model: a loaded working set plus derived projections.

use tracing::instrument;

use shopdesk_core::{DocumentId, Principal};

use crate::accessor::CollectionAccessor;
use crate::components::{FilterSet, Page, SortSpec, paginate};
use crate::db::DocumentStore;
use crate::error::AdminError;
use crate::export::{ExportFile, ExportFormat, export_rows};
use crate::models::{Entity, Patch, Record};

/// Working set of one collection for one principal.
///
/// The set is fetched once by [`Self::load`] and afterwards only changes
/// through the local reconciliation helpers or the mutations made through
/// this view-model; there is no live synchronization with the store.
#[derive(Debug, Clone)]
pub struct ListViewModel<S, T> {
    accessor: CollectionAccessor<S, T>,
    principal: Option<Principal>,
    records: Vec<Record<T>>,
    filters: FilterSet,
    sort: Option<SortSpec>,
}

impl<S: DocumentStore, T: Entity> ListViewModel<S, T> {
    #[must_use]
    pub fn new(accessor: CollectionAccessor<S, T>, principal: Option<Principal>) -> Self {
        Self {
            accessor,
            principal,
            records: Vec::new(),
            filters: FilterSet::default(),
            sort: None,
        }
    }

    #[must_use]
    pub const fn accessor(&self) -> &CollectionAccessor<S, T> {
        &self.accessor
    }

    #[must_use]
    pub const fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    /// Fetch the collection and replace the working set.
    ///
    /// On failure the previous working set is kept.
    ///
    /// # Errors
    ///
    /// Propagates the accessor's error.
    #[instrument(skip(self), fields(collection = T::COLLECTION))]
    pub async fn load(&mut self) -> Result<usize, AdminError> {
        self.records = self.accessor.list(self.principal.as_ref()).await?;
        Ok(self.records.len())
    }

    /// The whole working set, in load order.
    #[must_use]
    pub fn records(&self) -> &[Record<T>] {
        &self.records
    }

    #[must_use]
    pub fn find(&self, id: &DocumentId) -> Option<&Record<T>> {
        self.records.iter().find(|r| &r.id == id)
    }

    /// Records of the working set satisfying every predicate of `filters`.
    #[must_use]
    pub fn filter(&self, filters: &FilterSet) -> Vec<&Record<T>> {
        self.records
            .iter()
            .filter(|record| filters.matches(*record, T::SEARCH_FIELDS))
            .collect()
    }

    /// Set the filters used by [`Self::visible`].
    pub fn set_filter(&mut self, filters: FilterSet) {
        self.filters = filters;
    }

    #[must_use]
    pub const fn filters(&self) -> &FilterSet {
        &self.filters
    }

    /// Set or clear the sort used by [`Self::visible`].
    pub fn set_sort(&mut self, sort: Option<SortSpec>) {
        self.sort = sort;
    }

    /// Filtered, then sorted, view of the working set. Ties keep load order.
    #[must_use]
    pub fn visible(&self) -> Vec<&Record<T>> {
        let mut rows = self.filter(&self.filters);
        if let Some(sort) = &self.sort {
            rows.sort_by(|a, b| sort.compare(*a, *b));
        }
        rows
    }

    /// One page of the visible rows. Never fails; see [`paginate`].
    #[must_use]
    pub fn paginate(&self, page_size: usize, page: usize) -> Page<&Record<T>> {
        paginate(&self.visible(), page_size, page)
    }

    /// Render the visible rows with the entity's export columns.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Remote`] if spreadsheet rendering fails.
    pub fn export(&self, format: ExportFormat) -> Result<ExportFile, AdminError> {
        Ok(export_rows(&self.visible(), T::COLUMNS, format, T::COLLECTION)?)
    }

    /// Insert `record`, or replace the record with the same id in place.
    pub fn upsert(&mut self, record: Record<T>) {
        match self.records.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => *existing = record,
            None => self.records.push(record),
        }
    }

    /// Drop a record from the working set. Returns whether it was present.
    pub fn remove_local(&mut self, id: &DocumentId) -> bool {
        let before = self.records.len();
        self.records.retain(|r| &r.id != id);
        self.records.len() != before
    }

    /// Merge `patch` into the local copy of a record, as the store would.
    /// Returns whether the record was present.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Remote`] if the patched record no longer
    /// matches the entity shape.
    pub fn patch_local(&mut self, id: &DocumentId, patch: &Patch) -> Result<bool, AdminError> {
        let Some(record) = self.records.iter_mut().find(|r| &r.id == id) else {
            return Ok(false);
        };
        record.data = patch.apply_to(&record.data)?;
        Ok(true)
    }

    /// Create a record remotely and add it to the working set.
    ///
    /// # Errors
    ///
    /// Propagates the accessor's error; the working set is then unchanged.
    pub async fn create(&mut self, data: T) -> Result<DocumentId, AdminError> {
        let id = self.accessor.create(self.principal.as_ref(), &data).await?;
        self.upsert(Record {
            id: id.clone(),
            data,
        });
        Ok(id)
    }

    /// Update a record remotely and patch the local copy.
    ///
    /// # Errors
    ///
    /// Propagates the accessor's error; the working set is then unchanged.
    pub async fn update(&mut self, id: &DocumentId, patch: Patch) -> Result<(), AdminError> {
        self.accessor
            .update(self.principal.as_ref(), id, patch.clone())
            .await?;
        self.patch_local(id, &patch)?;
        Ok(())
    }

    /// Delete a record remotely and drop it from the working set.
    ///
    /// # Errors
    ///
    /// Propagates the accessor's error; the working set is then unchanged.
    pub async fn delete(&mut self, id: &DocumentId) -> Result<(), AdminError> {
        self.accessor.remove(self.principal.as_ref(), id).await?;
        self.remove_local(id);
        Ok(())
    }
}
