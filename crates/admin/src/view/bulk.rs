//! Bulk selection and batch operations over a list view.

use std::collections::BTreeSet;

use tracing::instrument;

use shopdesk_core::DocumentId;

use super::list::ListViewModel;
use crate::db::DocumentStore;
use crate::error::AdminError;
use crate::models::{Entity, Patch};

/// Operation applied to every selected record.
#[derive(Debug, Clone, PartialEq)]
pub enum BulkOperation {
    Delete,
    /// Set the `enabled` flag.
    SetEnabled(bool),
    /// Merge arbitrary top-level fields.
    Patch(Patch),
}

impl BulkOperation {
    /// Verb used in logs and error messages.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Delete => "delete",
            Self::SetEnabled(true) => "enable",
            Self::SetEnabled(false) => "disable",
            Self::Patch(_) => "patch",
        }
    }

    /// Whether the operation makes sense for records of `T`.
    #[must_use]
    pub const fn applies_to<T: Entity>(&self) -> bool {
        match self {
            Self::SetEnabled(_) => T::TOGGLEABLE,
            Self::Delete | Self::Patch(_) => true,
        }
    }
}

/// A record the operation failed on.
#[derive(Debug)]
pub struct BulkFailure {
    pub id: DocumentId,
    pub error: AdminError,
}

/// Outcome of [`BulkSelection::apply`].
#[derive(Debug, Default)]
pub struct BulkReport {
    pub succeeded: Vec<DocumentId>,
    pub failed: Vec<BulkFailure>,
}

impl BulkReport {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// `"{id}: {error}"` for every failure.
    #[must_use]
    pub fn error_messages(&self) -> Vec<String> {
        self.failed
            .iter()
            .map(|f| format!("{}: {}", f.id, f.error))
            .collect()
    }
}

/// Identifiers selected in a list view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkSelection {
    selected: BTreeSet<DocumentId>,
}

impl BulkSelection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the selection of `id`; returns whether it is now selected.
    pub fn toggle(&mut self, id: &DocumentId) -> bool {
        if self.selected.remove(id) {
            false
        } else {
            self.selected.insert(id.clone());
            true
        }
    }

    /// Select every currently visible (filtered) record.
    pub fn select_all<S: DocumentStore, T: Entity>(&mut self, list: &ListViewModel<S, T>) {
        self.selected
            .extend(list.visible().into_iter().map(|record| record.id.clone()));
    }

    /// Deselect every currently visible (filtered) record. Selected rows
    /// hidden by the filter stay selected.
    pub fn clear<S: DocumentStore, T: Entity>(&mut self, list: &ListViewModel<S, T>) {
        for record in list.visible() {
            self.selected.remove(&record.id);
        }
    }

    #[must_use]
    pub fn is_selected(&self, id: &DocumentId) -> bool {
        self.selected.contains(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &DocumentId> {
        self.selected.iter()
    }

    /// Run `operation` on each selected record, one after the other.
    ///
    /// A failure does not stop the batch. Successful mutations are
    /// reconciled into `list`. An operation that does not apply to `T` fails
    /// for every record without writing. The selection is cleared afterwards
    /// whatever the outcome.
    #[instrument(skip(self, list, operation), fields(collection = T::COLLECTION, operation = operation.name(), selected = self.selected.len()))]
    pub async fn apply<S: DocumentStore, T: Entity>(
        &mut self,
        list: &mut ListViewModel<S, T>,
        operation: &BulkOperation,
    ) -> BulkReport {
        let mut report = BulkReport::default();
        let supported = operation.applies_to::<T>();

        for id in std::mem::take(&mut self.selected) {
            if !supported {
                let error = AdminError::Unsupported {
                    operation: operation.name(),
                    collection: T::COLLECTION,
                };
                report.failed.push(BulkFailure { id, error });
                continue;
            }
            let result = match operation {
                BulkOperation::Delete => list.delete(&id).await,
                BulkOperation::SetEnabled(enabled) => list.update(&id, Patch::enabled(*enabled)).await,
                BulkOperation::Patch(patch) => list.update(&id, patch.clone()).await,
            };
            match result {
                Ok(()) => report.succeeded.push(id),
                Err(error) => report.failed.push(BulkFailure { id, error }),
            }
        }

        if report.is_success() {
            tracing::info!(count = report.succeeded.len(), "Bulk operation completed");
        } else {
            tracing::warn!(
                success = report.succeeded.len(),
                errors = ?report.error_messages(),
                "Bulk operation completed with errors"
            );
        }
        report
    }
}
