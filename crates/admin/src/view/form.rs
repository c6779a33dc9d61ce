//! Form view-model: a draft record that is validated and submitted.

use chrono::Utc;
use tracing::instrument;

use shopdesk_core::DocumentId;

use super::list::ListViewModel;
use crate::db::DocumentStore;
use crate::error::AdminError;
use crate::models::{Entity, Patch, Record};

/// A draft being created (`id` is `None`) or edited.
#[derive(Debug, Clone, PartialEq)]
pub struct FormViewModel<T> {
    pub id: Option<DocumentId>,
    pub data: T,
}

impl<T: Entity> FormViewModel<T> {
    /// Draft for a new record.
    #[must_use]
    pub const fn create(data: T) -> Self {
        Self { id: None, data }
    }

    /// Draft editing an existing record.
    #[must_use]
    pub fn edit(record: &Record<T>) -> Self {
        Self {
            id: Some(record.id.clone()),
            data: record.data.clone(),
        }
    }

    #[must_use]
    pub const fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// Check the entity's required fields.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Validation`] listing every missing field.
    pub fn validate(&self) -> Result<(), AdminError> {
        let missing = self.data.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(AdminError::Validation { missing })
        }
    }

    /// Validate, then create or update, then reconcile `list`.
    ///
    /// The draft itself is never modified, so after a failure it can be
    /// corrected and submitted again. Submitting a new draft twice creates
    /// two records.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Validation`] without contacting the store, or
    /// the accessor's error.
    #[instrument(skip(self, list), fields(collection = T::COLLECTION, id = ?self.id))]
    pub async fn submit<S: DocumentStore>(
        &self,
        list: &mut ListViewModel<S, T>,
    ) -> Result<DocumentId, AdminError> {
        self.validate()?;

        let mut data = self.data.clone();
        data.before_save(Utc::now(), self.is_new());

        match &self.id {
            None => list.create(data).await,
            Some(id) => {
                let patch = Patch::from_entity(&data)?;
                list.accessor()
                    .update(list.principal(), id, patch)
                    .await?;
                list.upsert(Record {
                    id: id.clone(),
                    data,
                });
                Ok(id.clone())
            }
        }
    }
}
