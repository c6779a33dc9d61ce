//! Unified error handling for the back office.
//!
//! Every failure reaching a view-model caller is an [`AdminError`]. Nothing
//! is retried: a [`AdminError::Remote`] is terminal for the action that
//! produced it and the operator decides whether to try again.

use thiserror::Error;

use shopdesk_core::{DocumentId, PathError};

use crate::db::StoreError;
use crate::export::ExportError;
use crate::services::blob::BlobError;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AdminError {
    /// A tenant-scoped call was made without a signed-in principal.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// A mutation or lookup targeted an identifier that does not exist.
    #[error("Not found: {collection}/{id}")]
    NotFound {
        collection: String,
        id: DocumentId,
    },

    /// Required fields are missing from a draft, or a patch carries values
    /// that do not fit the entity.
    #[error("Invalid or missing fields: {}", .missing.join(", "))]
    Validation { missing: Vec<String> },

    /// The operation does not apply to this kind of record.
    #[error("Cannot {operation} {collection}")]
    Unsupported {
        operation: &'static str,
        collection: &'static str,
    },

    /// An identifier or collection name could not form a storage path.
    #[error("Invalid path: {0}")]
    InvalidPath(#[from] PathError),

    /// The document store, blob store or export backend failed.
    #[error("Remote failure: {0}")]
    Remote(#[from] RemoteError),
}

/// Opaque cause of an [`AdminError::Remote`].
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Blob(#[from] BlobError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

impl From<StoreError> for AdminError {
    fn from(err: StoreError) -> Self {
        Self::Remote(err.into())
    }
}

impl From<BlobError> for AdminError {
    fn from(err: BlobError) -> Self {
        Self::Remote(err.into())
    }
}

impl From<ExportError> for AdminError {
    fn from(err: ExportError) -> Self {
        Self::Remote(err.into())
    }
}

impl AdminError {
    /// Whether this error came from a backend rather than from the caller.
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }

    /// Log the error, capturing backend failures with Sentry.
    ///
    /// Caller mistakes (validation, missing records, no principal,
    /// unsupported operations) are only logged at `warn`.
    pub fn report(&self) {
        if self.is_remote() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Back office action failed"
            );
        } else {
            tracing::warn!(error = %self, "Back office action rejected");
        }
    }
}

/// Set the Sentry user context from the signed-in principal.
pub fn set_sentry_user(principal: &shopdesk_core::Principal) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(principal.id.to_string()),
            email: Some(principal.email.to_string()),
            ..Default::default()
        }));
    });
}
