//! Product image upload.

use tracing::instrument;

use shopdesk_core::{BlobRef, DocumentId, Principal};

use super::blob::{Blob, BlobStore};
use crate::accessor::CollectionAccessor;
use crate::db::DocumentStore;
use crate::error::AdminError;
use crate::models::{Patch, Product};

/// Uploads product images and links them to the product record.
#[derive(Debug, Clone)]
pub struct ProductImages<S, B> {
    products: CollectionAccessor<S, Product>,
    blobs: B,
}

impl<S: DocumentStore, B: BlobStore> ProductImages<S, B> {
    #[must_use]
    pub const fn new(store: S, blobs: B) -> Self {
        Self {
            products: CollectionAccessor::new(store),
            blobs,
        }
    }

    /// Upload `blob` and point the product's `image` at it.
    ///
    /// The product must exist before anything is uploaded. A previous image
    /// is left in blob storage.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::NotFound`] for an unknown product and
    /// [`AdminError::Remote`] if the upload or the update fails.
    #[instrument(skip(self, principal, blob), fields(bytes = blob.bytes.len()))]
    pub async fn attach(
        &self,
        principal: Option<&Principal>,
        product_id: &DocumentId,
        blob: Blob,
    ) -> Result<BlobRef, AdminError> {
        let owner = principal.ok_or(AdminError::NotAuthenticated)?;
        self.products.get(principal, product_id).await?;

        let reference = self.blobs.upload(&owner.tenant_key(), blob).await?;
        self.products
            .update(
                principal,
                product_id,
                Patch::new().set("image", reference.as_str()),
            )
            .await?;
        tracing::info!(product = %product_id, image = %reference, "Attached product image");
        Ok(reference)
    }
}
