//! Blob storage for product images.
//!
//! Blobs are written under `tenants/{key}/images/{uuid}.{ext}`; the returned
//! [`BlobRef`] is that key and is what product records store.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::RwLock;

use shopdesk_core::{BlobRef, TenantKey};

/// Errors from a blob backend.
#[derive(Debug, Error)]
pub enum BlobError {
    #[error("blob I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("blob not found: {0}")]
    NotFound(BlobRef),

    #[error("invalid blob reference: {0}")]
    InvalidReference(String),

    #[error("blob storage unavailable: {0}")]
    Unavailable(String),
}

/// An uploaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub bytes: Vec<u8>,
    pub content_type: String,
    /// Original file name; only its extension is kept.
    pub file_name: String,
}

impl Blob {
    #[must_use]
    pub fn new(bytes: Vec<u8>, content_type: &str, file_name: &str) -> Self {
        Self {
            bytes,
            content_type: content_type.to_string(),
            file_name: file_name.to_string(),
        }
    }

    /// Lowercase alphanumeric extension of the file name, `bin` otherwise.
    #[must_use]
    pub fn extension(&self) -> String {
        Path::new(&self.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .map_or_else(|| "bin".to_string(), str::to_ascii_lowercase)
    }
}

/// Storage key for a new blob of `tenant`.
fn new_key(tenant: &TenantKey, blob: &Blob) -> BlobRef {
    BlobRef::new(format!(
        "tenants/{tenant}/images/{}.{}",
        uuid::Uuid::new_v4().simple(),
        blob.extension()
    ))
}

/// Blob storage backend.
pub trait BlobStore: Clone + Send + Sync + 'static {
    /// Store `blob` for `tenant` and return its reference.
    fn upload(
        &self,
        tenant: &TenantKey,
        blob: Blob,
    ) -> impl Future<Output = Result<BlobRef, BlobError>> + Send;

    /// Read back the bytes of a stored blob.
    fn fetch(
        &self,
        reference: &BlobRef,
    ) -> impl Future<Output = Result<Vec<u8>, BlobError>> + Send;
}

#[derive(Debug, Default)]
struct MemoryBlobs {
    blobs: HashMap<BlobRef, Blob>,
    offline: bool,
}

/// Process-local [`BlobStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    inner: Arc<RwLock<MemoryBlobs>>,
}

impl MemoryBlobStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make uploads fail with [`BlobError::Unavailable`].
    pub async fn set_offline(&self, offline: bool) {
        self.inner.write().await.offline = offline;
    }

    /// Number of stored blobs.
    pub async fn len(&self) -> usize {
        self.inner.read().await.blobs.len()
    }
}

impl BlobStore for MemoryBlobStore {
    async fn upload(&self, tenant: &TenantKey, blob: Blob) -> Result<BlobRef, BlobError> {
        let mut inner = self.inner.write().await;
        if inner.offline {
            return Err(BlobError::Unavailable("blob store is offline".into()));
        }
        let key = new_key(tenant, &blob);
        inner.blobs.insert(key.clone(), blob);
        Ok(key)
    }

    async fn fetch(&self, reference: &BlobRef) -> Result<Vec<u8>, BlobError> {
        self.inner
            .read()
            .await
            .blobs
            .get(reference)
            .map(|blob| blob.bytes.clone())
            .ok_or_else(|| BlobError::NotFound(reference.clone()))
    }
}

/// [`BlobStore`] writing files below a root directory.
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Filesystem location of a reference, refusing anything that would
    /// escape the root.
    fn resolve(&self, reference: &BlobRef) -> Result<PathBuf, BlobError> {
        let relative = Path::new(reference.as_str());
        let safe = !reference.is_empty()
            && relative
                .components()
                .all(|component| matches!(component, Component::Normal(_)));
        if !safe {
            return Err(BlobError::InvalidReference(reference.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

impl BlobStore for FsBlobStore {
    async fn upload(&self, tenant: &TenantKey, blob: Blob) -> Result<BlobRef, BlobError> {
        let key = new_key(tenant, &blob);
        let path = self.resolve(&key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, &blob.bytes).await?;
        tracing::debug!(blob = %key, bytes = blob.bytes.len(), "Wrote blob");
        Ok(key)
    }

    async fn fetch(&self, reference: &BlobRef) -> Result<Vec<u8>, BlobError> {
        let path = self.resolve(reference)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(BlobError::NotFound(reference.clone()))
            }
            Err(e) => Err(e.into()),
        }
    }
}
