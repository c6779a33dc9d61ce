//! Document-store collection paths.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::id::DocumentId;
use super::tenant::TenantKey;

/// Root collection holding one document per tenant.
pub const TENANTS_ROOT: &str = "tenants";

/// Errors produced when building a [`CollectionPath`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// A segment was empty.
    #[error("path segment cannot be empty")]
    EmptySegment,
    /// A segment contained a separator or a relative component.
    #[error("invalid path segment: {0}")]
    InvalidSegment(String),
}

/// Slash-separated address of a collection in the document store.
///
/// Collection paths alternate collection and document segments and always
/// end on a collection, e.g. `tenants/{key}/products` or
/// `tenants/{key}/users/{customer}/orders`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollectionPath(String);

impl CollectionPath {
    /// The `collection` subtree of a tenant.
    ///
    /// # Errors
    ///
    /// Returns [`PathError`] if `collection` is not a valid segment.
    pub fn for_tenant(tenant: &TenantKey, collection: &str) -> Result<Self, PathError> {
        validate_segment(collection)?;
        Ok(Self(format!("{TENANTS_ROOT}/{tenant}/{collection}")))
    }

    /// A sub-collection nested under one document of this collection.
    ///
    /// # Errors
    ///
    /// Returns [`PathError`] if the document id or `collection` is not a
    /// valid segment.
    pub fn nested(&self, document: &DocumentId, collection: &str) -> Result<Self, PathError> {
        validate_segment(document.as_str())?;
        validate_segment(collection)?;
        Ok(Self(format!("{}/{document}/{collection}", self.0)))
    }

    /// Borrow the full path.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The last segment: the collection name.
    #[must_use]
    pub fn collection_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }
}

fn validate_segment(segment: &str) -> Result<(), PathError> {
    if segment.is_empty() {
        return Err(PathError::EmptySegment);
    }
    if segment.contains('/') || segment == "." || segment == ".." {
        return Err(PathError::InvalidSegment(segment.to_owned()));
    }
    Ok(())
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
