//! Collaborators and cross-collection operations.
//!
//! # Services
//!
//! - `blob` - Image blob storage (memory, filesystem)
//! - `download` - Saving rendered exports
//! - `identity` - Identity provider seam
//! - `media` - Product image upload
//! - `orders` - Orders nested under customers

pub mod blob;
pub mod download;
pub mod identity;
pub mod media;
pub mod orders;

pub use blob::{Blob, BlobError, BlobStore, FsBlobStore, MemoryBlobStore};
pub use download::{DirectorySink, FileSink};
pub use identity::{IdentityError, IdentityProvider, InMemoryIdentity, StaticIdentity};
pub use media::ProductImages;
pub use orders::CustomerOrders;
