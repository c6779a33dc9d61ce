//! Core types for Shopdesk.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod money;
pub mod path;
pub mod status;
pub mod tenant;

pub use email::{Email, EmailError};
pub use id::*;
pub use money::{Percentage, PercentageError};
pub use path::{CollectionPath, PathError};
pub use status::*;
pub use tenant::{Principal, TenantKey};
