//! Shopdesk Core - Shared types library.
//!
//! This crate provides common types used across all Shopdesk components:
//! - `admin` - Tenant-scoped data access, view-models and export
//! - `cli` - Command-line tools for migrations, seeding and exports
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for identifiers, emails, tenant keys,
//!   storage paths, percentages and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
