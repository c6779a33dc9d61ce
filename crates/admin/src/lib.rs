//! Shopdesk back office library.
//!
//! Tenant-scoped data access for an e-commerce back office: every entity
//! (products, customers, categories, coupons, vendors, orders, payment and
//! shipping settings) goes through the same pattern.
//!
//! - [`accessor::CollectionAccessor`] resolves the principal's storage path
//!   and exposes list/get/create/update/remove.
//! - [`view::ListViewModel`] holds the loaded working set and derives
//!   filtered, sorted and paginated views of it.
//! - [`view::FormViewModel`] validates a draft and submits it.
//! - [`view::BulkSelection`] applies one operation to many records.
//! - [`export`] renders a view as delimited text or `.xlsx`.
//!
//! ```
//! use shopdesk_admin::AdminError;
//! use shopdesk_admin::accessor::CollectionAccessor;
//! use shopdesk_admin::db::MemoryStore;
//! use shopdesk_admin::models::Category;
//! use shopdesk_admin::view::{FormViewModel, ListViewModel};
//! use shopdesk_core::Principal;
//!
//! # async fn demo(owner: Principal) -> Result<(), AdminError> {
//! let mut list = ListViewModel::<_, Category>::new(
//!     CollectionAccessor::new(MemoryStore::new()),
//!     Some(owner),
//! );
//! FormViewModel::create(Category::new("Electronics"))
//!     .submit(&mut list)
//!     .await?;
//! assert_eq!(list.load().await?, 1);
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod accessor;
pub mod components;
pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod models;
pub mod reports;
pub mod seed;
pub mod services;
pub mod view;

pub use error::AdminError;
