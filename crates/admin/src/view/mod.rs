//! View-models over tenant collections.
//!
//! - [`ListViewModel`] - working set, filter, sort, paginate, export
//! - [`FormViewModel`] - draft validation and submit
//! - [`BulkSelection`] - selection and batch operations

pub mod bulk;
pub mod form;
pub mod list;

pub use bulk::{BulkFailure, BulkOperation, BulkReport, BulkSelection};
pub use form::FormViewModel;
pub use list::ListViewModel;
