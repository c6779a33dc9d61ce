//! Reusable list components.

pub mod data_table;

pub use data_table::{Cells, FilterSet, Page, SortDirection, SortSpec, TableColumn, paginate};
