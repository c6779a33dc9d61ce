//! Data table building blocks.
//!
//! These types describe how an entity is shown as a table (columns),
//! narrowed (filters), ordered (sort) and sliced (pages). They are pure
//! and shared by every list view-model and by the export adapter.

use std::cmp::Ordering;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Column definition for a data table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableColumn {
    /// Field key used to look up the cell value.
    pub key: &'static str,
    /// Display label for the column header.
    pub label: &'static str,
}

impl TableColumn {
    /// Create a new column.
    #[must_use]
    pub const fn new(key: &'static str, label: &'static str) -> Self {
        Self { key, label }
    }
}

/// Anything that can be rendered as a table row.
pub trait Cells {
    /// String value of the cell under `key`, or `None` when empty.
    fn cell(&self, key: &str) -> Option<String>;
}

impl<T: Cells + ?Sized> Cells for &T {
    fn cell(&self, key: &str) -> Option<String> {
        (**self).cell(key)
    }
}

/// Predicates applied to a working set.
///
/// All predicates are AND-combined: a row must contain the search text in
/// at least one searchable field AND match every equality filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSet {
    /// Case-insensitive substring searched across the searchable fields.
    pub search: Option<String>,
    /// Field key / expected value pairs (status, category, enabled...).
    pub equals: Vec<(String, String)>,
}

impl FilterSet {
    /// An empty filter set; every row matches.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the free-text search.
    #[must_use]
    pub fn search(mut self, text: &str) -> Self {
        self.search = Some(text.to_string());
        self
    }

    /// Add an equality predicate.
    #[must_use]
    pub fn equals(mut self, key: &str, value: &str) -> Self {
        self.equals.push((key.to_string(), value.to_string()));
        self
    }

    /// Whether no predicate is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.search_needle().is_none() && self.equals.is_empty()
    }

    fn search_needle(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }

    /// Whether `row` satisfies every predicate.
    pub fn matches<R: Cells + ?Sized>(&self, row: &R, search_fields: &[&str]) -> bool {
        if let Some(needle) = self.search_needle() {
            let found = search_fields.iter().any(|key| {
                row.cell(key)
                    .is_some_and(|value| value.to_lowercase().contains(&needle))
            });
            if !found {
                return false;
            }
        }

        self.equals
            .iter()
            .all(|(key, expected)| row.cell(key).as_deref() == Some(expected.as_str()))
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// Column to sort on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub key: String,
    pub direction: SortDirection,
}

impl SortSpec {
    #[must_use]
    pub fn ascending(key: &str) -> Self {
        Self {
            key: key.to_string(),
            direction: SortDirection::Ascending,
        }
    }

    #[must_use]
    pub fn descending(key: &str) -> Self {
        Self {
            key: key.to_string(),
            direction: SortDirection::Descending,
        }
    }

    /// Compare two rows on this column.
    ///
    /// Values that both parse as decimals compare numerically, others
    /// case-insensitively; empty cells sort first.
    pub fn compare<R: Cells + ?Sized>(&self, a: &R, b: &R) -> Ordering {
        let ordering = compare_cells(a.cell(&self.key), b.cell(&self.key));
        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

fn compare_cells(a: Option<String>, b: Option<String>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => match (a.parse::<Decimal>(), b.parse::<Decimal>()) {
            (Ok(x), Ok(y)) => x.cmp(&y),
            _ => a.to_lowercase().cmp(&b.to_lowercase()),
        },
    }
}

/// One page of a list view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Rows on this page.
    pub items: Vec<T>,
    /// 1-based page number actually returned (after clamping).
    pub page: usize,
    /// Page size actually used (at least 1).
    pub page_size: usize,
    /// Rows across all pages.
    pub total_items: usize,
    /// Number of pages (at least 1, even when empty).
    pub total_pages: usize,
}

impl<T> Page<T> {
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.page > 1
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Slice `rows` into 1-based pages.
///
/// Never fails: a page size of zero is treated as one, page zero as the
/// first page and pages past the end as the last page.
#[must_use]
pub fn paginate<T: Clone>(rows: &[T], page_size: usize, page: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total_items = rows.len();
    let total_pages = total_items.div_ceil(page_size).max(1);
    let page = page.clamp(1, total_pages);

    let items = rows
        .iter()
        .skip((page - 1) * page_size)
        .take(page_size)
        .cloned()
        .collect();

    Page {
        items,
        page,
        page_size,
        total_items,
        total_pages,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    struct Row(HashMap<&'static str, &'static str>);

    impl Cells for Row {
        fn cell(&self, key: &str) -> Option<String> {
            self.0.get(key).map(ToString::to_string)
        }
    }

    fn row(pairs: &[(&'static str, &'static str)]) -> Row {
        Row(pairs.iter().copied().collect())
    }

    #[test]
    fn search_is_case_insensitive_and_scoped_to_fields() {
        let r = row(&[("name", "Acme Supplies"), ("email", "sales@acme.io")]);
        assert!(FilterSet::new().search("ACME").matches(&r, &["name"]));
        assert!(FilterSet::new().search("sales@").matches(&r, &["name", "email"]));
        assert!(!FilterSet::new().search("sales@").matches(&r, &["name"]));
        assert!(FilterSet::new().search("   ").matches(&r, &["name"]));
    }

    #[test]
    fn predicates_are_and_combined() {
        let r = row(&[("name", "Lamp"), ("category", "Home"), ("availability", "in_stock")]);
        let filters = FilterSet::new()
            .search("lam")
            .equals("category", "Home")
            .equals("availability", "in_stock");
        assert!(filters.matches(&r, &["name"]));
        assert!(!filters.clone().equals("category", "Garden").matches(&r, &["name"]));
        assert!(!FilterSet::new().equals("missing", "x").matches(&r, &["name"]));
    }

    #[test]
    fn sort_is_numeric_aware() {
        let a = row(&[("price", "9.50")]);
        let b = row(&[("price", "10")]);
        let empty = row(&[]);
        let spec = SortSpec::ascending("price");
        assert_eq!(spec.compare(&a, &b), Ordering::Less);
        assert_eq!(spec.compare(&empty, &a), Ordering::Less);
        assert_eq!(SortSpec::descending("price").compare(&a, &b), Ordering::Greater);
    }

    #[test]
    fn paginate_clamps() {
        let rows: Vec<u32> = (1..=7).collect();

        let first = paginate(&rows, 3, 1);
        assert_eq!(first.items, vec![1, 2, 3]);
        assert_eq!(first.total_pages, 3);
        assert!(first.has_next());
        assert!(!first.has_previous());

        assert_eq!(paginate(&rows, 3, 0).page, 1);
        let last = paginate(&rows, 3, 99);
        assert_eq!(last.page, 3);
        assert_eq!(last.items, vec![7]);

        let single = paginate(&rows, 0, 2);
        assert_eq!(single.page_size, 1);
        assert_eq!(single.items, vec![2]);

        let empty = paginate::<u32>(&[], 10, 5);
        assert_eq!(empty.page, 1);
        assert_eq!(empty.total_pages, 1);
        assert!(empty.items.is_empty());
    }

    #[test]
    fn pages_concatenate_to_input() {
        let rows: Vec<u32> = (0..23).collect();
        for size in 1..=25 {
            let first = paginate(&rows, size, 1);
            let mut all = Vec::new();
            for page in 1..=first.total_pages {
                let p = paginate(&rows, size, page);
                assert!(p.items.len() <= size);
                all.extend(p.items);
            }
            assert_eq!(all, rows);
        }
    }
}
