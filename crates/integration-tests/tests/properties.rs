//! Properties of filtering, pagination, validation, removal and export.

#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;

use shopdesk_admin::AdminError;
use shopdesk_admin::components::FilterSet;
use shopdesk_admin::export::ExportFormat;
use shopdesk_admin::models::{Entity, Product, Vendor};
use shopdesk_admin::view::FormViewModel;
use shopdesk_core::Availability;
use shopdesk_integration_tests::{list_view, memory_store, owner};

fn product(index: u32) -> Product {
    let availability = match index % 3 {
        0 => Availability::InStock,
        1 => Availability::OutOfStock,
        _ => Availability::PreOrder,
    };
    Product {
        name: format!("Item {index:02}"),
        price: Decimal::new(i64::from(index) * 100 + 99, 2),
        stock: index,
        category: if index % 2 == 0 { "Home" } else { "Garden" }.to_string(),
        availability,
        ..Product::default()
    }
}

#[tokio::test]
async fn test_filter_is_a_subset_satisfying_every_predicate() {
    let store = memory_store();
    let mut list = list_view::<_, Product>(&store, Some(&owner()));
    for index in 0..30 {
        list.create(product(index)).await.unwrap();
    }

    let filter_sets = [
        FilterSet::new(),
        FilterSet::new().search("item 1"),
        FilterSet::new().equals("category", "Home"),
        FilterSet::new()
            .search("ITEM")
            .equals("category", "Garden")
            .equals("availability", "pre_order"),
        FilterSet::new().search("no such thing"),
    ];

    for filters in &filter_sets {
        let rows = list.filter(filters);
        for row in &rows {
            assert!(list.records().contains(*row));
            assert!(filters.matches(*row, Product::SEARCH_FIELDS));
        }
        // Everything left out really fails some predicate
        let kept = rows.len();
        let rejected = list
            .records()
            .iter()
            .filter(|r| !filters.matches(*r, Product::SEARCH_FIELDS))
            .count();
        assert_eq!(kept + rejected, list.records().len());
    }

    let garden_pre_orders = list.filter(filter_sets.get(3).unwrap());
    assert!(!garden_pre_orders.is_empty());
    assert!(garden_pre_orders.iter().all(|r| {
        r.data.category == "Garden" && r.data.availability == Availability::PreOrder
    }));
}

#[tokio::test]
async fn test_pages_partition_the_filtered_view() {
    let store = memory_store();
    let mut list = list_view::<_, Product>(&store, Some(&owner()));
    for index in 0..23 {
        list.create(product(index)).await.unwrap();
    }
    list.set_filter(FilterSet::new().equals("category", "Home"));
    let visible: Vec<_> = list.visible().into_iter().map(|r| r.id.clone()).collect();
    assert_eq!(visible.len(), 12);

    for page_size in [0, 1, 5, 12, 50] {
        let first = list.paginate(page_size, 1);
        let mut seen = Vec::new();
        for page in 1..=first.total_pages {
            let p = list.paginate(page_size, page);
            assert!(p.items.len() <= page_size.max(1));
            seen.extend(p.items.into_iter().map(|r| r.id.clone()));
        }
        assert_eq!(seen, visible, "page size {page_size}");
    }

    // Out-of-range pages clamp instead of failing
    assert_eq!(list.paginate(5, 0).page, 1);
    assert_eq!(list.paginate(5, 99).page, 3);
}

#[tokio::test]
async fn test_validation_never_reaches_the_store() {
    let store = memory_store();
    let mut list = list_view::<_, Product>(&store, Some(&owner()));
    // An offline store would turn any call into a remote failure
    store.set_offline(true).await;

    let draft = FormViewModel::create(Product {
        price: Decimal::new(500, 2),
        ..Product::default()
    });
    let err = draft.submit(&mut list).await.unwrap_err();
    match err {
        AdminError::Validation { missing } => assert_eq!(missing, vec!["name", "category"]),
        other => panic!("expected validation error, got {other}"),
    }

    store.set_offline(false).await;
    assert_eq!(list.load().await.unwrap(), 0);
}

#[tokio::test]
async fn test_removed_record_never_listed() {
    let store = memory_store();
    let owner = owner();
    let mut list = list_view::<_, Vendor>(&store, Some(&owner));
    let keep = list.create(Vendor::new("Acme", "a@acme.io")).await.unwrap();
    let gone = list.create(Vendor::new("Globex", "g@globex.io")).await.unwrap();

    list.accessor().remove(Some(&owner), &gone).await.unwrap();
    // Removing again is not an error
    list.accessor().remove(Some(&owner), &gone).await.unwrap();

    let records = list.accessor().list(Some(&owner)).await.unwrap();
    assert!(records.iter().all(|r| r.id != gone));
    assert!(records.iter().any(|r| r.id == keep));
}

#[tokio::test]
async fn test_delimited_export_round_trips() {
    let store = memory_store();
    let mut list = list_view::<_, Vendor>(&store, Some(&owner()));
    let vendors = [
        Vendor {
            name: "Acme Supplies".into(),
            email: "sales@acme.io".into(),
            phone: "555-0100".into(),
            address: "1 Main St".into(),
        },
        Vendor::new("Globex", "hello@globex.io"),
    ];
    for vendor in &vendors {
        list.create(vendor.clone()).await.unwrap();
    }

    for delimiter in [',', ';', '\t', '|'] {
        let file = list.export(ExportFormat::Delimited(delimiter)).unwrap();
        let text = String::from_utf8(file.bytes).unwrap();
        let mut lines = text.lines();

        let header: Vec<&str> = lines.next().unwrap().split(delimiter).collect();
        let labels: Vec<&str> = Vendor::COLUMNS.iter().map(|c| c.label).collect();
        assert_eq!(header, labels);

        for (line, vendor) in lines.zip(&vendors) {
            let cells: Vec<&str> = line.split(delimiter).collect();
            let expected: Vec<String> = Vendor::COLUMNS
                .iter()
                .map(|c| vendor.field(c.key).unwrap_or_default())
                .collect();
            assert_eq!(cells, expected);
        }
    }
}
