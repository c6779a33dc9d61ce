//! Nested orders, seeding, reports, image upload and saved exports.

#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;

use shopdesk_admin::AdminError;
use shopdesk_admin::accessor::CollectionAccessor;
use shopdesk_admin::export::ExportFormat;
use shopdesk_admin::models::{Customer, Entity, LineItem, Order, Product};
use shopdesk_admin::reports::SalesReport;
use shopdesk_admin::seed::{SeedFile, seed};
use shopdesk_admin::services::{
    Blob, BlobStore, CustomerOrders, DirectorySink, FileSink, FsBlobStore, MemoryBlobStore,
    ProductImages,
};
use shopdesk_core::{BlobRef, OrderStatus};
use shopdesk_integration_tests::{list_view, memory_store, owner, principal};

const SEED: &str = r#"
categories:
  - name: Home
  - name: Kitchen
products:
  - name: Desk Lamp
    price: "25.00"
    category: Home
    stock: 4
  - name: Mug
    price: "8.50"
    category: Kitchen
    stock: 40
vendors:
  - name: Acme
    email: sales@acme.io
customers:
  - first_name: Ada
    last_name: Lovelace
    email: ada@example.com
    orders:
      - paid: true
        status: delivered
        items:
          - { name: Desk Lamp, price: "25.00", quantity: 1 }
          - { name: Mug, price: "8.50", quantity: 2 }
      - items:
          - { name: Mug, price: "8.50", quantity: 4 }
  - first_name: Grace
    email: grace@example.com
    orders:
      - paid: true
        status: shipped
        items:
          - { name: Desk Lamp, price: "25.00", quantity: 2 }
"#;

fn scratch_dir(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("shopdesk-{name}-{}", uuid::Uuid::new_v4()))
}

#[tokio::test]
async fn test_seed_then_report() {
    let store = memory_store();
    let owner = owner();
    let file = SeedFile::from_yaml(SEED).unwrap();

    let summary = seed(&store, Some(&owner), &file).await.unwrap();
    assert_eq!(summary.count("categories"), 2);
    assert_eq!(summary.count("products"), 2);
    assert_eq!(summary.count("users"), 2);
    assert_eq!(summary.count("orders"), 3);
    assert_eq!(summary.total(), 10);

    let orders = CustomerOrders::new(store.clone());
    let all = orders.all_orders(Some(&owner)).await.unwrap();
    assert_eq!(all.len(), 3);

    let report = SalesReport::from_orders(&all);
    assert_eq!(report.order_count, 3);
    assert_eq!(report.by_status.get(&OrderStatus::Pending), Some(&1));
    assert_eq!(report.by_status.get(&OrderStatus::Shipped), Some(&1));
    assert_eq!(report.by_status.get(&OrderStatus::Delivered), Some(&1));
    // 42.00 + 50.00 paid, 34.00 open
    assert_eq!(report.paid_revenue, Decimal::new(9200, 2));
    assert_eq!(report.outstanding, Decimal::new(3400, 2));
    assert_eq!(report.average_order_value, Some(Decimal::new(4200, 2)));
    let top: Vec<(&str, u64)> = report
        .top_items
        .iter()
        .map(|item| (item.name.as_str(), item.quantity))
        .collect();
    assert_eq!(top, vec![("Mug", 6), ("Desk Lamp", 3)]);

    let mut customers = list_view::<_, Customer>(&store, Some(&owner));
    customers.load().await.unwrap();
    let ada = customers
        .records()
        .iter()
        .find(|c| c.data.first_name == "Ada")
        .unwrap();
    assert_eq!(ada.data.order_count, 2);
    let ada_orders = orders.orders_of(&ada.id).list(Some(&owner)).await.unwrap();
    assert_eq!(ada_orders.len(), 2);
    assert!(ada_orders.iter().all(|o| o.data.customer_id == ada.id));
}

#[tokio::test]
async fn test_invalid_seed_writes_nothing() {
    let store = memory_store();
    let owner = owner();
    let file = SeedFile::from_yaml(
        "categories:\n  - name: Home\nvendors:\n  - name: Acme\n    email: \"\"\n",
    )
    .unwrap();

    let err = seed(&store, Some(&owner), &file).await.unwrap_err();
    match err {
        AdminError::Validation { missing } => assert_eq!(missing, vec!["vendors[0]: email"]),
        other => panic!("expected validation error, got {other}"),
    }
    let mut categories = list_view::<_, shopdesk_admin::models::Category>(&store, Some(&owner));
    assert_eq!(categories.load().await.unwrap(), 0);
}

#[tokio::test]
async fn test_orders_are_scoped_to_their_customer() {
    let store = memory_store();
    let owner = owner();
    let orders = CustomerOrders::new(store.clone());
    let customers = CollectionAccessor::<_, Customer>::new(store.clone());

    let ada = customers
        .create(
            Some(&owner),
            &Customer {
                first_name: "Ada".into(),
                email: "ada@example.com".into(),
                ..Customer::default()
            },
        )
        .await
        .unwrap();
    let grace = customers
        .create(
            Some(&owner),
            &Customer {
                first_name: "Grace".into(),
                email: "grace@example.com".into(),
                ..Customer::default()
            },
        )
        .await
        .unwrap();

    let order = Order::from_items(vec![LineItem::new("Mug", Decimal::new(850, 2), 3)]);
    assert_eq!(order.total, Decimal::new(2550, 2));
    orders.place_order(Some(&owner), &ada, order).await.unwrap();

    let path = orders.orders_of(&ada).path(Some(&owner)).unwrap();
    assert!(path.as_str().ends_with(&format!("/users/{ada}/{}", Order::COLLECTION)));
    assert_eq!(orders.orders_of(&ada).list(Some(&owner)).await.unwrap().len(), 1);
    assert!(orders.orders_of(&grace).list(Some(&owner)).await.unwrap().is_empty());

    // Unknown customer: nothing is created
    let ghost = shopdesk_core::DocumentId::new("ghost");
    let err = orders
        .place_order(Some(&owner), &ghost, Order::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AdminError::NotFound { .. }));
    assert!(orders.orders_of(&ghost).list(Some(&owner)).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_attach_image_to_product() {
    let store = memory_store();
    let owner = owner();
    let blobs = MemoryBlobStore::new();
    let mut products = list_view::<_, Product>(&store, Some(&owner));
    let id = products
        .create(Product {
            name: "Desk Lamp".into(),
            price: Decimal::new(2500, 2),
            category: "Home".into(),
            ..Product::default()
        })
        .await
        .unwrap();

    let images = ProductImages::new(store.clone(), blobs.clone());
    let reference = images
        .attach(Some(&owner), &id, Blob::new(vec![0x89, b'P', b'N', b'G'], "image/png", "lamp.PNG"))
        .await
        .unwrap();
    assert!(reference.as_str().starts_with("tenants/owner_40shop_2eio/images/"));
    assert!(reference.as_str().ends_with(".png"));
    assert_eq!(blobs.fetch(&reference).await.unwrap(), vec![0x89, b'P', b'N', b'G']);

    products.load().await.unwrap();
    assert_eq!(products.find(&id).unwrap().data.image.as_ref(), Some(&reference));

    // Another tenant cannot attach to this product
    let stranger = principal("someone@else.io");
    let err = images
        .attach(Some(&stranger), &id, Blob::new(vec![1], "image/png", "x.png"))
        .await
        .unwrap_err();
    assert!(matches!(err, AdminError::NotFound { .. }));
    assert_eq!(blobs.len().await, 1);
}

#[tokio::test]
async fn test_filesystem_blobs_round_trip() {
    let root = scratch_dir("blobs");
    let blobs = FsBlobStore::new(&root);
    let tenant = owner().tenant_key();

    let reference = blobs
        .upload(&tenant, Blob::new(b"jpeg bytes".to_vec(), "image/jpeg", "photo.jpg"))
        .await
        .unwrap();
    assert_eq!(blobs.fetch(&reference).await.unwrap(), b"jpeg bytes".to_vec());
    assert!(root.join(reference.as_str()).is_file());

    assert!(blobs.fetch(&BlobRef::from("../outside.jpg")).await.is_err());
    assert!(blobs.fetch(&BlobRef::from("tenants/none/images/missing.jpg")).await.is_err());

    tokio::fs::remove_dir_all(&root).await.unwrap();
}

#[tokio::test]
async fn test_exports_are_saved_to_directory() {
    let store = memory_store();
    let owner = owner();
    seed(&store, Some(&owner), &SeedFile::from_yaml(SEED).unwrap())
        .await
        .unwrap();

    let mut products = list_view::<_, Product>(&store, Some(&owner));
    products.load().await.unwrap();
    let dir = scratch_dir("exports");
    let sink = DirectorySink::new(&dir);

    let csv = products.export(ExportFormat::CSV).unwrap();
    assert_eq!(csv.file_name, "products.csv");
    let csv_path = sink.save(&csv).await.unwrap();
    let text = tokio::fs::read_to_string(&csv_path).await.unwrap();
    assert_eq!(text.lines().count(), 3);
    assert!(text.starts_with("Name,Price,"));

    let xlsx = products.export(ExportFormat::Spreadsheet).unwrap();
    assert_eq!(xlsx.file_name, "products.xlsx");
    let xlsx_path = sink.save(&xlsx).await.unwrap();
    let bytes = tokio::fs::read(&xlsx_path).await.unwrap();
    // xlsx is a zip archive
    assert!(bytes.starts_with(b"PK"));

    tokio::fs::remove_dir_all(&dir).await.unwrap();
}
