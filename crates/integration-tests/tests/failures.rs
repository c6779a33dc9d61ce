//! Authentication, remote failure and partial failure behavior.

#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;

use shopdesk_admin::AdminError;
use shopdesk_admin::models::{Category, Patch, Product, ShippingMethod, Vendor};
use shopdesk_admin::view::{BulkOperation, BulkSelection, FormViewModel};
use shopdesk_core::DocumentId;
use shopdesk_integration_tests::{list_view, memory_store, owner, principal};

#[tokio::test]
async fn test_every_operation_requires_a_principal() {
    let store = memory_store();
    let mut anonymous = list_view::<_, Category>(&store, None);

    assert!(matches!(anonymous.load().await, Err(AdminError::NotAuthenticated)));
    assert!(matches!(
        anonymous.create(Category::new("Electronics")).await,
        Err(AdminError::NotAuthenticated)
    ));
    assert!(matches!(
        FormViewModel::create(Category::new("Books")).submit(&mut anonymous).await,
        Err(AdminError::NotAuthenticated)
    ));

    let id = DocumentId::new("c1");
    let accessor = anonymous.accessor();
    assert!(matches!(accessor.get(None, &id).await, Err(AdminError::NotAuthenticated)));
    assert!(matches!(
        accessor.update(None, &id, Patch::new().set("name", "x")).await,
        Err(AdminError::NotAuthenticated)
    ));
    assert!(matches!(accessor.remove(None, &id).await, Err(AdminError::NotAuthenticated)));
    assert!(anonymous.records().is_empty());

    // Nothing was written anywhere
    let mut signed_in = list_view::<_, Category>(&store, Some(&owner()));
    assert_eq!(signed_in.load().await.unwrap(), 0);
}

#[tokio::test]
async fn test_failed_load_keeps_previous_working_set() {
    let store = memory_store();
    let mut list = list_view::<_, Vendor>(&store, Some(&owner()));
    list.create(Vendor::new("Acme", "a@acme.io")).await.unwrap();
    list.create(Vendor::new("Globex", "g@globex.io")).await.unwrap();

    store.set_offline(true).await;
    let err = list.load().await.unwrap_err();
    assert!(err.is_remote());
    assert_eq!(list.records().len(), 2);
}

#[tokio::test]
async fn test_failed_submit_keeps_draft_for_retry() {
    let store = memory_store();
    let mut list = list_view::<_, Vendor>(&store, Some(&owner()));
    let id = list.create(Vendor::new("Acme", "a@acme.io")).await.unwrap();

    let mut draft = FormViewModel::edit(list.find(&id).unwrap());
    draft.data.phone = "555-0100".into();
    let before = draft.clone();

    store.set_offline(true).await;
    let err = draft.submit(&mut list).await.unwrap_err();
    assert!(matches!(err, AdminError::Remote(_)));
    assert_eq!(draft, before);
    assert_eq!(list.find(&id).unwrap().data.phone, "");

    store.set_offline(false).await;
    assert_eq!(draft.submit(&mut list).await.unwrap(), id);
    assert_eq!(list.find(&id).unwrap().data.phone, "555-0100");

    list.load().await.unwrap();
    assert_eq!(list.find(&id).unwrap().data.phone, "555-0100");
}

#[tokio::test]
async fn test_update_of_missing_record_is_not_found() {
    let store = memory_store();
    let mut list = list_view::<_, Vendor>(&store, Some(&owner()));
    let ghost = DocumentId::new("does-not-exist");

    let err = list.update(&ghost, Patch::new().set("phone", "1")).await.unwrap_err();
    match err {
        AdminError::NotFound { collection, id } => {
            assert_eq!(collection, "vendors");
            assert_eq!(id, ghost);
        }
        other => panic!("expected not found, got {other}"),
    }
    assert_eq!(list.load().await.unwrap(), 0);
}

#[tokio::test]
async fn test_mistyped_update_keeps_collection_loadable() {
    let store = memory_store();
    let mut products = list_view::<_, Product>(&store, Some(&owner()));
    let laptop = Product {
        name: "Laptop".into(),
        price: Decimal::new(99_900, 2),
        stock: 5,
        category: "Electronics".into(),
        ..Product::default()
    };
    let id = products.create(laptop.clone()).await.unwrap();
    products.create(laptop).await.unwrap();

    let err = products
        .update(&id, Patch::new().set("stock", "lots"))
        .await
        .unwrap_err();
    assert!(matches!(err, AdminError::Validation { ref missing } if missing == &["stock"]));
    assert!(!err.is_remote());
    assert_eq!(products.find(&id).unwrap().data.stock, 5);

    assert_eq!(products.load().await.unwrap(), 2);
    assert_eq!(products.find(&id).unwrap().data.stock, 5);
}

#[tokio::test]
async fn test_bulk_enable_is_refused_for_vendors() {
    let store = memory_store();
    let mut vendors = list_view::<_, Vendor>(&store, Some(&owner()));
    vendors.create(Vendor::new("Acme", "a@acme.io")).await.unwrap();
    vendors.create(Vendor::new("Globex", "g@globex.io")).await.unwrap();

    let mut selection = BulkSelection::new();
    selection.select_all(&vendors);
    let report = selection.apply(&mut vendors, &BulkOperation::SetEnabled(false)).await;

    assert!(report.succeeded.is_empty());
    assert_eq!(report.failed.len(), 2);
    assert!(report
        .error_messages()
        .iter()
        .all(|message| message.ends_with("Cannot disable vendors")));
    assert_eq!(vendors.load().await.unwrap(), 2);
}

#[tokio::test]
async fn test_bulk_enable_with_one_rejected_write() {
    let store = memory_store();
    let mut list = list_view::<_, ShippingMethod>(&store, Some(&owner()));
    let mut ids = Vec::new();
    for (name, rate) in [("Ground", 500), ("Express", 1500), ("Overnight", 3000), ("Freight", 9000)] {
        let method = ShippingMethod {
            name: name.into(),
            rate: Decimal::new(rate, 2),
            enabled: false,
        };
        ids.push(list.create(method).await.unwrap());
    }
    let rejected = ids.get(2).cloned().unwrap();
    store.reject_writes_to(rejected.clone()).await;

    let mut selection = BulkSelection::new();
    selection.select_all(&list);
    assert_eq!(selection.len(), 4);

    let report = selection.apply(&mut list, &BulkOperation::SetEnabled(true)).await;
    assert!(!report.is_success());
    assert_eq!(report.succeeded.len(), 3);
    assert_eq!(report.failed.len(), 1);
    let failure = report.failed.first().unwrap();
    assert_eq!(failure.id, rejected);
    assert!(failure.error.is_remote());
    assert!(report.error_messages().first().unwrap().starts_with(rejected.as_str()));
    assert!(selection.is_empty());

    // Local working set and store agree
    for check in [false, true] {
        if check {
            list.load().await.unwrap();
        }
        for record in list.records() {
            assert_eq!(record.data.enabled, record.id != rejected, "{}", record.data.name);
        }
    }
}

#[tokio::test]
async fn test_tenants_are_isolated() {
    let store = memory_store();
    let alice = principal("alice@shop.io");
    let bob = principal("bob@other.io");

    let mut alice_vendors = list_view::<_, Vendor>(&store, Some(&alice));
    let mut bob_vendors = list_view::<_, Vendor>(&store, Some(&bob));
    let id = alice_vendors.create(Vendor::new("Acme", "a@acme.io")).await.unwrap();

    assert_eq!(bob_vendors.load().await.unwrap(), 0);
    let accessor = bob_vendors.accessor();
    assert!(matches!(
        accessor.get(Some(&bob), &id).await,
        Err(AdminError::NotFound { .. })
    ));
    assert!(matches!(
        accessor.update(Some(&bob), &id, Patch::new().set("name", "Hijacked")).await,
        Err(AdminError::NotFound { .. })
    ));
    accessor.remove(Some(&bob), &id).await.unwrap();

    assert_eq!(alice_vendors.load().await.unwrap(), 1);
    assert_eq!(alice_vendors.find(&id).unwrap().data.name, "Acme");
    assert_ne!(
        alice_vendors.accessor().path(Some(&alice)).unwrap(),
        bob_vendors.accessor().path(Some(&bob)).unwrap()
    );
}
