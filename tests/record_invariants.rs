//! Record Access Invariant Tests
//!
//! Properties of the product table as seen through `inventory::crud`:
//! - Fresh ids are never reused, even after delete
//! - SKU uniqueness holds for create and update
//! - Partial updates touch only the named fields
//! - Delete is permanent
//! - list(skip, limit) is a window over creation order
//! - State survives reopening a file-backed database
//! - Concurrent sessions neither block nor lose each other's writes

use retail_inventory::inventory::crud;
use retail_inventory::inventory::{
    validate_create, validate_update, Database, InventoryError, NewProduct, Patch, Product,
    ProductPatch,
};
use serde_json::json;
use std::collections::HashSet;
use std::sync::Barrier;
use std::thread;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn product(n: usize) -> NewProduct {
    NewProduct {
        name: format!("Product {n}"),
        sku: format!("SKU-{n:03}"),
        price: n as f64 * 1.25,
        quantity: n as i64,
    }
}

fn file_database(tmp: &TempDir) -> Database {
    Database::open(&tmp.path().join("inventory.db")).unwrap()
}

fn seed(db: &Database, count: usize) -> Vec<Product> {
    let session = db.session().unwrap();
    let mut created = Vec::with_capacity(count);
    for n in 0..count {
        created.push(crud::create(&session, product(n)).unwrap());
    }
    created
}

// =============================================================================
// Identity
// =============================================================================

/// Every create hands out an id never seen before.
#[test]
fn test_ids_never_repeat() {
    let db = Database::open_in_memory().unwrap();
    let session = db.session().unwrap();
    let mut seen = HashSet::new();

    for round in 0..20 {
        let created = crud::create(&session, product(round)).unwrap();
        assert!(seen.insert(created.id), "id {} reused", created.id);
        if round % 2 == 0 {
            assert!(crud::delete(&session, created.id).unwrap());
        }
    }
}

/// Unassigned and deleted ids read as absent.
#[test]
fn test_absent_ids() {
    let db = Database::open_in_memory().unwrap();
    let created = seed(&db, 2);
    let session = db.session().unwrap();

    assert_eq!(crud::get_by_id(&session, 0).unwrap(), None);
    assert_eq!(crud::get_by_id(&session, 1_000).unwrap(), None);

    crud::delete(&session, created[0].id).unwrap();
    assert_eq!(crud::get_by_id(&session, created[0].id).unwrap(), None);
    assert_eq!(
        crud::get_by_id(&session, created[1].id).unwrap(),
        Some(created[1].clone())
    );
}

// =============================================================================
// SKU Uniqueness
// =============================================================================

#[test]
fn test_sku_reusable_after_delete() {
    let db = Database::open_in_memory().unwrap();
    let created = seed(&db, 1);
    let session = db.session().unwrap();

    assert!(matches!(
        crud::create(&session, product(0)),
        Err(InventoryError::DuplicateSku)
    ));

    crud::delete(&session, created[0].id).unwrap();
    let again = crud::create(&session, product(0)).unwrap();
    assert_eq!(again.sku, created[0].sku);
}

#[test]
fn test_update_keeping_own_sku_is_allowed() {
    let db = Database::open_in_memory().unwrap();
    let created = seed(&db, 1);
    let session = db.session().unwrap();

    let patch = ProductPatch {
        sku: Patch::Set(created[0].sku.clone()),
        name: Patch::Set("Renamed".to_string()),
        ..Default::default()
    };
    let updated = crud::update(&session, created[0].id, patch).unwrap().unwrap();
    assert_eq!(updated.name, "Renamed");
    assert_eq!(updated.sku, created[0].sku);
}

// =============================================================================
// Partial Update
// =============================================================================

/// Each single-field patch leaves the other three fields alone.
#[test]
fn test_single_field_updates() {
    let db = Database::open_in_memory().unwrap();
    let created = seed(&db, 1).remove(0);
    let session = db.session().unwrap();

    let patches = [
        json!({"name": ""}),
        json!({"sku": "NEW"}),
        json!({"price": 0}),
        json!({"quantity": -4}),
    ];

    let mut expected = created.clone();
    for body in patches {
        let patch = validate_update(&body).unwrap();
        patch.clone().apply_to(&mut expected);

        let updated = crud::update(&session, created.id, patch).unwrap().unwrap();
        assert_eq!(updated, expected);
        assert_eq!(crud::get_by_id(&session, created.id).unwrap(), Some(expected.clone()));
    }

    assert_eq!(
        expected,
        Product {
            id: created.id,
            name: String::new(),
            sku: "NEW".to_string(),
            price: 0.0,
            quantity: -4,
        }
    );
}

#[test]
fn test_empty_update_returns_current_row() {
    let db = Database::open_in_memory().unwrap();
    let created = seed(&db, 1).remove(0);
    let session = db.session().unwrap();

    let patch = validate_update(&json!({})).unwrap();
    assert_eq!(crud::update(&session, created.id, patch).unwrap(), Some(created));
}

// =============================================================================
// Listing
// =============================================================================

/// list(S, L) returns items S..S+L-1 of the extant products.
#[test]
fn test_list_windows() {
    let db = Database::open_in_memory().unwrap();
    let created = seed(&db, 7);
    let session = db.session().unwrap();

    crud::delete(&session, created[3].id).unwrap();
    let extant: Vec<Product> = created
        .into_iter()
        .enumerate()
        .filter(|(i, _)| *i != 3)
        .map(|(_, p)| p)
        .collect();

    for skip in 0..8u64 {
        for limit in 0..8u64 {
            let window = crud::list(&session, skip, limit).unwrap();
            let expected: Vec<Product> = extant
                .iter()
                .skip(skip as usize)
                .take(limit as usize)
                .cloned()
                .collect();
            assert_eq!(window, expected, "skip={skip} limit={limit}");
        }
    }
}

#[test]
fn test_default_limit_caps_list() {
    let db = Database::open_in_memory().unwrap();
    seed(&db, 105);
    let session = db.session().unwrap();

    let page = crud::list(&session, crud::DEFAULT_SKIP, crud::DEFAULT_LIMIT).unwrap();
    assert_eq!(page.len(), 100);
    assert_eq!(page[0].name, "Product 0");
}

// =============================================================================
// Persistence
// =============================================================================

#[test]
fn test_rows_survive_reopen() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("inventory.db");

    let created = {
        let db = Database::open(&path).unwrap();
        let input = validate_create(&json!({
            "name": "Widget",
            "sku": "W-1",
            "price": 9.99,
            "quantity": 10
        }))
        .unwrap();
        let session = db.session().unwrap();
        let product = crud::create(&session, input).unwrap();
        product
    };

    let db = Database::open(&path).unwrap();
    let session = db.session().unwrap();
    assert_eq!(crud::get_by_id(&session, created.id).unwrap(), Some(created));

    // The sku constraint is part of the stored schema.
    let dup = crud::create(
        &session,
        NewProduct {
            name: "Other".to_string(),
            sku: "W-1".to_string(),
            price: 1.0,
            quantity: 1,
        },
    );
    assert!(matches!(dup, Err(InventoryError::DuplicateSku)));
}

// =============================================================================
// Concurrency
// =============================================================================

/// A session parked after reading one row does not hold up a read of another.
#[test]
fn test_reader_does_not_wait_for_open_session() {
    let tmp = TempDir::new().unwrap();
    let db = file_database(&tmp);
    let created = seed(&db, 2);
    let parked = Barrier::new(2);
    let done = Barrier::new(2);

    thread::scope(|scope| {
        scope.spawn(|| {
            let session = db.session().unwrap();
            assert!(crud::get_by_id(&session, created[0].id).unwrap().is_some());
            parked.wait();
            done.wait();
        });
        scope.spawn(|| {
            parked.wait();
            let session = db.session().unwrap();
            assert_eq!(
                crud::get_by_id(&session, created[1].id).unwrap(),
                Some(created[1].clone())
            );
            done.wait();
        });
    });
}

/// Racing creates on one sku: exactly one wins, the rest see DuplicateSku.
#[test]
fn test_racing_creates_on_one_sku() {
    let tmp = TempDir::new().unwrap();
    let db = file_database(&tmp);
    let start = Barrier::new(4);

    let (db, start) = (&db, &start);
    let outcomes: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(move || {
                    let session = db.session().unwrap();
                    start.wait();
                    crud::create(&session, product(7))
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(outcomes.iter().filter(|o| o.is_ok()).count(), 1);
    for outcome in outcomes.iter().filter(|o| o.is_err()) {
        assert!(matches!(outcome, Err(InventoryError::DuplicateSku)));
    }
    let session = db.session().unwrap();
    assert_eq!(crud::list(&session, 0, 10).unwrap().len(), 1);
}

/// Concurrent single-field updates of one row all land.
#[test]
fn test_concurrent_field_updates_are_not_lost() {
    let tmp = TempDir::new().unwrap();
    let db = file_database(&tmp);
    let created = seed(&db, 1).remove(0);
    let bodies = [
        json!({"name": "Renamed"}),
        json!({"sku": "NEW-1"}),
        json!({"price": 3.5}),
        json!({"quantity": 99}),
    ];
    let start = Barrier::new(bodies.len());

    thread::scope(|scope| {
        for body in &bodies {
            let (db, start) = (&db, &start);
            scope.spawn(move || {
                let patch = validate_update(body).unwrap();
                let session = db.session().unwrap();
                start.wait();
                crud::update(&session, created.id, patch).unwrap().unwrap();
            });
        }
    });

    let session = db.session().unwrap();
    assert_eq!(
        crud::get_by_id(&session, created.id).unwrap(),
        Some(Product {
            id: created.id,
            name: "Renamed".to_string(),
            sku: "NEW-1".to_string(),
            price: 3.5,
            quantity: 99,
        })
    );
}
