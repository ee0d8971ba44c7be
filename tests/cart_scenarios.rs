use std::cell::RefCell;
use std::rc::Rc;

use reactive_cart::{
    error::StoreError,
    models::ProductRecord,
    store::{CartEntry, CartStore, QuantityPolicy, format_price},
};

fn product(id: u64, price: f64, discount: f64) -> ProductRecord {
    ProductRecord {
        id,
        title: format!("product {id}"),
        price,
        discount_percentage: discount,
        thumbnail: format!("https://cdn.example.com/{id}.png"),
    }
}

fn store(records: Vec<ProductRecord>) -> CartStore {
    CartStore::new(records, QuantityPolicy::PassThrough).expect("valid catalog")
}

#[test]
fn single_add_without_discount() {
    let store = store(vec![product(1, 100.0, 0.0)]);
    let entry = store.entry(1).unwrap().clone();

    store.add_to_cart(&entry).unwrap();

    assert_eq!(entry.quantity(), 1);
    assert_eq!(entry.final_price_display(), "100.00");
    assert_eq!(store.total_price_display(), "100.00");
    assert_eq!(store.total_quantity(), 1);
}

#[test]
fn repeated_add_with_discount_accumulates() {
    let store = store(vec![product(1, 100.0, 20.0)]);
    let entry = store.entry(1).unwrap().clone();

    store.add_to_cart(&entry).unwrap();
    store.add_to_cart(&entry).unwrap();

    assert_eq!(entry.quantity(), 2);
    assert!(entry.in_cart());
    assert_eq!(entry.final_price_display(), "160.00");
}

#[test]
fn removing_one_of_two_leaves_the_other() {
    let store = store(vec![product(1, 10.0, 0.0), product(2, 20.0, 0.0)]);
    store.add_to_cart_by_id(1).unwrap();
    store.add_to_cart_by_id(2).unwrap();
    store.add_to_cart_by_id(2).unwrap();

    store.remove_item_by_id(1).unwrap();

    let items = store.cart_items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id(), 2);
    assert_eq!(store.total_quantity(), 2);
    assert_eq!(store.total_price_display(), "40.00");
}

#[test]
fn negative_direct_edit_flows_into_totals() {
    let store = store(vec![product(1, 50.0, 0.0), product(2, 10.0, 0.0)]);
    store.add_to_cart_by_id(1).unwrap();
    store.add_to_cart_by_id(2).unwrap();

    store.set_quantity_by_id(1, -1).unwrap();

    let entry = store.entry(1).unwrap();
    assert!(entry.final_price() < 0.0);
    assert_eq!(entry.final_price_display(), "-50.00");
    assert!(entry.in_cart());
    assert_eq!(store.total_price_display(), "-40.00");
    assert_eq!(store.total_quantity(), 0);
}

#[test]
fn remove_resets_regardless_of_quantity() {
    let store = store(vec![product(1, 3.0, 0.0)]);
    let entry = store.entry(1).unwrap().clone();
    store.add_to_cart(&entry).unwrap();
    store.set_quantity(&entry, 5).unwrap();

    store.remove_item(&entry).unwrap();

    assert_eq!(entry.quantity(), 0);
    assert!(!entry.in_cart());
    assert!(store.cart_items().is_empty());

    // Idempotent.
    store.remove_item(&entry).unwrap();
    assert_eq!(entry.quantity(), 0);
}

#[test]
fn add_after_remove_starts_from_one() {
    let store = store(vec![product(1, 3.0, 0.0)]);
    store.add_to_cart_by_id(1).unwrap();
    store.add_to_cart_by_id(1).unwrap();
    store.remove_item_by_id(1).unwrap();
    let entry = store.add_to_cart_by_id(1).unwrap();
    assert_eq!(entry.quantity(), 1);
}

#[test]
fn entry_identity_is_stable() {
    let store = store(vec![product(1, 3.0, 0.0), product(2, 4.0, 0.0)]);
    let before: Vec<CartEntry> = store.entries().to_vec();
    store.add_to_cart_by_id(2).unwrap();
    store.remove_item_by_id(2).unwrap();
    assert_eq!(store.entries().len(), 2);
    for (a, b) in before.iter().zip(store.entries()) {
        assert!(a.same_entry(b));
    }
}

#[test]
fn unknown_entry_fails_loudly() {
    let store = store(vec![product(1, 3.0, 0.0)]);
    assert_eq!(
        store.add_to_cart_by_id(42).unwrap_err(),
        StoreError::EntryNotFound { id: 42 }
    );
}

#[test]
fn observers_never_see_partial_add_or_remove() {
    let store = store(vec![product(1, 10.0, 0.0), product(2, 5.0, 50.0)]);
    let seen = Rc::new(RefCell::new(Vec::new()));

    let log = Rc::clone(&seen);
    let view = store.clone();
    let _scope = store.subscribe(move || {
        for entry in view.entries() {
            log.borrow_mut().push((entry.in_cart(), entry.quantity()));
        }
        // Aggregates read from inside the callback match a fresh computation.
        let expected: f64 = view
            .entries()
            .iter()
            .filter(|e| e.in_cart())
            .map(|e| e.record().unit_price() * e.quantity() as f64)
            .sum();
        assert_eq!(format_price(view.total_price()), format_price(expected));
    });

    for _ in 0..3 {
        store.add_to_cart_by_id(1).unwrap();
        store.add_to_cart_by_id(2).unwrap();
    }
    store.remove_item_by_id(1).unwrap();
    store.remove_item_by_id(2).unwrap();

    let seen = seen.borrow();
    assert!(!seen.is_empty());
    for &(in_cart, quantity) in seen.iter() {
        assert!(
            (in_cart && quantity > 0) || (!in_cart && quantity == 0),
            "observed in_cart={in_cart} quantity={quantity}"
        );
    }
}
