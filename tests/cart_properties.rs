use proptest::prelude::*;

use reactive_cart::{
    models::ProductRecord,
    store::{CartEntry, CartStore, QuantityPolicy},
};

#[derive(Debug, Clone)]
enum Op {
    Add(usize),
    Remove(usize),
    Set(usize, i64),
    Increment(usize),
    Decrement(usize),
}

fn op(len: usize) -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..len).prop_map(Op::Add),
        (0..len).prop_map(Op::Remove),
        (0..len, -5i64..20).prop_map(|(i, q)| Op::Set(i, q)),
        (0..len).prop_map(Op::Increment),
        (0..len).prop_map(Op::Decrement),
    ]
}

fn catalog() -> impl Strategy<Value = Vec<ProductRecord>> {
    prop::collection::vec((0.0f64..500.0, 0.0f64..=100.0), 1..8).prop_map(|rows| {
        rows.into_iter()
            .zip(1u64..)
            .map(|((price, discount), id)| ProductRecord {
                id,
                title: format!("p{id}"),
                price,
                discount_percentage: discount,
                thumbnail: String::new(),
            })
            .collect()
    })
}

fn pick(store: &CartStore, i: usize) -> &CartEntry {
    &store.entries()[i % store.entries().len()]
}

fn apply(store: &CartStore, op: &Op) {
    match *op {
        Op::Add(i) => store.add_to_cart(pick(store, i)).unwrap(),
        Op::Remove(i) => store.remove_item(pick(store, i)).unwrap(),
        Op::Set(i, q) => {
            store.set_quantity(pick(store, i), q).unwrap();
        }
        Op::Increment(i) => {
            store.increment(pick(store, i)).unwrap();
        }
        Op::Decrement(i) => {
            store.decrement(pick(store, i)).unwrap();
        }
    }
}

proptest! {
    #[test]
    fn derived_values_match_inputs(
        records in catalog(),
        ops in prop::collection::vec(op(8), 0..40),
    ) {
        let store = CartStore::new(records, QuantityPolicy::PassThrough).unwrap();
        for op in &ops {
            apply(&store, op);

            let items = store.cart_items();

            // Membership
            for entry in store.entries() {
                let listed = items.iter().any(|item| item.same_entry(entry));
                prop_assert_eq!(entry.in_cart(), listed);
            }

            // Line totals
            for entry in store.entries() {
                let record = entry.record();
                let expected = record.price
                    * (1.0 - record.discount_percentage / 100.0)
                    * entry.quantity() as f64;
                prop_assert_eq!(entry.final_price(), expected);
            }

            // Aggregates
            let quantity: i64 = items.iter().map(|e| e.quantity()).sum();
            let price: f64 = items.iter().map(|e| e.final_price()).sum();
            prop_assert_eq!(store.total_quantity(), quantity);
            prop_assert!((store.total_price() - price).abs() < 0.01);
        }
    }

    #[test]
    fn add_and_remove_keep_membership_and_quantity_in_step(
        records in catalog(),
        ops in prop::collection::vec((any::<bool>(), 0usize..8), 0..40),
    ) {
        let store = CartStore::new(records, QuantityPolicy::PassThrough).unwrap();
        for (add, i) in ops {
            let entry = pick(&store, i);
            if add {
                let before = entry.quantity();
                store.add_to_cart(entry).unwrap();
                prop_assert_eq!(entry.quantity(), before + 1);
            } else {
                store.remove_item(entry).unwrap();
                prop_assert_eq!(entry.quantity(), 0);
            }
            for entry in store.entries() {
                prop_assert_eq!(entry.in_cart(), entry.quantity() > 0);
            }
        }
    }
}
