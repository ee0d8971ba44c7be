//! The reactive cart store.
//!
//! [`CartStore`] wraps every catalog record once into a [`CartEntry`] and
//! derives the cart from them:
//!
//! - `cart_items`: entries with `in_cart == true`, in catalog order
//! - `total_quantity`: sum of their quantities
//! - `total_price`: sum of their exact line totals
//!
//! All three are [`Computed`] cells, so they are recomputed on the next read
//! after an input moved and never on write. The two multi-cell operations,
//! [`add_to_cart`](CartStore::add_to_cart) and
//! [`remove_item`](CartStore::remove_item), run inside a
//! [`batch`](crate::reactive::batch): subscribers never see one cell
//! written without the other.
//!
//! The store is a cheap handle; clone it into whatever needs it.

mod entry;
mod quantity;

use std::collections::HashMap;
use std::rc::Rc;

pub use entry::CartEntry;
pub use quantity::{ParsePolicyError, QuantityPolicy, parse_quantity};

use crate::error::{StoreError, StoreResult};
use crate::models::ProductRecord;
use crate::reactive::{Computed, SubscriptionScope, batch, untracked};

/// Display form used for every price: two decimals.
pub fn format_price(value: f64) -> String {
    format!("{value:.2}")
}

#[derive(Clone)]
pub struct CartStore {
    entries: Rc<[CartEntry]>,
    index: Rc<HashMap<u64, usize>>,
    cart_items: Computed<Vec<CartEntry>>,
    total_quantity: Computed<i64>,
    total_price: Computed<f64>,
    policy: QuantityPolicy,
}

impl CartStore {
    /// Wrap `records`, in order, with `quantity = 0` and `in_cart = false`.
    ///
    /// Duplicate ids are refused. Out-of-range prices and discounts are
    /// accepted and only logged.
    pub fn new(records: Vec<ProductRecord>, policy: QuantityPolicy) -> StoreResult<Self> {
        let mut index = HashMap::with_capacity(records.len());
        for (position, record) in records.iter().enumerate() {
            if index.insert(record.id, position).is_some() {
                return Err(StoreError::DuplicateId { id: record.id });
            }
            if record.price < 0.0 {
                tracing::warn!(id = record.id, price = record.price, "negative price in catalog");
            }
            if !(0.0..=100.0).contains(&record.discount_percentage) {
                tracing::warn!(
                    id = record.id,
                    discount = record.discount_percentage,
                    "discount outside 0..=100 in catalog"
                );
            }
        }

        let entries: Rc<[CartEntry]> = records.into_iter().map(CartEntry::new).collect();

        let cart_items = {
            let entries = Rc::clone(&entries);
            Computed::new(move || {
                entries
                    .iter()
                    .filter(|entry| entry.in_cart())
                    .cloned()
                    .collect::<Vec<_>>()
            })
        };
        let total_quantity = {
            let cart_items = cart_items.clone();
            Computed::new(move || {
                cart_items.with(|items| {
                    items
                        .iter()
                        .map(CartEntry::quantity)
                        .fold(0i64, i64::saturating_add)
                })
            })
        };
        let total_price = {
            let cart_items = cart_items.clone();
            Computed::new(move || {
                cart_items.with(|items| items.iter().map(CartEntry::final_price).sum::<f64>())
            })
        };

        tracing::debug!(entries = entries.len(), ?policy, "cart store initialized");

        Ok(Self {
            entries,
            index: Rc::new(index),
            cart_items,
            total_quantity,
            total_price,
            policy,
        })
    }

    /// Every entry, in catalog order. Fixed for the store's lifetime.
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    pub fn entry(&self, id: u64) -> Option<&CartEntry> {
        self.index.get(&id).map(|&position| &self.entries[position])
    }

    pub fn require(&self, id: u64) -> StoreResult<&CartEntry> {
        self.entry(id).ok_or(StoreError::EntryNotFound { id })
    }

    pub fn policy(&self) -> QuantityPolicy {
        self.policy
    }

    pub fn cart_items(&self) -> Vec<CartEntry> {
        self.cart_items.get()
    }

    pub fn total_quantity(&self) -> i64 {
        self.total_quantity.get()
    }

    /// Exact sum of line totals; round with [`format_price`] for display.
    pub fn total_price(&self) -> f64 {
        self.total_price.get()
    }

    pub fn total_price_display(&self) -> String {
        format_price(self.total_price())
    }

    pub fn cart_items_cell(&self) -> &Computed<Vec<CartEntry>> {
        &self.cart_items
    }

    pub fn total_quantity_cell(&self) -> &Computed<i64> {
        &self.total_quantity
    }

    pub fn total_price_cell(&self) -> &Computed<f64> {
        &self.total_price
    }

    /// Put `entry` in the cart and add one to its quantity, atomically.
    ///
    /// Calling it again on an entry already in the cart adds one more.
    pub fn add_to_cart(&self, entry: &CartEntry) -> StoreResult<()> {
        self.ensure_member(entry)?;
        batch(|| {
            entry.in_cart_signal().set(true);
            entry
                .quantity_signal()
                .update(|quantity| *quantity = quantity.saturating_add(1));
        });
        tracing::debug!(
            id = entry.id(),
            quantity = entry.quantity_signal().get_untracked(),
            "added to cart"
        );
        Ok(())
    }

    /// Take `entry` out of the cart and reset its quantity to 0, atomically.
    pub fn remove_item(&self, entry: &CartEntry) -> StoreResult<()> {
        self.ensure_member(entry)?;
        batch(|| {
            entry.in_cart_signal().set(false);
            entry.quantity_signal().set(0);
        });
        tracing::debug!(id = entry.id(), "removed from cart");
        Ok(())
    }

    /// Direct quantity edit, filtered through the store's [`QuantityPolicy`].
    ///
    /// Cart membership is not touched, even when the result is 0 or less.
    pub fn set_quantity(&self, entry: &CartEntry, quantity: i64) -> StoreResult<i64> {
        self.ensure_member(entry)?;
        let quantity = self.policy.apply(quantity)?;
        entry.set_quantity(quantity);
        Ok(quantity)
    }

    /// Direct quantity edit from user-typed text.
    pub fn set_quantity_input(&self, entry: &CartEntry, input: &str) -> StoreResult<i64> {
        let quantity = parse_quantity(input)?;
        self.set_quantity(entry, quantity)
    }

    /// The `+` control.
    pub fn increment(&self, entry: &CartEntry) -> StoreResult<i64> {
        let current = entry.quantity_signal().get_untracked();
        self.set_quantity(entry, current.saturating_add(1))
    }

    /// The `-` control. Goes below zero under [`QuantityPolicy::PassThrough`].
    pub fn decrement(&self, entry: &CartEntry) -> StoreResult<i64> {
        let current = entry.quantity_signal().get_untracked();
        self.set_quantity(entry, current.saturating_sub(1))
    }

    pub fn add_to_cart_by_id(&self, id: u64) -> StoreResult<&CartEntry> {
        let entry = self.require(id)?;
        self.add_to_cart(entry)?;
        Ok(entry)
    }

    pub fn remove_item_by_id(&self, id: u64) -> StoreResult<&CartEntry> {
        let entry = self.require(id)?;
        self.remove_item(entry)?;
        Ok(entry)
    }

    pub fn set_quantity_by_id(&self, id: u64, quantity: i64) -> StoreResult<&CartEntry> {
        let entry = self.require(id)?;
        self.set_quantity(entry, quantity)?;
        Ok(entry)
    }

    /// Call `on_change` after every committed change to any entry's cart
    /// state. A batched operation reports once per cell it changed, and only
    /// after the whole batch applied.
    pub fn subscribe(&self, on_change: impl Fn() + 'static) -> SubscriptionScope {
        let on_change = Rc::new(on_change);
        let mut scope = SubscriptionScope::new();
        for entry in self.entries.iter() {
            let notify = Rc::clone(&on_change);
            scope.subscribe(entry.quantity_signal(), move |_| notify());
            let notify = Rc::clone(&on_change);
            scope.subscribe(entry.in_cart_signal(), move |_| notify());
        }
        scope
    }

    fn ensure_member(&self, entry: &CartEntry) -> StoreResult<()> {
        match self.entry(entry.id()) {
            Some(own) if own.same_entry(entry) => Ok(()),
            _ => Err(StoreError::EntryNotFound { id: entry.id() }),
        }
    }
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        untracked(|| {
            f.debug_struct("CartStore")
                .field("entries", &self.entries.len())
                .field("cart_items", &self.cart_items.with(Vec::len))
                .field("total_quantity", &self.total_quantity.get())
                .field("policy", &self.policy)
                .finish()
        })
    }
}
