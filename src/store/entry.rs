//! A catalog record wrapped with live cart state.

use std::rc::Rc;

use crate::models::ProductRecord;
use crate::reactive::{Computed, Signal};

use super::format_price;

struct EntryInner {
    base: ProductRecord,
    quantity: Signal<i64>,
    in_cart: Signal<bool>,
    final_price: Computed<f64>,
}

/// One catalog item as the store tracks it.
///
/// `CartEntry` is a handle: clones refer to the same entry, and equality is
/// identity, not field comparison.
#[derive(Clone)]
pub struct CartEntry {
    inner: Rc<EntryInner>,
}

impl CartEntry {
    pub(crate) fn new(base: ProductRecord) -> Self {
        let quantity = Signal::new(0);
        let in_cart = Signal::new(false);
        let final_price = {
            let unit_price = base.unit_price();
            let quantity = quantity.clone();
            Computed::new(move || unit_price * quantity.get() as f64)
        };
        Self {
            inner: Rc::new(EntryInner {
                base,
                quantity,
                in_cart,
                final_price,
            }),
        }
    }

    pub fn id(&self) -> u64 {
        self.inner.base.id
    }

    pub fn record(&self) -> &ProductRecord {
        &self.inner.base
    }

    pub fn quantity(&self) -> i64 {
        self.inner.quantity.get()
    }

    pub fn in_cart(&self) -> bool {
        self.inner.in_cart.get()
    }

    /// Exact line total: `price * (1 - discount/100) * quantity`.
    pub fn final_price(&self) -> f64 {
        self.inner.final_price.get()
    }

    pub fn final_price_display(&self) -> String {
        format_price(self.final_price())
    }

    pub fn quantity_signal(&self) -> &Signal<i64> {
        &self.inner.quantity
    }

    pub fn in_cart_signal(&self) -> &Signal<bool> {
        &self.inner.in_cart
    }

    pub fn final_price_cell(&self) -> &Computed<f64> {
        &self.inner.final_price
    }

    /// Raw quantity assignment. No clamping, and cart membership is left
    /// alone.
    pub fn set_quantity(&self, quantity: i64) {
        self.inner.quantity.set(quantity);
    }

    pub fn same_entry(&self, other: &CartEntry) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl PartialEq for CartEntry {
    fn eq(&self, other: &Self) -> bool {
        self.same_entry(other)
    }
}

impl std::fmt::Debug for CartEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartEntry")
            .field("id", &self.id())
            .field("title", &self.inner.base.title)
            .field("quantity", &self.inner.quantity.get_untracked())
            .field("in_cart", &self.inner.in_cart.get_untracked())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(price: f64, discount: f64) -> ProductRecord {
        ProductRecord {
            id: 1,
            title: "Ferris Mug".into(),
            price,
            discount_percentage: discount,
            thumbnail: String::new(),
        }
    }

    #[test]
    fn starts_empty() {
        let entry = CartEntry::new(record(12.0, 0.0));
        assert_eq!(entry.quantity(), 0);
        assert!(!entry.in_cart());
        assert_eq!(entry.final_price(), 0.0);
    }

    #[test]
    fn final_price_follows_quantity() {
        let entry = CartEntry::new(record(100.0, 20.0));
        entry.set_quantity(3);
        assert_eq!(entry.final_price(), 240.0);
        assert_eq!(entry.final_price_display(), "240.00");
    }

    #[test]
    fn final_price_is_memoized() {
        let entry = CartEntry::new(record(5.0, 0.0));
        entry.set_quantity(2);
        let _ = entry.final_price();
        let _ = entry.final_price();
        assert_eq!(entry.final_price_cell().evaluations(), 1);
    }

    #[test]
    fn identity_equality() {
        let a = CartEntry::new(record(1.0, 0.0));
        let b = CartEntry::new(record(1.0, 0.0));
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }
}
