#![forbid(unsafe_code)]

//! Lazily evaluated, memoized derived values.
//!
//! A [`Computed`] wraps a closure. The first read evaluates it and records
//! every [`Signal`](super::Signal) or other `Computed` it touched. Later reads
//! check those sources' versions; if none moved, the cached value is returned
//! without running the closure.
//!
//! ```ignore
//! let price = Signal::new(10.0);
//! let quantity = Signal::new(2);
//! let line = Computed::new({
//!     let (price, quantity) = (price.clone(), quantity.clone());
//!     move || price.get() * quantity.get() as f64
//! });
//! assert_eq!(line.get(), 20.0);
//! quantity.set(3);            // nothing is evaluated here
//! assert_eq!(line.get(), 30.0);
//! ```

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::tracking::{self, Dependency, Source};

struct Cached<T> {
    value: T,
    deps: Vec<Dependency>,
}

struct ComputedInner<T> {
    compute: Box<dyn Fn() -> T>,
    cache: RefCell<Option<Cached<T>>>,
    version: Cell<u64>,
    evaluations: Cell<u64>,
}

impl<T: PartialEq> ComputedInner<T> {
    fn is_stale(&self) -> bool {
        match &*self.cache.borrow() {
            Some(cached) => cached.deps.iter().any(Dependency::changed),
            None => true,
        }
    }

    fn evaluate(&self) {
        let (value, deps) = tracking::collect(|| (self.compute)());
        self.evaluations.set(self.evaluations.get() + 1);

        let mut cache = self.cache.borrow_mut();
        if cache.as_ref().is_none_or(|cached| cached.value != value) {
            self.version.set(self.version.get() + 1);
        }
        *cache = Some(Cached { value, deps });
    }
}

impl<T: PartialEq> Source for ComputedInner<T> {
    fn refresh(&self) -> u64 {
        if self.is_stale() {
            self.evaluate();
        }
        self.version.get()
    }
}

/// A derived value recomputed on demand.
///
/// Cloning a `Computed` clones the handle; clones share one cache.
pub struct Computed<T> {
    inner: Rc<ComputedInner<T>>,
}

impl<T> Clone for Computed<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Clone + PartialEq + std::fmt::Debug + 'static> std::fmt::Debug for Computed<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Computed")
            .field("value", &self.get())
            .field("version", &self.inner.version.get())
            .finish()
    }
}

impl<T: Clone + PartialEq + 'static> Computed<T> {
    /// Wrap `compute`. Nothing is evaluated until the first read.
    pub fn new(compute: impl Fn() -> T + 'static) -> Self {
        Self {
            inner: Rc::new(ComputedInner {
                compute: Box::new(compute),
                cache: RefCell::new(None),
                version: Cell::new(0),
                evaluations: Cell::new(0),
            }),
        }
    }

    /// Up-to-date value.
    #[must_use]
    pub fn get(&self) -> T {
        self.with(T::clone)
    }

    /// Borrow the up-to-date value.
    ///
    /// # Panics
    ///
    /// The cached value stays borrowed while `f` runs. If `f` writes one of
    /// this computed's inputs and then reads the computed again, the
    /// re-evaluation panics. Use [`get`](Self::get) to work on a copy instead.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let version = self.inner.refresh();
        tracking::record(self.inner.clone(), version);
        let cache = self.inner.cache.borrow();
        match cache.as_ref() {
            Some(cached) => f(&cached.value),
            None => f(&(self.inner.compute)()),
        }
    }

    /// Bumped each time re-evaluation produced a different value.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.version.get()
    }

    /// How many times the closure has run.
    #[must_use]
    pub fn evaluations(&self) -> u64 {
        self.inner.evaluations.get()
    }

    /// Whether the next read will re-evaluate.
    ///
    /// Checking may bring upstream computeds up to date.
    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.inner.is_stale()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::{Signal, batch, untracked};

    #[test]
    fn evaluates_lazily() {
        let source = Signal::new(2);
        let s = source.clone();
        let doubled = Computed::new(move || s.get() * 2);
        assert_eq!(doubled.evaluations(), 0);

        source.set(5);
        source.set(6);
        assert_eq!(doubled.evaluations(), 0, "writes never evaluate");
        assert_eq!(doubled.get(), 12);
        assert_eq!(doubled.evaluations(), 1);
    }

    #[test]
    fn memoizes_until_input_changes() {
        let source = Signal::new(1);
        let s = source.clone();
        let plus_one = Computed::new(move || s.get() + 1);

        assert_eq!(plus_one.get(), 2);
        assert_eq!(plus_one.get(), 2);
        assert_eq!(plus_one.evaluations(), 1);

        source.set(10);
        assert!(plus_one.is_stale());
        assert_eq!(plus_one.get(), 11);
        assert_eq!(plus_one.evaluations(), 2);
    }

    #[test]
    fn unrelated_signal_does_not_invalidate() {
        let used = Signal::new(1);
        let unused = Signal::new(1);
        let u = used.clone();
        let c = Computed::new(move || u.get());
        let _ = c.get();

        unused.set(99);
        assert!(!c.is_stale());
        let _ = c.get();
        assert_eq!(c.evaluations(), 1);
    }

    #[test]
    fn chained_computeds_stay_consistent() {
        let a = Signal::new(3);
        let a2 = a.clone();
        let squared = Computed::new(move || a2.get() * a2.get());
        let sq = squared.clone();
        let label = Computed::new(move || format!("{}", sq.get()));

        assert_eq!(label.get(), "9");
        a.set(4);
        assert_eq!(label.get(), "16");
    }

    #[test]
    fn downstream_skips_when_upstream_value_unchanged() {
        let n = Signal::new(4);
        let n2 = n.clone();
        let parity = Computed::new(move || n2.get() % 2);
        let p = parity.clone();
        let text = Computed::new(move || if p.get() == 0 { "even" } else { "odd" });

        assert_eq!(text.get(), "even");
        n.set(6);
        assert_eq!(text.get(), "even");
        assert_eq!(parity.evaluations(), 2);
        assert_eq!(text.evaluations(), 1, "parity did not change");
    }

    #[test]
    fn dependencies_follow_branches() {
        let flag = Signal::new(true);
        let left = Signal::new(1);
        let right = Signal::new(2);
        let (f, l, r) = (flag.clone(), left.clone(), right.clone());
        let pick = Computed::new(move || if f.get() { l.get() } else { r.get() });

        assert_eq!(pick.get(), 1);
        right.set(20);
        assert!(!pick.is_stale(), "right was not read");

        flag.set(false);
        assert_eq!(pick.get(), 20);
        left.set(10);
        assert!(!pick.is_stale(), "left is no longer read");
    }

    #[test]
    fn untracked_reads_are_not_dependencies() {
        let tracked = Signal::new(1);
        let hidden = Signal::new(100);
        let (t, h) = (tracked.clone(), hidden.clone());
        let sum = Computed::new(move || t.get() + untracked(|| h.get()));

        assert_eq!(sum.get(), 101);
        hidden.set(200);
        assert_eq!(sum.get(), 101);
        tracked.set(2);
        assert_eq!(sum.get(), 202);
    }

    #[test]
    fn batch_reads_see_own_writes() {
        let a = Signal::new(1);
        let b = Signal::new(1);
        let (a2, b2) = (a.clone(), b.clone());
        let sum = Computed::new(move || a2.get() + b2.get());

        let mid = batch(|| {
            a.set(10);
            let mid = sum.get();
            b.set(10);
            mid
        });
        assert_eq!(mid, 11);
        assert_eq!(sum.get(), 20);
    }

    #[test]
    fn debug_shows_value() {
        let c = Computed::new(|| 5);
        assert!(format!("{c:?}").contains("value: 5"));
    }

    #[test]
    fn with_allows_reading_itself_while_fresh() {
        let source = Signal::new(3);
        let s = source.clone();
        let tripled = Computed::new(move || s.get() * 3);
        let both = tripled.with(|v| *v + tripled.get());
        assert_eq!(both, 18);
        assert_eq!(tripled.evaluations(), 1);
    }

    #[test]
    #[should_panic]
    fn invalidating_itself_inside_with_panics() {
        let source = Signal::new(3);
        let s = source.clone();
        let tripled = Computed::new(move || s.get() * 3);
        tripled.with(|_| {
            source.set(4);
            tripled.get()
        });
    }
}
