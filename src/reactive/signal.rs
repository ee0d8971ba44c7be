#![forbid(unsafe_code)]

//! Mutable reactive cells.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use super::batch;
use super::tracking::{self, Source};

type Callback<T> = dyn Fn(&T);

struct SignalInner<T> {
    value: RefCell<T>,
    version: Cell<u64>,
    subscribers: RefCell<Vec<Weak<Callback<T>>>>,
}

impl<T: Clone + 'static> SignalInner<T> {
    fn notify(&self) {
        let callbacks: Vec<Rc<Callback<T>>> = {
            let mut subscribers = self.subscribers.borrow_mut();
            subscribers.retain(|weak| weak.strong_count() > 0);
            subscribers.iter().filter_map(Weak::upgrade).collect()
        };
        if callbacks.is_empty() {
            return;
        }
        // Callbacks may write back into this cell.
        let value = self.value.borrow().clone();
        for callback in callbacks {
            callback(&value);
        }
    }
}

impl<T> Source for SignalInner<T> {
    fn refresh(&self) -> u64 {
        self.version.get()
    }
}

/// A shared, version-tracked mutable cell.
///
/// Cloning a `Signal` clones the handle, not the value.
pub struct Signal<T> {
    inner: Rc<SignalInner<T>>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("value", &*self.inner.value.borrow())
            .field("version", &self.inner.version.get())
            .finish()
    }
}

impl<T: Clone + PartialEq + 'static> Signal<T> {
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(SignalInner {
                value: RefCell::new(value),
                version: Cell::new(0),
                subscribers: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Current value. Registers a dependency when read inside a computation.
    #[must_use]
    pub fn get(&self) -> T {
        self.with(T::clone)
    }

    /// Borrow the current value. Registers a dependency like [`get`](Self::get).
    ///
    /// # Panics
    ///
    /// The value stays borrowed while `f` runs, so writing to this signal
    /// from inside `f` panics. Reading it again is fine.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        tracking::record(self.inner.clone(), self.inner.version.get());
        f(&self.inner.value.borrow())
    }

    /// Current value without registering a dependency.
    #[must_use]
    pub fn get_untracked(&self) -> T {
        self.inner.value.borrow().clone()
    }

    /// Replace the value. Equal values are ignored.
    pub fn set(&self, value: T) {
        {
            let mut current = self.inner.value.borrow_mut();
            if *current == value {
                return;
            }
            *current = value;
        }
        self.changed();
    }

    /// Mutate the value in place. Notifies only if the result differs.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        {
            let mut current = self.inner.value.borrow_mut();
            let before = current.clone();
            f(&mut current);
            if *current == before {
                return;
            }
        }
        self.changed();
    }

    /// Number of effective writes so far.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.version.get()
    }

    /// Call `callback` with the new value after every effective write.
    ///
    /// Inside a batch the call happens once, when the batch closes.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let callback: Rc<Callback<T>> = Rc::new(callback);
        self.inner
            .subscribers
            .borrow_mut()
            .push(Rc::downgrade(&callback));
        Subscription {
            _callback: Box::new(callback),
        }
    }

    /// Live subscriber count.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner
            .subscribers
            .borrow()
            .iter()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }

    fn changed(&self) {
        self.inner.version.set(self.inner.version.get() + 1);
        let key = Rc::as_ptr(&self.inner) as *const () as usize;
        let inner = Rc::clone(&self.inner);
        batch::notify_or_defer(key, move || inner.notify());
    }
}

/// Keeps a subscriber callback alive. Dropping it detaches the callback.
#[must_use = "dropping a Subscription detaches its callback immediately"]
pub struct Subscription {
    _callback: Box<dyn Any>,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish()
    }
}
