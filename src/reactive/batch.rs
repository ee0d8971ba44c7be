#![forbid(unsafe_code)]

//! Atomic batches of signal writes.
//!
//! Inside a batch every write is applied immediately, so code running in the
//! batch reads its own writes. Subscriber notifications are queued instead of
//! delivered. When the outermost batch exits the queue is flushed in the order
//! each signal was first written, one notification per signal.
//!
//! ```ignore
//! let in_cart = Signal::new(false);
//! let quantity = Signal::new(0);
//!
//! batch(|| {
//!     in_cart.set(true);
//!     quantity.update(|q| *q += 1);
//! });
//! // Subscribers of both cells ran here, after both writes.
//! ```

use std::cell::RefCell;
use std::marker::PhantomData;

type Notify = Box<dyn FnOnce()>;

#[derive(Default)]
struct BatchState {
    depth: usize,
    pending: Vec<(usize, Notify)>,
}

thread_local! {
    static BATCH: RefCell<BatchState> = RefCell::new(BatchState::default());
}

/// RAII guard that holds back notifications until it is dropped.
///
/// Scopes nest; only the outermost one flushes.
#[must_use = "notifications are released as soon as the scope is dropped"]
pub struct BatchScope {
    _not_send: PhantomData<*const ()>,
}

impl BatchScope {
    pub fn new() -> Self {
        BATCH.with(|state| state.borrow_mut().depth += 1);
        Self {
            _not_send: PhantomData,
        }
    }
}

impl Default for BatchScope {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for BatchScope {
    fn drop(&mut self) {
        let flush = BATCH.with(|state| {
            let mut state = state.borrow_mut();
            state.depth = state.depth.saturating_sub(1);
            if state.depth == 0 {
                std::mem::take(&mut state.pending)
            } else {
                Vec::new()
            }
        });

        // Half-applied batches are not announced while unwinding.
        if std::thread::panicking() {
            return;
        }
        for (_, notify) in flush {
            notify();
        }
    }
}

impl std::fmt::Debug for BatchScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchScope").finish()
    }
}

/// Run `f` as one atomic batch and return its result.
pub fn batch<R>(f: impl FnOnce() -> R) -> R {
    let _scope = BatchScope::new();
    f()
}

/// Whether a batch is currently open on this thread.
#[must_use]
pub fn is_batching() -> bool {
    BATCH.with(|state| state.borrow().depth > 0)
}

/// Deliver `notify` now, or queue it if a batch is open.
///
/// `key` identifies the notifying cell; a cell already queued in the current
/// batch is not queued twice.
pub(crate) fn notify_or_defer(key: usize, notify: impl FnOnce() + 'static) {
    let mut notify = Some(notify);
    BATCH.with(|state| {
        let mut state = state.borrow_mut();
        if state.depth == 0 {
            return;
        }
        if let Some(notify) = notify.take() {
            if !state.pending.iter().any(|(queued, _)| *queued == key) {
                let notify: Notify = Box::new(notify);
                state.pending.push((key, notify));
            }
        }
    });
    if let Some(notify) = notify {
        notify();
    }
}
