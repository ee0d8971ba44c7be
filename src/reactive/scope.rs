#![forbid(unsafe_code)]

//! Lifetime management for groups of subscriptions.

use super::signal::{Signal, Subscription};

/// Collects the subscriptions of one consumer (a view, a handler, a test).
///
/// Dropping the scope releases everything it holds.
#[derive(Default)]
pub struct SubscriptionScope {
    subscriptions: Vec<Subscription>,
}

impl SubscriptionScope {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep an existing subscription alive for the scope's lifetime.
    pub fn hold(&mut self, sub: Subscription) {
        self.subscriptions.push(sub);
    }

    /// Subscribe to `source` for the scope's lifetime.
    pub fn subscribe<T: Clone + PartialEq + 'static>(
        &mut self,
        source: &Signal<T>,
        callback: impl Fn(&T) + 'static,
    ) -> &mut Self {
        self.subscriptions.push(source.subscribe(callback));
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Release every subscription now; the scope stays usable.
    pub fn clear(&mut self) {
        self.subscriptions.clear();
    }
}

impl std::fmt::Debug for SubscriptionScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionScope")
            .field("len", &self.subscriptions.len())
            .finish()
    }
}
