#![forbid(unsafe_code)]

//! Fine-grained reactive cells for the cart store.
//!
//! - [`Signal`]: a shared, version-tracked mutable cell with subscriber
//!   callbacks.
//! - [`Computed`]: a lazily evaluated, memoized value derived from whatever
//!   signals and other computeds it reads.
//! - [`Subscription`] / [`SubscriptionScope`]: RAII handles that detach
//!   callbacks on drop.
//! - [`batch`] / [`BatchScope`]: groups writes so subscribers only ever
//!   observe the state before or after the whole group.
//!
//! # Architecture
//!
//! Everything is single-threaded: cells are `Rc<..>` handles and the batch
//! and dependency-tracking contexts are thread-locals.
//!
//! Dependencies are discovered at evaluation time. While a `Computed`
//! evaluates, every `Signal::get` and nested `Computed::get` records the
//! source together with the version it had. On the next read the computed
//! asks each recorded source for its current version and re-evaluates only
//! if one of them moved. Nothing is recomputed on write.
//!
//! # Invariants
//!
//! 1. A signal's version increments exactly once per write that changes it.
//! 2. Writing a value equal to the current one is a no-op.
//! 3. `Computed::get()` never returns a value that disagrees with its inputs.
//! 4. A computed's version only moves when re-evaluation yields a different
//!    value, so downstream computeds skip work on no-op recomputations.
//! 5. Inside a batch, writes apply immediately but notifications are held
//!    back and coalesced (one per signal, carrying the final value) until the
//!    outermost batch exits.

pub mod batch;
pub mod computed;
pub mod scope;
pub mod signal;
mod tracking;

pub use batch::{BatchScope, batch, is_batching};
pub use computed::Computed;
pub use scope::SubscriptionScope;
pub use signal::{Signal, Subscription};
pub use tracking::untracked;
