//! Dependency capture for [`Computed`](super::Computed) evaluation.

use std::cell::RefCell;
use std::rc::Rc;

/// Something a computed value can depend on.
pub(crate) trait Source {
    /// Bring the source up to date and return its current version.
    fn refresh(&self) -> u64;
}

/// A source as it was when an evaluation read it.
pub(crate) struct Dependency {
    source: Rc<dyn Source>,
    version: u64,
}

impl Dependency {
    pub(crate) fn changed(&self) -> bool {
        self.source.refresh() != self.version
    }
}

thread_local! {
    static FRAMES: RefCell<Vec<Vec<Dependency>>> = const { RefCell::new(Vec::new()) };
}

/// Pops the frame it pushed, even if the evaluation unwinds.
struct FrameGuard;

impl FrameGuard {
    fn push() -> Self {
        FRAMES.with(|frames| frames.borrow_mut().push(Vec::new()));
        FrameGuard
    }

    fn finish(self) -> Vec<Dependency> {
        let deps = FRAMES.with(|frames| frames.borrow_mut().pop().unwrap_or_default());
        std::mem::forget(self);
        deps
    }
}

impl Drop for FrameGuard {
    fn drop(&mut self) {
        FRAMES.with(|frames| {
            frames.borrow_mut().pop();
        });
    }
}

/// Record a read of `source` at `version` into the innermost evaluation.
///
/// Reads outside any evaluation are not recorded.
pub(crate) fn record(source: Rc<dyn Source>, version: u64) {
    FRAMES.with(|frames| {
        if let Some(frame) = frames.borrow_mut().last_mut() {
            frame.push(Dependency { source, version });
        }
    });
}

/// Run `f` and return everything it read.
pub(crate) fn collect<T>(f: impl FnOnce() -> T) -> (T, Vec<Dependency>) {
    let guard = FrameGuard::push();
    let value = f();
    (value, guard.finish())
}

/// Run `f` without registering its reads as dependencies of the enclosing
/// computation.
pub fn untracked<T>(f: impl FnOnce() -> T) -> T {
    collect(f).0
}
