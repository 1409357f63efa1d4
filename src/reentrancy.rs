//! Debug-only tracking of the map operation in progress.
//!
//! The map calls user code (`K: Hash`, `K: Eq`, value constructors) while
//! its table may be mid-update. Each public operation records its name in
//! an `OpTracker` for its duration; if user code calls back into the same
//! map, the nested operation panics with both names. Release builds keep no
//! state and never panic.

use core::cell::Cell;
use core::marker::PhantomData;

#[derive(Debug)]
pub(crate) struct OpTracker {
    #[cfg(debug_assertions)]
    running: Cell<Option<&'static str>>,
    // !Sync in every profile, not only when the Cell is present.
    _not_sync: PhantomData<Cell<()>>,
}

impl OpTracker {
    pub(crate) fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            running: Cell::new(None),
            _not_sync: PhantomData,
        }
    }

    /// Record `op` as running until the returned `ActiveOp` is dropped.
    #[inline]
    pub(crate) fn begin(&self, op: &'static str) -> ActiveOp<'_> {
        #[cfg(debug_assertions)]
        if let Some(outer) = self.running.replace(Some(op)) {
            self.running.set(Some(outer));
            panic!("reentrancy detected: `{op}` called from user code while `{outer}` was running");
        }
        #[cfg(not(debug_assertions))]
        let _ = op;

        ActiveOp {
            #[cfg(debug_assertions)]
            tracker: self,
            _scope: PhantomData,
        }
    }

    #[cfg(all(test, debug_assertions))]
    pub(crate) fn running(&self) -> Option<&'static str> {
        self.running.get()
    }
}

impl Default for OpTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Clears the running operation on drop, including during unwinding.
pub(crate) struct ActiveOp<'a> {
    #[cfg(debug_assertions)]
    tracker: &'a OpTracker,
    _scope: PhantomData<&'a OpTracker>,
}

impl Drop for ActiveOp<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        self.tracker.running.set(None);
    }
}
