use log::trace;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Shared accumulator counting the newly discovered pairs of a round.
///
/// Clones share the same underlying value, so a handle can be moved into every worker thread of the
/// runtime. Increments are plain atomic adds and can happen concurrently from any number of
/// threads; the final sum does not depend on the order in which groups are reduced.
#[derive(Clone, Debug, Default)]
pub struct ConvergenceCounter {
    value: Arc<AtomicU64>,
}

impl ConvergenceCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&self) {
        let previous = self.value.swap(0, Ordering::SeqCst);
        trace!("Convergence counter reset from {}", previous);
    }

    #[inline]
    pub fn increment(&self) {
        self.add(1);
    }

    #[inline]
    pub fn add(&self, amount: u64) {
        self.value.fetch_add(amount, Ordering::Relaxed);
    }

    pub fn value(&self) -> u64 {
        self.value.load(Ordering::SeqCst)
    }
}
