//! Outstanding-work tracking for crawl termination
//!
//! Every admitted URL bumps the counter; the dispatcher drops it once that
//! URL's fetch and all of its side effects are done. The crawl is over when
//! the counter returns to zero.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// Counting tracker that can be awaited until it drains
#[derive(Debug, Clone, Default)]
pub struct CompletionTracker {
    pending: Arc<AtomicUsize>,
    drained: Arc<Notify>,
}

impl CompletionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one more admitted URL
    pub fn url_queued(&self) {
        self.pending.fetch_add(1, Ordering::SeqCst);
    }

    /// Marks one admitted URL as fully processed
    pub fn url_completed(&self) {
        let previous = self.pending.fetch_sub(1, Ordering::SeqCst);
        debug_assert!(previous > 0, "url_completed called with nothing pending");
        if previous == 1 {
            self.drained.notify_waiters();
        }
    }

    /// URLs admitted but not yet fully processed
    pub fn pending_count(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    pub fn is_complete(&self) -> bool {
        self.pending_count() == 0
    }

    /// Resolves once nothing is pending
    ///
    /// Returns immediately if the counter is already zero.
    pub async fn wait_for_completion(&self) {
        loop {
            // Registered before the check so a concurrent drain is not missed.
            let notified = self.drained.notified();
            if self.is_complete() {
                return;
            }
            notified.await;
        }
    }
}
