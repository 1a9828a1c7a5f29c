//! The crawl frontier
//!
//! Admission is the only operation shared between execution contexts. The
//! check-insert-count sequence runs under one lock; the hand-off to the
//! queue happens after the lock is released and never blocks, because the
//! queue is unbounded. That lets the dispatcher admit links it finds while
//! it is itself the only consumer of the queue.

use crate::crawler::completion::CompletionTracker;
use crate::state::{AdmissionState, UrlFragmentKey};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Receiving end of the frontier, drained by the dispatcher
pub type FrontierReceiver = UnboundedReceiver<String>;

/// Admission gate plus work queue
#[derive(Debug)]
pub struct Frontier {
    state: Mutex<AdmissionState>,
    queue: UnboundedSender<String>,
    tracker: CompletionTracker,
}

impl Frontier {
    /// Creates an empty frontier and the receiver that drains it
    pub fn new() -> (Self, FrontierReceiver) {
        let (queue, receiver) = mpsc::unbounded_channel();
        let frontier = Self {
            state: Mutex::new(AdmissionState::new()),
            queue,
            tracker: CompletionTracker::new(),
        };
        (frontier, receiver)
    }

    /// Admits `url` (possibly carrying a `#fragment`) referenced by `referrer`
    ///
    /// A non-empty fragment is always recorded as needed. The fragment-stripped
    /// URL is queued for fetching only the first time it is seen; the return
    /// value says whether that happened.
    pub fn admit(&self, url: &str, referrer: &str) -> bool {
        let admitted = {
            let mut state = self.lock_state();
            let admitted = state.record(url, referrer);
            if admitted.is_some() {
                self.tracker.url_queued();
            }
            admitted
        };

        let Some(url) = admitted else {
            return false;
        };

        tracing::trace!("Admitted {}", url);
        if let Err(mpsc::error::SendError(url)) = self.queue.send(url) {
            // Receiver is gone; nothing will ever fetch this.
            tracing::warn!("Frontier closed, dropping {}", url);
            self.tracker.url_completed();
        }
        true
    }

    /// Outstanding-work tracker shared with the dispatcher
    pub fn tracker(&self) -> &CompletionTracker {
        &self.tracker
    }

    /// Number of distinct URLs admitted so far
    pub fn crawled_count(&self) -> usize {
        self.lock_state().crawled_count()
    }

    /// Returns true if `url` (fragment-stripped) has been admitted
    pub fn is_crawled(&self, url: &str) -> bool {
        self.lock_state().is_crawled(url)
    }

    /// Moves the required fragments out for reconciliation
    pub fn take_needed_fragments(&self) -> HashMap<UrlFragmentKey, Vec<String>> {
        self.lock_state().take_needed_fragments()
    }

    fn lock_state(&self) -> MutexGuard<'_, AdmissionState> {
        // The state is plain sets and maps; a panic elsewhere leaves it usable.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
