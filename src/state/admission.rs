use crate::state::UrlFragmentKey;
use crate::url::split_fragment;
use std::collections::{HashMap, HashSet};

/// Bookkeeping behind URL admission
///
/// A URL enters the crawled set exactly once, when it is first admitted.
/// Every non-empty fragment seen on the way in is remembered together with
/// the page that asked for it.
#[derive(Debug, Default)]
pub struct AdmissionState {
    crawled: HashSet<String>,
    needed_fragments: HashMap<UrlFragmentKey, Vec<String>>,
}

impl AdmissionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one reference to `url` coming from `referrer`
    ///
    /// Returns the fragment-stripped URL when this is its first admission,
    /// `None` when it was admitted before.
    pub fn record(&mut self, url: &str, referrer: &str) -> Option<String> {
        let (base, fragment) = split_fragment(url);

        if let Some(fragment) = fragment.filter(|f| !f.is_empty()) {
            self.needed_fragments
                .entry(UrlFragmentKey::new(base, fragment))
                .or_default()
                .push(referrer.to_string());
        }

        if self.crawled.contains(base) {
            return None;
        }

        self.crawled.insert(base.to_string());
        Some(base.to_string())
    }

    /// Returns true if `url` (fragment-stripped) has been admitted
    pub fn is_crawled(&self, url: &str) -> bool {
        self.crawled.contains(url)
    }

    /// Number of distinct URLs admitted so far
    pub fn crawled_count(&self) -> usize {
        self.crawled.len()
    }

    /// Fragments referenced so far, with the pages that referenced them
    pub fn needed_fragments(&self) -> &HashMap<UrlFragmentKey, Vec<String>> {
        &self.needed_fragments
    }

    /// Moves the required fragments out for reconciliation
    pub fn take_needed_fragments(&mut self) -> HashMap<UrlFragmentKey, Vec<String>> {
        std::mem::take(&mut self.needed_fragments)
    }
}
