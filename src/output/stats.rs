//! Counters collected while the crawl runs
//!
//! These never influence the outcome; they are logged once at the end.

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStatistics {
    /// URLs for which a request was issued
    pub pages_fetched: usize,

    /// In-scope HTML pages parsed for links and ids
    pub pages_parsed: usize,

    /// Links discovered on parsed pages (after scheme filtering)
    pub links_discovered: usize,

    /// In-scope redirects whose target was admitted
    pub redirects_followed: usize,

    /// Redirects leaving the root, dropped silently
    pub redirects_dropped: usize,

    /// Off-root URLs that passed an existence check
    pub external_checked: usize,

    /// Off-root links skipped because external checking is disabled
    pub external_skipped: usize,

    /// Total problems in the final report
    pub problems: usize,
}

impl CrawlStatistics {
    /// Logs the counters at info level
    pub fn log_summary(&self) {
        tracing::info!(
            "Fetched {} URLs ({} pages parsed, {} links found)",
            self.pages_fetched,
            self.pages_parsed,
            self.links_discovered
        );
        tracing::info!(
            "Redirects: {} followed, {} off-site dropped; external: {} checked, {} skipped",
            self.redirects_followed,
            self.redirects_dropped,
            self.external_checked,
            self.external_skipped
        );
        tracing::info!("Problems found: {}", self.problems);
    }
}
