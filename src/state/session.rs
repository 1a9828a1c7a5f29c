use crate::output::{reconcile_fragments, CrawlReport, CrawlStatistics, Problem, ProblemLog};
use crate::state::UrlFragmentKey;
use std::collections::{HashMap, HashSet};

/// Per-run state owned by the dispatcher
///
/// Only the dispatcher touches this, one fetch at a time, so none of it is
/// synchronized. Everything here lives for exactly one crawl run.
#[derive(Debug, Default)]
pub struct CrawlSession {
    /// Normalized URL (no fragment) -> pages linking to it, in discovery order
    link_sources: HashMap<String, Vec<String>>,

    /// Ids observed on in-scope HTML pages
    fragment_exists: HashSet<UrlFragmentKey>,

    problems: ProblemLog,

    stats: CrawlStatistics,
}

impl CrawlSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notes that `source` links to `target`
    pub fn add_link_source(&mut self, target: &str, source: &str) {
        self.link_sources
            .entry(target.to_string())
            .or_default()
            .push(source.to_string());
    }

    /// Pages known to link to `url`
    pub fn sources(&self, url: &str) -> &[String] {
        self.link_sources
            .get(url)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Marks `#id` as present on `url`
    pub fn mark_fragment(&mut self, url: &str, id: &str) {
        self.fragment_exists.insert(UrlFragmentKey::new(url, id));
    }

    /// Returns true if `key` was observed as an element id
    pub fn fragment_exists(&self, key: &UrlFragmentKey) -> bool {
        self.fragment_exists.contains(key)
    }

    /// Records a fetch-time problem on `url`
    ///
    /// The referrers captured here are only those known so far; `finish`
    /// fills in the complete list once every page has been parsed.
    pub fn record_problem(&mut self, url: &str, message: impl Into<String>) {
        let problem = Problem::Fetch {
            url: url.to_string(),
            message: message.into(),
            referrers: self.sources(url).to_vec(),
        };
        tracing::warn!("{}", problem);
        self.problems.push(problem);
    }

    pub fn problems(&self) -> &ProblemLog {
        &self.problems
    }

    pub fn stats(&self) -> &CrawlStatistics {
        &self.stats
    }

    pub fn stats_mut(&mut self) -> &mut CrawlStatistics {
        &mut self.stats
    }

    /// Closes the session once the crawl has drained
    ///
    /// Appends a problem for every needed fragment that was never observed,
    /// then hands everything over as the final report.
    pub fn finish(mut self, needed: HashMap<UrlFragmentKey, Vec<String>>) -> CrawlReport {
        let mut problems = ProblemLog::new();
        for mut problem in std::mem::take(&mut self.problems).into_vec() {
            if let Problem::Fetch { url, referrers, .. } = &mut problem {
                *referrers = self.sources(url).to_vec();
            }
            problems.push(problem);
        }
        for problem in reconcile_fragments(needed, &self.fragment_exists) {
            problems.push(problem);
        }
        self.problems = problems;
        self.stats.problems = self.problems.len();
        CrawlReport::new(self.problems, self.stats)
    }
}
