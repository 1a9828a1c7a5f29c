use crate::output::{CrawlStatistics, Problem, ProblemLog};
use crate::state::UrlFragmentKey;
use std::collections::{HashMap, HashSet};
use std::io::Write;

/// Final outcome of one crawl run
#[derive(Debug, Clone)]
pub struct CrawlReport {
    problems: Vec<Problem>,
    stats: CrawlStatistics,
}

impl CrawlReport {
    pub fn new(problems: ProblemLog, stats: CrawlStatistics) -> Self {
        Self {
            problems: problems.into_vec(),
            stats,
        }
    }

    /// Every problem, fetch-time ones first, missing fragments last
    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    pub fn stats(&self) -> &CrawlStatistics {
        &self.stats
    }

    /// True when the run found nothing wrong
    pub fn is_success(&self) -> bool {
        self.problems.is_empty()
    }

    /// Writes one line per problem, in recorded order
    pub fn write_to<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        for problem in &self.problems {
            writeln!(out, "{}", problem)?;
        }
        out.flush()
    }
}

/// Reports every needed fragment that was never observed as an element id
///
/// Results are sorted by URL then fragment so repeated runs print the same
/// lines in the same order.
pub fn reconcile_fragments(
    needed: HashMap<UrlFragmentKey, Vec<String>>,
    exists: &HashSet<UrlFragmentKey>,
) -> Vec<Problem> {
    let mut missing: Vec<(UrlFragmentKey, Vec<String>)> = needed
        .into_iter()
        .filter(|(key, _)| !exists.contains(key))
        .collect();
    missing.sort_by(|a, b| a.0.cmp(&b.0));

    missing
        .into_iter()
        .map(|(key, referrers)| Problem::MissingFragment {
            url: key.url,
            fragment: key.fragment,
            referrers,
        })
        .collect()
}
