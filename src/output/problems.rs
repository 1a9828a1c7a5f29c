use std::fmt;

/// One reported failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Problem {
    /// A URL could not be fetched, answered with an error status, or
    /// returned a response that could not be processed
    Fetch {
        url: String,
        message: String,
        referrers: Vec<String>,
    },

    /// A `#fragment` was linked to but no element with that id was found
    MissingFragment {
        url: String,
        fragment: String,
        referrers: Vec<String>,
    },
}

impl Problem {
    /// The URL the problem is about
    pub fn url(&self) -> &str {
        match self {
            Self::Fetch { url, .. } | Self::MissingFragment { url, .. } => url,
        }
    }

    /// Pages that linked to the failing URL or fragment
    pub fn referrers(&self) -> &[String] {
        match self {
            Self::Fetch { referrers, .. } | Self::MissingFragment { referrers, .. } => referrers,
        }
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch {
                url,
                message,
                referrers,
            } => write!(
                f,
                "Error on {}: {} (from [{}])",
                url,
                message,
                referrers.join(", ")
            ),
            Self::MissingFragment {
                url,
                fragment,
                referrers,
            } => write!(
                f,
                "Missing fragment #{} on {} (from [{}])",
                fragment,
                url,
                referrers.join(", ")
            ),
        }
    }
}

/// Append-only list of problems in the order they were recorded
#[derive(Debug, Clone, Default)]
pub struct ProblemLog {
    entries: Vec<Problem>,
}

impl ProblemLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, problem: Problem) {
        self.entries.push(problem);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Problem> {
        self.entries.iter()
    }

    pub fn into_vec(self) -> Vec<Problem> {
        self.entries
    }
}
