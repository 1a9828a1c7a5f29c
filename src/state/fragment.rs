use std::fmt;

/// A fragment-stripped normalized URL paired with one of its fragments
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UrlFragmentKey {
    /// Normalized URL without the `#fragment` part
    pub url: String,

    /// Fragment name, without the leading `#`
    pub fragment: String,
}

impl UrlFragmentKey {
    pub fn new(url: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            fragment: fragment.into(),
        }
    }
}

impl fmt::Display for UrlFragmentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.url, self.fragment)
    }
}
