use crate::ConfigError;
use serde::Deserialize;

/// Main configuration structure for Anchorwatch
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

/// Crawl scope configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Root URL; pages under this prefix are fully crawled
    #[serde(default)]
    pub root: Option<String>,

    /// Whether links leaving the root are existence-checked or skipped
    #[serde(rename = "external-links", default = "default_external_links")]
    pub external_links: bool,
}

/// HTTP transport configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Whole-request timeout in seconds
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// TCP connect timeout in seconds
    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

fn default_external_links() -> bool {
    true
}

fn default_user_agent() -> String {
    format!("anchorwatch/{}", env!("CARGO_PKG_VERSION"))
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            root: None,
            external_links: default_external_links(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl Config {
    /// Builds a default configuration crawling from `root`
    pub fn for_root(root: impl Into<String>) -> Self {
        let mut config = Self::default();
        config.crawler.root = Some(root.into());
        config
    }

    /// Returns the configured root URL, or an error if none was given
    pub fn root(&self) -> Result<&str, ConfigError> {
        self.crawler
            .root
            .as_deref()
            .ok_or_else(|| ConfigError::Validation("no root URL configured".to_string()))
    }
}
