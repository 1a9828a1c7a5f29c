//! Anchorwatch: a site-scoped broken-link and anchor validator
//!
//! This crate crawls every page reachable from a root URL, checks that each
//! linked URL answers with a successful response, and verifies that every
//! `#fragment` reference points at an element id present on the target page.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for run-aborting failures
///
/// Failures of individual URLs never surface here; they are recorded as
/// [`output::Problem`] values and the crawl carries on.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

// Re-export commonly used types
pub use config::Config;
pub use crawler::{run_check, Coordinator};
pub use output::{CrawlReport, Problem};
pub use crate::url::{normalize_url, Scope};
