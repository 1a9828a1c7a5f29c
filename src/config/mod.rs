//! Configuration module for Anchorwatch
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every setting has a default except the crawl root, which may also be given
//! on the command line.
//!
//! # Example
//!
//! ```no_run
//! use anchorwatch::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("anchorwatch.toml")).unwrap();
//! println!("Checking external links: {}", config.crawler.external_links);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, HttpConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
