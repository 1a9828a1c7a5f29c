//! Output module for crawl results
//!
//! This module handles:
//! - Recording problems as the crawl finds them
//! - Reconciling required fragments against observed ids once the crawl drains
//! - Printing the final problem list and crawl statistics

mod problems;
mod report;
pub mod stats;

pub use problems::{Problem, ProblemLog};
pub use report::{reconcile_fragments, CrawlReport};
pub use stats::CrawlStatistics;
