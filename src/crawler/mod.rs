//! Crawler module for page fetching and link checking
//!
//! This module contains the core checking logic, including:
//! - HTTP fetching and response classification
//! - HTML parsing for link targets and element ids
//! - The frontier: at-most-once admission and the work queue
//! - Completion tracking and overall crawl coordination

mod completion;
mod coordinator;
mod fetcher;
mod frontier;
mod parser;

pub use completion::CompletionTracker;
pub use coordinator::{run_check, Coordinator};
pub use fetcher::{build_http_client, fetch_url, FetchResult};
pub use frontier::{Frontier, FrontierReceiver};
pub use parser::{parse_html, ParsedPage};
