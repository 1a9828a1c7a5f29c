//! State module for tracking one crawl run
//!
//! # Components
//!
//! - `UrlFragmentKey`: identity of a "does this anchor exist" question
//! - `AdmissionState`: the crawled set and required fragments, shared by
//!   everything that admits URLs and therefore kept behind the frontier lock
//! - `CrawlSession`: link sources, observed fragments, problems and counters,
//!   owned by the dispatcher alone

mod admission;
mod fragment;
mod session;

// Re-export main types
pub use admission::AdmissionState;
pub use fragment::UrlFragmentKey;
pub use session::CrawlSession;
