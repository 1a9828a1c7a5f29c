//! Crawler coordinator - the dispatcher
//!
//! This module contains the main check loop, which:
//! - Seeds the frontier with the normalized root
//! - Drains the frontier one URL at a time, never overlapping fetches
//! - Turns fetch results into admissions, link sources, fragment marks
//!   and problems
//! - Stops once every admitted URL has been processed, then reconciles
//!   fragments into the final report

use crate::config::{validate, Config};
use crate::crawler::fetcher::{build_http_client, fetch_url, FetchResult};
use crate::crawler::frontier::{Frontier, FrontierReceiver};
use crate::crawler::parser::parse_html;
use crate::output::CrawlReport;
use crate::state::CrawlSession;
use crate::url::{has_foreign_scheme, normalize_url, resolve_reference, split_fragment, Scope};
use crate::CheckError;
use reqwest::Client;
use url::Url;

/// Main crawl coordinator structure
///
/// Owns the session state outright; only the frontier is shared.
pub struct Coordinator {
    scope: Scope,
    external_links: bool,
    client: Client,
    frontier: Frontier,
    receiver: FrontierReceiver,
    session: CrawlSession,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(CheckError)` - Invalid configuration, malformed root, or the
    ///   HTTP client could not be built
    pub fn new(config: Config) -> Result<Self, CheckError> {
        validate(&config)?;
        let scope = Scope::new(config.root()?)?;
        let client = build_http_client(&config.http)?;
        let (frontier, receiver) = Frontier::new();

        Ok(Self {
            scope,
            external_links: config.crawler.external_links,
            client,
            frontier,
            receiver,
            session: CrawlSession::new(),
        })
    }

    /// The normalized crawl root
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Runs the crawl to completion and returns the report
    ///
    /// There is no deadline and no partial result: the loop ends when the
    /// outstanding counter returns to zero.
    pub async fn run(mut self) -> CrawlReport {
        tracing::info!("Starting check of {}", self.scope.as_str());

        let tracker = self.frontier.tracker().clone();
        let root = self.scope.as_str().to_string();
        self.frontier.admit(&root, "");

        loop {
            let next = tokio::select! {
                next = self.receiver.recv() => next,
                _ = tracker.wait_for_completion() => None,
            };
            let Some(url) = next else {
                break;
            };

            self.process_url(&url).await;
            tracker.url_completed();
        }

        self.receiver.close();
        tracing::info!(
            "Crawl drained after {} distinct URLs",
            self.frontier.crawled_count()
        );

        let needed = self.frontier.take_needed_fragments();
        let report = self.session.finish(needed);
        report.stats().log_summary();
        report
    }

    /// Fetches one admitted URL and applies its side effects
    async fn process_url(&mut self, url: &str) {
        tracing::info!("  Crawling {}", url);
        self.session.stats_mut().pages_fetched += 1;

        let in_scope = self.scope.contains(url);
        match fetch_url(&self.client, url, in_scope).await {
            FetchResult::Redirect { location } => self.handle_redirect(url, location),

            FetchResult::RedirectError { error } => {
                self.session
                    .record_problem(url, format!("resolving redirect: {}", error));
            }

            FetchResult::HttpError { status } => {
                self.session.record_problem(url, status.to_string());
            }

            FetchResult::External => {
                self.session.stats_mut().external_checked += 1;
            }

            FetchResult::MissingContentType => {
                self.session.record_problem(url, "No Content-Type set");
            }

            FetchResult::NotHtml { content_type } => {
                tracing::debug!("  {} is {}, not parsing", url, content_type);
            }

            FetchResult::Html { body } => self.handle_page(url, &body),

            FetchResult::NetworkError { error } => {
                self.session.record_problem(url, error);
            }
        }
    }

    /// Follows an in-scope redirect; off-site redirects are dropped silently
    fn handle_redirect(&mut self, url: &str, location: Url) {
        let target = match normalize_url(location.as_str()) {
            Ok(target) => String::from(target),
            Err(e) => {
                self.session
                    .record_problem(url, format!("resolving redirect: {}", e));
                return;
            }
        };

        if !self.scope.contains(&target) {
            tracing::debug!("  Skipping off-site redirect {} -> {}", url, target);
            self.session.stats_mut().redirects_dropped += 1;
            return;
        }

        tracing::debug!("  Redirect {} -> {}", url, target);
        self.session.stats_mut().redirects_followed += 1;
        let (base, _) = split_fragment(&target);
        self.session.add_link_source(base, url);
        self.frontier.admit(&target, url);
    }

    /// Admits every link on an in-scope HTML page and records its ids
    fn handle_page(&mut self, url: &str, body: &str) {
        let page = parse_html(body);
        self.session.stats_mut().pages_parsed += 1;

        for href in &page.links {
            tracing::debug!("  links to {}", href);
            if has_foreign_scheme(href) {
                continue;
            }
            self.session.stats_mut().links_discovered += 1;

            let dest = match resolve_reference(self.scope.root(), href)
                .and_then(|resolved| normalize_url(resolved.as_str()))
            {
                Ok(dest) => String::from(dest),
                Err(e) => {
                    self.session
                        .record_problem(url, format!("invalid link {:?}: {}", href, e));
                    continue;
                }
            };

            if !self.external_links && !self.scope.contains(&dest) {
                self.session.stats_mut().external_skipped += 1;
                continue;
            }

            let (base, _) = split_fragment(&dest);
            self.session.add_link_source(base, url);
            self.frontier.admit(&dest, url);
        }

        for id in &page.ids {
            tracing::debug!(" url {} has #{}", url, id);
            self.session.mark_fragment(url, id);
        }
    }
}

/// Runs a complete check operation
///
/// This is the main library entry point:
///
/// 1. Validate the configuration and normalize the root
/// 2. Build the HTTP client
/// 3. Crawl everything reachable from the root
/// 4. Reconcile fragments and return the report
///
/// # Example
///
/// ```no_run
/// use anchorwatch::config::Config;
/// use anchorwatch::crawler::run_check;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let report = run_check(Config::for_root("https://example.com/")).await?;
/// report.write_to(&mut std::io::stdout())?;
/// # Ok(())
/// # }
/// ```
pub async fn run_check(config: Config) -> Result<CrawlReport, CheckError> {
    let coordinator = Coordinator::new(config)?;
    Ok(coordinator.run().await)
}
