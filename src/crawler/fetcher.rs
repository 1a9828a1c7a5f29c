//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the checker, including:
//! - Building the HTTP client (redirects are never followed automatically)
//! - Issuing one GET per admitted URL
//! - Classifying the response for the dispatcher

use crate::config::HttpConfig;
use reqwest::header::{CONTENT_TYPE, LOCATION};
use reqwest::{redirect::Policy, Client, Response, StatusCode};
use std::time::Duration;
use url::Url;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// 3xx with a usable `Location`, resolved against the requested URL
    Redirect {
        /// Absolute redirect target
        location: Url,
    },

    /// 3xx whose `Location` is missing or unusable
    RedirectError {
        /// Error description
        error: String,
    },

    /// Any other non-2xx response
    HttpError {
        /// The HTTP status code
        status: StatusCode,
    },

    /// Off-root URL answered 2xx; existence confirmed, body not read
    External,

    /// In-root 2xx response without a Content-Type header, or with an empty one
    MissingContentType,

    /// In-root 2xx response that is not HTML
    NotHtml {
        /// The actual Content-Type received
        content_type: String,
    },

    /// In-root 2xx HTML page
    Html {
        /// Page body content
        body: String,
    },

    /// Request could not be sent or the body could not be read
    NetworkError {
        /// Error description
        error: String,
    },
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use anchorwatch::config::HttpConfig;
/// use anchorwatch::crawler::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .redirect(Policy::none()) // Handle redirects manually
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL once and classifies the response
///
/// # Classification
///
/// | Response | Result |
/// |----------|--------|
/// | 3xx with Location | Redirect |
/// | 3xx without usable Location | RedirectError |
/// | other non-2xx | HttpError |
/// | 2xx, `in_scope == false` | External |
/// | 2xx, no or empty Content-Type | MissingContentType |
/// | 2xx, not `text/html` | NotHtml |
/// | 2xx, `text/html` | Html |
/// | transport failure | NetworkError |
///
/// Nothing is retried.
pub async fn fetch_url(client: &Client, url: &str, in_scope: bool) -> FetchResult {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => return classify_transport_error(&e),
    };

    let status = response.status();

    if status.is_redirection() {
        return match redirect_target(url, &response) {
            Ok(location) => FetchResult::Redirect { location },
            Err(error) => FetchResult::RedirectError { error },
        };
    }

    if !status.is_success() {
        return FetchResult::HttpError { status };
    }

    if !in_scope {
        return FetchResult::External;
    }

    let Some(content_type) = response
        .headers()
        .get(CONTENT_TYPE)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).trim().to_string())
        .filter(|v| !v.is_empty())
    else {
        return FetchResult::MissingContentType;
    };

    if !is_html(&content_type) {
        return FetchResult::NotHtml { content_type };
    }

    match response.text().await {
        Ok(body) => FetchResult::Html { body },
        Err(e) => FetchResult::NetworkError {
            error: format!("reading body: {}", e),
        },
    }
}

/// Resolves the `Location` header of a redirect against the requested URL
fn redirect_target(url: &str, response: &Response) -> Result<Url, String> {
    let location = response
        .headers()
        .get(LOCATION)
        .ok_or_else(|| "no Location header in response".to_string())?
        .to_str()
        .map_err(|e| format!("invalid Location header: {}", e))?;

    let base = Url::parse(url).map_err(|e| e.to_string())?;
    base.join(location)
        .map_err(|e| format!("invalid Location header {:?}: {}", location, e))
}

/// Returns true if a Content-Type value denotes an HTML document
fn is_html(content_type: &str) -> bool {
    content_type
        .trim_start()
        .get(..9)
        .map_or(false, |head| head.eq_ignore_ascii_case("text/html"))
}

fn classify_transport_error(e: &reqwest::Error) -> FetchResult {
    let error = if e.is_timeout() {
        format!("request timed out: {}", e)
    } else if e.is_connect() {
        format!("connection failed: {}", e)
    } else {
        e.to_string()
    };
    FetchResult::NetworkError { error }
}
