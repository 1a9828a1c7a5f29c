//! Integration tests for the checker
//!
//! These tests use wiremock to create mock HTTP servers and run the full
//! admit / fetch / extract / reconcile cycle end-to-end.

use anchorwatch::config::Config;
use anchorwatch::crawler::run_check;
use anchorwatch::{CrawlReport, Problem};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// An HTML page response
fn page(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.to_string(), "text/html; charset=utf-8")
}

/// Mounts `template` for GET `route`, expecting exactly `times` hits
async fn mount(server: &MockServer, route: &str, template: ResponseTemplate, times: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(template)
        .expect(times)
        .mount(server)
        .await;
}

async fn check(config: Config) -> CrawlReport {
    tokio::time::timeout(Duration::from_secs(30), run_check(config))
        .await
        .expect("crawl did not terminate")
        .expect("crawl failed to start")
}

fn lines(report: &CrawlReport) -> Vec<String> {
    report.problems().iter().map(ToString::to_string).collect()
}

#[tokio::test]
async fn test_each_url_fetched_at_most_once() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount(
        &server,
        "/docs/",
        page(
            r##"<a href="/docs/a">A</a>
                <a href="/docs/a#one">A one</a>
                <a href="/docs/b">B</a>
                <p id="home"></p>"##,
        ),
        1,
    )
    .await;
    mount(
        &server,
        "/docs/a",
        page(
            r##"<h2 id="one">One</h2><h2 id="two">Two</h2>
                <a href="/docs/b#x">B x</a>
                <a href="/docs/#home">Home</a>"##,
        ),
        1,
    )
    .await;
    mount(
        &server,
        "/docs/b",
        page(
            r##"<span id="x"></span>
                <a href="/docs/a#two">A two</a>
                <a href="/docs/">Docs</a>"##,
        ),
        1,
    )
    .await;

    let report = check(Config::for_root(format!("{}/docs/", base))).await;

    assert!(report.is_success(), "{:?}", lines(&report));
    assert_eq!(report.stats().pages_fetched, 3);
    assert_eq!(report.stats().pages_parsed, 3);
}

#[tokio::test]
async fn test_missing_fragment_is_reported() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount(
        &server,
        "/",
        page(r##"<a href="/guide#install">Install</a><a href="/guide#usage">Usage</a>"##),
        1,
    )
    .await;
    mount(&server, "/guide", page(r#"<h1 id="usage">Usage</h1>"#), 1).await;

    let report = check(Config::for_root(format!("{}/", base))).await;

    assert!(!report.is_success());
    assert_eq!(
        report.problems(),
        &[Problem::MissingFragment {
            url: format!("{}/guide", base),
            fragment: "install".to_string(),
            referrers: vec![format!("{}/", base)],
        }]
    );
    assert_eq!(
        lines(&report),
        vec![format!(
            "Missing fragment #install on {}/guide (from [{}/])",
            base, base
        )]
    );
}

#[tokio::test]
async fn test_not_found_names_every_referrer() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount(
        &server,
        "/",
        page(r#"<a href="/one">One</a><a href="/two">Two</a><a href="/gone">Gone</a>"#),
        1,
    )
    .await;
    mount(&server, "/one", page(r#"<a href="/gone">Gone</a>"#), 1).await;
    mount(&server, "/two", page(r#"<a href="/gone#section">Gone</a>"#), 1).await;
    mount(&server, "/gone", ResponseTemplate::new(404), 1).await;

    let report = check(Config::for_root(format!("{}/", base))).await;

    let fetch_problems: Vec<&Problem> = report
        .problems()
        .iter()
        .filter(|p| matches!(p, Problem::Fetch { .. }))
        .collect();
    assert_eq!(fetch_problems.len(), 1);

    let problem = fetch_problems[0];
    assert_eq!(problem.url(), format!("{}/gone", base));
    assert!(problem.to_string().contains("404 Not Found"));
    for referrer in ["/", "/one", "/two"] {
        let referrer = format!("{}{}", base, referrer);
        assert!(
            problem.referrers().contains(&referrer),
            "{} missing from {:?}",
            referrer,
            problem.referrers()
        );
    }

    // The fragment on the dead page can never be found either.
    assert!(report.problems().iter().any(|p| matches!(
        p,
        Problem::MissingFragment { fragment, .. } if fragment == "section"
    )));
}

#[tokio::test]
async fn test_referrer_parsed_after_failure_is_listed() {
    let server = MockServer::start().await;
    let base = server.uri();

    // "/gone" is queued ahead of "/one", so it fails before "/one" is parsed.
    mount(
        &server,
        "/",
        page(r#"<a href="/gone">Gone</a><a href="/one">One</a>"#),
        1,
    )
    .await;
    mount(&server, "/one", page(r#"<a href="/gone">Gone</a>"#), 1).await;
    mount(&server, "/gone", ResponseTemplate::new(404), 1).await;

    let report = check(Config::for_root(format!("{}/", base))).await;

    assert_eq!(
        lines(&report),
        vec![format!(
            "Error on {}/gone: 404 Not Found (from [{}/, {}/one])",
            base, base, base
        )]
    );
}

#[tokio::test]
async fn test_off_root_redirect_is_dropped() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount(&server, "/docs/", page(r#"<a href="/docs/moved">Moved</a>"#), 1).await;
    mount(
        &server,
        "/docs/moved",
        ResponseTemplate::new(301).insert_header("location", "/elsewhere"),
        1,
    )
    .await;
    mount(&server, "/elsewhere", ResponseTemplate::new(404), 0).await;

    let report = check(Config::for_root(format!("{}/docs/", base))).await;

    assert!(report.is_success(), "{:?}", lines(&report));
    assert_eq!(report.stats().redirects_dropped, 1);
    assert_eq!(report.stats().pages_fetched, 2);
}

#[tokio::test]
async fn test_in_scope_redirect_is_followed_once() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount(
        &server,
        "/",
        page(r#"<a href="/old">Old</a><a href="/new">New</a>"#),
        1,
    )
    .await;
    mount(
        &server,
        "/old",
        ResponseTemplate::new(302).insert_header("location", "/new#top"),
        1,
    )
    .await;
    mount(&server, "/new", page(r#"<div id="top"></div>"#), 1).await;

    let report = check(Config::for_root(format!("{}/", base))).await;

    assert!(report.is_success(), "{:?}", lines(&report));
    assert_eq!(report.stats().redirects_followed, 1);
}

#[tokio::test]
async fn test_redirect_to_dead_page_names_redirecting_url() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount(&server, "/", page(r#"<a href="/old">Old</a>"#), 1).await;
    mount(
        &server,
        "/old",
        ResponseTemplate::new(301).insert_header("location", "/dead"),
        1,
    )
    .await;
    mount(&server, "/dead", ResponseTemplate::new(410), 1).await;

    let report = check(Config::for_root(format!("{}/", base))).await;

    assert_eq!(
        lines(&report),
        vec![format!(
            "Error on {}/dead: 410 Gone (from [{}/old])",
            base, base
        )]
    );
}

#[tokio::test]
async fn test_external_links_skipped_when_disabled() {
    let site = MockServer::start().await;
    let external = MockServer::start().await;

    mount(
        &site,
        "/",
        page(&format!(
            r#"<a href="{}/broken">External</a>"#,
            external.uri()
        )),
        1,
    )
    .await;
    mount(&external, "/broken", ResponseTemplate::new(500), 0).await;

    let mut config = Config::for_root(format!("{}/", site.uri()));
    config.crawler.external_links = false;
    let report = check(config).await;

    assert!(report.is_success(), "{:?}", lines(&report));
    assert_eq!(report.stats().external_skipped, 1);
}

#[tokio::test]
async fn test_external_links_are_existence_checked() {
    let site = MockServer::start().await;
    let external = MockServer::start().await;

    mount(
        &site,
        "/",
        page(&format!(
            r#"<a href="{ext}/fine">Fine</a><a href="{ext}/broken">Broken</a>"#,
            ext = external.uri()
        )),
        1,
    )
    .await;
    mount(
        &external,
        "/fine",
        page(r#"<a href="/deeper">not followed</a>"#),
        1,
    )
    .await;
    mount(&external, "/deeper", page(""), 0).await;
    mount(&external, "/broken", ResponseTemplate::new(503), 1).await;

    let report = check(Config::for_root(format!("{}/", site.uri()))).await;

    assert_eq!(
        lines(&report),
        vec![format!(
            "Error on {}/broken: 503 Service Unavailable (from [{}/])",
            external.uri(),
            site.uri()
        )]
    );
    assert_eq!(report.stats().external_checked, 1);
}

#[tokio::test]
async fn test_content_type_handling() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount(
        &server,
        "/",
        page(r#"<a href="/logo.png">Logo</a><a href="/raw">Raw</a>"#),
        1,
    )
    .await;
    mount(
        &server,
        "/logo.png",
        ResponseTemplate::new(200).set_body_raw(vec![0x89u8, 0x50, 0x4e, 0x47], "image/png"),
        1,
    )
    .await;
    mount(&server, "/raw", ResponseTemplate::new(200), 1).await;

    let report = check(Config::for_root(format!("{}/", base))).await;

    assert_eq!(
        lines(&report),
        vec![format!(
            "Error on {}/raw: No Content-Type set (from [{}/])",
            base, base
        )]
    );
}

#[tokio::test]
async fn test_special_schemes_are_skipped() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount(
        &server,
        "/",
        page(
            r#"<a href="javascript:void(0)">JS</a>
               <a href="mailto:someone@example.com">Mail</a>
               <a href="tel:+123">Call</a>"#,
        ),
        1,
    )
    .await;

    let report = check(Config::for_root(format!("{}/", base))).await;

    assert!(report.is_success(), "{:?}", lines(&report));
    assert_eq!(report.stats().pages_fetched, 1);
    assert_eq!(report.stats().links_discovered, 0);
}

#[tokio::test]
async fn test_network_error_does_not_abort_crawl() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount(
        &server,
        "/",
        page(r#"<a href="http://127.0.0.1:1/">Dead host</a><a href="/next">Next</a>"#),
        1,
    )
    .await;
    mount(&server, "/next", page(""), 1).await;

    let report = check(Config::for_root(format!("{}/", base))).await;

    assert_eq!(report.problems().len(), 1);
    assert_eq!(report.problems()[0].url(), "http://127.0.0.1:1/");
    assert_eq!(report.stats().pages_fetched, 3);
}

#[tokio::test]
async fn test_repeated_runs_report_same_problems() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(page(
            r##"<a href="/a#nope">A</a><a href="/b">B</a><a href="/c#gone">C</a>"##,
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(page(r#"<a href="/b">B</a>"#))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let first = check(Config::for_root(format!("{}/", base))).await;
    let second = check(Config::for_root(format!("{}/", base))).await;

    let mut first_lines = lines(&first);
    let mut second_lines = lines(&second);
    first_lines.sort();
    second_lines.sort();

    assert_eq!(first_lines, second_lines);
    // /b 404, /c 404, #nope on /a, #gone on /c
    assert_eq!(first_lines.len(), 4);
}
