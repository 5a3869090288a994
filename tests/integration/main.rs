//! Integration tests for the crawler
//!
//! These tests use wiremock to serve a small app catalog and drive the real
//! HTTP fetcher, scheduler and JSON-lines output end-to-end.

mod crawl_tests;
mod lookup_tests;

use market_crawler::config::Config;
use wiremock::MockServer;

/// Catalog base path served by the mock server
pub fn catalog_base(server: &MockServer) -> String {
    format!("{}/store/apps", server.uri())
}

/// Configuration crawling the mock catalog from its front page
pub fn test_config(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.catalog.base_url = catalog_base(server);
    config.crawler.seed_url = format!("{}/", catalog_base(server));
    config.crawler.concurrency = 4;
    config.http.timeout_secs = 5;
    config
}

/// A detail page with a title, a price and the given outbound links
pub fn detail_page(name: &str, price: &str, links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<a href="{}">link</a>"#, href))
        .collect();

    format!(
        r#"<html><body><div class="apps details-page">
            <h1 class="doc-banner-title">{}</h1>
            <a class="doc-header-link" href="/developer?pub=Acme">Acme</a>
            <span class="buy-button-price">{}</span>
            {}
        </div></body></html>"#,
        name, price, anchors
    )
}

/// A page with only the given outbound links
pub fn link_page(banner: Option<&str>, links: &[&str]) -> String {
    let banner = banner
        .map(|text| format!(r#"<h1 class="page-banner-text">{}</h1>"#, text))
        .unwrap_or_default();
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<a href="{}">link</a>"#, href))
        .collect();

    format!("<html><body>{}{}</body></html>", banner, anchors)
}
