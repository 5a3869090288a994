use crate::{detail_page, link_page, test_config};
use market_crawler::config::Config;
use market_crawler::crawler::crawl;
use market_crawler::output::{JsonLinesWriter, RecordSink};
use market_crawler::Record;
use serde_json::Value;
use std::collections::HashSet;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_page(server: &MockServer, page_path: &str, id: Option<(&str, &str)>, body: String) {
    let mut mock = Mock::given(method("GET")).and(path(page_path));
    if let Some((name, value)) = id {
        mock = mock.and(query_param(name, value));
    }
    mock.respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// Front page → a, b (404), Acme listing; a → c; Acme → c, d
async fn mount_catalog(server: &MockServer) {
    mount_page(
        server,
        "/store/apps/",
        None,
        link_page(
            None,
            &[
                "/details?id=com.a",
                "/details?id=com.b",
                "/developer?pub=Acme",
                "/details?id=com.a&reviewId=1",
            ],
        ),
    )
    .await;

    mount_page(
        server,
        "/store/apps/details",
        Some(("id", "com.a")),
        detail_page("App A", "$1.99", &["/details?id=com.c"]),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/store/apps/details"))
        .and(query_param("id", "com.b"))
        .respond_with(ResponseTemplate::new(404))
        .mount(server)
        .await;

    mount_page(
        server,
        "/store/apps/details",
        Some(("id", "com.c")),
        detail_page("App C", "Install", &["/details?id=com.a"]),
    )
    .await;

    mount_page(
        server,
        "/store/apps/developer",
        Some(("pub", "Acme")),
        link_page(
            Some("Apps by Acme"),
            &["/details?id=com.c", "/details?id=com.d"],
        ),
    )
    .await;

    mount_page(
        server,
        "/store/apps/details",
        Some(("id", "com.d")),
        detail_page("App D", "", &[]),
    )
    .await;
}

fn read_records(path: &std::path::Path) -> Vec<Value> {
    std::fs::read_to_string(path)
        .expect("Failed to read output")
        .lines()
        .map(|line| serde_json::from_str(line).expect("Invalid JSON line"))
        .collect()
}

#[tokio::test]
async fn test_full_crawl_to_json_lines() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("apps.jsonl");
    let mut writer = JsonLinesWriter::create(&output).unwrap();

    let stats = crawl(&test_config(&server), &mut writer)
        .await
        .expect("Crawl failed");

    assert_eq!(stats.records, 3);
    assert_eq!(stats.not_found, 1);
    assert_eq!(stats.failures, 0);
    assert_eq!(stats.fetched, 5);
    assert_eq!(stats.pending, 0);
    assert_eq!(writer.written(), 3);

    let records = read_records(&output);
    let ids: HashSet<&str> = records.iter().filter_map(|r| r["uid"].as_str()).collect();
    assert_eq!(ids, HashSet::from(["com.a", "com.c", "com.d"]));

    let app_a = records.iter().find(|r| r["uid"] == "com.a").unwrap();
    assert_eq!(app_a["name"], "App A");
    assert_eq!(app_a["is_free"], false);
    assert_eq!(app_a["price"], "1.99");
    assert!(app_a["dev_link"]
        .as_str()
        .unwrap()
        .ends_with("/store/apps/developer?pub=Acme"));

    let app_c = records.iter().find(|r| r["uid"] == "com.c").unwrap();
    assert_eq!(app_c["is_free"], true);
    assert_eq!(app_c["price"], 0);
}

#[tokio::test]
async fn test_every_page_fetched_once() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;

    let mut records: Vec<Record> = Vec::new();
    crawl(&test_config(&server), &mut records).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let mut seen = HashSet::new();
    for request in &requests {
        assert!(
            seen.insert(request.url.to_string()),
            "{} fetched twice",
            request.url
        );
    }
    assert_eq!(requests.len(), 6);
}

#[tokio::test]
async fn test_listings_not_followed_when_disabled() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;

    let mut config = test_config(&server);
    config.crawler.follow_listings = false;

    let mut records: Vec<Record> = Vec::new();
    let stats = crawl(&config, &mut records).await.unwrap();

    let ids: HashSet<&str> = records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, HashSet::from(["com.a", "com.c"]));
    assert_eq!(stats.records, 2);
}

#[tokio::test]
async fn test_locale_cookie_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/store/apps/"))
        .and(header("cookie", "hlSession2=fr"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(link_page(None, &["/details?id=com.a"])),
        )
        .mount(&server)
        .await;
    mount_page(
        &server,
        "/store/apps/details",
        Some(("id", "com.a")),
        detail_page("Appli A", "", &[]),
    )
    .await;

    let mut config = test_config(&server);
    config.catalog.locale = "fr".to_string();

    let mut records: Vec<Record> = Vec::new();
    crawl(&config, &mut records).await.unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "Appli A");
}

#[tokio::test]
async fn test_server_errors_counted_as_failures() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/store/apps/",
        None,
        link_page(None, &["/details?id=com.a", "/details?id=com.e"]),
    )
    .await;
    mount_page(
        &server,
        "/store/apps/details",
        Some(("id", "com.a")),
        detail_page("App A", "", &[]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/store/apps/details"))
        .and(query_param("id", "com.e"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut records: Vec<Record> = Vec::new();
    let stats = crawl(&test_config(&server), &mut records).await.unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(stats.failures, 1);
    assert_eq!(stats.not_found, 0);
}

#[tokio::test]
async fn test_unreachable_seed_ends_crawl() {
    let mut config = Config::default();
    config.catalog.base_url = "http://127.0.0.1:1/store/apps".to_string();
    config.crawler.seed_url = "http://127.0.0.1:1/store/apps/".to_string();
    config.http.connect_timeout_secs = 1;

    let mut records: Vec<Record> = Vec::new();
    let stats = crawl(&config, &mut records).await.unwrap();

    assert!(records.is_empty());
    assert_eq!(stats.failures, 1);
    assert_eq!(stats.fetched, 0);
    records.finish().unwrap();
}
