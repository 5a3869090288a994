use crate::{catalog_base, detail_page, test_config};
use market_crawler::config::Config;
use market_crawler::crawler::{lookup, FetchError, HttpFetcher};
use market_crawler::{CrawlerError, PageSchema, Price};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn setup(config: &Config) -> (HttpFetcher, PageSchema) {
    let fetcher = HttpFetcher::from_config(config).expect("Failed to build fetcher");
    let schema = PageSchema::from_config(&config.catalog).expect("Failed to compile schema");
    (fetcher, schema)
}

#[tokio::test]
async fn test_lookup_existing_app() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/store/apps/details"))
        .and(query_param("id", "com.google.android.gm"))
        .respond_with(ResponseTemplate::new(200).set_body_string(detail_page(
            "Gmail",
            "$0.99",
            &["/details?id=com.other"],
        )))
        .expect(1)
        .mount(&server)
        .await;

    let (fetcher, schema) = setup(&test_config(&server));
    let record = lookup(&fetcher, &schema, "com.google.android.gm")
        .await
        .unwrap()
        .expect("Expected a record");

    assert_eq!(record.id, "com.google.android.gm");
    assert_eq!(record.name, "Gmail");
    assert_eq!(
        record.detail_link,
        format!("{}/details?id=com.google.android.gm", catalog_base(&server))
    );
    assert_eq!(record.price, Price::Paid("0.99".to_string()));
    assert!(!record.is_free);
}

#[tokio::test]
async fn test_lookup_missing_app() {
    let server = MockServer::start().await;
    let (fetcher, schema) = setup(&test_config(&server));

    let result = lookup(&fetcher, &schema, "com.does.not.exist").await.unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_lookup_non_detail_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/store/apps/details"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body>Sign in</body></html>"))
        .mount(&server)
        .await;

    let (fetcher, schema) = setup(&test_config(&server));
    assert!(lookup(&fetcher, &schema, "com.a").await.unwrap().is_none());
}

#[tokio::test]
async fn test_lookup_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let (fetcher, schema) = setup(&test_config(&server));
    let error = lookup(&fetcher, &schema, "com.a").await.unwrap_err();

    match error {
        CrawlerError::Fetch { url, source } => {
            assert!(url.ends_with("/store/apps/details?id=com.a"));
            assert_eq!(source, FetchError::Transient("HTTP 502".to_string()));
        }
        other => panic!("Unexpected error: {}", other),
    }
}
