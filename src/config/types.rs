use serde::Deserialize;

/// Default catalog base every relative link is resolved against
pub const DEFAULT_BASE_URL: &str = "https://play.google.com/store/apps";

/// Default seed: a well-connected app detail page
pub const DEFAULT_SEED_URL: &str =
    "https://play.google.com/store/apps/details?id=com.google.android.gm";

/// Main configuration structure for Market-Crawler
///
/// Every section is optional; a missing file or section falls back to the
/// defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum number of concurrently executing page tasks
    pub concurrency: u32,

    /// First URL placed in the frontier
    #[serde(rename = "seed-url")]
    pub seed_url: String,

    /// Whether publisher listing links are followed in addition to detail links
    #[serde(rename = "follow-listings")]
    pub follow_listings: bool,

    /// Log a progress line every N published records (0 disables)
    #[serde(rename = "progress-interval")]
    pub progress_interval: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            concurrency: 10,
            seed_url: DEFAULT_SEED_URL.to_string(),
            follow_listings: true,
            progress_interval: 100,
        }
    }
}

/// Catalog location and presentation language
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Base path of the catalog, without trailing slash
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Result language, sent as the session locale cookie
    pub locale: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            locale: "en".to_string(),
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// User-Agent header value
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Whole-request timeout in seconds
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Connection establishment timeout in seconds
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("market-crawler/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}
