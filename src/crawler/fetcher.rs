//! Page fetching
//!
//! The scheduler talks to the network only through the [`Fetch`] trait, so a
//! crawl can run against the live catalog ([`HttpFetcher`]) or an in-memory
//! page set in tests. Fetch outcomes are reduced to three cases:
//!
//! | Response | Result |
//! |----------|--------|
//! | 2xx | `Ok(body)` |
//! | 404 | `Err(FetchError::NotFound)` |
//! | other status, timeout, connect or body error | `Err(FetchError::Transient)` |
//!
//! There is no retry: a transient failure is counted and the URL abandoned.

use crate::config::{Config, HttpConfig};
use async_trait::async_trait;
use reqwest::header::{HeaderValue, COOKIE};
use reqwest::{redirect::Policy, Client, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Maximum redirect hops followed for one request
const MAX_REDIRECTS: usize = 10;

/// Name of the session cookie that selects the result language
const LOCALE_COOKIE: &str = "hlSession2";

/// Why a page could not be fetched
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The page does not exist; expected for stale links and not a failure
    #[error("not found")]
    NotFound,

    /// Any other failure
    #[error("{0}")]
    Transient(String),
}

/// Source of page bodies
#[async_trait]
pub trait Fetch: Send + Sync {
    /// Fetches one page and returns its body as text
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

#[async_trait]
impl<T: Fetch + ?Sized> Fetch for Arc<T> {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        (**self).fetch(url).await
    }
}

/// Builds the HTTP client shared by every fetch of a crawl
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches catalog pages over HTTP with the locale cookie attached
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    locale_cookie: HeaderValue,
}

impl HttpFetcher {
    /// Creates a fetcher requesting results in `locale`
    pub fn new(config: &HttpConfig, locale: &str) -> Result<Self, crate::CrawlerError> {
        let locale_cookie = HeaderValue::from_str(&format!("{}={}", LOCALE_COOKIE, locale))
            .map_err(|_| {
                crate::ConfigError::Validation(format!("locale '{}' is not a valid cookie value", locale))
            })?;

        Ok(Self {
            client: build_http_client(config)?,
            locale_cookie,
        })
    }

    /// Creates a fetcher from the `[http]` and `[catalog]` config sections
    pub fn from_config(config: &Config) -> Result<Self, crate::CrawlerError> {
        Self::new(&config.http, &config.catalog.locale)
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .header(COOKIE, self.locale_cookie.clone())
            .send()
            .await
            .map_err(classify_error)?;

        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound);
        }

        if !status.is_success() {
            return Err(FetchError::Transient(format!("HTTP {}", status.as_u16())));
        }

        response.text().await.map_err(classify_error)
    }
}

fn classify_error(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Transient("request timeout".to_string())
    } else if error.is_connect() {
        FetchError::Transient(format!("connection failed: {}", error))
    } else if error.is_redirect() {
        FetchError::Transient(format!("redirect error: {}", error))
    } else {
        FetchError::Transient(error.to_string())
    }
}
