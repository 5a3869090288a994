//! Page schema for the app catalog
//!
//! Every CSS selector, URL marker, fixed text prefix and regex pattern that
//! depends on the catalog's page layout lives here. The classifier, link
//! filter and extractor only ever refer to fields of [`PageSchema`], so a
//! layout change is a change to this file alone.

use crate::config::CatalogConfig;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Selector;
use thiserror::Error;

/// Errors raised while compiling a page schema
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Invalid CSS selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Outbound links worth following: a detail or publisher path followed by a query
static FOLLOW_LINK_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/(details|developer)\?").expect("valid follow-link regex"));

/// Last numeric-looking run in the buy button text ("$2.99" -> "2.99")
static PRICE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d[\d.,]*").expect("valid price regex"));

/// Install range such as "1,000,000 - 5,000,000" or "1.000.000 - 5.000.000"
static INSTALLS_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d[\d.,]*)\s*-\s*(\d[\d.,]*)").expect("valid installs regex")
});

/// Compiled description of the catalog's page layout
#[derive(Debug, Clone)]
pub struct PageSchema {
    /// Catalog base path, without trailing slash
    pub base_url: String,
    /// Catalog front page (`<base>/`), always relevant
    pub root_url: String,
    /// Top-selling listing prefixes, always relevant
    pub top_selling_prefixes: Vec<String>,

    /// Path marker of item detail pages
    pub detail_marker: &'static str,
    /// Path marker of publisher listing pages
    pub listing_marker: &'static str,
    /// Marker of review permalinks, never relevant
    pub review_marker: &'static str,
    /// Marker of sign-in links, never followed
    pub login_marker: &'static str,

    /// Query parameter carrying the item identifier
    pub item_id_param: &'static str,
    /// Query parameter carrying the publisher name
    pub publisher_param: &'static str,
    /// Query parameter of redirect links that carries the target URL
    pub redirect_target_param: &'static str,

    /// Banner heading of publisher listings
    pub listing_banner: Selector,
    /// Lower-cased prefix the listing banner must start with
    pub listing_banner_prefix: &'static str,
    /// Container present only on app detail pages
    pub detail_container: Selector,

    /// Breadcrumb anchors of a detail page.
    ///
    /// The breadcrumb rule (a detail page is relevant only if one of its
    /// breadcrumbs points into the apps section) is dormant: it is evaluated
    /// only when `breadcrumb_check` is switched on.
    pub breadcrumb_links: Selector,
    /// Path fragment a breadcrumb href must contain when the rule is active
    pub breadcrumb_marker: &'static str,
    /// Enables the dormant breadcrumb rule
    pub breadcrumb_check: bool,

    /// Every anchor of a page
    pub anchors: Selector,

    pub title: Selector,
    pub developer_link: Selector,
    pub overview_links: Selector,
    /// Anchor text identifying the developer website link
    pub website_link_text: &'static str,
    pub mail_scheme: &'static str,

    pub rating_count: Selector,
    pub rating_value: Selector,
    pub rating_value_attr: &'static str,
    pub description: Selector,

    pub more_from_developer: Selector,
    pub also_installed: Selector,
    pub also_viewed: Selector,

    pub icon: Selector,
    pub banner: Selector,
    pub screenshots: Selector,

    pub price: Selector,
    pub category_links: Selector,
    pub category_marker: &'static str,
    pub category_tag_links: Selector,
    category_tag_pattern: Regex,
    pub installs: Selector,
}

impl PageSchema {
    /// Compiles the schema for a catalog rooted at `base_url`
    ///
    /// # Example
    ///
    /// ```
    /// use market_crawler::PageSchema;
    ///
    /// let schema = PageSchema::new("https://play.google.com/store/apps").unwrap();
    /// assert_eq!(schema.root_url, "https://play.google.com/store/apps/");
    /// ```
    pub fn new(base_url: &str) -> Result<Self, SchemaError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let base_path = ::url::Url::parse(&base_url)
            .map(|u| u.path().trim_end_matches('/').to_string())
            .unwrap_or_default();

        let category_tag_pattern = Regex::new(&format!(
            r"{}/category/(\w+)\?",
            regex::escape(&base_path)
        ))?;

        Ok(Self {
            root_url: format!("{}/", base_url),
            top_selling_prefixes: vec![
                format!("{}/details?id=apps_topselling_paid", base_url),
                format!("{}/details?id=apps_topselling_free", base_url),
            ],
            base_url,

            detail_marker: "details",
            listing_marker: "developer",
            review_marker: "reviewId",
            login_marker: "accounts/ServiceLogin",

            item_id_param: "id",
            publisher_param: "pub",
            redirect_target_param: "q",

            listing_banner: selector("h1.page-banner-text")?,
            listing_banner_prefix: "apps by",
            detail_container: selector("div.apps.details-page")?,

            breadcrumb_links: selector(".breadcrumbs a")?,
            breadcrumb_marker: "/apps",
            breadcrumb_check: false,

            anchors: selector("a")?,

            title: selector("h1.doc-banner-title")?,
            developer_link: selector("a.doc-header-link")?,
            overview_links: selector(".doc-overview a")?,
            website_link_text: "Visit Developer's Website",
            mail_scheme: "mailto:",

            rating_count: selector("[itemprop=ratingCount]")?,
            rating_value: selector("[itemprop=ratingValue]")?,
            rating_value_attr: "content",
            description: selector("#doc-original-text")?,

            more_from_developer: selector(
                "[data-analyticsid=more-from-developer] a.common-snippet-title",
            )?,
            also_installed: selector(
                "[data-analyticsid=users-also-installed] a.common-snippet-title",
            )?,
            also_viewed: selector("[data-analyticsid=related] a.common-snippet-title")?,

            icon: selector(".doc-banner-icon img")?,
            banner: selector(".doc-banner-image-container img")?,
            screenshots: selector(".screenshot-carousel-content-container img")?,

            price: selector(".buy-button-price")?,
            category_links: selector(".doc-metadata-list dd a")?,
            category_marker: "category",
            category_tag_links: selector("dd a")?,
            category_tag_pattern,
            installs: selector("[itemprop=numDownloads]")?,
        })
    }

    /// Compiles the schema described by the catalog section of the config
    pub fn from_config(config: &CatalogConfig) -> Result<Self, SchemaError> {
        Self::new(&config.base_url)
    }

    /// Canonical detail page URL of an item
    pub fn detail_url(&self, id: &str) -> String {
        let encoded: String = ::url::form_urlencoded::byte_serialize(id.as_bytes()).collect();
        format!("{}/{}?{}={}", self.base_url, self.detail_marker, self.item_id_param, encoded)
    }

    /// True for the catalog front page and the top-selling listings
    pub fn is_seed_like(&self, url: &str) -> bool {
        url == self.root_url
            || self
                .top_selling_prefixes
                .iter()
                .any(|prefix| url.starts_with(prefix.as_str()))
    }

    /// True if an href has the shape of a detail or publisher link
    pub fn is_follow_candidate(&self, href: &str) -> bool {
        FOLLOW_LINK_REGEX.is_match(href)
    }

    /// True if a link points at an item detail page
    pub fn is_detail_link(&self, href: &str) -> bool {
        href.contains(&format!("/{}?", self.detail_marker))
    }

    /// Numeric price token of the buy button text, if any
    pub fn find_price<'t>(&self, text: &'t str) -> Option<&'t str> {
        PRICE_REGEX.find_iter(text).last().map(|m| m.as_str())
    }

    /// Category path segment of a metadata link href
    pub fn find_category_tag<'t>(&self, href: &'t str) -> Option<&'t str> {
        self.category_tag_pattern
            .captures(href)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    /// Both bounds of an install range, still carrying separators
    pub fn find_install_range<'t>(&self, text: &'t str) -> Option<(&'t str, &'t str)> {
        let caps = INSTALLS_REGEX.captures(text)?;
        Some((caps.get(1)?.as_str(), caps.get(2)?.as_str()))
    }
}

fn selector(css: &str) -> Result<Selector, SchemaError> {
    Selector::parse(css).map_err(|e| SchemaError::Selector {
        selector: css.to_string(),
        message: format!("{:?}", e),
    })
}
