//! URL handling module for Market-Crawler
//!
//! This module provides URL normalization (the dedup key of the frontier),
//! query parameter decoding for absolute and relative links, and
//! absolutization of catalog-relative links.

mod normalize;
mod query;

use ::url::Url;

pub use normalize::normalize_url;
pub use query::{query_params, QueryParams};

/// Converts a catalog link into an absolute URL
///
/// Root-relative links (`/details?id=x`) are appended to the catalog base
/// path as-is, which is how the catalog writes its internal links. Absolute
/// links are returned unchanged and any other relative form is joined to
/// `<base>/`.
///
/// # Examples
///
/// ```
/// use market_crawler::url::absolute_url;
///
/// let base = "https://catalog.example.com/store/apps";
/// assert_eq!(
///     absolute_url(base, "/details?id=com.example"),
///     "https://catalog.example.com/store/apps/details?id=com.example"
/// );
/// assert_eq!(absolute_url(base, "https://other.com/x"), "https://other.com/x");
/// ```
pub fn absolute_url(base: &str, href: &str) -> String {
    let href = href.trim();

    if href.starts_with('/') && !href.starts_with("//") {
        return format!("{}{}", base.trim_end_matches('/'), href);
    }

    if Url::parse(href).is_ok() {
        return href.to_string();
    }

    Url::parse(&format!("{}/", base.trim_end_matches('/')))
        .and_then(|base_url| base_url.join(href))
        .map(|joined| joined.to_string())
        .unwrap_or_else(|_| href.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://catalog.example.com/store/apps";

    #[test]
    fn test_root_relative_link() {
        assert_eq!(
            absolute_url(BASE, "/developer?pub=Acme"),
            "https://catalog.example.com/store/apps/developer?pub=Acme"
        );
    }

    #[test]
    fn test_absolute_link_unchanged() {
        assert_eq!(
            absolute_url(BASE, "https://catalog.example.com/store/apps/details?id=a"),
            "https://catalog.example.com/store/apps/details?id=a"
        );
    }

    #[test]
    fn test_path_relative_link() {
        assert_eq!(
            absolute_url(BASE, "details?id=a"),
            "https://catalog.example.com/store/apps/details?id=a"
        );
    }

    #[test]
    fn test_protocol_relative_link() {
        assert_eq!(
            absolute_url(BASE, "//cdn.example.com/icon.png"),
            "https://cdn.example.com/icon.png"
        );
    }

    #[test]
    fn test_base_with_trailing_slash() {
        assert_eq!(
            absolute_url("https://catalog.example.com/store/apps/", "/details?id=a"),
            "https://catalog.example.com/store/apps/details?id=a"
        );
    }

    #[test]
    fn test_empty_href_becomes_base_dir() {
        assert_eq!(absolute_url(BASE, ""), "https://catalog.example.com/store/apps/");
    }
}
