//! Outbound link filter
//!
//! Collects the links of a relevant page that may lead to more apps: item
//! detail pages and publisher listings. Review permalinks and sign-in links
//! share those path shapes and are dropped explicitly.

use crate::crawler::document::Document;
use crate::schema::PageSchema;
use crate::url::absolute_url;
use std::collections::HashSet;

/// Extracts the followable links of a page
///
/// # Link Rules
///
/// **Include:** `<a href>` values with a detail or publisher path followed by
/// a query string.
///
/// **Exclude:**
/// - review links (`reviewId`)
/// - sign-in links (`accounts/ServiceLogin`)
///
/// Links are returned absolutized against the catalog base, without
/// duplicates, in document order.
pub fn discover_links(document: &Document, schema: &PageSchema) -> Vec<String> {
    let mut seen = HashSet::new();

    document
        .select_all(&schema.anchors)
        .filter_map(|a| a.value().attr("href"))
        .filter(|href| is_followable(href, schema))
        .map(|href| absolute_url(&schema.base_url, href))
        .filter(|link| seen.insert(link.clone()))
        .collect()
}

/// Applies the include/exclude rules to one href
pub fn is_followable(href: &str, schema: &PageSchema) -> bool {
    schema.is_follow_candidate(href)
        && !href.contains(schema.review_marker)
        && !href.contains(schema.login_marker)
}
