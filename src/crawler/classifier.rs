//! Page classification
//!
//! Decides from a URL and its fetched document whether the page belongs to
//! the app catalog at all, and if so whether it is an app detail page or a
//! listing (publisher page, catalog front page, top-selling list).

use crate::crawler::document::Document;
use crate::schema::PageSchema;
use crate::url::{query_params, QueryParams};

/// Outcome of classifying a fetched page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageKind {
    /// Not part of the app catalog; neither links nor records are taken from it
    Irrelevant,
    /// Relevant page without an item identifier
    Listing,
    /// Relevant page describing one app
    Detail,
}

impl PageKind {
    /// Returns true if links should be harvested from the page
    pub fn is_relevant(&self) -> bool {
        matches!(self, Self::Listing | Self::Detail)
    }
}

/// Classifies a page
///
/// # Decision Procedure
///
/// 1. Catalog root or a top-selling listing → relevant, no further checks
/// 2. URL path mentions neither detail nor publisher pages → Irrelevant
/// 3. URL points at a review → Irrelevant
/// 4. Neither an item id nor a publisher parameter → Irrelevant
/// 5. Publisher page → relevant iff its banner reads "Apps by ..."
/// 6. Otherwise → relevant iff the app detail container is present
/// 7. Relevant pages carrying an item id are Detail, the rest Listing
pub fn classify(url: &str, document: &Document, schema: &PageSchema) -> PageKind {
    let params = query_params(url);

    if !is_relevant(url, &params, document, schema) {
        return PageKind::Irrelevant;
    }

    if has_param(&params, schema.item_id_param) {
        PageKind::Detail
    } else {
        PageKind::Listing
    }
}

fn is_relevant(url: &str, params: &QueryParams, document: &Document, schema: &PageSchema) -> bool {
    if schema.is_seed_like(url) {
        return true;
    }

    let path = url_path(url);
    let is_listing = path.contains(schema.listing_marker);

    if !is_listing && !path.contains(schema.detail_marker) {
        return false;
    }

    if url.contains(schema.review_marker) {
        return false;
    }

    if !has_param(params, schema.item_id_param) && !has_param(params, schema.publisher_param) {
        return false;
    }

    if is_listing {
        return document
            .text(&schema.listing_banner)
            .map(|banner| banner.to_lowercase().starts_with(schema.listing_banner_prefix))
            .unwrap_or(false);
    }

    if !document.contains(&schema.detail_container) {
        return false;
    }

    !schema.breadcrumb_check || has_apps_breadcrumb(document, schema)
}

/// Dormant rule: a detail page must be filed under the apps section
fn has_apps_breadcrumb(document: &Document, schema: &PageSchema) -> bool {
    document
        .select_all(&schema.breadcrumb_links)
        .filter_map(|a| a.value().attr("href"))
        .any(|href| href.contains(schema.breadcrumb_marker))
}

fn has_param(params: &QueryParams, name: &str) -> bool {
    params.get(name).is_some_and(|value| !value.is_empty())
}

/// Path component of an absolute URL, or everything before the query otherwise
fn url_path(url: &str) -> String {
    match ::url::Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url.split(['?', '#']).next().unwrap_or_default().to_string(),
    }
}
