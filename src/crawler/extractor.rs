//! Record extraction from app detail pages

use crate::crawler::document::{element_text, Document};
use crate::record::{Price, Record};
use crate::schema::PageSchema;
use crate::url::{absolute_url, query_params};
use scraper::Selector;
use std::collections::BTreeSet;

/// Builds a record from an app detail page
///
/// Returns `None` when the page is not a detail page after all: the URL has
/// no item id, or the detail container is missing. Every other field is
/// optional and extracted independently.
pub fn extract(url: &str, document: &Document, schema: &PageSchema) -> Option<Record> {
    let id = query_params(url)
        .remove(schema.item_id_param)
        .filter(|id| !id.is_empty())?;

    if !document.contains(&schema.detail_container) {
        return None;
    }

    let mut record = Record::new(id.clone(), schema.detail_url(&id));

    record.name = document.text(&schema.title).unwrap_or_default();
    record.developer_name = document.text(&schema.developer_link).unwrap_or_default();
    record.developer_link = document
        .attr(&schema.developer_link, "href")
        .map(|href| absolute_url(&schema.base_url, &href))
        .unwrap_or_default();

    let (websites, emails) = developer_contacts(document, schema);
    record.developer_websites = websites;
    record.developer_emails = emails;

    record.rating_count = document
        .text(&schema.rating_count)
        .map(|text| parse_digits(&text))
        .unwrap_or(0);
    record.rating_value = document.attr(&schema.rating_value, schema.rating_value_attr);
    record.description = document.inner_html(&schema.description);

    record.more_from_developer = related_ids(document, &schema.more_from_developer, schema);
    record.also_installed = related_ids(document, &schema.also_installed, schema);
    record.also_viewed = related_ids(document, &schema.also_viewed, schema);

    record.icon = document.attr(&schema.icon, "src");
    record.banner = document.attr(&schema.banner, "src");
    record.screenshots = document
        .select_all(&schema.screenshots)
        .filter_map(|img| img.value().attr("src"))
        .map(str::to_string)
        .collect();

    record.set_price(price(document, schema));
    record.category = category(document, schema);
    record.category_tag = category_tag(document, schema);

    if let Some((min, max)) = install_range(document, schema) {
        record.installs_min = Some(min);
        record.installs_max = Some(max);
    }

    Some(record)
}

/// Developer website links and email addresses from the overview section
fn developer_contacts(
    document: &Document,
    schema: &PageSchema,
) -> (BTreeSet<String>, BTreeSet<String>) {
    let mut websites = BTreeSet::new();
    let mut emails = BTreeSet::new();

    for anchor in document.select_all(&schema.overview_links) {
        let href = anchor.value().attr("href").unwrap_or_default();

        if let Some(address) = href.strip_prefix(schema.mail_scheme) {
            if !address.is_empty() {
                emails.insert(address.to_string());
            }
        }

        if element_text(anchor).contains(schema.website_link_text) {
            if let Some(target) = query_params(href)
                .remove(schema.redirect_target_param)
                .filter(|target| !target.is_empty())
            {
                websites.insert(target);
            }
        }
    }

    (websites, emails)
}

/// Item ids linked from one related-apps block
fn related_ids(document: &Document, block: &Selector, schema: &PageSchema) -> Vec<String> {
    document
        .select_all(block)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(|href| query_params(href).remove(schema.item_id_param))
        .filter(|id| !id.is_empty())
        .collect()
}

fn price(document: &Document, schema: &PageSchema) -> Price {
    document
        .text(&schema.price)
        .and_then(|text| schema.find_price(&text).map(str::to_string))
        .map(Price::Paid)
        .unwrap_or(Price::Free)
}

/// Text of the first metadata link pointing at a category
fn category(document: &Document, schema: &PageSchema) -> Option<String> {
    document
        .select_all(&schema.category_links)
        .find(|a| {
            a.value()
                .attr("href")
                .is_some_and(|href| href.contains(schema.category_marker))
        })
        .map(element_text)
}

/// Category path segment of the last metadata link
/// Category path segment of the last metadata anchor that links into a category
fn category_tag(document: &Document, schema: &PageSchema) -> Option<String> {
    document
        .select_all(&schema.category_tag_links)
        .filter_map(|anchor| anchor.value().attr("href"))
        .filter_map(|href| schema.find_category_tag(href))
        .last()
        .map(str::to_string)
}

fn install_range(document: &Document, schema: &PageSchema) -> Option<(u64, u64)> {
    let text = document.text(&schema.installs)?;
    let (min, max) = schema.find_install_range(&text)?;
    Some((digits(min).parse().ok()?, digits(max).parse().ok()?))
}

fn digits(text: &str) -> String {
    text.chars().filter(char::is_ascii_digit).collect()
}

/// Parses the digits of a text as a count; anything unparsable counts as zero
fn parse_digits(text: &str) -> u64 {
    digits(text).parse().unwrap_or(0)
}
