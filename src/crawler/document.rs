//! Queryable HTML document
//!
//! A thin wrapper over `scraper::Html` exposing exactly the queries the page
//! interpretation pipeline needs. A `Document` is parsed and dropped inside
//! one synchronous step; it never crosses an `.await`.

use scraper::html::Select;
use scraper::{ElementRef, Html, Selector};

/// A parsed catalog page
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses an HTML page
    pub fn parse(body: &str) -> Self {
        Self {
            html: Html::parse_document(body),
        }
    }

    /// All elements matching `selector`, in document order
    pub fn select_all<'a, 'b>(&'a self, selector: &'b Selector) -> Select<'a, 'b> {
        self.html.select(selector)
    }

    /// First element matching `selector`
    pub fn select_first(&self, selector: &Selector) -> Option<ElementRef<'_>> {
        self.html.select(selector).next()
    }

    /// True if at least one element matches `selector`
    pub fn contains(&self, selector: &Selector) -> bool {
        self.select_first(selector).is_some()
    }

    /// Whitespace-collapsed text of the first match
    pub fn text(&self, selector: &Selector) -> Option<String> {
        self.select_first(selector).map(element_text)
    }

    /// Attribute value of the first match
    pub fn attr(&self, selector: &Selector, name: &str) -> Option<String> {
        self.select_first(selector)
            .and_then(|element| element.value().attr(name))
            .map(str::to_string)
    }

    /// Raw inner markup of the first match
    pub fn inner_html(&self, selector: &Selector) -> Option<String> {
        self.select_first(selector).map(|element| element.inner_html())
    }
}

/// Text content of an element with runs of whitespace collapsed to one space
pub fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
