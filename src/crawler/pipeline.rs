//! Page interpretation
//!
//! Turns one fetched page into everything the scheduler needs from it: its
//! classification, the links to submit and at most one record. This is the
//! only place a page body is parsed; the parsed document is dropped before
//! the function returns, so callers may hold the outcome across awaits.

use crate::crawler::classifier::{classify, PageKind};
use crate::crawler::document::Document;
use crate::crawler::extractor::extract;
use crate::crawler::links::discover_links;
use crate::record::Record;
use crate::schema::PageSchema;

/// Everything taken from one fetched page
#[derive(Debug, Clone, PartialEq)]
pub struct PageOutcome {
    pub kind: PageKind,
    /// Followable links, absolutized; empty for irrelevant pages
    pub links: Vec<String>,
    /// Record of a detail page, if extraction succeeded
    pub record: Option<Record>,
}

/// Classifies a page and extracts its links and record
pub fn interpret_page(url: &str, body: &str, schema: &PageSchema) -> PageOutcome {
    let document = Document::parse(body);
    let kind = classify(url, &document, schema);

    match kind {
        PageKind::Irrelevant => PageOutcome {
            kind,
            links: Vec::new(),
            record: None,
        },
        PageKind::Listing => PageOutcome {
            kind,
            links: discover_links(&document, schema),
            record: None,
        },
        PageKind::Detail => PageOutcome {
            kind,
            links: discover_links(&document, schema),
            record: extract(url, &document, schema),
        },
    }
}
