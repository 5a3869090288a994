//! Extracted app record
//!
//! One [`Record`] is produced per app detail page. Fields that the page may
//! not carry are `Option`s and are left out of the serialized form when
//! absent; the serialized field names are the ones downstream consumers of
//! the JSON-lines output already expect.

use serde::{Serialize, Serializer};
use std::collections::BTreeSet;

/// Price of an app as shown on its buy button
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Price {
    /// No numeric price on the button; serialized as `0`
    Free,
    /// Verbatim numeric token from the button, e.g. `"2.99"`
    Paid(String),
}

impl Price {
    pub fn is_free(&self) -> bool {
        matches!(self, Self::Free)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Free => serializer.serialize_u8(0),
            Self::Paid(amount) => serializer.serialize_str(amount),
        }
    }
}

/// Structured data extracted from one app detail page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    /// Item identifier (package name), unique per crawl
    #[serde(rename = "uid")]
    pub id: String,

    pub name: String,

    /// Canonical detail page URL
    #[serde(rename = "app_link")]
    pub detail_link: String,

    #[serde(rename = "dev_name")]
    pub developer_name: String,

    #[serde(rename = "dev_link")]
    pub developer_link: String,

    #[serde(rename = "dev_web_links")]
    pub developer_websites: BTreeSet<String>,

    #[serde(rename = "dev_emails")]
    pub developer_emails: BTreeSet<String>,

    pub rating_count: u64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating_value: Option<String>,

    #[serde(rename = "description_html", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "more-from-developer")]
    pub more_from_developer: Vec<String>,

    #[serde(rename = "users_also_installed")]
    pub also_installed: Vec<String>,

    #[serde(rename = "users_also_viewed")]
    pub also_viewed: Vec<String>,

    #[serde(rename = "icon_link", skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    #[serde(rename = "screenshot_links")]
    pub screenshots: Vec<String>,

    #[serde(rename = "banner_link", skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,

    pub is_free: bool,

    pub price: Price,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_tag: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub installs_min: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub installs_max: Option<u64>,
}

impl Record {
    /// Creates a record with only the identity fields filled in
    pub fn new(id: impl Into<String>, detail_link: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            detail_link: detail_link.into(),
            developer_name: String::new(),
            developer_link: String::new(),
            developer_websites: BTreeSet::new(),
            developer_emails: BTreeSet::new(),
            rating_count: 0,
            rating_value: None,
            description: None,
            more_from_developer: Vec::new(),
            also_installed: Vec::new(),
            also_viewed: Vec::new(),
            icon: None,
            screenshots: Vec::new(),
            banner: None,
            is_free: true,
            price: Price::Free,
            category: None,
            category_tag: None,
            installs_min: None,
            installs_max: None,
        }
    }

    /// Sets both pricing fields from one price value
    pub fn set_price(&mut self, price: Price) {
        self.is_free = price.is_free();
        self.price = price;
    }
}
