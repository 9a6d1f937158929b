//! Course domain model

use super::ids::CourseId;
use super::wire::{deserialize_integer, deserialize_optional_text, deserialize_text};
use serde::{Deserialize, Deserializer, Serialize};

/// Invoice-number prefix used when a course has none configured
pub const DEFAULT_INVOICE_PREFIX: &str = "U";

/// A sellable course, as served by `GET /courses` and embedded in orders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    /// Service-assigned course id
    #[serde(rename = "_id")]
    pub id: CourseId,

    /// Course title; also the value the course filter matches on
    #[serde(default, deserialize_with = "deserialize_text")]
    pub title: String,

    /// Invoice-number prefix; blank or missing falls back to `"U"`
    #[serde(default = "default_prefix", deserialize_with = "deserialize_prefix")]
    pub prefix: String,

    /// List price; the course form posts it as a string, so numeric strings
    /// are accepted and anything unparseable is 0
    #[serde(default, deserialize_with = "deserialize_integer")]
    pub price: i64,

    /// Route slug of the course landing page
    #[serde(default, deserialize_with = "deserialize_text")]
    pub route: String,
}

impl Course {
    /// Create a course with the default prefix and no price or route
    pub fn new(id: CourseId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            prefix: default_prefix(),
            price: 0,
            route: String::new(),
        }
    }

    /// Set the invoice prefix (blank resets to the default)
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = normalize_prefix(prefix.into());
        self
    }

    /// Set the price
    pub fn with_price(mut self, price: i64) -> Self {
        self.price = price;
        self
    }

    /// Set the route slug
    pub fn with_route(mut self, route: impl Into<String>) -> Self {
        self.route = route.into();
        self
    }

    /// Full invoice label for an invoice number issued under this course
    pub fn invoice_label(&self, invoice_number: &str) -> String {
        format!("{}{}", self.prefix, invoice_number)
    }
}

/// Fields to change on a course; `None` leaves the field as it is
///
/// Serializes to the `PUT /courses/{id}` body, carrying only the fields
/// being changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CourseUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
}

impl CourseUpdate {
    /// True when no field would change
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.prefix.is_none() && self.price.is_none() && self.route.is_none()
    }
}

impl Course {
    /// Merge an accepted update into this course
    pub fn apply(&mut self, update: &CourseUpdate) {
        if let Some(title) = &update.title {
            self.title = title.clone();
        }
        if let Some(prefix) = &update.prefix {
            self.prefix = normalize_prefix(prefix.clone());
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        if let Some(route) = &update.route {
            self.route = route.clone();
        }
    }
}

fn default_prefix() -> String {
    DEFAULT_INVOICE_PREFIX.to_string()
}

fn normalize_prefix(prefix: String) -> String {
    if prefix.trim().is_empty() {
        default_prefix()
    } else {
        prefix
    }
}

fn deserialize_prefix<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = deserialize_optional_text(deserializer)?;
    Ok(normalize_prefix(raw.unwrap_or_default()))
}
