//! Book Records
//!
//! The shape of a single library entry, exactly as the generation service
//! emits it. Field names on the wire are camelCase (`coverImageUrl`,
//! `publishedYear`) so a response body deserializes without any mapping.
//!
//! Books are immutable once received. The shell hands out shared
//! references only; nothing in this crate edits a record after the fetch
//! client has sanitized it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lowest rating the library displays
pub const MIN_RATING: f32 = 1.0;

/// Highest rating the library displays
pub const MAX_RATING: f32 = 5.0;

/// Books published before this year are treated as public domain
pub const PUBLIC_DOMAIN_BEFORE: i32 = 1928;

const STORE_SEARCH_URL: &str = "https://www.amazon.com/s";
const FREE_EDITION_SEARCH_URL: &str = "https://www.gutenberg.org/ebooks/search/";

/// Book identifier
///
/// Opaque and unique across one library. Used as the render key and as the
/// selection key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(pub String);

impl BookId {
    /// Create a book ID from a string
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh random ID
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Borrow the raw identifier
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BookId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A single library entry
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Unique identifier
    pub id: BookId,
    /// Display title
    pub title: String,
    /// Author display name
    pub author: String,
    /// Cover image location (never fetched or checked)
    pub cover_image_url: String,
    /// Free-text summary
    pub description: String,
    /// Genre tags, in the order the service listed them
    pub genres: Vec<String>,
    /// Rating, conventionally 1.0-5.0
    pub rating: f32,
    /// Year of publication
    pub published_year: i32,
}

impl Book {
    /// Render the rating as a bar of `max` stars
    ///
    /// A star is filled only when the rating reaches it, so 4.5 shows four.
    #[must_use]
    pub fn rating_stars(&self, max: usize) -> String {
        let scale = MAX_RATING / max.max(1) as f32;
        let filled = ((self.rating / scale).floor().max(0.0) as usize).min(max);
        let mut stars = "★".repeat(filled);
        stars.push_str(&"☆".repeat(max - filled));
        stars
    }

    /// Rating as shown next to the stars, e.g. `4.5 / 5.0`
    #[must_use]
    pub fn rating_label(&self) -> String {
        format!("{:.1} / {MAX_RATING:.1}", self.rating)
    }

    /// Whether the book is old enough to be freely downloadable
    #[must_use]
    pub fn is_public_domain(&self) -> bool {
        self.published_year < PUBLIC_DOMAIN_BEFORE
    }

    /// Bookstore search link for this title and author
    #[must_use]
    pub fn store_search_url(&self) -> Option<String> {
        self.search_url(STORE_SEARCH_URL, "k")
    }

    /// Free-edition search link; only public-domain books have one
    #[must_use]
    pub fn free_edition_url(&self) -> Option<String> {
        if !self.is_public_domain() {
            return None;
        }
        self.search_url(FREE_EDITION_SEARCH_URL, "query")
    }

    fn search_url(&self, base: &str, param: &str) -> Option<String> {
        let terms = format!("{} {}", self.title, self.author);
        reqwest::Url::parse_with_params(base, &[(param, terms.as_str())])
            .map(String::from)
            .ok()
    }
}
