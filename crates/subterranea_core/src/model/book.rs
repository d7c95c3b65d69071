//! Book domain model.
//!
//! # Responsibility
//! - Define the single catalog record rendered by every view.
//! - Provide read-side presentation helpers (cover URL, tilt).
//!
//! # Invariants
//! - `id` is unique across the catalog and never reused.
//! - `title` and `author` are non-blank for any record that is rendered.
//! - The core never mutates a fetched record.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;
use xxhash_rust::xxh3::xxh3_64;

static DRIVE_VIEW_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"https://drive\.google\.com/file/d/([^/]+)/view").expect("valid drive link regex")
});

const MAX_TILT_DEGREES: f64 = 10.0;

/// Opaque, store-assigned book identity.
pub type BookId = String;

/// Shelf categories the catalog knows how to group.
///
/// `books.category` is free text; values outside this set are kept on the
/// record but belong to no shelf section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BookCategory {
    ArtistBook,
    Magazine,
    Demo,
    Digital,
    Cargo,
}

impl BookCategory {
    pub const ALL: [BookCategory; 5] = [
        BookCategory::ArtistBook,
        BookCategory::Magazine,
        BookCategory::Demo,
        BookCategory::Digital,
        BookCategory::Cargo,
    ];

    /// Text form persisted by the store.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ArtistBook => "artist-book",
            Self::Magazine => "magazine",
            Self::Demo => "demo",
            Self::Digital => "digital",
            Self::Cargo => "cargo",
        }
    }
}

impl Display for BookCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown book category `{0}`")]
pub struct UnknownCategory(pub String);

impl FromStr for BookCategory {
    type Err = UnknownCategory;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == value)
            .ok_or_else(|| UnknownCategory(value.to_string()))
    }
}

/// Validation failures for a fetched book row.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookValidationError {
    #[error("book id must not be blank")]
    BlankId,
    #[error("book `{0}` has a blank title")]
    BlankTitle(BookId),
    #[error("book `{0}` has a blank author")]
    BlankAuthor(BookId),
}

/// One catalog record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub description: String,
    /// Rendered as-is; there is no fallback image.
    pub cover_image_url: String,
    pub external_link: String,
    pub isbn: Option<String>,
    pub published_year: Option<i32>,
    pub genre: Option<String>,
    /// Raw category text as stored; see [`Book::known_category`].
    pub category: Option<String>,
    /// Stable catalog position, independent of list order.
    pub booknumber: Option<u32>,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds.
    pub updated_at: i64,
}

impl Book {
    /// Creates a record with the required fields and empty optional metadata.
    pub fn new(
        id: impl Into<BookId>,
        title: impl Into<String>,
        author: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            author: author.into(),
            description: String::new(),
            cover_image_url: String::new(),
            external_link: String::new(),
            isbn: None,
            published_year: None,
            genre: None,
            category: None,
            booknumber: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    /// Checks the fields every view relies on.
    pub fn validate(&self) -> Result<(), BookValidationError> {
        if self.id.trim().is_empty() {
            return Err(BookValidationError::BlankId);
        }
        if self.title.trim().is_empty() {
            return Err(BookValidationError::BlankTitle(self.id.clone()));
        }
        if self.author.trim().is_empty() {
            return Err(BookValidationError::BlankAuthor(self.id.clone()));
        }
        Ok(())
    }

    /// Sets the category to one of the known shelf categories.
    pub fn with_category(mut self, category: BookCategory) -> Self {
        self.category = Some(category.as_str().to_string());
        self
    }

    /// `true` when the category is absent or blank.
    pub fn is_uncategorized(&self) -> bool {
        self.category
            .as_deref()
            .map_or(true, |text| text.trim().is_empty())
    }

    /// Parsed category; `None` for blank or unrecognized text.
    pub fn known_category(&self) -> Option<BookCategory> {
        self.category.as_deref()?.trim().parse().ok()
    }

    /// Cover URL suitable for direct image loading.
    ///
    /// Google Drive "file view" pages are rewritten to their direct image
    /// form; every other URL is returned unchanged.
    pub fn cover_url(&self) -> String {
        direct_image_url(&self.cover_image_url)
    }

    /// Presentation tilt in degrees, within `[-10.0, 10.0]`.
    ///
    /// Derived from the id alone, so the same book keeps the same tilt across
    /// recomputations and sessions.
    pub fn tilt_degrees(&self) -> f64 {
        let unit = (xxh3_64(self.id.as_bytes()) >> 11) as f64 / (1u64 << 53) as f64;
        unit * (2.0 * MAX_TILT_DEGREES) - MAX_TILT_DEGREES
    }
}

/// Rewrites a Google Drive share link into a directly loadable image URL.
pub fn direct_image_url(url: &str) -> String {
    if url.is_empty() {
        return String::new();
    }

    match DRIVE_VIEW_RE.captures(url).and_then(|caps| caps.get(1)) {
        Some(file_id) => format!(
            "https://drive.google.com/uc?export=view&id={}",
            file_id.as_str()
        ),
        None => url.to_string(),
    }
}
