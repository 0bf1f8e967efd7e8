//! Per-record validation of generated books
//!
//! The service is asked for schema-conforming output but nothing forces it
//! to comply. Records are checked one by one so a single bad element costs
//! one book, not the whole library:
//!
//! 1. elements that do not deserialize into [`Book`] are dropped
//! 2. blank titles or authors are dropped; a blank id gets a fresh one
//! 3. duplicate ids keep their first occurrence
//! 4. ratings are clamped into `MIN_RATING..=MAX_RATING`
//! 5. implausible publication years are kept but reported

use std::collections::HashSet;

use crate::book::{Book, BookId, MAX_RATING, MIN_RATING};

/// Earliest publication year not reported as suspicious
pub const EARLIEST_PLAUSIBLE_YEAR: i32 = 1000;

/// What sanitizing changed, for logging
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SanitizeReport {
    /// Elements in the generated array
    pub received: usize,
    /// Elements that were not book-shaped
    pub malformed: usize,
    /// Records dropped for a blank title or author
    pub missing_text: usize,
    /// Records that got a generated id
    pub reassigned_ids: usize,
    /// Records dropped as duplicate ids
    pub duplicates: usize,
    /// Records whose rating was clamped
    pub clamped_ratings: usize,
    /// Records with a publication year outside the plausible range
    pub odd_years: usize,
}

impl SanitizeReport {
    /// Records dropped for any reason
    #[must_use]
    pub fn dropped(&self) -> usize {
        self.malformed + self.missing_text + self.duplicates
    }

    /// Whether any record was dropped or altered
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.dropped() == 0 && self.reassigned_ids == 0 && self.clamped_ratings == 0
    }
}

/// Validate generated elements, returning the usable books in their original order
pub fn sanitize_records(
    items: Vec<serde_json::Value>,
    current_year: i32,
) -> (Vec<Book>, SanitizeReport) {
    let mut report = SanitizeReport {
        received: items.len(),
        ..SanitizeReport::default()
    };
    let mut seen: HashSet<BookId> = HashSet::with_capacity(items.len());
    let mut books = Vec::with_capacity(items.len());

    for (index, item) in items.into_iter().enumerate() {
        let mut book: Book = match serde_json::from_value(item) {
            Ok(book) => book,
            Err(e) => {
                tracing::warn!(index, error = %e, "Dropping malformed generated record");
                report.malformed += 1;
                continue;
            }
        };

        if book.title.trim().is_empty() || book.author.trim().is_empty() {
            tracing::warn!(index, id = %book.id, "Dropping record without title or author");
            report.missing_text += 1;
            continue;
        }

        if book.id.as_str().trim().is_empty() {
            book.id = BookId::generate();
            report.reassigned_ids += 1;
        }

        if !seen.insert(book.id.clone()) {
            tracing::warn!(index, id = %book.id, "Dropping record with duplicate id");
            report.duplicates += 1;
            continue;
        }

        if !book.rating.is_finite() {
            book.rating = MIN_RATING;
            report.clamped_ratings += 1;
        } else if !(MIN_RATING..=MAX_RATING).contains(&book.rating) {
            book.rating = book.rating.clamp(MIN_RATING, MAX_RATING);
            report.clamped_ratings += 1;
        }

        if !(EARLIEST_PLAUSIBLE_YEAR..=current_year + 1).contains(&book.published_year) {
            tracing::warn!(
                id = %book.id,
                year = book.published_year,
                "Generated record has an implausible publication year"
            );
            report.odd_years += 1;
        }

        books.push(book);
    }

    (books, report)
}
