//! Derived View Engine
//!
//! A pure function from (library, query, sort) to the ordered books to show.
//! No side effects, no I/O; the shell recomputes it whenever any input
//! changes.
//!
//! - Filter: keep a book if the query is empty or is a case-insensitive
//!   substring of its title or its author.
//! - Sort: by title, author (Unicode collation at primary strength) or
//!   publication year (numeric), reversed for descending. The sort is stable,
//!   so books with equal keys keep their library order in both directions.

use std::cmp::Ordering;
use std::fmt;

use icu_collator::{Collator, CollatorOptions, Strength};
use serde::{Deserialize, Serialize};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::book::Book;

/// Field the view is sorted by
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    /// Book title
    #[default]
    Title,
    /// Author name
    Author,
    /// Publication year
    PublishedYear,
}

impl SortKey {
    /// All keys, in cycling order
    pub const ALL: [SortKey; 3] = [SortKey::Title, SortKey::Author, SortKey::PublishedYear];

    /// Display label
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            SortKey::Title => "Title",
            SortKey::Author => "Author",
            SortKey::PublishedYear => "Year",
        }
    }

    /// The key after this one, wrapping around
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            SortKey::Title => SortKey::Author,
            SortKey::Author => SortKey::PublishedYear,
            SortKey::PublishedYear => SortKey::Title,
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Direction of the sort
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortDirection {
    /// Smallest first
    #[default]
    Ascending,
    /// Largest first
    Descending,
}

impl SortDirection {
    /// The opposite direction
    #[must_use]
    pub fn toggle(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    /// Arrow glyph for the direction
    #[must_use]
    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Ascending => "↑",
            SortDirection::Descending => "↓",
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// Sort key plus direction
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortSpec {
    /// Field to sort by
    pub key: SortKey,
    /// Direction
    pub direction: SortDirection,
}

impl SortSpec {
    /// Create a sort order
    #[must_use]
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// Compare two books under this ordering
    #[must_use]
    pub fn compare(&self, a: &Book, b: &Book) -> Ordering {
        let ordering = match self.key {
            SortKey::Title => compare_base(&a.title, &b.title),
            SortKey::Author => compare_base(&a.author, &b.author),
            SortKey::PublishedYear => a.published_year.cmp(&b.published_year),
        };
        self.direction.apply(ordering)
    }
}

thread_local! {
    static PRIMARY_COLLATOR: Option<Collator> = primary_collator();
}

/// Root-locale collator that only looks at base letters
fn primary_collator() -> Option<Collator> {
    let mut options = CollatorOptions::new();
    options.strength = Some(Strength::Primary);

    match Collator::try_new(&Default::default(), options) {
        Ok(collator) => Some(collator),
        Err(e) => {
            tracing::warn!(error = ?e, "Collation data unavailable, sorting by base form");
            None
        }
    }
}

/// Fallback collation key: decomposed, combining marks stripped, lowercased
fn base_form(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Compare strings at base sensitivity
///
/// Case and accents do not affect the order: `"Émile"`, `"emile"` and
/// `"EMILE"` are equal. Letters with no decomposition sort with their base
/// letter (`Ø` near `O`, `Ł` near `L`), and `ß` equals `ss`.
#[must_use]
pub fn compare_base(a: &str, b: &str) -> Ordering {
    PRIMARY_COLLATOR
        .try_with(|collator| collator.as_ref().map(|c| c.compare(a, b)))
        .ok()
        .flatten()
        .unwrap_or_else(|| base_form(a).cmp(&base_form(b)))
}

/// Whether a book matches a free-text query
///
/// Case-insensitive substring match on title or author. An empty query
/// matches everything.
#[must_use]
pub fn matches_query(book: &Book, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    book.title.to_lowercase().contains(&needle) || book.author.to_lowercase().contains(&needle)
}

/// Positions in `books` of the derived view, in display order
#[must_use]
pub fn derive_view_indices(books: &[Book], query: &str, sort: SortSpec) -> Vec<usize> {
    if books.is_empty() {
        return Vec::new();
    }

    let mut indices: Vec<usize> = books
        .iter()
        .enumerate()
        .filter(|(_, book)| matches_query(book, query))
        .map(|(i, _)| i)
        .collect();

    // Stable: equal keys stay in library order
    indices.sort_by(|&a, &b| sort.compare(&books[a], &books[b]));
    indices
}

/// The derived view as references into `books`
#[must_use]
pub fn derive_view<'a>(books: &'a [Book], query: &str, sort: SortSpec) -> Vec<&'a Book> {
    derive_view_indices(books, query, sort)
        .into_iter()
        .map(|i| &books[i])
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::book::fixtures::book;

    fn titles(view: &[&Book]) -> Vec<String> {
        view.iter().map(|b| b.title.clone()).collect()
    }

    fn dune_and_hobbit() -> Vec<Book> {
        vec![
            book("1", "Dune", "Herbert", 1965),
            book("2", "Hobbit", "Tolkien", 1937),
        ]
    }

    #[test]
    fn test_sort_by_year_ascending() {
        let books = dune_and_hobbit();
        let view = derive_view(
            &books,
            "",
            SortSpec::new(SortKey::PublishedYear, SortDirection::Ascending),
        );
        assert_eq!(titles(&view), vec!["Hobbit", "Dune"]);
    }

    #[test]
    fn test_query_matches_author_substring() {
        let books = dune_and_hobbit();
        let view = derive_view(&books, "herb", SortSpec::default());
        assert_eq!(titles(&view), vec!["Dune"]);
    }

    #[test]
    fn test_query_is_case_insensitive() {
        let books = dune_and_hobbit();
        assert_eq!(derive_view(&books, "HOBB", SortSpec::default()).len(), 1);
        assert_eq!(derive_view(&books, "tOLk", SortSpec::default()).len(), 1);
        assert_eq!(derive_view(&books, "xyz", SortSpec::default()).len(), 0);
    }

    #[test]
    fn test_query_is_substring_not_word() {
        let books = vec![book("1", "The Windup Girl", "Bacigalupi", 2009)];
        assert_eq!(derive_view(&books, "dup gi", SortSpec::default()).len(), 1);
        assert_eq!(derive_view(&books, "girl windup", SortSpec::default()).len(), 0);
    }

    #[test]
    fn test_empty_query_is_identity_filter() {
        let books = dune_and_hobbit();
        assert_eq!(derive_view(&books, "", SortSpec::default()).len(), 2);
    }

    #[test]
    fn test_empty_library_short_circuits() {
        assert!(derive_view_indices(&[], "anything", SortSpec::default()).is_empty());
        assert!(derive_view(&[], "", SortSpec::default()).is_empty());
    }

    #[test]
    fn test_title_sort_ignores_case_and_accents() {
        let books = vec![
            book("1", "zebra", "A", 2000),
            book("2", "Émile", "A", 2000),
            book("3", "apple", "A", 2000),
            book("4", "Banana", "A", 2000),
        ];
        let view = derive_view(&books, "", SortSpec::default());
        assert_eq!(titles(&view), vec!["apple", "Banana", "Émile", "zebra"]);
    }

    #[test]
    fn test_descending_reverses() {
        let books = vec![
            book("1", "B", "x", 1900),
            book("2", "C", "x", 1900),
            book("3", "A", "x", 1900),
        ];
        let view = derive_view(
            &books,
            "",
            SortSpec::new(SortKey::Title, SortDirection::Descending),
        );
        assert_eq!(titles(&view), vec!["C", "B", "A"]);
    }

    #[test]
    fn test_ties_keep_library_order_in_both_directions() {
        let books = vec![
            book("1", "First", "Same", 1900),
            book("2", "Second", "Same", 1900),
            book("3", "Third", "Same", 1900),
        ];
        for direction in [SortDirection::Ascending, SortDirection::Descending] {
            let view = derive_view(&books, "", SortSpec::new(SortKey::Author, direction));
            assert_eq!(titles(&view), vec!["First", "Second", "Third"]);
        }
    }

    #[test]
    fn test_accent_variants_tie() {
        let books = vec![book("1", "Émile", "x", 1), book("2", "emile", "x", 1)];
        let view = derive_view(&books, "", SortSpec::default());
        assert_eq!(titles(&view), vec!["Émile", "emile"]);
        assert_eq!(compare_base("Émile", "EMILE"), Ordering::Equal);
    }

    #[test]
    fn test_undecomposable_letters_sort_with_their_base() {
        assert_eq!(compare_base("Østergaard", "Zebra"), Ordering::Less);
        assert_eq!(compare_base("Łódź", "Mars"), Ordering::Less);
        assert_eq!(compare_base("Æsop", "Bach"), Ordering::Less);
        assert_eq!(compare_base("straße", "strasse"), Ordering::Equal);
    }

    #[test]
    fn test_nordic_and_polish_titles_interleave() {
        let books: Vec<Book> = ["Zebra", "Østergaard", "Łódź", "Æsop", "Olive", "Ledger"]
            .iter()
            .enumerate()
            .map(|(i, title)| book(&i.to_string(), title, "x", 2000))
            .collect();
        let view = derive_view(&books, "", SortSpec::default());
        assert_eq!(
            titles(&view),
            vec!["Æsop", "Ledger", "Łódź", "Olive", "Østergaard", "Zebra"]
        );
    }

    #[test]
    fn test_base_form_fallback_key() {
        assert_eq!(base_form("Émile"), "emile");
        assert_eq!(base_form("CAFÉ"), "cafe");
    }

    #[test]
    fn test_input_is_not_mutated() {
        let books = vec![
            book("1", "Zulu", "x", 1),
            book("2", "Alpha", "x", 2),
        ];
        let before = books.clone();
        let _ = derive_view(&books, "", SortSpec::default());
        assert_eq!(books, before);
    }

    #[test]
    fn test_sort_key_cycle() {
        assert_eq!(SortKey::Title.next(), SortKey::Author);
        assert_eq!(SortKey::Author.next(), SortKey::PublishedYear);
        assert_eq!(SortKey::PublishedYear.next(), SortKey::Title);
        assert_eq!(SortDirection::Ascending.toggle(), SortDirection::Descending);
    }
}
