//! Library Fetch Client
//!
//! Turns one generation round-trip into a list of books. The caller gets
//! either a non-empty, validated list or a [`GenerationError`]; never a
//! partial or malformed one.
//!
//! # Pipeline
//!
//! ```text
//! prompt + schema ──► GenerationBackend ──► text ──► JSON ──► non-empty array
//!                                                              │
//!                                     Vec<Book> ◄── sanitize ◄─┘
//! ```
//!
//! Every failure is logged here with full detail. What the user sees is
//! decided by the shell.

mod prompt;
mod sanitize;

use async_trait::async_trait;
use chrono::Datelike;

use crate::backend::{GenerationBackend, GenerationRequest};
use crate::book::Book;
use crate::config::ShelfConfig;
use crate::error::{json_type_name, GenerationError};

pub use prompt::{book_schema, library_prompt, library_schema, BOOK_FIELDS, GENRE_MIX};
pub use sanitize::{sanitize_records, SanitizeReport, EARLIEST_PLAUSIBLE_YEAR};

/// Anything that can produce a whole library in one call
///
/// This is the only thing the shell knows about where books come from.
#[async_trait]
pub trait LibrarySource: Send + Sync {
    /// Fetch a complete, non-empty library
    async fn fetch_library(&self) -> Result<Vec<Book>, GenerationError>;
}

/// Fetch client settings
#[derive(Clone, Debug)]
pub struct LibraryClientConfig {
    /// Model identifier passed to the backend
    pub model: String,
    /// Books requested per fetch
    pub book_count: usize,
}

impl From<&ShelfConfig> for LibraryClientConfig {
    fn from(config: &ShelfConfig) -> Self {
        Self {
            model: config.model.clone(),
            book_count: config.book_count,
        }
    }
}

/// [`LibrarySource`] backed by a generative service
pub struct LibraryClient<B: GenerationBackend> {
    backend: B,
    config: LibraryClientConfig,
}

impl<B: GenerationBackend> LibraryClient<B> {
    /// Create a client over a backend
    pub fn new(backend: B, config: LibraryClientConfig) -> Self {
        Self { backend, config }
    }

    /// The backend this client talks to
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Build the generation request for one fetch
    #[must_use]
    pub fn build_request(&self) -> GenerationRequest {
        GenerationRequest::new(library_prompt(self.config.book_count), &self.config.model)
            .with_schema(library_schema())
    }

    async fn generate_library(&self) -> Result<Vec<Book>, GenerationError> {
        let request = self.build_request();
        let response = self.backend.generate(&request).await?;

        tracing::debug!(
            backend = self.backend.name(),
            model = %response.model,
            duration_ms = ?response.duration_ms,
            bytes = response.text.len(),
            "Generation response received"
        );

        let books = parse_library(&response.text)?;
        tracing::info!(count = books.len(), "Library generated");
        Ok(books)
    }
}

#[async_trait]
impl<B: GenerationBackend> LibrarySource for LibraryClient<B> {
    async fn fetch_library(&self) -> Result<Vec<Book>, GenerationError> {
        self.generate_library().await.map_err(|e| {
            tracing::error!(
                backend = self.backend.name(),
                transient = e.is_transient(),
                error = %e,
                "Failed to generate book library"
            );
            e
        })
    }
}

/// Parse generated text into a validated library
///
/// # Errors
///
/// [`GenerationError::MalformedJson`] if the text is not JSON,
/// [`GenerationError::NotAnArray`] / [`GenerationError::EmptyLibrary`] if it
/// is not a non-empty array, [`GenerationError::NoValidRecords`] if no
/// element survives validation.
pub fn parse_library(text: &str) -> Result<Vec<Book>, GenerationError> {
    let value: serde_json::Value = serde_json::from_str(text.trim())?;

    let items = match value {
        serde_json::Value::Array(items) => items,
        other => {
            return Err(GenerationError::NotAnArray {
                found: json_type_name(&other),
            })
        }
    };

    if items.is_empty() {
        return Err(GenerationError::EmptyLibrary);
    }

    let received = items.len();
    let (books, report) = sanitize_records(items, chrono::Utc::now().year());

    if !report.is_clean() {
        tracing::warn!(?report, "Generated records needed repair");
    }

    if books.is_empty() {
        return Err(GenerationError::NoValidRecords { received });
    }

    Ok(books)
}
