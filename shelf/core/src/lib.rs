//! Shelf Core - Headless Library Engine for storyshelf
//!
//! This crate holds everything storyshelf does apart from drawing: it asks a
//! generative service for a library of fictional books, validates the
//! answer, and derives the filtered and sorted view a surface renders. It can
//! drive a TUI, a GUI, or run headless for tests.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      UI Surface (TUI)                         │
//! │           ShellEvent (down)     accessors (up)                │
//! └──────────────────────────────┬───────────────────────────────┘
//!                                │
//! ┌──────────────────────────────┼───────────────────────────────┐
//! │                          SHELF CORE                           │
//! │  ┌───────────────────────────┴─────────────────────────────┐  │
//! │  │                         Shell                            │  │
//! │  │   fetch lifecycle · query · sort · selection · error     │  │
//! │  └──────────┬─────────────────────────────┬────────────────┘  │
//! │             │                             │                   │
//! │   ┌─────────┴─────────┐         ┌─────────┴─────────┐         │
//! │   │  LibrarySource    │         │   View engine     │         │
//! │   │  (LibraryClient)  │         │  filter + sort    │         │
//! │   └─────────┬─────────┘         └───────────────────┘         │
//! │   ┌─────────┴─────────┐                                       │
//! │   │ GenerationBackend │ ──► generative service (HTTP)         │
//! │   │     (Gemini)      │                                       │
//! │   └───────────────────┘                                       │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```ignore
//! use shelf_core::{GeminiBackend, LibraryClient, Shell, ShellEvent, ShelfConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ShelfConfig::from_env()?;
//!     let backend = GeminiBackend::from_config(&config)?;
//!     let client = LibraryClient::new(backend, (&config).into());
//!
//!     let mut shell = Shell::new(client);
//!     shell.handle_event(ShellEvent::Mounted);
//!
//!     loop {
//!         shell.poll_fetch();
//!         // render shell.view(), feed user input back as ShellEvents
//!     }
//! }
//! ```
//!
//! # Module Overview
//!
//! - [`book`]: the book record
//! - [`backend`]: generative service abstraction (Gemini)
//! - [`library`]: fetch client, prompt and schema, record validation
//! - [`view`]: filter and sort
//! - [`shell`]: state owner and fetch lifecycle
//! - [`config`]: startup configuration
//! - [`error`]: error types
//!
//! # No TUI Dependencies
//!
//! This crate has **zero** dependencies on ratatui, crossterm, or any other
//! UI framework.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod backend;
pub mod book;
pub mod config;
pub mod error;
pub mod library;
pub mod shell;
pub mod view;

// Re-exports for convenience
pub use backend::{GeminiBackend, GenerationBackend, GenerationRequest, GenerationResponse};
pub use book::{Book, BookId};
pub use config::{default_config_path, ApiKey, ConfigSource, ShelfConfig};
pub use error::{ConfigError, GenerationError};
pub use library::{parse_library, LibraryClient, LibraryClientConfig, LibrarySource};
pub use shell::{FetchPhase, FetchTicket, Shell, ShellEvent, ShellStatus, LIBRARY_UNAVAILABLE};
pub use view::{derive_view, derive_view_indices, SortDirection, SortKey, SortSpec};
