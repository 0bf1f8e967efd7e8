//! storyshelf TUI - Terminal interface for storyshelf
//!
//! A full-screen terminal surface over [`shelf_core`]: a searchable,
//! sortable grid of generated books with a detail overlay.
//!
//! # Architecture
//!
//! - **App**: event loop, key map, rendering
//! - **Compositor**: layered rendering with z-ordering for the detail overlay
//! - **Display**: screen regions, responsive grid geometry, focus cursor
//! - **Widgets**: borderless scrollable text blocks

pub mod app;
pub mod compositor;
pub mod display;
pub mod theme;
pub mod widgets;

pub use app::{App, InputMode};
