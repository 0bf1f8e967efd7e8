//! Generation Backend Integration
//!
//! This module provides abstracted access to generative services through a
//! common trait interface.
//!
//! # Available Backends
//!
//! - **Gemini**: Google generative language API (default)
//!
//! # Usage
//!
//! ```ignore
//! use shelf_core::backend::{GeminiBackend, GenerationBackend, GenerationRequest};
//!
//! let backend = GeminiBackend::from_config(&config)?;
//! let request = GenerationRequest::new("List three books", "gemini-2.5-flash");
//! let response = backend.generate(&request).await?;
//! ```

mod gemini;
mod traits;

pub use gemini::GeminiBackend;
pub use traits::{GenerationBackend, GenerationRequest, GenerationResponse};
