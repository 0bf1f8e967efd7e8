//! Generation Backend Traits
//!
//! Trait definitions for generative backends. This abstraction keeps the
//! vendor request format out of the fetch client, so the service behind a
//! library can be swapped without touching the view engine or the shell.
//!
//! Implementations handle provider-specific details (endpoint layout, auth
//! headers, schema dialect placement, response envelope).

use async_trait::async_trait;

use crate::error::GenerationError;

/// A single structured-output generation request
#[derive(Clone, Debug)]
pub struct GenerationRequest {
    /// Natural-language instruction
    pub prompt: String,
    /// Model to use (backend-specific identifier)
    pub model: String,
    /// Schema the output must match, in the backend's schema dialect
    pub response_schema: Option<serde_json::Value>,
    /// MIME type requested for the output
    pub response_mime_type: String,
}

impl Default for GenerationRequest {
    fn default() -> Self {
        Self {
            prompt: String::new(),
            model: String::new(),
            response_schema: None,
            response_mime_type: "application/json".to_string(),
        }
    }
}

impl GenerationRequest {
    /// Create a new request with prompt and model
    pub fn new(prompt: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model: model.into(),
            ..Default::default()
        }
    }

    /// Constrain the output to a schema
    #[must_use]
    pub fn with_schema(mut self, schema: serde_json::Value) -> Self {
        self.response_schema = Some(schema);
        self
    }
}

/// Response from a generation request
#[derive(Clone, Debug)]
pub struct GenerationResponse {
    /// The generated text
    pub text: String,
    /// Model that generated the response
    pub model: String,
    /// Round-trip time in milliseconds
    pub duration_ms: Option<u64>,
}

/// Generation backend trait
///
/// Implement this trait to add support for a different generative service.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Get the backend name (e.g., "Gemini")
    fn name(&self) -> &str;

    /// Send a request and wait for the complete response
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, GenerationError>;
}
