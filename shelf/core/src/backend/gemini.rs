//! Gemini Backend Implementation
//!
//! Generation backend for Google's generative language REST API.
//!
//! # Gemini API
//!
//! - `POST {endpoint}/models/{model}:generateContent` - one-shot generation
//!
//! The credential travels in the `x-goog-api-key` header. Structured output
//! is requested through `generationConfig.responseMimeType` and
//! `generationConfig.responseSchema`; the generated text comes back in
//! `candidates[0].content.parts[*].text`.

use std::time::{Duration, Instant};

use async_trait::async_trait;

use super::traits::{GenerationBackend, GenerationRequest, GenerationResponse};
use crate::config::{ApiKey, ShelfConfig};
use crate::error::GenerationError;

const BACKEND_NAME: &str = "Gemini";

/// Gemini backend client
#[derive(Clone)]
pub struct GeminiBackend {
    /// API base URL
    endpoint: String,
    /// API credential
    api_key: ApiKey,
    /// Request timeout, also reported in timeout errors
    timeout: Duration,
    /// HTTP client
    http_client: reqwest::Client,
}

impl GeminiBackend {
    /// Create a new Gemini backend
    ///
    /// # Errors
    ///
    /// Fails only if the TLS backend of the HTTP client cannot be initialized.
    pub fn new(
        endpoint: impl Into<String>,
        api_key: ApiKey,
        timeout: Duration,
    ) -> Result<Self, GenerationError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| GenerationError::Transport {
                backend: BACKEND_NAME.to_string(),
                source,
            })?;

        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key,
            timeout,
            http_client,
        })
    }

    /// Create from resolved startup configuration
    ///
    /// # Errors
    ///
    /// See [`GeminiBackend::new`].
    pub fn from_config(config: &ShelfConfig) -> Result<Self, GenerationError> {
        Self::new(
            config.endpoint.clone(),
            config.api_key.clone(),
            config.request_timeout,
        )
    }

    /// Get generate endpoint URL
    fn generate_url(&self, model: &str) -> String {
        format!("{}/models/{model}:generateContent", self.endpoint)
    }

    /// Build the JSON request body
    fn build_body(request: &GenerationRequest) -> serde_json::Value {
        let mut generation_config = serde_json::json!({
            "responseMimeType": request.response_mime_type,
        });

        if let Some(ref schema) = request.response_schema {
            generation_config["responseSchema"] = schema.clone();
        }

        serde_json::json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": request.prompt }],
            }],
            "generationConfig": generation_config,
        })
    }

    /// Map a client error onto the generation error taxonomy
    fn map_transport(&self, source: reqwest::Error) -> GenerationError {
        if source.is_timeout() {
            GenerationError::Timeout {
                backend: BACKEND_NAME.to_string(),
                after: self.timeout,
            }
        } else {
            GenerationError::Transport {
                backend: BACKEND_NAME.to_string(),
                source,
            }
        }
    }
}

/// Concatenate the text parts of the first candidate
fn extract_text(data: &serde_json::Value) -> Option<String> {
    let parts = data
        .get("candidates")?
        .as_array()?
        .first()?
        .get("content")?
        .get("parts")?
        .as_array()?;

    let text: String = parts
        .iter()
        .filter_map(|p| p.get("text").and_then(serde_json::Value::as_str))
        .collect();

    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Decode a success body into the generated text
///
/// A body that is not JSON at all is an envelope fault, not bad model output.
fn parse_envelope(body: &str) -> Result<String, GenerationError> {
    let data: serde_json::Value =
        serde_json::from_str(body).map_err(|source| GenerationError::MalformedEnvelope {
            backend: BACKEND_NAME.to_string(),
            source,
        })?;

    extract_text(&data).ok_or_else(|| {
        if let Some(reason) = data
            .get("promptFeedback")
            .and_then(|f| f.get("blockReason"))
            .and_then(serde_json::Value::as_str)
        {
            tracing::warn!(reason = %reason, "Generation was blocked");
        }
        GenerationError::EmptyResponse {
            backend: BACKEND_NAME.to_string(),
        }
    })
}

#[async_trait]
impl GenerationBackend for GeminiBackend {
    fn name(&self) -> &'static str {
        BACKEND_NAME
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, GenerationError> {
        let start = Instant::now();
        let url = self.generate_url(&request.model);
        let body = Self::build_body(request);

        tracing::debug!(model = %request.model, url = %url, "Sending generation request");

        let response = self
            .http_client
            .post(&url)
            .header("x-goog-api-key", self.api_key.expose())
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_transport(e))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| self.map_transport(e))?;

        if !status.is_success() {
            return Err(GenerationError::Service {
                backend: BACKEND_NAME.to_string(),
                status: status.as_u16(),
                body: text,
            });
        }

        let content = parse_envelope(&text)?;

        Ok(GenerationResponse {
            text: content,
            model: request.model.clone(),
            duration_ms: Some(u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)),
        })
    }
}
