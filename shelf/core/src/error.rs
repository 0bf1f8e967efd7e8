//! Error Types
//!
//! Two error families cross the crate boundary:
//!
//! - [`ConfigError`]: startup configuration could not be resolved. Fatal;
//!   the surface reports it and exits before any fetch is attempted.
//! - [`GenerationError`]: a fetch failed. Logged in full by the fetch client
//!   and reduced to a fixed user-facing message by the shell.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Errors that can occur when resolving configuration at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No API credential in the environment
    #[error("No API credential found: set {0} in the environment")]
    MissingCredential(&'static str),

    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Errors produced while generating a library
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The request never produced an HTTP response (DNS, TLS, connection reset...)
    #[error("Transport failure talking to {backend}: {source}")]
    Transport {
        /// Backend name
        backend: String,
        /// Underlying client error
        source: reqwest::Error,
    },

    /// No response within the configured timeout
    #[error("{backend} did not respond within {}s", .after.as_secs())]
    Timeout {
        /// Backend name
        backend: String,
        /// The timeout that elapsed
        after: Duration,
    },

    /// The service answered with a non-success status
    #[error("{backend} returned {status}: {body}")]
    Service {
        /// Backend name
        backend: String,
        /// HTTP status code
        status: u16,
        /// Response body, as returned
        body: String,
    },

    /// A success response that carried no generated text
    #[error("{backend} returned no generated content")]
    EmptyResponse {
        /// Backend name
        backend: String,
    },

    /// A success response whose envelope could not be decoded
    #[error("{backend} sent a response envelope that is not valid JSON: {source}")]
    MalformedEnvelope {
        /// Backend name
        backend: String,
        /// Decoder error
        source: serde_json::Error,
    },

    /// The generated text is not valid JSON
    #[error("Generated text is not valid JSON: {0}")]
    MalformedJson(#[from] serde_json::Error),

    /// The generated JSON is valid but not an array
    #[error("Generated data is not an array (found {found})")]
    NotAnArray {
        /// JSON type that was found instead
        found: &'static str,
    },

    /// The generated array is empty
    #[error("Generated library is empty")]
    EmptyLibrary,

    /// Every generated record was rejected by validation
    #[error("None of the {received} generated records were usable")]
    NoValidRecords {
        /// How many records the service returned
        received: usize,
    },

    /// The fetch task ended without reporting a result
    #[error("Library fetch was aborted: {0}")]
    Aborted(String),
}

impl GenerationError {
    /// Whether repeating the same request could plausibly succeed
    ///
    /// Network trouble, timeouts, throttling and server-side failures are
    /// transient. Malformed or empty output is treated as permanent for the
    /// request as issued, even though a user retry regenerates everything.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport { .. } | Self::Timeout { .. } | Self::MalformedEnvelope { .. } => true,
            Self::Service { status, .. } => *status == 429 || *status >= 500,
            Self::EmptyResponse { .. }
            | Self::MalformedJson(_)
            | Self::NotAnArray { .. }
            | Self::EmptyLibrary
            | Self::NoValidRecords { .. }
            | Self::Aborted(_) => false,
        }
    }
}

/// Name of a JSON value's type, for diagnostics
pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
