//! Startup Configuration
//!
//! Everything the fetch client needs is resolved once, at process start, and
//! injected into [`GeminiBackend`](crate::backend::GeminiBackend) and
//! [`LibraryClient`](crate::library::LibraryClient). Nothing reads the
//! environment after that.
//!
//! # Configuration Priority
//!
//! 1. Environment variables
//! 2. TOML configuration file
//! 3. Default values
//!
//! The API credential is only ever taken from the environment (`API_KEY`,
//! falling back to `GEMINI_API_KEY`). Its absence is a
//! [`ConfigError::MissingCredential`].
//!
//! # Example Configuration
//!
//! `$XDG_CONFIG_HOME/storyshelf/storyshelf.toml`:
//!
//! ```toml
//! [generation]
//! model = "gemini-2.5-flash"
//! book_count = 40
//! timeout_secs = 60
//! endpoint = "https://generativelanguage.googleapis.com/v1beta"
//! ```

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Environment variables searched for the API credential, in order
pub const API_KEY_VARS: [&str; 2] = ["API_KEY", "GEMINI_API_KEY"];

/// Default generation model
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default number of books requested per fetch
pub const DEFAULT_BOOK_COUNT: usize = 40;

/// Upper bound on the number of books requested per fetch
pub const MAX_BOOK_COUNT: usize = 100;

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Default REST endpoint of the generative language API
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

const ENV_MODEL: &str = "STORYSHELF_MODEL";
const ENV_BOOK_COUNT: &str = "STORYSHELF_BOOK_COUNT";
const ENV_TIMEOUT: &str = "STORYSHELF_TIMEOUT_SECS";
const ENV_ENDPOINT: &str = "STORYSHELF_ENDPOINT";
const ENV_CONFIG_PATH: &str = "STORYSHELF_CONFIG";

/// API credential
///
/// `Debug` is redacted so the key never reaches a log line.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap a credential
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The raw credential, for the request header only
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Tracks where the non-secret settings came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// At least one value came from an environment variable
    Env,
    /// Values came from the TOML file
    File,
    /// Defaults only
    Default,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

/// `[generation]` section of the TOML file
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationToml {
    /// Model identifier
    pub model: Option<String>,
    /// Books requested per fetch
    pub book_count: Option<usize>,
    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,
    /// API base URL
    pub endpoint: Option<String>,
}

/// Root of the TOML file
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShelfToml {
    /// Generation settings
    pub generation: GenerationToml,
}

/// Resolved startup configuration
#[derive(Clone, Debug)]
pub struct ShelfConfig {
    /// API credential
    pub api_key: ApiKey,
    /// Generation model
    pub model: String,
    /// Books requested per fetch
    pub book_count: usize,
    /// Timeout for one generation request
    pub request_timeout: Duration,
    /// API base URL, without trailing slash
    pub endpoint: String,
    /// Config file that was applied, if any
    pub config_file_path: Option<PathBuf>,
    /// Primary source of the settings
    pub source: ConfigSource,
}

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/storyshelf/storyshelf.toml` or the platform
/// equivalent.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("storyshelf").join("storyshelf.toml"))
}

impl ShelfConfig {
    /// Configuration with default settings and the given credential
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: ApiKey::new(api_key),
            model: DEFAULT_MODEL.to_string(),
            book_count: DEFAULT_BOOK_COUNT,
            request_timeout: DEFAULT_TIMEOUT,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }

    /// Resolve configuration from the process environment
    ///
    /// # Errors
    ///
    /// [`ConfigError::MissingCredential`] when no API key is set; read, parse
    /// or validation errors for a broken config file or out-of-range values.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve configuration through an environment lookup function
    ///
    /// # Errors
    ///
    /// Same as [`ShelfConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = API_KEY_VARS
            .iter()
            .find_map(|var| lookup(var).filter(|v| !v.trim().is_empty()))
            .ok_or(ConfigError::MissingCredential(API_KEY_VARS[0]))?;

        let mut config = Self::new(api_key.trim());

        let path = lookup(ENV_CONFIG_PATH)
            .map(PathBuf::from)
            .or_else(default_config_path);
        if let Some(toml) = read_config_file(path.as_ref())? {
            config.apply_toml(&toml);
            config.config_file_path = path;
            config.source = ConfigSource::File;
        }

        config.apply_env(&lookup)?;
        config.validate()?;
        Ok(config)
    }

    fn apply_toml(&mut self, toml: &ShelfToml) {
        let generation = &toml.generation;
        if let Some(ref model) = generation.model {
            self.model.clone_from(model);
        }
        if let Some(count) = generation.book_count {
            self.book_count = count;
        }
        if let Some(secs) = generation.timeout_secs {
            self.request_timeout = Duration::from_secs(secs);
        }
        if let Some(ref endpoint) = generation.endpoint {
            self.endpoint.clone_from(endpoint);
        }
    }

    fn apply_env<F>(&mut self, lookup: &F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut touched = false;

        if let Some(model) = lookup(ENV_MODEL) {
            self.model = model;
            touched = true;
        }
        if let Some(count) = lookup(ENV_BOOK_COUNT) {
            self.book_count = parse_env(ENV_BOOK_COUNT, &count)?;
            touched = true;
        }
        if let Some(secs) = lookup(ENV_TIMEOUT) {
            self.request_timeout = Duration::from_secs(parse_env(ENV_TIMEOUT, &secs)?);
            touched = true;
        }
        if let Some(endpoint) = lookup(ENV_ENDPOINT) {
            self.endpoint = endpoint;
            touched = true;
        }

        if touched {
            self.source = ConfigSource::Env;
        }
        Ok(())
    }

    fn validate(&mut self) -> Result<(), ConfigError> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::ValidationError("model must not be empty".into()));
        }
        if !(1..=MAX_BOOK_COUNT).contains(&self.book_count) {
            return Err(ConfigError::ValidationError(format!(
                "book_count must be between 1 and {MAX_BOOK_COUNT}, got {}",
                self.book_count
            )));
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::ValidationError(
                "timeout must be at least one second".into(),
            ));
        }

        let endpoint = self.endpoint.trim().trim_end_matches('/');
        if !(endpoint.starts_with("https://") || endpoint.starts_with("http://")) {
            return Err(ConfigError::ValidationError(format!(
                "endpoint must be an http(s) URL, got {:?}",
                self.endpoint
            )));
        }
        self.endpoint = endpoint.to_string();
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(var: &str, raw: &str) -> Result<T, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::ValidationError(format!("{var} is not a valid number: {raw:?}")))
}

/// Read and parse the config file; a missing file is not an error
fn read_config_file(path: Option<&PathBuf>) -> Result<Option<ShelfToml>, ConfigError> {
    let Some(path) = path else {
        return Ok(None);
    };

    if !path.exists() {
        tracing::debug!(path = %path.display(), "Config file not found, using defaults");
        return Ok(None);
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        source: e,
    })?;
    let toml: ShelfToml = toml::from_str(&content)?;

    tracing::info!(path = %path.display(), "Loaded configuration from file");
    Ok(Some(toml))
}
