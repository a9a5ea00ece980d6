//! Configuration file parser for ~/.config/gnews/config.toml.
//!
//! The config file is optional; a missing file yields `Config::default()`.
//! Unknown keys are silently ignored by serde (with `deny_unknown_fields` off),
//! though we log a warning when the file contains potential typos.
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::news::{DateParsing, NewsOptions};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config file exceeds maximum allowed size.
    #[error("Config file too large: {0}")]
    TooLarge(String),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Top-level application configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
/// Missing keys fall back to `Default::default()`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Language code sent as part of `hl` and `ceid` (e.g., "en").
    pub language: String,

    /// Country code sent as `gl` and part of `hl`/`ceid` (e.g., "US").
    pub country: String,

    /// Endpoint override. `None` uses the public Google News endpoint.
    pub base_url: Option<String>,

    /// Transport timeout in seconds. 0 = no timeout.
    pub timeout_secs: u64,

    /// User-Agent header for requests. `None` uses reqwest's default (none).
    pub user_agent: Option<String>,

    /// Fail a request on unparseable publish dates instead of using zero time.
    pub strict_dates: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            country: "US".to_string(),
            base_url: None,
            timeout_secs: 30,
            user_agent: None,
            strict_dates: false,
        }
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → silently accepted (serde default behavior), logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // Race condition: file deleted between metadata and read
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        // Parse the TOML content first as a raw table to detect unknown keys
        if let Ok(raw) = content.parse::<toml::Table>() {
            let known_keys = [
                "language",
                "country",
                "base_url",
                "timeout_secs",
                "user_agent",
                "strict_dates",
            ];
            for key in raw.keys() {
                if !known_keys.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(&content)?;
        tracing::info!(
            path = %path.display(),
            language = %config.language,
            country = %config.country,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Builds client options, including an HTTP client carrying the
    /// configured timeout and user agent.
    ///
    /// Empty `language`/`country` are passed through unchanged; they are
    /// rejected by [`GoogleNews::new`](crate::news::GoogleNews::new).
    pub fn to_options(&self) -> Result<NewsOptions, ConfigError> {
        let mut builder = reqwest::Client::builder();
        if self.timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(self.timeout_secs));
        }
        if let Some(agent) = &self.user_agent {
            builder = builder.user_agent(agent.clone());
        }

        let mut opts = NewsOptions::new(self.language.clone(), self.country.clone())
            .with_client(builder.build()?)
            .with_date_parsing(if self.strict_dates {
                DateParsing::Strict
            } else {
                DateParsing::Lenient
            });
        if let Some(base_url) = &self.base_url {
            opts = opts.with_base_url(base_url.clone());
        }
        Ok(opts)
    }
}

// ============================================================================
// Tests
// ============================================================================
