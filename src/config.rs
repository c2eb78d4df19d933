//! Engine configuration.

use crate::topics::{DEFAULT_GEMINI_MODEL, DEFAULT_WORD_COUNT, GeminiGenerator, RetryPolicy};
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Settings for stores and category generation, read from TOML.
///
/// Every field has a default, so an empty file is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct EngineConfig {
    /// File holding user-added topics.
    #[serde(default = "default_topic_store")]
    topic_store: PathBuf,

    /// File holding the player library.
    #[serde(default = "default_player_store")]
    player_store: PathBuf,

    /// Gemini model name.
    #[serde(default = "default_model")]
    model: String,

    /// Environment variable that holds the API key.
    #[serde(default = "default_api_key_env")]
    api_key_env: String,

    /// Words requested per generated category.
    #[serde(default = "default_word_count")]
    word_count: usize,

    /// Generation attempts, including the first.
    #[serde(default = "default_retry_attempts")]
    retry_attempts: u32,

    /// Delay before the first retry, in milliseconds; doubles each time.
    #[serde(default = "default_retry_base_delay_ms")]
    retry_base_delay_ms: u64,
}

#[instrument]
fn default_topic_store() -> PathBuf {
    PathBuf::from("topic_data.json")
}

#[instrument]
fn default_player_store() -> PathBuf {
    PathBuf::from("player_library.json")
}

#[instrument]
fn default_model() -> String {
    DEFAULT_GEMINI_MODEL.to_string()
}

#[instrument]
fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

fn default_word_count() -> usize {
    DEFAULT_WORD_COUNT
}

fn default_retry_attempts() -> u32 {
    3
}

fn default_retry_base_delay_ms() -> u64 {
    1000
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            topic_store: default_topic_store(),
            player_store: default_player_store(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            word_count: default_word_count(),
            retry_attempts: default_retry_attempts(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
        }
    }
}

impl EngineConfig {
    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for malformed TOML.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        let config = Self::from_toml(&content)?;
        info!(model = %config.model, "Config loaded successfully");
        Ok(config)
    }

    /// Loads `path` if it exists, otherwise returns the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file exists but is invalid.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            debug!("No config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Retry settings for generation.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.retry_attempts,
            Duration::from_millis(self.retry_base_delay_ms),
        )
    }

    /// Builds a Gemini generator. Reads the API key from the configured
    /// environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the variable is unset or the generator
    /// cannot be built.
    #[instrument(skip(self), fields(model = %self.model, key_var = %self.api_key_env))]
    pub fn create_generator(&self) -> Result<GeminiGenerator, ConfigError> {
        let api_key = std::env::var(&self.api_key_env).map_err(|_| {
            ConfigError::new(format!("{} environment variable not set", self.api_key_env))
        })?;
        let generator = GeminiGenerator::new(api_key, self.model.clone())
            .map_err(|e| ConfigError::new(e.message))?
            .with_word_count(self.word_count);
        Ok(generator)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_uses_defaults() {
        assert_eq!(EngineConfig::from_toml("").unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_retry_policy_from_config() {
        let config = EngineConfig::from_toml("retry_attempts = 5\nretry_base_delay_ms = 10").unwrap();
        let policy = config.retry_policy();
        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.base_delay, Duration::from_millis(10));
    }

    #[test]
    fn test_missing_key_env_is_error() {
        let config = EngineConfig::from_toml("api_key_env = \"SPY_PARTY_TEST_KEY_THAT_IS_NEVER_SET\"").unwrap();
        assert!(config.create_generator().is_err());
    }
}
