//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `lumend.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Acknowledgment tracker settings.
    pub tracker: TrackerConfig,
    /// Reasoning (OpenAI) settings.
    pub reasoning: ReasoningConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Simulated light settings.
    pub lights: LightsConfig,
}

/// Acknowledgment tracker timing.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// How long a fan-out may wait for its acknowledgments, in seconds.
    pub timeout_secs: u64,
    /// Period of the timeout sweep, in seconds.
    pub sweep_secs: u64,
}

/// Reasoning collaborator configuration. Without an API key the daemon runs
/// with deterministic conflict analysis only.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ReasoningConfig {
    /// Bearer token. Empty or absent disables the reasoning path.
    pub api_key: Option<String>,
    /// Model identifier.
    pub model: String,
    /// API base URL including the version segment.
    pub base_url: String,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Simulated light targets.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LightsConfig {
    /// Simulated acknowledgment delay, in milliseconds.
    pub ack_delay_ms: u64,
    /// Target indices that never acknowledge, to demo the timeout path.
    pub silent_targets: Vec<usize>,
}

impl Config {
    /// Load configuration from `lumend.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if a
    /// value fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("lumend.toml")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("OPENAI_API_KEY") {
            self.reasoning.api_key = Some(val);
        }
        if let Ok(val) = std::env::var("LUMEND_OPENAI_API_KEY") {
            self.reasoning.api_key = Some(val);
        }
        if let Ok(val) = std::env::var("LUMEND_MODEL") {
            self.reasoning.model = val;
        }
        if let Ok(val) = std::env::var("LUMEND_ACK_DELAY_MS") {
            if let Ok(delay) = val.parse() {
                self.lights.ack_delay_ms = delay;
            }
        }
        if let Ok(val) = std::env::var("LUMEND_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.tracker.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "tracker timeout must be non-zero".to_string(),
            ));
        }
        if self.tracker.sweep_secs == 0 {
            return Err(ConfigError::Validation(
                "tracker sweep period must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            sweep_secs: 2,
        }
    }
}

impl Default for ReasoningConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "lumend=info,lumen=info".to_string(),
        }
    }
}

impl Default for LightsConfig {
    fn default() -> Self {
        Self {
            ack_delay_ms: 150,
            silent_targets: Vec::new(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
