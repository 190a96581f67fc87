//! Configuration loading and validation for Copymill.
//!
//! Loads configuration from `~/.copymill/config.toml` with environment
//! variable overrides for secrets. Credential validation happens here,
//! before any pipeline run is attempted.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.copymill/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key for the model endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL of the OpenAI-compatible endpoint
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Chat model used by all three stages
    #[serde(default = "default_model")]
    pub model: String,

    /// Embedding model used by the retrieval index
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Sampling temperature for stage completions
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Whether retrieval-augmented stages query the index
    #[serde(default = "default_true")]
    pub enable_rag: bool,

    /// History store configuration
    #[serde(default)]
    pub history: HistoryConfig,
}

fn default_api_url() -> String {
    "https://api.openai.com/v1".into()
}
fn default_model() -> String {
    "gpt-4o".into()
}
fn default_embedding_model() -> String {
    "text-embedding-3-small".into()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_true() -> bool {
    true
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("embedding_model", &self.embedding_model)
            .field("temperature", &self.temperature)
            .field("enable_rag", &self.enable_rag)
            .field("history", &self.history)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Backend name: "sqlite" or "in_memory"
    #[serde(default = "default_history_backend")]
    pub backend: String,

    /// SQLite database path (ignored by the in-memory backend)
    #[serde(default = "default_history_path")]
    pub path: String,
}

fn default_history_backend() -> String {
    "sqlite".into()
}
fn default_history_path() -> String {
    AppConfig::config_dir()
        .join("history.db")
        .to_string_lossy()
        .into_owned()
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            backend: default_history_backend(),
            path: default_history_path(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.copymill/config.toml).
    ///
    /// Also checks environment variables for the API key:
    /// - `COPYMILL_API_KEY` (highest priority)
    /// - `OPENAI_API_KEY`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Environment variable overrides (highest priority).
    fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("COPYMILL_API_KEY") {
            self.api_key = Some(key);
        } else if self.api_key.is_none() {
            self.api_key = std::env::var("OPENAI_API_KEY").ok();
        }

        if let Ok(url) = std::env::var("COPYMILL_API_URL") {
            self.api_url = url;
        }

        if let Ok(model) = std::env::var("COPYMILL_MODEL") {
            self.model = model;
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate_settings()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".copymill")
    }

    /// Validate value ranges. Does not require credentials — use
    /// [`AppConfig::validate_credentials`] before a run.
    fn validate_settings(&self) -> Result<(), ConfigError> {
        if self.temperature < 0.0 || self.temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.api_url.trim().is_empty() {
            return Err(ConfigError::ValidationError("api_url must not be empty".into()));
        }

        match self.history.backend.as_str() {
            "sqlite" | "in_memory" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "unknown history backend '{other}' (expected sqlite or in_memory)"
                )));
            }
        }

        Ok(())
    }

    /// Require model-access credentials. Called before any run starts;
    /// a failure here means no run is attempted.
    pub fn validate_credentials(&self) -> Result<(), ConfigError> {
        if self.api_key.as_deref().is_none_or(|k| k.trim().is_empty()) {
            return Err(ConfigError::MissingCredentials(
                "no API key configured — set COPYMILL_API_KEY or add api_key to config.toml".into(),
            ));
        }
        Ok(())
    }

    /// Generate a default config TOML string.
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: default_api_url(),
            model: default_model(),
            embedding_model: default_embedding_model(),
            temperature: default_temperature(),
            enable_rag: true,
            history: HistoryConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    #[error("Missing credentials: {0}")]
    MissingCredentials(String),
}

impl From<ConfigError> for copymill_core::Error {
    fn from(e: ConfigError) -> Self {
        copymill_core::Error::Config { message: e.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert_eq!(config.model, "gpt-4o");
        assert!(config.enable_rag);
        assert_eq!(config.history.backend, "sqlite");
        assert!(config.validate_settings().is_ok());
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.model, config.model);
        assert_eq!(parsed.history.backend, config.history.backend);
    }

    #[test]
    fn invalid_temperature_rejected() {
        let config = AppConfig { temperature: 5.0, ..AppConfig::default() };
        assert!(config.validate_settings().is_err());
    }

    #[test]
    fn unknown_history_backend_rejected() {
        let mut config = AppConfig::default();
        config.history.backend = "dynamo".into();
        assert!(config.validate_settings().is_err());
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let config = AppConfig::load_from(Path::new("/nonexistent/config.toml")).unwrap();
        assert_eq!(config.model, "gpt-4o");
    }

    #[test]
    fn load_from_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "model = \"gpt-4o-mini\"\nenable_rag = false").unwrap();
        let config = AppConfig::load_from(file.path()).unwrap();
        assert_eq!(config.model, "gpt-4o-mini");
        assert!(!config.enable_rag);
        // Untouched fields keep their defaults
        assert_eq!(config.api_url, "https://api.openai.com/v1");
    }

    #[test]
    fn credentials_required_before_run() {
        let config = AppConfig::default();
        assert!(matches!(
            config.validate_credentials(),
            Err(ConfigError::MissingCredentials(_))
        ));

        let config = AppConfig { api_key: Some("sk-test".into()), ..AppConfig::default() };
        assert!(config.validate_credentials().is_ok());
    }

    // Touches process-wide env vars, so every variable this test reads
    // or writes is handled inside this one test.
    #[test]
    fn env_overrides_beat_file_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "api_key = \"sk-from-file\"\nmodel = \"gpt-4o\"").unwrap();
        let mut config = AppConfig::load_from(file.path()).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("sk-from-file"));

        unsafe {
            std::env::set_var("COPYMILL_API_KEY", "sk-from-env");
            std::env::set_var("COPYMILL_MODEL", "gpt-4o-mini");
        }
        config.apply_env_overrides();

        assert_eq!(config.api_key.as_deref(), Some("sk-from-env"));
        assert_eq!(config.model, "gpt-4o-mini");

        // OPENAI_API_KEY is the fallback: used only when nothing else
        // set a key.
        unsafe {
            std::env::remove_var("COPYMILL_API_KEY");
            std::env::remove_var("COPYMILL_MODEL");
            std::env::set_var("OPENAI_API_KEY", "sk-openai");
        }
        let mut config = AppConfig::default();
        config.apply_env_overrides();
        assert_eq!(config.api_key.as_deref(), Some("sk-openai"));

        unsafe {
            std::env::remove_var("OPENAI_API_KEY");
        }
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let config = AppConfig { api_key: Some("sk-secret".into()), ..AppConfig::default() };
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
