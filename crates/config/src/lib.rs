//! Configuration loading, validation, and management for MediMind.
//!
//! Loads configuration from `~/.medimind/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use medimind_core::session::{COMPACTION_MARGIN, DEFAULT_MAX_HISTORY};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Providers that run without an API key.
pub const KEYLESS_PROVIDERS: [&str; 1] = ["ollama"];

/// The root configuration structure.
///
/// Maps directly to `~/.medimind/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key (can be overridden per-provider)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Default generation provider
    #[serde(default = "default_provider")]
    pub default_provider: String,

    /// Default model
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Nucleus sampling cutoff
    #[serde(default = "default_top_p")]
    pub top_p: f32,

    /// Max tokens per generated response
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Session (short-term memory) configuration
    #[serde(default)]
    pub session: SessionConfig,

    /// Memory bank (long-term memory) configuration
    #[serde(default)]
    pub memory: MemoryConfig,

    /// Reference data locations
    #[serde(default)]
    pub data: DataConfig,

    /// Safety settings
    #[serde(default)]
    pub safety: SafetyConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Provider-specific configurations
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

fn default_provider() -> String {
    "gemini".into()
}
fn default_model() -> String {
    "models/gemini-flash-latest".into()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_top_p() -> f32 {
    0.95
}
fn default_max_tokens() -> u32 {
    2048
}

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
            .field("default_provider", &self.default_provider)
            .field("default_model", &self.default_model)
            .field("temperature", &self.temperature)
            .field("top_p", &self.top_p)
            .field("max_tokens", &self.max_tokens)
            .field("session", &self.session)
            .field("memory", &self.memory)
            .field("data", &self.data)
            .field("safety", &self.safety)
            .field("logging", &self.logging)
            .field("providers", &self.providers)
            .finish()
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .field("default_model", &self.default_model)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Messages kept before compaction kicks in
    #[serde(default = "default_max_history")]
    pub max_history: usize,
}

fn default_max_history() -> usize {
    DEFAULT_MAX_HISTORY
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_history: default_max_history(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Path of the all-users memory document
    #[serde(default = "default_memory_path")]
    pub path: PathBuf,

    /// User id the memory bank is keyed by
    #[serde(default = "default_user_id")]
    pub user_id: String,
}

fn default_memory_path() -> PathBuf {
    PathBuf::from("data").join("memory_bank.json")
}
fn default_user_id() -> String {
    "default_user".into()
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            path: default_memory_path(),
            user_id: default_user_id(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub dir: PathBuf,

    #[serde(default = "default_symptoms_file")]
    pub symptoms: String,

    #[serde(default = "default_medications_file")]
    pub medications: String,

    #[serde(default = "default_interactions_file")]
    pub interactions: String,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}
fn default_symptoms_file() -> String {
    "symptoms.json".into()
}
fn default_medications_file() -> String {
    "medications.json".into()
}
fn default_interactions_file() -> String {
    "interactions.json".into()
}

impl DataConfig {
    pub fn symptoms_path(&self) -> PathBuf {
        self.dir.join(&self.symptoms)
    }

    pub fn medications_path(&self) -> PathBuf {
        self.dir.join(&self.medications)
    }

    pub fn interactions_path(&self) -> PathBuf {
        self.dir.join(&self.interactions)
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: default_data_dir(),
            symptoms: default_symptoms_file(),
            medications: default_medications_file(),
            interactions: default_interactions_file(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafetyConfig {
    /// Phrases that short-circuit the symptom path with an emergency alert
    #[serde(default = "default_emergency_keywords")]
    pub emergency_keywords: Vec<String>,
}

fn default_emergency_keywords() -> Vec<String> {
    [
        "chest pain",
        "can't breathe",
        "suicide",
        "overdose",
        "severe bleeding",
        "unconscious",
        "stroke",
        "heart attack",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            emergency_keywords: default_emergency_keywords(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON log lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "warn".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_model: Option<String>,
}

impl AppConfig {
    /// Load configuration from `MEDIMIND_CONFIG` or the default path
    /// (`~/.medimind/config.toml`).
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("MEDIMIND_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| Self::config_dir().join("config.toml"));
        Self::load_with_env(&path)
    }

    /// Load from a file, then apply environment variable overrides.
    ///
    /// API key lookup order when the file has none:
    /// - `MEDIMIND_API_KEY` (highest priority)
    /// - `GOOGLE_API_KEY`
    /// - `GEMINI_API_KEY`
    /// - `OPENAI_API_KEY`
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load_from(path)?;
        config.apply_env_overrides(|var| std::env::var(var).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides read through `lookup`.
    ///
    /// `MEDIMIND_MODEL` also replaces the default provider's
    /// `[providers.<name>] default_model`, so it always decides the active
    /// model.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.api_key.is_none() {
            self.api_key = ["MEDIMIND_API_KEY", "GOOGLE_API_KEY", "GEMINI_API_KEY", "OPENAI_API_KEY"]
                .iter()
                .find_map(|var| lookup(var).filter(|v| !v.trim().is_empty()));
        }

        if let Some(provider) = lookup("MEDIMIND_PROVIDER") {
            self.default_provider = provider;
        }

        if let Some(model) = lookup("MEDIMIND_MODEL") {
            if let Some(section) = self.providers.get_mut(&self.default_provider) {
                section.default_model = Some(model.clone());
            }
            self.default_model = model;
        }

        if let Some(user) = lookup("MEDIMIND_USER") {
            self.memory.user_id = user;
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

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".medimind")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::ValidationError(
                "temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.top_p <= 0.0 || self.top_p > 1.0 {
            return Err(ConfigError::ValidationError(
                "top_p must be in (0.0, 1.0]".into(),
            ));
        }

        if self.session.max_history <= COMPACTION_MARGIN {
            return Err(ConfigError::ValidationError(format!(
                "session.max_history must be greater than {COMPACTION_MARGIN}"
            )));
        }

        if self
            .safety
            .emergency_keywords
            .iter()
            .any(|k| k.trim().is_empty())
        {
            return Err(ConfigError::ValidationError(
                "safety.emergency_keywords must not contain empty entries".into(),
            ));
        }

        if self.memory.user_id.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "memory.user_id must not be empty".into(),
            ));
        }

        Ok(())
    }

    /// The API key for the default provider, or a fatal startup error.
    ///
    /// Keyless providers (local Ollama) get an empty key instead.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        let key = self
            .providers
            .get(&self.default_provider)
            .and_then(|p| p.api_key.as_deref())
            .or(self.api_key.as_deref())
            .filter(|k| !k.trim().is_empty());

        match key {
            Some(key) => Ok(key),
            None if !self.provider_needs_key() => Ok(""),
            None => Err(ConfigError::MissingCredential(self.default_provider.clone())),
        }
    }

    /// Whether the default provider authenticates with an API key.
    pub fn provider_needs_key(&self) -> bool {
        !KEYLESS_PROVIDERS.contains(&self.default_provider.as_str())
    }

    /// Model for the default provider: its `[providers.<name>] default_model`
    /// when set, otherwise the top-level `default_model`.
    pub fn active_model(&self) -> &str {
        self.providers
            .get(&self.default_provider)
            .and_then(|p| p.default_model.as_deref())
            .unwrap_or(&self.default_model)
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.require_api_key().is_ok()
    }

    /// Generate a default config TOML string (for `onboard` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            default_provider: default_provider(),
            default_model: default_model(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            max_tokens: default_max_tokens(),
            session: SessionConfig::default(),
            memory: MemoryConfig::default(),
            data: DataConfig::default(),
            safety: SafetyConfig::default(),
            logging: LoggingConfig::default(),
            providers: HashMap::new(),
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

    #[error("No API key configured for provider '{0}' (set MEDIMIND_API_KEY or GOOGLE_API_KEY)")]
    MissingCredential(String),
}
