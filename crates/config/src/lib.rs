//! Configuration loading, validation, and management for simchat.
//!
//! Loads configuration from `~/.simchat/config.toml` (or the file named by
//! `SIMCHAT_CONFIG`) with environment variable overrides. Validates all
//! settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The instruction every new chat session starts with.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant that answers questions about blockchain data using Dune's Sim APIs. \
You can call functions that fetch real-time blockchain data, including:

- Token balances for wallets across 60+ EVM chains
- Transaction activity and history
- NFT collections and collectibles
- Token metadata and pricing information
- Token holder distributions
- Supported blockchain networks

When users ask about wallets, tokens, or transaction history, call the appropriate functions to fetch real-time data and explain clearly what it shows.

For wallet addresses you can look at balances, activity, NFTs, and transactions. For tokens you can look up metadata, pricing, and holders. Format responses in a user-friendly way.

Keep responses concise and focused. When a result set is large, summarize the key findings instead of listing every item.";

/// The root configuration structure.
///
/// Maps directly to `~/.simchat/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Chat-completion API settings
    #[serde(default)]
    pub completion: CompletionConfig,

    /// Sim blockchain-data API settings
    #[serde(default)]
    pub sim: SimConfig,

    /// NFT metadata enrichment (dashboard only)
    #[serde(default)]
    pub nft_metadata: NftMetadataConfig,

    /// Chat server settings
    #[serde(default)]
    pub chat: ChatConfig,

    /// Wallet dashboard settings
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

/// Redact a secret for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct CompletionConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL of an OpenAI-compatible API
    #[serde(default = "default_completion_url")]
    pub api_url: String,

    /// Model for the first completion of a turn
    #[serde(default = "default_model")]
    pub model: String,

    /// Model for the completion that follows tool execution
    #[serde(default = "default_followup_model")]
    pub followup_model: String,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature; the API default applies when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_completion_url() -> String {
    "https://api.openai.com/v1".into()
}
fn default_model() -> String {
    "gpt-4.1".into()
}
fn default_followup_model() -> String {
    "gpt-4.1-mini".into()
}
fn default_max_tokens() -> u32 {
    32768
}
fn default_timeout_secs() -> u64 {
    120
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: default_completion_url(),
            model: default_model(),
            followup_model: default_followup_model(),
            max_tokens: default_max_tokens(),
            temperature: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl std::fmt::Debug for CompletionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("followup_model", &self.followup_model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct SimConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_sim_url")]
    pub base_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_sim_url() -> String {
    "https://api.sim.dune.com".into()
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_sim_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl std::fmt::Debug for SimConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimConfig")
            .field("api_key", &redact(&self.api_key))
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// OpenSea-style NFT metadata API. Enrichment is skipped without a key.
#[derive(Clone, Serialize, Deserialize)]
pub struct NftMetadataConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_nft_url")]
    pub base_url: String,
}

fn default_nft_url() -> String {
    "https://api.opensea.io/api/v2".into()
}

impl Default for NftMetadataConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_nft_url(),
        }
    }
}

impl std::fmt::Debug for NftMetadataConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NftMetadataConfig")
            .field("api_key", &redact(&self.api_key))
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_chat_port")]
    pub port: u16,

    /// Replaces [`DEFAULT_SYSTEM_PROMPT`] when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt_override: Option<String>,

    /// History cap per session, system message included
    #[serde(default = "default_max_messages")]
    pub max_messages: usize,

    #[serde(default = "default_session_idle_minutes")]
    pub session_idle_minutes: u64,

    #[serde(default = "default_sweep_interval_minutes")]
    pub sweep_interval_minutes: u64,
}

fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_chat_port() -> u16 {
    3000
}
fn default_max_messages() -> usize {
    20
}
fn default_session_idle_minutes() -> u64 {
    60
}
fn default_sweep_interval_minutes() -> u64 {
    10
}

/// Upper bound for the session timers: one week.
pub const MAX_SESSION_MINUTES: u64 = 7 * 24 * 60;

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_chat_port(),
            system_prompt_override: None,
            max_messages: default_max_messages(),
            session_idle_minutes: default_session_idle_minutes(),
            sweep_interval_minutes: default_sweep_interval_minutes(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_dashboard_port")]
    pub port: u16,

    /// Chain filter passed to the balances endpoint
    #[serde(default = "default_chain_ids")]
    pub default_chain_ids: String,

    #[serde(default = "default_activity_limit")]
    pub activity_limit: u32,

    #[serde(default = "default_collectibles_limit")]
    pub collectibles_limit: u32,
}

fn default_dashboard_port() -> u16 {
    3001
}
fn default_chain_ids() -> String {
    "all".into()
}
fn default_activity_limit() -> u32 {
    25
}
fn default_collectibles_limit() -> u32 {
    50
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_dashboard_port(),
            default_chain_ids: default_chain_ids(),
            activity_limit: default_activity_limit(),
            collectibles_limit: default_collectibles_limit(),
        }
    }
}

impl AppConfig {
    /// Load configuration from `SIMCHAT_CONFIG` or `~/.simchat/config.toml`.
    ///
    /// Environment variables then override the file:
    /// - `OPENAI_API_KEY`, `SIM_API_KEY`, `OPENSEA_API_KEY`
    /// - `PORT` (chat server port)
    /// - `SIMCHAT_MODEL`
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::load_from(&Self::config_path())?;
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
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

    /// Apply environment overrides through `lookup`.
    ///
    /// Blank values are ignored. An unparsable `PORT` is ignored with a warning.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = get("OPENAI_API_KEY") {
            self.completion.api_key = Some(key);
        }
        if let Some(key) = get("SIM_API_KEY") {
            self.sim.api_key = Some(key);
        }
        if let Some(key) = get("OPENSEA_API_KEY") {
            self.nft_metadata.api_key = Some(key);
        }
        if let Some(model) = get("SIMCHAT_MODEL") {
            self.completion.model = model;
        }
        if let Some(port) = get("PORT") {
            match port.trim().parse() {
                Ok(port) => self.chat.port = port,
                Err(_) => tracing::warn!(value = %port, "Ignoring unparsable PORT"),
            }
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".simchat")
    }

    /// `SIMCHAT_CONFIG` if set, otherwise `config.toml` in [`Self::config_dir`].
    pub fn config_path() -> PathBuf {
        std::env::var("SIMCHAT_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| Self::config_dir().join("config.toml"))
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(t) = self.completion.temperature
            && !(0.0..=2.0).contains(&t)
        {
            return Err(ConfigError::ValidationError(
                "completion.temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.completion.max_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "completion.max_tokens must be > 0".into(),
            ));
        }

        if self.completion.timeout_secs == 0 || self.sim.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "timeout_secs must be > 0".into(),
            ));
        }

        // Room for the system message plus at least one exchange.
        if self.chat.max_messages < 3 {
            return Err(ConfigError::ValidationError(
                "chat.max_messages must be at least 3".into(),
            ));
        }

        if self.chat.session_idle_minutes == 0 || self.chat.sweep_interval_minutes == 0 {
            return Err(ConfigError::ValidationError(
                "chat.session_idle_minutes and chat.sweep_interval_minutes must be > 0".into(),
            ));
        }

        if self.chat.session_idle_minutes > MAX_SESSION_MINUTES
            || self.chat.sweep_interval_minutes > MAX_SESSION_MINUTES
        {
            return Err(ConfigError::ValidationError(format!(
                "chat.session_idle_minutes and chat.sweep_interval_minutes must be at most {MAX_SESSION_MINUTES}"
            )));
        }

        if self.dashboard.activity_limit == 0 || self.dashboard.collectibles_limit == 0 {
            return Err(ConfigError::ValidationError(
                "dashboard limits must be > 0".into(),
            ));
        }

        Ok(())
    }

    /// The Sim API key, or an error naming the variable to set.
    pub fn require_sim_api_key(&self) -> Result<&str, ConfigError> {
        self.sim
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingKey("SIM_API_KEY"))
    }

    /// The completion API key, or an error naming the variable to set.
    pub fn require_completion_api_key(&self) -> Result<&str, ConfigError> {
        self.completion
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingKey("OPENAI_API_KEY"))
    }

    /// The system instruction new sessions are seeded with.
    pub fn system_prompt(&self) -> &str {
        self.chat
            .system_prompt_override
            .as_deref()
            .unwrap_or(DEFAULT_SYSTEM_PROMPT)
    }

    /// Generate a default config TOML string.
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
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

    #[error("{0} is not set")]
    MissingKey(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.chat.port, 3000);
        assert_eq!(config.dashboard.port, 3001);
        assert_eq!(config.chat.max_messages, 20);
        assert_eq!(config.completion.model, "gpt-4.1");
        assert_eq!(config.completion.followup_model, "gpt-4.1-mini");
        assert_eq!(config.completion.max_tokens, 32768);
        assert_eq!(config.completion.timeout_secs, 120);
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.chat.port, config.chat.port);
        assert_eq!(parsed.sim.base_url, config.sim.base_url);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[chat]\nport = 8080\n\n[sim]\napi_key = \"sim_key\"\n\n[dashboard]\nactivity_limit = 10"
        )
        .unwrap();

        let config = AppConfig::load_from(file.path()).unwrap();
        assert_eq!(config.chat.port, 8080);
        assert_eq!(config.chat.max_messages, 20);
        assert_eq!(config.sim.api_key.as_deref(), Some("sim_key"));
        assert_eq!(config.dashboard.activity_limit, 10);
        assert_eq!(config.dashboard.collectibles_limit, 50);
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[chat\nport = ").unwrap();
        let err = AppConfig::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let config = AppConfig::load_from(Path::new("/nonexistent/config.toml")).unwrap();
        assert_eq!(config.chat.port, 3000);
    }

    #[test]
    fn invalid_temperature_rejected() {
        let mut config = AppConfig::default();
        config.completion.temperature = Some(5.0);
        assert!(config.validate().is_err());
        config.completion.temperature = Some(0.2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn tiny_history_cap_rejected() {
        let mut config = AppConfig::default();
        config.chat.max_messages = 2;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = AppConfig::default();
        config.apply_env(env(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("SIM_API_KEY", "sim-test"),
            ("OPENSEA_API_KEY", "os-test"),
            ("PORT", "4000"),
            ("SIMCHAT_MODEL", "gpt-4o"),
        ]));

        assert_eq!(config.completion.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.sim.api_key.as_deref(), Some("sim-test"));
        assert_eq!(config.nft_metadata.api_key.as_deref(), Some("os-test"));
        assert_eq!(config.chat.port, 4000);
        assert_eq!(config.completion.model, "gpt-4o");
        assert_eq!(config.dashboard.port, 3001);
    }

    #[test]
    fn blank_or_bad_env_values_are_ignored() {
        let mut config = AppConfig::default();
        config.sim.api_key = Some("from-file".into());
        config.apply_env(env(&[("SIM_API_KEY", "  "), ("PORT", "not-a-port")]));
        assert_eq!(config.sim.api_key.as_deref(), Some("from-file"));
        assert_eq!(config.chat.port, 3000);
    }

    #[test]
    fn require_sim_api_key_fails_fast() {
        let config = AppConfig::default();
        let err = config.require_sim_api_key().unwrap_err();
        assert!(err.to_string().contains("SIM_API_KEY"));
    }

    #[test]
    fn blank_key_in_file_counts_as_missing() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[sim]\napi_key = \"\"\n\n[completion]\napi_key = \"  \"").unwrap();

        let config = AppConfig::load_from(file.path()).unwrap();
        assert!(matches!(
            config.require_sim_api_key(),
            Err(ConfigError::MissingKey("SIM_API_KEY"))
        ));
        assert!(matches!(
            config.require_completion_api_key(),
            Err(ConfigError::MissingKey("OPENAI_API_KEY"))
        ));
    }

    #[test]
    fn session_timers_are_bounded() {
        let mut config = AppConfig::default();
        config.chat.session_idle_minutes = MAX_SESSION_MINUTES;
        assert!(config.validate().is_ok());

        config.chat.session_idle_minutes = u64::MAX / 30;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));

        config.chat.session_idle_minutes = 60;
        config.chat.sweep_interval_minutes = MAX_SESSION_MINUTES + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn system_prompt_override() {
        let mut config = AppConfig::default();
        assert!(config.system_prompt().contains("Sim APIs"));
        config.chat.system_prompt_override = Some("custom".into());
        assert_eq!(config.system_prompt(), "custom");
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let mut config = AppConfig::default();
        config.completion.api_key = Some("sk-very-secret".into());
        config.sim.api_key = Some("sim-very-secret".into());
        let debug = format!("{config:?}");
        assert!(!debug.contains("very-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
