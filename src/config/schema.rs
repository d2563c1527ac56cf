use crate::error::ConfigError;
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ── Top-level config ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Path the config was loaded from - computed, not serialized
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub limiter: LimiterConfig,

    #[serde(default)]
    pub generation: GenerationConfig,

    #[serde(default)]
    pub tracking: TrackingConfig,

    #[serde(default)]
    pub control: ControlConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Load order: explicit path → `$KOLPILOT_CONFIG` → `~/.kolpilot/config.toml`.
    /// A missing file yields the defaults; a present-but-invalid file is an
    /// error.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit_path {
            Some(path) => Some(path.to_path_buf()),
            None => match std::env::var("KOLPILOT_CONFIG") {
                Ok(env_path) => Some(PathBuf::from(env_path)),
                Err(_) => default_config_path(),
            },
        };

        let mut config = match &path {
            Some(path) if path.exists() => {
                let raw = fs::read_to_string(path)?;
                toml::from_str::<Self>(&raw)
                    .map_err(|err| ConfigError::Load(format!("{}: {err}", path.display())))?
            }
            _ => Self::default(),
        };

        config.config_path = path;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.engine.base_like_rate) {
            return Err(ConfigError::Validation(format!(
                "engine.base_like_rate must be within [0, 1], got {}",
                self.engine.base_like_rate
            )));
        }
        if !(0.0..=1.0).contains(&self.engine.base_retweet_rate) {
            return Err(ConfigError::Validation(format!(
                "engine.base_retweet_rate must be within [0, 1], got {}",
                self.engine.base_retweet_rate
            )));
        }
        if self.engine.engage_threshold > 100 {
            return Err(ConfigError::Validation(format!(
                "engine.engage_threshold must be within [0, 100], got {}",
                self.engine.engage_threshold
            )));
        }
        if self.engine.thread_length == 0 {
            return Err(ConfigError::Validation(
                "engine.thread_length must be at least 1".into(),
            ));
        }
        if self.limiter.max_calls == 0 {
            return Err(ConfigError::Validation(
                "limiter.max_calls must be at least 1".into(),
            ));
        }
        if self.limiter.window_ms == 0 {
            return Err(ConfigError::Validation(
                "limiter.window_ms must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

fn default_config_path() -> Option<PathBuf> {
    UserDirs::new().map(|dirs| dirs.home_dir().join(".kolpilot").join("config.toml"))
}

// ── Engine tuning ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Base probability for the like gate (default: 0.3)
    #[serde(default = "default_like_rate")]
    pub base_like_rate: f64,
    /// Base probability for the retweet gate (default: 0.1)
    #[serde(default = "default_retweet_rate")]
    pub base_retweet_rate: f64,
    /// Computed score a post must exceed to engage (default: 50)
    #[serde(default = "default_engage_threshold")]
    pub engage_threshold: u8,
    /// Segments per generated thread (default: 3)
    #[serde(default = "default_thread_length")]
    pub thread_length: usize,
    /// Fixed RNG seed for reproducible gate draws; unset seeds from the OS
    #[serde(default)]
    pub rng_seed: Option<u64>,
    /// Whether outbound posting is enabled (default: false — decide and log
    /// only)
    #[serde(default)]
    pub post_enabled: bool,
    /// Account the engine acts as (default: 1)
    #[serde(default = "default_account_id")]
    pub account_id: i64,
}

fn default_like_rate() -> f64 {
    0.3
}

fn default_retweet_rate() -> f64 {
    0.1
}

fn default_engage_threshold() -> u8 {
    50
}

fn default_thread_length() -> usize {
    3
}

fn default_account_id() -> i64 {
    1
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_like_rate: default_like_rate(),
            base_retweet_rate: default_retweet_rate(),
            engage_threshold: default_engage_threshold(),
            thread_length: default_thread_length(),
            rng_seed: None,
            post_enabled: false,
            account_id: default_account_id(),
        }
    }
}

// ── Outbound rate budget ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimiterConfig {
    /// Calls admitted per trailing window (default: 50)
    #[serde(default = "default_max_calls")]
    pub max_calls: usize,
    /// Window length in milliseconds (default: 15 minutes)
    #[serde(default = "default_window_ms")]
    pub window_ms: u64,
}

fn default_max_calls() -> usize {
    50
}

fn default_window_ms() -> u64 {
    15 * 60 * 1000
}

impl LimiterConfig {
    #[must_use]
    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }
}

impl Default for LimiterConfig {
    fn default() -> Self {
        Self {
            max_calls: default_max_calls(),
            window_ms: default_window_ms(),
        }
    }
}

// ── Generation service ────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// OpenAI-compatible endpoint root (default: `https://api.openai.com/v1`)
    #[serde(default = "default_generation_base_url")]
    pub base_url: String,
    /// API key; falls back to `$KOLPILOT_API_KEY`, then `$OPENAI_API_KEY`
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_generation_model")]
    pub model: String,
}

fn default_generation_base_url() -> String {
    "https://api.openai.com/v1".into()
}

fn default_generation_model() -> String {
    "gpt-4".into()
}

impl GenerationConfig {
    /// Config value first, then the environment.
    #[must_use]
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("KOLPILOT_API_KEY").ok())
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            base_url: default_generation_base_url(),
            api_key: None,
            model: default_generation_model(),
        }
    }
}

// ── Tracked accounts and keywords ─────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingConfig {
    #[serde(default = "default_tracked_accounts")]
    pub accounts: Vec<String>,
    #[serde(default = "default_tracked_keywords")]
    pub keywords: Vec<String>,
}

fn default_tracked_accounts() -> Vec<String> {
    [
        "elonmusk",
        "cz_binance",
        "vitalikbuterin",
        "APompliano",
        "scottmelker",
        "CryptoCobain",
        "HsakaTrades",
        "loomdart",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_tracked_keywords() -> Vec<String> {
    ["#crypto", "#bitcoin", "#ethereum", "#solana", "#meme", "degen"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            accounts: default_tracked_accounts(),
            keywords: default_tracked_keywords(),
        }
    }
}

// ── Control surface ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlConfig {
    #[serde(default = "default_control_host")]
    pub host: String,
    #[serde(default = "default_control_port")]
    pub port: u16,
}

fn default_control_host() -> String {
    "127.0.0.1".into()
}

fn default_control_port() -> u16 {
    3000
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            host: default_control_host(),
            port: default_control_port(),
        }
    }
}

// ── Storage ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Record posts and actions to SQLite (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Database path; unset means `~/.kolpilot/kolpilot.db`
    #[serde(default)]
    pub path: Option<PathBuf>,
}

fn default_true() -> bool {
    true
}

impl StorageConfig {
    #[must_use]
    pub fn resolve_path(&self) -> Option<PathBuf> {
        self.path.clone().or_else(|| {
            UserDirs::new().map(|dirs| dirs.home_dir().join(".kolpilot").join("kolpilot.db"))
        })
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: None,
        }
    }
}

// ── Observability ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Observer backend: "log", "noop"/"none" (default: "log")
    #[serde(default = "default_observability_backend")]
    pub backend: String,
}

fn default_observability_backend() -> String {
    "log".into()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            backend: default_observability_backend(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert!((config.engine.base_like_rate - 0.3).abs() < f64::EPSILON);
        assert_eq!(config.engine.engage_threshold, 50);
        assert_eq!(config.engine.thread_length, 3);
        assert_eq!(config.limiter.max_calls, 50);
        assert!(!config.engine.post_enabled);
        assert_eq!(config.observability.backend, "log");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config: Config = toml::from_str(
            r#"
            [engine]
            thread_length = 5
            rng_seed = 42

            [limiter]
            max_calls = 2
            window_ms = 1000
            "#,
        )
        .unwrap();

        assert_eq!(config.engine.thread_length, 5);
        assert_eq!(config.engine.rng_seed, Some(42));
        assert!((config.engine.base_like_rate - 0.3).abs() < f64::EPSILON);
        assert_eq!(config.limiter.max_calls, 2);
        assert_eq!(config.limiter.window(), Duration::from_millis(1000));
    }

    #[test]
    fn out_of_range_rate_fails_validation() {
        let config: Config = toml::from_str(
            r#"
            [engine]
            base_like_rate = 1.5
            "#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_thread_length_fails_validation() {
        let config: Config = toml::from_str(
            r#"
            [engine]
            thread_length = 0
            "#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn default_tracking_lists_are_populated() {
        let config = Config::default();
        assert!(config.tracking.accounts.contains(&"vitalikbuterin".to_string()));
        assert!(config.tracking.keywords.contains(&"#crypto".to_string()));
    }
}
