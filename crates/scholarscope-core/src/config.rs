use std::{
    env, fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::summary::DEFAULT_SNAPSHOT_CHARS;
use crate::{ScholarScopeError, SecretValue, require_env};

const DEFAULT_CONFIG_PATH: &str = "scholarscope.toml";
const CONFIG_PATH_ENV: &str = "SCHOLARSCOPE_CONFIG";

/// Top-level configuration passed to the orchestrator at construction time.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub serpapi: SerpApiConfig,
    pub gemini: GeminiConfig,
    pub http: HttpConfig,
    pub summary: SummaryConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Resolve the search provider credential (from environment only).
    pub fn serpapi_api_key(&self) -> Result<SecretValue, ScholarScopeError> {
        require_env(&self.serpapi.api_key_env)
    }

    /// Resolve the generative-text provider credential (from environment only).
    pub fn gemini_api_key(&self) -> Result<SecretValue, ScholarScopeError> {
        require_env(&self.gemini.api_key_env)
    }
}

/// Helper to load configuration with guard rails.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a provided path or discoverable defaults.
    ///
    /// Resolution order:
    /// 1. Explicit `path` argument.
    /// 2. `SCHOLARSCOPE_CONFIG` environment variable.
    /// 3. `scholarscope.toml` in the current working directory.
    ///
    /// Only the implicit default may be absent, in which case built-in
    /// defaults apply.
    pub fn load(path: Option<PathBuf>) -> Result<Config, ScholarScopeError> {
        let (candidate, explicit) = resolve_path(path);
        if !explicit && !candidate.exists() {
            let config = Config::default();
            Self::validate(&config)?;
            return Ok(config);
        }

        let raw = fs::read_to_string(&candidate)
            .map_err(|err| ScholarScopeError::config_io(candidate.clone(), err))?;
        Self::from_toml(&raw)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml(raw: &str) -> Result<Config, ScholarScopeError> {
        let config: Config = toml::from_str(raw)
            .map_err(|err| ScholarScopeError::InvalidConfiguration(err.to_string()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    fn validate(config: &Config) -> Result<(), ScholarScopeError> {
        if config.serpapi.api_key_env.trim().is_empty() {
            return Err(ScholarScopeError::InvalidConfiguration(
                "serpapi.api_key_env must reference an environment variable".into(),
            ));
        }
        if config.gemini.api_key_env.trim().is_empty() {
            return Err(ScholarScopeError::InvalidConfiguration(
                "gemini.api_key_env must reference an environment variable".into(),
            ));
        }
        if config.serpapi.base_url.trim().is_empty() || config.gemini.base_url.trim().is_empty() {
            return Err(ScholarScopeError::InvalidConfiguration(
                "provider base_url values must not be empty".into(),
            ));
        }
        if config.gemini.model.trim().is_empty() {
            return Err(ScholarScopeError::InvalidConfiguration(
                "gemini.model must not be empty".into(),
            ));
        }
        if config.summary.snapshot_chars == 0 {
            return Err(ScholarScopeError::InvalidConfiguration(
                "summary.snapshot_chars must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

fn resolve_path(path: Option<PathBuf>) -> (PathBuf, bool) {
    if let Some(path) = path {
        return (path, true);
    }

    if let Ok(from_env) = env::var(CONFIG_PATH_ENV) {
        if !from_env.trim().is_empty() {
            return (PathBuf::from(from_env), true);
        }
    }

    (Path::new(DEFAULT_CONFIG_PATH).to_path_buf(), false)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SerpApiConfig {
    pub base_url: String,
    pub api_key_env: String,
}

impl Default for SerpApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://serpapi.com/search".to_string(),
            api_key_env: "SERPAPI_API_KEY".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    pub base_url: String,
    pub model: String,
    pub api_key_env: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-pro".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
        }
    }
}

/// Transport settings shared by every provider client.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request transport timeout. Unset means the transport never gives up.
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    pub snapshot_chars: usize,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            snapshot_chars: DEFAULT_SNAPSHOT_CHARS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
