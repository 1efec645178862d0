use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable that overrides `exchange_rate.api_key`.
pub const API_KEY_ENV: &str = "SHELLSY_EXCHANGE_API_KEY";

/// HTTP transfer parameters used by `dload` and `extrate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    /// Connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Upper bound on a whole transfer in seconds.
    pub timeout_secs: u64,
    /// Abort if throughput stays below this many bytes/sec for `low_speed_time_secs`.
    pub low_speed_limit_bytes: u32,
    pub low_speed_time_secs: u64,
    /// Maximum number of redirects to follow.
    pub max_redirections: u32,
    /// User-Agent header sent with every request.
    pub user_agent: String,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 30,
            timeout_secs: 3600,
            low_speed_limit_bytes: 1024,
            low_speed_time_secs: 60,
            max_redirections: 10,
            user_agent: format!("shellsy/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of attempts per transfer (including the first).
    pub max_attempts: u32,
    /// Base delay in seconds for exponential backoff (e.g. 0.25 = 250ms).
    pub base_delay_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay_secs: 0.25,
            max_delay_secs: 30,
        }
    }
}

/// Exchange rate API endpoint and credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExchangeRateConfig {
    /// API root; requests go to `{base_url}/{api_key}/latest/{CODE}`.
    pub base_url: String,
    /// API key. `SHELLSY_EXCHANGE_API_KEY` takes precedence when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for ExchangeRateConfig {
    fn default() -> Self {
        Self {
            base_url: "https://v6.exchangerate-api.com/v6".to_string(),
            api_key: None,
        }
    }
}

impl ExchangeRateConfig {
    /// Effective API key: the environment override, else the configured key.
    /// Blank values count as unset.
    pub fn resolved_api_key(&self) -> Option<String> {
        let from_env = std::env::var(API_KEY_ENV).ok();
        pick_api_key(from_env, self.api_key.clone())
    }
}

fn pick_api_key(from_env: Option<String>, configured: Option<String>) -> Option<String> {
    from_env
        .filter(|k| !k.trim().is_empty())
        .or(configured.filter(|k| !k.trim().is_empty()))
        .map(|k| k.trim().to_string())
}

/// Global configuration loaded from `~/.config/shellsy/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellsyConfig {
    pub download: DownloadConfig,
    pub retry: RetryConfig,
    pub exchange_rate: ExchangeRateConfig,
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("shellsy")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ShellsyConfig> {
    let path = config_path()?;
    load_or_init_at(&path)
}

/// Like `load_or_init` but for an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<ShellsyConfig> {
    if !path.exists() {
        let default_cfg = ShellsyConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)
            .with_context(|| format!("failed to write default config to {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from(path)
}

/// Read and parse an existing config file. Missing keys fall back to defaults.
pub fn load_from(path: &Path) -> Result<ShellsyConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let cfg: ShellsyConfig = toml::from_str(&data)
        .with_context(|| format!("invalid config {}", path.display()))?;
    tracing::info!("using config file {}", path.display());
    Ok(cfg)
}

/// Resolve the configuration for one invocation.
///
/// An explicit path must exist and parse. The default location is best-effort:
/// any failure is logged and built-in defaults are used instead.
pub fn resolve(explicit: Option<&Path>) -> Result<ShellsyConfig> {
    if let Some(path) = explicit {
        return load_from(path);
    }
    match load_or_init() {
        Ok(cfg) => Ok(cfg),
        Err(e) => {
            tracing::warn!("ignoring config: {:#}", e);
            Ok(ShellsyConfig::default())
        }
    }
}
