use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per request (including the first).
    pub max_attempts: u32,
    /// Base delay in seconds for exponential backoff (e.g. 0.5 = 500ms).
    pub base_delay_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            base_delay_secs: 0.5,
            max_delay_secs: 30,
        }
    }
}

/// Global configuration loaded from `~/.config/is2sync/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Is2SyncConfig {
    /// Base URL of the NSIDC data pool serving the `ATLAS` tree.
    pub data_host: String,
    /// NASA Earthdata Login host, used for netrc lookup and prompts.
    pub earthdata_host: String,
    /// Connect timeout for every request.
    pub connect_timeout_secs: u64,
    /// Abort a transfer that stays below this many bytes/s ...
    pub low_speed_limit_bytes: u32,
    /// ... for this many seconds.
    pub low_speed_time_secs: u64,
    /// Octal permission mode for downloaded files when `--mode` is not given.
    pub default_mode: String,
    /// Optional retry policy; if missing, requests are attempted once.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

impl Default for Is2SyncConfig {
    fn default() -> Self {
        Self {
            data_host: "https://n5eil01u.ecs.nsidc.org".to_string(),
            earthdata_host: "urs.earthdata.nasa.gov".to_string(),
            connect_timeout_secs: 20,
            low_speed_limit_bytes: 1024,
            low_speed_time_secs: 60,
            default_mode: "775".to_string(),
            retry: None,
        }
    }
}

impl Is2SyncConfig {
    /// Parsed `default_mode`.
    pub fn default_mode(&self) -> Result<u32> {
        parse_mode(&self.default_mode)
            .with_context(|| format!("invalid default_mode in config: {:?}", self.default_mode))
    }
}

/// Parse an octal permission mode such as `775`, `0775` or `0o775`.
pub fn parse_mode(s: &str) -> Result<u32> {
    let s = s.trim();
    let digits = s.strip_prefix("0o").unwrap_or(s);
    // from_str_radix would take a leading sign.
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        anyhow::bail!("not an octal mode: {:?}", s);
    }
    let mode = u32::from_str_radix(digits, 8)
        .with_context(|| format!("not an octal mode: {:?}", s))?;
    if mode > 0o7777 {
        anyhow::bail!("mode out of range: {:o}", mode);
    }
    Ok(mode)
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("is2sync")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<Is2SyncConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = Is2SyncConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: Is2SyncConfig =
        toml::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}
