use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// Per-session upload configuration, supplied once to the engine via `init`.
/// Re-initializing replaces the whole record; nothing is merged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Endpoint receiving the multipart POSTs.
    pub url: String,
    /// Optional resource identifier, sent stringified as the `id` field.
    #[serde(default)]
    pub resource_id: Option<i64>,
    /// Chunk-size threshold in bytes; absent means never chunk.
    #[serde(default)]
    pub chunk_size: Option<u64>,
    /// Extra request headers, applied with case-sensitive names.
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// Start draining as soon as a file is enqueued.
    #[serde(default)]
    pub auto_start: bool,
}

impl UploadConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            resource_id: None,
            chunk_size: None,
            headers: HashMap::new(),
            auto_start: false,
        }
    }

    /// Check the endpoint URL is an absolute http(s) URL before any transfer.
    pub fn validate(&self) -> Result<()> {
        let parsed = url::Url::parse(&self.url)
            .with_context(|| format!("invalid endpoint URL {:?}", self.url))?;
        ensure!(
            matches!(parsed.scheme(), "http" | "https"),
            "endpoint URL must be http or https, got {:?}",
            parsed.scheme()
        );
        Ok(())
    }
}

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of drain attempts (including the first).
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

/// Global defaults loaded from `~/.config/cue/config.toml`, merged under
/// per-invocation settings by the CLI.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CueConfig {
    /// Default chunk-size threshold in bytes (absent = never chunk).
    #[serde(default)]
    pub chunk_size: Option<u64>,
    /// Headers sent with every request unless overridden.
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// Optional retry policy for `--retry`; built-in defaults when missing.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

impl CueConfig {
    /// Session configuration for `url` seeded with these defaults.
    pub fn session(&self, url: impl Into<String>) -> UploadConfig {
        UploadConfig {
            chunk_size: self.chunk_size,
            headers: self.headers.clone(),
            ..UploadConfig::new(url)
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("cue")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<CueConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = CueConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: CueConfig = toml::from_str(&data)?;
    Ok(cfg)
}
