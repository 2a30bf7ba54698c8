use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Global configuration loaded from `~/.config/mgrab/config.toml`.
///
/// Everything here is explicit input to the engine's collaborators; nothing
/// is read from ambient globals at transfer time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MgrabConfig {
    /// Connect timeout per range request, in seconds.
    pub connect_timeout_secs: u64,
    /// Hard wall-clock cap per range request, in seconds. A hung request
    /// fails the transfer instead of hanging it forever.
    pub request_timeout_secs: u64,
    /// Abort a request when throughput stays below this many bytes/sec...
    pub low_speed_limit_bytes: u32,
    /// ...for this many seconds.
    pub low_speed_time_secs: u64,
    /// Directory retrieved media is delivered into (None = current dir).
    #[serde(default)]
    pub download_dir: Option<PathBuf>,
}

impl Default for MgrabConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 30,
            request_timeout_secs: 3600,
            low_speed_limit_bytes: 1024,
            low_speed_time_secs: 60,
            download_dir: None,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("mgrab")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<MgrabConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = MgrabConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: MgrabConfig = toml::from_str(&data)?;
    Ok(cfg)
}
