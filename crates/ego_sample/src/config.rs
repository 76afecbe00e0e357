//! Sample configuration, read from an optional JSON file.
//!
//! Every field has a default, so the file may be absent or list only the
//! fields it overrides. A file that exists but does not parse is an error.

use std::fs;
use std::path::{Path, PathBuf};

use ego_platform::window::PlatformConfig;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SampleConfig {
    pub window: PlatformConfig,
    pub alpha_texture: PathBuf,
    pub solid_texture: PathBuf,
    /// Recompute the projection aspect ratio when the window is resized.
    pub reproject_on_resize: bool,
    pub vsync: bool,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            window: PlatformConfig::default(),
            alpha_texture: PathBuf::from("assets/eye.png"),
            solid_texture: PathBuf::from("assets/zone.png"),
            reproject_on_resize: true,
            vsync: true,
        }
    }
}

impl SampleConfig {
    pub fn present_mode(&self) -> wgpu::PresentMode {
        if self.vsync {
            wgpu::PresentMode::Fifo
        } else {
            wgpu::PresentMode::AutoNoVsync
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config JSON {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

pub fn parse_config(raw: &str) -> Result<SampleConfig, serde_json::Error> {
    serde_json::from_str(raw)
}

pub fn load_config(path: &Path) -> Result<SampleConfig, ConfigError> {
    if !path.exists() {
        log::info!("No config at '{}', using defaults", path.display());
        return Ok(SampleConfig::default());
    }
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_config(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("Loaded config '{}'", path.display());
    Ok(config)
}
