//! Configuration loading and discovery for `skyburst.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::SkyburstConfig;
use crate::firework::BurstKind;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name searched for during discovery.
pub const CONFIG_FILE_NAME: &str = "skyburst.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse skyburst.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// TOML serialization error
    #[error("Failed to serialize skyburst.toml: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
    /// Refused to overwrite an existing file
    #[error("'{}' already exists (use --force to overwrite)", .0.display())]
    AlreadyExists(PathBuf),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub output: Option<PathBuf>,
    pub duration: Option<u32>,
    pub fps: Option<u32>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub intensity: Option<u32>,
    pub seed: Option<u64>,
    pub kinds: Option<Vec<BurstKind>>,
}

/// Find skyburst.toml by walking up from the current working directory.
///
/// Search order:
/// 1. Walk up from current directory looking for skyburst.toml
/// 2. Check XDG_CONFIG_HOME/skyburst/skyburst.toml (or ~/.config/skyburst/skyburst.toml)
pub fn find_config() -> Option<PathBuf> {
    if let Ok(cwd) = env::current_dir() {
        if let Some(path) = find_config_from(cwd) {
            return Some(path);
        }
    }

    find_xdg_config()
}

/// Find skyburst.toml in the XDG config directory.
pub fn find_xdg_config() -> Option<PathBuf> {
    let xdg_config = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
        .ok()?;

    let config_path = xdg_config.join("skyburst").join(CONFIG_FILE_NAME);
    if config_path.exists() {
        Some(config_path)
    } else {
        None
    }
}

/// Find skyburst.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration from a skyburst.toml file.
///
/// If a path is provided, loads from that file. Otherwise, uses `find_config()`
/// to locate the config file. If no config file is found, returns the default
/// configuration.
///
/// # Example
/// ```ignore
/// let config = load_config(Some(Path::new("shows/new-year/skyburst.toml")))?;
/// ```
pub fn load_config(path: Option<&Path>) -> Result<SkyburstConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => {
            tracing::debug!(path = %p.display(), "loading config");
            load_config_file(&p)
        }
        None => Ok(SkyburstConfig::default()),
    }
}

/// Load configuration from a specific file path.
fn load_config_file(path: &Path) -> Result<SkyburstConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: SkyburstConfig = toml::from_str(&contents)?;
    ensure_valid(&config)?;
    Ok(config)
}

/// Turn validation findings into a [`ConfigError::Validation`].
pub fn ensure_valid(config: &SkyburstConfig) -> Result<(), ConfigError> {
    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }
    Ok(())
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file values.
pub fn merge_cli_overrides(config: &mut SkyburstConfig, overrides: &CliOverrides) {
    if let Some(ref output) = overrides.output {
        config.video.output = output.clone();
    }
    if let Some(duration) = overrides.duration {
        config.video.duration = duration;
    }
    if let Some(fps) = overrides.fps {
        config.video.fps = fps;
    }
    if let Some(width) = overrides.width {
        config.video.width = width;
    }
    if let Some(height) = overrides.height {
        config.video.height = height;
    }
    if let Some(intensity) = overrides.intensity {
        config.show.intensity = intensity;
    }
    if let Some(seed) = overrides.seed {
        config.show.seed = Some(seed);
    }
    if let Some(ref kinds) = overrides.kinds {
        config.show.kinds = kinds.clone();
    }
}

/// Write a default skyburst.toml into `dir`.
///
/// Fails with [`ConfigError::AlreadyExists`] unless `force` is set.
pub fn write_default_config(dir: &Path, force: bool) -> Result<PathBuf, ConfigError> {
    let path = dir.join(CONFIG_FILE_NAME);
    if path.exists() && !force {
        return Err(ConfigError::AlreadyExists(path));
    }

    fs::create_dir_all(dir)?;
    let contents = toml::to_string_pretty(&SkyburstConfig::default())?;
    fs::write(&path, contents)?;
    Ok(path)
}
