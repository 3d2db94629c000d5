//! Configuration schema types for `skyburst.toml`
//!
//! Defines the structure and validation rules for a fireworks show.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::firework::BurstKind;
use crate::simulation::SimulationConfig;

/// Largest accepted frame edge, in pixels.
pub const MAX_DIMENSION: u32 = 16384;

/// Video output section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoConfig {
    /// Output path: a `.gif` file or a directory for PNG frames
    #[serde(default = "default_output")]
    pub output: PathBuf,
    /// Length in seconds
    #[serde(default = "default_duration")]
    pub duration: u32,
    /// Frames per second
    #[serde(default = "default_fps")]
    pub fps: u32,
    /// Frame width in pixels
    #[serde(default = "default_width")]
    pub width: u32,
    /// Frame height in pixels
    #[serde(default = "default_height")]
    pub height: u32,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            duration: default_duration(),
            fps: default_fps(),
            width: default_width(),
            height: default_height(),
        }
    }
}

fn default_output() -> PathBuf {
    PathBuf::from("fireworks.gif")
}

fn default_duration() -> u32 {
    5
}

fn default_fps() -> u32 {
    30
}

fn default_width() -> u32 {
    1280
}

fn default_height() -> u32 {
    720
}

/// Show section: how busy the sky is
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowConfig {
    /// Spawn rate and burst density (nominally 1-10)
    #[serde(default = "default_intensity")]
    pub intensity: u32,
    /// Fixed random seed for reproducible output
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Burst kinds picked at random for each firework
    #[serde(default = "default_kinds")]
    pub kinds: Vec<BurstKind>,
}

impl Default for ShowConfig {
    fn default() -> Self {
        Self { intensity: default_intensity(), seed: None, kinds: default_kinds() }
    }
}

fn default_intensity() -> u32 {
    5
}

fn default_kinds() -> Vec<BurstKind> {
    vec![BurstKind::Basic]
}

/// Root configuration structure for `skyburst.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkyburstConfig {
    /// Video output settings
    #[serde(default)]
    pub video: VideoConfig,
    /// Show settings
    #[serde(default)]
    pub show: ShowConfig,
}

/// Validation error for config
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "video.fps")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "skyburst.toml: '{}' {}", self.field, self.message)
    }
}

impl SkyburstConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        if self.video.output.as_os_str().is_empty() {
            errors.push(ConfigValidationError {
                field: "video.output".to_string(),
                message: "must be a non-empty path".to_string(),
            });
        }

        for (field, value) in [("video.duration", self.video.duration), ("video.fps", self.video.fps)]
        {
            if value == 0 {
                errors.push(ConfigValidationError {
                    field: field.to_string(),
                    message: "must be a positive integer".to_string(),
                });
            }
        }

        for (field, value) in [("video.width", self.video.width), ("video.height", self.video.height)]
        {
            if value == 0 || value > MAX_DIMENSION {
                errors.push(ConfigValidationError {
                    field: field.to_string(),
                    message: format!("must be between 1 and {}", MAX_DIMENSION),
                });
            }
        }

        if self.show.kinds.is_empty() {
            errors.push(ConfigValidationError {
                field: "show.kinds".to_string(),
                message: "must list at least one burst kind".to_string(),
            });
        }

        errors
    }

    /// Simulation parameters described by this configuration.
    pub fn simulation(&self) -> SimulationConfig {
        SimulationConfig {
            duration: self.video.duration,
            fps: self.video.fps,
            width: self.video.width,
            height: self.video.height,
            intensity: self.show.intensity,
            seed: self.show.seed,
            kinds: self.show.kinds.clone(),
        }
    }
}
