//! Configuration management for CrabFocus
//!
//! Provides loading, saving and validation of search and detector settings.

use crate::errors::FocusError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default iteration cap: twice the actuator range, enough for a full sweep
/// out and back at step size 1.
pub const DEFAULT_MAX_ITERATIONS: u64 = 131_072;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrabFocusConfig {
    pub search: SearchConfig,
    pub detector: DetectorConfig,
}

/// Hill-climbing search configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Actuator steps moved per probe
    pub step_size: u16,
    /// Maximum frames analyzed before the search gives up
    pub max_iterations: Option<u64>,
    /// Wall-clock budget for one search in milliseconds
    pub max_duration_ms: Option<u64>,
}

/// Contrast detector configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Minimum pixels a frame must hold to be scored
    pub min_pixels: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            step_size: 1,
            max_iterations: Some(DEFAULT_MAX_ITERATIONS),
            max_duration_ms: None,
        }
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self { min_pixels: 2 }
    }
}

impl SearchConfig {
    pub fn validate(&self) -> Result<(), FocusError> {
        if self.step_size == 0 {
            return Err(FocusError::Config("step_size must be at least 1".to_string()));
        }
        if self.max_iterations == Some(0) {
            return Err(FocusError::Config(
                "max_iterations must be at least 1 when set".to_string(),
            ));
        }
        Ok(())
    }
}

impl CrabFocusConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, FocusError> {
        let path = path.as_ref();

        if !path.exists() {
            log::info!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .map_err(|e| FocusError::Config(format!("Failed to read config file: {}", e)))?;

        let config: CrabFocusConfig = toml::from_str(&contents)
            .map_err(|e| FocusError::Config(format!("Failed to parse config file: {}", e)))?;

        config.validate()?;
        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), FocusError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                FocusError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| FocusError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, toml_string)
            .map_err(|e| FocusError::Config(format!("Failed to write config file: {}", e)))?;

        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Get default config file path
    pub fn default_path() -> PathBuf {
        PathBuf::from("crabfocus.toml")
    }

    /// Load from default location or fall back to defaults
    pub fn load_or_default() -> Self {
        Self::load_from_file(Self::default_path()).unwrap_or_else(|e| {
            log::warn!("Failed to load config, using defaults: {}", e);
            Self::default()
        })
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), FocusError> {
        self.search.validate()?;
        if self.detector.min_pixels < 2 {
            return Err(FocusError::Config(
                "detector.min_pixels must be at least 2".to_string(),
            ));
        }
        Ok(())
    }
}
