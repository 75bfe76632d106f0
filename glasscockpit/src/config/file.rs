//! Configuration file handling for ~/.glasscockpit/config.ini.
//!
//! Loads and saves user configuration with sensible defaults.
//! Settings structs live in [`super::settings`], constants in [`super::defaults`],
//! parsing in [`super::parser`], and serialization in [`super::writer`].

use ini::Ini;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::defaults::{DEFAULT_LOG_DIR, DEFAULT_LOG_FILE};
use super::settings::ConfigFile;
use crate::aircraft::FusionConfig;
use crate::nav::GuidanceConfig;
use crate::sensors::BaroFilterConfig;

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// Failed to write config file
    #[error("Failed to write config file: {0}")]
    WriteError(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    /// Failed to create config directory
    #[error("Failed to create config directory: {0}")]
    DirectoryError(std::io::Error),
}

impl ConfigFile {
    /// Load configuration from the default path (~/.glasscockpit/config.ini).
    pub fn load() -> Result<Self, ConfigFileError> {
        let path = config_file_path();
        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        super::parser::parse_ini(&ini)
    }

    /// Save configuration to the default path (~/.glasscockpit/config.ini).
    pub fn save(&self) -> Result<(), ConfigFileError> {
        let path = config_file_path();
        self.save_to(&path)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigFileError> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigFileError::DirectoryError)?;
        }

        let content = super::writer::to_config_string(self);
        std::fs::write(path, content).map_err(|e| ConfigFileError::WriteError(e.to_string()))
    }

    /// Create the default config file if it doesn't exist.
    ///
    /// Returns the path to the config file.
    pub fn ensure_exists() -> Result<PathBuf, ConfigFileError> {
        let path = config_file_path();
        if !path.exists() {
            let config = Self::default();
            config.save_to(&path)?;
        }
        Ok(path)
    }

    /// Sensor fusion tuning from the `[baro]`, `[turn_rate]` and
    /// `[airports]` sections.
    pub fn fusion_config(&self) -> FusionConfig {
        FusionConfig {
            baro: BaroFilterConfig {
                altitude_alpha: self.baro.altitude_alpha,
                vsi_alpha: self.baro.vsi_alpha,
                deadband_fpm: self.baro.deadband_fpm,
                sea_level_blend: self.baro.sea_level_blend,
                sea_level_hpa: self.baro.sea_level_hpa,
            },
            turn_rate_smoothing: self.turn_rate.smoothing,
            bogus_fix_epsilon: self.airports.bogus_fix_epsilon,
        }
    }

    pub fn guidance_config(&self) -> GuidanceConfig {
        GuidanceConfig {
            cdi_full_scale_nm: self.guidance.cdi_full_scale_nm,
            eta_min_speed_kt: self.guidance.eta_min_speed_kt,
        }
    }

    /// Log directory and file name for [`crate::logging::init_logging`].
    pub fn log_location(&self) -> (PathBuf, String) {
        let default = (PathBuf::from(DEFAULT_LOG_DIR), DEFAULT_LOG_FILE.to_string());
        let Some(file) = self.logging.file.as_ref() else {
            return default;
        };
        let Some(name) = file.file_name() else {
            return default;
        };
        let dir = file
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        (dir, name.to_string_lossy().to_string())
    }
}

/// Get the path to the config directory (~/.glasscockpit).
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".glasscockpit")
}

/// Get the path to the config file (~/.glasscockpit/config.ini).
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}
