//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing or serialization logic.

use std::path::PathBuf;

use crate::attitude::MountMode;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    /// Device mount settings
    pub attitude: AttitudeSettings,
    /// Barometric altitude and vertical speed filtering
    pub baro: BaroSettings,
    /// Turn rate smoothing
    pub turn_rate: TurnRateSettings,
    /// CDI scaling and ETA floor
    pub guidance: GuidanceSettings,
    /// Airport reference data location
    pub airports: AirportSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// Attitude configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AttitudeSettings {
    /// Mount mode applied at startup
    pub mount: MountMode,
}

/// Barometer filter configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct BaroSettings {
    pub altitude_alpha: f64,
    pub vsi_alpha: f64,
    pub deadband_fpm: f64,
    pub sea_level_blend: f64,
    pub sea_level_hpa: f64,
}

/// Turn rate configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnRateSettings {
    pub smoothing: f64,
}

/// Guidance configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct GuidanceSettings {
    pub cdi_full_scale_nm: f64,
    pub eta_min_speed_kt: f64,
}

/// Airport data and GPS filtering configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AirportSettings {
    /// Directory holding OurAirports CSV files, read by
    /// `AirportDatabase::load_from_config` (None = no airport overlay)
    pub data_dir: Option<PathBuf>,
    /// Fixes within this many degrees of (0, 0) are ignored
    pub bogus_fix_epsilon: f64,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Log file path (None = `logs/glasscockpit.log`)
    pub file: Option<PathBuf>,
}
