//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This module contains the `parse_ini()` function and its helpers.
//! It is the single place where INI key names are mapped to struct fields.

use ini::Ini;
use std::path::PathBuf;

use super::file::ConfigFileError;
use super::settings::ConfigFile;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [attitude] section
    if let Some(section) = ini.section(Some("attitude")) {
        if let Some(v) = section.get("mount") {
            config.attitude.mount = v.parse().map_err(|_| ConfigFileError::InvalidValue {
                section: "attitude".to_string(),
                key: "mount".to_string(),
                value: v.to_string(),
                reason: "must be one of: auto, flat, upright".to_string(),
            })?;
        }
    }

    // [baro] section
    if let Some(section) = ini.section(Some("baro")) {
        if let Some(v) = section.get("altitude_alpha") {
            config.baro.altitude_alpha = parse_weight("baro", "altitude_alpha", v)?;
        }
        if let Some(v) = section.get("vsi_alpha") {
            config.baro.vsi_alpha = parse_weight("baro", "vsi_alpha", v)?;
        }
        if let Some(v) = section.get("deadband_fpm") {
            config.baro.deadband_fpm = parse_non_negative("baro", "deadband_fpm", v)?;
        }
        if let Some(v) = section.get("sea_level_blend") {
            config.baro.sea_level_blend = parse_weight("baro", "sea_level_blend", v)?;
        }
        if let Some(v) = section.get("sea_level_hpa") {
            let hpa = parse_non_negative("baro", "sea_level_hpa", v)?;
            if !(800.0..=1100.0).contains(&hpa) {
                return Err(ConfigFileError::InvalidValue {
                    section: "baro".to_string(),
                    key: "sea_level_hpa".to_string(),
                    value: v.to_string(),
                    reason: "must be between 800 and 1100 hPa".to_string(),
                });
            }
            config.baro.sea_level_hpa = hpa;
        }
    }

    // [turn_rate] section
    if let Some(section) = ini.section(Some("turn_rate")) {
        if let Some(v) = section.get("smoothing") {
            config.turn_rate.smoothing = parse_weight("turn_rate", "smoothing", v)?;
        }
    }

    // [guidance] section
    if let Some(section) = ini.section(Some("guidance")) {
        if let Some(v) = section.get("cdi_full_scale_nm") {
            let nm = parse_non_negative("guidance", "cdi_full_scale_nm", v)?;
            if nm == 0.0 {
                return Err(ConfigFileError::InvalidValue {
                    section: "guidance".to_string(),
                    key: "cdi_full_scale_nm".to_string(),
                    value: v.to_string(),
                    reason: "must be greater than zero".to_string(),
                });
            }
            config.guidance.cdi_full_scale_nm = nm;
        }
        if let Some(v) = section.get("eta_min_speed_kt") {
            config.guidance.eta_min_speed_kt =
                parse_non_negative("guidance", "eta_min_speed_kt", v)?;
        }
    }

    // [airports] section
    if let Some(section) = ini.section(Some("airports")) {
        if let Some(v) = section.get("data_dir") {
            let v = v.trim();
            if !v.is_empty() {
                config.airports.data_dir = Some(expand_tilde(v));
            }
        }
        if let Some(v) = section.get("bogus_fix_epsilon") {
            config.airports.bogus_fix_epsilon =
                parse_non_negative("airports", "bogus_fix_epsilon", v)?;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = Some(expand_tilde(v));
            }
        }
    }

    Ok(config)
}

/// Parse a finite number `>= 0`.
fn parse_non_negative(section: &str, key: &str, value: &str) -> Result<f64, ConfigFileError> {
    match value.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(v),
        _ => Err(ConfigFileError::InvalidValue {
            section: section.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            reason: "must be a non-negative number".to_string(),
        }),
    }
}

/// Parse a smoothing weight in `(0, 1]`.
fn parse_weight(section: &str, key: &str, value: &str) -> Result<f64, ConfigFileError> {
    match value.trim().parse::<f64>() {
        Ok(v) if v > 0.0 && v <= 1.0 => Ok(v),
        _ => Err(ConfigFileError::InvalidValue {
            section: section.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            reason: "must be a number greater than 0 and at most 1".to_string(),
        }),
    }
}

/// Expand ~ to home directory in paths.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
