//! INI serialization logic for converting `ConfigFile` → INI string.
//!
//! This module contains the `to_config_string()` function that produces
//! the commented INI representation written to `config.ini`.

use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let data_dir = config
        .airports
        .data_dir
        .as_ref()
        .map(|p| path_to_string(p))
        .unwrap_or_default();
    let log_file = config
        .logging
        .file
        .as_ref()
        .map(|p| path_to_string(p))
        .unwrap_or_default();

    format!(
        r#"[attitude]
; How the device sits in the cockpit:
;   auto    - detect from gravity (flat when lying down, upright when standing)
;   flat    - screen up, top edge towards the nose
;   upright - screen facing the pilot
mount = {}

[baro]
; EMA weight for each new barometric altitude sample (0 < x <= 1)
altitude_alpha = {}
; EMA weight for each new vertical speed value (0 < x <= 1)
vsi_alpha = {}
; Vertical speeds smaller than this (ft/min) read as zero
deadband_fpm = {}
; How fast GPS altitude pulls the sea-level reference (0 < x <= 1)
sea_level_blend = {}
; Initial sea-level pressure in hPa
sea_level_hpa = {}

[turn_rate]
; EMA weight for each gyro sample (0 < x <= 1)
smoothing = {}

[guidance]
; Cross-track error (NM) that deflects the CDI to full scale
cdi_full_scale_nm = {}
; Below this ground speed (kt) ETA is shown as unavailable
eta_min_speed_kt = {}

[airports]
; Directory with OurAirports CSV files (airports.csv required, .csv.gz accepted)
; Leave empty to run without the airport overlay
data_dir = {}
; GPS fixes closer than this (degrees) to 0,0 are ignored
bogus_fix_epsilon = {}

[logging]
; Log file path (default: logs/glasscockpit.log)
file = {}
"#,
        config.attitude.mount,
        config.baro.altitude_alpha,
        config.baro.vsi_alpha,
        config.baro.deadband_fpm,
        config.baro.sea_level_blend,
        config.baro.sea_level_hpa,
        config.turn_rate.smoothing,
        config.guidance.cdi_full_scale_nm,
        config.guidance.eta_min_speed_kt,
        data_dir,
        config.airports.bogus_fix_epsilon,
        log_file,
    )
}

fn path_to_string(path: &Path) -> String {
    path.to_string_lossy().to_string()
}
