//! Default values for all configuration settings.
//!
//! Contains the `DEFAULT_*` constants and the `ConfigFile::default()`
//! implementation. Most values mirror the library defaults so a missing
//! config file behaves exactly like no config at all.

use crate::aircraft::DEFAULT_BOGUS_FIX_EPSILON;
use crate::attitude::MountMode;
use crate::nav::{DEFAULT_CDI_FULL_SCALE_NM, DEFAULT_ETA_MIN_SPEED_KT};
use crate::sensors::{BaroFilterConfig, TurnRateResolver, STANDARD_SEA_LEVEL_HPA};

use super::settings::*;

pub const DEFAULT_ALTITUDE_ALPHA: f64 = BaroFilterConfig::DEFAULT_ALTITUDE_ALPHA;
pub const DEFAULT_VSI_ALPHA: f64 = BaroFilterConfig::DEFAULT_VSI_ALPHA;
pub const DEFAULT_DEADBAND_FPM: f64 = BaroFilterConfig::DEFAULT_DEADBAND_FPM;
pub const DEFAULT_SEA_LEVEL_BLEND: f64 = BaroFilterConfig::DEFAULT_SEA_LEVEL_BLEND;
pub const DEFAULT_SEA_LEVEL_HPA: f64 = STANDARD_SEA_LEVEL_HPA;
pub const DEFAULT_TURN_RATE_SMOOTHING: f64 = TurnRateResolver::DEFAULT_SMOOTHING;

/// Log file name used when `[logging] file` is unset.
pub const DEFAULT_LOG_FILE: &str = "glasscockpit.log";

/// Log directory used when `[logging] file` is unset.
pub const DEFAULT_LOG_DIR: &str = "logs";

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            attitude: AttitudeSettings {
                mount: MountMode::Auto,
            },
            baro: BaroSettings {
                altitude_alpha: DEFAULT_ALTITUDE_ALPHA,
                vsi_alpha: DEFAULT_VSI_ALPHA,
                deadband_fpm: DEFAULT_DEADBAND_FPM,
                sea_level_blend: DEFAULT_SEA_LEVEL_BLEND,
                sea_level_hpa: DEFAULT_SEA_LEVEL_HPA,
            },
            turn_rate: TurnRateSettings {
                smoothing: DEFAULT_TURN_RATE_SMOOTHING,
            },
            guidance: GuidanceSettings {
                cdi_full_scale_nm: DEFAULT_CDI_FULL_SCALE_NM,
                eta_min_speed_kt: DEFAULT_ETA_MIN_SPEED_KT,
            },
            airports: AirportSettings {
                data_dir: None,
                bogus_fix_epsilon: DEFAULT_BOGUS_FIX_EPSILON,
            },
            logging: LoggingSettings { file: None },
        }
    }
}
