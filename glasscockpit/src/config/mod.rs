//! User configuration for glasscockpit.
//!
//! Settings are read from an INI file (`~/.glasscockpit/config.ini`) and
//! converted into the typed configs the library components take:
//!
//! - `[baro]`, `[turn_rate]`, `[airports]` → [`FusionConfig`](crate::aircraft::FusionConfig)
//! - `[guidance]` → [`GuidanceConfig`](crate::nav::GuidanceConfig)
//! - `[attitude] mount` → initial [`MountMode`](crate::attitude::MountMode)
//!
//! # Example
//!
//! ```
//! use glasscockpit::aircraft::{AircraftStateStore, SensorFusion};
//! use glasscockpit::config::ConfigFile;
//!
//! let config = ConfigFile::default();
//! let store = AircraftStateStore::new();
//! store.set_mount_mode(config.attitude.mount);
//! let fusion = SensorFusion::new(store, config.fusion_config());
//! assert_eq!(fusion.config().bogus_fix_epsilon, 0.0001);
//! ```

mod defaults;
mod file;
mod parser;
mod settings;
mod writer;

pub use defaults::*;
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{
    AirportSettings, AttitudeSettings, BaroSettings, ConfigFile, GuidanceSettings,
    LoggingSettings, TurnRateSettings,
};
