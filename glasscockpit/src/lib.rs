//! glasscockpit - navigation and sensor-fusion core for a recreational
//! glass cockpit.
//!
//! Turns raw, asynchronous device sensor samples into a smoothed aircraft
//! state (attitude, vertical speed, turn rate, position) and derives
//! Direct-To guidance from it. Offline airport data is served by viewport
//! for a moving map.
//!
//! # Modules
//!
//! - [`sensors`] - sample types, capability traits, baro and turn-rate filters
//! - [`attitude`] - rotation matrices, mount detection, calibrated pitch/roll
//! - [`aircraft`] - the shared [`AircraftState`](aircraft::AircraftState) and the fusion pipeline
//! - [`nav`] - great-circle math, Direct-To plan and guidance
//! - [`airport`] - CSV airport data, spatial viewport queries
//! - [`config`] - INI configuration
//! - [`logging`] - tracing setup
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use glasscockpit::aircraft::{AircraftStateStore, FusionConfig, SensorFusion};
//! use glasscockpit::nav::{DirectToGuidance, GuidanceConfig, Waypoint};
//! use glasscockpit::sensors::GpsFix;
//!
//! let store = AircraftStateStore::new();
//! let fusion = Arc::new(SensorFusion::new(store.clone(), FusionConfig::default()));
//!
//! let mut fix = GpsFix::at(12.99, 80.17);
//! fix.speed_mps = Some(50.0);
//! fix.track_deg = Some(90.0);
//! fusion.on_gps_fix(fix);
//!
//! store.set_to(Some(Waypoint::new("VOBL", "Bengaluru", 13.20, 77.70)));
//! store.set_from(Some(Waypoint::present_position(12.99, 80.17)));
//! assert!(store.activate_gps());
//!
//! let guidance = DirectToGuidance::new(GuidanceConfig::default()).compute(&store.snapshot());
//! assert!(guidance.distance_to_go_nm.is_some());
//! ```

pub mod aircraft;
pub mod airport;
pub mod attitude;
pub mod config;
pub mod logging;
pub mod nav;
pub mod sensors;

/// Version of the glasscockpit library.
///
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
