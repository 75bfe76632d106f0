//! Aircraft state and sensor fusion.
//!
//! This module owns the **single source of truth** for what the instruments
//! show. Sensor samples flow through [`SensorFusion`] into an
//! [`AircraftStateStore`], which publishes immutable [`AircraftState`]
//! snapshots to any number of readers.
//!
//! ```text
//! sensors ──► SensorFusion ──► AircraftStateStore ──► snapshot() / subscribe()
//!                 │                    ▲
//!                 └─ estimators        └─ user actions (mount, calibrate, plan)
//! ```
//!
//! # Components
//!
//! - [`state`] - `AircraftState`, `GeoPoint`, `FixAccuracy`, `CalibrationStatus`
//! - [`store`] - `AircraftStateStore` (copy-on-write publication, user actions)
//! - [`fusion`] - `SensorFusion` (per-sensor estimators, bogus fix filtering)

mod fusion;
mod state;
mod store;

pub use fusion::{FusionConfig, SensorFusion, DEFAULT_BOGUS_FIX_EPSILON};
pub use state::{AircraftState, CalibrationStatus, FixAccuracy, GeoPoint, MPS_TO_KNOTS};
pub use store::AircraftStateStore;
