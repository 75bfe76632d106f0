//! Sensor samples, capability traits and the per-sensor estimators.
//!
//! - [`samples`] - typed samples (`RotationSample`, `PressureSample`, `GpsFix`, ...)
//! - [`sources`] - capability traits implemented by platform bindings
//! - [`baro`] - `BarometricVerticalSpeedFilter`
//! - [`turn_rate`] - `TurnRateResolver`

pub mod baro;
pub mod samples;
pub mod sources;
pub mod turn_rate;

pub use baro::{
    pressure_altitude_m, sea_level_for_altitude, BaroFilterConfig, BaroReading,
    BarometricVerticalSpeedFilter, STANDARD_SEA_LEVEL_HPA,
};
pub use samples::{
    AccelerometerSample, Constellation, GnssSatellite, GpsFix, GravitySample, GyroSample,
    LinearAccelerationSample, MagnetometerSample, PressureSample, RotationSample,
};
pub use sources::{
    AccelerometerSource, AttachedSources, GravitySource, GyroscopeSource,
    LinearAccelerationSource, LocationSource, MagnetometerSource, OrientationSource,
    PressureSource, SampleSink, SatelliteSource, SensorSources,
};
pub use turn_rate::{TurnRate, TurnRateResolver};
