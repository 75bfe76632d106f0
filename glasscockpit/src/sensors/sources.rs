//! Sensor capability traits.
//!
//! Platform bindings (outside this crate) implement one trait per hardware
//! capability. A source that is not present on the device reports
//! `is_available() == false` and is never started, so the estimators fed by it
//! simply never produce output.
//!
//! Samples are pushed into a [`SampleSink`]; [`SensorFusion`](crate::aircraft::SensorFusion)
//! implements the sink for every sample type.

use std::sync::Arc;

use super::samples::{
    AccelerometerSample, GnssSatellite, GpsFix, GravitySample, GyroSample,
    LinearAccelerationSample, MagnetometerSample, PressureSample, RotationSample,
};

/// Receiver of pushed sensor samples.
pub trait SampleSink<T>: Send + Sync {
    fn push(&self, sample: T);
}

/// Fused orientation (rotation-vector) capability.
pub trait OrientationSource: Send + Sync {
    fn is_available(&self) -> bool;
    fn start(&self, sink: Arc<dyn SampleSink<RotationSample>>);
    fn stop(&self);
}

/// Barometer capability.
pub trait PressureSource: Send + Sync {
    fn is_available(&self) -> bool;
    fn start(&self, sink: Arc<dyn SampleSink<PressureSample>>);
    fn stop(&self);
}

/// Gyroscope capability.
pub trait GyroscopeSource: Send + Sync {
    fn is_available(&self) -> bool;
    fn start(&self, sink: Arc<dyn SampleSink<GyroSample>>);
    fn stop(&self);
}

/// Gravity capability, used for mount auto-detection.
pub trait GravitySource: Send + Sync {
    fn is_available(&self) -> bool;
    fn start(&self, sink: Arc<dyn SampleSink<GravitySample>>);
    fn stop(&self);
}

/// Raw accelerometer capability. Diagnostic only.
pub trait AccelerometerSource: Send + Sync {
    fn is_available(&self) -> bool;
    fn start(&self, sink: Arc<dyn SampleSink<AccelerometerSample>>);
    fn stop(&self);
}

/// Linear acceleration capability. Diagnostic only.
pub trait LinearAccelerationSource: Send + Sync {
    fn is_available(&self) -> bool;
    fn start(&self, sink: Arc<dyn SampleSink<LinearAccelerationSample>>);
    fn stop(&self);
}

/// Magnetometer capability. Diagnostic only.
pub trait MagnetometerSource: Send + Sync {
    fn is_available(&self) -> bool;
    fn start(&self, sink: Arc<dyn SampleSink<MagnetometerSample>>);
    fn stop(&self);
}

/// Location (GPS fix) capability.
pub trait LocationSource: Send + Sync {
    fn is_available(&self) -> bool;
    fn start(&self, sink: Arc<dyn SampleSink<GpsFix>>);
    fn stop(&self);
}

/// GNSS satellite status capability.
pub trait SatelliteSource: Send + Sync {
    fn is_available(&self) -> bool;
    fn start(&self, sink: Arc<dyn SampleSink<Vec<GnssSatellite>>>);
    fn stop(&self);
}

/// The set of capabilities a device offers. Missing entries are treated the
/// same as unavailable ones.
#[derive(Clone, Default)]
pub struct SensorSources {
    pub orientation: Option<Arc<dyn OrientationSource>>,
    pub pressure: Option<Arc<dyn PressureSource>>,
    pub gyroscope: Option<Arc<dyn GyroscopeSource>>,
    pub gravity: Option<Arc<dyn GravitySource>>,
    pub accelerometer: Option<Arc<dyn AccelerometerSource>>,
    pub linear_acceleration: Option<Arc<dyn LinearAccelerationSource>>,
    pub magnetometer: Option<Arc<dyn MagnetometerSource>>,
    pub location: Option<Arc<dyn LocationSource>>,
    pub satellites: Option<Arc<dyn SatelliteSource>>,
}

/// Capabilities that were actually started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AttachedSources {
    pub orientation: bool,
    pub pressure: bool,
    pub gyroscope: bool,
    pub gravity: bool,
    pub accelerometer: bool,
    pub linear_acceleration: bool,
    pub magnetometer: bool,
    pub location: bool,
    pub satellites: bool,
}

impl AttachedSources {
    pub fn count(&self) -> usize {
        [
            self.orientation,
            self.pressure,
            self.gyroscope,
            self.gravity,
            self.accelerometer,
            self.linear_acceleration,
            self.magnetometer,
            self.location,
            self.satellites,
        ]
        .iter()
        .filter(|attached| **attached)
        .count()
    }
}

impl SensorSources {
    /// Stop every available source.
    pub fn stop_all(&self) {
        if let Some(s) = self.orientation.as_ref().filter(|s| s.is_available()) {
            s.stop();
        }
        if let Some(s) = self.pressure.as_ref().filter(|s| s.is_available()) {
            s.stop();
        }
        if let Some(s) = self.gyroscope.as_ref().filter(|s| s.is_available()) {
            s.stop();
        }
        if let Some(s) = self.gravity.as_ref().filter(|s| s.is_available()) {
            s.stop();
        }
        if let Some(s) = self.accelerometer.as_ref().filter(|s| s.is_available()) {
            s.stop();
        }
        if let Some(s) = self.linear_acceleration.as_ref().filter(|s| s.is_available()) {
            s.stop();
        }
        if let Some(s) = self.magnetometer.as_ref().filter(|s| s.is_available()) {
            s.stop();
        }
        if let Some(s) = self.location.as_ref().filter(|s| s.is_available()) {
            s.stop();
        }
        if let Some(s) = self.satellites.as_ref().filter(|s| s.is_available()) {
            s.stop();
        }
    }
}
