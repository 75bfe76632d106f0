//! Typed sensor samples delivered by platform bindings.

use std::fmt;

use crate::attitude::Mat3;

/// Fused orientation reading as a device → world rotation matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationSample {
    pub rotation: Mat3,
    pub timestamp_ms: u64,
}

impl RotationSample {
    pub fn new(rotation: Mat3, timestamp_ms: u64) -> Self {
        Self {
            rotation,
            timestamp_ms,
        }
    }

    /// Build from a rotation-vector sensor reading (unit quaternion vector part,
    /// optional scalar part).
    pub fn from_rotation_vector(xyz: [f64; 3], w: Option<f64>, timestamp_ms: u64) -> Self {
        Self::new(Mat3::from_rotation_vector(xyz, w), timestamp_ms)
    }
}

/// Ambient pressure reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PressureSample {
    pub pressure_hpa: f64,
    /// Monotonic timestamp in milliseconds.
    pub timestamp_ms: u64,
}

impl PressureSample {
    pub fn new(pressure_hpa: f64, timestamp_ms: u64) -> Self {
        Self {
            pressure_hpa,
            timestamp_ms,
        }
    }
}

/// Angular rate in rad/s, device axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GyroSample {
    pub rate_rad_s: [f64; 3],
    pub timestamp_ms: u64,
}

impl GyroSample {
    pub fn new(rate_rad_s: [f64; 3], timestamp_ms: u64) -> Self {
        Self {
            rate_rad_s,
            timestamp_ms,
        }
    }
}

/// Gravity vector in m/s², device axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GravitySample {
    pub gravity: [f64; 3],
    pub timestamp_ms: u64,
}

impl GravitySample {
    pub fn new(gravity: [f64; 3], timestamp_ms: u64) -> Self {
        Self {
            gravity,
            timestamp_ms,
        }
    }
}

/// Raw acceleration including gravity, m/s², device axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccelerometerSample {
    pub acceleration: [f64; 3],
    pub timestamp_ms: u64,
}

impl AccelerometerSample {
    pub fn new(acceleration: [f64; 3], timestamp_ms: u64) -> Self {
        Self {
            acceleration,
            timestamp_ms,
        }
    }
}

/// Acceleration with gravity removed, m/s², device axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearAccelerationSample {
    pub acceleration: [f64; 3],
    pub timestamp_ms: u64,
}

impl LinearAccelerationSample {
    pub fn new(acceleration: [f64; 3], timestamp_ms: u64) -> Self {
        Self {
            acceleration,
            timestamp_ms,
        }
    }
}

/// Magnetic field in µT, device axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MagnetometerSample {
    pub field_ut: [f64; 3],
    pub timestamp_ms: u64,
}

impl MagnetometerSample {
    pub fn new(field_ut: [f64; 3], timestamp_ms: u64) -> Self {
        Self {
            field_ut,
            timestamp_ms,
        }
    }

    /// Total field strength in µT.
    pub fn magnitude_ut(&self) -> f64 {
        self.field_ut.iter().map(|c| c * c).sum::<f64>().sqrt()
    }
}

/// A location fix from the GPS provider.
///
/// Only latitude and longitude are guaranteed; everything else depends on
/// what the receiver reports.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GpsFix {
    pub latitude: f64,
    pub longitude: f64,
    /// Ground speed in m/s.
    pub speed_mps: Option<f64>,
    /// Track over ground in degrees true.
    pub track_deg: Option<f64>,
    /// Altitude above the ellipsoid in meters.
    pub altitude_m: Option<f64>,
    pub horizontal_accuracy_m: Option<f64>,
    pub vertical_accuracy_m: Option<f64>,
    pub speed_accuracy_mps: Option<f64>,
    pub bearing_accuracy_deg: Option<f64>,
    /// Provider tag reported by the platform (e.g. "gps", "fused").
    pub provider: Option<String>,
    /// Fix time, milliseconds since the Unix epoch.
    pub fix_time_ms: u64,
}

impl GpsFix {
    /// A fix with only a position.
    pub fn at(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            ..Default::default()
        }
    }

    /// True for the (0, 0) placeholder some receivers report before a fix.
    pub fn is_bogus(&self, epsilon: f64) -> bool {
        !self.latitude.is_finite()
            || !self.longitude.is_finite()
            || (self.latitude.abs() < epsilon && self.longitude.abs() < epsilon)
    }
}

/// GNSS constellation, mapped from the platform's numeric id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Constellation {
    Gps,
    Sbas,
    Glonass,
    Qzss,
    Beidou,
    Galileo,
    Irnss,
    Unknown(u8),
}

impl Constellation {
    pub fn from_id(id: u8) -> Self {
        match id {
            1 => Self::Gps,
            2 => Self::Sbas,
            3 => Self::Glonass,
            4 => Self::Qzss,
            5 => Self::Beidou,
            6 => Self::Galileo,
            7 => Self::Irnss,
            other => Self::Unknown(other),
        }
    }
}

impl fmt::Display for Constellation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gps => write!(f, "GPS"),
            Self::Sbas => write!(f, "SBAS"),
            Self::Glonass => write!(f, "GLONASS"),
            Self::Qzss => write!(f, "QZSS"),
            Self::Beidou => write!(f, "BEIDOU"),
            Self::Galileo => write!(f, "GALILEO"),
            Self::Irnss => write!(f, "IRNSS"),
            Self::Unknown(id) => write!(f, "UNKNOWN({})", id),
        }
    }
}

/// One satellite in view.
#[derive(Debug, Clone, PartialEq)]
pub struct GnssSatellite {
    /// Space-vehicle id.
    pub svid: u32,
    pub constellation: Constellation,
    pub azimuth_deg: f64,
    pub elevation_deg: f64,
    /// Carrier-to-noise density in dB-Hz.
    pub cn0_db_hz: f64,
    pub used_in_fix: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bogus_fix_detection() {
        assert!(GpsFix::at(0.0, 0.0).is_bogus(1e-4));
        assert!(GpsFix::at(0.00005, -0.00005).is_bogus(1e-4));
        assert!(GpsFix::at(f64::NAN, 10.0).is_bogus(1e-4));
        // Equator or meridian alone is a valid fix
        assert!(!GpsFix::at(0.0, 80.0).is_bogus(1e-4));
        assert!(!GpsFix::at(13.0, 0.0).is_bogus(1e-4));
    }

    #[test]
    fn test_magnetometer_magnitude() {
        let sample = MagnetometerSample::new([30.0, 0.0, -40.0], 0);
        assert!((sample.magnitude_ut() - 50.0).abs() < 1e-12);
    }

    #[test]
    fn test_constellation_ids() {
        assert_eq!(Constellation::from_id(1), Constellation::Gps);
        assert_eq!(Constellation::from_id(6), Constellation::Galileo);
        assert_eq!(Constellation::from_id(42), Constellation::Unknown(42));
        assert_eq!(Constellation::Glonass.to_string(), "GLONASS");
    }
}
