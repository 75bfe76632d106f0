//! Aircraft state snapshot.
//!
//! [`AircraftState`] is the single value every producer writes into and every
//! consumer reads. Each sensor-derived field stays `None` until its producer
//! delivers a first sample, so "no reading yet" is never confused with zero.

use crate::attitude::{Attitude, MountMode, MountStyle};
use crate::nav::{DirectToPlan, NavSource};
use crate::sensors::{GnssSatellite, GpsFix};

/// Meters per second to knots.
pub const MPS_TO_KNOTS: f64 = 1.943844;

/// A validated latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn as_tuple(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }
}

/// Receiver-reported accuracy of the last fix.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FixAccuracy {
    pub horizontal_m: Option<f64>,
    pub vertical_m: Option<f64>,
    pub speed_mps: Option<f64>,
    pub bearing_deg: Option<f64>,
}

impl From<&GpsFix> for FixAccuracy {
    fn from(fix: &GpsFix) -> Self {
        Self {
            horizontal_m: fix.horizontal_accuracy_m,
            vertical_m: fix.vertical_accuracy_m,
            speed_mps: fix.speed_accuracy_mps,
            bearing_deg: fix.bearing_accuracy_deg,
        }
    }
}

/// Attitude calibration as seen by consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CalibrationStatus {
    #[default]
    Uncalibrated,
    /// Requested; the next orientation sample will be captured.
    Pending,
    Calibrated,
}

/// Complete aircraft state.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AircraftState {
    // GPS
    pub position: Option<GeoPoint>,
    /// Ground speed in m/s.
    pub ground_speed_mps: Option<f64>,
    /// Track over ground, degrees [0, 360).
    pub track_deg: Option<f64>,
    pub gps_altitude_m: Option<f64>,
    pub fix_accuracy: FixAccuracy,
    pub fix_provider: Option<String>,
    pub fix_time_ms: Option<u64>,

    // GNSS
    pub satellites_in_view: Option<usize>,
    pub satellites_used: Option<usize>,
    pub satellites: Vec<GnssSatellite>,

    // Barometer
    pub pressure_hpa: Option<f64>,
    pub baro_altitude_m: Option<f64>,
    pub sea_level_hpa: Option<f64>,
    pub vertical_speed_fpm: Option<f64>,

    // Inertial
    pub attitude: Option<Attitude>,
    /// Smoothed turn rate, deg/s.
    pub turn_rate_dps: Option<f64>,
    pub turn_rate_raw_dps: Option<f64>,
    /// Last raw gyroscope reading, rad/s.
    pub gyro_rad_s: Option<[f64; 3]>,
    /// Last raw gravity reading, m/s².
    pub gravity: Option<[f64; 3]>,
    /// Last raw accelerometer reading, m/s².
    pub acceleration: Option<[f64; 3]>,
    /// Last linear acceleration reading, m/s².
    pub linear_acceleration: Option<[f64; 3]>,
    /// Last magnetometer reading, µT.
    pub magnetic_field_ut: Option<[f64; 3]>,

    // Mounting
    pub mount_mode: MountMode,
    /// Style in effect: forced by `mount_mode`, or detected in auto mode.
    pub mount_style: MountStyle,
    /// Incremented on every change of `mount_style`. A calibration captured
    /// under an older epoch no longer applies.
    pub mount_epoch: u64,
    pub calibration: CalibrationStatus,

    // Navigation
    pub nav_source: NavSource,
    pub plan: DirectToPlan,
    /// Pilot-selected course for HEADING mode, degrees [0, 360).
    pub selected_course_deg: f64,
}

impl AircraftState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ground_speed_kt(&self) -> Option<f64> {
        self.ground_speed_mps.map(|mps| mps * MPS_TO_KNOTS)
    }

    pub fn pitch_deg(&self) -> Option<f64> {
        self.attitude.map(|a| a.pitch_deg)
    }

    pub fn roll_deg(&self) -> Option<f64> {
        self.attitude.map(|a| a.roll_deg)
    }

    pub fn has_position(&self) -> bool {
        self.position.is_some()
    }

    /// Switch the mount style, invalidating any active calibration.
    ///
    /// Returns `false` if `style` is already in effect.
    pub fn change_mount_style(&mut self, style: MountStyle) -> bool {
        if self.mount_style == style {
            return false;
        }
        self.mount_style = style;
        self.mount_epoch = self.mount_epoch.wrapping_add(1);
        if self.calibration == CalibrationStatus::Calibrated {
            self.calibration = CalibrationStatus::Uncalibrated;
        }
        true
    }
}
