//! Sensor fusion - feeds sensor samples through the estimators into the
//! shared aircraft state.
//!
//! Each sensor stream has its own estimator behind its own lock, so a slow
//! barometer callback never holds up the attitude stream. Results are
//! published through [`AircraftStateStore::update`].
//!
//! # Usage
//!
//! ```ignore
//! let store = AircraftStateStore::new();
//! let fusion = Arc::new(SensorFusion::new(store.clone(), FusionConfig::default()));
//!
//! // Either wire platform sources...
//! let attached = fusion.attach(&sources);
//!
//! // ...or push samples directly
//! fusion.on_pressure(PressureSample::new(1012.5, now_ms));
//! ```

use std::sync::{Arc, Mutex};

use super::state::{CalibrationStatus, FixAccuracy, GeoPoint};
use super::store::AircraftStateStore;
use crate::attitude::{AttitudeEstimator, MountDetector, MountMode, MountStyle};
use crate::nav::wrap360;
use crate::sensors::{
    AccelerometerSample, AttachedSources, BaroFilterConfig, BarometricVerticalSpeedFilter,
    GnssSatellite, GpsFix, GravitySample, GyroSample, LinearAccelerationSample,
    MagnetometerSample, PressureSample, RotationSample, SampleSink, SensorSources,
    TurnRateResolver,
};

/// Fixes with both |lat| and |lon| below this are treated as placeholders.
pub const DEFAULT_BOGUS_FIX_EPSILON: f64 = 0.0001;

/// Configuration for [`SensorFusion`].
#[derive(Debug, Clone, PartialEq)]
pub struct FusionConfig {
    pub baro: BaroFilterConfig,
    /// EMA weight for turn rate.
    pub turn_rate_smoothing: f64,
    pub bogus_fix_epsilon: f64,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            baro: BaroFilterConfig::default(),
            turn_rate_smoothing: TurnRateResolver::DEFAULT_SMOOTHING,
            bogus_fix_epsilon: DEFAULT_BOGUS_FIX_EPSILON,
        }
    }
}

/// Attitude estimator plus the mount epoch its calibration belongs to.
struct AttitudeStage {
    estimator: AttitudeEstimator,
    mount_epoch: u64,
}

/// Turns raw sensor samples into aircraft state.
pub struct SensorFusion {
    store: AircraftStateStore,
    config: FusionConfig,
    attitude: Mutex<AttitudeStage>,
    baro: Mutex<BarometricVerticalSpeedFilter>,
    turn_rate: Mutex<TurnRateResolver>,
    mount: Mutex<MountDetector>,
}

impl SensorFusion {
    pub fn new(store: AircraftStateStore, config: FusionConfig) -> Self {
        let snapshot = store.snapshot();
        Self {
            attitude: Mutex::new(AttitudeStage {
                estimator: AttitudeEstimator::new(snapshot.mount_style),
                mount_epoch: snapshot.mount_epoch,
            }),
            baro: Mutex::new(BarometricVerticalSpeedFilter::new(config.baro.clone())),
            turn_rate: Mutex::new(TurnRateResolver::new(config.turn_rate_smoothing)),
            mount: Mutex::new(MountDetector::new()),
            store,
            config,
        }
    }

    pub fn store(&self) -> &AircraftStateStore {
        &self.store
    }

    pub fn config(&self) -> &FusionConfig {
        &self.config
    }

    /// Start every available source, pushing into this fusion instance.
    pub fn attach(self: &Arc<Self>, sources: &SensorSources) -> AttachedSources {
        let mut attached = AttachedSources::default();

        if let Some(source) = sources.orientation.as_ref().filter(|s| s.is_available()) {
            source.start(self.clone());
            attached.orientation = true;
        }
        if let Some(source) = sources.pressure.as_ref().filter(|s| s.is_available()) {
            source.start(self.clone());
            attached.pressure = true;
        }
        if let Some(source) = sources.gyroscope.as_ref().filter(|s| s.is_available()) {
            source.start(self.clone());
            attached.gyroscope = true;
        }
        if let Some(source) = sources.gravity.as_ref().filter(|s| s.is_available()) {
            source.start(self.clone());
            attached.gravity = true;
        }
        if let Some(source) = sources.accelerometer.as_ref().filter(|s| s.is_available()) {
            source.start(self.clone());
            attached.accelerometer = true;
        }
        if let Some(source) = sources
            .linear_acceleration
            .as_ref()
            .filter(|s| s.is_available())
        {
            source.start(self.clone());
            attached.linear_acceleration = true;
        }
        if let Some(source) = sources.magnetometer.as_ref().filter(|s| s.is_available()) {
            source.start(self.clone());
            attached.magnetometer = true;
        }
        if let Some(source) = sources.location.as_ref().filter(|s| s.is_available()) {
            source.start(self.clone());
            attached.location = true;
        }
        if let Some(source) = sources.satellites.as_ref().filter(|s| s.is_available()) {
            source.start(self.clone());
            attached.satellites = true;
        }

        tracing::info!(
            orientation = attached.orientation,
            pressure = attached.pressure,
            gyroscope = attached.gyroscope,
            gravity = attached.gravity,
            accelerometer = attached.accelerometer,
            linear_acceleration = attached.linear_acceleration,
            magnetometer = attached.magnetometer,
            location = attached.location,
            satellites = attached.satellites,
            "Sensor sources attached"
        );
        attached
    }

    /// Orientation sample → pitch/roll.
    ///
    /// Consumes a pending calibration request on this sample. Returns `false`
    /// if the sample was dropped.
    pub fn on_rotation(&self, sample: RotationSample) -> bool {
        if !sample.rotation.is_finite() {
            tracing::debug!("Dropping non-finite rotation sample");
            return false;
        }

        let snapshot = self.store.snapshot();
        let calibration_requested = snapshot.calibration == CalibrationStatus::Pending;
        let epoch = snapshot.mount_epoch;

        let (attitude, calibrated) = {
            let mut stage = self
                .attitude
                .lock()
                .expect("attitude estimator lock poisoned");
            // The store owns the calibration status; a reference captured
            // before the last mount change, or one the store no longer
            // reports, is discarded.
            let stale = stage.mount_epoch != epoch
                || snapshot.calibration == CalibrationStatus::Uncalibrated;
            if stale && stage.estimator.is_calibrated() {
                stage.estimator.clear_calibration();
                tracing::info!(epoch, "Attitude calibration dropped");
            }
            stage.mount_epoch = epoch;
            stage.estimator.set_style(snapshot.mount_style);
            if calibration_requested {
                stage.estimator.request_calibration();
            }
            let attitude = stage.estimator.update(&sample.rotation);
            (attitude, stage.estimator.is_calibrated())
        };

        self.store.update(|s| {
            s.attitude = Some(attitude);
            if s.mount_epoch != epoch {
                // Mount changed while this sample was processed; the next
                // sample re-evaluates calibration in the new frame.
                return;
            }
            s.calibration = match (s.calibration, calibrated) {
                (CalibrationStatus::Pending, _) if !calibration_requested => {
                    CalibrationStatus::Pending
                }
                (CalibrationStatus::Uncalibrated, _) if !calibration_requested => {
                    CalibrationStatus::Uncalibrated
                }
                (_, true) => CalibrationStatus::Calibrated,
                (_, false) => CalibrationStatus::Uncalibrated,
            };
        });
        true
    }

    /// Pressure sample → baro altitude and VSI.
    pub fn on_pressure(&self, sample: PressureSample) -> bool {
        let (reading, sea_level) = {
            let mut baro = self.baro.lock().expect("baro filter lock poisoned");
            (baro.update(sample), baro.sea_level_hpa())
        };
        let Some(reading) = reading else {
            return false;
        };

        self.store.update(|s| {
            s.pressure_hpa = Some(reading.pressure_hpa);
            s.baro_altitude_m = Some(reading.altitude_m);
            s.sea_level_hpa = Some(sea_level);
            s.vertical_speed_fpm = reading.vsi_fpm;
        });
        true
    }

    /// Gyro sample → turn rate for the current mount style.
    pub fn on_gyro(&self, sample: GyroSample) -> bool {
        let style = self.store.snapshot().mount_style;
        let turn = {
            let mut resolver = self
                .turn_rate
                .lock()
                .expect("turn rate resolver lock poisoned");
            resolver.update(&sample, style)
        };

        self.store.update(|s| {
            s.gyro_rad_s = Some(sample.rate_rad_s);
            if let Some(turn) = turn {
                s.turn_rate_dps = Some(turn.smoothed_dps);
                s.turn_rate_raw_dps = Some(turn.raw_dps);
            }
        });
        turn.is_some()
    }

    /// Gravity sample → mount auto-detection.
    ///
    /// Returns the new style when auto-detection switched it.
    pub fn on_gravity(&self, sample: GravitySample) -> Option<MountStyle> {
        let mode = self.store.snapshot().mount_mode;
        let detected = {
            let mut detector = self.mount.lock().expect("mount detector lock poisoned");
            if mode == MountMode::Auto {
                detector.observe(sample.gravity)
            } else {
                detector.reset();
                None
            }
        };

        self.store.update(|s| {
            s.gravity = Some(sample.gravity);
            let style = detected?;
            if s.mount_mode != MountMode::Auto || s.mount_style == style {
                return None;
            }
            tracing::info!(from = %s.mount_style, to = %style, "Mount style auto-detected");
            s.change_mount_style(style);
            Some(style)
        })
    }

    /// Raw accelerometer sample, kept for diagnostics.
    pub fn on_accelerometer(&self, sample: AccelerometerSample) -> bool {
        if !sample.acceleration.iter().all(|v| v.is_finite()) {
            return false;
        }
        self.store
            .update(|s| s.acceleration = Some(sample.acceleration));
        true
    }

    /// Linear acceleration sample, kept for diagnostics.
    pub fn on_linear_acceleration(&self, sample: LinearAccelerationSample) -> bool {
        if !sample.acceleration.iter().all(|v| v.is_finite()) {
            return false;
        }
        self.store
            .update(|s| s.linear_acceleration = Some(sample.acceleration));
        true
    }

    /// Magnetometer sample, kept for diagnostics.
    pub fn on_magnetometer(&self, sample: MagnetometerSample) -> bool {
        if !sample.field_ut.iter().all(|v| v.is_finite()) {
            return false;
        }
        self.store
            .update(|s| s.magnetic_field_ut = Some(sample.field_ut));
        true
    }

    /// GPS fix → position, speed, track and sea-level re-anchoring.
    ///
    /// Placeholder (0, 0) fixes are rejected. Returns whether the fix was
    /// applied.
    pub fn on_gps_fix(&self, fix: GpsFix) -> bool {
        if fix.is_bogus(self.config.bogus_fix_epsilon) {
            tracing::debug!(
                latitude = fix.latitude,
                longitude = fix.longitude,
                "Ignoring placeholder GPS fix"
            );
            return false;
        }

        let sea_level = fix.altitude_m.and_then(|altitude| {
            self.baro
                .lock()
                .expect("baro filter lock poisoned")
                .observe_gps_altitude(altitude)
        });

        self.store.update(|s| {
            s.position = Some(GeoPoint::new(fix.latitude, fix.longitude));
            s.ground_speed_mps = fix.speed_mps.filter(|v| v.is_finite());
            s.track_deg = fix.track_deg.filter(|v| v.is_finite()).map(wrap360);
            s.gps_altitude_m = fix.altitude_m;
            s.fix_accuracy = FixAccuracy::from(&fix);
            s.fix_time_ms = Some(fix.fix_time_ms);
            if let Some(sea_level) = sea_level {
                s.sea_level_hpa = Some(sea_level);
            }
            s.fix_provider = fix.provider;
        });
        true
    }

    /// Satellite status → counts and the current satellite list.
    pub fn on_satellites(&self, satellites: Vec<GnssSatellite>) {
        let in_view = satellites.len();
        let used = satellites.iter().filter(|s| s.used_in_fix).count();
        self.store.update(|s| {
            s.satellites_in_view = Some(in_view);
            s.satellites_used = Some(used);
            s.satellites = satellites;
        });
    }
}

impl SampleSink<RotationSample> for SensorFusion {
    fn push(&self, sample: RotationSample) {
        self.on_rotation(sample);
    }
}

impl SampleSink<PressureSample> for SensorFusion {
    fn push(&self, sample: PressureSample) {
        self.on_pressure(sample);
    }
}

impl SampleSink<GyroSample> for SensorFusion {
    fn push(&self, sample: GyroSample) {
        self.on_gyro(sample);
    }
}

impl SampleSink<GravitySample> for SensorFusion {
    fn push(&self, sample: GravitySample) {
        self.on_gravity(sample);
    }
}

impl SampleSink<AccelerometerSample> for SensorFusion {
    fn push(&self, sample: AccelerometerSample) {
        self.on_accelerometer(sample);
    }
}

impl SampleSink<LinearAccelerationSample> for SensorFusion {
    fn push(&self, sample: LinearAccelerationSample) {
        self.on_linear_acceleration(sample);
    }
}

impl SampleSink<MagnetometerSample> for SensorFusion {
    fn push(&self, sample: MagnetometerSample) {
        self.on_magnetometer(sample);
    }
}

impl SampleSink<GpsFix> for SensorFusion {
    fn push(&self, sample: GpsFix) {
        self.on_gps_fix(sample);
    }
}

impl SampleSink<Vec<GnssSatellite>> for SensorFusion {
    fn push(&self, sample: Vec<GnssSatellite>) {
        self.on_satellites(sample);
    }
}
