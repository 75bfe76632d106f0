//! Barometric altitude and vertical speed.
//!
//! Pressure is converted to altitude with the ISA formula against a sea-level
//! reference that slowly re-anchors itself to GPS altitude. Altitude is
//! smoothed with an EMA, differentiated between samples, passed through a
//! deadband and smoothed again to give a readable VSI.

use super::samples::PressureSample;

/// ISA standard sea-level pressure in hPa.
pub const STANDARD_SEA_LEVEL_HPA: f64 = 1013.25;

/// ISA pressure/altitude exponent.
const ISA_EXPONENT: f64 = 0.190294957;

/// ISA scale height term in meters.
const ISA_SCALE_M: f64 = 44330.0;

/// Meters per second to feet per minute.
pub const MPS_TO_FPM: f64 = 196.8504;

/// Minimum elapsed time between samples, in milliseconds.
const MIN_DT_MS: u64 = 1;

/// Pressure altitude in meters for `pressure_hpa` against `sea_level_hpa`.
pub fn pressure_altitude_m(pressure_hpa: f64, sea_level_hpa: f64) -> f64 {
    ISA_SCALE_M * (1.0 - (pressure_hpa / sea_level_hpa).powf(ISA_EXPONENT))
}

/// Sea-level pressure that makes `pressure_hpa` read as `altitude_m`.
///
/// The ratio term is clamped to [0.1, 1.0] so absurd altitudes cannot drive
/// the result to infinity.
pub fn sea_level_for_altitude(pressure_hpa: f64, altitude_m: f64) -> f64 {
    let ratio = (1.0 - altitude_m / ISA_SCALE_M).clamp(0.1, 1.0);
    pressure_hpa / ratio.powf(1.0 / ISA_EXPONENT)
}

/// Tuning for [`BarometricVerticalSpeedFilter`].
#[derive(Debug, Clone, PartialEq)]
pub struct BaroFilterConfig {
    /// EMA weight applied to each new altitude sample.
    pub altitude_alpha: f64,
    /// EMA weight applied to each new vertical speed value.
    pub vsi_alpha: f64,
    /// Vertical speeds below this magnitude (ft/min) are treated as zero.
    pub deadband_fpm: f64,
    /// Blend weight per GPS altitude sample when re-anchoring sea level.
    pub sea_level_blend: f64,
    /// Initial sea-level reference pressure.
    pub sea_level_hpa: f64,
}

impl BaroFilterConfig {
    pub const DEFAULT_ALTITUDE_ALPHA: f64 = 0.04;
    pub const DEFAULT_VSI_ALPHA: f64 = 0.08;
    pub const DEFAULT_DEADBAND_FPM: f64 = 30.0;
    pub const DEFAULT_SEA_LEVEL_BLEND: f64 = 0.02;
}

impl Default for BaroFilterConfig {
    fn default() -> Self {
        Self {
            altitude_alpha: Self::DEFAULT_ALTITUDE_ALPHA,
            vsi_alpha: Self::DEFAULT_VSI_ALPHA,
            deadband_fpm: Self::DEFAULT_DEADBAND_FPM,
            sea_level_blend: Self::DEFAULT_SEA_LEVEL_BLEND,
            sea_level_hpa: STANDARD_SEA_LEVEL_HPA,
        }
    }
}

/// Output of one pressure sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaroReading {
    pub pressure_hpa: f64,
    /// Smoothed barometric altitude in meters.
    pub altitude_m: f64,
    /// Smoothed vertical speed; `None` until a second sample arrives.
    pub vsi_fpm: Option<f64>,
}

/// Smoothed altitude / VSI filter over a pressure stream.
#[derive(Debug, Clone)]
pub struct BarometricVerticalSpeedFilter {
    config: BaroFilterConfig,
    sea_level_hpa: f64,
    last_pressure_hpa: Option<f64>,
    smoothed_altitude_m: Option<f64>,
    /// Time and smoothed altitude of the previous sample.
    previous: Option<(u64, f64)>,
    vsi_fpm: Option<f64>,
}

impl Default for BarometricVerticalSpeedFilter {
    fn default() -> Self {
        Self::new(BaroFilterConfig::default())
    }
}

impl BarometricVerticalSpeedFilter {
    pub fn new(config: BaroFilterConfig) -> Self {
        Self {
            sea_level_hpa: config.sea_level_hpa,
            config,
            last_pressure_hpa: None,
            smoothed_altitude_m: None,
            previous: None,
            vsi_fpm: None,
        }
    }

    pub fn config(&self) -> &BaroFilterConfig {
        &self.config
    }

    /// Current sea-level reference pressure.
    pub fn sea_level_hpa(&self) -> f64 {
        self.sea_level_hpa
    }

    pub fn altitude_m(&self) -> Option<f64> {
        self.smoothed_altitude_m
    }

    pub fn vsi_fpm(&self) -> Option<f64> {
        self.vsi_fpm
    }

    /// Process a pressure sample.
    ///
    /// Returns `None` for non-finite or non-positive pressures, which are
    /// dropped without touching filter state.
    pub fn update(&mut self, sample: PressureSample) -> Option<BaroReading> {
        let pressure = sample.pressure_hpa;
        if !pressure.is_finite() || pressure <= 0.0 {
            tracing::debug!(pressure, "Dropping invalid pressure sample");
            return None;
        }
        self.last_pressure_hpa = Some(pressure);

        let raw_altitude = pressure_altitude_m(pressure, self.sea_level_hpa);
        let altitude = match self.smoothed_altitude_m {
            None => raw_altitude,
            Some(prev) => prev + self.config.altitude_alpha * (raw_altitude - prev),
        };
        self.smoothed_altitude_m = Some(altitude);

        if let Some((last_ms, last_altitude)) = self.previous {
            let dt_ms = sample.timestamp_ms.saturating_sub(last_ms).max(MIN_DT_MS);
            let dt_s = dt_ms as f64 / 1000.0;
            let raw_vsi = (altitude - last_altitude) / dt_s * MPS_TO_FPM;
            let gated = if raw_vsi.abs() < self.config.deadband_fpm {
                0.0
            } else {
                raw_vsi
            };
            self.vsi_fpm = Some(match self.vsi_fpm {
                None => gated,
                Some(prev) => prev + self.config.vsi_alpha * (gated - prev),
            });
        }
        self.previous = Some((sample.timestamp_ms, altitude));

        Some(BaroReading {
            pressure_hpa: pressure,
            altitude_m: altitude,
            vsi_fpm: self.vsi_fpm,
        })
    }

    /// Nudge the sea-level reference toward agreement with a GPS altitude.
    ///
    /// Ignored until at least one pressure sample has been seen. Returns the
    /// updated reference when it moved.
    pub fn observe_gps_altitude(&mut self, gps_altitude_m: f64) -> Option<f64> {
        let pressure = self.last_pressure_hpa?;
        if !gps_altitude_m.is_finite() {
            return None;
        }

        let target = sea_level_for_altitude(pressure, gps_altitude_m);
        if !target.is_finite() {
            return None;
        }
        self.sea_level_hpa += self.config.sea_level_blend * (target - self.sea_level_hpa);

        tracing::debug!(
            gps_altitude_m,
            target_hpa = target,
            sea_level_hpa = self.sea_level_hpa,
            "Re-anchored barometric sea-level reference"
        );
        Some(self.sea_level_hpa)
    }

    /// Forget all history, keeping the current sea-level reference.
    pub fn reset(&mut self) {
        self.last_pressure_hpa = None;
        self.smoothed_altitude_m = None;
        self.previous = None;
        self.vsi_fpm = None;
    }
}
