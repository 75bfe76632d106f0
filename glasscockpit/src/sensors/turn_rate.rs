//! Turn rate from the gyroscope.

use crate::attitude::MountStyle;

use super::samples::GyroSample;

/// Turn rate output, degrees per second, positive turning right.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TurnRate {
    /// Unfiltered rate about the aircraft yaw axis.
    pub raw_dps: f64,
    /// EMA-smoothed rate for display.
    pub smoothed_dps: f64,
}

/// Picks the yaw-axis gyro component for the mount and smooths it.
///
/// FLAT mounts yaw about the device Z axis, UPRIGHT mounts about device X.
#[derive(Debug, Clone)]
pub struct TurnRateResolver {
    smoothing: f64,
    smoothed_dps: f64,
}

impl Default for TurnRateResolver {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SMOOTHING)
    }
}

impl TurnRateResolver {
    /// Weight given to each new sample.
    pub const DEFAULT_SMOOTHING: f64 = 0.15;

    pub fn new(smoothing: f64) -> Self {
        Self {
            smoothing: smoothing.clamp(0.0, 1.0),
            smoothed_dps: 0.0,
        }
    }

    /// Yaw rate in deg/s for a single gyro reading, no smoothing.
    pub fn resolve(rate_rad_s: [f64; 3], style: MountStyle) -> f64 {
        let axis = match style {
            MountStyle::Flat => rate_rad_s[2],
            MountStyle::Upright => rate_rad_s[0],
        };
        axis.to_degrees()
    }

    /// Feed a gyro sample; returns raw and smoothed turn rate.
    ///
    /// Non-finite readings leave the smoothed value untouched.
    pub fn update(&mut self, sample: &GyroSample, style: MountStyle) -> Option<TurnRate> {
        let raw = Self::resolve(sample.rate_rad_s, style);
        if !raw.is_finite() {
            return None;
        }
        self.smoothed_dps = self.smoothed_dps * (1.0 - self.smoothing) + raw * self.smoothing;
        Some(TurnRate {
            raw_dps: raw,
            smoothed_dps: self.smoothed_dps,
        })
    }

    pub fn smoothed_dps(&self) -> f64 {
        self.smoothed_dps
    }

    pub fn reset(&mut self) {
        self.smoothed_dps = 0.0;
    }
}
