//! Direct-To guidance: course, CDI, distance-to-go and ETA.
//!
//! Guidance never fails. Inputs that are not available yet (no fix, no
//! track, speed below the ETA floor) degrade the affected output to `None`.

use crate::aircraft::AircraftState;

use super::great_circle::{
    bearing_deg, cdi_dots_from_course_error, cdi_dots_from_xte, cross_track_error_nm,
    distance_nm, wrap360, DEFAULT_CDI_FULL_SCALE_NM,
};
use super::plan::NavSource;

/// Placeholder shown in place of an unavailable value.
pub const UNAVAILABLE_MARKER: &str = "—";

/// Ground speeds below this (knots) give no ETA.
pub const DEFAULT_ETA_MIN_SPEED_KT: f64 = 5.0;

/// Format time-to-go as `HH:MM`.
///
/// Returns `None` when speed is unknown or below [`DEFAULT_ETA_MIN_SPEED_KT`].
///
/// # Example
///
/// ```
/// use glasscockpit::nav::format_eta;
///
/// assert_eq!(format_eta(0.0, Some(100.0)).as_deref(), Some("00:00"));
/// assert_eq!(format_eta(100.0, Some(4.0)), None);
/// ```
pub fn format_eta(distance_nm: f64, speed_kt: Option<f64>) -> Option<String> {
    format_eta_with_floor(distance_nm, speed_kt, DEFAULT_ETA_MIN_SPEED_KT)
}

/// [`format_eta`] with an explicit speed floor.
pub fn format_eta_with_floor(
    distance_nm: f64,
    speed_kt: Option<f64>,
    min_speed_kt: f64,
) -> Option<String> {
    let speed = speed_kt.filter(|s| s.is_finite() && *s >= min_speed_kt)?;
    if !distance_nm.is_finite() {
        return None;
    }
    let minutes = ((distance_nm / speed) * 60.0).round().max(0.0) as u64;
    Some(format!("{:02}:{:02}", minutes / 60, minutes % 60))
}

/// Tuning for [`DirectToGuidance`].
#[derive(Debug, Clone, PartialEq)]
pub struct GuidanceConfig {
    /// Cross-track error that deflects the CDI fully.
    pub cdi_full_scale_nm: f64,
    pub eta_min_speed_kt: f64,
}

impl Default for GuidanceConfig {
    fn default() -> Self {
        Self {
            cdi_full_scale_nm: DEFAULT_CDI_FULL_SCALE_NM,
            eta_min_speed_kt: DEFAULT_ETA_MIN_SPEED_KT,
        }
    }
}

/// Output for the HSI.
#[derive(Debug, Clone, PartialEq)]
pub struct GuidanceOutput {
    /// Mode actually in effect. GPS only when the plan is active and a
    /// position is known.
    pub mode: NavSource,
    /// Course pointer, degrees [0, 360).
    pub course_deg: f64,
    /// CDI deflection in dots, ±5.
    pub cdi_dots: Option<f64>,
    pub cross_track_nm: Option<f64>,
    pub distance_to_go_nm: Option<f64>,
    pub eta: Option<String>,
}

impl GuidanceOutput {
    /// ETA text, or [`UNAVAILABLE_MARKER`].
    pub fn eta_text(&self) -> &str {
        self.eta.as_deref().unwrap_or(UNAVAILABLE_MARKER)
    }
}

/// Computes HSI guidance from an aircraft state snapshot.
#[derive(Debug, Clone, Default)]
pub struct DirectToGuidance {
    config: GuidanceConfig,
}

impl DirectToGuidance {
    pub fn new(config: GuidanceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GuidanceConfig {
        &self.config
    }

    /// Active leg course for a state, if GPS guidance applies.
    pub fn leg_course(state: &AircraftState) -> Option<f64> {
        if state.nav_source != NavSource::Gps {
            return None;
        }
        state.position?;
        let (origin, to) = state.plan.active_leg()?;
        Some(bearing_deg(
            origin.latitude,
            origin.longitude,
            to.latitude,
            to.longitude,
        ))
    }

    pub fn compute(&self, state: &AircraftState) -> GuidanceOutput {
        let gps_leg = match (state.nav_source, state.position, state.plan.active_leg()) {
            (NavSource::Gps, Some(position), Some((origin, to))) => {
                Some((position, origin.position(), to.position()))
            }
            _ => None,
        };

        match gps_leg {
            Some((position, origin, to)) => {
                let current = position.as_tuple();
                let course = bearing_deg(origin.0, origin.1, to.0, to.1);
                let xte = cross_track_error_nm(current, origin, to);
                let distance = distance_nm(current.0, current.1, to.0, to.1);
                let eta = format_eta_with_floor(
                    distance,
                    state.ground_speed_kt(),
                    self.config.eta_min_speed_kt,
                );

                GuidanceOutput {
                    mode: NavSource::Gps,
                    course_deg: wrap360(course),
                    cdi_dots: Some(cdi_dots_from_xte(xte, self.config.cdi_full_scale_nm)),
                    cross_track_nm: Some(xte),
                    distance_to_go_nm: Some(distance),
                    eta,
                }
            }
            None => {
                let course = wrap360(state.selected_course_deg);
                GuidanceOutput {
                    mode: NavSource::Heading,
                    course_deg: course,
                    cdi_dots: state
                        .track_deg
                        .map(|track| cdi_dots_from_course_error(course, track)),
                    cross_track_nm: None,
                    distance_to_go_nm: None,
                    eta: None,
                }
            }
        }
    }
}
