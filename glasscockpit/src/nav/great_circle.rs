//! Great-circle navigation math.
//!
//! Spherical-earth formulas for bearing, distance and cross-track error,
//! plus the CDI scaling used by the HSI. Everything here is a pure function.
//!
//! # Coordinate System
//!
//! - Latitude: degrees north (-90 to 90)
//! - Longitude: degrees east (-180 to 180)
//! - Bearing: degrees true (0-360, 0=north, 90=east)
//! - Distance: nautical miles
//!
//! All formulas work on longitude differences, so legs across the
//! antimeridian need no special handling.

/// Earth's radius in nautical miles.
pub const EARTH_RADIUS_NM: f64 = 3440.065;

/// Full CDI deflection in dots, either side.
pub const CDI_MAX_DOTS: f64 = 5.0;

/// Default cross-track error that deflects the CDI fully.
pub const DEFAULT_CDI_FULL_SCALE_NM: f64 = 2.0;

/// Normalize an angle to [-180, 180).
pub fn wrap180(deg: f64) -> f64 {
    (deg + 180.0).rem_euclid(360.0) - 180.0
}

/// Normalize an angle to [0, 360).
pub fn wrap360(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Initial great-circle bearing from point 1 to point 2, degrees [0, 360).
///
/// Identical points yield 0.
///
/// # Example
///
/// ```
/// use glasscockpit::nav::bearing_deg;
///
/// let bearing = bearing_deg(0.0, 0.0, 0.0, 1.0);
/// assert!((bearing - 90.0).abs() < 1e-9);
/// ```
pub fn bearing_deg(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let delta_lambda = (lon2 - lon1).to_radians();

    let y = delta_lambda.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * delta_lambda.cos();

    wrap360(y.atan2(x).to_degrees())
}

/// Central angle between two points in radians (haversine).
fn angular_distance_rad(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let delta_phi = (lat2 - lat1).to_radians();
    let delta_lambda = (lon2 - lon1).to_radians();

    let a = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    let a = a.clamp(0.0, 1.0);
    2.0 * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Great-circle distance in nautical miles (haversine).
///
/// # Example
///
/// ```
/// use glasscockpit::nav::distance_nm;
///
/// // 1 degree of latitude is ~60nm
/// let dist = distance_nm(0.0, 0.0, 1.0, 0.0);
/// assert!((dist - 60.0).abs() < 0.1);
/// ```
pub fn distance_nm(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    EARTH_RADIUS_NM * angular_distance_rad(lat1, lon1, lat2, lon2)
}

/// Signed cross-track error in nautical miles of `current` from the great
/// circle `from → to`.
///
/// Positive means the aircraft is right of the desired track.
pub fn cross_track_error_nm(current: (f64, f64), from: (f64, f64), to: (f64, f64)) -> f64 {
    let d13 = angular_distance_rad(from.0, from.1, current.0, current.1);
    let theta13 = bearing_deg(from.0, from.1, current.0, current.1).to_radians();
    let theta12 = bearing_deg(from.0, from.1, to.0, to.1).to_radians();

    let s = (d13.sin() * (theta13 - theta12).sin()).clamp(-1.0, 1.0);
    s.asin() * EARTH_RADIUS_NM
}

/// CDI deflection in dots from cross-track error.
///
/// The needle points toward the course line, so the sign is inverted: an
/// aircraft left of course (negative XTE) deflects the needle right
/// (positive dots). `full_scale_nm` maps to 5 dots; the result is clamped to
/// ±5. A non-positive full scale yields a centred needle.
pub fn cdi_dots_from_xte(xte_nm: f64, full_scale_nm: f64) -> f64 {
    if full_scale_nm.is_nan() || full_scale_nm <= 0.0 || !xte_nm.is_finite() {
        return 0.0;
    }
    (-(xte_nm / full_scale_nm) * CDI_MAX_DOTS).clamp(-CDI_MAX_DOTS, CDI_MAX_DOTS)
}

/// Heading-mode CDI: half a dot per degree of course/track error.
///
/// Positive means the selected course lies right of the current track.
pub fn cdi_dots_from_course_error(course_deg: f64, track_deg: f64) -> f64 {
    (wrap180(course_deg - track_deg) / 2.0).clamp(-CDI_MAX_DOTS, CDI_MAX_DOTS)
}
