//! Navigation: great-circle math, the Direct-To plan and HSI guidance.
//!
//! # Components
//!
//! - [`great_circle`] - pure bearing/distance/cross-track functions and CDI scaling
//! - [`plan`] - `Waypoint`, `DirectToPlan`, `NavSource`
//! - [`guidance`] - `DirectToGuidance` and ETA formatting

pub mod great_circle;
pub mod guidance;
pub mod plan;

pub use great_circle::{
    bearing_deg, cdi_dots_from_course_error, cdi_dots_from_xte, cross_track_error_nm,
    distance_nm, wrap180, wrap360, CDI_MAX_DOTS, DEFAULT_CDI_FULL_SCALE_NM, EARTH_RADIUS_NM,
};
pub use guidance::{
    format_eta, format_eta_with_floor, DirectToGuidance, GuidanceConfig, GuidanceOutput,
    DEFAULT_ETA_MIN_SPEED_KT, UNAVAILABLE_MARKER,
};
pub use plan::{DirectToPlan, NavSource, Waypoint};
