//! Attitude (pitch/roll) estimation.
//!
//! Turns a fused device rotation matrix into aircraft pitch and roll,
//! accounting for how the device sits in its cradle.
//!
//! # Components
//!
//! - [`matrix`] - `Mat3`, the fixed 3×3 matrix value type
//! - [`mount`] - `MountMode` (user setting), `MountStyle` (resolved) and the
//!   gravity-based `MountDetector`
//! - [`estimator`] - `AttitudeEstimator` with remap, angle extraction and the
//!   one-shot "zero here" calibration
//!
//! # Usage
//!
//! ```ignore
//! use glasscockpit::attitude::{AttitudeEstimator, Mat3, MountStyle};
//!
//! let mut estimator = AttitudeEstimator::new(MountStyle::Flat);
//! estimator.request_calibration();
//! let attitude = estimator.update(&Mat3::from_row_major(sample));
//! println!("pitch {:.1} roll {:.1}", attitude.pitch_deg, attitude.roll_deg);
//! ```

pub mod estimator;
pub mod matrix;
pub mod mount;

pub use estimator::{Attitude, AttitudeEstimator, CalibrationState, ExtractedAngles};
pub use matrix::{Mat3, SINGULAR_EPSILON};
pub use mount::{MountDetector, MountMode, MountStyle};
