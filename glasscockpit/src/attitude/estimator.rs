//! Pitch/roll estimation from a fused device rotation matrix.
//!
//! # Frames
//!
//! The sensor delivers `R`, mapping device axes (X right, Y up the screen,
//! Z out of the screen) into a world frame whose Z axis points up. Before
//! angles are extracted the matrix is remapped into the cockpit reference
//! frame `R' = R · M`, where the columns of `M` give the device-frame
//! direction of the lateral, longitudinal and vertical reference axes:
//!
//! | Mount   | lateral | longitudinal | vertical |
//! |---------|---------|--------------|----------|
//! | FLAT    | +X      | +Y           | +Z       |
//! | UPRIGHT | −X      | −Z           | +Y       |
//!
//! The UPRIGHT remap mirrors the lateral axis, so the extracted roll component
//! comes out with the opposite sense and is negated once more after
//! extraction. Pitch is always the negated extracted pitch component.

use super::matrix::Mat3;
use super::mount::MountStyle;

/// Aircraft attitude in degrees.
///
/// Pitch is positive nose-up, roll is positive right-wing-down.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Attitude {
    pub pitch_deg: f64,
    pub roll_deg: f64,
}

/// Raw angle components read off a remapped rotation matrix, before the
/// mount-specific sign conventions are applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtractedAngles {
    pub pitch_deg: f64,
    pub roll_deg: f64,
}

/// One-shot calibration state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CalibrationState {
    /// No capture requested.
    #[default]
    Idle,
    /// The next orientation sample becomes the zero reference.
    Pending,
}

/// Converts rotation matrices into pitch/roll for the current mount style.
#[derive(Debug, Clone, Default)]
pub struct AttitudeEstimator {
    style: MountStyle,
    /// Inverse of the remapped matrix captured at calibration time.
    calibration: Option<Mat3>,
    state: CalibrationState,
}

impl AttitudeEstimator {
    pub fn new(style: MountStyle) -> Self {
        Self {
            style,
            calibration: None,
            state: CalibrationState::Idle,
        }
    }

    pub fn style(&self) -> MountStyle {
        self.style
    }

    /// Switch mount style.
    ///
    /// Any active calibration is dropped because it was captured in the old
    /// remap basis. Returns `true` if the style actually changed.
    pub fn set_style(&mut self, style: MountStyle) -> bool {
        if style == self.style {
            return false;
        }
        tracing::info!(from = %self.style, to = %style, "Mount style changed");
        self.style = style;
        if self.calibration.take().is_some() {
            tracing::info!("Attitude calibration cleared after mount change");
        }
        true
    }

    /// Arm a one-shot capture: the next sample passed to [`update`](Self::update)
    /// becomes the new pitch/roll zero.
    pub fn request_calibration(&mut self) {
        self.state = CalibrationState::Pending;
    }

    pub fn calibration_state(&self) -> CalibrationState {
        self.state
    }

    pub fn is_calibrated(&self) -> bool {
        self.calibration.is_some()
    }

    pub fn clear_calibration(&mut self) {
        self.calibration = None;
        self.state = CalibrationState::Idle;
    }

    /// The remap matrix `M` for a mount style.
    pub fn remap_basis(style: MountStyle) -> Mat3 {
        match style {
            MountStyle::Flat => Mat3::IDENTITY,
            MountStyle::Upright => {
                Mat3::from_columns([-1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0])
            }
        }
    }

    /// Remap a device rotation matrix into the cockpit reference frame.
    pub fn remap(rotation: &Mat3, style: MountStyle) -> Mat3 {
        *rotation * Self::remap_basis(style)
    }

    /// Read the pitch and roll components off a (remapped) matrix.
    pub fn extract(r: &Mat3) -> ExtractedAngles {
        let pitch = (-r.get(2, 1)).clamp(-1.0, 1.0).asin();
        let roll = (-r.get(2, 0)).atan2(r.get(2, 2));
        ExtractedAngles {
            pitch_deg: pitch.to_degrees(),
            roll_deg: roll.to_degrees(),
        }
    }

    /// Apply the sign conventions for a mount style to extracted angles.
    pub fn attitude_from(angles: ExtractedAngles, style: MountStyle) -> Attitude {
        let roll_deg = match style {
            MountStyle::Flat => angles.roll_deg,
            MountStyle::Upright => -angles.roll_deg,
        };
        Attitude {
            pitch_deg: -angles.pitch_deg,
            roll_deg,
        }
    }

    /// Process one orientation sample.
    ///
    /// If a calibration was requested it is captured from this very sample
    /// before the attitude is computed, so the returned attitude is the zero
    /// reference itself.
    pub fn update(&mut self, rotation: &Mat3) -> Attitude {
        let remapped = Self::remap(rotation, self.style);

        if self.state == CalibrationState::Pending {
            self.state = CalibrationState::Idle;
            match remapped.inverse() {
                Some(inverse) => {
                    self.calibration = Some(inverse);
                    tracing::info!(style = %self.style, "Attitude calibration captured");
                }
                None => {
                    tracing::warn!("Calibration sample is singular, keeping previous reference");
                }
            }
        }

        let relative = match &self.calibration {
            Some(inverse) => *inverse * remapped,
            None => remapped,
        };

        Self::attitude_from(Self::extract(&relative), self.style)
    }
}
