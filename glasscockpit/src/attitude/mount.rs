//! Device mount style and gravity-based auto-detection.

use std::fmt;
use std::str::FromStr;

/// User-selected mount configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MountMode {
    /// Pick flat or upright from the gravity vector.
    #[default]
    Auto,
    /// Force the flat (screen-up) remap.
    Flat,
    /// Force the upright (screen-facing-pilot) remap.
    Upright,
}

impl MountMode {
    /// The fixed style for a forced mode, `None` for [`MountMode::Auto`].
    pub fn forced_style(&self) -> Option<MountStyle> {
        match self {
            Self::Auto => None,
            Self::Flat => Some(MountStyle::Flat),
            Self::Upright => Some(MountStyle::Upright),
        }
    }
}

impl fmt::Display for MountMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Flat => write!(f, "flat"),
            Self::Upright => write!(f, "upright"),
        }
    }
}

impl FromStr for MountMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "flat" => Ok(Self::Flat),
            "upright" => Ok(Self::Upright),
            other => Err(format!("unknown mount mode '{}'", other)),
        }
    }
}

/// Physical orientation of the device in its cradle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MountStyle {
    /// Lying on a horizontal surface, screen up, top edge towards the nose.
    #[default]
    Flat,
    /// Standing vertically, screen facing the pilot, top edge up.
    Upright,
}

impl fmt::Display for MountStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flat => write!(f, "FLAT"),
            Self::Upright => write!(f, "UPRIGHT"),
        }
    }
}

/// Chooses a [`MountStyle`] from gravity samples while in [`MountMode::Auto`].
///
/// Gravity is reported in device axes (X right, Y up the screen, Z out of the
/// screen). Whichever of |g.y| and |g.z| dominates decides the style; an exact
/// tie keeps the current style.
#[derive(Debug, Clone, Default)]
pub struct MountDetector {
    current: Option<MountStyle>,
}

impl MountDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify a single gravity vector without touching detector state.
    pub fn classify(gravity: [f64; 3]) -> Option<MountStyle> {
        let vertical = gravity[1].abs();
        let out_of_screen = gravity[2].abs();
        if !vertical.is_finite() || !out_of_screen.is_finite() {
            return None;
        }
        if out_of_screen > vertical {
            Some(MountStyle::Flat)
        } else if vertical > out_of_screen {
            Some(MountStyle::Upright)
        } else {
            None
        }
    }

    /// Feed a gravity sample.
    ///
    /// Returns the new style when it differs from the previously detected one.
    pub fn observe(&mut self, gravity: [f64; 3]) -> Option<MountStyle> {
        let detected = Self::classify(gravity)?;
        if self.current == Some(detected) {
            return None;
        }
        self.current = Some(detected);
        Some(detected)
    }

    /// Last detected style, if any sample has been classified.
    pub fn current(&self) -> Option<MountStyle> {
        self.current
    }

    /// Forget the detected style (e.g. when leaving auto mode).
    pub fn reset(&mut self) {
        self.current = None;
    }
}
