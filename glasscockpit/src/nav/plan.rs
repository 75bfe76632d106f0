//! Direct-To flight plan and navigation source.

use std::fmt;

/// A named point. Immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct Waypoint {
    pub ident: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Waypoint {
    pub fn new(
        ident: impl Into<String>,
        name: impl Into<String>,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            ident: ident.into(),
            name: name.into(),
            latitude,
            longitude,
        }
    }

    /// Synthetic waypoint at the aircraft's present position.
    pub fn present_position(latitude: f64, longitude: f64) -> Self {
        Self::new("PPOS", "Present position", latitude, longitude)
    }

    pub fn position(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }
}

/// Which source drives the HSI course and CDI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavSource {
    /// Course is pilot-selected; CDI shows course vs. track.
    #[default]
    Heading,
    /// Course is locked to the active Direct-To leg; CDI shows cross-track error.
    Gps,
}

impl fmt::Display for NavSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Heading => write!(f, "HDG"),
            Self::Gps => write!(f, "GPS"),
        }
    }
}

/// Two-point Direct-To plan.
///
/// `from` and `to` are chosen independently by the pilot. Activation copies
/// the aircraft's present position into `active_origin`; the active leg is
/// flown from that snapshot, so later edits to `from` do not move it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DirectToPlan {
    pub from: Option<Waypoint>,
    pub to: Option<Waypoint>,
    active_origin: Option<Waypoint>,
}

impl DirectToPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active_origin.is_some()
    }

    /// Both endpoints selected.
    pub fn is_complete(&self) -> bool {
        self.from.is_some() && self.to.is_some()
    }

    /// Origin of the active leg (present position at activation).
    pub fn active_origin(&self) -> Option<&Waypoint> {
        self.active_origin.as_ref()
    }

    /// The active leg as (origin, destination), if active.
    pub fn active_leg(&self) -> Option<(&Waypoint, &Waypoint)> {
        match (&self.active_origin, &self.to) {
            (Some(origin), Some(to)) => Some((origin, to)),
            _ => None,
        }
    }

    pub fn set_from(&mut self, waypoint: Option<Waypoint>) {
        self.from = waypoint;
    }

    /// Change the destination. An active leg to the old destination no
    /// longer exists, so the plan is deactivated.
    pub fn set_to(&mut self, waypoint: Option<Waypoint>) {
        if self.to != waypoint {
            self.active_origin = None;
        }
        self.to = waypoint;
    }

    /// Activate with the given present position.
    ///
    /// Returns `false` (and leaves the plan untouched) unless both endpoints
    /// are selected.
    pub fn activate(&mut self, present_latitude: f64, present_longitude: f64) -> bool {
        if !self.is_complete() {
            return false;
        }
        self.active_origin = Some(Waypoint::present_position(
            present_latitude,
            present_longitude,
        ));
        true
    }

    pub fn deactivate(&mut self) {
        self.active_origin = None;
    }

    /// Discard everything.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
