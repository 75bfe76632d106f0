//! Shared aircraft state store.
//!
//! The current [`AircraftState`] is published as an immutable
//! `Arc<AircraftState>` on a `tokio::sync::watch` channel. Writers go through
//! [`AircraftStateStore::update`], which clones the current snapshot, applies
//! the change and publishes the result in one step. Readers take a snapshot
//! or subscribe for change notification and never block writers.
//!
//! # Usage
//!
//! ```ignore
//! let store = AircraftStateStore::new();
//!
//! // Producer side
//! store.update(|s| s.pressure_hpa = Some(1012.0));
//!
//! // Consumer side
//! let snapshot = store.snapshot();
//! let mut rx = store.subscribe();
//! while rx.changed().await.is_ok() {
//!     let state = rx.borrow_and_update().clone();
//!     // render
//! }
//! ```

use std::sync::{Arc, Mutex};

use tokio::sync::watch;

use super::state::{AircraftState, CalibrationStatus};
use crate::attitude::MountMode;
use crate::nav::{bearing_deg, wrap360, NavSource, Waypoint};

/// Thread-safe handle to the shared aircraft state.
///
/// Cloning is cheap; all clones publish to the same channel.
#[derive(Clone)]
pub struct AircraftStateStore {
    tx: Arc<watch::Sender<Arc<AircraftState>>>,
    write_lock: Arc<Mutex<()>>,
}

impl Default for AircraftStateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AircraftStateStore {
    pub fn new() -> Self {
        Self::with_state(AircraftState::default())
    }

    pub fn with_state(initial: AircraftState) -> Self {
        let (tx, _rx) = watch::channel(Arc::new(initial));
        Self {
            tx: Arc::new(tx),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> Arc<AircraftState> {
        self.tx.borrow().clone()
    }

    /// Receiver notified on every published change.
    pub fn subscribe(&self) -> watch::Receiver<Arc<AircraftState>> {
        self.tx.subscribe()
    }

    /// Apply `f` to a copy of the current state and publish the result.
    ///
    /// Concurrent updates are serialized by the write lock; each sees the
    /// result of the previous one. Readers are never blocked while `f` runs.
    pub fn update<R>(&self, f: impl FnOnce(&mut AircraftState) -> R) -> R {
        let _writer = self
            .write_lock
            .lock()
            .expect("aircraft state write lock poisoned");
        let mut next = AircraftState::clone(&self.tx.borrow());
        let result = f(&mut next);
        self.tx.send_replace(Arc::new(next));
        result
    }

    // =========================================================================
    // User actions
    // =========================================================================

    /// Select AUTO/FLAT/UPRIGHT mounting.
    ///
    /// A forced mode applies its style immediately. If that changes the style,
    /// any active attitude calibration is dropped.
    pub fn set_mount_mode(&self, mode: MountMode) {
        self.update(|s| {
            s.mount_mode = mode;
            if let Some(style) = mode.forced_style() {
                if s.change_mount_style(style) {
                    tracing::info!(%mode, %style, "Mount style forced");
                }
            }
        });
    }

    /// Zero pitch/roll at the orientation of the next attitude sample.
    pub fn request_calibration(&self) {
        self.update(|s| s.calibration = CalibrationStatus::Pending);
        tracing::info!("Attitude calibration requested");
    }

    pub fn set_from(&self, waypoint: Option<Waypoint>) {
        self.update(|s| s.plan.set_from(waypoint));
    }

    /// Set the destination. Changing it deactivates an active leg and drops
    /// back to HEADING mode.
    pub fn set_to(&self, waypoint: Option<Waypoint>) {
        self.update(|s| {
            let was_active = s.plan.is_active();
            s.plan.set_to(waypoint);
            if was_active && !s.plan.is_active() {
                s.nav_source = NavSource::Heading;
                tracing::info!("Direct-To deactivated by destination change");
            }
        });
    }

    /// Engage GPS Direct-To.
    ///
    /// Requires both endpoints and a present position. The leg origin is
    /// snapshotted at the present position and the course pointer is loaded
    /// with the leg course. Returns `false` if the preconditions are not met.
    pub fn activate_gps(&self) -> bool {
        self.update(|s| {
            let Some(position) = s.position else {
                tracing::debug!("Direct-To not activated: no position");
                return false;
            };
            if !s.plan.activate(position.latitude, position.longitude) {
                tracing::debug!("Direct-To not activated: plan incomplete");
                return false;
            }
            s.nav_source = NavSource::Gps;
            if let Some((origin, to)) = s.plan.active_leg() {
                s.selected_course_deg = wrap360(bearing_deg(
                    origin.latitude,
                    origin.longitude,
                    to.latitude,
                    to.longitude,
                ));
                tracing::info!(
                    to = %to.ident,
                    latitude = position.latitude,
                    longitude = position.longitude,
                    course = s.selected_course_deg,
                    "Direct-To activated"
                );
            }
            true
        })
    }

    /// Return to HEADING mode, deactivating the plan but keeping its
    /// waypoints.
    pub fn use_heading(&self) {
        self.update(|s| {
            if s.nav_source == NavSource::Gps {
                tracing::info!("Switched to heading mode");
            }
            s.nav_source = NavSource::Heading;
            s.plan.deactivate();
        });
    }

    /// Discard the plan and return to HEADING mode.
    pub fn clear_plan(&self) {
        self.update(|s| {
            s.plan.clear();
            s.nav_source = NavSource::Heading;
        });
        tracing::info!("Direct-To plan cleared");
    }

    /// Set the HEADING-mode course. Ignored in GPS mode, where the course is
    /// locked to the leg. Returns whether the course was applied.
    pub fn set_selected_course(&self, course_deg: f64) -> bool {
        if !course_deg.is_finite() {
            return false;
        }
        self.update(|s| {
            if s.nav_source != NavSource::Heading {
                return false;
            }
            s.selected_course_deg = wrap360(course_deg);
            true
        })
    }

    /// Nudge the HEADING-mode course by `delta_deg`, wrapping to [0, 360).
    pub fn adjust_selected_course(&self, delta_deg: f64) -> bool {
        if !delta_deg.is_finite() {
            return false;
        }
        self.update(|s| {
            if s.nav_source != NavSource::Heading {
                return false;
            }
            s.selected_course_deg = wrap360(s.selected_course_deg + delta_deg);
            true
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aircraft::GeoPoint;
    use crate::attitude::MountStyle;

    fn make_store_with_position(lat: f64, lon: f64) -> AircraftStateStore {
        let store = AircraftStateStore::new();
        store.update(|s| s.position = Some(GeoPoint::new(lat, lon)));
        store
    }

    fn make_plan(store: &AircraftStateStore) {
        store.set_from(Some(Waypoint::new("A", "Alpha", 13.0, 80.0)));
        store.set_to(Some(Waypoint::new("B", "Bravo", 13.1, 80.1)));
    }

    #[test]
    fn test_update_publishes_new_snapshot() {
        let store = AircraftStateStore::new();
        let before = store.snapshot();

        store.update(|s| s.pressure_hpa = Some(1000.0));

        let after = store.snapshot();
        assert_eq!(before.pressure_hpa, None);
        assert_eq!(after.pressure_hpa, Some(1000.0));
        assert!(!Arc::ptr_eq(&before, &after));
    }

    #[test]
    fn test_update_returns_closure_result() {
        let store = AircraftStateStore::new();
        let value = store.update(|s| {
            s.turn_rate_dps = Some(3.0);
            42
        });
        assert_eq!(value, 42);
    }

    #[test]
    fn test_snapshot_readable_during_update() {
        let store = AircraftStateStore::new();
        store.update(|s| s.track_deg = Some(10.0));

        let seen = store.update(|s| {
            s.track_deg = Some(20.0);
            // Readers still see the last published state
            store.snapshot().track_deg
        });
        assert_eq!(seen, Some(10.0));
        assert_eq!(store.snapshot().track_deg, Some(20.0));
    }

    #[test]
    fn test_subscriber_sees_change() {
        let store = AircraftStateStore::new();
        let mut rx = store.subscribe();
        assert!(!rx.has_changed().unwrap());

        store.update(|s| s.satellites_used = Some(7));

        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().satellites_used, Some(7));
    }

    #[test]
    fn test_clones_share_state() {
        let store = AircraftStateStore::new();
        let clone = store.clone();
        clone.update(|s| s.track_deg = Some(123.0));
        assert_eq!(store.snapshot().track_deg, Some(123.0));
    }

    #[test]
    fn test_concurrent_updates_are_not_lost() {
        let store = AircraftStateStore::new();
        store.update(|s| s.satellites_in_view = Some(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        store.update(|s| {
                            s.satellites_in_view = s.satellites_in_view.map(|n| n + 1)
                        });
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.snapshot().satellites_in_view, Some(800));
    }

    #[test]
    fn test_forced_mount_mode_sets_style_and_clears_calibration() {
        let store = AircraftStateStore::new();
        store.update(|s| s.calibration = CalibrationStatus::Calibrated);

        store.set_mount_mode(MountMode::Flat);
        assert_eq!(store.snapshot().calibration, CalibrationStatus::Calibrated);

        store.set_mount_mode(MountMode::Upright);
        let state = store.snapshot();
        assert_eq!(state.mount_mode, MountMode::Upright);
        assert_eq!(state.mount_style, MountStyle::Upright);
        assert_eq!(state.calibration, CalibrationStatus::Uncalibrated);

        // Back to auto keeps the current style until gravity says otherwise
        store.set_mount_mode(MountMode::Auto);
        assert_eq!(store.snapshot().mount_style, MountStyle::Upright);
    }

    #[test]
    fn test_request_calibration_marks_pending() {
        let store = AircraftStateStore::new();
        store.request_calibration();
        assert_eq!(store.snapshot().calibration, CalibrationStatus::Pending);
    }

    #[test]
    fn test_activate_gps_requires_position() {
        let store = AircraftStateStore::new();
        make_plan(&store);
        assert!(!store.activate_gps());
        assert_eq!(store.snapshot().nav_source, NavSource::Heading);
    }

    #[test]
    fn test_activate_gps_requires_both_endpoints() {
        let store = make_store_with_position(13.0, 80.0);
        store.set_to(Some(Waypoint::new("B", "Bravo", 13.1, 80.1)));
        assert!(!store.activate_gps());
        assert!(!store.snapshot().plan.is_active());
    }

    #[test]
    fn test_activate_gps_snapshots_origin_and_loads_course() {
        let store = make_store_with_position(13.05, 80.05);
        make_plan(&store);

        assert!(store.activate_gps());
        let state = store.snapshot();
        assert_eq!(state.nav_source, NavSource::Gps);
        assert!(state.plan.is_active());

        let origin = state.plan.active_origin().unwrap();
        assert_eq!(origin.position(), (13.05, 80.05));

        let expected = bearing_deg(13.05, 80.05, 13.1, 80.1);
        assert!((state.selected_course_deg - expected).abs() < 1e-9);

        // Moving the aircraft or editing `from` does not move the origin
        store.update(|s| s.position = Some(GeoPoint::new(13.07, 80.07)));
        store.set_from(Some(Waypoint::new("C", "Charlie", 12.0, 79.0)));
        let state = store.snapshot();
        assert_eq!(state.plan.active_origin().unwrap().position(), (13.05, 80.05));
    }

    #[test]
    fn test_course_locked_in_gps_mode() {
        let store = make_store_with_position(13.0, 80.0);
        make_plan(&store);
        store.activate_gps();
        let locked = store.snapshot().selected_course_deg;

        assert!(!store.set_selected_course(10.0));
        assert!(!store.adjust_selected_course(1.0));
        assert_eq!(store.snapshot().selected_course_deg, locked);
    }

    #[test]
    fn test_use_heading_deactivates_but_keeps_waypoints() {
        let store = make_store_with_position(13.0, 80.0);
        make_plan(&store);
        store.activate_gps();

        store.use_heading();
        let state = store.snapshot();
        assert_eq!(state.nav_source, NavSource::Heading);
        assert!(!state.plan.is_active());
        assert!(state.plan.is_complete());
        assert!(store.adjust_selected_course(1.0));
    }

    #[test]
    fn test_clear_plan_resets_everything() {
        let store = make_store_with_position(13.0, 80.0);
        make_plan(&store);
        store.activate_gps();

        store.clear_plan();
        let state = store.snapshot();
        assert_eq!(state.nav_source, NavSource::Heading);
        assert!(state.plan.from.is_none());
        assert!(state.plan.to.is_none());
        assert!(!state.plan.is_active());
    }

    #[test]
    fn test_new_destination_returns_to_heading() {
        let store = make_store_with_position(13.0, 80.0);
        make_plan(&store);
        store.activate_gps();

        store.set_to(Some(Waypoint::new("D", "Delta", 14.0, 81.0)));
        let state = store.snapshot();
        assert_eq!(state.nav_source, NavSource::Heading);
        assert!(!state.plan.is_active());
    }

    #[test]
    fn test_adjust_course_wraps() {
        let store = AircraftStateStore::new();
        assert!(store.set_selected_course(359.0));
        assert!(store.adjust_selected_course(2.0));
        assert_eq!(store.snapshot().selected_course_deg, 1.0);

        assert!(store.adjust_selected_course(-2.0));
        assert_eq!(store.snapshot().selected_course_deg, 359.0);

        assert!(store.set_selected_course(-90.0));
        assert_eq!(store.snapshot().selected_course_deg, 270.0);
        assert!(!store.set_selected_course(f64::NAN));
    }
}
