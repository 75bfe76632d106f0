//! Integration tests for the sensor → aircraft state → guidance pipeline.
//!
//! These tests drive `SensorFusion` through fake capability sources the same
//! way a platform binding would:
//! - Source attachment (available, unavailable and missing capabilities)
//! - Barometer → altitude and vertical speed
//! - GPS → position, bogus fix filtering, Direct-To guidance
//! - Orientation → attitude and one-shot calibration
//! - Concurrent producers writing to one state store
//!
//! Run with: `cargo test --test sensor_pipeline_integration`

use std::sync::{Arc, Mutex};
use std::time::Duration;

use glasscockpit::aircraft::{AircraftStateStore, CalibrationStatus, FusionConfig, SensorFusion};
use glasscockpit::attitude::Mat3;
use glasscockpit::nav::{DirectToGuidance, GuidanceConfig, NavSource, Waypoint};
use glasscockpit::sensors::{
    GpsFix, GyroSample, GyroscopeSource, LocationSource, MagnetometerSample, MagnetometerSource,
    OrientationSource, PressureSample, PressureSource, RotationSample, SampleSink, SensorSources,
};

// ============================================================================
// Test Helpers
// ============================================================================

/// A capability that hands its sink back to the test so samples can be
/// pushed on demand.
struct FakeSource<T> {
    available: bool,
    sink: Mutex<Option<Arc<dyn SampleSink<T>>>>,
}

impl<T: 'static> FakeSource<T> {
    fn new(available: bool) -> Arc<Self> {
        Arc::new(Self {
            available,
            sink: Mutex::new(None),
        })
    }

    fn is_started(&self) -> bool {
        self.sink.lock().unwrap().is_some()
    }

    fn emit(&self, sample: T) {
        let sink = self.sink.lock().unwrap().clone();
        if let Some(sink) = sink {
            sink.push(sample);
        }
    }

    fn begin(&self, sink: Arc<dyn SampleSink<T>>) {
        *self.sink.lock().unwrap() = Some(sink);
    }

    fn end(&self) {
        *self.sink.lock().unwrap() = None;
    }
}

impl OrientationSource for FakeSource<RotationSample> {
    fn is_available(&self) -> bool {
        self.available
    }
    fn start(&self, sink: Arc<dyn SampleSink<RotationSample>>) {
        self.begin(sink);
    }
    fn stop(&self) {
        self.end();
    }
}

impl PressureSource for FakeSource<PressureSample> {
    fn is_available(&self) -> bool {
        self.available
    }
    fn start(&self, sink: Arc<dyn SampleSink<PressureSample>>) {
        self.begin(sink);
    }
    fn stop(&self) {
        self.end();
    }
}

impl GyroscopeSource for FakeSource<GyroSample> {
    fn is_available(&self) -> bool {
        self.available
    }
    fn start(&self, sink: Arc<dyn SampleSink<GyroSample>>) {
        self.begin(sink);
    }
    fn stop(&self) {
        self.end();
    }
}

impl MagnetometerSource for FakeSource<MagnetometerSample> {
    fn is_available(&self) -> bool {
        self.available
    }
    fn start(&self, sink: Arc<dyn SampleSink<MagnetometerSample>>) {
        self.begin(sink);
    }
    fn stop(&self) {
        self.end();
    }
}

impl LocationSource for FakeSource<GpsFix> {
    fn is_available(&self) -> bool {
        self.available
    }
    fn start(&self, sink: Arc<dyn SampleSink<GpsFix>>) {
        self.begin(sink);
    }
    fn stop(&self) {
        self.end();
    }
}

struct Rig {
    store: AircraftStateStore,
    orientation: Arc<FakeSource<RotationSample>>,
    pressure: Arc<FakeSource<PressureSample>>,
    gyroscope: Arc<FakeSource<GyroSample>>,
    magnetometer: Arc<FakeSource<MagnetometerSample>>,
    location: Arc<FakeSource<GpsFix>>,
    sources: SensorSources,
}

/// Orientation, pressure, magnetometer and location present; the gyroscope
/// is reported unavailable and there is no gravity sensor at all.
fn create_rig() -> Rig {
    let store = AircraftStateStore::new();
    let fusion = Arc::new(SensorFusion::new(store.clone(), FusionConfig::default()));

    let orientation = FakeSource::<RotationSample>::new(true);
    let pressure = FakeSource::<PressureSample>::new(true);
    let gyroscope = FakeSource::<GyroSample>::new(false);
    let magnetometer = FakeSource::<MagnetometerSample>::new(true);
    let location = FakeSource::<GpsFix>::new(true);

    let sources = SensorSources {
        orientation: Some(orientation.clone()),
        pressure: Some(pressure.clone()),
        gyroscope: Some(gyroscope.clone()),
        magnetometer: Some(magnetometer.clone()),
        location: Some(location.clone()),
        ..Default::default()
    };
    let attached = fusion.attach(&sources);
    assert_eq!(attached.count(), 4);
    assert!(!attached.accelerometer);

    Rig {
        store,
        orientation,
        pressure,
        gyroscope,
        magnetometer,
        location,
        sources,
    }
}

fn fix(lat: f64, lon: f64, speed_kt: f64, track: f64) -> GpsFix {
    let mut fix = GpsFix::at(lat, lon);
    fix.speed_mps = Some(speed_kt / 1.943844);
    fix.track_deg = Some(track);
    fix
}

// ============================================================================
// Attachment
// ============================================================================

#[test]
fn test_unavailable_source_is_never_started() {
    let rig = create_rig();

    assert!(rig.orientation.is_started());
    assert!(rig.pressure.is_started());
    assert!(rig.location.is_started());
    assert!(!rig.gyroscope.is_started());

    // Nothing ever arrives, so turn rate stays "no reading"
    rig.gyroscope.emit(GyroSample::new([0.0, 0.0, 0.5], 0));
    let state = rig.store.snapshot();
    assert!(state.turn_rate_dps.is_none());
    assert!(state.gravity.is_none());
}

#[test]
fn test_magnetometer_feeds_raw_data() {
    let rig = create_rig();
    assert!(rig.magnetometer.is_started());

    rig.magnetometer
        .emit(MagnetometerSample::new([22.0, 1.5, -38.0], 5));
    let state = rig.store.snapshot();
    assert_eq!(state.magnetic_field_ut, Some([22.0, 1.5, -38.0]));
    assert!(state.acceleration.is_none());
}

#[test]
fn test_stop_all_detaches_sources() {
    let rig = create_rig();
    rig.sources.stop_all();

    rig.pressure.emit(PressureSample::new(1013.25, 0));
    assert!(rig.store.snapshot().pressure_hpa.is_none());
}

// ============================================================================
// Barometer
// ============================================================================

#[test]
fn test_pressure_drop_reads_as_climb() {
    let rig = create_rig();

    rig.pressure.emit(PressureSample::new(1013.25, 0));
    let first = rig.store.snapshot();
    assert!(first.baro_altitude_m.unwrap().abs() < 0.5);
    assert!(first.vertical_speed_fpm.is_none());

    for t in 1..=4u64 {
        rig.pressure.emit(PressureSample::new(1012.0, t * 1000));
    }

    let state = rig.store.snapshot();
    assert!(state.baro_altitude_m.unwrap() > 0.0);
    assert!(state.vertical_speed_fpm.unwrap() > 0.0);
    assert_eq!(state.pressure_hpa, Some(1012.0));
}

// ============================================================================
// GPS and Direct-To
// ============================================================================

#[test]
fn test_bogus_fix_does_not_replace_position() {
    let rig = create_rig();

    rig.location.emit(GpsFix::at(0.0, 0.0));
    assert!(rig.store.snapshot().position.is_none());

    rig.location.emit(fix(10.0, 10.0, 100.0, 90.0));
    rig.location.emit(GpsFix::at(0.00001, -0.00002));

    let position = rig.store.snapshot().position.unwrap();
    assert_eq!(position.as_tuple(), (10.0, 10.0));
}

#[test]
fn test_direct_to_flow() {
    let rig = create_rig();
    let guidance = DirectToGuidance::new(GuidanceConfig::default());

    rig.location.emit(fix(10.0, 10.0, 100.0, 90.0));
    rig.store.set_from(Some(Waypoint::present_position(10.0, 10.0)));
    rig.store
        .set_to(Some(Waypoint::new("DEST", "Destination", 10.0, 11.0)));
    assert!(rig.store.activate_gps());

    let state = rig.store.snapshot();
    assert_eq!(state.nav_source, NavSource::Gps);
    assert!((state.selected_course_deg - 90.0).abs() < 0.2);

    // Drift north of the eastbound leg: left of course, needle right
    rig.location.emit(fix(10.01, 10.5, 100.0, 90.0));
    let output = guidance.compute(&rig.store.snapshot());
    assert_eq!(output.mode, NavSource::Gps);
    assert!(output.cross_track_nm.unwrap() < 0.0);
    assert!(output.cdi_dots.unwrap() > 0.0);

    let dtg = output.distance_to_go_nm.unwrap();
    assert!((dtg - 29.5).abs() < 1.0, "distance to go {}", dtg);
    assert!(output.eta.as_deref().unwrap().starts_with("00:"));

    // Back to heading mode
    rig.store.use_heading();
    let output = guidance.compute(&rig.store.snapshot());
    assert_eq!(output.mode, NavSource::Heading);
    assert!(output.distance_to_go_nm.is_none());
    assert!(output.eta.is_none());
}

#[test]
fn test_eta_unavailable_when_slow() {
    let rig = create_rig();
    let guidance = DirectToGuidance::new(GuidanceConfig::default());

    rig.location.emit(fix(10.0, 10.0, 3.0, 90.0));
    rig.store.set_from(Some(Waypoint::present_position(10.0, 10.0)));
    rig.store
        .set_to(Some(Waypoint::new("DEST", "Destination", 10.0, 11.0)));
    assert!(rig.store.activate_gps());

    let output = guidance.compute(&rig.store.snapshot());
    assert!(output.distance_to_go_nm.is_some());
    assert!(output.eta.is_none());
    assert_eq!(output.eta_text(), "—");
}

// ============================================================================
// Attitude
// ============================================================================

#[test]
fn test_calibration_zeroes_current_attitude() {
    let rig = create_rig();
    let tilted = RotationSample::from_rotation_vector([0.1, 0.0, 0.0], None, 0);

    rig.orientation.emit(tilted);
    let before = rig.store.snapshot();
    assert!(before.pitch_deg().unwrap().abs() > 5.0);
    assert_eq!(before.calibration, CalibrationStatus::Uncalibrated);

    rig.store.request_calibration();
    assert_eq!(rig.store.snapshot().calibration, CalibrationStatus::Pending);

    rig.orientation.emit(tilted);
    let after = rig.store.snapshot();
    assert_eq!(after.calibration, CalibrationStatus::Calibrated);
    assert!(after.pitch_deg().unwrap().abs() < 1e-6);
    assert!(after.roll_deg().unwrap().abs() < 1e-6);

    // Level device now reads the opposite tilt
    rig.orientation.emit(RotationSample::new(Mat3::IDENTITY, 20));
    let level = rig.store.snapshot();
    assert!((level.pitch_deg().unwrap() + before.pitch_deg().unwrap()).abs() < 1e-6);
}

// ============================================================================
// Concurrency
// ============================================================================

#[test]
fn test_concurrent_producers_do_not_lose_fields() {
    let rig = create_rig();
    let pressure = rig.pressure.clone();
    let location = rig.location.clone();
    let orientation = rig.orientation.clone();

    let handles = vec![
        std::thread::spawn(move || {
            for i in 0..200u64 {
                pressure.emit(PressureSample::new(1013.25 - i as f64 * 0.01, i * 100));
            }
        }),
        std::thread::spawn(move || {
            for i in 0..200u64 {
                location.emit(fix(10.0 + i as f64 * 1e-4, 10.0, 90.0, 45.0));
            }
        }),
        std::thread::spawn(move || {
            for i in 0..200u64 {
                orientation.emit(RotationSample::new(Mat3::IDENTITY, i));
            }
        }),
    ];
    for handle in handles {
        handle.join().unwrap();
    }

    let state = rig.store.snapshot();
    assert!(state.pressure_hpa.is_some());
    assert!(state.position.is_some());
    assert!(state.attitude.is_some());
    assert!((state.position.unwrap().latitude - (10.0 + 199.0 * 1e-4)).abs() < 1e-9);
}

#[tokio::test]
async fn test_subscribers_see_published_updates() {
    let rig = create_rig();
    let mut rx = rig.store.subscribe();

    rig.location.emit(fix(12.99, 80.17, 80.0, 270.0));

    tokio::time::timeout(Duration::from_secs(1), rx.changed())
        .await
        .expect("no update published")
        .unwrap();
    let state = rx.borrow_and_update().clone();
    assert_eq!(state.track_deg, Some(270.0));
    assert!((state.ground_speed_kt().unwrap() - 80.0).abs() < 1e-6);
}
