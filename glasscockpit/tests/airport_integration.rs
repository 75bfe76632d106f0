//! Integration tests for airport reference data.
//!
//! Covers the path from OurAirports CSV files on disk to what the moving map
//! and the Direct-To page consume:
//! - Loading a data directory (plain and gzip compressed)
//! - Viewport queries, including viewports across the antimeridian
//! - Per-airport details (runways, frequencies, navaids)
//! - Background viewport queries with last-query-wins
//!
//! Run with: `cargo test --test airport_integration`

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use flate2::write::GzEncoder;
use flate2::Compression;
use tempfile::TempDir;
use tokio::runtime::Handle;

use glasscockpit::aircraft::AircraftStateStore;
use glasscockpit::airport::{
    AirportDataError, AirportDatabase, AirportStore, SpatialAirportIndex, Viewport,
    ViewportQueryWorker,
};
use glasscockpit::nav::NavSource;

// ============================================================================
// Test Helpers
// ============================================================================

const AIRPORTS_CSV: &str = "\
id,ident,type,name,latitude_deg,longitude_deg,elevation_ft,continent,iso_country,iso_region,municipality,scheduled_service,gps_code,iata_code
26434,VOMM,large_airport,Chennai International Airport,12.990005,80.169296,52,AS,IN,IN-TN,Chennai,yes,VOMM,MAA
26435,VOBL,large_airport,Kempegowda International Airport,13.1979,77.706299,3000,AS,IN,IN-KA,Bangalore,yes,VOBL,BLR
100,NFFN,large_airport,Nadi International Airport,-17.755399,177.443001,59,OC,FJ,FJ-W,Nadi,yes,NFFN,NAN
101,NFTF,large_airport,Fua'amotu International Airport,-21.241199,-175.149994,126,OC,TO,TO-04,Nuku'alofa,yes,NFTF,TBU
102,NZCI,medium_airport,Chatham Islands / Tuuta Airport,-43.810001,-176.457001,43,OC,NZ,NZ-CIT,Waitangi,yes,NZCI,CHT
103,XEDGE,small_airport,Edge Strip,-20.0,180.0,10,OC,FJ,FJ-E,,no,,
200,VOHL,heliport,Some Heliport,13.0,80.0,10,AS,IN,IN-TN,,no,,
";

const RUNWAYS_CSV: &str = "\
id,airport_ref,airport_ident,length_ft,width_ft,surface,lighted,closed,le_ident,he_ident
1,26434,VOMM,12001,150,ASP,1,0,07,25
2,26434,VOMM,9629,150,ASP,1,0,12,30
3,26435,VOBL,13123,148,ASP,1,0,09L,27R
";

const FREQUENCIES_CSV: &str = "\
id,airport_ref,airport_ident,type,description,frequency_mhz
1,26434,VOMM,TWR,CHENNAI TWR,118.1
2,26434,VOMM,GND,CHENNAI GND,121.9
3,26434,VOMM,ATIS,,126.4
";

const NAVAIDS_CSV: &str = "\
id,filename,ident,name,type,frequency_khz,latitude_deg,longitude_deg,associated_airport
1,x,MMV,Chennai,VOR-DME,112500,12.98,80.16,VOMM
2,x,MM,Chennai,NDB,330,12.97,80.15,VOMM
";

fn write_plain(dir: &Path, name: &str, content: &str) {
    std::fs::write(dir.join(name), content).unwrap();
}

fn write_gz(dir: &Path, name: &str, content: &str) {
    let file = File::create(dir.join(format!("{}.gz", name))).unwrap();
    let mut encoder = GzEncoder::new(file, Compression::default());
    encoder.write_all(content.as_bytes()).unwrap();
    encoder.finish().unwrap();
}

/// Data directory with every file present, airports gzip compressed.
fn create_data_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    write_gz(dir.path(), "airports.csv", AIRPORTS_CSV);
    write_plain(dir.path(), "runways.csv", RUNWAYS_CSV);
    write_plain(dir.path(), "airport-frequencies.csv", FREQUENCIES_CSV);
    write_plain(dir.path(), "navaids.csv", NAVAIDS_CSV);
    dir
}

fn ids(airports: &[glasscockpit::airport::Airport]) -> Vec<i64> {
    let mut ids: Vec<i64> = airports.iter().map(|a| a.id).collect();
    ids.sort();
    ids
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn test_load_data_directory() {
    let dir = create_data_dir();
    let db = AirportDatabase::load_from_dir(dir.path()).unwrap();

    // Heliport filtered out
    assert_eq!(db.len(), 6);
    let vomm = db.store().by_ident("VOMM").unwrap().unwrap();
    assert_eq!(vomm.display_code(), "MAA / VOMM");
}

#[test]
fn test_missing_airports_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    write_plain(dir.path(), "runways.csv", RUNWAYS_CSV);

    let result = AirportDatabase::load_from_dir(dir.path());
    assert!(matches!(result, Err(AirportDataError::NotFound(_))));
}

#[test]
fn test_airports_only_directory() {
    let dir = TempDir::new().unwrap();
    write_plain(dir.path(), "airports.csv", AIRPORTS_CSV);

    let db = AirportDatabase::load_from_dir(dir.path()).unwrap();
    assert_eq!(db.len(), 6);
    assert!(db.details("VOMM").is_empty());
}

// ============================================================================
// Viewport queries
// ============================================================================

#[test]
fn test_viewport_over_south_india() {
    let dir = create_data_dir();
    let db = AirportDatabase::load_from_dir(dir.path()).unwrap();

    let found = db
        .spatial()
        .query_visible(&Viewport::new(12.0, 77.0, 14.0, 81.0), 8.0)
        .unwrap();
    assert_eq!(ids(&found), vec![26434, 26435]);
}

#[test]
fn test_viewport_across_antimeridian() {
    let dir = create_data_dir();
    let db = AirportDatabase::load_from_dir(dir.path()).unwrap();

    // Fiji to Tonga and the Chathams, west=170 east=-170
    let viewport = Viewport::new(-45.0, 170.0, -15.0, -170.0);
    let found = db.spatial().query_visible(&viewport, 6.0).unwrap();

    // The strip exactly on 180 is counted once
    assert_eq!(ids(&found), vec![100, 101, 102, 103]);
}

#[test]
fn test_viewport_with_nothing_in_it() {
    let dir = create_data_dir();
    let db = AirportDatabase::load_from_dir(dir.path()).unwrap();

    let found = db
        .spatial()
        .query_visible(&Viewport::new(50.0, -10.0, 55.0, 0.0), 9.0)
        .unwrap();
    assert!(found.is_empty());
}

// ============================================================================
// Details and Direct-To
// ============================================================================

#[test]
fn test_details_summaries() {
    let dir = create_data_dir();
    let db = AirportDatabase::load_from_dir(dir.path()).unwrap();

    let details = db.details("VOMM");
    let runways: Vec<String> = details.runways.iter().map(|r| r.summary()).collect();
    assert_eq!(
        runways,
        vec![
            "07/25 • 12001 ft • ASP • Lighted",
            "12/30 • 9629 ft • ASP • Lighted",
        ]
    );

    let frequencies: Vec<String> = details.frequencies.iter().map(|f| f.summary()).collect();
    assert_eq!(
        frequencies,
        vec![
            "ATIS • 126.4 MHz",
            "GND • 121.9 MHz — CHENNAI GND",
            "TWR • 118.1 MHz — CHENNAI TWR",
        ]
    );

    let navaids: Vec<String> = details.navaids.iter().map(|n| n.summary()).collect();
    assert_eq!(
        navaids,
        vec!["NDB MM • 330 kHz • Chennai", "VOR-DME MMV • 112500 kHz • Chennai"]
    );
}

#[test]
fn test_airport_as_direct_to_destination() {
    let dir = create_data_dir();
    let db = AirportDatabase::load_from_dir(dir.path()).unwrap();
    let found = db
        .spatial()
        .query_visible(&Viewport::new(13.0, 77.0, 14.0, 78.0), 9.0)
        .unwrap();
    let destination = found[0].to_waypoint();
    assert_eq!(destination.ident, "BLR / VOBL");

    let store = AircraftStateStore::new();
    store.update(|s| s.position = Some(glasscockpit::aircraft::GeoPoint::new(12.99, 80.17)));
    store.set_from(Some(glasscockpit::nav::Waypoint::present_position(12.99, 80.17)));
    store.set_to(Some(destination));
    assert!(store.activate_gps());

    let state = store.snapshot();
    assert_eq!(state.nav_source, NavSource::Gps);
    // Chennai to Bangalore is roughly west
    assert!(state.selected_course_deg > 270.0 && state.selected_course_deg < 285.0);
}

// ============================================================================
// Background queries
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_worker_last_query_wins() {
    let dir = create_data_dir();
    let db = AirportDatabase::load_from_dir(dir.path()).unwrap();
    let index = Arc::new(SpatialAirportIndex::new(db.store().clone()));

    let worker = ViewportQueryWorker::new(index, Handle::current())
        .with_settle_delay(Duration::from_millis(50));
    let mut rx = worker.subscribe();

    // Rapid pan: India, then the Pacific
    worker.submit(Viewport::new(12.0, 77.0, 14.0, 81.0), 8.0);
    let last = worker.submit(Viewport::new(-45.0, 170.0, -15.0, -170.0), 6.0);

    tokio::time::timeout(Duration::from_secs(5), rx.changed())
        .await
        .expect("no viewport result")
        .unwrap();
    let result = rx.borrow_and_update().clone();

    assert_eq!(result.generation, last);
    assert!(result.error.is_none());
    assert_eq!(ids(&result.airports), vec![100, 101, 102, 103]);

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(!rx.has_changed().unwrap());
}
