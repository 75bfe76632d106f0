//! Offline airport reference data and viewport queries.
//!
//! Airports, runways, frequencies and navaids are loaded once from
//! OurAirports-format CSV files and served from memory.
//!
//! # Data Source
//!
//! A data directory containing any of:
//! - `airports.csv` (required)
//! - `runways.csv`
//! - `airport-frequencies.csv`
//! - `navaids.csv`
//!
//! Each file may also be gzip compressed (`airports.csv.gz`).
//!
//! # Example
//!
//! ```ignore
//! use glasscockpit::airport::{AirportDatabase, Viewport};
//!
//! let db = AirportDatabase::load_from_dir("/data/ourairports")?;
//! let visible = db.spatial().query_visible(&Viewport::new(12.0, 79.0, 14.0, 81.0), 9.0)?;
//! if let Some(airport) = visible.first() {
//!     let details = db.details(airport.icao.as_deref().unwrap_or_default());
//!     for runway in &details.runways {
//!         println!("{}", runway.summary());
//!     }
//! }
//! ```

mod details;
mod parser;
mod spatial;
mod store;
mod worker;

use std::path::Path;
use std::sync::Arc;

use crate::config::ConfigFile;
use crate::nav::Waypoint;

pub use details::{AirportDetails, AirportDetailsIndex, Frequency, Navaid, Runway, MAX_NAVAIDS};
pub use parser::{AirportDataError, AirportDataLoader, AirportDataSet};
pub use spatial::{limit_for_zoom, SpatialAirportIndex, Viewport};
pub use store::{AirportQueryError, AirportStore, InMemoryAirportStore};
pub use worker::{ViewportQueryWorker, ViewportResult};

/// Zoom below which map labels are hidden.
pub const ZOOM_SHOW_CODES: f64 = 6.0;

/// Zoom at which names may be added to labels.
pub const ZOOM_ALLOW_NAMES: f64 = 8.0;

/// Names are only shown when fewer airports than this are visible.
pub const MAX_ONSCREEN_FOR_NAMES: usize = 15;

/// An airport record.
#[derive(Debug, Clone, PartialEq)]
pub struct Airport {
    /// Row id from the data source.
    pub id: i64,
    pub name: String,
    pub iata: Option<String>,
    /// ICAO code or local ident.
    pub icao: Option<String>,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Classification, e.g. "large_airport".
    pub kind: String,
    /// ISO country code.
    pub country: Option<String>,
}

impl Airport {
    /// Create an airport with only the required fields.
    pub fn new(id: i64, name: &str, latitude: f64, longitude: f64) -> Self {
        Self {
            id,
            name: name.to_string(),
            iata: None,
            icao: None,
            latitude,
            longitude,
            kind: "airport".to_string(),
            country: None,
        }
    }

    pub fn with_codes(mut self, iata: Option<&str>, icao: Option<&str>) -> Self {
        self.iata = non_blank(iata);
        self.icao = non_blank(icao);
        self
    }

    pub fn with_kind(mut self, kind: &str) -> Self {
        self.kind = kind.to_string();
        self
    }

    /// "IATA / ICAO", whichever one exists, or empty.
    pub fn display_code(&self) -> String {
        let iata = self.iata.as_deref().map(str::trim).unwrap_or_default();
        let icao = self.icao.as_deref().map(str::trim).unwrap_or_default();
        match (iata.is_empty(), icao.is_empty()) {
            (false, false) => format!("{} / {}", iata, icao),
            (false, true) => iata.to_string(),
            (true, false) => icao.to_string(),
            (true, true) => String::new(),
        }
    }

    /// Map label for this airport at `zoom` with `visible_count` airports on
    /// screen.
    pub fn map_label(&self, zoom: f64, visible_count: usize) -> String {
        if zoom < ZOOM_SHOW_CODES {
            return String::new();
        }
        let allow_names = zoom >= ZOOM_ALLOW_NAMES && visible_count < MAX_ONSCREEN_FOR_NAMES;
        let code = self.display_code();
        match (allow_names, code.is_empty()) {
            (true, false) => format!("{} - {}", code, self.name),
            (true, true) => self.name.clone(),
            (false, false) => code,
            (false, true) => self.name.clone(),
        }
    }

    /// Waypoint for Direct-To planning.
    ///
    /// The ident is the display code, or the first six characters of the
    /// upper-cased name when the airport has no code.
    pub fn to_waypoint(&self) -> Waypoint {
        let code = self.display_code();
        let ident = if code.trim().is_empty() {
            self.name.to_uppercase().chars().take(6).collect()
        } else {
            code
        };
        let name = if self.name.trim().is_empty() {
            "Airport".to_string()
        } else {
            self.name.clone()
        };
        Waypoint::new(ident, name, self.latitude, self.longitude)
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Loaded airport reference data: the spatial index plus per-airport
/// details.
pub struct AirportDatabase {
    store: Arc<InMemoryAirportStore>,
    spatial: SpatialAirportIndex,
    details: AirportDetailsIndex,
}

impl AirportDatabase {
    /// Build from already parsed data.
    pub fn from_data_set(data: AirportDataSet) -> Self {
        let store = Arc::new(InMemoryAirportStore::new());
        store.populate(data.airports);
        let details = AirportDetailsIndex::new(data.runways, data.frequencies, data.navaids);

        tracing::info!(
            airports = store.len(),
            details_airports = details.airport_count(),
            "Built airport database"
        );

        Self {
            spatial: SpatialAirportIndex::new(store.clone()),
            store,
            details,
        }
    }

    /// Load every supported file from a data directory.
    pub fn load_from_dir<P: AsRef<Path>>(dir: P) -> Result<Self, AirportDataError> {
        let data = AirportDataLoader::load_dir(dir)?;
        Ok(Self::from_data_set(data))
    }

    /// Load from `[airports] data_dir`.
    ///
    /// Returns `Ok(None)` when no data directory is configured, in which case
    /// the map runs without an airport overlay.
    pub fn load_from_config(config: &ConfigFile) -> Result<Option<Self>, AirportDataError> {
        let Some(dir) = config.airports.data_dir.as_ref() else {
            tracing::debug!("No airport data directory configured");
            return Ok(None);
        };
        Self::load_from_dir(dir).map(Some)
    }

    pub fn store(&self) -> &Arc<InMemoryAirportStore> {
        &self.store
    }

    pub fn spatial(&self) -> &SpatialAirportIndex {
        &self.spatial
    }

    /// Runways, frequencies and navaids for an airport ident.
    pub fn details(&self, ident: &str) -> AirportDetails {
        self.details.details(ident)
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}
