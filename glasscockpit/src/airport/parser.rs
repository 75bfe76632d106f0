//! Loader for OurAirports-format CSV files.
//!
//! Columns are looked up by header name, so extra or reordered columns are
//! fine. Rows that fail to deserialize are skipped with a warning; the load
//! as a whole only fails on I/O errors or a missing required column.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use serde::Deserialize;

use super::details::{Frequency, Navaid, Runway};
use super::Airport;

/// File names inside a data directory.
pub const AIRPORTS_FILE: &str = "airports.csv";
pub const RUNWAYS_FILE: &str = "runways.csv";
pub const FREQUENCIES_FILE: &str = "airport-frequencies.csv";
pub const NAVAIDS_FILE: &str = "navaids.csv";

/// Error type for airport data loading.
#[derive(Debug, thiserror::Error)]
pub enum AirportDataError {
    #[error("Airport data file not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Missing required column '{column}' in {file}")]
    MissingColumn { file: String, column: String },
}

#[derive(Debug, Deserialize)]
struct AirportRow {
    id: i64,
    ident: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    name: Option<String>,
    latitude_deg: Option<f64>,
    longitude_deg: Option<f64>,
    iata_code: Option<String>,
    iso_country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RunwayRow {
    airport_ident: Option<String>,
    length_ft: Option<String>,
    surface: Option<String>,
    lighted: Option<String>,
    closed: Option<String>,
    le_ident: Option<String>,
    he_ident: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FrequencyRow {
    airport_ident: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    description: Option<String>,
    frequency_mhz: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NavaidRow {
    associated_airport: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    ident: Option<String>,
    name: Option<String>,
    frequency_khz: Option<String>,
}

/// Detail files carry free-form numbers; an unparsable value is dropped
/// rather than the whole row.
fn parse_number<T: std::str::FromStr>(value: Option<&str>) -> Option<T> {
    value.and_then(|v| v.trim().parse().ok())
}

/// Everything loaded from a data directory.
#[derive(Debug, Clone, Default)]
pub struct AirportDataSet {
    pub airports: Vec<Airport>,
    pub runways: Vec<Runway>,
    pub frequencies: Vec<Frequency>,
    pub navaids: Vec<Navaid>,
}

/// Parser for OurAirports CSV data.
pub struct AirportDataLoader;

impl AirportDataLoader {
    /// Load all files from `dir`.
    ///
    /// `airports.csv` (or `.csv.gz`) is required; the detail files are
    /// optional and load as empty when absent.
    pub fn load_dir<P: AsRef<Path>>(dir: P) -> Result<AirportDataSet, AirportDataError> {
        let dir = dir.as_ref();

        let airports_path = Self::resolve(dir, AIRPORTS_FILE)
            .ok_or_else(|| AirportDataError::NotFound(dir.join(AIRPORTS_FILE)))?;
        let airports = Self::parse_airports(Self::open(&airports_path)?)?;

        let runways = match Self::resolve(dir, RUNWAYS_FILE) {
            Some(path) => Self::parse_runways(Self::open(&path)?)?,
            None => Vec::new(),
        };
        let frequencies = match Self::resolve(dir, FREQUENCIES_FILE) {
            Some(path) => Self::parse_frequencies(Self::open(&path)?)?,
            None => Vec::new(),
        };
        let navaids = match Self::resolve(dir, NAVAIDS_FILE) {
            Some(path) => Self::parse_navaids(Self::open(&path)?)?,
            None => Vec::new(),
        };

        tracing::info!(
            dir = %dir.display(),
            airports = airports.len(),
            runways = runways.len(),
            frequencies = frequencies.len(),
            navaids = navaids.len(),
            "Loaded airport data"
        );

        Ok(AirportDataSet {
            airports,
            runways,
            frequencies,
            navaids,
        })
    }

    /// Find `name` or `name.gz` in `dir`.
    fn resolve(dir: &Path, name: &str) -> Option<PathBuf> {
        let plain = dir.join(name);
        if plain.exists() {
            return Some(plain);
        }
        let gz = dir.join(format!("{}.gz", name));
        if gz.exists() {
            return Some(gz);
        }
        tracing::debug!(dir = %dir.display(), file = name, "Airport data file not present");
        None
    }

    /// Open a data file, transparently decompressing `.gz`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Box<dyn Read + Send>, AirportDataError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(AirportDataError::NotFound(path.to_path_buf()));
        }

        let file = File::open(path)?;
        if path.extension().is_some_and(|ext| ext == "gz") {
            tracing::debug!(path = %path.display(), "Loading gzip compressed airport data");
            Ok(Box::new(BufReader::new(GzDecoder::new(file))))
        } else {
            Ok(Box::new(BufReader::new(file)))
        }
    }

    fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
        csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader)
    }

    fn require_columns<R: Read>(
        reader: &mut csv::Reader<R>,
        file: &str,
        columns: &[&str],
    ) -> Result<(), AirportDataError> {
        let headers = reader.headers()?;
        for column in columns {
            if !headers.iter().any(|h| h == *column) {
                return Err(AirportDataError::MissingColumn {
                    file: file.to_string(),
                    column: column.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Parse `airports.csv`.
    ///
    /// Keeps only rows whose type contains "airport" (case-insensitive) and
    /// whose coordinates are present and in range.
    pub fn parse_airports<R: Read>(reader: R) -> Result<Vec<Airport>, AirportDataError> {
        let mut reader = Self::csv_reader(reader);
        Self::require_columns(
            &mut reader,
            AIRPORTS_FILE,
            &["id", "type", "latitude_deg", "longitude_deg"],
        )?;

        let mut airports = Vec::new();
        let mut skipped = 0usize;
        for result in reader.deserialize::<AirportRow>() {
            let row = match result {
                Ok(row) => row,
                Err(e) => {
                    tracing::warn!("Skipping airport row: {}", e);
                    skipped += 1;
                    continue;
                }
            };

            let kind = row.kind.unwrap_or_default();
            if !kind.to_lowercase().contains("airport") {
                continue;
            }
            let (Some(latitude), Some(longitude)) = (row.latitude_deg, row.longitude_deg) else {
                continue;
            };
            if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
                skipped += 1;
                continue;
            }

            airports.push(Airport {
                id: row.id,
                name: row.name.unwrap_or_default(),
                iata: row.iata_code.filter(|s| !s.is_empty()),
                icao: row.ident.filter(|s| !s.is_empty()),
                latitude,
                longitude,
                kind,
                country: row.iso_country.filter(|s| !s.is_empty()),
            });
        }

        if skipped > 0 {
            tracing::debug!(skipped, "Airport rows skipped");
        }
        Ok(airports)
    }

    /// Parse `runways.csv`. Rows without an airport ident are dropped.
    pub fn parse_runways<R: Read>(reader: R) -> Result<Vec<Runway>, AirportDataError> {
        let mut reader = Self::csv_reader(reader);
        Self::require_columns(&mut reader, RUNWAYS_FILE, &["airport_ident"])?;

        let mut runways = Vec::new();
        for result in reader.deserialize::<RunwayRow>() {
            let row = match result {
                Ok(row) => row,
                Err(e) => {
                    tracing::warn!("Skipping runway row: {}", e);
                    continue;
                }
            };
            let Some(airport_ident) = row.airport_ident.filter(|s| !s.is_empty()) else {
                continue;
            };
            runways.push(Runway {
                airport_ident,
                le_ident: row.le_ident,
                he_ident: row.he_ident,
                length_ft: parse_number(row.length_ft.as_deref()),
                surface: row.surface,
                lighted: row.lighted.as_deref() == Some("1"),
                closed: row.closed.as_deref() == Some("1"),
            });
        }
        Ok(runways)
    }

    /// Parse `airport-frequencies.csv`.
    pub fn parse_frequencies<R: Read>(reader: R) -> Result<Vec<Frequency>, AirportDataError> {
        let mut reader = Self::csv_reader(reader);
        Self::require_columns(&mut reader, FREQUENCIES_FILE, &["airport_ident"])?;

        let mut frequencies = Vec::new();
        for result in reader.deserialize::<FrequencyRow>() {
            let row = match result {
                Ok(row) => row,
                Err(e) => {
                    tracing::warn!("Skipping frequency row: {}", e);
                    continue;
                }
            };
            let Some(airport_ident) = row.airport_ident.filter(|s| !s.is_empty()) else {
                continue;
            };
            frequencies.push(Frequency {
                airport_ident,
                kind: row.kind,
                description: row.description,
                mhz: parse_number(row.frequency_mhz.as_deref()),
            });
        }
        Ok(frequencies)
    }

    /// Parse `navaids.csv`. Only navaids associated with an airport are kept.
    pub fn parse_navaids<R: Read>(reader: R) -> Result<Vec<Navaid>, AirportDataError> {
        let mut reader = Self::csv_reader(reader);
        Self::require_columns(&mut reader, NAVAIDS_FILE, &["associated_airport"])?;

        let mut navaids = Vec::new();
        for result in reader.deserialize::<NavaidRow>() {
            let row = match result {
                Ok(row) => row,
                Err(e) => {
                    tracing::warn!("Skipping navaid row: {}", e);
                    continue;
                }
            };
            let Some(airport_ident) = row.associated_airport.filter(|s| !s.is_empty()) else {
                continue;
            };
            navaids.push(Navaid {
                airport_ident,
                kind: row.kind,
                ident: row.ident,
                name: row.name,
                khz: parse_number(row.frequency_khz.as_deref()),
            });
        }
        Ok(navaids)
    }
}
