//! Airport storage behind a bounding-box query.
//!
//! [`AirportStore`] is the seam between viewport queries and wherever the
//! records live. [`InMemoryAirportStore`] buckets airports into 1°×1° cells
//! so a box query only touches the cells it overlaps.
//!
//! # Thread Safety
//!
//! - Whole-dataset swaps protected by `RwLock` (`populate()` / `clear()`)
//! - Cell-level access via `DashMap`
//!
//! `populate()` builds the new maps outside the lock and swaps them in, so
//! readers see either the old or the new data set, never a mix.

use std::sync::RwLock;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use super::Airport;

/// Errors from airport queries.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AirportQueryError {
    #[error("Airport storage error: {0}")]
    Storage(String),
    #[error("Airport query cancelled")]
    Cancelled,
    #[error("Airport query task failed: {0}")]
    TaskFailed(String),
}

/// Read access to stored airports.
pub trait AirportStore: Send + Sync {
    /// Airports with `south <= lat <= north` and `west <= lon <= east`,
    /// ordered by id and capped at `limit`.
    ///
    /// The box must not cross the antimeridian (`west <= east`); callers
    /// split such boxes themselves.
    fn in_bounds(
        &self,
        south: f64,
        north: f64,
        west: f64,
        east: f64,
        limit: usize,
    ) -> Result<Vec<Airport>, AirportQueryError>;

    /// First airport whose ICAO/local ident equals `ident`.
    fn by_ident(&self, ident: &str) -> Result<Option<Airport>, AirportQueryError>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

type CellKey = (i32, i32);

fn cell_of(latitude: f64, longitude: f64) -> CellKey {
    (latitude.floor() as i32, longitude.floor() as i32)
}

#[derive(Default)]
struct StoreData {
    by_id: DashMap<i64, Airport>,
    by_ident: DashMap<String, i64>,
    cells: DashMap<CellKey, Vec<i64>>,
}

impl StoreData {
    /// Returns `false` when the id is already present; the first record wins.
    ///
    /// The id is claimed through its `by_id` entry, so concurrent inserts of
    /// one id index it exactly once.
    fn insert(&self, airport: Airport) -> bool {
        let id = airport.id;
        let cell = cell_of(airport.latitude, airport.longitude);
        let ident = airport.icao.clone();

        match self.by_id.entry(id) {
            Entry::Occupied(_) => return false,
            Entry::Vacant(slot) => {
                slot.insert(airport);
            }
        }

        if let Some(ident) = ident {
            self.by_ident.entry(ident).or_insert(id);
        }
        self.cells.entry(cell).or_default().push(id);
        true
    }
}

/// In-memory airport store.
pub struct InMemoryAirportStore {
    data: RwLock<StoreData>,
}

impl InMemoryAirportStore {
    pub fn new() -> Self {
        Self {
            data: RwLock::new(StoreData::default()),
        }
    }

    /// Insert one airport. Returns `false` if its id is already stored.
    pub fn insert(&self, airport: Airport) -> bool {
        let data = self.data.read().expect("airport store lock poisoned");
        data.insert(airport)
    }

    /// Atomic bulk population; replaces everything currently stored.
    ///
    /// Duplicate ids keep the first record.
    pub fn populate(&self, airports: impl IntoIterator<Item = Airport>) -> usize {
        let new_data = StoreData::default();
        let mut duplicates = 0usize;
        for airport in airports {
            if !new_data.insert(airport) {
                duplicates += 1;
            }
        }
        let count = new_data.by_id.len();
        if duplicates > 0 {
            tracing::debug!(duplicates, "Ignored duplicate airport ids");
        }

        let mut data = self.data.write().expect("airport store lock poisoned");
        *data = new_data;
        count
    }

    pub fn clear(&self) {
        let mut data = self.data.write().expect("airport store lock poisoned");
        *data = StoreData::default();
    }
}

impl Default for InMemoryAirportStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AirportStore for InMemoryAirportStore {
    fn in_bounds(
        &self,
        south: f64,
        north: f64,
        west: f64,
        east: f64,
        limit: usize,
    ) -> Result<Vec<Airport>, AirportQueryError> {
        if limit == 0 || south > north || west > east {
            return Ok(Vec::new());
        }
        if !(south.is_finite() && north.is_finite() && west.is_finite() && east.is_finite()) {
            return Err(AirportQueryError::Storage(format!(
                "non-finite bounds: S{} N{} W{} E{}",
                south, north, west, east
            )));
        }

        let data = self.data.read().expect("airport store lock poisoned");
        let (min_lat, min_lon) = cell_of(south.max(-90.0), west.max(-180.0));
        let (max_lat, max_lon) = cell_of(north.min(90.0), east.min(180.0));

        let mut found: Vec<Airport> = Vec::new();
        for lat in min_lat..=max_lat {
            for lon in min_lon..=max_lon {
                let Some(cell) = data.cells.get(&(lat, lon)) else {
                    continue;
                };
                for id in cell.iter() {
                    if let Some(airport) = data.by_id.get(id) {
                        if (south..=north).contains(&airport.latitude)
                            && (west..=east).contains(&airport.longitude)
                        {
                            found.push(airport.clone());
                        }
                    }
                }
            }
        }

        found.sort_by_key(|a| a.id);
        found.truncate(limit);
        Ok(found)
    }

    fn by_ident(&self, ident: &str) -> Result<Option<Airport>, AirportQueryError> {
        let data = self.data.read().expect("airport store lock poisoned");
        let airport = data
            .by_ident
            .get(ident.trim())
            .and_then(|id| data.by_id.get(id.value()).map(|a| a.clone()));
        Ok(airport)
    }

    fn len(&self) -> usize {
        let data = self.data.read().expect("airport store lock poisoned");
        data.by_id.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn airport(id: i64, icao: &str, lat: f64, lon: f64) -> Airport {
        Airport::new(id, icao, lat, lon).with_codes(None, Some(icao))
    }

    fn sample_store() -> InMemoryAirportStore {
        let store = InMemoryAirportStore::new();
        store.populate(vec![
            airport(30, "VOMM", 12.99, 80.17),
            airport(10, "VOBL", 13.20, 77.70),
            airport(20, "VOHS", 17.24, 78.43),
            airport(40, "NZAA", -37.01, 174.79),
            airport(50, "PHNL", 21.32, -157.92),
        ]);
        store
    }

    #[test]
    fn test_in_bounds_filters_and_orders_by_id() {
        let store = sample_store();
        let found = store.in_bounds(10.0, 20.0, 75.0, 85.0, 100).unwrap();
        let ids: Vec<i64> = found.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![10, 20, 30]);
    }

    #[test]
    fn test_in_bounds_limit_is_deterministic() {
        let store = sample_store();
        let found = store.in_bounds(10.0, 20.0, 75.0, 85.0, 2).unwrap();
        let ids: Vec<i64> = found.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![10, 20]);
    }

    #[test]
    fn test_in_bounds_inclusive_edges() {
        let store = sample_store();
        let found = store.in_bounds(12.99, 12.99, 80.17, 80.17, 10).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, 30);
    }

    #[test]
    fn test_in_bounds_degenerate_boxes() {
        let store = sample_store();
        assert!(store.in_bounds(20.0, 10.0, 75.0, 85.0, 10).unwrap().is_empty());
        assert!(store.in_bounds(10.0, 20.0, 85.0, 75.0, 10).unwrap().is_empty());
        assert!(store.in_bounds(10.0, 20.0, 75.0, 85.0, 0).unwrap().is_empty());
        assert!(store.in_bounds(f64::NAN, 20.0, 75.0, 85.0, 10).is_err());
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let store = InMemoryAirportStore::new();
        let count = store.populate(vec![
            airport(1, "FIRST", 1.0, 1.0),
            airport(1, "SECOND", 2.0, 2.0),
        ]);
        assert_eq!(count, 1);
        let found = store.by_ident("FIRST").unwrap();
        assert!(found.is_some());
        assert!(store.by_ident("SECOND").unwrap().is_none());
        assert!(!store.insert(airport(1, "THIRD", 3.0, 3.0)));
    }

    #[test]
    fn test_concurrent_insert_of_same_id_indexed_once() {
        use std::sync::{Arc, Barrier};

        for _ in 0..20 {
            let store = Arc::new(InMemoryAirportStore::new());
            let barrier = Arc::new(Barrier::new(8));
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    let store = Arc::clone(&store);
                    let barrier = Arc::clone(&barrier);
                    std::thread::spawn(move || {
                        barrier.wait();
                        store.insert(airport(7, "VOMM", 12.99, 80.17))
                    })
                })
                .collect();
            let inserted = handles
                .into_iter()
                .map(|h| h.join().unwrap())
                .filter(|&won| won)
                .count();

            assert_eq!(inserted, 1);
            assert_eq!(store.len(), 1);
            let found = store.in_bounds(12.0, 14.0, 80.0, 81.0, 100).unwrap();
            assert_eq!(found.len(), 1);
        }
    }

    #[test]
    fn test_populate_replaces_and_clear() {
        let store = sample_store();
        assert_eq!(store.len(), 5);

        store.populate(vec![airport(99, "KJFK", 40.64, -73.78)]);
        assert_eq!(store.len(), 1);
        assert!(store.by_ident("VOMM").unwrap().is_none());
        assert_eq!(store.by_ident(" KJFK ").unwrap().map(|a| a.id), Some(99));

        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn test_world_box() {
        let store = sample_store();
        let found = store.in_bounds(-90.0, 90.0, -180.0, 180.0, 100).unwrap();
        assert_eq!(found.len(), 5);
    }
}
