//! Viewport-shaped airport queries.
//!
//! Turns a map viewport and zoom into one or two bounded store queries.
//! Viewports that cross the antimeridian (`west > east`) are split into
//! `[west, 180]` and `[-180, east]` and the halves merged by airport id.

use std::collections::HashSet;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::store::{AirportQueryError, AirportStore};
use super::Airport;

/// Result cap for a zoom level. Lower zooms show fewer airports to bound
/// render cost.
pub fn limit_for_zoom(zoom: f64) -> usize {
    if zoom < 6.0 {
        150
    } else if zoom < 8.0 {
        300
    } else if zoom < 10.0 {
        700
    } else {
        1500
    }
}

/// A map viewport in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Viewport {
    pub fn new(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self {
            south,
            west,
            north,
            east,
        }
    }

    pub fn crosses_antimeridian(&self) -> bool {
        self.west > self.east
    }

    /// Whether the box can contain anything at all.
    fn is_queryable(&self) -> bool {
        [self.south, self.west, self.north, self.east]
            .iter()
            .all(|v| v.is_finite())
            && self.south <= self.north
    }
}

/// Airport lookups by viewport.
pub struct SpatialAirportIndex {
    store: Arc<dyn AirportStore>,
}

impl SpatialAirportIndex {
    pub fn new(store: Arc<dyn AirportStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn AirportStore> {
        &self.store
    }

    /// Airports inside `viewport`, at most [`limit_for_zoom`] of them.
    ///
    /// Empty and out-of-range boxes yield an empty list. Only storage
    /// failures are errors.
    pub fn query_visible(
        &self,
        viewport: &Viewport,
        zoom: f64,
    ) -> Result<Vec<Airport>, AirportQueryError> {
        self.query_visible_cancellable(viewport, zoom, &CancellationToken::new())
    }

    /// Like [`query_visible`](Self::query_visible), abandoning the work with
    /// [`AirportQueryError::Cancelled`] once `token` is cancelled.
    pub fn query_visible_cancellable(
        &self,
        viewport: &Viewport,
        zoom: f64,
        token: &CancellationToken,
    ) -> Result<Vec<Airport>, AirportQueryError> {
        if !viewport.is_queryable() {
            tracing::debug!(?viewport, "Skipping unqueryable viewport");
            return Ok(Vec::new());
        }
        let limit = limit_for_zoom(zoom);
        let Viewport {
            south,
            west,
            north,
            east,
        } = *viewport;

        if token.is_cancelled() {
            return Err(AirportQueryError::Cancelled);
        }

        if !viewport.crosses_antimeridian() {
            return self.store.in_bounds(south, north, west, east, limit);
        }

        let left = self.store.in_bounds(south, north, west, 180.0, limit)?;
        if token.is_cancelled() {
            return Err(AirportQueryError::Cancelled);
        }
        let right = self.store.in_bounds(south, north, -180.0, east, limit)?;

        let mut seen = HashSet::with_capacity(left.len() + right.len());
        let merged: Vec<Airport> = left
            .into_iter()
            .chain(right)
            .filter(|a| seen.insert(a.id))
            .take(limit)
            .collect();

        tracing::trace!(
            west,
            east,
            count = merged.len(),
            "Antimeridian viewport query merged"
        );
        Ok(merged)
    }
}
