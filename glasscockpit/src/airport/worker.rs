//! Background viewport queries with last-query-wins semantics.
//!
//! Every [`ViewportQueryWorker::submit`] cancels whatever query is still in
//! flight and starts a new one on the blocking pool. Results are published
//! on a `watch` channel; a superseded query is dropped, never published.
//!
//! ```text
//! submit(v1) ──► [settle]──X cancelled
//! submit(v2) ──────────► [settle] ──► spawn_blocking(query) ──► watch::send
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::spatial::{SpatialAirportIndex, Viewport};
use super::store::AirportQueryError;
use super::Airport;

/// Outcome of one published viewport query.
#[derive(Debug, Clone, Default)]
pub struct ViewportResult {
    /// Submission number; 0 means nothing has been published yet.
    pub generation: u64,
    pub viewport: Option<Viewport>,
    pub zoom: f64,
    /// Empty when the query failed.
    pub airports: Arc<Vec<Airport>>,
    /// Set when the store reported a failure.
    pub error: Option<String>,
}

/// Runs viewport queries off the caller's thread.
pub struct ViewportQueryWorker {
    index: Arc<SpatialAirportIndex>,
    runtime: Handle,
    settle_delay: Duration,
    generation: AtomicU64,
    in_flight: Mutex<Option<CancellationToken>>,
    tx: Arc<watch::Sender<ViewportResult>>,
}

impl ViewportQueryWorker {
    pub fn new(index: Arc<SpatialAirportIndex>, runtime: Handle) -> Self {
        let (tx, _rx) = watch::channel(ViewportResult::default());
        Self {
            index,
            runtime,
            settle_delay: Duration::ZERO,
            generation: AtomicU64::new(0),
            in_flight: Mutex::new(None),
            tx: Arc::new(tx),
        }
    }

    /// Wait this long before querying, so rapid camera movement only
    /// queries the viewport it settles on.
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    pub fn settle_delay(&self) -> Duration {
        self.settle_delay
    }

    /// Start a query for `viewport`, superseding any earlier one.
    ///
    /// Returns the generation number the result will carry.
    pub fn submit(&self, viewport: Viewport, zoom: f64) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let token = CancellationToken::new();

        {
            let mut in_flight = self.in_flight.lock().expect("viewport worker lock poisoned");
            if let Some(previous) = in_flight.replace(token.clone()) {
                previous.cancel();
            }
        }

        let index = Arc::clone(&self.index);
        let tx = Arc::clone(&self.tx);
        let settle_delay = self.settle_delay;

        self.runtime.spawn(async move {
            if !settle_delay.is_zero() {
                tokio::select! {
                    _ = token.cancelled() => {
                        debug!(generation, "Viewport query superseded before start");
                        return;
                    }
                    _ = tokio::time::sleep(settle_delay) => {}
                }
            }

            let query_token = token.clone();
            let joined = tokio::task::spawn_blocking(move || {
                index.query_visible_cancellable(&viewport, zoom, &query_token)
            })
            .await;

            let (airports, error) = match joined {
                Ok(Ok(airports)) => (airports, None),
                Ok(Err(AirportQueryError::Cancelled)) => {
                    debug!(generation, "Viewport query cancelled");
                    return;
                }
                Ok(Err(e)) => {
                    warn!(generation, error = %e, "Viewport query failed");
                    (Vec::new(), Some(e.to_string()))
                }
                Err(e) => {
                    let e = AirportQueryError::TaskFailed(e.to_string());
                    warn!(generation, error = %e, "Viewport query task failed");
                    (Vec::new(), Some(e.to_string()))
                }
            };

            let count = airports.len();
            let published = tx.send_if_modified(|current| {
                if token.is_cancelled() || generation <= current.generation {
                    return false;
                }
                *current = ViewportResult {
                    generation,
                    viewport: Some(viewport),
                    zoom,
                    airports: Arc::new(airports),
                    error,
                };
                true
            });

            if published {
                debug!(generation, count, zoom, "Published viewport airports");
            } else {
                debug!(generation, "Discarded superseded viewport result");
            }
        });

        generation
    }

    /// Cancel the in-flight query, if any.
    pub fn cancel(&self) {
        let mut in_flight = self.in_flight.lock().expect("viewport worker lock poisoned");
        if let Some(token) = in_flight.take() {
            token.cancel();
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewportResult> {
        self.tx.subscribe()
    }

    /// Most recently published result.
    pub fn latest(&self) -> ViewportResult {
        self.tx.borrow().clone()
    }

    /// Generation of the most recent submission.
    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }
}

impl Drop for ViewportQueryWorker {
    fn drop(&mut self) {
        self.cancel();
    }
}
