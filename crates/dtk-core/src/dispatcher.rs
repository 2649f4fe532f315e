//! Request dispatch with generation tracking.
//!
//! Every accepted query becomes one spawned fetch task tagged with the next
//! generation. Completions are sent back over an unbounded channel in whatever
//! order the network produces them; the dispatcher only remembers which
//! generation is the latest so consumers can tell fresh outcomes from stale ones.

use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures_util::FutureExt;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tokio::time::Instant;

use crate::error::FetchError;
use crate::fetcher::Fetcher;
use crate::outcome::{Completion, SearchOutcome};
use crate::query::{Generation, Query};

/// A request owned by the dispatcher until it completes.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    /// Recency tag.
    pub generation: Generation,
    /// Query being fetched.
    pub query: Query,
    /// When the fetch was spawned.
    pub issued_at: Instant,
}

/// Dispatch counters, kept for diagnostics and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DispatchStats {
    /// Requests spawned.
    pub issued: u64,
    /// Completions from the latest generation.
    pub fresh: u64,
    /// Completions from superseded generations.
    pub stale: u64,
    /// Superseded tasks aborted before completing.
    pub aborted: u64,
}

#[derive(Debug)]
struct InFlight {
    request: SearchRequest,
    handle: AbortHandle,
}

/// Issues fetches for one panel and tracks their generations.
#[derive(Debug)]
pub struct RequestDispatcher<F: Fetcher> {
    fetcher: Arc<F>,
    completions: mpsc::UnboundedSender<Completion<F::Item>>,
    latest: Generation,
    in_flight: HashMap<Generation, InFlight>,
    timeout: Option<Duration>,
    cancel_superseded: bool,
    stats: DispatchStats,
}

impl<F: Fetcher> RequestDispatcher<F> {
    /// Create a dispatcher delivering completions to `completions`.
    pub fn new(fetcher: Arc<F>, completions: mpsc::UnboundedSender<Completion<F::Item>>) -> Self {
        Self {
            fetcher,
            completions,
            latest: Generation::NONE,
            in_flight: HashMap::new(),
            timeout: None,
            cancel_superseded: false,
            stats: DispatchStats::default(),
        }
    }

    /// Bound every fetch by `timeout`.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Abort superseded tasks when a newer dispatch happens.
    #[must_use]
    pub fn with_cancel_superseded(mut self, enable: bool) -> Self {
        self.cancel_superseded = enable;
        self
    }

    /// Allocate the next generation and start fetching `query`.
    ///
    /// Returns without waiting for the fetch. Must be called from within a
    /// tokio runtime.
    pub fn dispatch(&mut self, query: Query) -> Generation {
        let generation = self.latest.next();
        self.latest = generation;
        self.stats.issued += 1;

        if self.cancel_superseded {
            self.abort_all();
        }

        let request = SearchRequest {
            generation,
            query: query.clone(),
            issued_at: Instant::now(),
        };

        let fetcher = Arc::clone(&self.fetcher);
        let completions = self.completions.clone();
        let timeout = self.timeout;
        let task = tokio::spawn(async move {
            let outcome = execute(fetcher.as_ref(), query, timeout).await;
            // A closed receiver means the panel is gone; nobody is left to tell.
            let _ = completions.send(Completion {
                generation,
                outcome,
            });
        });

        tracing::debug!(%generation, query = %request.query, "request dispatched");
        self.in_flight.insert(
            generation,
            InFlight {
                request,
                handle: task.abort_handle(),
            },
        );
        generation
    }

    /// Retire a completed request.
    ///
    /// Returns `true` when `generation` has been superseded by a newer dispatch.
    pub fn complete(&mut self, generation: Generation) -> bool {
        if let Some(retired) = self.in_flight.remove(&generation) {
            tracing::trace!(
                %generation,
                elapsed_ms = retired.request.issued_at.elapsed().as_millis() as u64,
                "request retired"
            );
        }

        let stale = self.is_stale(generation);
        if stale {
            self.stats.stale += 1;
        } else {
            self.stats.fresh += 1;
        }
        stale
    }

    /// Whether a newer generation than `generation` has been issued.
    #[inline]
    pub fn is_stale(&self, generation: Generation) -> bool {
        generation < self.latest
    }

    /// Most recently issued generation.
    pub fn latest(&self) -> Option<Generation> {
        (self.latest != Generation::NONE).then_some(self.latest)
    }

    /// Whether any request has not completed yet.
    #[inline]
    pub fn has_in_flight(&self) -> bool {
        !self.in_flight.is_empty()
    }

    /// Abort every in-flight request.
    ///
    /// Aborted requests never deliver a completion.
    pub fn abort_all(&mut self) {
        for (generation, in_flight) in self.in_flight.drain() {
            in_flight.handle.abort();
            self.stats.aborted += 1;
            tracing::debug!(%generation, "request aborted");
        }
    }

    /// Counters so far.
    #[inline]
    pub fn stats(&self) -> DispatchStats {
        self.stats
    }
}

/// Run one fetch and fold every failure mode into an outcome.
async fn execute<F: Fetcher>(
    fetcher: &F,
    query: Query,
    timeout: Option<Duration>,
) -> SearchOutcome<F::Item> {
    // The call itself sits inside the guard: `search` may panic before
    // returning its future.
    let search = AssertUnwindSafe(async { fetcher.search(&query).await }).catch_unwind();
    let result = match timeout {
        Some(limit) => match tokio::time::timeout(limit, search).await {
            Ok(finished) => finished,
            Err(_) => Ok(Err(FetchError::Timeout {
                after_ms: limit.as_millis() as u64,
            })),
        },
        None => search.await,
    };

    let result = result.unwrap_or_else(|_| {
        tracing::error!(query = %query, "fetcher panicked");
        Err(FetchError::Network("fetcher panicked".to_string()))
    });

    if let Err(error) = &result {
        tracing::warn!(query = %query, %error, "fetch failed");
    }

    SearchOutcome::from_fetch(query, result)
}
