//! The asynchronous lookup capability a panel plugs into its controller.

use std::future::Future;

use crate::error::FetchError;
use crate::query::Query;

/// Source of search results for one panel.
///
/// Implementations hold the panel specific HTTP or simulated calls. The core
/// never inspects the returned items, it only keeps their order.
pub trait Fetcher: Send + Sync + 'static {
    /// Result payload (book, movie, track, ...).
    type Item: Send + 'static;

    /// Look up `query`, returning the matching items in display order.
    ///
    /// An empty vector is a well-formed "no results" answer.
    fn search(
        &self,
        query: &Query,
    ) -> impl Future<Output = Result<Vec<Self::Item>, FetchError>> + Send;
}
