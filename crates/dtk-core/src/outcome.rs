//! Search outcomes and the completion payload delivered by the dispatcher.

use crate::error::{ErrorKind, FetchError};
use crate::query::{Generation, Query};

/// Result of one completed search.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome<T> {
    /// At least one item matched.
    Success {
        /// Items in display order.
        items: Vec<T>,
        /// Query the items answer.
        query: Query,
    },
    /// The source answered with no items.
    Empty {
        /// Query that matched nothing.
        query: Query,
    },
    /// The fetch failed.
    Failure {
        /// Failure classification.
        reason: ErrorKind,
        /// Query that failed.
        query: Query,
    },
}

impl<T> SearchOutcome<T> {
    /// Classify a fetch result for `query`.
    pub fn from_fetch(query: Query, result: Result<Vec<T>, FetchError>) -> Self {
        match result {
            Ok(items) if items.is_empty() => Self::Empty { query },
            Ok(items) => Self::Success { items, query },
            Err(error) => Self::Failure {
                reason: error.kind(),
                query,
            },
        }
    }

    /// Query this outcome belongs to.
    pub fn query(&self) -> &Query {
        match self {
            Self::Success { query, .. } | Self::Empty { query } | Self::Failure { query, .. } => {
                query
            }
        }
    }

    /// Number of items carried.
    pub fn item_count(&self) -> usize {
        match self {
            Self::Success { items, .. } => items.len(),
            Self::Empty { .. } | Self::Failure { .. } => 0,
        }
    }

    /// Short label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Success { .. } => "success",
            Self::Empty { .. } => "empty",
            Self::Failure { .. } => "failure",
        }
    }
}

/// Asynchronous completion of a dispatched request.
#[derive(Debug)]
pub struct Completion<T> {
    /// Generation the request was issued with.
    pub generation: Generation,
    /// What the fetch produced.
    pub outcome: SearchOutcome<T>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(text: &str) -> Query {
        Query::parse(text).unwrap()
    }

    #[test]
    fn test_from_fetch_classifies_results() {
        let success = SearchOutcome::from_fetch(query("dune"), Ok(vec![1, 2, 3]));
        assert_eq!(success.label(), "success");
        assert_eq!(success.item_count(), 3);

        let empty = SearchOutcome::<u8>::from_fetch(query("zzzz"), Ok(Vec::new()));
        assert_eq!(empty, SearchOutcome::Empty { query: query("zzzz") });

        let failure =
            SearchOutcome::<u8>::from_fetch(query("dune"), Err(FetchError::Timeout { after_ms: 5 }));
        assert_eq!(
            failure,
            SearchOutcome::Failure {
                reason: ErrorKind::Timeout,
                query: query("dune"),
            }
        );
        assert_eq!(failure.query().as_str(), "dune");
    }
}
