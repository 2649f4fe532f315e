//! The search phase machine a panel renders from.

use serde::Serialize;

use crate::error::ErrorKind;
use crate::outcome::SearchOutcome;
use crate::query::{Generation, Query};

/// Phase of a panel's search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchPhase {
    /// Nothing entered.
    #[default]
    Idle,
    /// Input changed; waiting for the quiet period.
    Debouncing,
    /// A request for the current query is in flight.
    Loading,
    /// Results are shown.
    Success,
    /// The query matched nothing.
    Empty,
    /// The last search failed.
    Error,
}

impl SearchPhase {
    /// Lowercase label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Debouncing => "debouncing",
            Self::Loading => "loading",
            Self::Success => "success",
            Self::Empty => "empty",
            Self::Error => "error",
        }
    }

    /// Whether a search has finished in this phase.
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        matches!(self, Self::Success | Self::Empty | Self::Error)
    }
}

/// Read-only view of a panel's search.
///
/// Only the owning [`SearchController`](crate::SearchController) mutates it.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchState<T> {
    phase: SearchPhase,
    query: Option<Query>,
    items: Vec<T>,
    last_error: Option<ErrorKind>,
    applied: Option<Generation>,
}

impl<T> Default for SearchState<T> {
    fn default() -> Self {
        Self {
            phase: SearchPhase::Idle,
            query: None,
            items: Vec::new(),
            last_error: None,
            applied: None,
        }
    }
}

impl<T> SearchState<T> {
    /// Current phase.
    #[inline]
    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    /// Latest accepted query; `None` while idle.
    pub fn query(&self) -> Option<&Query> {
        self.query.as_ref()
    }

    /// Items of the most recently applied outcome.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Failure reason of the last applied outcome, if it failed.
    pub fn last_error(&self) -> Option<ErrorKind> {
        self.last_error
    }

    /// Generation whose outcome is currently shown.
    pub fn applied_generation(&self) -> Option<Generation> {
        self.applied
    }

    /// Whether a request is in flight for the current query.
    #[inline]
    pub fn is_loading(&self) -> bool {
        self.phase == SearchPhase::Loading
    }

    /// Input cleared: back to the initial state.
    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }

    /// New input accepted; previous results stay visible until a request starts.
    pub(crate) fn begin_debounce(&mut self, query: Query) {
        self.phase = SearchPhase::Debouncing;
        self.query = Some(query);
    }

    /// A request started; previous results are cleared.
    pub(crate) fn begin_loading(&mut self, query: Query) {
        self.phase = SearchPhase::Loading;
        self.query = Some(query);
        self.items.clear();
        self.last_error = None;
    }

    /// Apply the outcome of the active generation.
    pub(crate) fn apply(&mut self, generation: Generation, outcome: SearchOutcome<T>) {
        self.applied = Some(generation);
        match outcome {
            SearchOutcome::Success { items, query } => {
                self.phase = SearchPhase::Success;
                self.query = Some(query);
                self.items = items;
                self.last_error = None;
            }
            SearchOutcome::Empty { query } => {
                self.phase = SearchPhase::Empty;
                self.query = Some(query);
                self.items.clear();
                self.last_error = None;
            }
            SearchOutcome::Failure { reason, query } => {
                self.phase = SearchPhase::Error;
                self.query = Some(query);
                self.items.clear();
                self.last_error = Some(reason);
            }
        }
    }
}
