//! Per-panel search orchestration.
//!
//! The controller is the only writer of a panel's [`SearchState`]. It feeds
//! raw input through the debouncer, dispatches accepted queries, and decides
//! for every completion whether it is fresh (applied and announced) or stale
//! (counted and dropped).
//!
//! # Transitions
//!
//! | From | Event | To |
//! |------|-------|----|
//! | any | non-empty input | `debouncing` |
//! | any | empty input | `idle` |
//! | `debouncing` | timer fires | `loading` |
//! | `loading` | outcome of the active generation | `success` / `empty` / `error` |
//! | `loading` | outcome of another generation | unchanged |
//!
//! All mutation happens on the task that owns the controller; fetch tasks only
//! talk back through the completion channel.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{mpsc, watch};

use crate::config::SearchConfig;
use crate::debounce::Debouncer;
use crate::dispatcher::{DispatchStats, RequestDispatcher};
use crate::fetcher::Fetcher;
use crate::notify::{NotificationLevel, NotificationSink};
use crate::outcome::{Completion, SearchOutcome};
use crate::query::{Generation, Query};
use crate::state::SearchState;

/// Commands accepted by [`SearchController::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelCommand {
    /// The search box now contains this text.
    Input(String),
    /// Search this text right away, skipping the debounce.
    Submit(String),
    /// Re-run the current query right away.
    Refresh,
    /// Clear the search box.
    Clear,
    /// Let pending work settle, then stop.
    Finish,
    /// Stop immediately.
    Dispose,
}

/// What happened to a completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Disposition {
    /// Fresh outcome: state updated and one notification sent.
    Applied,
    /// Superseded outcome: ignored.
    Stale,
    /// Arrived after disposal: ignored.
    Disposed,
}

/// Event processed by [`SearchController::step`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEvent {
    /// The debounce timer fired and a request went out.
    Dispatched {
        /// Generation of the new request.
        generation: Generation,
        /// Query sent.
        query: Query,
    },
    /// A request completed.
    Completed {
        /// Generation of the completed request.
        generation: Generation,
        /// How the outcome was treated.
        disposition: Disposition,
    },
}

/// Controller counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ControllerStats {
    /// Input events received.
    pub inputs: u64,
    /// Requests dispatched.
    pub dispatched: u64,
    /// Outcomes applied to the state.
    pub applied: u64,
    /// Outcomes ignored because a newer request superseded them.
    pub stale_discarded: u64,
    /// Outcomes ignored because the panel was disposed.
    pub discarded_after_dispose: u64,
    /// Notifications sent.
    pub notifications: u64,
}

/// Search coordinator for one panel.
pub struct SearchController<F: Fetcher> {
    noun: String,
    debouncer: Debouncer<Query>,
    dispatcher: RequestDispatcher<F>,
    completions: mpsc::UnboundedReceiver<Completion<F::Item>>,
    state: watch::Sender<SearchState<F::Item>>,
    sink: Arc<dyn NotificationSink>,
    active: Option<Generation>,
    disposed: bool,
    stats: ControllerStats,
}

impl<F: Fetcher> SearchController<F> {
    /// Create a controller.
    ///
    /// `noun` names the panel's items in notifications ("books", "movies").
    pub fn new(
        noun: impl Into<String>,
        fetcher: Arc<F>,
        sink: Arc<dyn NotificationSink>,
        config: &SearchConfig,
    ) -> Self {
        let (completion_tx, completions) = mpsc::unbounded_channel();
        let dispatcher = RequestDispatcher::new(fetcher, completion_tx)
            .with_timeout(config.request_timeout())
            .with_cancel_superseded(config.cancel_in_flight);
        let (state, _) = watch::channel(SearchState::default());

        Self {
            noun: noun.into(),
            debouncer: Debouncer::new(config.debounce()),
            dispatcher,
            completions,
            state,
            sink,
            active: None,
            disposed: false,
            stats: ControllerStats::default(),
        }
    }

    /// Item noun used in notifications.
    pub fn noun(&self) -> &str {
        &self.noun
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<SearchState<F::Item>> {
        self.state.subscribe()
    }

    /// Borrow the current state.
    pub fn state(&self) -> watch::Ref<'_, SearchState<F::Item>> {
        self.state.borrow()
    }

    /// Generation whose outcome would currently be applied.
    pub fn active_generation(&self) -> Option<Generation> {
        self.active
    }

    /// Whether [`dispose`](Self::dispose) has been called.
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Controller counters.
    pub fn stats(&self) -> ControllerStats {
        self.stats
    }

    /// Dispatcher counters.
    pub fn dispatch_stats(&self) -> DispatchStats {
        self.dispatcher.stats()
    }

    /// Whether no timer is armed and no request is in flight.
    pub fn is_quiescent(&self) -> bool {
        !self.debouncer.is_pending() && !self.dispatcher.has_in_flight()
    }

    /// The search box changed to `raw`.
    ///
    /// Blank input clears the panel; anything else (re)starts the debounce timer.
    pub fn on_input(&mut self, raw: &str) {
        if self.disposed {
            return;
        }
        self.stats.inputs += 1;

        let Ok(query) = Query::parse(raw) else {
            self.clear();
            return;
        };

        let deadline = self.debouncer.schedule(query.clone());
        tracing::trace!(panel = %self.noun, query = %query, ?deadline, "input debounced");
        self.state.send_modify(|state| state.begin_debounce(query));
    }

    /// Clear the panel.
    ///
    /// Cancels the debounce timer. In-flight requests keep running, but their
    /// outcomes are stale from now on.
    pub fn clear(&mut self) {
        if self.disposed {
            return;
        }
        if self.debouncer.cancel_all() {
            tracing::trace!(panel = %self.noun, "pending search cancelled");
        }
        self.active = None;
        self.state.send_modify(SearchState::reset);
    }

    /// Search `raw` immediately, bypassing the debounce.
    ///
    /// Blank input clears the panel and dispatches nothing.
    pub fn submit(&mut self, raw: &str) -> Option<Generation> {
        if self.disposed {
            return None;
        }
        self.stats.inputs += 1;

        let Ok(query) = Query::parse(raw) else {
            self.clear();
            return None;
        };
        self.debouncer.cancel_all();
        Some(self.run_search(query))
    }

    /// Re-run the current query immediately.
    ///
    /// Does nothing while idle.
    pub fn refresh(&mut self) -> Option<Generation> {
        if self.disposed {
            return None;
        }
        let query = self.state.borrow().query().cloned()?;
        self.debouncer.cancel_all();
        Some(self.run_search(query))
    }

    fn run_search(&mut self, query: Query) -> Generation {
        let generation = self.dispatcher.dispatch(query.clone());
        self.active = Some(generation);
        self.stats.dispatched += 1;
        tracing::debug!(panel = %self.noun, %generation, query = %query, "search started");
        self.state.send_modify(|state| state.begin_loading(query));
        generation
    }

    /// Apply or discard a completion.
    pub fn on_result(&mut self, completion: Completion<F::Item>) -> Disposition {
        let Completion {
            generation,
            outcome,
        } = completion;
        let superseded = self.dispatcher.complete(generation);

        if self.disposed {
            self.stats.discarded_after_dispose += 1;
            tracing::trace!(panel = %self.noun, %generation, "outcome after dispose ignored");
            return Disposition::Disposed;
        }

        if superseded || self.active != Some(generation) {
            self.stats.stale_discarded += 1;
            tracing::debug!(
                panel = %self.noun,
                %generation,
                active = ?self.active,
                "stale outcome discarded"
            );
            return Disposition::Stale;
        }

        // First arrival wins; a duplicate for this generation is stale.
        self.active = None;
        self.stats.applied += 1;

        let (level, message) = self.describe(&outcome);
        tracing::info!(
            panel = %self.noun,
            %generation,
            query = %outcome.query(),
            items = outcome.item_count(),
            outcome = outcome.label(),
            "search completed"
        );
        let pending = self.debouncer.pending().cloned();
        self.state.send_modify(|state| {
            state.apply(generation, outcome);
            // Newer input is still in its quiet period; the panel keeps showing it.
            if let Some(query) = pending {
                state.begin_debounce(query);
            }
        });

        self.sink.notify(level, &message);
        self.stats.notifications += 1;
        Disposition::Applied
    }

    fn describe(&self, outcome: &SearchOutcome<F::Item>) -> (NotificationLevel, String) {
        let noun = &self.noun;
        match outcome {
            SearchOutcome::Success { items, query } => (
                NotificationLevel::Success,
                format!("Found {} {noun} for \"{query}\"", items.len()),
            ),
            SearchOutcome::Empty { query } => (
                NotificationLevel::Info,
                format!("No {noun} found for \"{query}\""),
            ),
            SearchOutcome::Failure { reason, .. } => {
                (NotificationLevel::Error, reason.user_message(noun))
            }
        }
    }

    /// Wait for the next timer or completion and process it.
    ///
    /// Returns `None` once nothing is pending.
    pub async fn step(&mut self) -> Option<ControllerEvent> {
        if self.is_quiescent() {
            return None;
        }

        tokio::select! {
            biased;

            completion = self.completions.recv() => {
                let completion = completion?;
                let generation = completion.generation;
                let disposition = self.on_result(completion);
                Some(ControllerEvent::Completed { generation, disposition })
            }
            query = self.debouncer.fired() => {
                let generation = self.run_search(query.clone());
                Some(ControllerEvent::Dispatched { generation, query })
            }
        }
    }

    /// Process events until nothing is pending.
    pub async fn settle(&mut self) -> Vec<ControllerEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.step().await {
            events.push(event);
        }
        events
    }

    /// Drive the controller from a command channel until told to stop.
    ///
    /// A closed channel behaves like [`PanelCommand::Finish`]. The controller
    /// is disposed on return.
    pub async fn run(mut self, mut commands: mpsc::UnboundedReceiver<PanelCommand>) -> ControllerStats {
        loop {
            tokio::select! {
                biased;

                command = commands.recv() => match command {
                    Some(PanelCommand::Input(text)) => self.on_input(&text),
                    Some(PanelCommand::Submit(text)) => {
                        self.submit(&text);
                    }
                    Some(PanelCommand::Refresh) => {
                        self.refresh();
                    }
                    Some(PanelCommand::Clear) => self.clear(),
                    Some(PanelCommand::Finish) | None => {
                        self.settle().await;
                        break;
                    }
                    Some(PanelCommand::Dispose) => break,
                },
                Some(completion) = self.completions.recv() => {
                    self.on_result(completion);
                }
                query = self.debouncer.fired() => {
                    self.run_search(query);
                }
            }
        }

        self.dispose();
        self.stats
    }

    /// Tear the panel down.
    ///
    /// Cancels the debounce timer. No outcome changes the state or notifies
    /// after this, whatever its generation.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.debouncer.cancel_all();
        self.active = None;
        self.disposed = true;
        tracing::debug!(panel = %self.noun, in_flight = self.dispatcher.has_in_flight(), "panel disposed");
    }
}
