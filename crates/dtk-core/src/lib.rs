//! Search coordination for the dev toolkit panels.
//!
//! Every panel of the toolkit (books, movies, music, coding problems, meme
//! templates) turns a rapidly changing text box into remote lookups. This crate
//! holds the engine those panels share: it throttles requests, tags each one
//! with a generation number, and makes sure a superseded response can never
//! overwrite fresher results.
//!
//! # Architecture
//!
//! - `debounce` - [`Debouncer`], an owned timer value with a single pending action
//! - `dispatcher` - [`RequestDispatcher`], generation allocation and fetch tasks
//! - `state` - [`SearchState`], the phase machine renderers read from
//! - `controller` - [`SearchController`], per-panel orchestration
//! - `notify` - [`NotificationSink`] and the built-in sinks
//! - `fetcher` - the [`Fetcher`] capability panels implement
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use dtk_core::{RecordingSink, SearchConfig, SearchController};
//!
//! let sink = RecordingSink::new();
//! let mut controller = SearchController::new(
//!     "books",
//!     Arc::new(fetcher),
//!     Arc::new(sink.clone()),
//!     &SearchConfig::default(),
//! );
//!
//! controller.on_input("bat");
//! controller.on_input("batman");
//! controller.settle().await;
//!
//! assert_eq!(sink.len(), 1);
//! ```

mod config;
mod controller;
mod debounce;
mod dispatcher;
mod error;
mod fetcher;
mod notify;
mod outcome;
mod query;
mod state;

pub use config::SearchConfig;
pub use controller::{ControllerEvent, ControllerStats, Disposition, PanelCommand, SearchController};
pub use debounce::Debouncer;
pub use dispatcher::{DispatchStats, RequestDispatcher, SearchRequest};
pub use error::{ErrorKind, FetchError, QueryError};
pub use fetcher::Fetcher;
pub use notify::{Notification, NotificationLevel, NotificationSink, RecordingSink, TracingSink};
pub use outcome::{Completion, SearchOutcome};
pub use query::{Generation, Query};
pub use state::{SearchPhase, SearchState};
