//! Panels of the dev toolkit.
//!
//! Each panel pairs a [`Fetcher`](dtk_core::Fetcher) with an item type the
//! terminal renderer knows how to print. Books and movies talk to public HTTP
//! APIs; music, coding problems and meme templates are served from simulated
//! catalogs with realistic latency.
//!
//! # Modules
//!
//! - [`books`] - Google Books volumes search
//! - [`movies`] - OMDb title search
//! - [`music`] - simulated track search and the preview player
//! - [`coding`] - simulated problem set with tag filtering
//! - [`memes`] - simulated template catalog and the meme composer

pub mod books;
pub mod coding;
pub mod memes;
pub mod movies;
pub mod music;

mod http;
mod item;
mod panel;
mod simulated;

pub use http::HttpClient;
pub use item::PanelItem;
pub use panel::{PanelKind, ParsePanelError, TriggerMode};
pub use simulated::Simulation;
