//! Music panel: a simulated track catalog and the preview player.

use std::time::Duration;

use dtk_core::{FetchError, Fetcher, NotificationSink, Query};
use rand::Rng;
use serde::Serialize;
use tokio::time::Instant;
use uuid::Uuid;

use crate::item::PanelItem;
use crate::simulated::{Simulation, random_uuid};

/// Latency of the simulated catalog.
pub const DEFAULT_LATENCY: Duration = Duration::from_millis(1_000);

/// Tracks returned per search.
pub const TRACKS_PER_SEARCH: usize = 10;

/// How long a preview plays before stopping on its own.
pub const PREVIEW_LENGTH: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Track {
    pub id: Uuid,
    pub name: String,
    pub artists: Vec<String>,
    pub album: String,
    pub duration_secs: u32,
    pub preview_url: Option<String>,
}

impl Track {
    /// Duration as `m:ss`.
    #[must_use]
    pub fn duration_label(&self) -> String {
        format!("{}:{:02}", self.duration_secs / 60, self.duration_secs % 60)
    }

    #[must_use]
    pub fn artists_label(&self) -> String {
        self.artists.join(", ")
    }
}

impl PanelItem for Track {
    fn headers() -> &'static [&'static str] {
        &["Track", "Artists", "Album", "Length"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.artists_label(),
            self.album.clone(),
            self.duration_label(),
        ]
    }
}

/// Ten tracks named after `query`.
fn generate_tracks(query: &str, rng: &mut impl Rng) -> Vec<Track> {
    (0..TRACKS_PER_SEARCH)
        .map(|index| {
            let mut artists = vec![format!("Artist {}", index % 3 + 1)];
            if index % 2 == 0 {
                artists.push("Featured Artist".to_string());
            }
            Track {
                id: random_uuid(&mut *rng),
                name: format!("{query} Song {}", index + 1),
                artists,
                album: format!("{query} Album {}", index / 3 + 1),
                duration_secs: rng.random_range(120..300),
                preview_url: None,
            }
        })
        .collect()
}

/// Fetcher for the music panel.
#[derive(Debug)]
pub struct SimulatedMusicFetcher {
    simulation: Simulation,
}

impl SimulatedMusicFetcher {
    pub fn new(simulation: Simulation) -> Self {
        Self { simulation }
    }
}

impl Default for SimulatedMusicFetcher {
    fn default() -> Self {
        Self::new(Simulation::new(DEFAULT_LATENCY, None))
    }
}

impl Fetcher for SimulatedMusicFetcher {
    type Item = Track;

    async fn search(&self, query: &Query) -> Result<Vec<Track>, FetchError> {
        self.simulation.delay().await;
        Ok(self
            .simulation
            .with_rng(|rng| generate_tracks(query.as_str(), rng)))
    }
}

/// What a [`PreviewPlayer::toggle`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewChange {
    Started,
    Stopped,
}

#[derive(Debug)]
struct Playing {
    track: Uuid,
    started: Instant,
}

/// Plays one track preview at a time.
///
/// Toggling the playing track stops it; toggling another track switches to
/// it. A preview stops by itself after [`PREVIEW_LENGTH`].
#[derive(Debug, Default)]
pub struct PreviewPlayer {
    playing: Option<Playing>,
}

impl PreviewPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start or stop the preview of `track`, announcing starts on `sink`.
    pub fn toggle(&mut self, track: &Track, sink: &dyn NotificationSink) -> PreviewChange {
        self.toggle_at(Instant::now(), track, sink)
    }

    pub fn toggle_at(
        &mut self,
        now: Instant,
        track: &Track,
        sink: &dyn NotificationSink,
    ) -> PreviewChange {
        if self.now_playing_at(now) == Some(track.id) {
            self.playing = None;
            tracing::debug!(track = %track.name, "preview stopped");
            return PreviewChange::Stopped;
        }

        self.playing = Some(Playing {
            track: track.id,
            started: now,
        });
        sink.info(&format!(
            "Playing: {} by {}",
            track.name,
            track.artists_label()
        ));
        PreviewChange::Started
    }

    /// Track currently previewing.
    pub fn now_playing(&mut self) -> Option<Uuid> {
        self.now_playing_at(Instant::now())
    }

    pub fn now_playing_at(&mut self, now: Instant) -> Option<Uuid> {
        let expired = self
            .playing
            .as_ref()
            .is_some_and(|playing| now.duration_since(playing.started) >= PREVIEW_LENGTH);
        if expired {
            self.playing = None;
        }
        self.playing.as_ref().map(|playing| playing.track)
    }

    /// Stop whatever is playing.
    pub fn stop(&mut self) {
        self.playing = None;
    }
}
