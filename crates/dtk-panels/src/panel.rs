//! The panel catalog.

use std::fmt;
use std::str::FromStr;

use dtk_core::SearchConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How a panel turns input into requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerMode {
    /// Every keystroke restarts a quiet-period timer.
    Debounced,
    /// Requests go out when the user presses a button.
    Immediate,
}

/// A toolkit panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelKind {
    Books,
    Movies,
    Music,
    Memes,
    Coding,
}

impl PanelKind {
    /// Every panel, in menu order.
    pub const ALL: [Self; 5] = [
        Self::Books,
        Self::Movies,
        Self::Music,
        Self::Memes,
        Self::Coding,
    ];

    /// Identifier used on the command line.
    #[must_use]
    pub const fn slug(&self) -> &'static str {
        match self {
            Self::Books => "books",
            Self::Movies => "movies",
            Self::Music => "music",
            Self::Memes => "memes",
            Self::Coding => "coding",
        }
    }

    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::Books => "Books Explorer",
            Self::Movies => "Movie Database",
            Self::Music => "Music Discovery",
            Self::Memes => "Meme Generator",
            Self::Coding => "Coding Challenges",
        }
    }

    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Books => "Search and explore books using the Google Books API",
            Self::Movies => "Discover movies using the OMDb API",
            Self::Music => "Explore music from a simulated streaming catalog",
            Self::Memes => "Create memes from a simulated template catalog",
            Self::Coding => "Find programming challenges from a simulated problem set",
        }
    }

    #[must_use]
    pub const fn icon(&self) -> &'static str {
        match self {
            Self::Books => "📚",
            Self::Movies => "🎬",
            Self::Music => "🎵",
            Self::Memes => "😂",
            Self::Coding => "💻",
        }
    }

    /// Plural noun for this panel's items, used in notifications.
    #[must_use]
    pub const fn noun(&self) -> &'static str {
        match self {
            Self::Books => "books",
            Self::Movies => "movies",
            Self::Music => "tracks",
            Self::Memes => "templates",
            Self::Coding => "problems",
        }
    }

    #[must_use]
    pub const fn trigger(&self) -> TriggerMode {
        match self {
            Self::Books | Self::Movies | Self::Music => TriggerMode::Debounced,
            Self::Memes | Self::Coding => TriggerMode::Immediate,
        }
    }

    /// Controller settings for this panel, starting from `base`.
    ///
    /// Button-triggered panels never debounce.
    #[must_use]
    pub fn search_config(&self, base: &SearchConfig) -> SearchConfig {
        match self.trigger() {
            TriggerMode::Debounced => base.clone(),
            TriggerMode::Immediate => base.clone().with_debounce_ms(0),
        }
    }
}

impl fmt::Display for PanelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Unknown panel name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown panel '{0}' (expected one of: books, movies, music, memes, coding)")]
pub struct ParsePanelError(pub String);

impl FromStr for PanelKind {
    type Err = ParsePanelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.slug() == wanted)
            .ok_or_else(|| ParsePanelError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips_slug() {
        for kind in PanelKind::ALL {
            assert_eq!(kind.slug().parse::<PanelKind>(), Ok(kind));
        }
        assert_eq!(" Movies ".parse::<PanelKind>(), Ok(PanelKind::Movies));
    }

    #[test]
    fn test_unknown_panel_is_rejected() {
        let err = "podcasts".parse::<PanelKind>().unwrap_err();
        assert!(err.to_string().contains("podcasts"));
    }

    #[test]
    fn test_button_panels_do_not_debounce() {
        let base = SearchConfig::default();
        assert_eq!(PanelKind::Coding.search_config(&base).debounce_ms, 0);
        assert_eq!(PanelKind::Memes.search_config(&base).debounce_ms, 0);
        assert_eq!(PanelKind::Books.search_config(&base), base);
    }
}
