//! Persisted toolkit settings.
//!
//! Settings live in a TOML file in the user's config directory. Every section
//! is optional; missing keys fall back to their defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use dtk_core::SearchConfig;
use dtk_panels::{books, coding, memes, movies, music};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors reading or writing the settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("failed to write settings to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SettingsError {
    /// Returns a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Read { path, .. } => format!("Could not read {}", path.display()),
            Self::Parse { path, .. } => format!(
                "{} is not a valid settings file. Fix or delete it to use the defaults.",
                path.display()
            ),
            Self::Serialize(_) => "Settings could not be saved.".to_string(),
            Self::Write { path, .. } => format!("Could not write {}", path.display()),
        }
    }
}

/// Toolkit settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Debounce and timeout settings shared by every panel.
    pub search: SearchConfig,

    pub books: BooksSettings,

    pub movies: MoviesSettings,

    /// Latency and seed of the simulated panels.
    pub simulation: SimulationSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BooksSettings {
    pub base_url: String,
    pub max_results: u32,
}

impl Default for BooksSettings {
    fn default() -> Self {
        Self {
            base_url: books::DEFAULT_BASE_URL.to_string(),
            max_results: books::DEFAULT_MAX_RESULTS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoviesSettings {
    pub base_url: String,
    pub api_key: String,
}

impl Default for MoviesSettings {
    fn default() -> Self {
        Self {
            base_url: movies::DEFAULT_BASE_URL.to_string(),
            api_key: movies::DEFAULT_API_KEY.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    pub music_latency_ms: u64,
    pub coding_latency_ms: u64,
    pub memes_latency_ms: u64,
    /// Fixed seed for reproducible catalogs. Random when unset.
    pub seed: Option<u64>,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            music_latency_ms: music::DEFAULT_LATENCY.as_millis() as u64,
            coding_latency_ms: coding::DEFAULT_LATENCY.as_millis() as u64,
            memes_latency_ms: memes::DEFAULT_LATENCY.as_millis() as u64,
            seed: None,
        }
    }
}

impl SimulationSettings {
    pub fn music_latency(&self) -> Duration {
        Duration::from_millis(self.music_latency_ms)
    }

    pub fn coding_latency(&self) -> Duration {
        Duration::from_millis(self.coding_latency_ms)
    }

    pub fn memes_latency(&self) -> Duration {
        Duration::from_millis(self.memes_latency_ms)
    }
}

impl Settings {
    /// Load settings from `path`.
    ///
    /// A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no settings file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(SettingsError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        toml::from_str(&content).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save settings to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        let write_error = |source| SettingsError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_error)?;
        }
        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(write_error)
    }

    /// Settings as pretty TOML.
    pub fn to_toml(&self) -> Result<String, SettingsError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Get the default config file path.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "DevToolkit", "dev-toolkit")
            .map(|dirs| dirs.config_dir().join("settings.toml"))
            .unwrap_or_else(|| PathBuf::from("settings.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(
            &path,
            "[search]\ndebounce_ms = 250\n\n[simulation]\nseed = 7\n",
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap();

        assert_eq!(settings.search.debounce_ms, 250);
        assert_eq!(settings.search.request_timeout_ms, Some(10_000));
        assert_eq!(settings.simulation.seed, Some(7));
        assert_eq!(settings.simulation.music_latency_ms, 1_000);
        assert_eq!(settings.books, BooksSettings::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.toml");
        let mut settings = Settings::default();
        settings.movies.api_key = "secret".to_string();
        settings.search.cancel_in_flight = true;

        settings.save_to(&path).unwrap();

        assert_eq!(Settings::load_from(&path).unwrap(), settings);
    }

    #[test]
    fn test_invalid_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "[search]\ndebounce_ms = \"soon\"\n").unwrap();

        let err = Settings::load_from(&path).unwrap_err();

        assert!(matches!(err, SettingsError::Parse { .. }));
        assert!(err.user_message().contains("not a valid settings file"));
    }

    #[test]
    fn test_config_path_ends_with_settings_file() {
        assert!(Settings::config_path().ends_with("settings.toml"));
    }
}
