//! User-visible notifications.
//!
//! The controller reports every fresh, completed search through an injected
//! [`NotificationSink`]. Sinks are fire-and-forget: the controller never looks
//! at what happens to a notification afterwards.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};

/// Severity of a notification; decides icon and styling in a UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    /// Search completed with results.
    Success,
    /// Neutral information, such as an empty result set.
    Info,
    /// The user needs to correct something.
    Warning,
    /// Something failed.
    Error,
}

impl NotificationLevel {
    /// Lowercase label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A delivered notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Severity.
    pub level: NotificationLevel,
    /// Message text.
    pub message: String,
}

impl Notification {
    /// Create a notification.
    pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

/// Receiver of user-visible notifications.
pub trait NotificationSink: Send + Sync {
    /// Deliver a message at `level`.
    fn notify(&self, level: NotificationLevel, message: &str);

    /// Deliver a success message.
    fn success(&self, message: &str) {
        self.notify(NotificationLevel::Success, message);
    }

    /// Deliver an informational message.
    fn info(&self, message: &str) {
        self.notify(NotificationLevel::Info, message);
    }

    /// Deliver a warning.
    fn warning(&self, message: &str) {
        self.notify(NotificationLevel::Warning, message);
    }

    /// Deliver an error message.
    fn error(&self, message: &str) {
        self.notify(NotificationLevel::Error, message);
    }
}

impl<S: NotificationSink + ?Sized> NotificationSink for Arc<S> {
    fn notify(&self, level: NotificationLevel, message: &str) {
        (**self).notify(level, message);
    }
}

/// Sink that writes notifications to the `tracing` log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, level: NotificationLevel, message: &str) {
        match level {
            NotificationLevel::Success | NotificationLevel::Info => {
                tracing::info!(target: "dtk::notify", level = %level, "{message}");
            }
            NotificationLevel::Warning => tracing::warn!(target: "dtk::notify", "{message}"),
            NotificationLevel::Error => tracing::error!(target: "dtk::notify", "{message}"),
        }
    }
}

/// Sink that keeps every notification in memory.
///
/// Clones share the same buffer, so one clone can be handed to a controller
/// while another is inspected.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    records: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingSink {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far.
    pub fn notifications(&self) -> Vec<Notification> {
        self.lock().clone()
    }

    /// Remove and return everything recorded so far.
    pub fn take(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.lock())
    }

    /// Number of recorded notifications.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Notification>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, level: NotificationLevel, message: &str) {
        self.lock().push(Notification::new(level, message));
    }
}
