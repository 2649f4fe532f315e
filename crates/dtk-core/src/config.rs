//! Search coordination settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for one panel's search controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Debounce delay in milliseconds.
    ///
    /// After an input change the controller waits this long before
    /// dispatching. Further changes reset the timer. Zero dispatches on the
    /// next scheduler turn.
    pub debounce_ms: u64,

    /// Per-request timeout in milliseconds.
    ///
    /// A fetch running longer completes as a timeout failure. `None` leaves
    /// requests unbounded.
    pub request_timeout_ms: Option<u64>,

    /// Abort superseded fetch tasks instead of letting them finish.
    ///
    /// Aborted requests never report an outcome.
    pub cancel_in_flight: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 500,
            request_timeout_ms: Some(10_000),
            cancel_in_flight: false,
        }
    }
}

impl SearchConfig {
    /// Config for button-triggered panels: no debounce.
    #[must_use]
    pub fn immediate() -> Self {
        Self {
            debounce_ms: 0,
            ..Default::default()
        }
    }

    /// Override the debounce delay.
    #[must_use]
    pub fn with_debounce_ms(mut self, debounce_ms: u64) -> Self {
        self.debounce_ms = debounce_ms;
        self
    }

    /// Override the request timeout.
    #[must_use]
    pub fn with_request_timeout_ms(mut self, timeout_ms: Option<u64>) -> Self {
        self.request_timeout_ms = timeout_ms;
        self
    }

    /// Enable or disable aborting superseded requests.
    #[must_use]
    pub fn with_cancel_in_flight(mut self, enable: bool) -> Self {
        self.cancel_in_flight = enable;
        self
    }

    /// Debounce delay as a duration.
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Request timeout as a duration.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SearchConfig::default();
        assert_eq!(config.debounce(), Duration::from_millis(500));
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(10)));
        assert!(!config.cancel_in_flight);
    }

    #[test]
    fn test_immediate_config() {
        assert_eq!(SearchConfig::immediate().debounce(), Duration::ZERO);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SearchConfig = serde_json::from_str(r#"{"debounce_ms": 250}"#).unwrap();
        assert_eq!(config.debounce_ms, 250);
        assert_eq!(config.request_timeout_ms, Some(10_000));
    }

    #[test]
    fn test_builder_overrides() {
        let config = SearchConfig::default()
            .with_debounce_ms(0)
            .with_request_timeout_ms(None)
            .with_cancel_in_flight(true);
        assert_eq!(config.debounce_ms, 0);
        assert!(config.request_timeout().is_none());
        assert!(config.cancel_in_flight);
    }
}
