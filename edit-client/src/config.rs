//! Client configuration.
//!
//! All fields have serde defaults, so a config file only needs to name
//! what it changes.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for [`CollabClient`](crate::CollabClient) and its sync loops.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the quill-server.
    #[serde(default = "default_server_url")]
    pub server_url: String,
    /// Delay between polls for new records (milliseconds).
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Delay between forced full resyncs (milliseconds).
    #[serde(default = "default_resync_interval_ms")]
    pub resync_interval_ms: u64,
    /// Delay before retrying a failed connect (milliseconds).
    #[serde(default = "default_connect_retry_ms")]
    pub connect_retry_ms: u64,
    /// Local edits that may wait to be posted before new edits block.
    #[serde(default = "default_outbox_capacity")]
    pub outbox_capacity: usize,
}

fn default_server_url() -> String {
    "http://127.0.0.1:4444".to_string()
}

fn default_poll_interval_ms() -> u64 {
    100
}

fn default_resync_interval_ms() -> u64 {
    20_000
}

fn default_connect_retry_ms() -> u64 {
    1_000
}

fn default_outbox_capacity() -> usize {
    1024
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            poll_interval_ms: default_poll_interval_ms(),
            resync_interval_ms: default_resync_interval_ms(),
            connect_retry_ms: default_connect_retry_ms(),
            outbox_capacity: default_outbox_capacity(),
        }
    }
}

/// Whole milliseconds, saturating at `u64::MAX`.
fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Timers need a nonzero period.
const MIN_PERIOD: Duration = Duration::from_millis(1);

impl ClientConfig {
    /// Default configuration for the server at `server_url`.
    pub fn new(server_url: &str) -> Self {
        Self {
            server_url: server_url.to_string(),
            ..Self::default()
        }
    }

    /// Set the poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval_ms = millis(interval);
        self
    }

    /// Set the forced resync interval.
    pub fn with_resync_interval(mut self, interval: Duration) -> Self {
        self.resync_interval_ms = millis(interval);
        self
    }

    /// Set the connect retry delay.
    pub fn with_connect_retry(mut self, delay: Duration) -> Self {
        self.connect_retry_ms = millis(delay);
        self
    }

    /// Set the outbox capacity (at least 1).
    pub fn with_outbox_capacity(mut self, capacity: usize) -> Self {
        self.outbox_capacity = capacity.max(1);
        self
    }

    /// Poll interval as a [`Duration`] (at least 1 ms).
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms).max(MIN_PERIOD)
    }

    /// Resync interval as a [`Duration`] (at least 1 ms).
    pub fn resync_interval(&self) -> Duration {
        Duration::from_millis(self.resync_interval_ms).max(MIN_PERIOD)
    }

    /// Connect retry delay as a [`Duration`] (at least 1 ms).
    pub fn connect_retry(&self) -> Duration {
        Duration::from_millis(self.connect_retry_ms).max(MIN_PERIOD)
    }
}
