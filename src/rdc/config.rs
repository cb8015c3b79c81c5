//! Timeout policy for the correlation engine.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default per-request bound.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RdcConfig {
    /// Per-request bound in milliseconds. `None` waits forever.
    pub request_timeout_ms: Option<u64>,
}

impl Default for RdcConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: Some(DEFAULT_REQUEST_TIMEOUT_MS),
        }
    }
}

impl RdcConfig {
    /// Bound every request by `timeout`.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            request_timeout_ms: Some(timeout.as_millis() as u64),
        }
    }

    /// Wait for replies indefinitely.
    #[deprecated(note = "requests that are never answered hang forever; use `with_timeout`")]
    pub fn unbounded() -> Self {
        Self {
            request_timeout_ms: None,
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }
}
