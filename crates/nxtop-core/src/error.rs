// ── Core error types ──
//
// Per-device failures never escape the device's own pipeline; they are
// folded into a failed `DeviceResult`. The remaining variants surface
// from setup (building the HTTP client) and are fatal to a run.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Per-device errors ────────────────────────────────────────────
    #[error("Fetch from {device} failed: {reason}")]
    FetchFailed { device: String, reason: String },

    #[error("Malformed interface record: {reason}")]
    MalformedRecord { reason: String },

    // ── Setup errors ─────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            reason: reason.into(),
        }
    }

    /// Wrap an API error as a fetch failure for `device`.
    pub fn fetch_failed(device: impl std::fmt::Display, err: &nxtop_api::Error) -> Self {
        Self::FetchFailed {
            device: device.to_string(),
            reason: err.to_string(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<nxtop_api::Error> for CoreError {
    fn from(err: nxtop_api::Error) -> Self {
        match err {
            nxtop_api::Error::Tls(msg) => CoreError::Config {
                message: format!("TLS setup failed: {msg}"),
            },
            nxtop_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid device address: {e}"),
            },
            other => CoreError::FetchFailed {
                device: "<unknown>".into(),
                reason: other.to_string(),
            },
        }
    }
}
