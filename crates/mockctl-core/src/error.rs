// ── Core error types ──
//
// User-facing errors from mockctl-core. The `From<mockctl_api::Error>`
// impl translates transport-layer failures into domain variants while
// keeping the server's response payload intact for alerts.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach mock server at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Mock server request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Server responses ─────────────────────────────────────────────
    /// The server answered with a non-success status. `payload` is the
    /// response body exactly as received.
    #[error("Server rejected the request (HTTP {status}): {payload}")]
    Rejected { status: u16, payload: String },

    #[error("Unexpected response from server: {message}")]
    Decode { message: String, body: String },

    // ── Record editing ───────────────────────────────────────────────
    #[error("Unknown {kind} field: {field}")]
    UnknownField { kind: &'static str, field: String },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    #[error("No {kind} is loaded")]
    NothingLoaded { kind: &'static str },

    #[error("Invalid route: {0}")]
    InvalidRoute(String),

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Text shown in a blocking alert: the server's raw payload when one
    /// exists, otherwise the error message.
    pub fn payload(&self) -> String {
        match self {
            Self::Rejected { payload, .. } => payload.clone(),
            Self::Decode { body, .. } if !body.is_empty() => body.clone(),
            other => other.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Rejected { status: 404, .. })
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            message: message.into(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<mockctl_api::Error> for CoreError {
    fn from(err: mockctl_api::Error) -> Self {
        match err {
            mockctl_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                }
            }
            mockctl_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            mockctl_api::Error::InvalidBaseUrl(url) => CoreError::Config {
                message: format!("Base URL cannot carry API paths: {url}"),
            },
            mockctl_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            mockctl_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            mockctl_api::Error::Api { status, body } => CoreError::Rejected {
                status,
                payload: body,
            },
            mockctl_api::Error::Deserialization { message, body } => {
                CoreError::Decode { message, body }
            }
            mockctl_api::Error::Serialization(msg) => CoreError::Internal(msg),
        }
    }
}
