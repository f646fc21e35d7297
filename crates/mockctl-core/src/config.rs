// ── Runtime connection configuration ──
//
// Describes how to reach a mock server. Never touches disk: the CLI and
// TUI build a `ClientConfig` from their profile and hand it in.

use std::path::PathBuf;
use std::time::Duration;

use mockctl_api::transport::{TlsMode, TransportConfig};
use mockctl_api::FlagEncoding;
use url::Url;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed certs on test servers).
    DangerAcceptInvalid,
}

/// Configuration for talking to a single mock server.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL (e.g., `http://localhost:9010`).
    pub url: Url,
    /// Group scope applied to list queries. `None` means every group.
    pub group: Option<String>,
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: Duration,
    /// Wire representation of yes/no flags.
    pub flag_encoding: FlagEncoding,
}

impl ClientConfig {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            group: None,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            flag_encoding: FlagEncoding::default(),
        }
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: match &self.tls {
                TlsVerification::SystemDefaults => TlsMode::System,
                TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
                TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
            },
            timeout: self.timeout,
        }
    }
}
