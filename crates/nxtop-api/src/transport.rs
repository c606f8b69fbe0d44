// Shared transport configuration for building reqwest::Client instances.
//
// One client is built per run and shared by every device poll, so TLS
// and timeout settings live here instead of on each request.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::warn;

/// TLS verification mode (api-level mirror of core's TlsVerification).
#[derive(Debug, Clone, Default)]
pub enum TlsMode {
    /// Use the system certificate store.
    #[default]
    System,
    /// Use a custom CA certificate from the given PEM file.
    CustomCa(PathBuf),
    /// Accept any certificate (lab switches with self-signed certs).
    DangerAcceptInvalid,
}

/// URL scheme NX-API is reached on.
///
/// NX-OS serves the API over HTTPS by default; `nxapi http port 80`
/// enables the plain variant.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    #[default]
    Https,
    Http,
}

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::System,
            timeout: Duration::from_secs(30),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, crate::error::Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("nxtop/", env!("CARGO_PKG_VERSION")));

        match &self.tls {
            TlsMode::System => {}
            TlsMode::CustomCa(path) => {
                let cert_pem = std::fs::read(path).map_err(|e| {
                    crate::error::Error::Tls(format!("failed to read CA cert: {e}"))
                })?;
                let cert = reqwest::Certificate::from_pem(&cert_pem)
                    .map_err(|e| crate::error::Error::Tls(format!("invalid CA cert: {e}")))?;
                builder = builder.add_root_certificate(cert);
            }
            TlsMode::DangerAcceptInvalid => {
                warn!("TLS certificate verification is DISABLED for all device connections");
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        builder
            .build()
            .map_err(|e| crate::error::Error::Tls(format!("failed to build HTTP client: {e}")))
    }

    /// Whether certificate verification has been turned off.
    pub fn is_insecure(&self) -> bool {
        matches!(self.tls, TlsMode::DangerAcceptInvalid)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_transport_verifies_certificates() {
        let transport = TransportConfig::default();
        assert!(!transport.is_insecure());
        assert_eq!(transport.timeout, Duration::from_secs(30));
    }

    #[test]
    fn scheme_parses_case_insensitively() {
        assert_eq!("HTTPS".parse::<Scheme>().unwrap(), Scheme::Https);
        assert_eq!("http".parse::<Scheme>().unwrap(), Scheme::Http);
        assert!("ftp".parse::<Scheme>().is_err());
        assert_eq!(Scheme::Https.to_string(), "https");
    }

    #[test]
    fn missing_ca_file_is_a_tls_error() {
        let transport = TransportConfig {
            tls: TlsMode::CustomCa(PathBuf::from("/nonexistent/nxtop-ca.pem")),
            ..TransportConfig::default()
        };
        let err = transport.build_client().unwrap_err();
        assert!(matches!(err, crate::Error::Tls(ref msg) if msg.contains("failed to read CA cert")));
    }
}
