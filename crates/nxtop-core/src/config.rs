// ── Runtime poll configuration ──
//
// These types describe *how* to reach the fleet. They carry credential
// data and connection tuning, but never touch disk. The CLI builds a
// `FleetConfig` (usually through `nxtop-config`) and hands it in.

use std::time::Duration;

use secrecy::SecretString;

use nxtop_api::Scheme;

/// Username/password shared by every device in the fleet.
///
/// `Debug` never shows the password.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<SecretString>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed lab switches).
    DangerAcceptInvalid,
}

/// Configuration for one poll of the fleet.
#[derive(Debug, Clone)]
pub struct FleetConfig {
    /// Credentials sent to every device.
    pub credentials: Credentials,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Scheme NX-API is served on.
    pub scheme: Scheme,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Keep only the top N interfaces per direction. `None` ranks all.
    pub top: Option<usize>,
    /// Cap on devices polled at once. `None` polls every device at once.
    pub max_concurrency: Option<usize>,
}

impl FleetConfig {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            tls: TlsVerification::default(),
            scheme: Scheme::default(),
            timeout: Duration::from_secs(30),
            top: None,
            max_concurrency: None,
        }
    }
}
