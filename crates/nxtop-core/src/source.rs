// ── Fetch seam ──
//
// The fleet coordinator only needs "give me the raw record for this
// device". Real polls go through NX-API; tests substitute canned data.

use std::future::Future;

use serde_json::Value;
use tracing::debug;

use nxtop_api::transport::{TlsMode, TransportConfig};
use nxtop_api::NxApiClient;

use crate::config::{Credentials, FleetConfig, TlsVerification};
use crate::error::CoreError;
use crate::model::DeviceId;

/// Anything that can produce one raw counter record per device.
///
/// One call is one attempt; implementations must not retry.
pub trait CounterSource: Send + Sync {
    fn fetch(&self, device: &DeviceId) -> impl Future<Output = Result<Value, CoreError>> + Send;
}

/// [`CounterSource`] backed by the NX-API `show interface` command.
pub struct NxApiSource {
    client: NxApiClient,
    credentials: Credentials,
}

impl NxApiSource {
    pub fn new(client: NxApiClient, credentials: Credentials) -> Self {
        Self {
            client,
            credentials,
        }
    }

    /// Build the HTTP client described by `config`.
    pub fn from_config(config: &FleetConfig) -> Result<Self, CoreError> {
        let transport = build_transport(config);
        let client = NxApiClient::new(&transport)?.with_scheme(config.scheme);
        Ok(Self::new(client, config.credentials.clone()))
    }
}

impl CounterSource for NxApiSource {
    async fn fetch(&self, device: &DeviceId) -> Result<Value, CoreError> {
        let record = self
            .client
            .show_interface(
                device.as_str(),
                &self.credentials.username,
                &self.credentials.password,
            )
            .await
            .map_err(|e| CoreError::fetch_failed(device, &e))?;
        debug!(%device, "interface counters fetched");
        Ok(record)
    }
}

/// Translate core TLS settings into the api-level transport config.
pub fn build_transport(config: &FleetConfig) -> TransportConfig {
    let tls = match &config.tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    };
    TransportConfig {
        tls,
        timeout: config.timeout,
    }
}
