// NX-API HTTP client
//
// Wraps `reqwest::Client` with device URL construction, Basic auth, and
// status/body interpretation. Exactly one request per call; retry policy
// (there is none) belongs to the caller.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::nxapi::models::{InsApiRequest, SHOW_INTERFACE};
use crate::transport::{Scheme, TransportConfig};

/// Path of the NX-API endpoint on every device.
pub const INS_PATH: &str = "/ins";

/// Raw HTTP client for the NX-API `ins` endpoint.
///
/// Cheap to clone; one instance is shared by every concurrent device poll.
#[derive(Clone)]
pub struct NxApiClient {
    http: reqwest::Client,
    scheme: Scheme,
    timeout: Duration,
}

impl NxApiClient {
    /// Create a new client from a `TransportConfig`.
    pub fn new(transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            scheme: Scheme::Https,
            timeout: transport.timeout,
        })
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client) -> Self {
        Self {
            http,
            scheme: Scheme::Https,
            timeout: TransportConfig::default().timeout,
        }
    }

    /// Reach devices over `scheme` instead of HTTPS.
    pub fn with_scheme(mut self, scheme: Scheme) -> Self {
        self.scheme = scheme;
        self
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build the endpoint URL for a device: `{scheme}://{device}/ins`.
    ///
    /// `device` is a host name or address, optionally with a port.
    pub fn endpoint(&self, device: &str) -> Result<Url, Error> {
        let host = device.trim().trim_end_matches('/');
        let full = format!("{}://{host}{INS_PATH}", self.scheme);
        Ok(Url::parse(&full)?)
    }

    // ── Requests ─────────────────────────────────────────────────────

    /// Run `show interface` on a device and return the parsed response body.
    pub async fn show_interface(
        &self,
        device: &str,
        username: &str,
        password: &SecretString,
    ) -> Result<Value, Error> {
        self.cli_show(device, username, password, SHOW_INTERFACE)
            .await
    }

    /// Run an arbitrary `cli_show` command on a device.
    pub async fn cli_show(
        &self,
        device: &str,
        username: &str,
        password: &SecretString,
        command: &str,
    ) -> Result<Value, Error> {
        let url = self.endpoint(device)?;
        debug!(%url, command, "POST");

        let resp = self
            .http
            .post(url)
            .basic_auth(username, Some(password.expose_secret()))
            .json(&InsApiRequest::cli_show(command))
            .send()
            .await
            .map_err(|e| self.map_transport(e))?;

        self.parse_response(resp).await
    }

    /// Interpret the HTTP status and decode the JSON body.
    ///
    /// Only HTTP 200 counts as success; NX-API never uses other 2xx codes.
    async fn parse_response(&self, resp: reqwest::Response) -> Result<Value, Error> {
        let status = resp.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(Error::Authentication {
                message: format!("device rejected credentials (HTTP {})", status.as_u16()),
            });
        }

        if status != reqwest::StatusCode::OK {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Status {
                status: status.as_u16(),
                message: preview(&body).to_owned(),
            });
        }

        let body = resp.text().await.map_err(|e| self.map_transport(e))?;
        trace!(bytes = body.len(), "response body received");

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: format!("{e} (body preview: {:?})", preview(&body)),
            body: body.clone(),
        })
    }

    fn map_transport(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout { timeout: self.timeout }
        } else {
            Error::Transport(err)
        }
    }
}

/// First 200 characters of a body, cut on a char boundary.
fn preview(body: &str) -> &str {
    match body.char_indices().nth(200) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
