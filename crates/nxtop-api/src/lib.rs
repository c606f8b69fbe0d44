// nxtop-api: Async Rust client for the Cisco NX-API `ins` endpoint

pub mod error;
pub mod nxapi;
pub mod transport;

pub use error::Error;
pub use nxapi::{InsApiRequest, NxApiClient, SHOW_INTERFACE};
pub use transport::{Scheme, TlsMode, TransportConfig};
