// NX-API (`/ins`) client
//
// A single POST per device carrying a `cli_show` envelope. The response
// body is handed back as raw JSON; interpreting the `TABLE_*`/`ROW_*`
// structure is `nxtop-core`'s job.

pub mod client;
pub mod models;

pub use client::NxApiClient;
pub use models::{InsApiRequest, SHOW_INTERFACE};
