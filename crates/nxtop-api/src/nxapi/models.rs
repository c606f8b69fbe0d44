// ── NX-API wire types ──
//
// Request envelope for the JSON flavour of NX-API. Responses are kept as
// `serde_json::Value` because their shape depends on the command.

use serde::Serialize;

/// The CLI command whose output carries per-interface byte counters.
pub const SHOW_INTERFACE: &str = "show interface";

/// NX-API protocol version sent in every request.
pub const INS_API_VERSION: &str = "1.2";

/// Outer `{ "ins_api": { ... } }` wrapper.
#[derive(Debug, Clone, Serialize)]
pub struct InsApiRequest<'a> {
    pub ins_api: InsApiBody<'a>,
}

/// Body of a `cli_show` request.
#[derive(Debug, Clone, Serialize)]
pub struct InsApiBody<'a> {
    pub version: &'a str,
    #[serde(rename = "type")]
    pub kind: &'a str,
    pub chunk: &'a str,
    pub sid: &'a str,
    pub input: &'a str,
    pub output_format: &'a str,
}

impl<'a> InsApiRequest<'a> {
    /// A non-chunked `cli_show` request for `command`, JSON output.
    pub fn cli_show(command: &'a str) -> Self {
        Self {
            ins_api: InsApiBody {
                version: INS_API_VERSION,
                kind: "cli_show",
                chunk: "0",
                sid: "1",
                input: command,
                output_format: "json",
            },
        }
    }
}
