//! Collection-and-ranking pipeline between `nxtop-api` and the CLI.
//!
//! - **[`Fleet`]**: fans out one task per device, each running
//!   fetch → [`extract`] → [`rank`], and gathers exactly one
//!   [`DeviceResult`] per device through a channel. Returns only after
//!   every task has finished.
//!
//! - **[`CounterSource`]**: the fetch seam. [`NxApiSource`] talks to real
//!   switches; tests plug in their own.
//!
//! - **Extraction** ([`extract`]): walks the NX-API `show interface`
//!   document and resolves byte counters through an ordered
//!   [`AliasTable`].
//!
//! - **Ranking** ([`rank`]): per-call `BinaryHeap`s yield a stable,
//!   descending order by inbound and by outbound bytes, optionally bounded
//!   to the top N.

pub mod config;
pub mod error;
pub mod extract;
pub mod fleet;
pub mod model;
pub mod rank;
pub mod source;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{Credentials, FleetConfig, TlsVerification};
pub use error::CoreError;
pub use extract::{AliasTable, extract, extract_with};
pub use fleet::Fleet;
pub use model::{
    DeviceId, DeviceResult, DeviceStatus, Direction, InterfaceCounter, RankedEntry, Rankings,
};
pub use rank::{RankingMode, rank, rank_top};
pub use source::{CounterSource, NxApiSource};

pub use nxtop_api::Scheme;
