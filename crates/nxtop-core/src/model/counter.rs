// ── Interface counter types ──

use serde::{Deserialize, Serialize};
use strum::Display;

/// Traffic direction a ranking is keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Inbound,
    Outbound,
}

impl Direction {
    pub const ALL: [Direction; 2] = [Direction::Inbound, Direction::Outbound];
}

/// Normalized byte counters for one interface.
///
/// Counters are raw cumulative totals as reported by the device; a
/// missing counter is 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceCounter {
    pub name: String,
    pub inbound_bytes: u64,
    pub outbound_bytes: u64,
}

impl InterfaceCounter {
    pub fn new(name: impl Into<String>, inbound_bytes: u64, outbound_bytes: u64) -> Self {
        Self {
            name: name.into(),
            inbound_bytes,
            outbound_bytes,
        }
    }

    /// The counter for `direction`.
    pub fn bytes(&self, direction: Direction) -> u64 {
        match direction {
            Direction::Inbound => self.inbound_bytes,
            Direction::Outbound => self.outbound_bytes,
        }
    }
}

/// One position in a ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub interface: String,
    pub bytes: u64,
}

impl RankedEntry {
    pub fn new(interface: impl Into<String>, bytes: u64) -> Self {
        Self {
            interface: interface.into(),
            bytes,
        }
    }
}
