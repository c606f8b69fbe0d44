// ── Per-device poll outcome ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::counter::{Direction, RankedEntry};
use super::device::DeviceId;

/// Whether a device produced data this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceStatus {
    Ok,
    FetchFailed,
}

/// Both rankings for one device, each sorted descending by bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rankings {
    pub inbound: Vec<RankedEntry>,
    pub outbound: Vec<RankedEntry>,
}

impl Rankings {
    pub fn get(&self, direction: Direction) -> &[RankedEntry] {
        match direction {
            Direction::Inbound => &self.inbound,
            Direction::Outbound => &self.outbound,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.inbound.is_empty() && self.outbound.is_empty()
    }
}

/// Outcome of one device's fetch → extract → rank pipeline.
///
/// Built once by the fleet coordinator and never mutated afterwards.
/// A failed device always carries empty rankings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceResult {
    pub device: DeviceId,
    pub status: DeviceStatus,
    #[serde(flatten)]
    pub rankings: Rankings,
    pub polled_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

impl DeviceResult {
    pub fn ranked(device: DeviceId, rankings: Rankings) -> Self {
        Self {
            device,
            status: DeviceStatus::Ok,
            rankings,
            polled_at: Utc::now(),
            failure: None,
        }
    }

    pub fn failed(device: DeviceId, reason: impl Into<String>) -> Self {
        Self {
            device,
            status: DeviceStatus::FetchFailed,
            rankings: Rankings::default(),
            polled_at: Utc::now(),
            failure: Some(reason.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == DeviceStatus::Ok
    }

    pub fn inbound(&self) -> &[RankedEntry] {
        &self.rankings.inbound
    }

    pub fn outbound(&self) -> &[RankedEntry] {
        &self.rankings.outbound
    }

    /// True when the device answered but reported no interfaces.
    pub fn has_no_interfaces(&self) -> bool {
        self.is_ok() && self.rankings.is_empty()
    }
}
