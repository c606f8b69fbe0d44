// ── Fleet coordinator ──
//
// One tokio task per device runs fetch → extract → rank and sends its
// single DeviceResult down an mpsc channel. The coordinator keeps no
// sender of its own, so the receive loop ends exactly when the last task
// has finished; results cannot be read before that barrier.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::{Semaphore, mpsc};
use tracing::{debug, info, warn};

use crate::config::FleetConfig;
use crate::error::CoreError;
use crate::extract::{AliasTable, extract_with};
use crate::model::{DeviceId, DeviceResult};
use crate::rank::RankingMode;
use crate::source::{CounterSource, NxApiSource};

/// Polls a set of devices concurrently and gathers one result per device.
pub struct Fleet<S> {
    source: Arc<S>,
    aliases: Arc<AliasTable>,
    mode: RankingMode,
    max_concurrency: Option<usize>,
}

impl Fleet<NxApiSource> {
    /// A fleet that polls real switches over NX-API.
    pub fn from_config(config: &FleetConfig) -> Result<Self, CoreError> {
        let source = NxApiSource::from_config(config)?;
        Ok(Self::new(source)
            .with_ranking(RankingMode::from_top(config.top))
            .with_max_concurrency(config.max_concurrency))
    }
}

impl<S: CounterSource + 'static> Fleet<S> {
    pub fn new(source: S) -> Self {
        Self {
            source: Arc::new(source),
            aliases: Arc::new(AliasTable::nxos()),
            mode: RankingMode::Full,
            max_concurrency: None,
        }
    }

    pub fn with_aliases(mut self, aliases: AliasTable) -> Self {
        self.aliases = Arc::new(aliases);
        self
    }

    pub fn with_ranking(mut self, mode: RankingMode) -> Self {
        self.mode = mode;
        self
    }

    /// Bound the number of devices fetched at the same time.
    ///
    /// `None` (the default) starts every device immediately. A limit of 0
    /// is treated as 1.
    pub fn with_max_concurrency(mut self, limit: Option<usize>) -> Self {
        self.max_concurrency = limit;
        self
    }

    /// Poll every device once and return one result per distinct device.
    ///
    /// Results come back in input order. A device whose fetch or
    /// extraction fails gets a `FetchFailed` result; nothing here fails
    /// the whole run.
    pub async fn collect(&self, devices: &[DeviceId]) -> Vec<DeviceResult> {
        let devices = dedup(devices);
        info!(devices = devices.len(), "polling fleet");

        let limiter = self
            .max_concurrency
            .map(|n| Arc::new(Semaphore::new(n.max(1))));

        let (tx, mut rx) = mpsc::unbounded_channel::<(usize, DeviceResult)>();
        let mut handles = Vec::with_capacity(devices.len());

        for (slot, device) in devices.iter().cloned().enumerate() {
            let tx = tx.clone();
            let source = Arc::clone(&self.source);
            let aliases = Arc::clone(&self.aliases);
            let limiter = limiter.clone();
            let mode = self.mode;

            handles.push(tokio::spawn(async move {
                let _permit = match limiter {
                    Some(sem) => sem.acquire_owned().await.ok(),
                    None => None,
                };
                let result = run_pipeline(source.as_ref(), &aliases, mode, device).await;
                // The receiver outlives every task; a send can only fail
                // if the coordinator itself was dropped mid-collect.
                let _ = tx.send((slot, result));
            }));
        }
        drop(tx);

        let mut slots: Vec<Option<DeviceResult>> = devices.iter().map(|_| None).collect();
        while let Some((slot, result)) = rx.recv().await {
            if let Some(entry) = slots.get_mut(slot) {
                *entry = Some(result);
            }
        }

        // Every sender is gone, so every task has ended; reap panics.
        for (device, joined) in devices
            .iter()
            .zip(futures_util::future::join_all(handles).await)
        {
            if let Err(e) = joined {
                warn!(%device, error = %e, "device pipeline task aborted");
            }
        }

        let results: Vec<DeviceResult> = slots
            .into_iter()
            .zip(devices)
            .map(|(result, device)| {
                result.unwrap_or_else(|| DeviceResult::failed(device, "pipeline task aborted"))
            })
            .collect();

        let failed = results.iter().filter(|r| !r.is_ok()).count();
        info!(devices = results.len(), failed, "fleet poll complete");
        results
    }
}

/// Fetch → extract → rank for one device. Never fails; errors become a
/// `FetchFailed` result.
async fn run_pipeline<S: CounterSource>(
    source: &S,
    aliases: &AliasTable,
    mode: RankingMode,
    device: DeviceId,
) -> DeviceResult {
    let record = match source.fetch(&device).await {
        Ok(record) => record,
        Err(e) => {
            warn!(%device, error = %e, "fetch failed, skipping device");
            return DeviceResult::failed(device, e.to_string());
        }
    };

    let counters = match extract_with(&record, aliases) {
        Ok(counters) => counters,
        Err(e) => {
            warn!(%device, error = %e, "unusable response, skipping device");
            return DeviceResult::failed(device, e.to_string());
        }
    };

    let rankings = mode.rank(&counters);
    debug!(%device, interfaces = counters.len(), "device ranked");
    DeviceResult::ranked(device, rankings)
}

/// Drop repeated device identities, keeping first occurrences in order.
fn dedup(devices: &[DeviceId]) -> Vec<DeviceId> {
    let mut seen = HashSet::with_capacity(devices.len());
    devices
        .iter()
        .filter(|device| {
            let fresh = seen.insert(*device);
            if !fresh {
                warn!(%device, "device listed more than once, polling it once");
            }
            fresh
        })
        .cloned()
        .collect()
}
