//! # Scan Coordinator
//!
//! Fans the port catalog out to a bounded pool of concurrent probes and folds
//! the results back into catalog order.
//!
//! At most `concurrency` probes are in flight at any time; a permit from a
//! shared semaphore is taken before each probe is spawned and released when it
//! finishes. The coordinator waits for every dispatched probe, so open ports
//! found early never shorten the scan. Completion order is discarded: results
//! are slotted by catalog index and read back in that order.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use riskmap_common::catalog::PortCatalog;
use riskmap_common::config::{Config, DEFAULT_CONCURRENCY, DEFAULT_PROBE_TIMEOUT};
use riskmap_common::network::target::Target;
use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::network::tcp::TcpProber;
use crate::probe::{ProbeResult, Prober};

/// Called with the number of probes completed so far.
pub type ProgressFn = Arc<dyn Fn(usize) + Send + Sync>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScanOptions {
    pub timeout: Duration,
    /// Maximum probes in flight. Zero is treated as one.
    pub concurrency: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_PROBE_TIMEOUT,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl From<&Config> for ScanOptions {
    fn from(cfg: &Config) -> Self {
        Self {
            timeout: cfg.probe_timeout,
            concurrency: cfg.concurrency,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct OpenPort {
    pub port: u16,
    pub label: &'static str,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScanResult {
    /// Open ports in catalog order.
    pub open_ports: Vec<OpenPort>,
    /// Number of probes that reported back.
    pub probed: usize,
    /// Set when the scan was cut short; `open_ports` is then incomplete.
    pub cancelled: bool,
}

pub struct PortScanner {
    prober: Arc<dyn Prober>,
    options: ScanOptions,
    on_progress: Option<ProgressFn>,
}

impl PortScanner {
    pub fn new(prober: Arc<dyn Prober>, options: ScanOptions) -> Self {
        Self {
            prober,
            options,
            on_progress: None,
        }
    }

    pub fn with_progress(mut self, on_progress: ProgressFn) -> Self {
        self.on_progress = Some(on_progress);
        self
    }

    /// Probes every catalog entry against `target` and returns the open ones.
    ///
    /// An empty catalog or a host with nothing reachable both yield an empty
    /// result; neither is an error. After `cancel` fires no new probes are
    /// dispatched and the result is flagged as cancelled.
    pub async fn scan(
        &self,
        target: &Target,
        catalog: &PortCatalog,
        cancel: &CancellationToken,
    ) -> ScanResult {
        if catalog.is_empty() {
            debug!("empty catalog, nothing to probe on {}", target.addr());
            return ScanResult::default();
        }

        let limit: usize = self.options.concurrency.max(1);
        let semaphore: Arc<Semaphore> = Arc::new(Semaphore::new(limit));
        let completed: Arc<AtomicUsize> = Arc::new(AtomicUsize::new(0));
        let mut tasks: JoinSet<(usize, ProbeResult)> = JoinSet::new();
        let mut stopped_early: bool = false;
        let start_time: Instant = Instant::now();

        info!(
            "Probing {} ports on {} ({} at a time)",
            catalog.len(),
            target.addr(),
            limit
        );

        for (idx, entry) in catalog.iter().enumerate() {
            let permit = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    stopped_early = true;
                    break;
                }
                permit = Arc::clone(&semaphore).acquire_owned() => match permit {
                    Ok(permit) => permit,
                    Err(_closed) => break,
                },
            };

            let prober = Arc::clone(&self.prober);
            let completed = Arc::clone(&completed);
            let on_progress = self.on_progress.clone();
            let cancel = cancel.clone();
            let addr = target.addr();
            let port = entry.port;
            let timeout = self.options.timeout;

            tasks.spawn(async move {
                let result = prober.probe(addr, port, timeout, &cancel).await;
                drop(permit);
                let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                if let Some(cb) = on_progress {
                    cb(done);
                }
                (idx, result)
            });
        }

        let mut slots: Vec<Option<ProbeResult>> = vec![None; catalog.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((idx, result)) => slots[idx] = Some(result),
                Err(e) => error!("Probe task failed: {e}"),
            }
        }

        let open_ports: Vec<OpenPort> = catalog
            .iter()
            .zip(&slots)
            .filter(|(_, slot)| slot.is_some_and(|result| result.is_open()))
            .map(|(entry, _)| OpenPort {
                port: entry.port,
                label: entry.label,
            })
            .collect();

        let probed: usize = slots.iter().flatten().count();
        let cancelled: bool = stopped_early || cancel.is_cancelled();

        if cancelled {
            warn!(
                "Scan of {} cancelled after {probed}/{} probes",
                target.addr(),
                catalog.len()
            );
        } else {
            info!(
                "Scan of {} finished in {:.2}s: {} open",
                target.addr(),
                start_time.elapsed().as_secs_f64(),
                open_ports.len()
            );
        }

        ScanResult {
            open_ports,
            probed,
            cancelled,
        }
    }
}

/// Scans `target` with plain TCP probes and no cancellation source.
pub async fn scan(target: &Target, catalog: &PortCatalog, options: &ScanOptions) -> ScanResult {
    PortScanner::new(Arc::new(TcpProber), *options)
        .scan(target, catalog, &CancellationToken::new())
        .await
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
