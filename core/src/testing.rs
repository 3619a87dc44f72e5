use std::collections::{HashMap, HashSet};
use std::net::IpAddr;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::probe::{PortState, ProbeResult, Prober, UnreachableCause};

/// Scripted prober: a fixed set of open ports, optional per-port delays and
/// failure causes, ports whose probe panics, and counters for calls and peak
/// concurrency.
///
/// A delay longer than the probe timeout resolves as `TimedOut`.
pub struct FakeProber {
    open: HashSet<u16>,
    delays: HashMap<u16, Duration>,
    default_delay: Duration,
    causes: HashMap<u16, UnreachableCause>,
    panics: HashSet<u16>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    seen: Mutex<Vec<u16>>,
}

impl FakeProber {
    pub fn open<I: IntoIterator<Item = u16>>(ports: I) -> Self {
        Self {
            open: ports.into_iter().collect(),
            delays: HashMap::new(),
            default_delay: Duration::ZERO,
            causes: HashMap::new(),
            panics: HashSet::new(),
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn with_delays(mut self, delays: HashMap<u16, Duration>) -> Self {
        self.delays = delays;
        self
    }

    pub fn with_default_delay(mut self, delay: Duration) -> Self {
        self.default_delay = delay;
        self
    }

    /// Closed ports report `cause` instead of `Refused`.
    pub fn with_cause(mut self, port: u16, cause: UnreachableCause) -> Self {
        self.causes.insert(port, cause);
        self
    }

    pub fn panicking<I: IntoIterator<Item = u16>>(mut self, ports: I) -> Self {
        self.panics.extend(ports);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn seen_ports(&self) -> Vec<u16> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Prober for FakeProber {
    async fn probe(
        &self,
        _addr: IpAddr,
        port: u16,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> ProbeResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(port);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        let delay = self.delays.get(&port).copied().unwrap_or(self.default_delay);
        let waited = delay.min(timeout);
        let state = tokio::select! {
            _ = cancel.cancelled() => PortState::unreachable(UnreachableCause::Cancelled),
            _ = tokio::time::sleep(waited) => {
                if delay > timeout {
                    PortState::unreachable(UnreachableCause::TimedOut)
                } else if self.open.contains(&port) {
                    PortState::Open
                } else {
                    let cause = self.causes.get(&port).copied().unwrap_or(UnreachableCause::Refused);
                    PortState::unreachable(cause)
                }
            }
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        if self.panics.contains(&port) {
            panic!("scripted failure on port {port}");
        }

        ProbeResult {
            port,
            state,
            elapsed: waited,
        }
    }
}
