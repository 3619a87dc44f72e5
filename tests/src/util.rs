use std::collections::HashSet;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use riskmap_common::catalog::{PortCatalog, PortEntry};
use riskmap_core::probe::{PortState, ProbeResult, Prober, UnreachableCause};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

pub const LOOPBACK: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

/// Reports a fixed set of ports as open without touching the network.
pub struct ScriptedProber {
    open: HashSet<u16>,
    calls: AtomicUsize,
}

impl ScriptedProber {
    pub fn open<I: IntoIterator<Item = u16>>(ports: I) -> Self {
        Self {
            open: ports.into_iter().collect(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Prober for ScriptedProber {
    async fn probe(
        &self,
        _addr: IpAddr,
        port: u16,
        _timeout: Duration,
        _cancel: &CancellationToken,
    ) -> ProbeResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let state = if self.open.contains(&port) {
            PortState::Open
        } else {
            PortState::unreachable(UnreachableCause::Refused)
        };
        ProbeResult {
            port,
            state,
            elapsed: Duration::ZERO,
        }
    }
}

/// Listeners bound on ephemeral loopback ports, kept alive for the test.
pub struct LoopbackPorts {
    pub listeners: Vec<TcpListener>,
}

impl LoopbackPorts {
    pub async fn bind(count: usize) -> Self {
        let mut listeners = Vec::with_capacity(count);
        for _ in 0..count {
            listeners.push(TcpListener::bind((LOOPBACK, 0)).await.unwrap());
        }
        Self { listeners }
    }

    pub fn ports(&self) -> Vec<u16> {
        self.listeners
            .iter()
            .map(|l| l.local_addr().unwrap().port())
            .collect()
    }
}

/// Ports that were just bound and released, so nothing listens on them.
pub async fn closed_ports(count: usize) -> Vec<u16> {
    LoopbackPorts::bind(count).await.ports()
}

pub fn catalog_of(ports: &[u16]) -> PortCatalog {
    PortCatalog::new(ports.iter().map(|&p| PortEntry::risky(p, "test")).collect()).unwrap()
}
