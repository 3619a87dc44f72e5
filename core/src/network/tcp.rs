use std::net::{IpAddr, SocketAddr};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::probe::{PortState, ProbeResult, Prober, UnreachableCause};

/// Full TCP handshake probe. The connection is dropped as soon as it is
/// established; no application data is sent or read.
#[derive(Clone, Copy, Debug, Default)]
pub struct TcpProber;

#[async_trait]
impl Prober for TcpProber {
    async fn probe(
        &self,
        addr: IpAddr,
        port: u16,
        probe_timeout: Duration,
        cancel: &CancellationToken,
    ) -> ProbeResult {
        let started: Instant = Instant::now();
        let socket_addr: SocketAddr = SocketAddr::new(addr, port);

        let state: PortState = tokio::select! {
            biased;
            _ = cancel.cancelled() => PortState::unreachable(UnreachableCause::Cancelled),
            attempt = timeout(probe_timeout, TcpStream::connect(socket_addr)) => match attempt {
                Ok(Ok(stream)) => {
                    drop(stream);
                    PortState::Open
                }
                Ok(Err(err)) => PortState::unreachable(UnreachableCause::from(&err)),
                Err(_elapsed) => PortState::unreachable(UnreachableCause::TimedOut),
            },
        };

        let result = ProbeResult {
            port,
            state,
            elapsed: started.elapsed(),
        };
        debug!(
            "{socket_addr} -> {:?} in {}ms",
            result.state,
            result.elapsed.as_millis()
        );
        result
    }
}

/// Probes one port without a cancellation source.
pub async fn probe(addr: IpAddr, port: u16, probe_timeout: Duration) -> ProbeResult {
    TcpProber
        .probe(addr, port, probe_timeout, &CancellationToken::new())
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
