//! Outcome model and abstraction for single-port probes.
//!
//! A probe either confirms the port is open or reports it as unreachable.
//! Timeouts, refusals, unreachable hosts, descriptor exhaustion and
//! cancellation all land in the same [`PortState::Unreachable`] variant; the
//! cause is kept only for diagnostics and never changes how a port is scored.

use std::io;
use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnreachableCause {
    TimedOut,
    Refused,
    Cancelled,
    Io(io::ErrorKind),
}

impl From<&io::Error> for UnreachableCause {
    fn from(err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::ConnectionRefused => UnreachableCause::Refused,
            io::ErrorKind::TimedOut => UnreachableCause::TimedOut,
            kind => UnreachableCause::Io(kind),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PortState {
    Open,
    Unreachable { cause: Option<UnreachableCause> },
}

impl PortState {
    pub fn unreachable(cause: UnreachableCause) -> Self {
        PortState::Unreachable { cause: Some(cause) }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProbeResult {
    pub port: u16,
    pub state: PortState,
    /// Wall time spent on the attempt.
    pub elapsed: Duration,
}

impl ProbeResult {
    pub fn is_open(&self) -> bool {
        matches!(self.state, PortState::Open)
    }

    pub fn cause(&self) -> Option<UnreachableCause> {
        match self.state {
            PortState::Open => None,
            PortState::Unreachable { cause } => cause,
        }
    }
}

/// Strategy for checking whether a single transport port accepts connections.
///
/// Implementations must never fail: every problem is folded into
/// [`PortState::Unreachable`]. They must also return promptly once `cancel`
/// fires.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(
        &self,
        addr: IpAddr,
        port: u16,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> ProbeResult;
}
