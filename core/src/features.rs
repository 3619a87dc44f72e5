//! Reduces a scan to the fixed-width input of the risk scorer.

use riskmap_common::catalog::PortCatalog;
use riskmap_common::network::target::OsContext;
use serde::Serialize;

use crate::scanner::OpenPort;

/// `(total open ports, risky open ports, OS code)`.
///
/// For vectors built by [`extract`] from a scan of the same catalog,
/// `risky <= total <= catalog.len()`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct FeatureVector {
    pub total: usize,
    pub risky: usize,
    pub os_code: u8,
}

impl FeatureVector {
    pub const ARITY: usize = 3;

    pub fn new(total: usize, risky: usize, os_code: u8) -> Self {
        Self { total, risky, os_code }
    }

    /// Feature values in scorer column order.
    pub fn to_array(&self) -> [f64; Self::ARITY] {
        [self.total as f64, self.risky as f64, f64::from(self.os_code)]
    }
}

/// Counts open ports and the ones flagged risky in `catalog`.
pub fn extract(open_ports: &[OpenPort], os: OsContext, catalog: &PortCatalog) -> FeatureVector {
    let risky: usize = open_ports
        .iter()
        .filter(|open| catalog.is_risky(open.port))
        .count();

    FeatureVector {
        total: open_ports.len(),
        risky,
        os_code: os.code(),
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
