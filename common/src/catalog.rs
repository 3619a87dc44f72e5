//! # Port Catalog
//!
//! The ordered list of ports a scan considers. Each entry carries a service
//! label and whether it counts towards the risky-port feature. Catalog order
//! is the order results are reported in.

use std::collections::HashSet;

use serde::Serialize;

use crate::error::CatalogError;

pub const UNKNOWN_SERVICE: &str = "Unknown";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PortEntry {
    pub port: u16,
    pub label: &'static str,
    pub risky: bool,
}

impl PortEntry {
    pub const fn risky(port: u16, label: &'static str) -> Self {
        Self { port, label, risky: true }
    }

    pub const fn informational(port: u16, label: &'static str) -> Self {
        Self { port, label, risky: false }
    }
}

const WELL_KNOWN: &[PortEntry] = &[
    PortEntry::risky(21, "FTP"),
    PortEntry::risky(22, "SSH"),
    PortEntry::risky(23, "Telnet"),
    PortEntry::risky(25, "SMTP"),
    PortEntry::risky(53, "DNS"),
    PortEntry::risky(69, "TFTP"),
    PortEntry::risky(80, "HTTP"),
    PortEntry::risky(110, "POP3"),
    PortEntry::risky(135, "RPC"),
    PortEntry::risky(137, "NetBIOS"),
    PortEntry::risky(139, "NetBIOS"),
    PortEntry::risky(143, "IMAP"),
    PortEntry::risky(161, "SNMP"),
    PortEntry::risky(389, "LDAP"),
    PortEntry::informational(443, "HTTPS"),
    PortEntry::risky(445, "SMB"),
    PortEntry::risky(512, "exec"),
    PortEntry::risky(513, "login"),
    PortEntry::risky(514, "shell"),
    PortEntry::informational(993, "IMAPS"),
    PortEntry::informational(995, "POP3S"),
    PortEntry::risky(3306, "MySQL"),
    PortEntry::risky(3389, "RDP"),
    PortEntry::risky(5900, "VNC"),
    PortEntry::risky(8080, "HTTP-Alt"),
];

/// Immutable after construction and safe to share between concurrent scans.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PortCatalog {
    entries: Vec<PortEntry>,
}

impl PortCatalog {
    /// Builds a catalog, keeping the given order. Port numbers must be unique.
    pub fn new(entries: Vec<PortEntry>) -> Result<Self, CatalogError> {
        let mut seen: HashSet<u16> = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if !seen.insert(entry.port) {
                return Err(CatalogError::DuplicatePort(entry.port));
            }
        }
        Ok(Self { entries })
    }

    /// The compiled-in catalog of well-known service ports.
    pub fn well_known() -> Self {
        Self {
            entries: WELL_KNOWN.to_vec(),
        }
    }

    pub fn entries(&self) -> &[PortEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &PortEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, port: u16) -> Option<&PortEntry> {
        self.entries.iter().find(|entry| entry.port == port)
    }

    pub fn label(&self, port: u16) -> &'static str {
        self.get(port).map_or(UNKNOWN_SERVICE, |entry| entry.label)
    }

    pub fn is_risky(&self, port: u16) -> bool {
        self.get(port).is_some_and(|entry| entry.risky)
    }

    pub fn risky_ports(&self) -> impl Iterator<Item = u16> + '_ {
        self.entries.iter().filter(|e| e.risky).map(|e| e.port)
    }
}

impl Default for PortCatalog {
    fn default() -> Self {
        Self::well_known()
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
