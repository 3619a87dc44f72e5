//! # Scan Target Model
//!
//! A [`Target`] pairs a validated host address with the operating system the
//! caller declared for it. Both halves are checked here, before any probe is
//! sent, so nothing downstream has to deal with malformed input.

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use serde::Serialize;

use crate::error::InputError;

/// Returns `true` only if `address` is a well-formed IPv4 or IPv6 literal.
///
/// No trimming, no hostname resolution and no zone identifiers.
pub fn validate(address: &str) -> bool {
    address.parse::<IpAddr>().is_ok()
}

/// Operating system declared for the scanned host.
///
/// The integer codes are part of the feature vector and must stay stable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OsContext {
    Linux,
    Windows,
    Mac,
}

impl OsContext {
    pub const ALL: [OsContext; 3] = [OsContext::Linux, OsContext::Windows, OsContext::Mac];

    pub fn code(self) -> u8 {
        match self {
            OsContext::Linux => 0,
            OsContext::Windows => 1,
            OsContext::Mac => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            OsContext::Linux => "linux",
            OsContext::Windows => "windows",
            OsContext::Mac => "mac",
        }
    }
}

impl fmt::Display for OsContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OsContext {
    type Err = InputError;

    /// Case-insensitive, surrounding whitespace ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        OsContext::ALL
            .into_iter()
            .find(|os| os.name() == lower)
            .ok_or_else(|| InputError::UnknownOsContext(s.to_string()))
    }
}

/// A host to scan. Only constructible from an address that passed [`validate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Target {
    addr: IpAddr,
    os: OsContext,
}

impl Target {
    /// Validates both inputs and builds the target.
    ///
    /// The address is trimmed first; the OS context is resolved through
    /// [`OsContext::from_str`]. The address is checked before the OS context.
    pub fn parse(address: &str, os_context: &str) -> Result<Self, InputError> {
        let address = address.trim();
        let addr: IpAddr = address
            .parse()
            .map_err(|_| InputError::InvalidAddress(address.to_string()))?;
        let os: OsContext = os_context.parse()?;
        Ok(Self { addr, os })
    }

    pub fn new(addr: IpAddr, os: OsContext) -> Self {
        Self { addr, os }
    }

    pub fn addr(&self) -> IpAddr {
        self.addr
    }

    pub fn os(&self) -> OsContext {
        self.os
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.addr, self.os)
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
