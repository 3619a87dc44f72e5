use thiserror::Error;

/// Rejected user input. Raised before any network activity takes place.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("'{0}' is not a valid IPv4 or IPv6 address")]
    InvalidAddress(String),

    #[error("unknown OS context '{0}' (expected one of: linux, windows, mac)")]
    UnknownOsContext(String),
}

/// A port catalog that violates its invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("port {0} appears more than once in the catalog")]
    DuplicatePort(u16),
}
