//! Shared models for `riskmap`: scan targets, the port catalog, input errors
//! and process configuration.

pub mod catalog;
pub mod config;
pub mod error;
pub mod log;
pub mod network;

#[doc(hidden)]
pub use tracing as __tracing;
