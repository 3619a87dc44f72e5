use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(1);
pub const DEFAULT_CONCURRENCY: usize = 50;

/// Process-wide settings, fixed at startup.
#[derive(Clone, Debug)]
pub struct Config {
    /// Upper bound for a single connection attempt.
    pub probe_timeout: Duration,
    /// Maximum number of probes in flight at once. Values below 1 are treated as 1.
    pub concurrency: usize,
    /// Serialized forest model used for scoring.
    pub model: Option<PathBuf>,
    /// Allows the threshold scorer when no model is configured.
    pub allow_fallback: bool,
    /// Print the result as JSON instead of the terminal report.
    pub json: bool,
    /// 0 = full output, 1 = no headers or banner, 2 = results only.
    pub quiet: u8,
    pub no_banner: bool,
    /// Disables the key listener that aborts the scan on 'q'.
    pub disable_input: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            concurrency: DEFAULT_CONCURRENCY,
            model: None,
            allow_fallback: true,
            json: false,
            quiet: 0,
            no_banner: false,
            disable_input: false,
        }
    }
}
