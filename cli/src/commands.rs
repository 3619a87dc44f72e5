pub mod catalog;
pub mod scan;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use riskmap_common::config::{Config, DEFAULT_CONCURRENCY};

#[derive(Parser)]
#[command(name = "riskmap")]
#[command(about = "Probe a host's well-known service ports and classify its exposure.")]
#[command(version)]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Reduce output; repeat to print results only
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub quiet: u8,

    /// Show per-probe diagnostics
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Do not print the banner
    #[arg(long, global = true)]
    pub no_banner: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan a host and classify it as safe or a threat
    #[command(alias = "s")]
    Scan(ScanArgs),
    /// List the ports that are probed
    #[command(alias = "c")]
    Catalog,
}

#[derive(Args)]
pub struct ScanArgs {
    /// IPv4 or IPv6 address of the host
    pub address: String,

    /// Operating system of the host: linux, windows or mac
    #[arg(short, long, default_value = "linux")]
    pub os: String,

    /// Per-probe connection timeout in milliseconds
    #[arg(short, long, default_value_t = 1000, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_ms: u64,

    /// Maximum number of probes in flight
    #[arg(short, long, default_value_t = DEFAULT_CONCURRENCY as u32, value_parser = clap::value_parser!(u32).range(1..))]
    pub concurrency: u32,

    /// Trained forest model (JSON) used for scoring
    #[arg(short, long)]
    pub model: Option<PathBuf>,

    /// Fail instead of using the threshold rule when no model is given
    #[arg(long)]
    pub no_fallback: bool,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,

    /// Disable the 'q' key listener
    #[arg(long)]
    pub no_input: bool,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn wants_json(&self) -> bool {
        matches!(&self.command, Commands::Scan(args) if args.json)
    }
}

impl ScanArgs {
    pub fn to_config(&self, quiet: u8, no_banner: bool) -> Config {
        Config {
            probe_timeout: Duration::from_millis(self.timeout_ms),
            concurrency: self.concurrency as usize,
            model: self.model.clone(),
            allow_fallback: !self.no_fallback,
            json: self.json,
            quiet,
            no_banner,
            disable_input: self.no_input,
        }
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
