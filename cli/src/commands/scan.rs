use std::io::IsTerminal;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use colored::*;
use riskmap_common::network::target::Target;
use riskmap_common::{catalog::PortCatalog, config::Config, success};
use riskmap_core::assessment::{Assessment, AssessmentService};
use riskmap_core::network::tcp::TcpProber;
use riskmap_core::scanner::ScanOptions;
use riskmap_core::scorer::{self, ScorerConfig};
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::terminal::{colors, format, input::KeyListener, print, spinner};

pub async fn scan(address: &str, os: &str, cfg: &Config) -> anyhow::Result<()> {
    let target: Target = Target::parse(address, os)?;
    let scorer = scorer::load_scorer(&ScorerConfig::from(cfg)).context("failed to load the risk scorer")?;
    let catalog: Arc<PortCatalog> = Arc::new(PortCatalog::well_known());
    let total: usize = catalog.len();

    let cancel = CancellationToken::new();
    spawn_signal_handler(cancel.clone());

    let mut service = AssessmentService::new(
        Arc::new(TcpProber),
        scorer,
        Arc::clone(&catalog),
        ScanOptions::from(cfg),
    );

    let interactive: bool = !cfg.json && cfg.quiet < 2;
    if interactive {
        print::header("starting scanner", cfg.quiet);
        service = service.with_progress(Arc::new(move |done| spinner::report_scan_progress(done, total)));
    }

    let listener: Option<KeyListener> = if interactive && !cfg.disable_input && std::io::stdin().is_terminal() {
        KeyListener::spawn(cancel.clone())
    } else {
        None
    };

    let start_time: Instant = Instant::now();
    let result = service.assess_target(target, &cancel).await;

    drop(listener);
    spinner::finish();

    let assessment: Assessment = result?;

    if cfg.json {
        println!("{}", serde_json::to_string_pretty(&assessment)?);
        return Ok(());
    }

    scan_ends(&assessment, &catalog, start_time.elapsed(), cfg);
    Ok(())
}

fn spawn_signal_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, stopping scan...");
            cancel.cancel();
        }
    });
}

fn scan_ends(assessment: &Assessment, catalog: &PortCatalog, total_time: Duration, cfg: &Config) {
    if cfg.quiet > 0 {
        print::blank();
    }

    if assessment.open_ports.is_empty() {
        print::header("zero open ports", cfg.quiet);
        print::centerln(&"no open ports found".bold().color(colors::SAFE).to_string());
    } else {
        print::header("open ports and services", cfg.quiet);
        let rows = format::open_port_details(&assessment.open_ports, catalog);
        print::tree(&assessment.target.addr().to_string(), &rows);
    }

    print_summary(assessment, total_time, cfg);
}

fn print_summary(assessment: &Assessment, total_time: Duration, cfg: &Config) {
    let verdict: ColoredString = format::verdict_label(&assessment.verdict);
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    let output: ColoredString = format!(
        "{} classified as {verdict} ({:.2}) in {total_time}",
        assessment.target, assessment.verdict.raw
    )
    .color(colors::TEXT_DEFAULT);

    match cfg.quiet {
        0 => {
            print::rule();
            print::centerln(&output.to_string());
            print::status(&format::feature_summary(&assessment.features));
            print::rule();
        }
        _ => {
            print::blank();
            success!("{}", output)
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
