//! # Risk Assessment Service
//!
//! Implements the "scan and classify a host" use case.
//!
//! The service validates the request, runs the port scan, derives the feature
//! vector and asks the scorer for a verdict. Input problems are reported
//! before any probe is sent, and a cancelled scan is never scored.

use std::sync::Arc;

use riskmap_common::catalog::PortCatalog;
use riskmap_common::error::InputError;
use riskmap_common::network::target::Target;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::features::{self, FeatureVector};
use crate::probe::Prober;
use crate::scanner::{OpenPort, PortScanner, ProgressFn, ScanOptions, ScanResult};
use crate::scorer::{RiskScorer, Verdict};

/// Inbound request as handed over by a front end.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanRequest {
    pub address: String,
    pub os_context: String,
}

impl ScanRequest {
    pub fn new(address: impl Into<String>, os_context: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            os_context: os_context.into(),
        }
    }
}

/// Outcome of one assessment. Serializes to `{openPorts, verdict}`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    #[serde(skip_serializing)]
    pub target: Target,
    pub open_ports: Vec<OpenPort>,
    #[serde(skip_serializing)]
    pub features: FeatureVector,
    pub verdict: Verdict,
}

#[derive(Debug, Error)]
pub enum AssessError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error("scan was cancelled before every port was probed")]
    Cancelled,
}

/// Orchestrates one assessment:
/// 1. validating the request into a [`Target`].
/// 2. delegating the scan to the [`PortScanner`].
/// 3. scoring the extracted features with the [`RiskScorer`].
pub struct AssessmentService {
    scanner: PortScanner,
    scorer: Arc<dyn RiskScorer>,
    catalog: Arc<PortCatalog>,
}

impl AssessmentService {
    pub fn new(
        prober: Arc<dyn Prober>,
        scorer: Arc<dyn RiskScorer>,
        catalog: Arc<PortCatalog>,
        options: ScanOptions,
    ) -> Self {
        Self {
            scanner: PortScanner::new(prober, options),
            scorer,
            catalog,
        }
    }

    pub fn with_progress(mut self, on_progress: ProgressFn) -> Self {
        self.scanner = self.scanner.with_progress(on_progress);
        self
    }

    pub async fn assess(
        &self,
        request: &ScanRequest,
        cancel: &CancellationToken,
    ) -> Result<Assessment, AssessError> {
        let target: Target = Target::parse(&request.address, &request.os_context)?;
        self.assess_target(target, cancel).await
    }

    pub async fn assess_target(
        &self,
        target: Target,
        cancel: &CancellationToken,
    ) -> Result<Assessment, AssessError> {
        let scan: ScanResult = self.scanner.scan(&target, &self.catalog, cancel).await;
        if scan.cancelled {
            return Err(AssessError::Cancelled);
        }

        let features: FeatureVector = features::extract(&scan.open_ports, target.os(), &self.catalog);
        let verdict: Verdict = self.scorer.classify(&features);

        info!(
            "{target}: {} open, {} risky -> {} ({:.2})",
            features.total, features.risky, verdict.class, verdict.raw
        );

        Ok(Assessment {
            target,
            open_ports: scan.open_ports,
            features,
            verdict,
        })
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
