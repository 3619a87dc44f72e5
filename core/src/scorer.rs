//! # Risk Scoring
//!
//! The scorer turns a [`FeatureVector`] into a [`Verdict`]. It is a capability
//! with a single method so the pipeline never depends on how a scorer was
//! produced. Two implementations ship here:
//!
//! * [`ForestScorer`]: an ensemble of decision trees loaded from a model file.
//! * [`ThresholdScorer`]: a fixed rule on the risky-port count, used when no
//!   model is configured.
//!
//! Scorers are loaded once at startup and shared read-only between scans.
//! Any loading problem surfaces from [`load_scorer`], never from `classify`.

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use riskmap_common::config::Config;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::features::FeatureVector;

mod forest;

pub use forest::ForestScorer;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ThreatClass {
    Safe,
    Threat,
}

impl ThreatClass {
    pub fn index(self) -> usize {
        match self {
            ThreatClass::Safe => 0,
            ThreatClass::Threat => 1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ThreatClass::Safe => "safe",
            ThreatClass::Threat => "threat",
        }
    }
}

impl fmt::Display for ThreatClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Verdict {
    pub class: ThreatClass,
    /// Probability assigned to [`ThreatClass::Threat`], in `[0, 1]`.
    pub raw: f64,
}

impl Verdict {
    pub fn is_threat(&self) -> bool {
        self.class == ThreatClass::Threat
    }
}

/// Maps features to a verdict.
///
/// Implementations must be deterministic: the same features always produce
/// the same verdict on the same instance. They must also be safe to call from
/// several scans at once.
pub trait RiskScorer: Send + Sync {
    fn classify(&self, features: &FeatureVector) -> Verdict;

    /// Short human-readable description, used in logs.
    fn describe(&self) -> String;
}

pub const DEFAULT_RISKY_THRESHOLD: usize = 3;

/// `risky >= min_risky` is a threat, anything else is safe.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThresholdScorer {
    pub min_risky: usize,
}

impl Default for ThresholdScorer {
    fn default() -> Self {
        Self {
            min_risky: DEFAULT_RISKY_THRESHOLD,
        }
    }
}

impl RiskScorer for ThresholdScorer {
    fn classify(&self, features: &FeatureVector) -> Verdict {
        let class = if features.risky >= self.min_risky {
            ThreatClass::Threat
        } else {
            ThreatClass::Safe
        };
        Verdict {
            class,
            raw: class.index() as f64,
        }
    }

    fn describe(&self) -> String {
        format!("threshold rule (risky ports >= {})", self.min_risky)
    }
}

#[derive(Debug, Error)]
pub enum ScorerError {
    #[error("failed to read model file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("model file is not valid JSON")]
    Malformed(#[from] serde_json::Error),

    #[error("invalid model: {0}")]
    Invalid(String),

    #[error("no trained model configured and the threshold fallback is disabled")]
    Unavailable,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScorerConfig {
    pub model: Option<PathBuf>,
    pub allow_fallback: bool,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            model: None,
            allow_fallback: true,
        }
    }
}

impl From<&Config> for ScorerConfig {
    fn from(cfg: &Config) -> Self {
        Self {
            model: cfg.model.clone(),
            allow_fallback: cfg.allow_fallback,
        }
    }
}

/// Resolves the scorer for this process.
///
/// A configured model must load; its errors are returned as-is and never
/// replaced by the fallback. Without a model the threshold rule is used when
/// allowed, otherwise [`ScorerError::Unavailable`].
pub fn load_scorer(cfg: &ScorerConfig) -> Result<Arc<dyn RiskScorer>, ScorerError> {
    let scorer: Arc<dyn RiskScorer> = match (&cfg.model, cfg.allow_fallback) {
        (Some(path), _) => Arc::new(ForestScorer::load(path)?),
        (None, true) => Arc::new(ThresholdScorer::default()),
        (None, false) => return Err(ScorerError::Unavailable),
    };
    info!("Risk scorer: {}", scorer.describe());
    Ok(scorer)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
