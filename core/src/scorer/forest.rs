//! Decision-forest scorer backed by a JSON model artifact.
//!
//! Layout of the artifact:
//!
//! ```json
//! {
//!   "classes": ["safe", "threat"],
//!   "trees": [
//!     { "nodes": [
//!         { "feature": 1, "threshold": 2.5, "left": 1, "right": 2 },
//!         { "value": [40.0, 0.0] },
//!         { "value": [0.0, 60.0] }
//!     ] }
//!   ]
//! }
//! ```
//!
//! Split nodes send a sample left when `x[feature] <= threshold`. Leaves hold
//! per-class weights in `classes` order. Node 0 is the root and children
//! always come after their parent, which rules out cycles.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::{RiskScorer, ScorerError, ThreatClass, Verdict};
use crate::features::FeatureVector;

#[derive(Debug, Deserialize)]
struct ForestModel {
    classes: Vec<String>,
    trees: Vec<TreeModel>,
}

#[derive(Debug, Deserialize)]
struct TreeModel {
    nodes: Vec<Node>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: Vec<f64>,
    },
}

#[derive(Clone, Debug)]
pub struct ForestScorer {
    classes: Vec<ThreatClass>,
    threat_idx: usize,
    /// Leaves are stored already normalized to probabilities.
    trees: Vec<Vec<Node>>,
}

impl ForestScorer {
    pub fn load(path: &Path) -> Result<Self, ScorerError> {
        let raw: String = fs::read_to_string(path).map_err(|source| ScorerError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(json: &str) -> Result<Self, ScorerError> {
        let model: ForestModel = serde_json::from_str(json)?;
        let classes: Vec<ThreatClass> = parse_classes(&model.classes)?;

        if model.trees.is_empty() {
            return Err(ScorerError::Invalid("model contains no trees".into()));
        }

        let trees = model
            .trees
            .into_iter()
            .enumerate()
            .map(|(tree_idx, tree)| validate_tree(tree_idx, tree.nodes, classes.len()))
            .collect::<Result<Vec<_>, _>>()?;

        let threat_idx = classes
            .iter()
            .position(|class| *class == ThreatClass::Threat)
            .ok_or_else(|| ScorerError::Invalid("missing 'threat' class".into()))?;

        Ok(Self {
            classes,
            threat_idx,
            trees,
        })
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    /// Mean class distribution over all trees.
    fn predict_proba(&self, x: &[f64; FeatureVector::ARITY]) -> Vec<f64> {
        let mut totals: Vec<f64> = vec![0.0; self.classes.len()];
        for nodes in &self.trees {
            for (total, p) in totals.iter_mut().zip(leaf_for(nodes, x)) {
                *total += p;
            }
        }
        let count = self.trees.len() as f64;
        totals.iter_mut().for_each(|total| *total /= count);
        totals
    }
}

impl RiskScorer for ForestScorer {
    fn classify(&self, features: &FeatureVector) -> Verdict {
        let proba: Vec<f64> = self.predict_proba(&features.to_array());

        // Ties go to the class listed first.
        let mut best: usize = 0;
        for (idx, p) in proba.iter().enumerate().skip(1) {
            if *p > proba[best] {
                best = idx;
            }
        }

        Verdict {
            class: self.classes[best],
            raw: proba[self.threat_idx],
        }
    }

    fn describe(&self) -> String {
        format!("decision forest ({} trees)", self.trees.len())
    }
}

fn leaf_for<'a>(nodes: &'a [Node], x: &[f64; FeatureVector::ARITY]) -> &'a [f64] {
    let mut idx: usize = 0;
    loop {
        match &nodes[idx] {
            Node::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                idx = if x[*feature] <= *threshold { *left } else { *right };
            }
            Node::Leaf { value } => return value,
        }
    }
}

fn parse_classes(names: &[String]) -> Result<Vec<ThreatClass>, ScorerError> {
    let classes = names
        .iter()
        .map(|name| match name.as_str() {
            "safe" => Ok(ThreatClass::Safe),
            "threat" => Ok(ThreatClass::Threat),
            other => Err(ScorerError::Invalid(format!("unknown class '{other}'"))),
        })
        .collect::<Result<Vec<_>, _>>()?;

    let has_both = classes.contains(&ThreatClass::Safe) && classes.contains(&ThreatClass::Threat);
    if classes.len() != 2 || !has_both {
        return Err(ScorerError::Invalid(
            "classes must be exactly 'safe' and 'threat'".into(),
        ));
    }
    Ok(classes)
}

fn validate_tree(tree_idx: usize, nodes: Vec<Node>, n_classes: usize) -> Result<Vec<Node>, ScorerError> {
    let invalid = |node_idx: usize, why: &str| {
        ScorerError::Invalid(format!("tree {tree_idx}, node {node_idx}: {why}"))
    };

    if nodes.is_empty() {
        return Err(ScorerError::Invalid(format!("tree {tree_idx} has no nodes")));
    }

    let len = nodes.len();
    nodes
        .into_iter()
        .enumerate()
        .map(|(idx, node)| match node {
            Node::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                if feature >= FeatureVector::ARITY {
                    return Err(invalid(idx, "feature index out of range"));
                }
                if !threshold.is_finite() {
                    return Err(invalid(idx, "threshold is not finite"));
                }
                if left <= idx || right <= idx || left >= len || right >= len {
                    return Err(invalid(idx, "child index must point forward and stay in bounds"));
                }
                Ok(Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                })
            }
            Node::Leaf { value } => {
                if value.len() != n_classes {
                    return Err(invalid(idx, "leaf arity does not match class count"));
                }
                if value.iter().any(|w| !w.is_finite() || *w < 0.0) {
                    return Err(invalid(idx, "leaf weights must be finite and non-negative"));
                }
                let sum: f64 = value.iter().sum();
                if sum <= 0.0 {
                    return Err(invalid(idx, "leaf weights sum to zero"));
                }
                Ok(Node::Leaf {
                    value: value.iter().map(|w| w / sum).collect(),
                })
            }
        })
        .collect()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
