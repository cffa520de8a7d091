//! Model Module - Disease Classifier
//!
//! Serving code only sees [`DiseaseClassifier`]: one vector in, one label out.
//! The decision tree is the shipped implementation; swapping it for another
//! fitted model does not touch the prediction service or the handlers.

pub mod evaluation;
pub mod labels;
pub mod tree;

use serde::{Deserialize, Serialize};

use crate::vector::PresenceVector;

// Re-export common types
pub use evaluation::{evaluate, Evaluation};
pub use labels::LabelEncoder;
pub use tree::{DecisionTree, Node};

// ============================================================================
// CLASSIFIER TRAIT
// ============================================================================

/// A fitted, immutable classifier over presence vectors.
///
/// Implementations must be deterministic: the same vector always maps to the
/// same label, and that label is always one of [`labels`](Self::labels).
pub trait DiseaseClassifier: Send + Sync {
    /// Most likely disease for `vector`
    fn classify(&self, vector: &PresenceVector) -> &str;

    /// Closed label space, sorted
    fn labels(&self) -> &[String];

    /// Layout hash of the catalog the classifier was fitted on
    fn layout_hash(&self) -> u32;
}

// ============================================================================
// TRAINING CONFIG
// ============================================================================

/// Knobs for fitting at startup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Share of training rows held out for validation
    pub test_fraction: f64,
    /// Shuffle seed for the hold-out split
    pub seed: u64,
    /// Depth limit for the tree; `None` grows until leaves are pure
    pub max_depth: Option<usize>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            test_fraction: 0.33,
            seed: 42,
            max_depth: None,
        }
    }
}
