//! Decision Tree - CART over presence vectors
//!
//! Binary splits on "symptom absent / present", chosen by Gini impurity
//! decrease. Fitting is fully deterministic:
//! - candidate features are scanned in catalog order and only a strictly
//!   better gain replaces the current best, so ties go to the lowest index
//! - a leaf predicts its majority class, ties going to the lowest class index
//!
//! Nodes live in a flat arena; node 0 is the root.

use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};

use super::labels::LabelEncoder;
use super::DiseaseClassifier;
use crate::error::ModelError;
use crate::vector::PresenceVector;

/// Gains at or below this are treated as no improvement
const MIN_GAIN: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Node {
    Split {
        feature: usize,
        /// Child taken when the symptom is absent
        absent: usize,
        /// Child taken when the symptom is present
        present: usize,
    },
    Leaf {
        class: usize,
    },
}

#[derive(Debug, Clone)]
pub struct DecisionTree {
    nodes: Vec<Node>,
    encoder: LabelEncoder,
    n_features: usize,
    layout_hash: u32,
}

impl DecisionTree {
    /// Fit on a presence matrix (rows x catalog symptoms) and one label per row.
    pub fn fit(
        features: ArrayView2<'_, u8>,
        labels: &[String],
        layout_hash: u32,
        max_depth: Option<usize>,
    ) -> Result<Self, ModelError> {
        if features.nrows() != labels.len() {
            return Err(ModelError::LabelCount {
                rows: features.nrows(),
                labels: labels.len(),
            });
        }
        if labels.is_empty() {
            return Err(ModelError::EmptyDataset);
        }

        let encoder = LabelEncoder::fit(labels);
        // Every label came from `labels`, so encoding cannot miss
        let targets: Vec<usize> = labels
            .iter()
            .map(|l| encoder.encode(l).unwrap_or_default())
            .collect();

        let mut builder = Builder {
            features,
            targets: &targets,
            n_classes: encoder.len(),
            max_depth,
            nodes: Vec::new(),
        };
        builder.grow((0..labels.len()).collect(), 0);

        let tree = Self {
            nodes: builder.nodes,
            encoder,
            n_features: features.ncols(),
            layout_hash,
        };

        log::info!(
            "Decision tree fitted: {} rows, {} classes, {} nodes, depth {}",
            labels.len(),
            tree.encoder.len(),
            tree.node_count(),
            tree.depth()
        );

        Ok(tree)
    }

    /// Class index reached by `row`. Cells past the row end count as absent.
    pub fn predict_class(&self, row: &[u8]) -> usize {
        let mut current = 0;
        loop {
            match self.nodes[current] {
                Node::Leaf { class } => return class,
                Node::Split {
                    feature,
                    absent,
                    present,
                } => {
                    current = if row.get(feature).is_some_and(|&v| v != 0) {
                        present
                    } else {
                        absent
                    };
                }
            }
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, Node::Leaf { .. }))
            .count()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Edges on the longest root-to-leaf path
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(0usize, 0usize)];
        while let Some((index, depth)) = stack.pop() {
            match self.nodes[index] {
                Node::Leaf { .. } => deepest = deepest.max(depth),
                Node::Split { absent, present, .. } => {
                    stack.push((absent, depth + 1));
                    stack.push((present, depth + 1));
                }
            }
        }
        deepest
    }
}

impl DiseaseClassifier for DecisionTree {
    fn classify(&self, vector: &PresenceVector) -> &str {
        let class = self.predict_class(vector.as_slice());
        self.encoder.decode(class).unwrap_or_default()
    }

    fn labels(&self) -> &[String] {
        self.encoder.classes()
    }

    fn layout_hash(&self) -> u32 {
        self.layout_hash
    }
}

// ============================================================================
// FITTING
// ============================================================================

struct Builder<'f, 't> {
    features: ArrayView2<'f, u8>,
    targets: &'t [usize],
    n_classes: usize,
    max_depth: Option<usize>,
    nodes: Vec<Node>,
}

impl Builder<'_, '_> {
    /// Grow the subtree for `rows`, returning its node index.
    fn grow(&mut self, rows: Vec<usize>, depth: usize) -> usize {
        let counts = self.class_counts(&rows);
        let index = self.nodes.len();
        self.nodes.push(Node::Leaf {
            class: majority(&counts),
        });

        let pure = counts.iter().filter(|&&c| c > 0).count() <= 1;
        let depth_reached = self.max_depth.is_some_and(|max| depth >= max);
        if pure || depth_reached || rows.len() < 2 {
            return index;
        }

        let Some(feature) = self.best_split(&rows, &counts) else {
            return index;
        };

        let (present_rows, absent_rows): (Vec<usize>, Vec<usize>) = rows
            .into_iter()
            .partition(|&r| self.features[[r, feature]] != 0);

        let absent = self.grow(absent_rows, depth + 1);
        let present = self.grow(present_rows, depth + 1);
        self.nodes[index] = Node::Split {
            feature,
            absent,
            present,
        };
        index
    }

    fn class_counts(&self, rows: &[usize]) -> Vec<usize> {
        let mut counts = vec![0; self.n_classes];
        for &r in rows {
            counts[self.targets[r]] += 1;
        }
        counts
    }

    /// Feature with the largest Gini decrease, if any decreases impurity.
    fn best_split(&self, rows: &[usize], counts: &[usize]) -> Option<usize> {
        let total = rows.len();
        let parent = gini(counts, total);
        let mut best: Option<(usize, f64)> = None;

        for feature in 0..self.features.ncols() {
            let mut present = vec![0; self.n_classes];
            let mut n_present = 0;
            for &r in rows {
                if self.features[[r, feature]] != 0 {
                    present[self.targets[r]] += 1;
                    n_present += 1;
                }
            }
            if n_present == 0 || n_present == total {
                continue;
            }

            let absent: Vec<usize> = counts.iter().zip(&present).map(|(c, p)| c - p).collect();
            let n_absent = total - n_present;
            let weighted = (n_present as f64 * gini(&present, n_present)
                + n_absent as f64 * gini(&absent, n_absent))
                / total as f64;
            let gain = parent - weighted;

            let threshold = best.map_or(MIN_GAIN, |(_, g)| g + MIN_GAIN);
            if gain > threshold {
                best = Some((feature, gain));
            }
        }

        best.map(|(feature, _)| feature)
    }
}

fn gini(counts: &[usize], total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    1.0 - counts
        .iter()
        .map(|&c| {
            let p = c as f64 / total;
            p * p
        })
        .sum::<f64>()
}

/// Most frequent class; lowest index wins ties
fn majority(counts: &[usize]) -> usize {
    let mut best = 0;
    for (class, &count) in counts.iter().enumerate() {
        if count > counts[best] {
            best = class;
        }
    }
    best
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    /// itching, skin_rash, nausea, vomiting, headache, high_fever
    fn fixture() -> DecisionTree {
        let features = array![
            [1, 1, 0, 0, 0, 0],
            [1, 1, 0, 0, 0, 0],
            [0, 0, 1, 1, 0, 0],
            [0, 0, 1, 1, 0, 0],
            [0, 0, 0, 0, 1, 1],
            [0, 0, 0, 0, 1, 1],
            [1, 0, 1, 0, 0, 0],
        ];
        let labels = labels(&[
            "Fungal infection",
            "Fungal infection",
            "Gastroenteritis",
            "Gastroenteritis",
            "Malaria",
            "Malaria",
            "Drug Reaction",
        ]);
        DecisionTree::fit(features.view(), &labels, 0xABCD, None).unwrap()
    }

    fn classify(tree: &DecisionTree, row: [u8; 6]) -> &str {
        tree.classify(&PresenceVector::from_row(0xABCD, row))
    }

    #[test]
    fn test_fits_training_rows() {
        let tree = fixture();
        assert_eq!(classify(&tree, [1, 1, 0, 0, 0, 0]), "Fungal infection");
        assert_eq!(classify(&tree, [0, 0, 1, 1, 0, 0]), "Gastroenteritis");
        assert_eq!(classify(&tree, [0, 0, 0, 0, 1, 1]), "Malaria");
        assert_eq!(classify(&tree, [1, 0, 1, 0, 0, 0]), "Drug Reaction");
    }

    #[test]
    fn test_tree_shape() {
        let tree = fixture();
        // Root splits on skin_rash, the purest first cut
        assert_eq!(
            tree.nodes()[0],
            Node::Split {
                feature: 1,
                absent: 1,
                present: 6
            }
        );
        assert_eq!(tree.node_count(), 7);
        assert_eq!(tree.leaf_count(), 4);
        assert_eq!(tree.depth(), 3);
        assert_eq!(tree.n_features(), 6);
        assert_eq!(tree.layout_hash(), 0xABCD);
    }

    #[test]
    fn test_all_zero_vector_has_a_label() {
        let tree = fixture();
        assert_eq!(classify(&tree, [0; 6]), "Malaria");
    }

    #[test]
    fn test_labels_are_closed_and_sorted() {
        let tree = fixture();
        assert_eq!(
            tree.labels(),
            &["Drug Reaction", "Fungal infection", "Gastroenteritis", "Malaria"]
        );
        for bits in 0u8..64 {
            let row: [u8; 6] = std::array::from_fn(|i| (bits >> i) & 1);
            let label = classify(&tree, row);
            assert!(tree.labels().iter().any(|l| l == label));
        }
    }

    #[test]
    fn test_fitting_is_deterministic() {
        let a = fixture();
        let b = fixture();
        assert_eq!(a.nodes(), b.nodes());
    }

    #[test]
    fn test_max_depth_limits_growth() {
        let features = array![[1, 0], [1, 1], [0, 1], [0, 0]];
        let labels = labels(&["A", "B", "C", "C"]);
        let stump = DecisionTree::fit(features.view(), &labels, 0, Some(1)).unwrap();
        assert_eq!(stump.depth(), 1);
        assert_eq!(stump.node_count(), 3);

        let full = DecisionTree::fit(features.view(), &labels, 0, None).unwrap();
        assert_eq!(full.predict_class(&[1, 0]), 0);
        assert_eq!(full.predict_class(&[1, 1]), 1);
        assert_eq!(full.predict_class(&[0, 1]), 2);
    }

    /// Fits from a view whose lifetime belongs to the caller, as the
    /// service does with a table it keeps after fitting.
    fn fit_view(features: ArrayView2<'_, u8>, labels: &[String]) -> DecisionTree {
        DecisionTree::fit(features, labels, 7, None).unwrap()
    }

    #[test]
    fn test_fit_from_long_lived_view() {
        let features = array![[1u8, 0], [0, 1], [0, 0]];
        let labels = labels(&["Allergy", "Flu", "Flu"]);
        let view = features.view();

        let tree = fit_view(view, &labels);
        assert_eq!(view.nrows(), 3);
        assert_eq!(tree.n_features(), 2);
        assert_eq!(tree.layout_hash(), 7);
        assert_eq!(tree.classify(&PresenceVector::from_row(7, [1, 0])), "Allergy");
        assert_eq!(tree.classify(&PresenceVector::from_row(7, [0, 1])), "Flu");
    }

    #[test]
    fn test_contradictory_rows_use_majority() {
        let features = array![[1], [1], [1]];
        let labels = labels(&["Flu", "Cold", "Flu"]);
        let tree = DecisionTree::fit(features.view(), &labels, 0, None).unwrap();
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.classify(&PresenceVector::from_row(0, [1])), "Flu");
    }

    #[test]
    fn test_majority_tie_prefers_lowest_class() {
        assert_eq!(majority(&[2, 3, 3]), 1);
        assert_eq!(majority(&[0, 0]), 0);
    }

    #[test]
    fn test_short_vector_reads_missing_as_absent() {
        let tree = fixture();
        assert_eq!(tree.predict_class(&[]), tree.predict_class(&[0; 6]));
    }

    #[test]
    fn test_fit_rejects_bad_input() {
        let features = ndarray::Array2::<u8>::zeros((0, 3));
        let err = DecisionTree::fit(features.view(), &[], 0, None).unwrap_err();
        assert!(matches!(err, ModelError::EmptyDataset));

        let features = array![[1u8, 0], [0, 1]];
        let err = DecisionTree::fit(features.view(), &labels(&["A"]), 0, None).unwrap_err();
        assert!(matches!(err, ModelError::LabelCount { rows: 2, labels: 1 }));
    }
}
