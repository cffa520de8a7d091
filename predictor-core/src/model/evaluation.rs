//! Held-out accuracy

use serde::{Deserialize, Serialize};

use super::DiseaseClassifier;
use crate::dataset::FeatureTable;
use crate::error::ModelError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub samples: usize,
    pub correct: usize,
}

impl Evaluation {
    /// Share of correct predictions; `None` when nothing was scored
    pub fn accuracy(&self) -> Option<f64> {
        (self.samples > 0).then(|| self.correct as f64 / self.samples as f64)
    }
}

/// Score `classifier` on every row of `table`.
///
/// Rows whose label the classifier never saw simply count as misses.
pub fn evaluate<C>(classifier: &C, table: &FeatureTable) -> Result<Evaluation, ModelError>
where
    C: DiseaseClassifier + ?Sized,
{
    if table.layout_hash() != classifier.layout_hash() {
        return Err(ModelError::LayoutMismatch {
            catalog: table.layout_hash(),
            classifier: classifier.layout_hash(),
        });
    }

    let mut evaluation = Evaluation::default();
    for (index, expected) in table.labels().iter().enumerate() {
        let Some(vector) = table.vector(index) else {
            continue;
        };
        evaluation.samples += 1;
        if classifier.classify(&vector) == expected.as_str() {
            evaluation.correct += 1;
        }
    }
    Ok(evaluation)
}
