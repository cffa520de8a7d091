//! Prediction Service - Vectorizer + Classifier + Reference Data
//!
//! Built once at startup and shared read-only between request handlers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::SymptomCatalog;
use crate::dataset::{train_validation_split, DataPaths, FeatureTable, TrainingSet};
use crate::error::{ModelError, Result};
use crate::model::{evaluate, DecisionTree, DiseaseClassifier, Evaluation, TrainingConfig};
use crate::reference::ReferenceData;
use crate::vector::vectorize;

/// Placeholder used when a predicted disease has no description row
pub const NO_DESCRIPTION: &str = "No description available.";

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Answer to one symptom list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prediction {
    pub disease: String,
    pub description: String,
    pub precautions: Vec<String>,
    /// Normalized input tokens not in the catalog
    pub unrecognized: Vec<String>,
    /// Sum of severity scores of the recognized symptoms
    pub severity: i64,
}

/// Model facts for startup logs and the health endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSummary {
    pub symptom_count: usize,
    pub disease_count: usize,
    pub layout_hash: u32,
    pub validation: Option<Evaluation>,
    pub test: Option<Evaluation>,
}

impl ModelSummary {
    pub fn validation_accuracy(&self) -> Option<f64> {
        self.validation.as_ref().and_then(Evaluation::accuracy)
    }

    pub fn test_accuracy(&self) -> Option<f64> {
        self.test.as_ref().and_then(Evaluation::accuracy)
    }
}

// ============================================================================
// SERVICE
// ============================================================================

pub struct PredictionService {
    catalog: SymptomCatalog,
    classifier: Box<dyn DiseaseClassifier>,
    reference: ReferenceData,
    profiles: BTreeMap<String, Vec<String>>,
    summary: ModelSummary,
}

impl std::fmt::Debug for PredictionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PredictionService")
            .field("summary", &self.summary)
            .finish_non_exhaustive()
    }
}

impl PredictionService {
    /// Wire a fitted classifier to its catalog and the reference tables.
    ///
    /// Fails if the classifier was fitted on a different symptom layout.
    pub fn new(
        catalog: SymptomCatalog,
        classifier: Box<dyn DiseaseClassifier>,
        reference: ReferenceData,
    ) -> Result<Self, ModelError> {
        if catalog.layout_hash() != classifier.layout_hash() {
            return Err(ModelError::LayoutMismatch {
                catalog: catalog.layout_hash(),
                classifier: classifier.layout_hash(),
            });
        }

        let summary = ModelSummary {
            symptom_count: catalog.len(),
            disease_count: classifier.labels().len(),
            layout_hash: catalog.layout_hash(),
            validation: None,
            test: None,
        };

        Ok(Self {
            catalog,
            classifier,
            reference,
            profiles: BTreeMap::new(),
            summary,
        })
    }

    /// Load every table from `paths`, fit the tree and score it.
    pub fn bootstrap(paths: &DataPaths, config: &TrainingConfig) -> Result<Self> {
        log::info!("Loading training data from {}", paths.training.display());
        let training = TrainingSet::from_path(&paths.training)?;
        let testing = FeatureTable::from_path(&paths.testing, training.catalog())?;
        let reference =
            ReferenceData::from_paths(&paths.descriptions, &paths.precautions, &paths.severity)?;

        Self::from_training(&training, Some(&testing), reference, config)
    }

    /// Fit on `training` (minus the validation hold-out) and score the result.
    pub fn from_training(
        training: &TrainingSet,
        testing: Option<&FeatureTable>,
        reference: ReferenceData,
        config: &TrainingConfig,
    ) -> Result<Self> {
        let split = train_validation_split(training.len(), config.test_fraction, config.seed);
        let train = training.table().select(&split.train);
        let validation = training.table().select(&split.validation);

        let tree = DecisionTree::fit(
            train.features(),
            train.labels(),
            training.catalog().layout_hash(),
            config.max_depth,
        )?;

        let validation = evaluate(&tree, &validation)?;
        let test = testing.map(|table| evaluate(&tree, table)).transpose()?;

        let mut service = Self::new(training.catalog().clone(), Box::new(tree), reference)?;
        service.summary.validation = Some(validation);
        service.summary.test = test;
        service.profiles = training.symptom_profiles();

        log::info!(
            "Model ready: {} symptoms, {} diseases, layout {:#010x}, validation accuracy {}, test accuracy {}",
            service.summary.symptom_count,
            service.summary.disease_count,
            service.summary.layout_hash,
            format_accuracy(service.summary.validation_accuracy()),
            format_accuracy(service.summary.test_accuracy()),
        );

        Ok(service)
    }

    pub fn catalog(&self) -> &SymptomCatalog {
        &self.catalog
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    pub fn summary(&self) -> &ModelSummary {
        &self.summary
    }

    /// Catalog symptoms seen with `disease` in the training table
    pub fn associated_symptoms(&self, disease: &str) -> &[String] {
        self.profiles
            .get(disease)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Predict from one symptom list.
    ///
    /// Never fails: unknown symptoms are ignored (and reported), a disease
    /// without reference rows gets [`NO_DESCRIPTION`] and no precautions.
    pub fn predict<I, S>(&self, symptoms: I) -> Prediction
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let vectorized = vectorize(&self.catalog, symptoms);
        let disease = self.classifier.classify(&vectorized.vector).to_string();

        let severity: i64 = vectorized
            .vector
            .present_indices()
            .filter_map(|i| self.catalog.name(i))
            .filter_map(|name| self.reference.severity(name))
            .map(i64::from)
            .sum();

        let description = self
            .reference
            .description(&disease)
            .unwrap_or(NO_DESCRIPTION)
            .to_string();
        let precautions = self
            .reference
            .precautions(&disease)
            .map(<[String]>::to_vec)
            .unwrap_or_default();

        log::debug!(
            "Predicted {} from {} symptoms (severity {})",
            disease,
            vectorized.vector.count_present(),
            severity
        );

        Prediction {
            disease,
            description,
            precautions,
            unrecognized: vectorized.unrecognized,
            severity,
        }
    }

    /// Predict from a primary list followed by additional symptoms.
    pub fn predict_combined<S: AsRef<str>>(&self, symptoms: &[S], additional: &[S]) -> Prediction {
        self.predict(symptoms.iter().chain(additional))
    }
}

fn format_accuracy(accuracy: Option<f64>) -> String {
    accuracy.map_or_else(|| "n/a".to_string(), |a| format!("{:.1}%", a * 100.0))
}

// ============================================================================
// TESTS
// ============================================================================
