//! Diagnosis Core - Symptom Checker Prediction Library
//!
//! Everything the HTTP server needs to answer a symptom list:
//!
//! ```text
//!   raw symptoms ──► catalog / vector ──► model (decision tree) ──► reference
//!                    (PresenceVector)      (DiseaseLabel)            (description,
//!                                                                     precautions)
//! ```
//!
//! All tables and the fitted model are built once by
//! [`PredictionService::bootstrap`] and are read-only afterwards, so a single
//! service can be shared across request handlers without locking.

pub mod catalog;
pub mod dataset;
pub mod error;
pub mod model;
pub mod reference;
pub mod service;
pub mod vector;

// Re-export common types
pub use catalog::SymptomCatalog;
pub use dataset::{DataPaths, FeatureTable, TrainingSet};
pub use error::{DataError, Error, ModelError, Result};
pub use model::{DecisionTree, DiseaseClassifier, Evaluation, TrainingConfig};
pub use reference::{LoadReport, ReferenceData};
pub use service::{ModelSummary, Prediction, PredictionService, NO_DESCRIPTION};
pub use vector::{vectorize, PresenceVector, Vectorized};
