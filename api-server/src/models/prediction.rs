//! Prediction bodies
//!
//! Missing fields default to empty, so `{}` is a valid (all-zero) request.
//! Fields present with the wrong JSON type are rejected by the extractor.

use diagnosis_core::Prediction;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
pub struct PredictRequest {
    #[serde(default)]
    pub symptoms: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ConversationRequest {
    /// Only used for logging
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub additional_symptoms: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub disease: String,
    pub description: String,
    pub precautions: Vec<String>,
}

impl From<Prediction> for PredictionResponse {
    fn from(prediction: Prediction) -> Self {
        Self {
            disease: prediction.disease,
            description: prediction.description,
            precautions: prediction.precautions,
        }
    }
}
