//! Health check handler

use axum::{extract::State, Json};
use diagnosis_core::ModelSummary;
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    timestamp: i64,
    model: ModelStatus,
}

#[derive(Serialize)]
pub struct ModelStatus {
    symptom_count: usize,
    disease_count: usize,
    layout_hash: String,
    validation_accuracy: Option<f64>,
    test_accuracy: Option<f64>,
}

impl From<&ModelSummary> for ModelStatus {
    fn from(summary: &ModelSummary) -> Self {
        Self {
            symptom_count: summary.symptom_count,
            disease_count: summary.disease_count,
            layout_hash: format!("{:08x}", summary.layout_hash),
            validation_accuracy: summary.validation_accuracy(),
            test_accuracy: summary.test_accuracy(),
        }
    }
}

pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().timestamp(),
        model: state.service.summary().into(),
    })
}
