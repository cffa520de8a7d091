//! Symptom catalog handler

use axum::{extract::State, Json};

use crate::AppState;
use crate::models::SymptomsResponse;

/// List every symptom the model knows, in catalog order
pub async fn list(State(state): State<AppState>) -> Json<SymptomsResponse> {
    Json(SymptomsResponse {
        symptoms: state.service.catalog().names().to_vec(),
    })
}
