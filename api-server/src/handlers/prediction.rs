//! Prediction handlers

use axum::{extract::{rejection::JsonRejection, State}, Json};

use crate::{AppState, AppResult};
use crate::models::{ConversationRequest, PredictRequest, PredictionResponse};

/// Predict a disease from a symptom list
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> AppResult<Json<PredictionResponse>> {
    let Json(req) = payload?;

    let prediction = state.service.predict(&req.symptoms);
    tracing::info!(
        disease = %prediction.disease,
        symptoms = req.symptoms.len(),
        unrecognized = prediction.unrecognized.len(),
        severity = prediction.severity,
        "Prediction served"
    );

    Ok(Json(prediction.into()))
}

/// Predict from the symptoms gathered in a guided conversation
pub async fn start_conversation(
    State(state): State<AppState>,
    payload: Result<Json<ConversationRequest>, JsonRejection>,
) -> AppResult<Json<PredictionResponse>> {
    let Json(req) = payload?;

    let prediction = state
        .service
        .predict_combined(&req.symptoms, &req.additional_symptoms);
    let related = state.service.associated_symptoms(&prediction.disease);
    tracing::info!(
        name = %req.name,
        disease = %prediction.disease,
        symptoms = req.symptoms.len() + req.additional_symptoms.len(),
        unrecognized = prediction.unrecognized.len(),
        severity = prediction.severity,
        related = ?related,
        "Conversation prediction served"
    );

    Ok(Json(prediction.into()))
}
