//! Router tests over a small in-memory dataset

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use diagnosis_core::{PredictionService, ReferenceData, TrainingConfig, TrainingSet, NO_DESCRIPTION};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::config::Config;
use crate::models::PredictionResponse;
use crate::{create_router, AppState};

const TRAINING: &str = "\
itching,skin_rash,nausea,vomiting,headache,high_fever,prognosis
1,1,0,0,0,0,Fungal infection
1,1,0,0,0,0,Fungal infection
0,0,1,1,0,0,Gastroenteritis
0,0,1,1,0,0,Gastroenteritis
0,0,0,0,1,1,Malaria
0,0,0,0,1,1,Malaria
1,0,1,0,0,0,Drug Reaction
";

const DESCRIPTIONS: &str = "\
Fungal infection,Fungus takes over an area of the body.
Gastroenteritis,Inflammation of the stomach and intestines.
Malaria,Spread by mosquitoes.
";

const PRECAUTIONS: &str = "\
Fungal infection,bath twice,keep infected area dry
Malaria,use mosquito net,,consult nearest hospital
";

const SEVERITY: &str = "\
itching,1
skin_rash,3
nausea,5
headache,not_a_number
";

fn app() -> Router {
    let training = TrainingSet::from_reader(TRAINING.as_bytes()).unwrap();
    let reference = ReferenceData::from_readers(
        DESCRIPTIONS.as_bytes(),
        PRECAUTIONS.as_bytes(),
        SEVERITY.as_bytes(),
    )
    .unwrap();
    let config = TrainingConfig {
        test_fraction: 0.0,
        ..Default::default()
    };
    let service = PredictionService::from_training(&training, None, reference, &config).unwrap();

    create_router(AppState {
        service: Arc::new(service),
        config: Config::default(),
    })
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

async fn get(path: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(path).body(Body::empty()).unwrap();
    send(app(), request).await
}

async fn post_json(path: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app(), request).await
}

fn prediction(body: Value) -> PredictionResponse {
    serde_json::from_value(body).unwrap()
}

#[tokio::test]
async fn test_get_symptoms_in_catalog_order() {
    let (status, body) = get("/get_symptoms").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "symptoms": ["itching", "skin_rash", "nausea", "vomiting", "headache", "high_fever"]
        })
    );
}

#[tokio::test]
async fn test_predict_returns_disease_and_reference_text() {
    let (status, body) = post_json("/predict", json!({ "symptoms": ["itching", "skin_rash"] })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "disease": "Fungal infection",
            "description": "Fungus takes over an area of the body.",
            "precautions": ["bath twice", "keep infected area dry"]
        })
    );
}

#[tokio::test]
async fn test_predict_unknown_symptom_is_not_an_error() {
    let (status, body) = post_json("/predict", json!({ "symptoms": ["not_a_real_symptom"] })).await;
    assert_eq!(status, StatusCode::OK);

    let (_, empty) = post_json("/predict", json!({ "symptoms": [] })).await;
    assert_eq!(prediction(body), prediction(empty));
}

#[tokio::test]
async fn test_predict_missing_symptoms_field_defaults_to_empty() {
    let (status, body) = post_json("/predict", json!({})).await;
    assert_eq!(status, StatusCode::OK);

    // The all-zero vector lands on Malaria with this dataset
    let body = prediction(body);
    assert_eq!(body.disease, "Malaria");
    assert_eq!(body.precautions, vec!["use mosquito net", "consult nearest hospital"]);
}

#[tokio::test]
async fn test_predict_fallback_for_missing_reference_rows() {
    let (status, body) = post_json("/predict", json!({ "symptoms": ["itching", "nausea"] })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "disease": "Drug Reaction",
            "description": NO_DESCRIPTION,
            "precautions": []
        })
    );
}

#[tokio::test]
async fn test_predict_is_order_insensitive_and_deterministic() {
    let (_, a) = post_json("/predict", json!({ "symptoms": ["nausea", "vomiting"] })).await;
    let (_, b) = post_json("/predict", json!({ "symptoms": [" Vomiting", "NAUSEA"] })).await;
    let (_, c) = post_json("/predict", json!({ "symptoms": ["nausea", "vomiting"] })).await;
    assert_eq!(a, b);
    assert_eq!(a, c);
    assert_eq!(prediction(a).disease, "Gastroenteritis");
}

#[tokio::test]
async fn test_start_conversation_matches_concatenated_predict() {
    let (status, conversation) = post_json(
        "/start_conversation",
        json!({
            "name": "Sam",
            "symptoms": ["itching"],
            "additional_symptoms": ["nausea"]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, predict) = post_json("/predict", json!({ "symptoms": ["itching", "nausea"] })).await;
    assert_eq!(conversation, predict);
}

#[tokio::test]
async fn test_start_conversation_optional_fields() {
    let (status, body) = post_json("/start_conversation", json!({ "symptoms": ["headache"] })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(prediction(body).disease, "Malaria");
}

#[tokio::test]
async fn test_every_catalog_symptom_predicts() {
    let (_, body) = get("/get_symptoms").await;
    let symptoms: Vec<String> = serde_json::from_value(body["symptoms"].clone()).unwrap();
    let labels = ["Drug Reaction", "Fungal infection", "Gastroenteritis", "Malaria"];

    for symptom in symptoms {
        let (status, body) = post_json("/predict", json!({ "symptoms": [symptom] })).await;
        assert_eq!(status, StatusCode::OK);
        assert!(labels.contains(&prediction(body).disease.as_str()));
    }
}

#[tokio::test]
async fn test_wrong_field_type_is_bad_request() {
    let (status, body) = post_json("/predict", json!({ "symptoms": "itching" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
}

#[tokio::test]
async fn test_invalid_json_is_bad_request() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/predict")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, _) = send(app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_content_type_is_unsupported() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/predict")
        .body(Body::from(r#"{"symptoms":["itching"]}"#))
        .unwrap();
    let (status, body) = send(app(), request).await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(body["status"], 415);
}

#[tokio::test]
async fn test_health_reports_model() {
    let (status, body) = get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["model"]["symptom_count"], 6);
    assert_eq!(body["model"]["disease_count"], 4);
    assert_eq!(body["model"]["validation_accuracy"], Value::Null);
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let (status, body) = get("/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Route not found");
}

#[tokio::test]
async fn test_cors_allows_frontend_origin() {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/predict")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:3000"
    );
}

#[test]
fn test_reference_tables_loaded_for_fixture() {
    let data = ReferenceData::from_readers(
        DESCRIPTIONS.as_bytes(),
        PRECAUTIONS.as_bytes(),
        SEVERITY.as_bytes(),
    )
    .unwrap();
    assert_eq!(data.severity_count(), 3);
    assert_eq!(data.description("Drug Reaction"), None);
}
