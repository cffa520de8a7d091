//! HTTP handlers

pub mod health;
pub mod prediction;
pub mod symptoms;

use crate::AppError;

/// Fallback for unknown routes
pub async fn not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}
