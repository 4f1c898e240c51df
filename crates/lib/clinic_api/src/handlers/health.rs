//! Liveness endpoint.

use axum::Json;
use axum::extract::State;

use crate::AppState;
use crate::models::HealthResponse;

/// `GET /health`: reports the crate version and whether the store answers.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let store_connected = state.store.ping().await;
    Json(HealthResponse {
        status: "ok".into(),
        version: clinic_core::version().to_string(),
        store_connected,
    })
}
