//! Patient request handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use clinic_core::models::clinic::Patient;
use uuid::Uuid;

use crate::AppState;
use crate::error::AppResult;
use crate::extract::{AppJson, AppPath};
use crate::models::{CreatePatientRequest, UpdatePatientRequest};
use crate::services::patients;

/// `POST /patients`
pub async fn create_patient_handler(
    State(state): State<AppState>,
    AppJson(body): AppJson<CreatePatientRequest>,
) -> AppResult<(StatusCode, Json<Patient>)> {
    let patient = patients::create(&state, body).await?;
    Ok((StatusCode::CREATED, Json(patient)))
}

/// `GET /patients`
pub async fn list_patients_handler(State(state): State<AppState>) -> AppResult<Json<Vec<Patient>>> {
    Ok(Json(patients::list(&state).await?))
}

/// `GET /patients/{id}`
pub async fn get_patient_handler(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<Patient>> {
    Ok(Json(patients::get(&state, id).await?))
}

/// `PATCH /patients/{id}`
pub async fn update_patient_handler(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(body): AppJson<UpdatePatientRequest>,
) -> AppResult<Json<Patient>> {
    Ok(Json(patients::update(&state, id, body).await?))
}

/// `DELETE /patients/{id}`: soft delete.
pub async fn delete_patient_handler(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<Patient>> {
    Ok(Json(patients::delete(&state, id).await?))
}
