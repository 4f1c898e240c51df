//! Treatment request handlers. Every response embeds the treatment's patient.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use uuid::Uuid;

use crate::AppState;
use crate::error::AppResult;
use crate::extract::{AppJson, AppPath};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{CreateTreatmentRequest, TreatmentWithPatient, UpdateTreatmentRequest};
use crate::services::treatments;

/// `POST /treatments`
pub async fn create_treatment_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(claims)): Extension<AuthenticatedUser>,
    AppJson(body): AppJson<CreateTreatmentRequest>,
) -> AppResult<(StatusCode, Json<TreatmentWithPatient>)> {
    let treatment = treatments::create(&state, &claims, body).await?;
    Ok((StatusCode::CREATED, Json(treatment)))
}

/// `GET /treatments`
pub async fn list_treatments_handler(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<TreatmentWithPatient>>> {
    Ok(Json(treatments::list(&state).await?))
}

/// `GET /treatments/{id}`
pub async fn get_treatment_handler(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<TreatmentWithPatient>> {
    Ok(Json(treatments::get(&state, id).await?))
}

/// `GET /treatments/patient/{patient_id}`
pub async fn list_patient_treatments_handler(
    State(state): State<AppState>,
    AppPath(patient_id): AppPath<Uuid>,
) -> AppResult<Json<Vec<TreatmentWithPatient>>> {
    Ok(Json(treatments::list_for_patient(&state, patient_id).await?))
}

/// `PATCH /treatments/{id}`
pub async fn update_treatment_handler(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(body): AppJson<UpdateTreatmentRequest>,
) -> AppResult<Json<TreatmentWithPatient>> {
    Ok(Json(treatments::update(&state, id, body).await?))
}

/// `DELETE /treatments/{id}`: soft delete.
pub async fn delete_treatment_handler(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<TreatmentWithPatient>> {
    Ok(Json(treatments::delete(&state, id).await?))
}
