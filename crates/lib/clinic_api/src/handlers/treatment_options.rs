//! Treatment option catalog handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use clinic_core::models::clinic::{CatalogEntry, CatalogFilter, CatalogKind};
use uuid::Uuid;

use crate::AppState;
use crate::error::AppResult;
use crate::extract::{AppJson, AppPath};
use crate::models::{CreateCatalogEntryRequest, UpdateCatalogEntryRequest};
use crate::services::catalog;

const KIND: CatalogKind = CatalogKind::TreatmentOption;

/// `POST /treatments/options`
pub async fn create_treatment_option_handler(
    State(state): State<AppState>,
    AppJson(body): AppJson<CreateCatalogEntryRequest>,
) -> AppResult<(StatusCode, Json<CatalogEntry>)> {
    let entry = catalog::create(&state, KIND, body).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// `GET /treatments/options`: active options ordered by name.
pub async fn list_treatment_options_handler(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<CatalogEntry>>> {
    Ok(Json(
        catalog::list(&state, KIND, CatalogFilter::default()).await?,
    ))
}

/// `PATCH /treatments/options/{id}`
pub async fn update_treatment_option_handler(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(body): AppJson<UpdateCatalogEntryRequest>,
) -> AppResult<Json<CatalogEntry>> {
    Ok(Json(catalog::update(&state, KIND, id, body).await?))
}

/// `DELETE /treatments/options/{id}`: soft delete.
pub async fn delete_treatment_option_handler(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<CatalogEntry>> {
    Ok(Json(catalog::delete(&state, KIND, id).await?))
}
