//! Medication catalog handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use clinic_core::models::clinic::{CatalogEntry, CatalogFilter, CatalogKind};
use uuid::Uuid;

use crate::AppState;
use crate::error::AppResult;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::models::{
    AllMedicationsQuery, CreateCatalogEntryRequest, SearchQuery, UpdateCatalogEntryRequest,
};
use crate::services::catalog;

const KIND: CatalogKind = CatalogKind::Medication;

/// `POST /medications`
pub async fn create_medication_handler(
    State(state): State<AppState>,
    AppJson(body): AppJson<CreateCatalogEntryRequest>,
) -> AppResult<(StatusCode, Json<CatalogEntry>)> {
    let entry = catalog::create(&state, KIND, body).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// `GET /medications` and `GET /medications/active`: active entries by name.
pub async fn list_medications_handler(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<CatalogEntry>>> {
    Ok(Json(
        catalog::list(&state, KIND, CatalogFilter::default()).await?,
    ))
}

/// `GET /medications/search?query=`
pub async fn search_medications_handler(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<SearchQuery>,
) -> AppResult<Json<Vec<CatalogEntry>>> {
    Ok(Json(catalog::search(&state, KIND, params.query).await?))
}

/// `GET /medications/all?includeDeleted=`: admin view.
pub async fn list_all_medications_handler(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<AllMedicationsQuery>,
) -> AppResult<Json<Vec<CatalogEntry>>> {
    let filter = CatalogFilter {
        include_deleted: params.include_deleted,
        name_contains: None,
    };
    Ok(Json(catalog::list(&state, KIND, filter).await?))
}

/// `GET /medications/{id}`: resolves soft-deleted entries too.
pub async fn get_medication_handler(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<CatalogEntry>> {
    Ok(Json(catalog::get(&state, KIND, id).await?))
}

/// `PATCH /medications/{id}`
pub async fn update_medication_handler(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(body): AppJson<UpdateCatalogEntryRequest>,
) -> AppResult<Json<CatalogEntry>> {
    Ok(Json(catalog::update(&state, KIND, id, body).await?))
}

/// `DELETE /medications/{id}`: soft delete.
pub async fn delete_medication_handler(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<CatalogEntry>> {
    Ok(Json(catalog::delete(&state, KIND, id).await?))
}
