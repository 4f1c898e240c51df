//! Medications and treatment options.

use clinic_core::models::clinic::{
    CatalogChanges, CatalogEntry, CatalogFilter, CatalogKind, NewCatalogEntry,
};
use tracing::info;
use uuid::Uuid;

use super::{optional, required};
use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::models::{CreateCatalogEntryRequest, UpdateCatalogEntryRequest};

fn not_found(kind: CatalogKind, id: Uuid) -> AppError {
    AppError::NotFound(format!("{} with ID {id} not found", kind.noun()))
}

pub async fn create(
    state: &AppState,
    kind: CatalogKind,
    req: CreateCatalogEntryRequest,
) -> AppResult<CatalogEntry> {
    let entry = NewCatalogEntry {
        name: required("name", &req.name)?,
        slug: required("slug", &req.slug)?,
    };
    let created = state.store.create_catalog_entry(kind, entry).await?;
    info!(%kind, id = %created.id, slug = %created.slug, "catalog entry created");
    Ok(created)
}

pub async fn list(
    state: &AppState,
    kind: CatalogKind,
    filter: CatalogFilter,
) -> AppResult<Vec<CatalogEntry>> {
    Ok(state.store.list_catalog_entries(kind, &filter).await?)
}

/// Active entries whose name contains `query`. A blank query lists all
/// active entries.
pub async fn search(
    state: &AppState,
    kind: CatalogKind,
    query: Option<String>,
) -> AppResult<Vec<CatalogEntry>> {
    let filter = CatalogFilter {
        include_deleted: false,
        name_contains: query
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty()),
    };
    list(state, kind, filter).await
}

/// Entry by id, soft-deleted or not.
pub async fn get(state: &AppState, kind: CatalogKind, id: Uuid) -> AppResult<CatalogEntry> {
    state
        .store
        .get_catalog_entry(kind, id)
        .await?
        .ok_or_else(|| not_found(kind, id))
}

pub async fn update(
    state: &AppState,
    kind: CatalogKind,
    id: Uuid,
    req: UpdateCatalogEntryRequest,
) -> AppResult<CatalogEntry> {
    let changes = CatalogChanges {
        name: optional("name", req.name)?,
        slug: optional("slug", req.slug)?,
    };
    state
        .store
        .update_catalog_entry(kind, id, changes)
        .await?
        .ok_or_else(|| not_found(kind, id))
}

/// Soft delete. Treatments already referencing the slug are left as they are.
pub async fn delete(state: &AppState, kind: CatalogKind, id: Uuid) -> AppResult<CatalogEntry> {
    let deleted = state
        .store
        .soft_delete_catalog_entry(kind, id)
        .await?
        .ok_or_else(|| not_found(kind, id))?;
    info!(%kind, id = %deleted.id, slug = %deleted.slug, "catalog entry deleted");
    Ok(deleted)
}
