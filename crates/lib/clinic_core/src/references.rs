//! Slug reference checks for treatment writes.
//!
//! A treatment names its treatment options and medications by slug. Before a
//! create or update is persisted, every named slug must resolve to an active
//! catalog entry of the right kind. The check runs at write time only; records
//! already written are never re-validated when the catalog changes later.

use std::collections::HashSet;

use thiserror::Error;

use crate::models::clinic::CatalogKind;
use crate::store::{CatalogStore, StoreError};

#[derive(Debug, Error)]
pub enum ReferenceError {
    /// At least one slug has no active entry. Which ones is not reported.
    #[error("One or more {} not found", .0.collection())]
    NotFound(CatalogKind),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Drop repeated slugs, keeping the first occurrence of each.
pub fn dedup_slugs(slugs: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(slugs.len());
    slugs
        .into_iter()
        .filter(|slug| seen.insert(slug.clone()))
        .collect()
}

/// Require every slug in `slugs` to name an active entry of `kind`.
/// An empty list passes without touching the store.
pub async fn ensure_active_slugs<S>(
    catalog: &S,
    kind: CatalogKind,
    slugs: &[String],
) -> Result<(), ReferenceError>
where
    S: CatalogStore + ?Sized,
{
    if slugs.is_empty() {
        return Ok(());
    }
    let requested: HashSet<&str> = slugs.iter().map(String::as_str).collect();
    let found = catalog.find_catalog_entries_by_slugs(kind, slugs).await?;
    let resolved: HashSet<&str> = found
        .iter()
        .map(|entry| entry.slug.as_str())
        .filter(|slug| requested.contains(slug))
        .collect();

    if resolved.len() == requested.len() {
        Ok(())
    } else {
        tracing::debug!(
            %kind,
            requested = requested.len(),
            resolved = resolved.len(),
            "slug reference check failed"
        );
        Err(ReferenceError::NotFound(kind))
    }
}

/// Check the slug lists of a treatment write. `None` means the write leaves
/// that list untouched, so it is not checked. Treatment options are checked
/// before medications.
pub async fn validate_treatment_references<S>(
    catalog: &S,
    treatment_options: Option<&[String]>,
    medications: Option<&[String]>,
) -> Result<(), ReferenceError>
where
    S: CatalogStore + ?Sized,
{
    if let Some(slugs) = treatment_options {
        ensure_active_slugs(catalog, CatalogKind::TreatmentOption, slugs).await?;
    }
    if let Some(slugs) = medications {
        ensure_active_slugs(catalog, CatalogKind::Medication, slugs).await?;
    }
    Ok(())
}
