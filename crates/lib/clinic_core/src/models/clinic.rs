//! Clinic record models: catalog entries, patients, treatments.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Catalog
// =============================================================================

/// Kind of catalog referenced from treatments by slug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogKind {
    Medication,
    TreatmentOption,
}

impl CatalogKind {
    /// Backing table.
    pub fn table(&self) -> &'static str {
        match self {
            CatalogKind::Medication => "medications",
            CatalogKind::TreatmentOption => "treatment_options",
        }
    }

    /// Collection name used in caller-facing messages.
    pub fn collection(&self) -> &'static str {
        match self {
            CatalogKind::Medication => "medications",
            CatalogKind::TreatmentOption => "treatment options",
        }
    }

    /// Singular name used in caller-facing messages.
    pub fn noun(&self) -> &'static str {
        match self {
            CatalogKind::Medication => "Medication",
            CatalogKind::TreatmentOption => "Treatment option",
        }
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.collection())
    }
}

/// Medication or treatment option. `deleted_at` set means soft-deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl CatalogEntry {
    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct NewCatalogEntry {
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Default)]
pub struct CatalogChanges {
    pub name: Option<String>,
    pub slug: Option<String>,
}

/// Listing filter. The default lists active entries only.
#[derive(Debug, Clone, Default)]
pub struct CatalogFilter {
    /// Include soft-deleted rows (admin view). Active rows sort first.
    pub include_deleted: bool,
    /// Case-insensitive substring match on `name`.
    pub name_contains: Option<String>,
}

// =============================================================================
// Patients
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: Uuid,
    pub name: String,
    /// Clinic-assigned identifier, unique among active patients.
    pub patient_code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewPatient {
    pub name: String,
    pub patient_code: String,
}

#[derive(Debug, Clone, Default)]
pub struct PatientChanges {
    pub name: Option<String>,
    pub patient_code: Option<String>,
}

// =============================================================================
// Treatments
// =============================================================================

/// Treatment record. Slug lists were validated against the active catalog
/// when written and are never re-checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Treatment {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub treatment_options: Vec<String>,
    pub medications: Vec<String>,
    pub cost_of_treatment: f64,
    pub patient_id: Uuid,
    /// Staff member who issued the treatment.
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewTreatment {
    pub date: DateTime<Utc>,
    pub treatment_options: Vec<String>,
    pub medications: Vec<String>,
    pub cost_of_treatment: f64,
    pub patient_id: Uuid,
    pub user_id: Uuid,
}

#[derive(Debug, Clone, Default)]
pub struct TreatmentChanges {
    pub date: Option<DateTime<Utc>>,
    pub treatment_options: Option<Vec<String>>,
    pub medications: Option<Vec<String>>,
    pub cost_of_treatment: Option<f64>,
    pub patient_id: Option<Uuid>,
}
