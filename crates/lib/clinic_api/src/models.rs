//! Request and response bodies.
//!
//! Records themselves (users, patients, catalog entries, treatments) are
//! serialised straight from the `clinic_core` models.

use chrono::{DateTime, Utc};
use clinic_core::models::auth::User;
use clinic_core::models::clinic::{Patient, Treatment};
use clinic_core::rbac::{Permission, Role};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub store_connected: bool,
}

// -----------------------------------------------------------------------------
// Auth
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<Role>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Returned by register and login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub token: String,
}

impl AuthResponse {
    pub fn new(user: User, token: String) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
            token,
        }
    }
}

/// The caller as seen through its token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhoAmIResponse {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    pub permissions: Vec<Permission>,
}

// -----------------------------------------------------------------------------
// Catalog
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCatalogEntryRequest {
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCatalogEntryRequest {
    pub name: Option<String>,
    pub slug: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllMedicationsQuery {
    #[serde(default)]
    pub include_deleted: bool,
}

// -----------------------------------------------------------------------------
// Patients
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePatientRequest {
    pub name: String,
    pub patient_code: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePatientRequest {
    pub name: Option<String>,
    pub patient_code: Option<String>,
}

// -----------------------------------------------------------------------------
// Treatments
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTreatmentRequest {
    /// Defaults to the time of the request.
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub treatment_options: Vec<String>,
    #[serde(default)]
    pub medications: Vec<String>,
    pub cost_of_treatment: f64,
    pub patient_id: Uuid,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTreatmentRequest {
    pub date: Option<DateTime<Utc>>,
    pub treatment_options: Option<Vec<String>>,
    pub medications: Option<Vec<String>>,
    pub cost_of_treatment: Option<f64>,
    pub patient_id: Option<Uuid>,
}

/// A treatment with its patient embedded. `patient` is `null` only if the
/// patient row is missing altogether.
#[derive(Debug, Clone, Serialize)]
pub struct TreatmentWithPatient {
    #[serde(flatten)]
    pub treatment: Treatment,
    pub patient: Option<Patient>,
}

// -----------------------------------------------------------------------------
// Users
// -----------------------------------------------------------------------------

/// Role changes are not accepted here; unknown fields such as `role` are
/// rejected outright.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}
