//! Treatment records. Writes go through `clinic_core::treatments`, which
//! checks slug references before persisting.

use chrono::Utc;
use clinic_core::models::auth::TokenClaims;
use clinic_core::models::clinic::{NewTreatment, Treatment, TreatmentChanges};
use clinic_core::treatments;
use tracing::info;
use uuid::Uuid;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::models::{CreateTreatmentRequest, TreatmentWithPatient, UpdateTreatmentRequest};

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Treatment with ID {id} not found"))
}

/// Attach each treatment's patient, soft-deleted or not.
async fn with_patients(
    state: &AppState,
    treatments: Vec<Treatment>,
) -> AppResult<Vec<TreatmentWithPatient>> {
    let mut ids: Vec<Uuid> = treatments.iter().map(|t| t.patient_id).collect();
    ids.sort_unstable();
    ids.dedup();
    let patients = state.store.find_patients_by_ids(&ids).await?;
    Ok(treatments
        .into_iter()
        .map(|treatment| {
            let patient = patients
                .iter()
                .find(|p| p.id == treatment.patient_id)
                .cloned();
            TreatmentWithPatient { treatment, patient }
        })
        .collect())
}

async fn with_patient(state: &AppState, treatment: Treatment) -> AppResult<TreatmentWithPatient> {
    let mut embedded = with_patients(state, vec![treatment]).await?;
    embedded
        .pop()
        .ok_or_else(|| AppError::Internal("treatment lost while embedding patient".into()))
}

/// Create a treatment issued by the caller.
pub async fn create(
    state: &AppState,
    caller: &TokenClaims,
    req: CreateTreatmentRequest,
) -> AppResult<TreatmentWithPatient> {
    let input = NewTreatment {
        date: req.date.unwrap_or_else(Utc::now),
        treatment_options: req.treatment_options,
        medications: req.medications,
        cost_of_treatment: req.cost_of_treatment,
        patient_id: req.patient_id,
        user_id: caller.sub,
    };
    let created = treatments::create_treatment(state.store.as_ref(), input).await?;
    with_patient(state, created).await
}

pub async fn list(state: &AppState) -> AppResult<Vec<TreatmentWithPatient>> {
    let rows = state.store.list_treatments().await?;
    with_patients(state, rows).await
}

/// Active treatments of an active patient.
pub async fn list_for_patient(
    state: &AppState,
    patient_id: Uuid,
) -> AppResult<Vec<TreatmentWithPatient>> {
    if state.store.get_patient(patient_id).await?.is_none() {
        return Err(AppError::NotFound(format!(
            "Patient with ID {patient_id} not found"
        )));
    }
    let rows = state.store.list_treatments_for_patient(patient_id).await?;
    with_patients(state, rows).await
}

pub async fn get(state: &AppState, id: Uuid) -> AppResult<TreatmentWithPatient> {
    let treatment = state
        .store
        .get_treatment(id)
        .await?
        .ok_or_else(|| not_found(id))?;
    with_patient(state, treatment).await
}

pub async fn update(
    state: &AppState,
    id: Uuid,
    req: UpdateTreatmentRequest,
) -> AppResult<TreatmentWithPatient> {
    let changes = TreatmentChanges {
        date: req.date,
        treatment_options: req.treatment_options,
        medications: req.medications,
        cost_of_treatment: req.cost_of_treatment,
        patient_id: req.patient_id,
    };
    let updated = treatments::update_treatment(state.store.as_ref(), id, changes).await?;
    with_patient(state, updated).await
}

pub async fn delete(state: &AppState, id: Uuid) -> AppResult<TreatmentWithPatient> {
    let deleted = state
        .store
        .soft_delete_treatment(id)
        .await?
        .ok_or_else(|| not_found(id))?;
    info!(treatment_id = %deleted.id, "treatment deleted");
    with_patient(state, deleted).await
}
