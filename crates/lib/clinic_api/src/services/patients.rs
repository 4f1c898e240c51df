//! Patient records.

use clinic_core::models::clinic::{NewPatient, Patient, PatientChanges};
use tracing::info;
use uuid::Uuid;

use super::{optional, required};
use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::models::{CreatePatientRequest, UpdatePatientRequest};

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Patient with ID {id} not found"))
}

pub async fn create(state: &AppState, req: CreatePatientRequest) -> AppResult<Patient> {
    let patient = NewPatient {
        name: required("name", &req.name)?,
        patient_code: required("patientCode", &req.patient_code)?,
    };
    let created = state.store.create_patient(patient).await?;
    info!(patient_id = %created.id, "patient created");
    Ok(created)
}

pub async fn list(state: &AppState) -> AppResult<Vec<Patient>> {
    Ok(state.store.list_patients().await?)
}

pub async fn get(state: &AppState, id: Uuid) -> AppResult<Patient> {
    state.store.get_patient(id).await?.ok_or_else(|| not_found(id))
}

pub async fn update(state: &AppState, id: Uuid, req: UpdatePatientRequest) -> AppResult<Patient> {
    let changes = PatientChanges {
        name: optional("name", req.name)?,
        patient_code: optional("patientCode", req.patient_code)?,
    };
    state
        .store
        .update_patient(id, changes)
        .await?
        .ok_or_else(|| not_found(id))
}

pub async fn delete(state: &AppState, id: Uuid) -> AppResult<Patient> {
    let deleted = state
        .store
        .soft_delete_patient(id)
        .await?
        .ok_or_else(|| not_found(id))?;
    info!(patient_id = %deleted.id, "patient deleted");
    Ok(deleted)
}
