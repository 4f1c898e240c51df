//! In-process record store.
//!
//! Applies the same uniqueness and soft-delete rules as the Postgres schema.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    CatalogStore, ClinicStore, CredentialStore, PatientStore, StoreError, StoreResult,
    TreatmentStore,
};
use crate::models::auth::{Identity, NewIdentity, User, UserChanges};
use crate::models::clinic::{
    CatalogChanges, CatalogEntry, CatalogFilter, CatalogKind, NewCatalogEntry, NewPatient,
    NewTreatment, Patient, PatientChanges, Treatment, TreatmentChanges,
};
use crate::uuid::uuidv7;

#[derive(Debug, Default)]
struct Tables {
    users: Vec<Identity>,
    medications: Vec<CatalogEntry>,
    treatment_options: Vec<CatalogEntry>,
    patients: Vec<Patient>,
    treatments: Vec<Treatment>,
}

impl Tables {
    fn catalog(&self, kind: CatalogKind) -> &Vec<CatalogEntry> {
        match kind {
            CatalogKind::Medication => &self.medications,
            CatalogKind::TreatmentOption => &self.treatment_options,
        }
    }

    fn catalog_mut(&mut self, kind: CatalogKind) -> &mut Vec<CatalogEntry> {
        match kind {
            CatalogKind::Medication => &mut self.medications,
            CatalogKind::TreatmentOption => &mut self.treatment_options,
        }
    }
}

/// Record store held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn slug_taken(kind: CatalogKind) -> StoreError {
    StoreError::Conflict(format!("{} slug already exists", kind.noun()))
}

fn patient_code_taken() -> StoreError {
    StoreError::Conflict("Patient ID already exists".into())
}

fn email_taken() -> StoreError {
    StoreError::Conflict("Email already exists".into())
}

fn by_date_desc(rows: &mut [Treatment]) {
    rows.sort_by(|a, b| b.date.cmp(&a.date).then(a.id.cmp(&b.id)));
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn find_identity_by_email(&self, email: &str) -> StoreResult<Option<Identity>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .find(|i| i.user.email == email && i.user.is_active())
            .cloned())
    }

    async fn find_identity_by_id(&self, id: Uuid) -> StoreResult<Option<Identity>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .find(|i| i.user.id == id && i.user.is_active())
            .cloned())
    }

    async fn email_exists(&self, email: &str) -> StoreResult<bool> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().any(|i| i.user.email == email))
    }

    async fn create_identity(&self, identity: NewIdentity) -> StoreResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|i| i.user.email == identity.email) {
            return Err(email_taken());
        }
        let now = Utc::now();
        let user = User {
            id: uuidv7(),
            email: identity.email,
            name: identity.name,
            role: identity.role,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        tables.users.push(Identity {
            user: user.clone(),
            password_hash: identity.password_hash,
        });
        Ok(user)
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .filter(|i| i.user.is_active())
            .map(|i| i.user.clone())
            .collect())
    }

    async fn update_user(&self, id: Uuid, changes: UserChanges) -> StoreResult<Option<User>> {
        let mut tables = self.tables.write().await;
        if let Some(email) = &changes.email
            && tables
                .users
                .iter()
                .any(|i| i.user.id != id && &i.user.email == email)
        {
            return Err(email_taken());
        }
        let Some(identity) = tables
            .users
            .iter_mut()
            .find(|i| i.user.id == id && i.user.is_active())
        else {
            return Ok(None);
        };
        if let Some(email) = changes.email {
            identity.user.email = email;
        }
        if let Some(name) = changes.name {
            identity.user.name = name;
        }
        if let Some(hash) = changes.password_hash {
            identity.password_hash = hash;
        }
        identity.user.updated_at = Utc::now();
        Ok(Some(identity.user.clone()))
    }

    async fn soft_delete_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .users
            .iter_mut()
            .find(|i| i.user.id == id && i.user.is_active())
            .map(|i| {
                let now = Utc::now();
                i.user.deleted_at = Some(now);
                i.user.updated_at = now;
                i.user.clone()
            }))
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn create_catalog_entry(
        &self,
        kind: CatalogKind,
        entry: NewCatalogEntry,
    ) -> StoreResult<CatalogEntry> {
        let mut tables = self.tables.write().await;
        let rows = tables.catalog_mut(kind);
        if rows.iter().any(|e| e.is_active() && e.slug == entry.slug) {
            return Err(slug_taken(kind));
        }
        let now = Utc::now();
        let created = CatalogEntry {
            id: uuidv7(),
            name: entry.name,
            slug: entry.slug,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        rows.push(created.clone());
        Ok(created)
    }

    async fn list_catalog_entries(
        &self,
        kind: CatalogKind,
        filter: &CatalogFilter,
    ) -> StoreResult<Vec<CatalogEntry>> {
        let tables = self.tables.read().await;
        let needle = filter.name_contains.as_deref().map(str::to_lowercase);
        let mut rows: Vec<CatalogEntry> = tables
            .catalog(kind)
            .iter()
            .filter(|e| filter.include_deleted || e.is_active())
            .filter(|e| {
                needle
                    .as_deref()
                    .is_none_or(|n| e.name.to_lowercase().contains(n))
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            a.deleted_at
                .is_some()
                .cmp(&b.deleted_at.is_some())
                .then_with(|| a.name.cmp(&b.name))
                .then(a.id.cmp(&b.id))
        });
        Ok(rows)
    }

    async fn get_catalog_entry(
        &self,
        kind: CatalogKind,
        id: Uuid,
    ) -> StoreResult<Option<CatalogEntry>> {
        let tables = self.tables.read().await;
        Ok(tables.catalog(kind).iter().find(|e| e.id == id).cloned())
    }

    async fn update_catalog_entry(
        &self,
        kind: CatalogKind,
        id: Uuid,
        changes: CatalogChanges,
    ) -> StoreResult<Option<CatalogEntry>> {
        let mut tables = self.tables.write().await;
        let rows = tables.catalog_mut(kind);
        if let Some(slug) = &changes.slug
            && rows
                .iter()
                .any(|e| e.id != id && e.is_active() && &e.slug == slug)
        {
            return Err(slug_taken(kind));
        }
        let Some(entry) = rows.iter_mut().find(|e| e.id == id && e.is_active()) else {
            return Ok(None);
        };
        if let Some(name) = changes.name {
            entry.name = name;
        }
        if let Some(slug) = changes.slug {
            entry.slug = slug;
        }
        entry.updated_at = Utc::now();
        Ok(Some(entry.clone()))
    }

    async fn soft_delete_catalog_entry(
        &self,
        kind: CatalogKind,
        id: Uuid,
    ) -> StoreResult<Option<CatalogEntry>> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .catalog_mut(kind)
            .iter_mut()
            .find(|e| e.id == id && e.is_active())
            .map(|e| {
                let now = Utc::now();
                e.deleted_at = Some(now);
                e.updated_at = now;
                e.clone()
            }))
    }

    async fn find_catalog_entries_by_slugs(
        &self,
        kind: CatalogKind,
        slugs: &[String],
    ) -> StoreResult<Vec<CatalogEntry>> {
        let tables = self.tables.read().await;
        Ok(tables
            .catalog(kind)
            .iter()
            .filter(|e| e.is_active() && slugs.contains(&e.slug))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl PatientStore for MemoryStore {
    async fn create_patient(&self, patient: NewPatient) -> StoreResult<Patient> {
        let mut tables = self.tables.write().await;
        if tables
            .patients
            .iter()
            .any(|p| p.deleted_at.is_none() && p.patient_code == patient.patient_code)
        {
            return Err(patient_code_taken());
        }
        let now = Utc::now();
        let created = Patient {
            id: uuidv7(),
            name: patient.name,
            patient_code: patient.patient_code,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        tables.patients.push(created.clone());
        Ok(created)
    }

    async fn list_patients(&self) -> StoreResult<Vec<Patient>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Patient> = tables
            .patients
            .iter()
            .filter(|p| p.deleted_at.is_none())
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(rows)
    }

    async fn get_patient(&self, id: Uuid) -> StoreResult<Option<Patient>> {
        let tables = self.tables.read().await;
        Ok(tables
            .patients
            .iter()
            .find(|p| p.id == id && p.deleted_at.is_none())
            .cloned())
    }

    async fn find_patients_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<Patient>> {
        let tables = self.tables.read().await;
        Ok(tables
            .patients
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn update_patient(
        &self,
        id: Uuid,
        changes: PatientChanges,
    ) -> StoreResult<Option<Patient>> {
        let mut tables = self.tables.write().await;
        if let Some(code) = &changes.patient_code
            && tables
                .patients
                .iter()
                .any(|p| p.id != id && p.deleted_at.is_none() && &p.patient_code == code)
        {
            return Err(patient_code_taken());
        }
        let Some(patient) = tables
            .patients
            .iter_mut()
            .find(|p| p.id == id && p.deleted_at.is_none())
        else {
            return Ok(None);
        };
        if let Some(name) = changes.name {
            patient.name = name;
        }
        if let Some(code) = changes.patient_code {
            patient.patient_code = code;
        }
        patient.updated_at = Utc::now();
        Ok(Some(patient.clone()))
    }

    async fn soft_delete_patient(&self, id: Uuid) -> StoreResult<Option<Patient>> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .patients
            .iter_mut()
            .find(|p| p.id == id && p.deleted_at.is_none())
            .map(|p| {
                let now = Utc::now();
                p.deleted_at = Some(now);
                p.updated_at = now;
                p.clone()
            }))
    }
}

#[async_trait]
impl TreatmentStore for MemoryStore {
    async fn create_treatment(&self, treatment: NewTreatment) -> StoreResult<Treatment> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let created = Treatment {
            id: uuidv7(),
            date: treatment.date,
            treatment_options: treatment.treatment_options,
            medications: treatment.medications,
            cost_of_treatment: treatment.cost_of_treatment,
            patient_id: treatment.patient_id,
            user_id: treatment.user_id,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        tables.treatments.push(created.clone());
        Ok(created)
    }

    async fn list_treatments(&self) -> StoreResult<Vec<Treatment>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Treatment> = tables
            .treatments
            .iter()
            .filter(|t| t.deleted_at.is_none())
            .cloned()
            .collect();
        by_date_desc(&mut rows);
        Ok(rows)
    }

    async fn list_treatments_for_patient(&self, patient_id: Uuid) -> StoreResult<Vec<Treatment>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Treatment> = tables
            .treatments
            .iter()
            .filter(|t| t.deleted_at.is_none() && t.patient_id == patient_id)
            .cloned()
            .collect();
        by_date_desc(&mut rows);
        Ok(rows)
    }

    async fn get_treatment(&self, id: Uuid) -> StoreResult<Option<Treatment>> {
        let tables = self.tables.read().await;
        Ok(tables
            .treatments
            .iter()
            .find(|t| t.id == id && t.deleted_at.is_none())
            .cloned())
    }

    async fn update_treatment(
        &self,
        id: Uuid,
        changes: TreatmentChanges,
    ) -> StoreResult<Option<Treatment>> {
        let mut tables = self.tables.write().await;
        let Some(treatment) = tables
            .treatments
            .iter_mut()
            .find(|t| t.id == id && t.deleted_at.is_none())
        else {
            return Ok(None);
        };
        if let Some(date) = changes.date {
            treatment.date = date;
        }
        if let Some(options) = changes.treatment_options {
            treatment.treatment_options = options;
        }
        if let Some(medications) = changes.medications {
            treatment.medications = medications;
        }
        if let Some(cost) = changes.cost_of_treatment {
            treatment.cost_of_treatment = cost;
        }
        if let Some(patient_id) = changes.patient_id {
            treatment.patient_id = patient_id;
        }
        treatment.updated_at = Utc::now();
        Ok(Some(treatment.clone()))
    }

    async fn soft_delete_treatment(&self, id: Uuid) -> StoreResult<Option<Treatment>> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .treatments
            .iter_mut()
            .find(|t| t.id == id && t.deleted_at.is_none())
            .map(|t| {
                let now = Utc::now();
                t.deleted_at = Some(now);
                t.updated_at = now;
                t.clone()
            }))
    }
}

#[async_trait]
impl ClinicStore for MemoryStore {
    async fn ping(&self) -> bool {
        true
    }
}
