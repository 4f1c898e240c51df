//! Record store.
//!
//! The traits here are the only path to persisted records. [`PgStore`] backs
//! them with Postgres; [`MemoryStore`] keeps everything in process and is used
//! by tests and local runs without a database.
//!
//! Unless a method says otherwise, lookups see active rows only and mutations
//! act on active rows only. Soft-deleted rows stay in storage with
//! `deleted_at` set.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::auth::{Identity, NewIdentity, User, UserChanges};
use crate::models::clinic::{
    CatalogChanges, CatalogEntry, CatalogFilter, CatalogKind, NewCatalogEntry, NewPatient,
    NewTreatment, Patient, PatientChanges, Treatment, TreatmentChanges,
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness rule was violated (email, active slug, active patient code).
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Staff accounts with their password hashes.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Active identity by (already normalised) email.
    async fn find_identity_by_email(&self, email: &str) -> StoreResult<Option<Identity>>;

    /// Active identity by id.
    async fn find_identity_by_id(&self, id: Uuid) -> StoreResult<Option<Identity>>;

    /// Whether any account, active or deleted, holds this email.
    async fn email_exists(&self, email: &str) -> StoreResult<bool>;

    /// Persist a new account. A taken email is a [`StoreError::Conflict`].
    async fn create_identity(&self, identity: NewIdentity) -> StoreResult<User>;

    async fn list_users(&self) -> StoreResult<Vec<User>>;

    async fn get_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.find_identity_by_id(id).await?.map(|identity| identity.user))
    }

    async fn update_user(&self, id: Uuid, changes: UserChanges) -> StoreResult<Option<User>>;

    async fn soft_delete_user(&self, id: Uuid) -> StoreResult<Option<User>>;
}

/// Medications and treatment options, addressed by [`CatalogKind`].
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn create_catalog_entry(
        &self,
        kind: CatalogKind,
        entry: NewCatalogEntry,
    ) -> StoreResult<CatalogEntry>;

    /// Entries ordered by name. With `include_deleted`, active rows come first.
    async fn list_catalog_entries(
        &self,
        kind: CatalogKind,
        filter: &CatalogFilter,
    ) -> StoreResult<Vec<CatalogEntry>>;

    /// Entry by id, including soft-deleted rows.
    async fn get_catalog_entry(
        &self,
        kind: CatalogKind,
        id: Uuid,
    ) -> StoreResult<Option<CatalogEntry>>;

    async fn update_catalog_entry(
        &self,
        kind: CatalogKind,
        id: Uuid,
        changes: CatalogChanges,
    ) -> StoreResult<Option<CatalogEntry>>;

    async fn soft_delete_catalog_entry(
        &self,
        kind: CatalogKind,
        id: Uuid,
    ) -> StoreResult<Option<CatalogEntry>>;

    /// Active entries whose slug is in `slugs`. Unknown slugs are simply absent.
    async fn find_catalog_entries_by_slugs(
        &self,
        kind: CatalogKind,
        slugs: &[String],
    ) -> StoreResult<Vec<CatalogEntry>>;
}

#[async_trait]
pub trait PatientStore: Send + Sync {
    async fn create_patient(&self, patient: NewPatient) -> StoreResult<Patient>;

    /// Active patients ordered by name.
    async fn list_patients(&self) -> StoreResult<Vec<Patient>>;

    async fn get_patient(&self, id: Uuid) -> StoreResult<Option<Patient>>;

    /// Patients whose id is in `ids`, including soft-deleted rows.
    async fn find_patients_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<Patient>>;

    async fn update_patient(
        &self,
        id: Uuid,
        changes: PatientChanges,
    ) -> StoreResult<Option<Patient>>;

    async fn soft_delete_patient(&self, id: Uuid) -> StoreResult<Option<Patient>>;
}

#[async_trait]
pub trait TreatmentStore: Send + Sync {
    /// Persist a treatment. References must already have been validated.
    async fn create_treatment(&self, treatment: NewTreatment) -> StoreResult<Treatment>;

    /// Active treatments, most recent `date` first.
    async fn list_treatments(&self) -> StoreResult<Vec<Treatment>>;

    async fn list_treatments_for_patient(&self, patient_id: Uuid) -> StoreResult<Vec<Treatment>>;

    async fn get_treatment(&self, id: Uuid) -> StoreResult<Option<Treatment>>;

    async fn update_treatment(
        &self,
        id: Uuid,
        changes: TreatmentChanges,
    ) -> StoreResult<Option<Treatment>>;

    async fn soft_delete_treatment(&self, id: Uuid) -> StoreResult<Option<Treatment>>;
}

/// Everything the HTTP layer needs from storage.
#[async_trait]
pub trait ClinicStore: CredentialStore + CatalogStore + PatientStore + TreatmentStore {
    /// Whether the backing store is reachable.
    async fn ping(&self) -> bool;
}
