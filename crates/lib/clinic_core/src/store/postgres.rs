//! Postgres-backed record store.

use async_trait::async_trait;
use sqlx::PgPool;
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

const USER_COLUMNS: &str = "id, email, name, role, created_at, updated_at, deleted_at";
const IDENTITY_COLUMNS: &str =
    "id, email, name, role, created_at, updated_at, deleted_at, password_hash";
const CATALOG_COLUMNS: &str = "id, name, slug, created_at, updated_at, deleted_at";
const PATIENT_COLUMNS: &str = "id, name, patient_code, created_at, updated_at, deleted_at";
const TREATMENT_COLUMNS: &str = "id, date, treatment_options, medications, cost_of_treatment, \
     patient_id, user_id, created_at, updated_at, deleted_at";

/// Record store over a Postgres connection pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Map unique-constraint violations to [`StoreError::Conflict`].
fn conflict_or(err: sqlx::Error, what: &str) -> StoreError {
    if let sqlx::Error::Database(db) = &err
        && db.is_unique_violation()
    {
        return StoreError::Conflict(what.to_string());
    }
    StoreError::Database(err)
}

/// `ILIKE` pattern matching `needle` anywhere, with wildcards escaped.
fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

// =============================================================================
// Users
// =============================================================================

#[async_trait]
impl CredentialStore for PgStore {
    async fn find_identity_by_email(&self, email: &str) -> StoreResult<Option<Identity>> {
        let sql = format!(
            "SELECT {IDENTITY_COLUMNS} FROM users WHERE email = $1 AND deleted_at IS NULL"
        );
        Ok(sqlx::query_as::<_, Identity>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_identity_by_id(&self, id: Uuid) -> StoreResult<Option<Identity>> {
        let sql =
            format!("SELECT {IDENTITY_COLUMNS} FROM users WHERE id = $1 AND deleted_at IS NULL");
        Ok(sqlx::query_as::<_, Identity>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn email_exists(&self, email: &str) -> StoreResult<bool> {
        Ok(
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(email)
                .fetch_one(&self.pool)
                .await?,
        )
    }

    async fn create_identity(&self, identity: NewIdentity) -> StoreResult<User> {
        let sql = format!(
            r#"
            INSERT INTO users (id, email, name, password_hash, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "#
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(uuidv7())
            .bind(&identity.email)
            .bind(&identity.name)
            .bind(&identity.password_hash)
            .bind(identity.role)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| conflict_or(e, "Email already exists"))
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users WHERE deleted_at IS NULL ORDER BY created_at, id"
        );
        Ok(sqlx::query_as::<_, User>(&sql)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn update_user(&self, id: Uuid, changes: UserChanges) -> StoreResult<Option<User>> {
        let sql = format!(
            r#"
            UPDATE users
            SET email = COALESCE($2, email),
                name = COALESCE($3, name),
                password_hash = COALESCE($4, password_hash),
                updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {USER_COLUMNS}
            "#
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(changes.email)
            .bind(changes.name)
            .bind(changes.password_hash)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| conflict_or(e, "Email already exists"))
    }

    async fn soft_delete_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let sql = format!(
            r#"
            UPDATE users SET deleted_at = now(), updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {USER_COLUMNS}
            "#
        );
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }
}

// =============================================================================
// Catalog
// =============================================================================

fn slug_taken(kind: CatalogKind) -> String {
    format!("{} slug already exists", kind.noun())
}

#[async_trait]
impl CatalogStore for PgStore {
    async fn create_catalog_entry(
        &self,
        kind: CatalogKind,
        entry: NewCatalogEntry,
    ) -> StoreResult<CatalogEntry> {
        let sql = format!(
            "INSERT INTO {} (id, name, slug) VALUES ($1, $2, $3) RETURNING {CATALOG_COLUMNS}",
            kind.table()
        );
        sqlx::query_as::<_, CatalogEntry>(&sql)
            .bind(uuidv7())
            .bind(&entry.name)
            .bind(&entry.slug)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| conflict_or(e, &slug_taken(kind)))
    }

    async fn list_catalog_entries(
        &self,
        kind: CatalogKind,
        filter: &CatalogFilter,
    ) -> StoreResult<Vec<CatalogEntry>> {
        let sql = format!(
            r#"
            SELECT {CATALOG_COLUMNS} FROM {}
            WHERE ($1 OR deleted_at IS NULL)
              AND ($2::text IS NULL OR name ILIKE $2)
            ORDER BY (deleted_at IS NOT NULL), name, id
            "#,
            kind.table()
        );
        Ok(sqlx::query_as::<_, CatalogEntry>(&sql)
            .bind(filter.include_deleted)
            .bind(filter.name_contains.as_deref().map(contains_pattern))
            .fetch_all(&self.pool)
            .await?)
    }

    async fn get_catalog_entry(
        &self,
        kind: CatalogKind,
        id: Uuid,
    ) -> StoreResult<Option<CatalogEntry>> {
        let sql = format!(
            "SELECT {CATALOG_COLUMNS} FROM {} WHERE id = $1",
            kind.table()
        );
        Ok(sqlx::query_as::<_, CatalogEntry>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn update_catalog_entry(
        &self,
        kind: CatalogKind,
        id: Uuid,
        changes: CatalogChanges,
    ) -> StoreResult<Option<CatalogEntry>> {
        let sql = format!(
            r#"
            UPDATE {}
            SET name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {CATALOG_COLUMNS}
            "#,
            kind.table()
        );
        sqlx::query_as::<_, CatalogEntry>(&sql)
            .bind(id)
            .bind(changes.name)
            .bind(changes.slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| conflict_or(e, &slug_taken(kind)))
    }

    async fn soft_delete_catalog_entry(
        &self,
        kind: CatalogKind,
        id: Uuid,
    ) -> StoreResult<Option<CatalogEntry>> {
        let sql = format!(
            r#"
            UPDATE {} SET deleted_at = now(), updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {CATALOG_COLUMNS}
            "#,
            kind.table()
        );
        Ok(sqlx::query_as::<_, CatalogEntry>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_catalog_entries_by_slugs(
        &self,
        kind: CatalogKind,
        slugs: &[String],
    ) -> StoreResult<Vec<CatalogEntry>> {
        if slugs.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT {CATALOG_COLUMNS} FROM {} WHERE slug = ANY($1) AND deleted_at IS NULL",
            kind.table()
        );
        Ok(sqlx::query_as::<_, CatalogEntry>(&sql)
            .bind(slugs)
            .fetch_all(&self.pool)
            .await?)
    }
}

// =============================================================================
// Patients
// =============================================================================

const PATIENT_CODE_TAKEN: &str = "Patient ID already exists";

#[async_trait]
impl PatientStore for PgStore {
    async fn create_patient(&self, patient: NewPatient) -> StoreResult<Patient> {
        let sql = format!(
            "INSERT INTO patients (id, name, patient_code) VALUES ($1, $2, $3) \
             RETURNING {PATIENT_COLUMNS}"
        );
        sqlx::query_as::<_, Patient>(&sql)
            .bind(uuidv7())
            .bind(&patient.name)
            .bind(&patient.patient_code)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| conflict_or(e, PATIENT_CODE_TAKEN))
    }

    async fn list_patients(&self) -> StoreResult<Vec<Patient>> {
        let sql = format!(
            "SELECT {PATIENT_COLUMNS} FROM patients WHERE deleted_at IS NULL ORDER BY name, id"
        );
        Ok(sqlx::query_as::<_, Patient>(&sql)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn get_patient(&self, id: Uuid) -> StoreResult<Option<Patient>> {
        let sql = format!(
            "SELECT {PATIENT_COLUMNS} FROM patients WHERE id = $1 AND deleted_at IS NULL"
        );
        Ok(sqlx::query_as::<_, Patient>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_patients_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<Patient>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!("SELECT {PATIENT_COLUMNS} FROM patients WHERE id = ANY($1)");
        Ok(sqlx::query_as::<_, Patient>(&sql)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn update_patient(
        &self,
        id: Uuid,
        changes: PatientChanges,
    ) -> StoreResult<Option<Patient>> {
        let sql = format!(
            r#"
            UPDATE patients
            SET name = COALESCE($2, name),
                patient_code = COALESCE($3, patient_code),
                updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {PATIENT_COLUMNS}
            "#
        );
        sqlx::query_as::<_, Patient>(&sql)
            .bind(id)
            .bind(changes.name)
            .bind(changes.patient_code)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| conflict_or(e, PATIENT_CODE_TAKEN))
    }

    async fn soft_delete_patient(&self, id: Uuid) -> StoreResult<Option<Patient>> {
        let sql = format!(
            r#"
            UPDATE patients SET deleted_at = now(), updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {PATIENT_COLUMNS}
            "#
        );
        Ok(sqlx::query_as::<_, Patient>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }
}

// =============================================================================
// Treatments
// =============================================================================

#[async_trait]
impl TreatmentStore for PgStore {
    async fn create_treatment(&self, treatment: NewTreatment) -> StoreResult<Treatment> {
        let sql = format!(
            r#"
            INSERT INTO treatments
                (id, date, treatment_options, medications, cost_of_treatment, patient_id, user_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {TREATMENT_COLUMNS}
            "#
        );
        Ok(sqlx::query_as::<_, Treatment>(&sql)
            .bind(uuidv7())
            .bind(treatment.date)
            .bind(&treatment.treatment_options)
            .bind(&treatment.medications)
            .bind(treatment.cost_of_treatment)
            .bind(treatment.patient_id)
            .bind(treatment.user_id)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn list_treatments(&self) -> StoreResult<Vec<Treatment>> {
        let sql = format!(
            "SELECT {TREATMENT_COLUMNS} FROM treatments WHERE deleted_at IS NULL \
             ORDER BY date DESC, id"
        );
        Ok(sqlx::query_as::<_, Treatment>(&sql)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn list_treatments_for_patient(&self, patient_id: Uuid) -> StoreResult<Vec<Treatment>> {
        let sql = format!(
            "SELECT {TREATMENT_COLUMNS} FROM treatments \
             WHERE patient_id = $1 AND deleted_at IS NULL ORDER BY date DESC, id"
        );
        Ok(sqlx::query_as::<_, Treatment>(&sql)
            .bind(patient_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn get_treatment(&self, id: Uuid) -> StoreResult<Option<Treatment>> {
        let sql = format!(
            "SELECT {TREATMENT_COLUMNS} FROM treatments WHERE id = $1 AND deleted_at IS NULL"
        );
        Ok(sqlx::query_as::<_, Treatment>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn update_treatment(
        &self,
        id: Uuid,
        changes: TreatmentChanges,
    ) -> StoreResult<Option<Treatment>> {
        let sql = format!(
            r#"
            UPDATE treatments
            SET date = COALESCE($2, date),
                treatment_options = COALESCE($3, treatment_options),
                medications = COALESCE($4, medications),
                cost_of_treatment = COALESCE($5, cost_of_treatment),
                patient_id = COALESCE($6, patient_id),
                updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {TREATMENT_COLUMNS}
            "#
        );
        Ok(sqlx::query_as::<_, Treatment>(&sql)
            .bind(id)
            .bind(changes.date)
            .bind(changes.treatment_options)
            .bind(changes.medications)
            .bind(changes.cost_of_treatment)
            .bind(changes.patient_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn soft_delete_treatment(&self, id: Uuid) -> StoreResult<Option<Treatment>> {
        let sql = format!(
            r#"
            UPDATE treatments SET deleted_at = now(), updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {TREATMENT_COLUMNS}
            "#
        );
        Ok(sqlx::query_as::<_, Treatment>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }
}

#[async_trait]
impl ClinicStore for PgStore {
    async fn ping(&self) -> bool {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .is_ok()
    }
}
