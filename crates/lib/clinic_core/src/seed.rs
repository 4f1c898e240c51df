//! Standard catalog and bootstrap admin account.

use tracing::info;

use crate::auth::authenticator::{RegisterInput, create_account, normalize_email};
use crate::auth::AuthError;
use crate::models::clinic::{CatalogKind, NewCatalogEntry};
use crate::rbac::Role;
use crate::store::{CatalogStore, CredentialStore, StoreError};

/// `(name, slug)` pairs of the standard treatment options.
pub const TREATMENT_OPTIONS: &[(&str, &str)] = &[
    ("Blood Test", "blood-test"),
    ("X-Ray", "x-ray"),
    ("Ultrasound", "ultrasound"),
    ("CT Scan", "ct-scan"),
    ("MRI", "mri"),
    ("Physical Therapy", "physical-therapy"),
    ("Dental Checkup", "dental-checkup"),
    ("Eye Examination", "eye-examination"),
    ("Vaccination", "vaccination"),
    ("Surgery", "surgery"),
];

/// `(name, slug)` pairs of the standard medications.
pub const MEDICATIONS: &[(&str, &str)] = &[
    ("Paracetamol", "paracetamol"),
    ("Amoxicillin", "amoxicillin"),
    ("Ibuprofen", "ibuprofen"),
    ("Aspirin", "aspirin"),
    ("Omeprazole", "omeprazole"),
    ("Metformin", "metformin"),
    ("Lisinopril", "lisinopril"),
    ("Amlodipine", "amlodipine"),
    ("Atorvastatin", "atorvastatin"),
    ("Metronidazole", "metronidazole"),
];

/// What a seeding run inserted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub treatment_options: usize,
    pub medications: usize,
}

async fn seed_kind<S>(
    store: &S,
    kind: CatalogKind,
    entries: &[(&str, &str)],
) -> Result<usize, StoreError>
where
    S: CatalogStore + ?Sized,
{
    let mut inserted = 0;
    for (name, slug) in entries {
        let existing = store
            .find_catalog_entries_by_slugs(kind, &[slug.to_string()])
            .await?;
        if !existing.is_empty() {
            continue;
        }
        store
            .create_catalog_entry(
                kind,
                NewCatalogEntry {
                    name: name.to_string(),
                    slug: slug.to_string(),
                },
            )
            .await?;
        inserted += 1;
    }
    Ok(inserted)
}

/// Insert the standard catalog. Slugs that already have an active entry are
/// left untouched, so running this twice inserts nothing the second time.
pub async fn seed_catalog<S>(store: &S) -> Result<SeedReport, StoreError>
where
    S: CatalogStore + ?Sized,
{
    let report = SeedReport {
        treatment_options: seed_kind(store, CatalogKind::TreatmentOption, TREATMENT_OPTIONS)
            .await?,
        medications: seed_kind(store, CatalogKind::Medication, MEDICATIONS).await?,
    };
    info!(
        treatment_options = report.treatment_options,
        medications = report.medications,
        "catalog seeded"
    );
    Ok(report)
}

/// Create an ADMIN account unless the email is already registered.
/// Returns whether an account was created.
pub async fn ensure_admin<S>(
    store: &S,
    email: &str,
    password: &str,
    bcrypt_cost: u32,
) -> Result<bool, AuthError>
where
    S: CredentialStore + ?Sized,
{
    if store.email_exists(&normalize_email(email)).await? {
        info!(email = %email, "admin account already present");
        return Ok(false);
    }
    create_account(
        store,
        RegisterInput {
            name: "Administrator".into(),
            email: email.to_string(),
            password: password.to_string(),
            role: Some(Role::Admin),
        },
        bcrypt_cost,
    )
    .await?;
    Ok(true)
}
