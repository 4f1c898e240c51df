//! Treatment writes: input checks, reference validation, then persistence.
//!
//! References are checked and the record written as two separate steps with
//! no lock in between. A catalog entry deleted in that window can still end
//! up referenced; later catalog changes never invalidate stored treatments.

use thiserror::Error;
use uuid::Uuid;

use crate::models::clinic::{NewTreatment, Treatment, TreatmentChanges};
use crate::references::{ReferenceError, dedup_slugs, validate_treatment_references};
use crate::store::{CatalogStore, PatientStore, StoreError, TreatmentStore};

#[derive(Debug, Error)]
pub enum TreatmentError {
    #[error("Treatment with ID {0} not found")]
    NotFound(Uuid),

    #[error("Patient with ID {0} not found")]
    PatientNotFound(Uuid),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error(transparent)]
    Reference(#[from] ReferenceError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

fn check_cost(cost: f64) -> Result<(), TreatmentError> {
    if cost.is_finite() && cost >= 0.0 {
        Ok(())
    } else {
        Err(TreatmentError::ValidationError(
            "costOfTreatment must be a non-negative number".into(),
        ))
    }
}

async fn ensure_patient<S>(store: &S, patient_id: Uuid) -> Result<(), TreatmentError>
where
    S: PatientStore + ?Sized,
{
    match store.get_patient(patient_id).await? {
        Some(_) => Ok(()),
        None => Err(TreatmentError::PatientNotFound(patient_id)),
    }
}

/// Validate and persist a new treatment. Nothing is written on failure.
pub async fn create_treatment<S>(
    store: &S,
    mut input: NewTreatment,
) -> Result<Treatment, TreatmentError>
where
    S: CatalogStore + PatientStore + TreatmentStore + ?Sized,
{
    check_cost(input.cost_of_treatment)?;
    input.treatment_options = dedup_slugs(input.treatment_options);
    input.medications = dedup_slugs(input.medications);

    validate_treatment_references(
        store,
        Some(input.treatment_options.as_slice()),
        Some(input.medications.as_slice()),
    )
    .await?;
    ensure_patient(store, input.patient_id).await?;

    let treatment = store.create_treatment(input).await?;
    tracing::info!(
        treatment_id = %treatment.id,
        patient_id = %treatment.patient_id,
        "treatment created"
    );
    Ok(treatment)
}

/// Validate and apply a partial update. Only the slug lists present in
/// `changes` are checked.
pub async fn update_treatment<S>(
    store: &S,
    id: Uuid,
    mut changes: TreatmentChanges,
) -> Result<Treatment, TreatmentError>
where
    S: CatalogStore + PatientStore + TreatmentStore + ?Sized,
{
    if store.get_treatment(id).await?.is_none() {
        return Err(TreatmentError::NotFound(id));
    }
    if let Some(cost) = changes.cost_of_treatment {
        check_cost(cost)?;
    }
    changes.treatment_options = changes.treatment_options.map(dedup_slugs);
    changes.medications = changes.medications.map(dedup_slugs);

    validate_treatment_references(
        store,
        changes.treatment_options.as_deref(),
        changes.medications.as_deref(),
    )
    .await?;
    if let Some(patient_id) = changes.patient_id {
        ensure_patient(store, patient_id).await?;
    }

    let treatment = store
        .update_treatment(id, changes)
        .await?
        .ok_or(TreatmentError::NotFound(id))?;
    tracing::info!(treatment_id = %treatment.id, "treatment updated");
    Ok(treatment)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::models::clinic::{CatalogKind, NewCatalogEntry, NewPatient};
    use crate::store::MemoryStore;

    struct Fixture {
        store: MemoryStore,
        patient_id: Uuid,
    }

    async fn fixture() -> Fixture {
        let store = MemoryStore::new();
        for (kind, slug) in [
            (CatalogKind::TreatmentOption, "blood-test"),
            (CatalogKind::TreatmentOption, "x-ray"),
            (CatalogKind::Medication, "paracetamol"),
            (CatalogKind::Medication, "ibuprofen"),
        ] {
            store
                .create_catalog_entry(
                    kind,
                    NewCatalogEntry {
                        name: slug.into(),
                        slug: slug.into(),
                    },
                )
                .await
                .unwrap();
        }
        let patient = store
            .create_patient(NewPatient {
                name: "Ada Lovelace".into(),
                patient_code: "P-001".into(),
            })
            .await
            .unwrap();
        Fixture {
            store,
            patient_id: patient.id,
        }
    }

    fn new_treatment(patient_id: Uuid, options: &[&str], meds: &[&str]) -> NewTreatment {
        NewTreatment {
            date: Utc::now(),
            treatment_options: options.iter().map(|s| s.to_string()).collect(),
            medications: meds.iter().map(|s| s.to_string()).collect(),
            cost_of_treatment: 120.5,
            patient_id,
            user_id: Uuid::now_v7(),
        }
    }

    #[tokio::test]
    async fn creates_with_deduplicated_slugs() {
        let fx = fixture().await;
        let t = create_treatment(
            &fx.store,
            new_treatment(
                fx.patient_id,
                &["x-ray", "blood-test", "x-ray"],
                &["paracetamol", "paracetamol"],
            ),
        )
        .await
        .unwrap();
        assert_eq!(t.treatment_options, ["x-ray", "blood-test"]);
        assert_eq!(t.medications, ["paracetamol"]);
    }

    #[tokio::test]
    async fn unknown_slug_writes_nothing() {
        let fx = fixture().await;
        let err = create_treatment(
            &fx.store,
            new_treatment(fx.patient_id, &["blood-test", "ct-scan"], &["paracetamol"]),
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            TreatmentError::Reference(ReferenceError::NotFound(CatalogKind::TreatmentOption))
        ));
        assert!(fx.store.list_treatments().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_patient_is_rejected() {
        let fx = fixture().await;
        let missing = Uuid::now_v7();
        let err = create_treatment(&fx.store, new_treatment(missing, &["x-ray"], &[]))
            .await
            .unwrap_err();
        assert!(matches!(err, TreatmentError::PatientNotFound(id) if id == missing));
    }

    #[tokio::test]
    async fn negative_or_nan_cost_is_rejected() {
        let fx = fixture().await;
        for cost in [-1.0, f64::NAN, f64::INFINITY] {
            let mut input = new_treatment(fx.patient_id, &[], &[]);
            input.cost_of_treatment = cost;
            assert!(matches!(
                create_treatment(&fx.store, input).await,
                Err(TreatmentError::ValidationError(_))
            ));
        }
    }

    #[tokio::test]
    async fn stored_treatment_survives_catalog_delete() {
        let fx = fixture().await;
        let t = create_treatment(
            &fx.store,
            new_treatment(fx.patient_id, &["blood-test"], &["ibuprofen"]),
        )
        .await
        .unwrap();

        let ibuprofen = fx
            .store
            .find_catalog_entries_by_slugs(CatalogKind::Medication, &["ibuprofen".into()])
            .await
            .unwrap()
            .remove(0);
        fx.store
            .soft_delete_catalog_entry(CatalogKind::Medication, ibuprofen.id)
            .await
            .unwrap();

        let stored = fx.store.get_treatment(t.id).await.unwrap().unwrap();
        assert_eq!(stored.medications, ["ibuprofen"]);

        let err = create_treatment(
            &fx.store,
            new_treatment(fx.patient_id, &["blood-test"], &["ibuprofen"]),
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "One or more medications not found");
    }

    #[tokio::test]
    async fn update_checks_only_supplied_lists() {
        let fx = fixture().await;
        let t = create_treatment(
            &fx.store,
            new_treatment(fx.patient_id, &["x-ray"], &["ibuprofen"]),
        )
        .await
        .unwrap();

        // Delete ibuprofen: an update that leaves medications alone still succeeds.
        let ibuprofen = fx
            .store
            .find_catalog_entries_by_slugs(CatalogKind::Medication, &["ibuprofen".into()])
            .await
            .unwrap()
            .remove(0);
        fx.store
            .soft_delete_catalog_entry(CatalogKind::Medication, ibuprofen.id)
            .await
            .unwrap();

        let updated = update_treatment(
            &fx.store,
            t.id,
            TreatmentChanges {
                treatment_options: Some(vec!["blood-test".into()]),
                cost_of_treatment: Some(80.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.treatment_options, ["blood-test"]);
        assert_eq!(updated.medications, ["ibuprofen"]);
        assert_eq!(updated.cost_of_treatment, 80.0);

        let err = update_treatment(
            &fx.store,
            t.id,
            TreatmentChanges {
                medications: Some(vec!["ibuprofen".into()]),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            TreatmentError::Reference(ReferenceError::NotFound(CatalogKind::Medication))
        ));
    }

    #[tokio::test]
    async fn update_of_missing_treatment_is_not_found() {
        let fx = fixture().await;
        let id = Uuid::now_v7();
        assert!(matches!(
            update_treatment(&fx.store, id, TreatmentChanges::default()).await,
            Err(TreatmentError::NotFound(got)) if got == id
        ));
    }
}
