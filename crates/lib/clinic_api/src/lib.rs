//! # clinic_api
//!
//! HTTP API library for the clinic records backend.

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, patch, post};
use clinic_core::auth::{AuthError, Authenticator, TokenService};
use clinic_core::rbac::{Operation, PermissionRegistry};
use clinic_core::store::ClinicStore;
use sqlx::PgPool;
use tower_http::cors::{Any, CorsLayer};

use crate::config::ApiConfig;
use crate::handlers::{auth, health, medications, patients, treatment_options, treatments, users};
use crate::middleware::permissions::guarded;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Record store.
    pub store: Arc<dyn ClinicStore>,
    /// Register/login flows and the token service.
    pub auth: Arc<Authenticator>,
    /// Role → permission table, built once.
    pub permissions: Arc<PermissionRegistry>,
    /// API configuration.
    pub config: ApiConfig,
}

impl AppState {
    /// Build the shared state. Fails if the token settings are unusable.
    pub fn new(store: Arc<dyn ClinicStore>, config: ApiConfig) -> Result<Self, AuthError> {
        let tokens = TokenService::new(config.jwt_secret.as_bytes(), config.token_ttl)?;
        let auth = Authenticator::new(Arc::new(tokens)).with_bcrypt_cost(config.bcrypt_cost);
        Ok(Self {
            store,
            auth: Arc::new(auth),
            permissions: Arc::new(PermissionRegistry::new()),
            config,
        })
    }
}

/// Run embedded database migrations.
///
/// Delegates to `clinic_core::migrate::migrate()` which owns the migration files.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    clinic_core::migrate::migrate(pool).await
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Public routes (no auth required)
    let public = Router::new()
        .route(routes::GET_HEALTH, get(health::health_handler))
        .route(routes::POST_AUTH_REGISTER, post(auth::register_handler))
        .route(routes::POST_AUTH_LOGIN, post(auth::login_handler));

    // Protected routes: bearer token first, then the per-route permission gate.
    let s = &state;
    let protected = Router::new()
        .route(
            routes::GET_AUTH_ME,
            guarded(s, Operation::WhoAmI, get(auth::whoami_handler)),
        )
        // Treatments
        .route(
            routes::TREATMENTS,
            guarded(
                s,
                Operation::ListTreatments,
                get(treatments::list_treatments_handler),
            )
            .merge(guarded(
                s,
                Operation::CreateTreatment,
                post(treatments::create_treatment_handler),
            )),
        )
        .route(
            routes::TREATMENTS_ID,
            guarded(
                s,
                Operation::GetTreatment,
                get(treatments::get_treatment_handler),
            )
            .merge(guarded(
                s,
                Operation::UpdateTreatment,
                patch(treatments::update_treatment_handler),
            ))
            .merge(guarded(
                s,
                Operation::DeleteTreatment,
                delete(treatments::delete_treatment_handler),
            )),
        )
        .route(
            routes::TREATMENTS_PATIENT_ID,
            guarded(
                s,
                Operation::ListPatientTreatments,
                get(treatments::list_patient_treatments_handler),
            ),
        )
        // Treatment options
        .route(
            routes::TREATMENT_OPTIONS,
            guarded(
                s,
                Operation::ListTreatmentOptions,
                get(treatment_options::list_treatment_options_handler),
            )
            .merge(guarded(
                s,
                Operation::CreateTreatmentOption,
                post(treatment_options::create_treatment_option_handler),
            )),
        )
        .route(
            routes::TREATMENT_OPTIONS_ID,
            guarded(
                s,
                Operation::UpdateTreatmentOption,
                patch(treatment_options::update_treatment_option_handler),
            )
            .merge(guarded(
                s,
                Operation::DeleteTreatmentOption,
                delete(treatment_options::delete_treatment_option_handler),
            )),
        )
        // Medications, also reachable under /treatments
        .route(
            routes::TREATMENT_MEDICATIONS,
            guarded(
                s,
                Operation::ListMedications,
                get(medications::list_medications_handler),
            )
            .merge(guarded(
                s,
                Operation::CreateMedication,
                post(medications::create_medication_handler),
            )),
        )
        .route(
            routes::TREATMENT_MEDICATIONS_ID,
            guarded(
                s,
                Operation::UpdateMedication,
                patch(medications::update_medication_handler),
            )
            .merge(guarded(
                s,
                Operation::DeleteMedication,
                delete(medications::delete_medication_handler),
            )),
        )
        .route(
            routes::MEDICATIONS,
            guarded(
                s,
                Operation::ListMedications,
                get(medications::list_medications_handler),
            )
            .merge(guarded(
                s,
                Operation::CreateMedication,
                post(medications::create_medication_handler),
            )),
        )
        .route(
            routes::MEDICATIONS_SEARCH,
            guarded(
                s,
                Operation::SearchMedications,
                get(medications::search_medications_handler),
            ),
        )
        .route(
            routes::MEDICATIONS_ACTIVE,
            guarded(
                s,
                Operation::ListActiveMedications,
                get(medications::list_medications_handler),
            ),
        )
        .route(
            routes::MEDICATIONS_ALL,
            guarded(
                s,
                Operation::ListAllMedications,
                get(medications::list_all_medications_handler),
            ),
        )
        .route(
            routes::MEDICATIONS_ID,
            guarded(
                s,
                Operation::GetMedication,
                get(medications::get_medication_handler),
            )
            .merge(guarded(
                s,
                Operation::UpdateMedication,
                patch(medications::update_medication_handler),
            ))
            .merge(guarded(
                s,
                Operation::DeleteMedication,
                delete(medications::delete_medication_handler),
            )),
        )
        // Patients
        .route(
            routes::PATIENTS,
            guarded(
                s,
                Operation::ListPatients,
                get(patients::list_patients_handler),
            )
            .merge(guarded(
                s,
                Operation::CreatePatient,
                post(patients::create_patient_handler),
            )),
        )
        .route(
            routes::PATIENTS_ID,
            guarded(s, Operation::GetPatient, get(patients::get_patient_handler))
                .merge(guarded(
                    s,
                    Operation::UpdatePatient,
                    patch(patients::update_patient_handler),
                ))
                .merge(guarded(
                    s,
                    Operation::DeletePatient,
                    delete(patients::delete_patient_handler),
                )),
        )
        // Users
        .route(
            routes::USERS,
            guarded(s, Operation::ListUsers, get(users::list_users_handler))
                .merge(guarded(
                    s,
                    Operation::CreateUser,
                    post(users::create_user_handler),
                )),
        )
        .route(
            routes::USERS_ID,
            guarded(s, Operation::GetUser, get(users::get_user_handler))
                .merge(guarded(
                    s,
                    Operation::UpdateUser,
                    patch(users::update_user_handler),
                ))
                .merge(guarded(
                    s,
                    Operation::DeleteUser,
                    delete(users::delete_user_handler),
                )),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(cors)
        .with_state(state)
}
