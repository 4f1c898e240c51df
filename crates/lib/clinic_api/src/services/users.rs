//! Staff account administration.

use clinic_core::auth::RegisterInput;
use clinic_core::auth::authenticator::{normalize_email, validate_email};
use clinic_core::models::auth::{User, UserChanges};
use clinic_core::store::StoreError;
use tracing::info;
use uuid::Uuid;

use super::optional;
use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::models::{RegisterRequest, UpdateUserRequest};

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("User with ID {id} not found"))
}

/// Create an account on someone else's behalf. No token is issued.
pub async fn create(state: &AppState, req: RegisterRequest) -> AppResult<User> {
    let user = state
        .auth
        .create_account(
            state.store.as_ref(),
            RegisterInput {
                name: req.name,
                email: req.email,
                password: req.password,
                role: req.role,
            },
        )
        .await?;
    Ok(user)
}

pub async fn list(state: &AppState) -> AppResult<Vec<User>> {
    Ok(state.store.list_users().await?)
}

pub async fn get(state: &AppState, id: Uuid) -> AppResult<User> {
    state.store.get_user(id).await?.ok_or_else(|| not_found(id))
}

/// Change name, email or password. The role is never changed here.
pub async fn update(state: &AppState, id: Uuid, req: UpdateUserRequest) -> AppResult<User> {
    let email = match req.email {
        Some(raw) => {
            let email = normalize_email(&raw);
            validate_email(&email)?;
            Some(email)
        }
        None => None,
    };
    let password_hash = match req.password {
        Some(password) => Some(state.auth.hash_password(&password)?),
        None => None,
    };
    let changes = UserChanges {
        email,
        name: optional("name", req.name)?,
        password_hash,
    };

    let updated = state
        .store
        .update_user(id, changes)
        .await
        .map_err(|e| match e {
            StoreError::Conflict(_) => AppError::Conflict("Email already exists".into()),
            other => AppError::from(other),
        })?
        .ok_or_else(|| not_found(id))?;
    info!(user_id = %updated.id, "user updated");
    Ok(updated)
}

pub async fn delete(state: &AppState, id: Uuid) -> AppResult<User> {
    let deleted = state
        .store
        .soft_delete_user(id)
        .await?
        .ok_or_else(|| not_found(id))?;
    info!(user_id = %deleted.id, "user deleted");
    Ok(deleted)
}
