//! User administration handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use clinic_core::models::auth::User;
use uuid::Uuid;

use crate::AppState;
use crate::error::AppResult;
use crate::extract::{AppJson, AppPath};
use crate::models::{RegisterRequest, UpdateUserRequest};
use crate::services::users;

/// `POST /users`: create an account without issuing a token.
pub async fn create_user_handler(
    State(state): State<AppState>,
    AppJson(body): AppJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<User>)> {
    let user = users::create(&state, body).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// `GET /users`
pub async fn list_users_handler(State(state): State<AppState>) -> AppResult<Json<Vec<User>>> {
    Ok(Json(users::list(&state).await?))
}

/// `GET /users/{id}`
pub async fn get_user_handler(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<User>> {
    Ok(Json(users::get(&state, id).await?))
}

/// `PATCH /users/{id}`: name, email or password; never role.
pub async fn update_user_handler(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(body): AppJson<UpdateUserRequest>,
) -> AppResult<Json<User>> {
    Ok(Json(users::update(&state, id, body).await?))
}

/// `DELETE /users/{id}`: soft delete.
pub async fn delete_user_handler(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<User>> {
    Ok(Json(users::delete(&state, id).await?))
}
