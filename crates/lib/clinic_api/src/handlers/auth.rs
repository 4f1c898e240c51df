//! Authentication request handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};

use crate::AppState;
use crate::error::AppResult;
use crate::extract::AppJson;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{AuthResponse, LoginRequest, RegisterRequest, WhoAmIResponse};
use crate::services::auth;

/// `POST /auth/register`: create an account and receive a token.
pub async fn register_handler(
    State(state): State<AppState>,
    AppJson(body): AppJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let resp = auth::register(&state, body).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

/// `POST /auth/login`: authenticate with email + password.
pub async fn login_handler(
    State(state): State<AppState>,
    AppJson(body): AppJson<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let resp = auth::login(&state, body).await?;
    Ok(Json(resp))
}

/// `GET /auth/me`: the caller's identity and permissions.
pub async fn whoami_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(claims)): Extension<AuthenticatedUser>,
) -> Json<WhoAmIResponse> {
    Json(auth::whoami(&state, &claims))
}
