//! Authentication service: register/login flows delegating to `clinic_core::auth`.

use clinic_core::auth::RegisterInput;
use clinic_core::models::auth::TokenClaims;

use crate::AppState;
use crate::error::AppResult;
use crate::models::{AuthResponse, LoginRequest, RegisterRequest, WhoAmIResponse};

/// Create an account and return it with a token.
pub async fn register(state: &AppState, req: RegisterRequest) -> AppResult<AuthResponse> {
    let session = state
        .auth
        .register(
            state.store.as_ref(),
            RegisterInput {
                name: req.name,
                email: req.email,
                password: req.password,
                role: req.role,
            },
        )
        .await?;
    Ok(AuthResponse::new(session.user, session.token))
}

/// Check credentials and return a fresh token.
pub async fn login(state: &AppState, req: LoginRequest) -> AppResult<AuthResponse> {
    let session = state
        .auth
        .login(state.store.as_ref(), &req.email, &req.password)
        .await?;
    Ok(AuthResponse::new(session.user, session.token))
}

/// Describe the caller from its token claims alone.
pub fn whoami(state: &AppState, claims: &TokenClaims) -> WhoAmIResponse {
    let held = state.permissions.permissions_for(claims.role);
    let mut permissions: Vec<_> = held.iter().copied().collect();
    permissions.sort_by_key(|p| p.as_str());
    WhoAmIResponse {
        id: claims.sub,
        email: claims.email.clone(),
        role: claims.role,
        permissions,
    }
}
