//! Per-route permission gate.
//!
//! Each protected route is wrapped with a gate naming its [`Operation`]. The
//! gate runs after [`require_auth`](super::auth::require_auth) and before the
//! handler, so a denied request never reaches it.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    routing::MethodRouter,
};
use clinic_core::rbac::{Operation, PermissionRegistry, authorize_operation};
use tracing::debug;

use super::auth::AuthenticatedUser;
use crate::AppState;
use crate::error::AppError;

/// State of one route's gate.
#[derive(Debug, Clone)]
pub struct PermissionGate {
    pub registry: Arc<PermissionRegistry>,
    pub operation: Operation,
}

/// Axum middleware: denies with 403 unless the caller's role holds every
/// permission the operation requires.
pub async fn require_permissions(
    State(gate): State<PermissionGate>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = request.extensions().get::<AuthenticatedUser>();
    let Some(AuthenticatedUser(claims)) = user else {
        return Err(AppError::Unauthorized("Missing authorization header".into()));
    };

    authorize_operation(&gate.registry, claims.role, gate.operation).inspect_err(|_| {
        debug!(
            user_id = %claims.sub,
            role = %claims.role,
            operation = %gate.operation,
            "permission denied"
        );
    })?;

    Ok(next.run(request).await)
}

/// Wrap `route` in the permission gate for `operation`.
pub fn guarded(
    state: &AppState,
    operation: Operation,
    route: MethodRouter<AppState>,
) -> MethodRouter<AppState> {
    let gate = PermissionGate {
        registry: state.permissions.clone(),
        operation,
    };
    route.route_layer(middleware::from_fn_with_state(gate, require_permissions))
}
