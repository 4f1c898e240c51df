//! Role-based authorization.
//!
//! Pure policy: no I/O, no request state. The transport layer resolves the
//! caller's role from a verified token and asks [`authorize`] whether the
//! role's permission set covers everything an operation requires.

pub mod operations;
pub mod permissions;
pub mod registry;
pub mod roles;

use thiserror::Error;

pub use operations::Operation;
pub use permissions::Permission;
pub use registry::PermissionRegistry;
pub use roles::Role;

/// Authorization failure.
///
/// Carries no detail about which permission was missing so the permission
/// taxonomy is not revealed to unauthorized callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthzError {
    #[error("Forbidden")]
    Forbidden,
}

/// Allow iff every permission in `required` is held by `role`.
///
/// All-or-nothing: missing any one of several jointly required permissions
/// denies the whole request. An empty `required` always allows.
pub fn authorize(
    registry: &PermissionRegistry,
    role: Role,
    required: &[Permission],
) -> Result<(), AuthzError> {
    let held = registry.permissions_for(role);
    if required.iter().all(|p| held.contains(p)) {
        Ok(())
    } else {
        Err(AuthzError::Forbidden)
    }
}

/// [`authorize`] against the operation table.
pub fn authorize_operation(
    registry: &PermissionRegistry,
    role: Role,
    operation: Operation,
) -> Result<(), AuthzError> {
    authorize(registry, role, operation.required_permissions())
}
