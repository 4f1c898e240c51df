//! # clinic_core
//!
//! Core domain logic for the clinic records backend: identity tokens,
//! roles and permissions, slug reference checks and the record store.

pub mod auth;
pub mod migrate;
pub mod models;
pub mod rbac;
pub mod references;
pub mod seed;
pub mod store;
pub mod treatments;
pub mod uuid;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_not_empty() {
        assert!(!version().is_empty());
    }
}
