//! Password hashing via bcrypt.

use std::sync::LazyLock;

use super::AuthError;

/// Minimum (and default) bcrypt cost factor.
pub const BCRYPT_COST: u32 = 10;

/// Hash compared against when a login names an unknown email, so that path
/// costs one bcrypt verification like a wrong password does.
static DUMMY_HASH: LazyLock<String> =
    LazyLock::new(|| bcrypt::hash("clinic-records-dummy", BCRYPT_COST).unwrap_or_default());

/// Hash a password with bcrypt (cost 10).
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    hash_password_with_cost(password, BCRYPT_COST)
}

/// Hash a password with an explicit cost. Costs below [`BCRYPT_COST`] are rejected.
pub fn hash_password_with_cost(password: &str, cost: u32) -> Result<String, AuthError> {
    if cost < BCRYPT_COST {
        return Err(AuthError::Internal(format!(
            "bcrypt cost {cost} is below the minimum of {BCRYPT_COST}"
        )));
    }
    bcrypt::hash(password, cost).map_err(|e| AuthError::Internal(format!("bcrypt hash: {e}")))
}

/// Verify a password against a bcrypt hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    bcrypt::verify(password, hash).map_err(|e| AuthError::Internal(format!("bcrypt verify: {e}")))
}

/// Burn one verification against the dummy hash. The result is discarded.
pub fn verify_against_dummy(password: &str) {
    let _ = bcrypt::verify(password, &DUMMY_HASH);
}
