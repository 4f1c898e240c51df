//! Registration and login.

use std::sync::Arc;

use tracing::{info, warn};

use super::password::{self, BCRYPT_COST};
use super::{AuthError, TokenService};
use crate::models::auth::{NewIdentity, User};
use crate::rbac::Role;
use crate::store::{CredentialStore, StoreError};

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Registration request. `role` defaults to STAFF.
#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Option<Role>,
}

/// An account together with a freshly issued token.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: User,
    pub token: String,
}

/// Canonical form of an email for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Reject a password that is too short.
pub fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::ValidationError(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

/// Reject a missing `@` or an empty local/domain part.
pub fn validate_email(email: &str) -> Result<(), AuthError> {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(AuthError::ValidationError("email is not valid".into())),
    }
}

fn validate_registration(input: &RegisterInput) -> Result<(), AuthError> {
    if input.name.trim().is_empty() {
        return Err(AuthError::ValidationError("name must not be empty".into()));
    }
    validate_email(&normalize_email(&input.email))?;
    validate_password(&input.password)
}

/// Create an account without issuing a token.
///
/// Fails with [`AuthError::AlreadyExists`] when any account, active or
/// soft-deleted, already holds the email.
pub async fn create_account<S>(
    store: &S,
    input: RegisterInput,
    bcrypt_cost: u32,
) -> Result<User, AuthError>
where
    S: CredentialStore + ?Sized,
{
    validate_registration(&input)?;
    let email = normalize_email(&input.email);

    if store.email_exists(&email).await? {
        return Err(AuthError::AlreadyExists);
    }

    let password_hash = password::hash_password_with_cost(&input.password, bcrypt_cost)?;
    let role = input.role.unwrap_or_default();
    let user = store
        .create_identity(NewIdentity {
            email,
            name: input.name.trim().to_string(),
            password_hash,
            role,
        })
        .await
        .map_err(|e| match e {
            // Lost a race with a concurrent registration of the same email.
            StoreError::Conflict(_) => AuthError::AlreadyExists,
            other => AuthError::Store(other),
        })?;

    info!(user_id = %user.id, email = %user.email, role = %user.role, "account created");
    Ok(user)
}

/// Register/login flows over a shared [`TokenService`].
#[derive(Debug, Clone)]
pub struct Authenticator {
    tokens: Arc<TokenService>,
    bcrypt_cost: u32,
}

impl Authenticator {
    pub fn new(tokens: Arc<TokenService>) -> Self {
        Self {
            tokens,
            bcrypt_cost: BCRYPT_COST,
        }
    }

    /// Use a higher bcrypt cost than the default.
    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    pub fn bcrypt_cost(&self) -> u32 {
        self.bcrypt_cost
    }

    /// Hash a new password at this authenticator's cost.
    pub fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        validate_password(password)?;
        password::hash_password_with_cost(password, self.bcrypt_cost)
    }

    /// Create an account without a token (administrative user creation).
    pub async fn create_account<S>(
        &self,
        store: &S,
        input: RegisterInput,
    ) -> Result<User, AuthError>
    where
        S: CredentialStore + ?Sized,
    {
        create_account(store, input, self.bcrypt_cost).await
    }

    /// Create an account and issue a token for it.
    pub async fn register<S>(
        &self,
        store: &S,
        input: RegisterInput,
    ) -> Result<AuthSession, AuthError>
    where
        S: CredentialStore + ?Sized,
    {
        let user = self.create_account(store, input).await?;
        let token = self.tokens.issue(user.id, &user.email, user.role)?;
        Ok(AuthSession { user, token })
    }

    /// Check credentials and issue a token.
    ///
    /// Unknown, soft-deleted and wrong-password cases all fail with the same
    /// [`AuthError::InvalidCredentials`], each after one bcrypt verification.
    pub async fn login<S>(
        &self,
        store: &S,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, AuthError>
    where
        S: CredentialStore + ?Sized,
    {
        let email = normalize_email(email);
        let Some(identity) = store.find_identity_by_email(&email).await? else {
            password::verify_against_dummy(password);
            warn!(email = %email, "login failed");
            return Err(AuthError::InvalidCredentials);
        };

        if !password::verify_password(password, &identity.password_hash)? {
            warn!(email = %email, "login failed");
            return Err(AuthError::InvalidCredentials);
        }

        let user = identity.user;
        let token = self.tokens.issue(user.id, &user.email, user.role)?;
        info!(user_id = %user.id, "login succeeded");
        Ok(AuthSession { user, token })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::store::MemoryStore;

    fn authenticator() -> Authenticator {
        Authenticator::new(Arc::new(
            TokenService::new(b"test-secret", Duration::hours(1)).unwrap(),
        ))
    }

    fn input(email: &str, role: Option<Role>) -> RegisterInput {
        RegisterInput {
            name: "Dr. Grey".into(),
            email: email.into(),
            password: "correct horse".into(),
            role,
        }
    }

    #[tokio::test]
    async fn register_returns_verifiable_token() {
        let store = MemoryStore::new();
        let auth = authenticator();
        let session = auth
            .register(&store, input("grey@clinic.test", Some(Role::Doctor)))
            .await
            .unwrap();

        let claims = auth.tokens().verify(&session.token).unwrap();
        assert_eq!(claims.sub, session.user.id);
        assert_eq!(claims.role, Role::Doctor);
        assert_eq!(claims.email, "grey@clinic.test");
    }

    #[tokio::test]
    async fn role_defaults_to_staff() {
        let store = MemoryStore::new();
        let session = authenticator()
            .register(&store, input("s@clinic.test", None))
            .await
            .unwrap();
        assert_eq!(session.user.role, Role::Staff);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected_case_insensitively() {
        let store = MemoryStore::new();
        let auth = authenticator();
        auth.register(&store, input("grey@clinic.test", None))
            .await
            .unwrap();
        let err = auth
            .register(&store, input("  GREY@Clinic.test ", None))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::AlreadyExists));
        assert_eq!(store.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn login_failures_look_the_same() {
        let store = MemoryStore::new();
        let auth = authenticator();
        auth.register(&store, input("grey@clinic.test", None))
            .await
            .unwrap();

        let unknown = auth
            .login(&store, "nobody@clinic.test", "correct horse")
            .await
            .unwrap_err();
        let wrong = auth
            .login(&store, "grey@clinic.test", "wrong password")
            .await
            .unwrap_err();
        assert!(matches!(unknown, AuthError::InvalidCredentials));
        assert!(matches!(wrong, AuthError::InvalidCredentials));
        assert_eq!(unknown.to_string(), wrong.to_string());
    }

    #[tokio::test]
    async fn login_normalises_email() {
        let store = MemoryStore::new();
        let auth = authenticator();
        auth.register(&store, input("grey@clinic.test", None))
            .await
            .unwrap();
        let session = auth
            .login(&store, "Grey@Clinic.TEST", "correct horse")
            .await
            .unwrap();
        assert_eq!(session.user.email, "grey@clinic.test");
    }

    #[tokio::test]
    async fn deleted_user_cannot_log_in() {
        let store = MemoryStore::new();
        let auth = authenticator();
        let session = auth
            .register(&store, input("grey@clinic.test", None))
            .await
            .unwrap();
        store.soft_delete_user(session.user.id).await.unwrap();

        assert!(matches!(
            auth.login(&store, "grey@clinic.test", "correct horse").await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn registration_input_is_validated() {
        let store = MemoryStore::new();
        let auth = authenticator();

        let mut short = input("a@clinic.test", None);
        short.password = "12345".into();
        let mut nameless = input("b@clinic.test", None);
        nameless.name = "   ".into();
        let bad_email = input("not-an-email", None);

        for case in [short, nameless, bad_email] {
            assert!(matches!(
                auth.register(&store, case).await,
                Err(AuthError::ValidationError(_))
            ));
        }
        assert!(store.list_users().await.unwrap().is_empty());
    }
}
