//! JWT token issuance and verification.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use super::AuthError;
use crate::models::auth::TokenClaims;
use crate::rbac::Role;

/// Default token lifetime in seconds: one day.
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 24 * 60 * 60;

/// Issues and verifies HS256 identity tokens with a fixed lifetime.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    /// Build a token service. An empty secret or a non-positive lifetime is
    /// a configuration error.
    pub fn new(secret: &[u8], ttl: Duration) -> Result<Self, AuthError> {
        if secret.is_empty() {
            return Err(AuthError::TokenError("signing secret is empty".into()));
        }
        if ttl <= Duration::zero() {
            return Err(AuthError::TokenError(format!(
                "token lifetime must be positive, got {ttl}"
            )));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is exact: a token is rejected at `exp`, not some seconds later.
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
        })
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for the given identity, valid from now.
    pub fn issue(&self, subject: Uuid, email: &str, role: Role) -> Result<String, AuthError> {
        self.issue_at(subject, email, role, Utc::now())
    }

    /// Issue a token as if it had been issued at `issued_at`.
    pub fn issue_at(
        &self,
        subject: Uuid,
        email: &str,
        role: Role,
        issued_at: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let claims = TokenClaims {
            sub: subject,
            email: email.to_string(),
            role,
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::TokenError(format!("jwt encode: {e}")))
    }

    /// Verify a token and return its claims.
    ///
    /// Fails with [`AuthError::Unauthenticated`] for bad signatures, expired
    /// tokens and anything that does not parse.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, AuthError> {
        decode::<TokenClaims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                let reason = match e.kind() {
                    ErrorKind::ExpiredSignature => "token expired",
                    ErrorKind::InvalidSignature => "invalid token signature",
                    _ => "malformed token",
                };
                AuthError::Unauthenticated(reason.into())
            })
    }
}

/// Parse a token lifetime such as `3600`, `30s`, `15m`, `12h` or `1d`.
/// A bare number is seconds.
pub fn parse_token_ttl(raw: &str) -> Option<Duration> {
    let raw = raw.trim();
    let (digits, unit) = match raw.char_indices().last()? {
        (i, c) if c.is_ascii_alphabetic() => (&raw[..i], Some(c.to_ascii_lowercase())),
        _ => (raw, None),
    };
    let amount: i64 = digits.parse().ok()?;
    if amount <= 0 {
        return None;
    }
    match unit {
        None | Some('s') => Some(Duration::seconds(amount)),
        Some('m') => Some(Duration::minutes(amount)),
        Some('h') => Some(Duration::hours(amount)),
        Some('d') => Some(Duration::days(amount)),
        Some(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new(b"test-secret", Duration::seconds(DEFAULT_TOKEN_TTL_SECS)).unwrap()
    }

    #[test]
    fn issued_token_verifies_with_same_claims() {
        let svc = service();
        let id = Uuid::now_v7();
        let token = svc.issue(id, "doc@clinic.test", Role::Doctor).unwrap();

        let claims = svc.verify(&token).unwrap();
        assert_eq!(claims.sub, id);
        assert_eq!(claims.email, "doc@clinic.test");
        assert_eq!(claims.role, Role::Doctor);
        assert_eq!(claims.exp - claims.iat, DEFAULT_TOKEN_TTL_SECS);
    }

    #[test]
    fn expired_token_is_rejected() {
        let svc = service();
        let issued = Utc::now() - Duration::days(2);
        let token = svc
            .issue_at(Uuid::now_v7(), "a@b.c", Role::Staff, issued)
            .unwrap();

        let err = svc.verify(&token).unwrap_err();
        assert!(matches!(err, AuthError::Unauthenticated(ref r) if r == "token expired"));
    }

    #[test]
    fn token_from_other_secret_is_rejected() {
        let other = TokenService::new(b"other-secret", Duration::hours(1)).unwrap();
        let token = other.issue(Uuid::now_v7(), "a@b.c", Role::Admin).unwrap();
        assert!(matches!(
            service().verify(&token),
            Err(AuthError::Unauthenticated(_))
        ));
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let svc = service();
        let token = svc.issue(Uuid::now_v7(), "a@b.c", Role::Staff).unwrap();
        let forged = TokenService::new(b"attacker", Duration::hours(1))
            .unwrap()
            .issue(Uuid::now_v7(), "a@b.c", Role::Admin)
            .unwrap();
        let forged_payload = forged.split('.').nth(1).unwrap();
        let parts: Vec<&str> = token.split('.').collect();
        let spliced = format!("{}.{}.{}", parts[0], forged_payload, parts[2]);

        assert_ne!(spliced, token);
        assert!(svc.verify(&spliced).is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        let svc = service();
        for token in ["", "abc", "a.b.c", "Bearer xyz"] {
            assert!(
                matches!(svc.verify(token), Err(AuthError::Unauthenticated(_))),
                "{token:?} should not verify"
            );
        }
    }

    #[test]
    fn empty_secret_is_refused() {
        assert!(TokenService::new(b"", Duration::hours(1)).is_err());
        assert!(TokenService::new(b"x", Duration::zero()).is_err());
    }

    #[test]
    fn parses_ttl_formats() {
        assert_eq!(parse_token_ttl("1d"), Some(Duration::days(1)));
        assert_eq!(parse_token_ttl("12h"), Some(Duration::hours(12)));
        assert_eq!(parse_token_ttl("15m"), Some(Duration::minutes(15)));
        assert_eq!(parse_token_ttl("30s"), Some(Duration::seconds(30)));
        assert_eq!(parse_token_ttl("3600"), Some(Duration::seconds(3600)));
        assert_eq!(parse_token_ttl(" 2D "), Some(Duration::days(2)));
    }

    #[test]
    fn rejects_bad_ttl() {
        for raw in ["", "d", "0", "-5m", "1w", "1.5h", "abc"] {
            assert_eq!(parse_token_ttl(raw), None, "{raw:?}");
        }
    }
}
