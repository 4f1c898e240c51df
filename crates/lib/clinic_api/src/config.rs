//! API server configuration.

use chrono::Duration;
use clinic_core::auth::jwt::{DEFAULT_TOKEN_TTL_SECS, parse_token_ttl};
use clinic_core::auth::password::BCRYPT_COST;
use thiserror::Error;

/// Configuration errors. Any of these stops the server before it binds.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("JWT_SECRET must be set to a non-empty value")]
    MissingJwtSecret,

    #[error("JWT_EXPIRES_IN is not a valid duration: {0:?}")]
    InvalidTokenTtl(String),

    #[error("BCRYPT_COST must be an integer of at least 10, got {0:?}")]
    InvalidBcryptCost(String),
}

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "127.0.0.1:3000").
    pub bind_addr: String,
    /// PostgreSQL connection URL.
    pub pg_connection_url: String,
    /// HS256 signing secret for identity tokens.
    pub jwt_secret: String,
    /// Identity token lifetime.
    pub token_ttl: Duration,
    /// bcrypt cost for new password hashes.
    pub bcrypt_cost: u32,
}

impl ApiConfig {
    /// Reads configuration from environment variables.
    ///
    /// | Variable         | Default                             |
    /// |------------------|-------------------------------------|
    /// | `BIND_ADDR`      | `127.0.0.1:3000`                    |
    /// | `DATABASE_URL`   | `postgres://localhost:5432/clinic`  |
    /// | `JWT_SECRET`     | required                            |
    /// | `JWT_EXPIRES_IN` | `1d`                                |
    /// | `BCRYPT_COST`    | `10`                                |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ApiConfig::from_env`] over an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = lookup("JWT_SECRET")
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::MissingJwtSecret)?;

        let token_ttl = match lookup("JWT_EXPIRES_IN") {
            Some(raw) => parse_token_ttl(&raw).ok_or(ConfigError::InvalidTokenTtl(raw))?,
            None => Duration::seconds(DEFAULT_TOKEN_TTL_SECS),
        };

        let bcrypt_cost = match lookup("BCRYPT_COST") {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(cost) if cost >= BCRYPT_COST => cost,
                _ => return Err(ConfigError::InvalidBcryptCost(raw)),
            },
            None => BCRYPT_COST,
        };

        Ok(Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| "127.0.0.1:3000".into()),
            pg_connection_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| "postgres://localhost:5432/clinic".into()),
            jwt_secret,
            token_ttl,
            bcrypt_cost,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<ApiConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_only_secret_is_set() {
        let cfg = config(&[("JWT_SECRET", "s3cret")]).unwrap();
        assert_eq!(cfg.bind_addr, "127.0.0.1:3000");
        assert_eq!(cfg.pg_connection_url, "postgres://localhost:5432/clinic");
        assert_eq!(cfg.token_ttl, Duration::days(1));
        assert_eq!(cfg.bcrypt_cost, 10);
    }

    #[test]
    fn missing_or_blank_secret_is_fatal() {
        assert_eq!(config(&[]).unwrap_err(), ConfigError::MissingJwtSecret);
        assert_eq!(
            config(&[("JWT_SECRET", "  ")]).unwrap_err(),
            ConfigError::MissingJwtSecret
        );
    }

    #[test]
    fn expiry_and_cost_are_parsed() {
        let cfg = config(&[
            ("JWT_SECRET", "s"),
            ("JWT_EXPIRES_IN", "15m"),
            ("BCRYPT_COST", "12"),
        ])
        .unwrap();
        assert_eq!(cfg.token_ttl, Duration::minutes(15));
        assert_eq!(cfg.bcrypt_cost, 12);
    }

    #[test]
    fn bad_expiry_and_weak_cost_are_rejected() {
        assert!(matches!(
            config(&[("JWT_SECRET", "s"), ("JWT_EXPIRES_IN", "soon")]),
            Err(ConfigError::InvalidTokenTtl(_))
        ));
        assert!(matches!(
            config(&[("JWT_SECRET", "s"), ("BCRYPT_COST", "4")]),
            Err(ConfigError::InvalidBcryptCost(_))
        ));
    }
}
