//! # Token Configuration
//!
//! Signing secret and token lifetimes.
//! The secret is read once at startup and never rotated while the process runs.

use crate::error::TokenError;
use chrono::Duration;
use rand::distr::Alphanumeric;
use rand::Rng;
use std::fmt;
use tracing::warn;

/// Access token lifetime: 15 minutes.
pub const DEFAULT_ACCESS_TTL_SECS: i64 = 15 * 60;

/// Refresh token lifetime: 24 hours.
pub const DEFAULT_REFRESH_TTL_SECS: i64 = 24 * 60 * 60;

const GENERATED_SECRET_LEN: usize = 64;

/// Token service configuration
#[derive(Clone)]
pub struct TokenConfig {
    /// HMAC signing secret
    pub secret: String,

    /// Access token time-to-live
    pub access_ttl: Duration,

    /// Refresh token time-to-live
    pub refresh_ttl: Duration,
}

impl TokenConfig {
    /// Create config with an explicit secret and the default lifetimes
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            access_ttl: Duration::seconds(DEFAULT_ACCESS_TTL_SECS),
            refresh_ttl: Duration::seconds(DEFAULT_REFRESH_TTL_SECS),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// - `JWT_SECRET` (generated per process when unset)
    /// - `ACCESS_TOKEN_TTL_SECS` (default 900)
    /// - `REFRESH_TOKEN_TTL_SECS` (default 86400)
    pub fn from_env() -> Result<Self, TokenError> {
        dotenvy::dotenv().ok(); // Load .env file if present
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, TokenError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = match lookup("JWT_SECRET").filter(|s| !s.is_empty()) {
            Some(secret) => secret,
            None => {
                warn!("JWT_SECRET not set, generating a per-process secret; tokens will not survive a restart");
                generate_secret()
            }
        };

        let access_ttl = ttl_from(&lookup, "ACCESS_TOKEN_TTL_SECS", DEFAULT_ACCESS_TTL_SECS)?;
        let refresh_ttl = ttl_from(&lookup, "REFRESH_TOKEN_TTL_SECS", DEFAULT_REFRESH_TTL_SECS)?;

        Ok(Self {
            secret,
            access_ttl,
            refresh_ttl,
        })
    }

    /// Builder: set access token lifetime
    pub fn with_access_ttl(mut self, ttl: Duration) -> Self {
        self.access_ttl = ttl;
        self
    }

    /// Builder: set refresh token lifetime
    pub fn with_refresh_ttl(mut self, ttl: Duration) -> Self {
        self.refresh_ttl = ttl;
        self
    }
}

impl fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &"<redacted>")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish()
    }
}

fn ttl_from<F>(lookup: &F, key: &str, default_secs: i64) -> Result<Duration, TokenError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(Duration::seconds(default_secs));
    };
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|secs| *secs > 0)
        .and_then(Duration::try_seconds)
        .ok_or_else(|| {
            TokenError::Configuration(format!(
                "{key} must be a positive number of seconds in range, got {raw:?}"
            ))
        })
}

fn generate_secret() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(GENERATED_SECRET_LEN)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = TokenConfig::from_lookup(lookup_from(&[("JWT_SECRET", "s3cret")])).unwrap();
        assert_eq!(config.secret, "s3cret");
        assert_eq!(config.access_ttl, Duration::minutes(15));
        assert_eq!(config.refresh_ttl, Duration::hours(24));
    }

    #[test]
    fn test_generated_secret_when_missing() {
        let a = TokenConfig::from_lookup(lookup_from(&[])).unwrap();
        let b = TokenConfig::from_lookup(lookup_from(&[("JWT_SECRET", "")])).unwrap();
        assert_eq!(a.secret.len(), GENERATED_SECRET_LEN);
        assert_ne!(a.secret, b.secret);
    }

    #[test]
    fn test_custom_ttls() {
        let config = TokenConfig::from_lookup(lookup_from(&[
            ("JWT_SECRET", "s3cret"),
            ("ACCESS_TOKEN_TTL_SECS", "60"),
            ("REFRESH_TOKEN_TTL_SECS", " 3600 "),
        ]))
        .unwrap();
        assert_eq!(config.access_ttl, Duration::seconds(60));
        assert_eq!(config.refresh_ttl, Duration::hours(1));
    }

    #[test]
    fn test_invalid_ttl() {
        let result = TokenConfig::from_lookup(lookup_from(&[
            ("JWT_SECRET", "s3cret"),
            ("ACCESS_TOKEN_TTL_SECS", "-5"),
        ]));
        assert!(matches!(result, Err(TokenError::Configuration(_))));
    }

    #[test]
    fn test_out_of_range_ttl() {
        let result = TokenConfig::from_lookup(lookup_from(&[
            ("JWT_SECRET", "s3cret"),
            ("REFRESH_TOKEN_TTL_SECS", &i64::MAX.to_string()),
        ]));
        assert!(matches!(result, Err(TokenError::Configuration(_))));
    }

    #[test]
    fn test_huge_ttl_fails_at_issue_not_panic() {
        let config = TokenConfig::from_lookup(lookup_from(&[
            ("JWT_SECRET", "s3cret"),
            ("ACCESS_TOKEN_TTL_SECS", "1000000000000000"),
        ]))
        .unwrap();
        let service = crate::TokenService::new(config);
        assert!(matches!(
            service.issue_access_token(1),
            Err(TokenError::Signing(_))
        ));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = TokenConfig::new("do-not-print");
        assert!(!format!("{config:?}").contains("do-not-print"));
    }
}
