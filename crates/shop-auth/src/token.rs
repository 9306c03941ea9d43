//! # Token Service
//!
//! Issues and verifies signed, time-bounded bearer tokens.
//!
//! Tokens are compact JWTs signed with HS256 and carry
//! `{ "user_id", "iat", "exp" }`. Verification accepts only the HMAC family as
//! the declared algorithm, so a token claiming `none` or an asymmetric
//! algorithm is rejected before any signature check.
//!
//! ```text
//! issue(subject, kind)          verify_token(token)
//!   claims = {sub, now, now+ttl}   decode header  ── alg ∉ HS* ──▶ Invalid
//!   sign HS256                     check signature ── mismatch ──▶ Invalid
//!   ──▶ "xxx.yyy.zzz"              now >= exp      ── expired  ──▶ Invalid
//!                                  ──▶ subject
//! ```

use crate::clock::{SharedClock, SystemClock};
use crate::config::TokenConfig;
use crate::error::{TokenError, TokenResult};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Identifier of the authenticated principal
pub type Subject = i64;

/// Claims carried by every token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject the token speaks for
    pub user_id: Subject,

    /// Issued-at (Unix timestamp, seconds)
    pub iat: i64,

    /// Expiry (Unix timestamp, seconds)
    pub exp: i64,
}

impl Claims {
    /// True while `now` is strictly before the expiry
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() < self.exp
    }
}

/// Token kinds; they differ only in lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Access and refresh token handed out on login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Token issuer and verifier
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_ttl: Duration,
    refresh_ttl: Duration,
    clock: SharedClock,
}

impl TokenService {
    /// Create a service on the wall clock
    pub fn new(config: TokenConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a service on an explicit clock
    pub fn with_clock(config: TokenConfig, clock: SharedClock) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        // Expiry is checked against `clock` below, with no leeway.
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            access_ttl: config.access_ttl,
            refresh_ttl: config.refresh_ttl,
            clock,
        }
    }

    /// Lifetime of a token kind
    pub fn ttl(&self, kind: TokenKind) -> Duration {
        match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        }
    }

    /// Sign a token of the given kind for `subject`
    pub fn issue(&self, subject: Subject, kind: TokenKind) -> TokenResult<String> {
        let now = self.clock.now();
        let exp = now
            .checked_add_signed(self.ttl(kind))
            .ok_or_else(|| TokenError::Signing(format!("{kind:?} token expiry out of range")))?;
        let claims = Claims {
            user_id: subject,
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Short-lived access token
    pub fn issue_access_token(&self, subject: Subject) -> TokenResult<String> {
        self.issue(subject, TokenKind::Access)
    }

    /// Long-lived refresh token
    pub fn issue_refresh_token(&self, subject: Subject) -> TokenResult<String> {
        self.issue(subject, TokenKind::Refresh)
    }

    /// Access and refresh token for the same subject
    pub fn issue_pair(&self, subject: Subject) -> TokenResult<TokenPair> {
        Ok(TokenPair {
            access: self.issue_access_token(subject)?,
            refresh: self.issue_refresh_token(subject)?,
        })
    }

    /// Verify a token and return its claims
    pub fn decode_claims(&self, token: &str) -> TokenResult<Claims> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            debug!("Token rejected: {}", e);
            TokenError::Invalid(e.to_string())
        })?;

        if !data.claims.is_valid_at(self.clock.now()) {
            debug!("Token rejected: expired at {}", data.claims.exp);
            return Err(TokenError::Invalid("token expired".to_string()));
        }

        Ok(data.claims)
    }

    /// Verify a token and return the subject it carries
    pub fn verify_token(&self, token: &str) -> TokenResult<Subject> {
        self.decode_claims(token).map(|claims| claims.user_id)
    }
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}
