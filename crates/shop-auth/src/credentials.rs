//! # Credential Verification
//!
//! The login decision is an injected capability: the token service never looks
//! at credentials itself, it only issues tokens once a verifier says yes.
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │          CredentialVerifier (trait)           │
//! │  ├── verify(&Credentials) -> bool             │
//! │  └── name()                                   │
//! └───────────────────────────────────────────────┘
//!                        ▲
//!        ┌───────────────┼────────────────┐
//!  ┌─────┴──────┐ ┌──────┴───────┐ ┌──────┴──────┐
//!  │  CoinFlip  │ │   AllowAll   │ │   DenyAll   │
//!  └────────────┘ └──────────────┘ └─────────────┘
//! ```

use async_trait::async_trait;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Login request body
#[derive(Clone, Default, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Decides whether a login attempt succeeds.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// Returns true when the credentials are accepted
    async fn verify(&self, credentials: &Credentials) -> bool;

    /// Verifier name (for logging)
    fn name(&self) -> &'static str;
}

/// Type alias for a shared verifier (dynamic dispatch)
pub type BoxedCredentialVerifier = Arc<dyn CredentialVerifier>;

/// Accepts half of all attempts at random, whatever the credentials.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoinFlipVerifier;

#[async_trait]
impl CredentialVerifier for CoinFlipVerifier {
    async fn verify(&self, _credentials: &Credentials) -> bool {
        rand::random_bool(0.5)
    }

    fn name(&self) -> &'static str {
        "coin-flip"
    }
}

/// Accepts every attempt
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAllVerifier;

#[async_trait]
impl CredentialVerifier for AllowAllVerifier {
    async fn verify(&self, _credentials: &Credentials) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "allow-all"
    }
}

/// Rejects every attempt
#[derive(Debug, Clone, Copy, Default)]
pub struct DenyAllVerifier;

#[async_trait]
impl CredentialVerifier for DenyAllVerifier {
    async fn verify(&self, _credentials: &Credentials) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "deny-all"
    }
}

/// Which verifier the server starts with (`LOGIN_MODE`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoginMode {
    #[default]
    CoinFlip,
    AllowAll,
    DenyAll,
}

impl LoginMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoginMode::CoinFlip => "coin-flip",
            LoginMode::AllowAll => "allow-all",
            LoginMode::DenyAll => "deny-all",
        }
    }

    /// Build the verifier for this mode
    pub fn verifier(&self) -> BoxedCredentialVerifier {
        match self {
            LoginMode::CoinFlip => Arc::new(CoinFlipVerifier),
            LoginMode::AllowAll => Arc::new(AllowAllVerifier),
            LoginMode::DenyAll => Arc::new(DenyAllVerifier),
        }
    }
}

impl FromStr for LoginMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "coin-flip" | "coinflip" | "random" => Ok(LoginMode::CoinFlip),
            "allow-all" | "allow" => Ok(LoginMode::AllowAll),
            "deny-all" | "deny" => Ok(LoginMode::DenyAll),
            other => Err(format!("unknown login mode: {other}")),
        }
    }
}

impl fmt::Display for LoginMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
