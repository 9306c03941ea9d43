//! # shop-auth
//!
//! Bearer token lifecycle and credential verification for shop-gate.
//!
//! This crate provides:
//!
//! 1. **TokenService** - issues and verifies HMAC-signed JWTs
//!    - Access tokens (15 minutes) and refresh tokens (24 hours)
//!    - Only the HMAC family is accepted on verification (no `none`, no RSA/EC)
//!    - Expiry checked against an injected `Clock`, with no leeway
//!
//! 2. **CredentialVerifier** - the login decision, injected at startup
//!    - `CoinFlipVerifier` (demo stand-in), `AllowAllVerifier`, `DenyAllVerifier`
//!
//! ## Quick Start
//!
//! ```rust
//! use shop_auth::{TokenConfig, TokenService};
//!
//! let service = TokenService::new(TokenConfig::new("change-me"));
//! let token = service.issue_access_token(42)?;
//! assert_eq!(service.verify_token(&token)?, 42);
//! # Ok::<(), shop_auth::TokenError>(())
//! ```

pub mod clock;
pub mod config;
pub mod credentials;
pub mod error;
pub mod token;

// Re-exports
pub use clock::{Clock, ManualClock, SharedClock, SystemClock};
pub use config::TokenConfig;
pub use credentials::{
    AllowAllVerifier, BoxedCredentialVerifier, CoinFlipVerifier, CredentialVerifier,
    Credentials, DenyAllVerifier, LoginMode,
};
pub use error::{TokenError, TokenResult};
pub use token::{Claims, Subject, TokenKind, TokenPair, TokenService};
