//! Token error types.

use shop_core::ShopError;
use thiserror::Error;

/// Errors raised while issuing or verifying tokens
#[derive(Debug, Error)]
pub enum TokenError {
    /// The signing library failed to produce a token
    #[error("Token signing failed: {0}")]
    Signing(String),

    /// Parse error, algorithm mismatch, bad signature or expiry
    #[error("Invalid token: {0}")]
    Invalid(String),

    /// Missing or unusable token configuration
    #[error("Token configuration error: {0}")]
    Configuration(String),
}

/// Result type alias for token operations
pub type TokenResult<T> = Result<T, TokenError>;

impl From<TokenError> for ShopError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Invalid(msg) => ShopError::Unauthorized(msg),
            TokenError::Signing(msg) => ShopError::Internal(msg),
            TokenError::Configuration(msg) => ShopError::Configuration(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_shop_error() {
        let err: ShopError = TokenError::Invalid("ExpiredSignature".into()).into();
        assert_eq!(err.status_code(), 401);
        assert_eq!(err.client_message(), "Unauthorized");

        let err: ShopError = TokenError::Signing("key rejected".into()).into();
        assert_eq!(err.status_code(), 500);
    }
}
