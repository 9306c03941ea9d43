//! # Shop Error Types
//!
//! Typed error handling for the shop-gate service.
//! Every fallible operation returns `Result<T, ShopError>`; the HTTP layer maps
//! each kind to a fixed status code and a generic client message.

use thiserror::Error;

/// Core error type for all service operations
#[derive(Debug, Error)]
pub enum ShopError {
    /// Malformed body, non-integer id, malformed header
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Missing, malformed, expired or otherwise invalid bearer token
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Credential verifier rejected a login attempt
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Unknown product id or unmatched route
    #[error("Not found: {0}")]
    NotFound(String),

    /// Configuration errors (missing keys, invalid values)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Serialization or signing failure
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ShopError {
    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            ShopError::BadRequest(_) => 400,
            ShopError::Unauthorized(_) => 401,
            ShopError::InvalidCredentials => 401,
            ShopError::NotFound(_) => 404,
            ShopError::Configuration(_) => 500,
            ShopError::Internal(_) => 500,
        }
    }

    /// Message safe to hand to a client.
    ///
    /// Never includes the error detail: a client cannot tell an expired token
    /// from a forged one, or a serializer failure from a signing failure.
    pub fn client_message(&self) -> &'static str {
        match self {
            ShopError::BadRequest(_) => "Invalid request",
            ShopError::Unauthorized(_) => "Unauthorized",
            ShopError::InvalidCredentials => "Invalid credentials",
            ShopError::NotFound(_) => "Not found",
            ShopError::Configuration(_) | ShopError::Internal(_) => "Something went wrong",
        }
    }

    /// Returns true for errors that are the server's fault
    pub fn is_internal(&self) -> bool {
        matches!(self, ShopError::Configuration(_) | ShopError::Internal(_))
    }
}

impl From<serde_json::Error> for ShopError {
    fn from(err: serde_json::Error) -> Self {
        ShopError::BadRequest(err.to_string())
    }
}

/// Result type alias for service operations
pub type ShopResult<T> = Result<T, ShopError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ShopError::BadRequest("x".into()).status_code(), 400);
        assert_eq!(ShopError::Unauthorized("expired".into()).status_code(), 401);
        assert_eq!(ShopError::InvalidCredentials.status_code(), 401);
        assert_eq!(ShopError::NotFound("product 7".into()).status_code(), 404);
        assert_eq!(ShopError::Internal("boom".into()).status_code(), 500);
    }

    #[test]
    fn test_client_message_hides_detail() {
        let expired = ShopError::Unauthorized("token expired".into());
        let forged = ShopError::Unauthorized("signature mismatch".into());
        assert_eq!(expired.client_message(), forged.client_message());
        assert_eq!(expired.client_message(), "Unauthorized");

        let internal = ShopError::Internal("hmac key rejected".into());
        assert_eq!(internal.client_message(), "Something went wrong");
        assert!(internal.is_internal());
        assert!(!ShopError::NotFound("1".into()).is_internal());
    }

    #[test]
    fn test_json_error_is_bad_request() {
        let err: ShopError = serde_json::from_str::<serde_json::Value>("{oops")
            .unwrap_err()
            .into();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.client_message(), "Invalid request");
    }
}
