//! # Authorization Middleware
//!
//! Gates the protected routes behind a bearer token.
//!
//! ```text
//! request ──▶ requires_authorization? ── no ──▶ handler
//!                      │ yes
//!                      ▼
//!          Authorization: Bearer <token> ── missing/malformed ──▶ 401
//!                      │
//!                      ▼
//!             TokenService::verify_token ── invalid/expired ──▶ 401
//!                      │
//!                      ▼
//!   extensions += AuthenticatedSubject ──▶ handler
//! ```
//!
//! Every rejection produces the same `401 {"message":"Unauthorized"}`.

use crate::handlers::error_response;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap, Method},
    middleware::Next,
    response::{IntoResponse, Response},
};
use shop_auth::Subject;
use shop_core::ShopError;
use tracing::{debug, warn};

/// Routes that need a valid bearer token, as `(method, path)`
const PROTECTED_ROUTES: &[(&str, &str)] = &[("GET", "/protected")];

/// Identity attached to an authorized request.
///
/// Lives in the request extensions; only this middleware inserts it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedSubject(pub Subject);

/// True when `method path` is one of the protected routes.
///
/// `HEAD` is gated like `GET`, since the router serves it from the same handler.
pub fn requires_authorization(method: &Method, path: &str) -> bool {
    let method = if method == Method::HEAD {
        &Method::GET
    } else {
        method
    };
    PROTECTED_ROUTES
        .iter()
        .any(|(m, p)| method.as_str() == *m && path == *p)
}

/// Extract the token from `Bearer <token>`.
///
/// The scheme is matched case-insensitively and must be followed by exactly
/// one non-empty token.
pub fn parse_bearer(value: &str) -> Option<&str> {
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("Bearer") {
        return None;
    }
    if token.is_empty() || token.contains(char::is_whitespace) {
        return None;
    }
    Some(token)
}

/// Verify the bearer token in `headers` and return its subject
pub fn authorize(state: &AppState, headers: &HeaderMap) -> Result<Subject, ShopError> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| ShopError::Unauthorized("missing authorization header".into()))?
        .to_str()
        .map_err(|_| ShopError::Unauthorized("authorization header is not ASCII".into()))?;

    let token = parse_bearer(header)
        .ok_or_else(|| ShopError::Unauthorized("malformed authorization header".into()))?;

    Ok(state.tokens.verify_token(token)?)
}

/// Axum middleware: enforce bearer authentication on protected routes
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    if !requires_authorization(&method, &path) {
        return next.run(request).await;
    }

    match authorize(&state, request.headers()) {
        Ok(subject) => {
            debug!(%method, %path, subject, "Authorized request");
            request.extensions_mut().insert(AuthenticatedSubject(subject));
            next.run(request).await
        }
        Err(err) => {
            debug!(%method, %path, "Authorization failed: {}", err);
            warn!("Unauthorized request for {} {}", method, path);
            error_response(err).into_response()
        }
    }
}
