//! # Request Handlers
//!
//! Axum request handlers for the product API.
//! Bodies and path ids are parsed by hand so every rejection carries the same
//! `{ "message": ... }` envelope as the rest of the API.

use crate::middleware::AuthenticatedSubject;
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use shop_auth::{Credentials, TokenPair};
use shop_core::{NewProduct, Product, ProductId, ProductPatch, ShopError, SortKey};
use tracing::{error, info, instrument};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Handler error: status plus envelope
pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Query string for `GET /products`
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub sort: Option<String>,
}

/// Map a service error to its response; the detail is logged, never returned
pub fn error_response(err: ShopError) -> ApiError {
    if err.is_internal() {
        error!("Request failed: {}", err);
    }
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ErrorResponse::new(err.client_message())))
}

fn parse_id(raw: &str) -> Result<ProductId, ShopError> {
    raw.parse()
        .map_err(|_| ShopError::BadRequest(format!("invalid product id: {raw:?}")))
}

fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, ShopError> {
    Ok(serde_json::from_slice(body)?)
}

fn not_found(id: ProductId) -> ShopError {
    ShopError::NotFound(format!("product {id}"))
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "shop-gate",
        "version": env!("CARGO_PKG_VERSION"),
        "products": state.products.len()
    }))
}

/// Unmatched route
pub async fn not_found_fallback() -> ApiError {
    error_response(ShopError::NotFound("no such route".into()))
}

/// Exchange credentials for an access/refresh token pair
#[instrument(skip(state, body), fields(verifier = state.verifier.name()))]
pub async fn login(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<TokenPair>, ApiError> {
    let credentials: Credentials = if body.is_empty() {
        Credentials::default()
    } else {
        parse_body(&body).map_err(error_response)?
    };

    if !state.verifier.verify(&credentials).await {
        info!("Login rejected for {:?}", credentials.username);
        return Err(error_response(ShopError::InvalidCredentials));
    }

    let subject = state.config.login_subject;
    let pair = state
        .tokens
        .issue_pair(subject)
        .map_err(|e| error_response(e.into()))?;

    info!("Issued tokens for subject {}", subject);
    Ok(Json(pair))
}

/// Protected endpoint: echoes the authenticated subject id
pub async fn protected(
    subject: Option<Extension<AuthenticatedSubject>>,
) -> Result<Json<i64>, ApiError> {
    match subject {
        Some(Extension(AuthenticatedSubject(id))) => Ok(Json(id)),
        None => Err(error_response(ShopError::Unauthorized(
            "no authenticated subject on request".into(),
        ))),
    }
}

/// List products, optionally sorted by `id` or `name`
pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Json<Vec<Product>> {
    Json(state.products.list(SortKey::parse(params.sort.as_deref())))
}

/// Create a product
#[instrument(skip(state, body))]
pub async fn create_product(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let new: NewProduct = parse_body(&body).map_err(error_response)?;
    let product = state.products.create(new);
    info!("Created product {}", product.id);
    Ok((StatusCode::CREATED, Json(product)))
}

/// Get a single product
pub async fn get_product(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    let id = parse_id(&raw_id).map_err(error_response)?;
    state
        .products
        .get(id)
        .map(Json)
        .ok_or_else(|| error_response(not_found(id)))
}

/// Replace every field of a product
#[instrument(skip(state, body))]
pub async fn replace_product(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> Result<Json<Product>, ApiError> {
    let id = parse_id(&raw_id).map_err(error_response)?;
    let replacement: NewProduct = parse_body(&body).map_err(error_response)?;
    state
        .products
        .replace_by_id(id, replacement)
        .map(Json)
        .ok_or_else(|| error_response(not_found(id)))
}

/// Merge recognized fields into a product
#[instrument(skip(state, body))]
pub async fn patch_product(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> Result<Json<Product>, ApiError> {
    let id = parse_id(&raw_id).map_err(error_response)?;
    let fields: Map<String, Value> = parse_body(&body).map_err(error_response)?;
    let patch = ProductPatch::from(&fields);
    state
        .products
        .patch_by_id(id, &patch)
        .map(Json)
        .ok_or_else(|| error_response(not_found(id)))
}

/// Delete a product, returning the removed record
#[instrument(skip(state))]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    let id = parse_id(&raw_id).map_err(error_response)?;
    let removed = state
        .products
        .delete_by_id(id)
        .ok_or_else(|| error_response(not_found(id)))?;
    info!("Deleted product {}", removed.id);
    Ok(Json(removed))
}
