//! # shop-api
//!
//! HTTP API layer for shop-gate.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - REST endpoints for the product collection
//! - Bearer-token authorization middleware
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | POST | `/login` | Issue access and refresh tokens |
//! | GET | `/protected` | Bearer-gated, returns the subject id |
//! | GET | `/products` | List products (`?sort=id\|name`) |
//! | POST | `/products` | Create product |
//! | GET | `/products/{id}` | Get product |
//! | PUT | `/products/{id}` | Replace product |
//! | PATCH | `/products/{id}` | Partially update product |
//! | DELETE | `/products/{id}` | Delete product |

pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use middleware::AuthenticatedSubject;
pub use routes::create_router;
pub use state::{AppConfig, AppState};
