//! # shop-core
//!
//! Core types for the shop-gate product service.
//!
//! This crate provides:
//! - `Product`, `NewProduct` and `ProductPatch` for the product resource
//! - `ProductRepository`, the shared in-memory product collection
//! - `ProductCatalog` for seeding the repository from `config/products.toml`
//! - `ShopError` for typed error handling
//!
//! ## Example
//!
//! ```rust
//! use shop_core::{NewProduct, ProductRepository, SortKey};
//!
//! let repo = ProductRepository::new();
//! let pen = repo.create(NewProduct::new("Pen", "Blue", 1.5));
//! assert_eq!(pen.id, 1);
//!
//! let listed = repo.list(SortKey::Name);
//! assert_eq!(listed.len(), 1);
//! ```

pub mod error;
pub mod product;
pub mod repository;

// Re-exports for convenience
pub use error::{ShopError, ShopResult};
pub use product::{NewProduct, Product, ProductCatalog, ProductId, ProductPatch, SortKey};
pub use repository::ProductRepository;
