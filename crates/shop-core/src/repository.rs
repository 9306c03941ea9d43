//! # Product Repository
//!
//! The canonical, ordered product collection shared by every request.
//!
//! One `RwLock` guards the whole collection. Mutations hold the write lock for
//! their entire read-modify-write, so id assignment, patches and deletes never
//! interleave. Reads hold the read lock only long enough to copy out, so callers
//! always get a consistent snapshot and never a reference into the live list.

use crate::product::{NewProduct, Product, ProductCatalog, ProductId, ProductPatch, SortKey};
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::sync::Arc;

#[derive(Debug, Default)]
struct Inner {
    products: Vec<Product>,
    /// Highest id ever handed out; never decreases
    last_id: ProductId,
}

impl Inner {
    fn position(&self, id: ProductId) -> Option<usize> {
        self.products.iter().position(|p| p.id == id)
    }

    fn next_id(&mut self) -> ProductId {
        let max_live = self.products.iter().map(|p| p.id).max().unwrap_or(0);
        self.last_id = self.last_id.max(max_live) + 1;
        self.last_id
    }
}

/// In-memory product repository.
///
/// Cheap to clone; clones share the same collection.
#[derive(Debug, Clone, Default)]
pub struct ProductRepository {
    inner: Arc<RwLock<Inner>>,
}

impl ProductRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository seeded from a catalog, ids assigned in catalog order
    pub fn from_catalog(catalog: ProductCatalog) -> Self {
        let repo = Self::new();
        for product in catalog.products {
            repo.create(product);
        }
        repo
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read()
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write()
    }

    /// Snapshot of all products in the requested order.
    ///
    /// Sorting is stable: products with equal keys keep their insertion order.
    pub fn list(&self, sort: SortKey) -> Vec<Product> {
        let mut products = self.read().products.clone();
        match sort {
            SortKey::Natural => {}
            SortKey::Id => products.sort_by_key(|p| p.id),
            SortKey::Name => products.sort_by(|a, b| a.name.cmp(&b.name)),
        }
        products
    }

    /// Store a new product under the next id and return it
    pub fn create(&self, new: NewProduct) -> Product {
        let mut inner = self.write();
        let id = inner.next_id();
        let product = Product::from_new(id, new);
        inner.products.push(product.clone());
        product
    }

    /// Find a product by id
    pub fn get(&self, id: ProductId) -> Option<Product> {
        self.read().products.iter().find(|p| p.id == id).cloned()
    }

    /// Overwrite every field of a product; the id stays `id`
    pub fn replace_by_id(&self, id: ProductId, replacement: NewProduct) -> Option<Product> {
        let mut inner = self.write();
        let idx = inner.position(id)?;
        let product = Product::from_new(id, replacement);
        inner.products[idx] = product.clone();
        Some(product)
    }

    /// Merge the recognized fields of `patch` into a product
    pub fn patch_by_id(&self, id: ProductId, patch: &ProductPatch) -> Option<Product> {
        let mut inner = self.write();
        let product = inner.products.iter_mut().find(|p| p.id == id)?;
        product.apply_patch(patch);
        Some(product.clone())
    }

    /// Remove a product, keeping the relative order of the rest
    pub fn delete_by_id(&self, id: ProductId) -> Option<Product> {
        let mut inner = self.write();
        let idx = inner.position(id)?;
        Some(inner.products.remove(idx))
    }

    /// Number of stored products
    pub fn len(&self) -> usize {
        self.read().products.len()
    }

    /// True when no products are stored
    pub fn is_empty(&self) -> bool {
        self.read().products.is_empty()
    }
}
