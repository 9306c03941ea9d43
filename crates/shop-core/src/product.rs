//! # Product Types
//!
//! The product resource and the payloads that create and modify it.
//! A seed catalog can be loaded from `config/products.toml`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Repository-assigned product identifier
pub type ProductId = i64;

/// A product record as stored and served
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier, assigned by the repository
    pub id: ProductId,

    /// Display name
    pub name: String,

    /// Short description
    pub description: String,

    /// Unit price (not validated, negative values are stored as given)
    pub price: f64,
}

impl Product {
    /// Build a stored product from a payload and an assigned id
    pub fn from_new(id: ProductId, new: NewProduct) -> Self {
        Self {
            id,
            name: new.name,
            description: new.description,
            price: new.price,
        }
    }

    /// Merge the recognized fields of a patch into this product
    pub fn apply_patch(&mut self, patch: &ProductPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
    }
}

/// Create/replace payload.
///
/// Clients never choose the id: an `id` field in the body is ignored and
/// missing fields fall back to empty values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: f64,
}

impl NewProduct {
    pub fn new(name: impl Into<String>, description: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            price,
        }
    }
}

/// Partial update, built leniently from a flat JSON object.
///
/// Only `name` (string), `description` (string) and `price` (number) are
/// recognized. Unknown keys and values of the wrong type are dropped, not
/// reported.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
}

impl ProductPatch {
    /// Builder: set name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Builder: set description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder: set price
    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    /// True when no recognized field survived
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.price.is_none()
    }
}

impl From<&Map<String, Value>> for ProductPatch {
    fn from(fields: &Map<String, Value>) -> Self {
        let mut patch = ProductPatch::default();
        for (field, value) in fields {
            match field.as_str() {
                "name" => {
                    if let Some(name) = value.as_str() {
                        patch.name = Some(name.to_string());
                    }
                }
                "description" => {
                    if let Some(description) = value.as_str() {
                        patch.description = Some(description.to_string());
                    }
                }
                "price" => {
                    if let Some(price) = value.as_f64() {
                        patch.price = Some(price);
                    }
                }
                _ => {}
            }
        }
        patch
    }
}

/// Ordering applied by `ProductRepository::list`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    /// Insertion order
    #[default]
    Natural,
    /// Ascending id
    Id,
    /// Lexicographic name
    Name,
}

impl SortKey {
    /// Parse the `sort` query parameter; unknown values mean natural order
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("id") => SortKey::Id,
            Some("name") => SortKey::Name,
            _ => SortKey::Natural,
        }
    }
}

/// Seed catalog (loaded from config)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductCatalog {
    #[serde(default)]
    pub products: Vec<NewProduct>,
}

impl ProductCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a product to the catalog
    pub fn add(&mut self, product: NewProduct) {
        self.products.push(product);
    }

    /// Load catalog from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_patch_ignores_wrong_types() {
        let patch = ProductPatch::from(&fields(json!({
            "price": "not-a-number",
            "name": "X"
        })));
        assert_eq!(patch, ProductPatch::default().with_name("X"));
    }

    #[test]
    fn test_patch_from_full_object() {
        let patch = ProductPatch::from(&fields(json!({
            "name": "Ink",
            "description": "Black",
            "price": 4.25
        })));
        let expected = ProductPatch::default()
            .with_name("Ink")
            .with_description("Black")
            .with_price(4.25);
        assert_eq!(patch, expected);
    }

    #[test]
    fn test_patch_ignores_unknown_fields() {
        let patch = ProductPatch::from(&fields(json!({ "id": 42, "colour": "red" })));
        assert!(patch.is_empty());
    }

    #[test]
    fn test_patch_accepts_integer_price() {
        let patch = ProductPatch::from(&fields(json!({ "price": 3 })));
        assert_eq!(patch.price, Some(3.0));
    }

    #[test]
    fn test_apply_patch_keeps_untouched_fields() {
        let mut product = Product::from_new(4, NewProduct::new("Pen", "Blue", 1.5));
        product.apply_patch(&ProductPatch::default().with_description("Red"));

        assert_eq!(product.id, 4);
        assert_eq!(product.name, "Pen");
        assert_eq!(product.description, "Red");
        assert_eq!(product.price, 1.5);
    }

    #[test]
    fn test_new_product_ignores_client_id() {
        let new: NewProduct =
            serde_json::from_value(json!({ "id": 77, "name": "Pen" })).unwrap();
        assert_eq!(new, NewProduct::new("Pen", "", 0.0));
    }

    #[test]
    fn test_sort_key_parse() {
        assert_eq!(SortKey::parse(Some("id")), SortKey::Id);
        assert_eq!(SortKey::parse(Some("name")), SortKey::Name);
        assert_eq!(SortKey::parse(Some("price")), SortKey::Natural);
        assert_eq!(SortKey::parse(None), SortKey::Natural);
    }

    #[test]
    fn test_catalog_from_toml() {
        let catalog = ProductCatalog::from_toml(
            r#"
            [[products]]
            name = "Pen"
            description = "Blue ink"
            price = 1.5

            [[products]]
            name = "Notebook"
            price = 4.25
            "#,
        )
        .unwrap();

        assert_eq!(catalog.products.len(), 2);
        assert_eq!(catalog.products[1].description, "");
    }
}
