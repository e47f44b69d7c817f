//! Catalog
//!
//! The immutable set of products a shop sells, looked up by code and iterated in
//! the order the products were added.

use rustc_hash::FxHashMap;
use slotmap::SlotMap;
use thiserror::Error;

use crate::products::{Product, ProductKey};

/// Catalog lookup and construction errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// No product with this code exists in the catalog.
    #[error("Unknown product code: {0}")]
    UnknownProductCode(String),

    /// Two products share the same code.
    #[error("Duplicate product code: {0}")]
    DuplicateProductCode(String),
}

/// Catalog
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: SlotMap<ProductKey, Product>,
    keys: FxHashMap<String, ProductKey>,
    order: Vec<ProductKey>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog holding `products`, in the given order.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateProductCode`] if two products share a code.
    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Result<Self, CatalogError> {
        let mut catalog = Self::new();

        for product in products {
            catalog.insert(product)?;
        }

        Ok(catalog)
    }

    /// Adds a product to the end of the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateProductCode`] if the code is already taken.
    pub fn insert(&mut self, product: Product) -> Result<ProductKey, CatalogError> {
        if self.keys.contains_key(&product.code) {
            return Err(CatalogError::DuplicateProductCode(product.code));
        }

        let code = product.code.clone();
        let key = self.products.insert(product);

        self.keys.insert(code, key);
        self.order.push(key);

        Ok(key)
    }

    /// Get a product by its code
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownProductCode`] if the code is not in the catalog.
    pub fn get(&self, code: &str) -> Result<&Product, CatalogError> {
        let key = self.key(code)?;

        self.products
            .get(key)
            .ok_or_else(|| CatalogError::UnknownProductCode(code.to_string()))
    }

    /// Get a product key by its code
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownProductCode`] if the code is not in the catalog.
    pub fn key(&self, code: &str) -> Result<ProductKey, CatalogError> {
        self.keys
            .get(code)
            .copied()
            .ok_or_else(|| CatalogError::UnknownProductCode(code.to_string()))
    }

    /// Get a product by key
    pub fn product(&self, key: ProductKey) -> Option<&Product> {
        self.products.get(key)
    }

    /// Whether a product with this code exists.
    pub fn contains(&self, code: &str) -> bool {
        self.keys.contains_key(code)
    }

    /// Iterates `(key, product)` pairs in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (ProductKey, &Product)> {
        self.order
            .iter()
            .filter_map(|&key| self.products.get(key).map(|product| (key, product)))
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the catalog has no products.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
