//! Fixtures
//!
//! Loads product catalogs and offer configurations from YAML files laid out as
//! `{base}/products/{name}.yml` and `{base}/offers/{name}.yml`.

use std::{fs, path::PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::{
    catalog::{Catalog, CatalogError},
    checkout::{Shop, ShopError},
    fixtures::products::ProductsFixture,
    offers::OfferConfig,
    products::Product,
};

pub mod products;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Duplicate or missing product
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Offers did not resolve against the loaded catalog
    #[error(transparent)]
    Shop(#[from] ShopError),
}

/// Wrapper for offers in YAML
#[derive(Debug, Deserialize)]
struct OffersFixture {
    offers: Vec<OfferConfig>,
}

/// Fixture
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    catalog: Catalog,

    offers: Vec<OfferConfig>,
}

impl Fixture {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            catalog: Catalog::new(),
            offers: Vec::new(),
        }
    }

    /// Load products from a YAML fixture file, appending them to the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, a price is
    /// malformed, or a product code is already loaded.
    pub fn load_products(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("products").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: ProductsFixture = serde_norway::from_str(&contents)?;

        for product_fixture in fixture.products {
            let product: Product = product_fixture.try_into()?;

            self.catalog.insert(product)?;
        }

        Ok(self)
    }

    /// Load offer configurations from a YAML fixture file.
    ///
    /// Product codes are not checked until [`Fixture::shop`] is called.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_offers(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("offers").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: OffersFixture = serde_norway::from_str(&contents)?;

        self.offers.extend(fixture.offers);

        Ok(self)
    }

    /// Load a complete fixture set (products and offers with the same name)
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture.load_products(name)?.load_offers(name)?;

        Ok(fixture)
    }

    /// Get a product by its code
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found.
    pub fn product(&self, code: &str) -> Result<&Product, FixtureError> {
        Ok(self.catalog.get(code)?)
    }

    /// Loaded catalog
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Loaded offer configurations, in file order
    pub fn offers(&self) -> &[OfferConfig] {
        &self.offers
    }

    /// Build a shop from everything loaded so far.
    ///
    /// # Errors
    ///
    /// Returns an error if an offer does not resolve against the catalog.
    pub fn shop(&self) -> Result<Shop, FixtureError> {
        Ok(Shop::new(self.catalog.clone(), self.offers.iter().cloned())?)
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}
