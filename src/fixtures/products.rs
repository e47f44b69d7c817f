//! Product Fixtures

use serde::Deserialize;

use crate::{currency::Currency, fixtures::FixtureError, products::Product};

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
pub struct ProductsFixture {
    /// Products in catalog order
    pub products: Vec<ProductFixture>,
}

/// Product fixture from YAML
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product code
    pub code: String,

    /// Product name
    pub name: String,

    /// Price (e.g. "7.5 €")
    pub price: String,
}

impl TryFrom<ProductFixture> for Product {
    type Error = FixtureError;

    fn try_from(fixture: ProductFixture) -> Result<Self, Self::Error> {
        let unit_price = fixture
            .price
            .parse::<Currency>()
            .map_err(|_err| FixtureError::InvalidPrice(fixture.price.clone()))?;

        Ok(Product::new(fixture.code, fixture.name, unit_price))
    }
}
