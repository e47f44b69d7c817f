//! Offers
//!
//! Discount rules tied to a single product. Each variant is a pure function of
//! the product, the quantity of it in the cart and the offer parameters.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    cart::Cart,
    catalog::{Catalog, CatalogError},
    currency::{Currency, CurrencyError},
    products::{Product, ProductKey},
};

pub mod bulk;
pub mod buy_x_get_y_free;

pub use bulk::BulkOffer;
pub use buy_x_get_y_free::BuyXGetYFreeOffer;

/// Offer construction errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OfferError {
    /// A parameter is outside its allowed range.
    #[error("Invalid offer parameter {parameter} = {value}: {reason}")]
    InvalidParameter {
        /// Parameter name
        parameter: &'static str,
        /// Rejected value
        value: u32,
        /// Allowed range
        reason: &'static str,
    },

    /// The offer targets a product the catalog does not contain.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Offer configuration record, as supplied by an offer provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OfferConfig {
    /// Percentage off all units once `min_quantity` is reached
    Bulk {
        /// Targeted product code
        product_code: String,
        /// Threshold quantity
        min_quantity: u32,
        /// Discount percentage, 0 to 100
        percentage: u8,
    },

    /// `get_free` units free for every `buy` units
    #[serde(rename = "buy_x_get_y_free")]
    BuyXGetYFree {
        /// Targeted product code
        product_code: String,
        /// Group size
        buy: u32,
        /// Free units per group
        get_free: u32,
    },
}

impl OfferConfig {
    /// Return the targeted product code
    pub fn product_code(&self) -> &str {
        match self {
            OfferConfig::Bulk { product_code, .. }
            | OfferConfig::BuyXGetYFree { product_code, .. } => product_code,
        }
    }

    /// Resolve the product code against `catalog` and validate the parameters.
    ///
    /// # Errors
    ///
    /// - [`OfferError::Catalog`]: the product code is not in the catalog.
    /// - [`OfferError::InvalidParameter`]: a parameter is out of range.
    pub fn resolve(&self, catalog: &Catalog) -> Result<Offer, OfferError> {
        let product = catalog.key(self.product_code())?;

        match *self {
            OfferConfig::Bulk {
                min_quantity,
                percentage,
                ..
            } => Ok(Offer::Bulk(BulkOffer::new(
                product,
                min_quantity,
                percentage,
            )?)),
            OfferConfig::BuyXGetYFree { buy, get_free, .. } => Ok(Offer::BuyXGetYFree(
                BuyXGetYFreeOffer::new(product, buy, get_free)?,
            )),
        }
    }
}

/// Offer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Offer {
    /// Bulk percentage offer
    Bulk(BulkOffer),

    /// Buy X get Y free offer
    BuyXGetYFree(BuyXGetYFreeOffer),
}

impl Offer {
    /// Return the targeted product key
    pub fn product(&self) -> ProductKey {
        match self {
            Offer::Bulk(offer) => offer.product(),
            Offer::BuyXGetYFree(offer) => offer.product(),
        }
    }

    /// Display label for the offer.
    pub fn name(&self, product: &Product) -> String {
        match self {
            Offer::Bulk(offer) => offer.name(product),
            Offer::BuyXGetYFree(offer) => offer.name(product),
        }
    }

    /// Discount this offer grants for `cart`. The cart is not modified.
    ///
    /// `product` must be the product this offer targets.
    ///
    /// # Errors
    ///
    /// Returns [`CurrencyError::Overflow`] if the amount overflows.
    pub fn discount(&self, product: &Product, cart: &Cart) -> Result<Currency, CurrencyError> {
        let quantity = cart.amount_of(&product.code);

        match self {
            Offer::Bulk(offer) => offer.discount(product, quantity),
            Offer::BuyXGetYFree(offer) => offer.discount(product, quantity),
        }
    }

    /// Units still needed in `cart` before the offer triggers. Informational only.
    pub fn more_needed(&self, product: &Product, cart: &Cart) -> u32 {
        let quantity = cart.amount_of(&product.code);

        match self {
            Offer::Bulk(offer) => offer.more_needed(quantity),
            Offer::BuyXGetYFree(offer) => offer.more_needed(quantity),
        }
    }
}
