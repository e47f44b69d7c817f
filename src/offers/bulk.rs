//! Bulk Offer
//!
//! A percentage off every unit of a product once a minimum quantity is in the cart.

use crate::{
    currency::{Currency, CurrencyError},
    offers::OfferError,
    products::{Product, ProductKey},
};

/// Percentage discount on all units once `min_quantity` is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulkOffer {
    product: ProductKey,
    min_quantity: u32,
    percentage: u8,
}

impl BulkOffer {
    /// Create a new bulk offer.
    ///
    /// # Errors
    ///
    /// Returns [`OfferError::InvalidParameter`] if `min_quantity` is 0 or
    /// `percentage` is above 100.
    pub fn new(product: ProductKey, min_quantity: u32, percentage: u8) -> Result<Self, OfferError> {
        if min_quantity < 1 {
            return Err(OfferError::InvalidParameter {
                parameter: "min_quantity",
                value: min_quantity,
                reason: "must be at least 1",
            });
        }

        if percentage > 100 {
            return Err(OfferError::InvalidParameter {
                parameter: "percentage",
                value: u32::from(percentage),
                reason: "must be between 0 and 100",
            });
        }

        Ok(Self {
            product,
            min_quantity,
            percentage,
        })
    }

    /// Return the discounted product
    pub fn product(&self) -> ProductKey {
        self.product
    }

    /// Units needed before the discount applies
    pub fn min_quantity(&self) -> u32 {
        self.min_quantity
    }

    /// Discount percentage, 0 to 100
    pub fn percentage(&self) -> u8 {
        self.percentage
    }

    /// Display label, e.g. "x3 T-Shirt offer".
    pub fn name(&self, product: &Product) -> String {
        format!("x{} {} offer", self.min_quantity, product.name)
    }

    /// Discount for `quantity` units: `unit_price * quantity * percentage / 100`,
    /// truncated, or zero below the threshold.
    ///
    /// # Errors
    ///
    /// Returns [`CurrencyError::Overflow`] if the intermediate product overflows.
    pub fn discount(&self, product: &Product, quantity: u32) -> Result<Currency, CurrencyError> {
        if quantity < self.min_quantity {
            return Ok(Currency::ZERO);
        }

        product
            .unit_price
            .multiply(quantity)?
            .percentage(self.percentage)
    }

    /// How many more units are needed before the offer triggers.
    pub fn more_needed(&self, quantity: u32) -> u32 {
        self.min_quantity.saturating_sub(quantity)
    }
}
