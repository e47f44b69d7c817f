//! Products

use slotmap::new_key_type;

use crate::currency::Currency;

new_key_type! {
    /// Product Key
    pub struct ProductKey;
}

/// Product
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    /// Unique product code (e.g. "TSHIRT")
    pub code: String,

    /// Display name
    pub name: String,

    /// Price of a single unit
    pub unit_price: Currency,
}

impl Product {
    /// Creates a new product.
    pub fn new(code: impl Into<String>, name: impl Into<String>, unit_price: Currency) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            unit_price,
        }
    }
}
