//! Storefront
//!
//! Storefront prices a shopping cart against a product catalog and a set of
//! per-product offers, producing exact line totals, discounts and a final total.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod currency;
pub mod fixtures;
pub mod offers;
pub mod persistence;
pub mod prelude;
pub mod products;
pub mod receipt;
pub mod utils;
