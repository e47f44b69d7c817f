//! Storefront prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartError},
    catalog::{Catalog, CatalogError},
    checkout::{Discount, LineTotal, OfferHint, Shop, ShopError},
    currency::{Currency, CurrencyError},
    fixtures::{Fixture, FixtureError},
    offers::{BulkOffer, BuyXGetYFreeOffer, Offer, OfferConfig, OfferError},
    persistence::{CartStore, CartStoreError, FileCartStore, MemoryCartStore},
    products::{Product, ProductKey},
    receipt::{Receipt, ReceiptDiscount, ReceiptError, ReceiptLine},
};
