//! Checkout
//!
//! The pricing engine. A [`Shop`] owns a catalog and a list of offers, and
//! prices any cart handed to it without keeping hold of the cart afterwards.
//!
//! Offers stack additively: every configured offer is evaluated on its own and
//! the discounts are summed, even when several target the same product.

use smallvec::SmallVec;
use thiserror::Error;
use tracing::{Span, debug, warn};

use crate::{
    cart::Cart,
    catalog::{Catalog, CatalogError},
    currency::{Currency, CurrencyError},
    offers::{Offer, OfferConfig, OfferError},
    products::{Product, ProductKey},
};

/// Errors raised while building a shop or pricing a cart.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShopError {
    /// Unknown or duplicate product codes in the catalog, offers or cart.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// An offer configuration is invalid.
    #[error(transparent)]
    Offer(#[from] OfferError),

    /// Money arithmetic overflowed.
    #[error(transparent)]
    Currency(#[from] CurrencyError),

    /// An offer points at a product key the catalog does not hold.
    #[error("Missing product for key {0:?}")]
    MissingProduct(ProductKey),
}

/// Price of all units of one catalog product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineTotal<'a> {
    /// Catalog product
    pub product: &'a Product,

    /// Units in the cart
    pub quantity: u32,

    /// `unit_price * quantity`
    pub amount: Currency,
}

/// Discount granted by one configured offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Discount<'a> {
    /// The offer
    pub offer: &'a Offer,

    /// Product the offer targets
    pub product: &'a Product,

    /// Discount amount, zero when the offer does not apply
    pub amount: Currency,
}

impl Discount<'_> {
    /// Offer label, e.g. "x3 T-Shirt offer".
    pub fn name(&self) -> String {
        self.offer.name(self.product)
    }
}

/// How far a cart is from triggering an offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OfferHint<'a> {
    /// The offer
    pub offer: &'a Offer,

    /// Product the offer targets
    pub product: &'a Product,

    /// Units still missing, 0 once the offer applies
    pub more_needed: u32,
}

/// Pricing engine over a fixed catalog and offer list.
#[derive(Debug, Clone)]
pub struct Shop {
    catalog: Catalog,
    offers: Vec<Offer>,
}

impl Shop {
    /// Build a shop, resolving every offer configuration against `catalog`.
    ///
    /// # Errors
    ///
    /// - [`ShopError::Offer`]: an offer references an unknown product code or has
    ///   an out-of-range parameter.
    pub fn new(
        catalog: Catalog,
        offers: impl IntoIterator<Item = OfferConfig>,
    ) -> Result<Self, ShopError> {
        let offers = offers
            .into_iter()
            .map(|config| config.resolve(&catalog))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            products = catalog.len(),
            offers = offers.len(),
            "shop configured"
        );

        Ok(Self { catalog, offers })
    }

    /// Build a shop from products and offer configurations.
    ///
    /// # Errors
    ///
    /// - [`ShopError::Catalog`]: two products share a code.
    /// - [`ShopError::Offer`]: see [`Shop::new`].
    pub fn from_products(
        products: impl IntoIterator<Item = Product>,
        offers: impl IntoIterator<Item = OfferConfig>,
    ) -> Result<Self, ShopError> {
        Self::new(Catalog::with_products(products)?, offers)
    }

    /// The product catalog
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Offers, in configuration order
    pub fn offers(&self) -> &[Offer] {
        &self.offers
    }

    /// Line total for every catalog product, in catalog order. Products that are
    /// not in the cart get a zero line.
    ///
    /// # Errors
    ///
    /// - [`ShopError::Catalog`]: the cart holds a code the catalog does not know.
    /// - [`ShopError::Currency`]: a line total overflows.
    pub fn check_totals(&self, cart: &Cart) -> Result<Vec<LineTotal<'_>>, ShopError> {
        self.ensure_known(cart)?;

        self.catalog
            .iter()
            .map(|(_, product)| -> Result<LineTotal<'_>, ShopError> {
                let quantity = cart.amount_of(&product.code);
                let amount = product.unit_price.multiply(quantity)?;

                Ok(LineTotal {
                    product,
                    quantity,
                    amount,
                })
            })
            .collect()
    }

    /// Cart total before discounts.
    ///
    /// # Errors
    ///
    /// See [`Shop::check_totals`].
    pub fn check_total(&self, cart: &Cart) -> Result<Currency, ShopError> {
        let totals = self.check_totals(cart)?;

        Ok(Currency::total(totals.iter().map(|line| line.amount))?)
    }

    /// One discount entry per configured offer, in configuration order.
    ///
    /// # Errors
    ///
    /// - [`ShopError::Catalog`]: the cart holds a code the catalog does not know.
    /// - [`ShopError::Currency`]: a discount overflows.
    pub fn check_discounts(&self, cart: &Cart) -> Result<SmallVec<[Discount<'_>; 4]>, ShopError> {
        self.ensure_known(cart)?;

        self.offers
            .iter()
            .map(|offer| -> Result<Discount<'_>, ShopError> {
                let product = self.offer_product(offer)?;
                let amount = offer.discount(product, cart)?;

                Ok(Discount {
                    offer,
                    product,
                    amount,
                })
            })
            .collect()
    }

    /// Sum of all discounts.
    ///
    /// # Errors
    ///
    /// See [`Shop::check_discounts`].
    pub fn check_discount(&self, cart: &Cart) -> Result<Currency, ShopError> {
        let discounts = self.check_discounts(cart)?;

        Ok(Currency::total(discounts.iter().map(|discount| discount.amount))?)
    }

    /// Final total: line totals minus discounts.
    ///
    /// The value is exact and may be negative when stacked offers exceed the
    /// cart value; callers must not charge a negative total.
    ///
    /// # Errors
    ///
    /// See [`Shop::check_totals`] and [`Shop::check_discounts`].
    #[tracing::instrument(
        name = "shop.checkout",
        skip_all,
        fields(
            units = cart.total_products(),
            total = tracing::field::Empty
        )
    )]
    pub fn checkout(&self, cart: &Cart) -> Result<Currency, ShopError> {
        let subtotal = self.check_total(cart)?;
        let discount = self.check_discount(cart)?;
        let total = subtotal.subtract(discount)?;

        Span::current().record("total", tracing::field::display(total));

        if total.is_negative() {
            warn!(%subtotal, %discount, %total, "discounts exceed cart value");
        } else {
            debug!(%subtotal, %discount, %total, "cart priced");
        }

        Ok(total)
    }

    /// For every offer, how many more units the cart needs to trigger it.
    ///
    /// # Errors
    ///
    /// - [`ShopError::Catalog`]: the cart holds a code the catalog does not know.
    /// - [`ShopError::MissingProduct`]: an offer's product is missing.
    pub fn offer_hints(&self, cart: &Cart) -> Result<Vec<OfferHint<'_>>, ShopError> {
        self.ensure_known(cart)?;

        self.offers
            .iter()
            .map(|offer| -> Result<OfferHint<'_>, ShopError> {
                let product = self.offer_product(offer)?;

                Ok(OfferHint {
                    offer,
                    product,
                    more_needed: offer.more_needed(product, cart),
                })
            })
            .collect()
    }

    fn offer_product(&self, offer: &Offer) -> Result<&Product, ShopError> {
        self.catalog
            .product(offer.product())
            .ok_or(ShopError::MissingProduct(offer.product()))
    }

    fn ensure_known(&self, cart: &Cart) -> Result<(), ShopError> {
        if let Some(code) = cart.codes().find(|code| !self.catalog.contains(code)) {
            debug!(code, "cart references unknown product code");

            return Err(CatalogError::UnknownProductCode(code.to_string()).into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn products() -> [Product; 3] {
        [
            Product::new("TSHIRT", "T-Shirt", Currency::from_minor(2000)),
            Product::new("MUG", "Coffee Mug", Currency::from_minor(750)),
            Product::new("CAP", "Cap", Currency::from_minor(500)),
        ]
    }

    fn offers() -> [OfferConfig; 2] {
        [
            OfferConfig::Bulk {
                product_code: "TSHIRT".to_string(),
                min_quantity: 3,
                percentage: 25,
            },
            OfferConfig::BuyXGetYFree {
                product_code: "CAP".to_string(),
                buy: 3,
                get_free: 1,
            },
        ]
    }

    fn shop() -> Result<Shop, ShopError> {
        Shop::from_products(products(), offers())
    }

    #[test]
    fn new_rejects_offer_for_unknown_product() {
        let result = Shop::from_products(
            products(),
            [OfferConfig::Bulk {
                product_code: "HAT".to_string(),
                min_quantity: 2,
                percentage: 10,
            }],
        );

        assert_eq!(
            result.map(|_| ()),
            Err(ShopError::Offer(OfferError::Catalog(
                CatalogError::UnknownProductCode("HAT".to_string())
            )))
        );
    }

    #[test]
    fn empty_cart_has_zero_discount_per_offer() -> TestResult {
        let shop = shop()?;
        let discounts = shop.check_discounts(&Cart::new())?;

        assert_eq!(discounts.len(), 2);
        assert!(discounts.iter().all(|discount| discount.amount.is_zero()));

        Ok(())
    }

    #[test]
    fn discounts_follow_configuration_order() -> TestResult {
        let shop = shop()?;
        let cart = Cart::from_quantities([("CAP", 3), ("TSHIRT", 3), ("MUG", 1)])?;

        let discounts = shop.check_discounts(&cart)?;
        let entries: Vec<(String, Currency)> = discounts
            .iter()
            .map(|discount| (discount.name(), discount.amount))
            .collect();

        assert_eq!(
            entries,
            [
                ("x3 T-Shirt offer".to_string(), Currency::from_minor(1500)),
                ("3x1 Cap offer".to_string(), Currency::from_minor(500)),
            ]
        );

        Ok(())
    }

    #[test]
    fn totals_cover_every_catalog_product_in_order() -> TestResult {
        let shop = shop()?;
        let cart = Cart::from_quantities([("CAP", 2), ("TSHIRT", 3)])?;

        let totals: Vec<(&str, u32, Currency)> = shop
            .check_totals(&cart)?
            .iter()
            .map(|line| (line.product.code.as_str(), line.quantity, line.amount))
            .collect();

        assert_eq!(
            totals,
            [
                ("TSHIRT", 3, Currency::from_minor(6000)),
                ("MUG", 0, Currency::ZERO),
                ("CAP", 2, Currency::from_minor(1000)),
            ]
        );

        Ok(())
    }

    #[test]
    fn checkout_subtracts_discounts() -> TestResult {
        let shop = shop()?;
        let cart = Cart::from_quantities([("CAP", 3), ("TSHIRT", 3), ("MUG", 1)])?;

        assert_eq!(shop.check_total(&cart)?, Currency::from_minor(8250));
        assert_eq!(shop.check_discount(&cart)?, Currency::from_minor(2000));
        assert_eq!(shop.checkout(&cart)?, Currency::from_minor(6250));

        Ok(())
    }

    #[test]
    fn checkout_is_idempotent() -> TestResult {
        let shop = shop()?;
        let cart = Cart::from_quantities([("CAP", 4), ("TSHIRT", 5)])?;
        let before = cart.clone();

        let first = shop.checkout(&cart)?;
        let second = shop.checkout(&cart)?;

        assert_eq!(first, second);
        assert_eq!(cart, before);

        Ok(())
    }

    #[test]
    fn unknown_cart_code_is_rejected() -> TestResult {
        let shop = shop()?;
        let cart = Cart::from_quantities([("HAT", 1)])?;
        let unknown = ShopError::Catalog(CatalogError::UnknownProductCode("HAT".to_string()));

        assert_eq!(shop.checkout(&cart), Err(unknown));
        assert!(shop.check_totals(&cart).is_err());
        assert!(shop.check_discounts(&cart).is_err());
        assert!(matches!(
            shop.offer_hints(&cart),
            Err(ShopError::Catalog(CatalogError::UnknownProductCode(code))) if code == "HAT"
        ));

        Ok(())
    }

    #[test]
    fn stacked_offers_add_up_and_may_go_negative() -> TestResult {
        let shop = Shop::from_products(
            [Product::new("CAP", "Cap", Currency::from_minor(500))],
            [
                OfferConfig::BuyXGetYFree {
                    product_code: "CAP".to_string(),
                    buy: 1,
                    get_free: 1,
                },
                OfferConfig::Bulk {
                    product_code: "CAP".to_string(),
                    min_quantity: 1,
                    percentage: 50,
                },
            ],
        )?;
        let cart = Cart::from_quantities([("CAP", 2)])?;

        assert_eq!(shop.check_discount(&cart)?, Currency::from_minor(1500));
        assert_eq!(shop.checkout(&cart)?, Currency::from_minor(-500));

        Ok(())
    }

    #[test]
    fn offer_hints_report_missing_units() -> TestResult {
        let shop = shop()?;
        let cart = Cart::from_quantities([("TSHIRT", 1), ("CAP", 3)])?;

        let hints: Vec<(String, u32)> = shop
            .offer_hints(&cart)?
            .iter()
            .map(|hint| (hint.offer.name(hint.product), hint.more_needed))
            .collect();

        assert_eq!(
            hints,
            [
                ("x3 T-Shirt offer".to_string(), 2),
                ("3x1 Cap offer".to_string(), 0),
            ]
        );

        Ok(())
    }
}
