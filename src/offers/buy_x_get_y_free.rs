//! Buy X Get Y Free Offer

use crate::{
    currency::{Currency, CurrencyError},
    offers::OfferError,
    products::{Product, ProductKey},
};

/// For every complete group of `buy` units, `get_free` units are free.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuyXGetYFreeOffer {
    product: ProductKey,
    buy: u32,
    get_free: u32,
}

impl BuyXGetYFreeOffer {
    /// Create a new buy-x-get-y-free offer.
    ///
    /// # Errors
    ///
    /// Returns [`OfferError::InvalidParameter`] if `buy` or `get_free` is 0.
    pub fn new(product: ProductKey, buy: u32, get_free: u32) -> Result<Self, OfferError> {
        for (parameter, value) in [("buy", buy), ("get_free", get_free)] {
            if value < 1 {
                return Err(OfferError::InvalidParameter {
                    parameter,
                    value,
                    reason: "must be at least 1",
                });
            }
        }

        Ok(Self {
            product,
            buy,
            get_free,
        })
    }

    /// Return the discounted product
    pub fn product(&self) -> ProductKey {
        self.product
    }

    /// Group size
    pub fn buy(&self) -> u32 {
        self.buy
    }

    /// Free units per complete group
    pub fn get_free(&self) -> u32 {
        self.get_free
    }

    /// Display label, e.g. "3x1 Cap offer".
    pub fn name(&self, product: &Product) -> String {
        format!("{}x{} {} offer", self.buy, self.get_free, product.name)
    }

    /// Discount for `quantity` units: `unit_price * floor(quantity / buy) * get_free`.
    ///
    /// # Errors
    ///
    /// Returns [`CurrencyError::Overflow`] if the product overflows.
    pub fn discount(&self, product: &Product, quantity: u32) -> Result<Currency, CurrencyError> {
        if quantity < self.buy {
            return Ok(Currency::ZERO);
        }

        let free_units = u64::from(quantity / self.buy) * u64::from(self.get_free);

        product.unit_price.multiply(free_units)
    }

    /// How many more units are needed before the first group is complete.
    pub fn more_needed(&self, quantity: u32) -> u32 {
        self.buy.saturating_sub(quantity)
    }
}

#[cfg(test)]
mod tests {
    use slotmap::SlotMap;
    use testresult::TestResult;

    use super::*;

    fn item() -> Product {
        Product::new("ABC", "Item ABC", Currency::from_minor(10_000))
    }

    fn offer(buy: u32, get_free: u32) -> Result<BuyXGetYFreeOffer, OfferError> {
        let mut keys = SlotMap::<ProductKey, ()>::with_key();

        BuyXGetYFreeOffer::new(keys.insert(()), buy, get_free)
    }

    #[test]
    fn no_discount_below_group_size() -> TestResult {
        let offer = offer(3, 1)?;

        assert_eq!(offer.discount(&item(), 0)?, Currency::ZERO);
        assert_eq!(offer.discount(&item(), 2)?, Currency::ZERO);

        Ok(())
    }

    #[test]
    fn one_free_unit_per_complete_group() -> TestResult {
        let offer = offer(3, 1)?;

        assert_eq!(offer.discount(&item(), 3)?, Currency::from_minor(10_000));
        assert_eq!(offer.discount(&item(), 5)?, Currency::from_minor(10_000));
        assert_eq!(offer.discount(&item(), 6)?, Currency::from_minor(20_000));

        Ok(())
    }

    #[test]
    fn several_free_units_per_group() -> TestResult {
        let offer = offer(3, 2)?;

        assert_eq!(offer.discount(&item(), 7)?, Currency::from_minor(40_000));
        assert_eq!(offer.discount(&item(), 9)?, Currency::from_minor(60_000));

        Ok(())
    }

    #[test]
    fn name_is_buy_x_get_y() -> TestResult {
        let offer = offer(3, 1)?;
        let product = Product::new("CAP", "Cap", Currency::from_minor(500));

        assert_eq!(offer.name(&product), "3x1 Cap offer");

        Ok(())
    }

    #[test]
    fn more_needed_until_first_group() -> TestResult {
        let offer = offer(3, 1)?;

        assert_eq!(offer.more_needed(1), 2);
        assert_eq!(offer.more_needed(3), 0);

        Ok(())
    }

    #[test]
    fn rejects_zero_parameters() {
        assert!(matches!(
            offer(0, 1),
            Err(OfferError::InvalidParameter {
                parameter: "buy",
                ..
            })
        ));
        assert!(matches!(
            offer(2, 0),
            Err(OfferError::InvalidParameter {
                parameter: "get_free",
                ..
            })
        ));
    }
}
