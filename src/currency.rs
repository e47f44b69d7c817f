//! Currency
//!
//! Exact monetary values counted in minor units (euro cents). All arithmetic is
//! integer arithmetic with overflow checks, so prices, line totals and discounts
//! never pick up floating point error.

use std::{fmt, str::FromStr};

use rusty_money::{Money, iso};
use thiserror::Error;

/// Errors raised by currency parsing and arithmetic.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CurrencyError {
    /// The string is not a recognised amount (e.g. "7.5 €" or "7.50 EUR").
    #[error("Invalid currency format: {0}")]
    InvalidFormat(String),

    /// An intermediate or final value did not fit in the minor unit range.
    #[error("currency arithmetic overflowed")]
    Overflow,

    /// The amount cannot be represented by the display money type.
    #[error("amount of {0} minor units is out of range for display")]
    OutOfRange(i128),
}

/// A monetary value in minor units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Currency {
    minor: i128,
}

impl Currency {
    /// Zero.
    pub const ZERO: Self = Self { minor: 0 };

    /// Creates a value from a count of minor units (cents).
    pub const fn from_minor(minor: i128) -> Self {
        Self { minor }
    }

    /// Returns the value as a count of minor units.
    pub const fn minor_units(&self) -> i128 {
        self.minor
    }

    /// Whether this value is exactly zero.
    pub const fn is_zero(&self) -> bool {
        self.minor == 0
    }

    /// Whether this value is below zero.
    pub const fn is_negative(&self) -> bool {
        self.minor < 0
    }

    /// Exact sum of two values.
    ///
    /// # Errors
    ///
    /// Returns [`CurrencyError::Overflow`] if the sum leaves the `i128` range.
    pub fn add(self, other: Self) -> Result<Self, CurrencyError> {
        self.minor
            .checked_add(other.minor)
            .map(Self::from_minor)
            .ok_or(CurrencyError::Overflow)
    }

    /// Exact difference of two values. The result may be negative.
    ///
    /// # Errors
    ///
    /// Returns [`CurrencyError::Overflow`] if the difference leaves the `i128` range.
    pub fn subtract(self, other: Self) -> Result<Self, CurrencyError> {
        self.minor
            .checked_sub(other.minor)
            .map(Self::from_minor)
            .ok_or(CurrencyError::Overflow)
    }

    /// Exact scalar multiple, e.g. a unit price scaled by a quantity.
    ///
    /// # Errors
    ///
    /// Returns [`CurrencyError::Overflow`] if the product leaves the `i128` range.
    pub fn multiply(self, factor: impl Into<i128>) -> Result<Self, CurrencyError> {
        self.minor
            .checked_mul(factor.into())
            .map(Self::from_minor)
            .ok_or(CurrencyError::Overflow)
    }

    /// `percent`% of this value, truncated toward zero.
    ///
    /// The full product is formed before dividing, so fractional cents are only
    /// dropped once, at the very end.
    ///
    /// # Errors
    ///
    /// Returns [`CurrencyError::Overflow`] if the intermediate product overflows.
    pub fn percentage(self, percent: u8) -> Result<Self, CurrencyError> {
        let scaled = self.multiply(percent)?;

        Ok(Self::from_minor(scaled.minor / 100))
    }

    /// Sums a sequence of values.
    ///
    /// # Errors
    ///
    /// Returns [`CurrencyError::Overflow`] if any partial sum overflows.
    pub fn total(values: impl IntoIterator<Item = Self>) -> Result<Self, CurrencyError> {
        values
            .into_iter()
            .try_fold(Self::ZERO, |acc, value| acc.add(value))
    }

    /// Converts into a [`Money`] value for localised display.
    ///
    /// # Errors
    ///
    /// Returns [`CurrencyError::OutOfRange`] if the amount does not fit in an `i64`.
    pub fn to_money(
        self,
        currency: &'static iso::Currency,
    ) -> Result<Money<'static, iso::Currency>, CurrencyError> {
        let minor =
            i64::try_from(self.minor).map_err(|_err| CurrencyError::OutOfRange(self.minor))?;

        Ok(Money::from_minor(minor, currency))
    }
}

/// Canonical form: whole euros, then the cents with trailing zeros dropped.
///
/// `3250` renders as `32.5 €`, `2000` as `20 €` and `99` as `0.99 €`.
impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.minor < 0 { "-" } else { "" };
        let abs = self.minor.unsigned_abs();
        let euros = abs / 100;
        let cents = abs % 100;

        if cents == 0 {
            return write!(f, "{sign}{euros} €");
        }

        let cents = format!("{cents:02}");

        write!(f, "{sign}{euros}.{} €", cents.trim_end_matches('0'))
    }
}

impl FromStr for Currency {
    type Err = CurrencyError;

    /// Parses "7.5 €", "7,50 €", "€7.50" or "7.50 EUR".
    ///
    /// Every value in the `i128` range, including the extremes, parses back
    /// from its `Display` form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CurrencyError::InvalidFormat(s.to_string());
        let trimmed = s.trim();

        let amount = trimmed
            .strip_suffix('€')
            .or_else(|| trimmed.strip_prefix('€'))
            .or_else(|| trimmed.strip_suffix("EUR"))
            .ok_or_else(invalid)?
            .trim();

        let (negative, unsigned) = match amount.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, amount),
        };

        let (euros, cents) = unsigned
            .split_once(['.', ','])
            .unwrap_or((unsigned, ""));

        // Trailing zeros carry no value: "1.230" is 123 cents.
        let cents = cents.trim_end_matches('0');

        let all_digits = |part: &str| part.bytes().all(|byte| byte.is_ascii_digit());

        if euros.is_empty() || !all_digits(euros) || !all_digits(cents) || cents.len() > 2 {
            return Err(invalid());
        }

        let cents = format!("{cents:0<2}")
            .parse::<u128>()
            .map_err(|_err| invalid())?;

        let magnitude = euros
            .parse::<u128>()
            .ok()
            .and_then(|euros| euros.checked_mul(100))
            .and_then(|minor| minor.checked_add(cents))
            .ok_or_else(invalid)?;

        let minor = if negative {
            0i128.checked_sub_unsigned(magnitude)
        } else {
            i128::try_from(magnitude).ok()
        }
        .ok_or_else(invalid)?;

        Ok(Self::from_minor(minor))
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn arithmetic_is_exact() -> TestResult {
        let mug = Currency::from_minor(750);
        let cap = Currency::from_minor(500);

        assert_eq!(mug.add(cap)?, Currency::from_minor(1250));
        assert_eq!(cap.subtract(mug)?, Currency::from_minor(-250));
        assert_eq!(mug.multiply(3u32)?, Currency::from_minor(2250));

        Ok(())
    }

    #[test]
    fn percentage_truncates_fractional_cents() -> TestResult {
        // 199 * 3 = 597, 25% of that is 149.25
        let subtotal = Currency::from_minor(199).multiply(3u32)?;

        assert_eq!(subtotal.percentage(25)?, Currency::from_minor(149));
        assert_eq!(subtotal.percentage(0)?, Currency::ZERO);
        assert_eq!(subtotal.percentage(100)?, subtotal);

        Ok(())
    }

    #[test]
    fn overflow_is_reported() {
        let max = Currency::from_minor(i128::MAX);

        assert_eq!(max.add(Currency::from_minor(1)), Err(CurrencyError::Overflow));
        assert_eq!(max.multiply(2u32), Err(CurrencyError::Overflow));
        assert_eq!(
            Currency::from_minor(i128::MIN).subtract(Currency::from_minor(1)),
            Err(CurrencyError::Overflow)
        );
    }

    #[test]
    fn total_sums_all_values() -> TestResult {
        let values = [2000, 750, 500].map(Currency::from_minor);

        assert_eq!(Currency::total(values)?, Currency::from_minor(3250));
        assert_eq!(Currency::total([])?, Currency::ZERO);

        Ok(())
    }

    #[test]
    fn display_uses_canonical_form() {
        assert_eq!(Currency::from_minor(3250).to_string(), "32.5 €");
        assert_eq!(Currency::from_minor(2000).to_string(), "20 €");
        assert_eq!(Currency::from_minor(99).to_string(), "0.99 €");
        assert_eq!(Currency::from_minor(5).to_string(), "0.05 €");
        assert_eq!(Currency::from_minor(0).to_string(), "0 €");
        assert_eq!(Currency::from_minor(-50).to_string(), "-0.5 €");
    }

    #[test]
    fn parse_accepts_euro_formats() -> TestResult {
        assert_eq!("20 €".parse::<Currency>()?, Currency::from_minor(2000));
        assert_eq!("7.5 €".parse::<Currency>()?, Currency::from_minor(750));
        assert_eq!("7,50 €".parse::<Currency>()?, Currency::from_minor(750));
        assert_eq!("0.99€".parse::<Currency>()?, Currency::from_minor(99));
        assert_eq!("€5".parse::<Currency>()?, Currency::from_minor(500));
        assert_eq!("12.34 EUR".parse::<Currency>()?, Currency::from_minor(1234));
        assert_eq!("-0.5 €".parse::<Currency>()?, Currency::from_minor(-50));
        assert_eq!("1.230 €".parse::<Currency>()?, Currency::from_minor(123));

        Ok(())
    }

    #[test]
    fn parse_rejects_malformed_amounts() {
        for input in [
            "20",
            "abc €",
            "1.234 €",
            "",
            "€",
            "7.5 $",
            "+5 €",
            "--5 €",
            ".5 €",
            "1.2.3 €",
            "1701411834604692317316873037158841057.28 €",
            "-1701411834604692317316873037158841057.29 €",
        ] {
            assert!(
                matches!(
                    input.parse::<Currency>(),
                    Err(CurrencyError::InvalidFormat(_))
                ),
                "expected {input:?} to be rejected"
            );
        }
    }

    #[test]
    fn canonical_strings_round_trip() -> TestResult {
        let extremes = [10_i128.pow(29), i128::MAX, i128::MIN, i128::MIN + 1];

        for minor in [0, 5, 50, 99, 100, 750, 3250, 123_456, -50, -2000]
            .into_iter()
            .chain(extremes)
        {
            let value = Currency::from_minor(minor);

            assert_eq!(value.to_string().parse::<Currency>()?, value);
        }

        Ok(())
    }

    #[test]
    fn to_money_converts_minor_units() -> TestResult {
        let money = Currency::from_minor(3250).to_money(iso::EUR)?;

        assert_eq!(money, Money::from_minor(3250, iso::EUR));

        Ok(())
    }

    #[test]
    fn to_money_rejects_values_beyond_i64() {
        let huge = Currency::from_minor(i128::from(i64::MAX) + 1);

        assert!(matches!(
            huge.to_money(iso::EUR),
            Err(CurrencyError::OutOfRange(_))
        ));
    }
}
