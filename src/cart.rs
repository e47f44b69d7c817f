//! Cart
//!
//! A multiset of product codes. The cart knows nothing about prices; it only
//! tracks how many units of each code the shopper wants.

use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while mutating or decoding a cart.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// Quantities passed to `add` / `remove` must be at least 1.
    #[error("Quantity must be greater than 0")]
    InvalidQuantity,

    /// Removing more units than the cart holds.
    #[error("Cannot remove {requested} of {code}: only {available} in the cart")]
    InsufficientQuantity {
        /// Product code
        code: String,
        /// Units currently in the cart
        available: u32,
        /// Units the caller tried to remove
        requested: u32,
    },

    /// The product code cannot be written in the canonical encoding.
    #[error("Invalid product code {0:?}")]
    InvalidProductCode(String),

    /// Adding would overflow the per-product counter.
    #[error("Quantity of {0} would overflow")]
    QuantityOverflow(String),

    /// A serialised cart could not be decoded.
    #[error("Invalid cart format on line {line}: {reason}")]
    InvalidCartFormat {
        /// 1-based line number, or 0 for record-form input
        line: usize,
        /// What was wrong with it
        reason: String,
    },
}

/// Product code → quantity, ordered by code so encodings are deterministic.
///
/// Entries that drop to zero are removed, so a missing code and a zero quantity
/// are the same thing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, u32>", into = "BTreeMap<String, u32>")]
pub struct Cart {
    quantities: BTreeMap<String, u32>,
}

impl Cart {
    /// Creates an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a cart from `(code, quantity)` pairs, adding repeated codes together.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if any quantity is zero or a total overflows.
    pub fn from_quantities<S: Into<String>>(
        quantities: impl IntoIterator<Item = (S, u32)>,
    ) -> Result<Self, CartError> {
        let mut cart = Self::new();

        for (code, quantity) in quantities {
            cart.add(code, quantity)?;
        }

        Ok(cart)
    }

    /// Adds `quantity` units of `code`.
    ///
    /// # Errors
    ///
    /// - [`CartError::InvalidQuantity`]: `quantity` is zero.
    /// - [`CartError::InvalidProductCode`]: `code` is empty, padded with
    ///   whitespace, or contains `": "` or a control character.
    /// - [`CartError::QuantityOverflow`]: the stored quantity would overflow.
    pub fn add(&mut self, code: impl Into<String>, quantity: u32) -> Result<(), CartError> {
        if quantity < 1 {
            return Err(CartError::InvalidQuantity);
        }

        let code = code.into();

        if !is_valid_code(&code) {
            return Err(CartError::InvalidProductCode(code));
        }

        let current = self.amount_of(&code);
        let updated = current
            .checked_add(quantity)
            .ok_or_else(|| CartError::QuantityOverflow(code.clone()))?;

        self.quantities.insert(code, updated);

        Ok(())
    }

    /// Removes `quantity` units of `code`. On error the cart is left untouched.
    ///
    /// # Errors
    ///
    /// - [`CartError::InvalidQuantity`]: `quantity` is zero.
    /// - [`CartError::InsufficientQuantity`]: fewer than `quantity` units are present.
    pub fn remove(&mut self, code: &str, quantity: u32) -> Result<(), CartError> {
        if quantity < 1 {
            return Err(CartError::InvalidQuantity);
        }

        let available = self.amount_of(code);

        let Some(remaining) = available.checked_sub(quantity) else {
            return Err(CartError::InsufficientQuantity {
                code: code.to_string(),
                available,
                requested: quantity,
            });
        };

        if remaining == 0 {
            self.quantities.remove(code);
        } else {
            self.quantities.insert(code.to_string(), remaining);
        }

        Ok(())
    }

    /// Units of `code` in the cart, 0 if absent.
    pub fn amount_of(&self, code: &str) -> u32 {
        self.quantities.get(code).copied().unwrap_or(0)
    }

    /// Total number of units across all codes.
    pub fn total_products(&self) -> u64 {
        self.quantities.values().map(|&quantity| u64::from(quantity)).sum()
    }

    /// Whether the cart holds no units at all.
    pub fn is_empty(&self) -> bool {
        self.quantities.is_empty()
    }

    /// Number of distinct codes in the cart.
    pub fn len(&self) -> usize {
        self.quantities.len()
    }

    /// Iterates `(code, quantity)` pairs in code order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.quantities
            .iter()
            .map(|(code, &quantity)| (code.as_str(), quantity))
    }

    /// Iterates the product codes present in the cart.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.quantities.keys().map(String::as_str)
    }
}

/// Canonical encoding: one `{code}: {quantity}` line per product, each ending in `\n`.
impl fmt::Display for Cart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (code, quantity) in self.iter() {
            writeln!(f, "{code}: {quantity}")?;
        }

        Ok(())
    }
}

impl FromStr for Cart {
    type Err = CartError;

    /// Decodes the canonical encoding. Blank lines are skipped; a code may
    /// appear only once.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut quantities = BTreeMap::new();

        for (idx, line) in s.lines().enumerate() {
            let line_no = idx + 1;

            if line.trim().is_empty() {
                continue;
            }

            let invalid = |reason: &str| CartError::InvalidCartFormat {
                line: line_no,
                reason: reason.to_string(),
            };

            let (code, quantity) = line
                .split_once(": ")
                .ok_or_else(|| invalid("expected `CODE: QUANTITY`"))?;

            if !is_valid_code(code) {
                return Err(invalid("product code cannot be encoded"));
            }

            let quantity = quantity
                .parse::<u32>()
                .map_err(|_err| invalid("quantity is not a non-negative integer"))?;

            if quantity == 0 {
                return Err(invalid("quantity must be greater than 0"));
            }

            if quantities.insert(code.to_string(), quantity).is_some() {
                return Err(invalid("product code appears more than once"));
            }
        }

        Ok(Self { quantities })
    }
}

impl TryFrom<BTreeMap<String, u32>> for Cart {
    type Error = CartError;

    fn try_from(quantities: BTreeMap<String, u32>) -> Result<Self, Self::Error> {
        if let Some(code) = quantities
            .iter()
            .find_map(|(code, &quantity)| (quantity == 0 || !is_valid_code(code)).then_some(code))
        {
            return Err(CartError::InvalidCartFormat {
                line: 0,
                reason: format!("entry {code:?} must have a valid code and a quantity above 0"),
            });
        }

        Ok(Self { quantities })
    }
}

/// Whether `code` survives a trip through the canonical encoding.
fn is_valid_code(code: &str) -> bool {
    !code.is_empty()
        && code.trim() == code
        && !code.contains(": ")
        && !code.chars().any(char::is_control)
}

impl From<Cart> for BTreeMap<String, u32> {
    fn from(cart: Cart) -> Self {
        cart.quantities
    }
}
