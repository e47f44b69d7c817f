//! Receipt
//!
//! A priced snapshot of a cart, detached from the shop and cart it was built
//! from, plus a terminal renderer for it.

use std::io;

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, prelude::FromPrimitive};
use rusty_money::iso;
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::Cart,
    checkout::{Shop, ShopError},
    currency::{Currency, CurrencyError},
};

/// Errors that can occur when building or writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Pricing the cart failed.
    #[error(transparent)]
    Shop(#[from] ShopError),

    /// Wrapper for currency errors.
    #[error(transparent)]
    Currency(#[from] CurrencyError),

    /// Writing the receipt failed.
    #[error("Failed to write receipt: {0}")]
    Io(#[from] io::Error),
}

/// One purchased product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptLine {
    /// Product code
    pub code: String,

    /// Product name
    pub name: String,

    /// Units bought
    pub quantity: u32,

    /// Price of one unit
    pub unit_price: Currency,

    /// `unit_price * quantity`
    pub amount: Currency,
}

/// One offer evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptDiscount {
    /// Offer label
    pub name: String,

    /// Discount granted, possibly zero
    pub amount: Currency,
}

/// Final receipt for a priced cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    lines: Vec<ReceiptLine>,
    discounts: Vec<ReceiptDiscount>,
    subtotal: Currency,
    discount: Currency,
    total: Currency,
}

impl Receipt {
    /// Price `cart` with `shop`.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiptError`] if the cart cannot be priced.
    pub fn new(shop: &Shop, cart: &Cart) -> Result<Self, ReceiptError> {
        let lines: Vec<ReceiptLine> = shop
            .check_totals(cart)?
            .into_iter()
            .filter(|line| line.quantity > 0)
            .map(|line| ReceiptLine {
                code: line.product.code.clone(),
                name: line.product.name.clone(),
                quantity: line.quantity,
                unit_price: line.product.unit_price,
                amount: line.amount,
            })
            .collect();

        let discounts: Vec<ReceiptDiscount> = shop
            .check_discounts(cart)?
            .iter()
            .map(|discount| ReceiptDiscount {
                name: discount.name(),
                amount: discount.amount,
            })
            .collect();

        let subtotal = Currency::total(lines.iter().map(|line| line.amount))?;
        let discount = Currency::total(discounts.iter().map(|discount| discount.amount))?;
        let total = shop.checkout(cart)?;

        Ok(Self {
            lines,
            discounts,
            subtotal,
            discount,
            total,
        })
    }

    /// Purchased products, in catalog order
    pub fn lines(&self) -> &[ReceiptLine] {
        &self.lines
    }

    /// Every offer evaluation, in configuration order
    pub fn discounts(&self) -> &[ReceiptDiscount] {
        &self.discounts
    }

    /// Offers that granted a non-zero discount.
    pub fn applied_discounts(&self) -> impl Iterator<Item = &ReceiptDiscount> {
        self.discounts
            .iter()
            .filter(|discount| !discount.amount.is_zero())
    }

    /// Total before discounts
    pub fn subtotal(&self) -> Currency {
        self.subtotal
    }

    /// Sum of all discounts
    pub fn savings(&self) -> Currency {
        self.discount
    }

    /// Exact total, possibly negative
    pub fn total(&self) -> Currency {
        self.total
    }

    /// Amount to charge: the total, never below zero.
    pub fn payable(&self) -> Currency {
        self.total.max(Currency::ZERO)
    }

    /// Savings as a fraction of the subtotal.
    ///
    /// # Errors
    ///
    /// Returns [`CurrencyError::OutOfRange`] if either amount does not fit a `Decimal`.
    pub fn savings_percent(&self) -> Result<Percentage, CurrencyError> {
        if self.subtotal.is_zero() {
            return Ok(Percentage::from(0.0));
        }

        let savings = to_decimal(self.discount)?;
        let subtotal = to_decimal(self.subtotal)?;

        Ok(Percentage::from(savings / subtotal))
    }

    /// Writes the receipt as a table followed by a summary.
    ///
    /// # Errors
    ///
    /// Returns an error if an amount cannot be displayed or the writer fails.
    pub fn write_to(
        &self,
        mut out: impl io::Write,
        currency: &'static iso::Currency,
    ) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();

        builder.push_record(["Item", "Qty", "Unit Price", "Line Total"]);

        for line in &self.lines {
            builder.push_record([
                line.name.clone(),
                line.quantity.to_string(),
                line.unit_price.to_money(currency)?.to_string(),
                line.amount.to_money(currency)?.to_string(),
            ]);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Rows::first(), Color::BOLD);
        table.modify(Columns::new(1..4), Alignment::right());

        writeln!(out, "\n{table}")?;

        let mut summary: Vec<(String, String)> = vec![(
            "Subtotal:".to_string(),
            self.subtotal.to_money(currency)?.to_string(),
        )];

        for discount in self.applied_discounts() {
            summary.push((
                format!("{}:", discount.name),
                format!("-{}", discount.amount.to_money(currency)?),
            ));
        }

        summary.push((
            "Savings:".to_string(),
            format!(
                "({:.2}%) {}",
                percent_points(self.savings_percent()?),
                self.discount.to_money(currency)?
            ),
        ));

        summary.push((
            "\x1b[1mTotal:\x1b[0m".to_string(),
            format!("\x1b[1m{}\x1b[0m", self.payable().to_money(currency)?),
        ));

        write_summary(&mut out, &summary)?;

        Ok(())
    }
}

fn to_decimal(value: Currency) -> Result<Decimal, CurrencyError> {
    Decimal::from_i128(value.minor_units()).ok_or(CurrencyError::OutOfRange(value.minor_units()))
}

/// `Percentage` is a fraction (e.g. 0.25); multiply by 100 to print percent points.
fn percent_points(percentage: Percentage) -> Decimal {
    ((percentage * Decimal::ONE) * Decimal::ONE_HUNDRED).round_dp(2)
}

/// Writes right-aligned labels next to a right-aligned value column.
fn write_summary(out: &mut impl io::Write, rows: &[(String, String)]) -> io::Result<()> {
    let label_width = rows
        .iter()
        .map(|(label, _)| visible_width(label))
        .max()
        .unwrap_or(0);

    let value_width = rows
        .iter()
        .map(|(_, value)| visible_width(value))
        .max()
        .unwrap_or(0);

    for (label, value) in rows {
        let label_pad = " ".repeat(label_width.saturating_sub(visible_width(label)));
        let value_pad = " ".repeat(value_width.saturating_sub(visible_width(value)));

        writeln!(out, " {label_pad}{label}  {value_pad}{value}")?;
    }

    writeln!(out)
}

/// Returns the visible (non-ANSI) width of a string.
fn visible_width(s: &str) -> usize {
    let mut width = 0usize;
    let mut in_escape = false;

    for ch in s.chars() {
        if in_escape {
            if ch.is_ascii_alphabetic() {
                in_escape = false;
            }
        } else if ch == '\x1b' {
            in_escape = true;
        } else {
            width += 1;
        }
    }

    width
}
